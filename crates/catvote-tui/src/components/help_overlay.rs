//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    component::{Component, UiContext},
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &UiContext) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all other keys while the overlay is open
            _ => vec![Action::Noop],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _ctx: &UiContext) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _ctx: &UiContext) -> Vec<Action> {
        if *action == Action::ToggleHelp {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _ctx: &UiContext) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 30, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " keyboard shortcuts",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            section(" pages"),
            help_row("1 / 2 / 3", "voting / breeds / favorites"),
            help_row("tab / shift-tab", "next / previous page"),
            help_row("[ / ]", "history back / forward"),
            help_row("r", "reload the current page"),
            Line::from(""),
            section(" voting"),
            help_row("l / d", "like / dislike"),
            help_row("f", "favorite"),
            help_row("y", "copy image url"),
            Line::from(""),
            section(" breeds"),
            help_row("↑ / ↓  or  j / k", "move cursor"),
            help_row("enter / click", "select breed"),
            help_row("← / →  or  h / l", "previous / next slide"),
            help_row("y / w", "copy slide url / wikipedia link"),
            Line::from(""),
            section(" favorites"),
            help_row("g / c", "grid / column view"),
            help_row("↑ / ↓  or  j / k", "scroll"),
            Line::from(""),
            section(" ui"),
            help_row("K / L", "toggle keys bar / log panel"),
            help_row("?", "toggle this help overlay"),
            help_row("q / Ctrl+C", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                " press ? or esc to close",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(ratatui::style::Color::Rgb(18, 18, 26))),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<20}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

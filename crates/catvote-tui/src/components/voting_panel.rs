//! VotingPanel: the current image plus like/dislike/favorite buttons.

use catvote_proto::protocol::VoteAction;
use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::component::{hit, Component, UiContext};
use crate::theme::{style_link, style_muted, C_ACCENT, C_FAVORITE, C_LIKE, C_SECONDARY};
use crate::widgets::pane_chrome::pane_chrome;

const BUTTONS: [(VoteAction, &str); 3] = [
    (VoteAction::Like, " l ▲ like "),
    (VoteAction::Dislike, " d ▼ dislike "),
    (VoteAction::Favorite, " f ★ favorite "),
];

pub struct VotingPanel {
    button_areas: Vec<(VoteAction, Rect)>,
}

impl VotingPanel {
    pub fn new() -> Self {
        Self {
            button_areas: Vec::new(),
        }
    }
}

fn button_color(action: VoteAction) -> ratatui::style::Color {
    match action {
        VoteAction::Like => C_LIKE,
        VoteAction::Dislike => C_ACCENT,
        VoteAction::Favorite => C_FAVORITE,
    }
}

impl Component for VotingPanel {
    fn id(&self) -> ComponentId {
        ComponentId::VotingPanel
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('l') => vec![Action::Vote(VoteAction::Like)],
            KeyCode::Char('d') => vec![Action::Vote(VoteAction::Dislike)],
            KeyCode::Char('f') => vec![Action::Vote(VoteAction::Favorite)],
            KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Char('y') => {
                let url = ctx.screen.voting_image();
                if url.is_empty() {
                    vec![]
                } else {
                    vec![Action::CopyToClipboard(url.to_string())]
                }
            }
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _ctx: &UiContext) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        self.button_areas
            .iter()
            .find(|(_, r)| hit(*r, event.column, event.row))
            .map(|(action, _)| vec![Action::Vote(*action)])
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        let block = pane_chrome("voting", Some('1'), true, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let image = ctx.screen.voting_image();
        let body: Vec<Line> = if image.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled("  loading a cat…", style_muted())),
            ]
        } else {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled("  ╭─ image ─╮", Style::default().fg(C_SECONDARY))),
                Line::from(vec![Span::raw("  "), Span::styled(image, style_link())]),
            ];
            if let Some(id) = ctx.session.current_image_id() {
                lines.push(Line::from(Span::styled(
                    format!("  id {}", id),
                    style_muted(),
                )));
            }
            lines
        };
        frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: false }), rows[0]);

        self.button_areas.clear();
        let mut spans = vec![Span::raw("  ")];
        let mut x = rows[2].x + 2;
        for (action, label) in BUTTONS {
            let width = label.chars().count() as u16;
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(button_color(action))
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ));
            spans.push(Span::raw("  "));
            self.button_areas.push((
                action,
                Rect {
                    x,
                    y: rows[2].y,
                    width,
                    height: 1,
                },
            ));
            x += width + 2;
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[2]);
    }
}

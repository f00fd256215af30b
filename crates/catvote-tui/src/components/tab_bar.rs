//! TabBar: one entry per page; the active tab is the one the view marks.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::{Action, ComponentId};
use crate::component::{hit, Component, UiContext};
use crate::navigation::Page;
use crate::theme::{C_ACCENT, C_MUTED, C_NUMBER_HINT, C_PRIMARY, C_SEPARATOR};

pub struct TabBar {
    /// Hit areas from the last draw, in `Page::ALL` order.
    tab_areas: Vec<(Page, Rect)>,
}

impl TabBar {
    pub fn new() -> Self {
        Self {
            tab_areas: Vec::new(),
        }
    }
}

impl Component for TabBar {
    fn id(&self) -> ComponentId {
        ComponentId::TabBar
    }

    fn handle_key(&mut self, _key: KeyEvent, _ctx: &UiContext) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _ctx: &UiContext) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        self.tab_areas
            .iter()
            .find(|(_, r)| hit(*r, event.column, event.row))
            .map(|(page, _)| vec![Action::OpenTab(*page)])
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        if area.height == 0 {
            return;
        }
        self.tab_areas.clear();

        let mut spans = vec![Span::styled(
            " catvote ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];
        let mut x = area.x + 9;

        for page in Page::ALL {
            let active = ctx.screen.is_tab_active(page);
            let label = format!(" {} {} ", page.index() + 1, page.title());
            let width = label.chars().count() as u16;

            spans.push(Span::styled("│", Style::default().fg(C_SEPARATOR)));
            x += 1;

            let style = if active {
                Style::default()
                    .fg(C_PRIMARY)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(C_MUTED)
            };
            spans.push(Span::styled(label, style));
            self.tab_areas.push((
                page,
                Rect {
                    x,
                    y: area.y,
                    width: width.min((area.x + area.width).saturating_sub(x)),
                    height: 1,
                },
            ));
            x += width;
        }

        let location = ctx.session.current_page().fragment();
        spans.push(Span::styled(
            format!("  {}", location),
            Style::default().fg(C_NUMBER_HINT),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

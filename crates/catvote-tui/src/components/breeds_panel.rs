//! BreedsPanel: breed selector, details, and the slide carousel.
//!
//! The cursor moves freely; Enter (or a click) commits the selection, which
//! is what triggers a details load.

use catvote_proto::protocol::BreedSummary;
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
use crate::theme::{
    style_default, style_link, style_muted, style_secondary, style_selected, C_ACCENT, C_ORIGIN,
    C_PRIMARY, C_SECONDARY,
};
use crate::widgets::pane_chrome::{pane_chrome, Badge};
use crate::widgets::scrollable_list::ScrollableList;

const LIST_WIDTH: u16 = 26;

pub struct BreedsPanel {
    list: ScrollableList<BreedSummary>,
    last_selected: Option<usize>,
    hovered: bool,
    list_area: Rect,
    carousel_area: Rect,
    dot_areas: Vec<Rect>,
}

impl BreedsPanel {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            last_selected: None,
            hovered: false,
            list_area: Rect::default(),
            carousel_area: Rect::default(),
            dot_areas: Vec::new(),
        }
    }

    /// Follow the selector options and committed selection in the view.
    fn sync(&mut self, ctx: &UiContext) {
        let options = ctx.screen.breed_options();
        if self.list.items.as_slice() != options {
            self.list.set_items(options.to_vec());
            self.last_selected = None;
        }
        let selected = ctx.screen.selected_breed_index();
        if selected != self.last_selected {
            if let Some(i) = selected {
                self.list.set_selected(i);
            }
            self.last_selected = selected;
        }
    }

    fn commit(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(b) => vec![Action::SelectBreed(b.id.clone())],
            None => vec![],
        }
    }

    fn jump(ctx: &UiContext, forward: bool) -> Vec<Action> {
        let Some(show) = ctx.slideshow else {
            return vec![];
        };
        let len = show.slides().len();
        if len < 2 {
            return vec![];
        }
        let next = if forward {
            (show.index() + 1) % len
        } else {
            (show.index() + len - 1) % len
        };
        vec![Action::CarouselJump(next)]
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        let badge_text = if self.list.is_empty() {
            String::new()
        } else {
            format!("{}/{}", self.list.selected + 1, self.list.len())
        };
        let badge = (!badge_text.is_empty()).then(|| Badge {
            text: &badge_text,
            color: C_SECONDARY,
        });
        let block = pane_chrome("breeds", Some('2'), true, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.list_area = inner;

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" no breeds loaded", style_muted())),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.list.ensure_visible(height);
        let committed = ctx.screen.selected_breed_index();
        let lines: Vec<Line> = self
            .list
            .visible_items(height)
            .into_iter()
            .map(|(i, breed)| {
                let marker = if Some(i) == committed { "● " } else { "  " };
                let style = if i == self.list.selected {
                    style_selected()
                } else {
                    style_default()
                };
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(C_ACCENT)),
                    Span::styled(breed.name.clone(), style),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn draw_details(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(6)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        match ctx.screen.breed_heading() {
            Some(heading) => {
                let mut title = vec![Span::styled(
                    heading.name.clone(),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                )];
                if let Some(origin) = &heading.origin {
                    title.push(Span::styled(
                        format!(" ({})", origin),
                        Style::default().fg(C_ORIGIN),
                    ));
                }
                title.push(Span::styled(format!("  [{}]", heading.id), style_muted()));
                lines.push(Line::from(title));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    ctx.screen.breed_description().to_string(),
                    style_secondary(),
                )));
                if let Some(link) = ctx.screen.wiki_link() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(vec![
                        Span::styled("wikipedia ", style_muted()),
                        Span::styled(link.to_string(), style_link()),
                    ]));
                }
            }
            None => lines.push(Line::from(Span::styled("select a breed", style_muted()))),
        }
        let block = pane_chrome("details", None, false, None);
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        self.draw_carousel(frame, rows[1], ctx);
    }

    fn draw_carousel(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        let paused = ctx.slideshow.is_some_and(|s| s.is_paused());
        let badge = paused.then_some(Badge {
            text: "paused",
            color: C_SECONDARY,
        });
        let block = pane_chrome("images", None, self.hovered, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.carousel_area = area;
        self.dot_areas.clear();

        let Some(show) = ctx.slideshow.filter(|s| !s.slides().is_empty()) else {
            frame.render_widget(
                Paragraph::new(Span::styled(" no images", style_muted())),
                inner,
            );
            return;
        };

        let current = show.current().map(|s| s.url.as_str()).unwrap_or_default();
        let mut lines = vec![
            Line::from(vec![Span::raw(" "), Span::styled(current.to_string(), style_link())]),
            Line::from(""),
        ];

        let dots_y = inner.y + 2;
        let mut x = inner.x + 1;
        let mut dots = vec![Span::raw(" ")];
        for i in 0..show.slides().len() {
            let active = i == show.index();
            dots.push(Span::styled(
                if active { "●" } else { "○" },
                if active {
                    Style::default().fg(C_ACCENT)
                } else {
                    style_muted()
                },
            ));
            dots.push(Span::raw(" "));
            if x < inner.x + inner.width && dots_y < inner.y + inner.height {
                self.dot_areas.push(Rect {
                    x,
                    y: dots_y,
                    width: 1,
                    height: 1,
                });
            }
            x += 2;
        }
        lines.push(Line::from(dots));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for BreedsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::BreedsPanel
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        self.sync(ctx);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),
            KeyCode::Enter => return self.commit(),
            KeyCode::Left | KeyCode::Char('h') => return Self::jump(ctx, false),
            KeyCode::Right | KeyCode::Char('l') => return Self::jump(ctx, true),
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Char('y') => {
                if let Some(slide) = ctx.slideshow.and_then(|s| s.current()) {
                    return vec![Action::CopyToClipboard(slide.url.clone())];
                }
            }
            KeyCode::Char('w') => {
                if let Some(link) = ctx.screen.wiki_link() {
                    return vec![Action::CopyToClipboard(link.to_string())];
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, ctx: &UiContext) -> Vec<Action> {
        let (col, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => {
                let inside = hit(self.carousel_area, col, row);
                if inside != self.hovered {
                    self.hovered = inside;
                    return vec![Action::CarouselHover(inside)];
                }
                vec![]
            }
            MouseEventKind::ScrollUp if hit(self.list_area, col, row) => {
                self.list.select_up(1);
                vec![]
            }
            MouseEventKind::ScrollDown if hit(self.list_area, col, row) => {
                self.list.select_down(1);
                vec![]
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if hit(self.list_area, col, row) {
                    self.sync(ctx);
                    if self
                        .list
                        .handle_click((row - self.list_area.y) as usize)
                        .is_some()
                    {
                        return self.commit();
                    }
                    return vec![];
                }
                if let Some(i) = self.dot_areas.iter().position(|r| hit(*r, col, row)) {
                    return vec![Action::CarouselJump(i)];
                }
                vec![]
            }
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        self.sync(ctx);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LIST_WIDTH), Constraint::Min(20)])
            .split(area);
        self.draw_list(frame, cols[0], ctx);
        self.draw_details(frame, cols[1], ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::view::{Screen, View};
    use ratatui::crossterm::event::KeyModifiers;

    fn breed(id: &str) -> BreedSummary {
        BreedSummary {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cursor_moves_then_enter_commits() {
        let mut screen = Screen::new();
        screen.set_breed_options(&[breed("abys"), breed("beng"), breed("chau")]);
        let session = SessionState::default();
        let ctx = UiContext {
            screen: &screen,
            session: &session,
            slideshow: None,
            log_lines: &[],
        };

        let mut panel = BreedsPanel::new();
        assert!(panel.handle_key(key(KeyCode::Down), &ctx).is_empty());
        assert!(panel.handle_key(key(KeyCode::Down), &ctx).is_empty());
        assert_eq!(
            panel.handle_key(key(KeyCode::Enter), &ctx),
            vec![Action::SelectBreed("chau".to_string())]
        );
    }

    #[test]
    fn test_cursor_follows_committed_selection() {
        let mut screen = Screen::new();
        screen.set_breed_options(&[breed("abys"), breed("beng")]);
        let session = SessionState::default();
        let mut panel = BreedsPanel::new();
        {
            let ctx = UiContext {
                screen: &screen,
                session: &session,
                slideshow: None,
                log_lines: &[],
            };
            panel.sync(&ctx);
        }
        screen.set_selected_breed("beng");
        let ctx = UiContext {
            screen: &screen,
            session: &session,
            slideshow: None,
            log_lines: &[],
        };
        panel.sync(&ctx);
        assert_eq!(panel.list.selected, 1);
    }
}

//! FavoritesPanel: the gallery in grid or column layout.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::action::{Action, ComponentId};
use crate::component::{hit, Component, UiContext};
use crate::theme::{
    style_link, style_muted, style_unfocused_border, C_ERROR, C_FAVORITE, C_MUTED, C_PRIMARY,
    C_SECONDARY,
};
use crate::view::{FavoritesContent, ListLayout, Tile};
use crate::widgets::pane_chrome::{pane_chrome, Badge};

/// Pixels of tile width per terminal cell.
const PX_PER_CELL: u16 = 8;
const GRID_TILE_HEIGHT: u16 = 3;

pub struct FavoritesPanel {
    scroll: usize,
    grid_button: Rect,
    column_button: Rect,
    body_area: Rect,
}

impl FavoritesPanel {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            grid_button: Rect::default(),
            column_button: Rect::default(),
            body_area: Rect::default(),
        }
    }

    fn draw_toolbar(&mut self, frame: &mut Frame, area: Rect, layout: Option<ListLayout>) {
        let button = |label: &'static str, active: bool| {
            let style = if active {
                Style::default()
                    .fg(C_PRIMARY)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            Span::styled(label, style)
        };
        let grid_label = " g ▦ grid ";
        let column_label = " c ☰ column ";
        let grid_w = grid_label.width() as u16;
        let column_w = column_label.width() as u16;

        self.grid_button = Rect {
            x: area.x + 1,
            y: area.y,
            width: grid_w,
            height: 1,
        };
        self.column_button = Rect {
            x: area.x + 1 + grid_w + 1,
            y: area.y,
            width: column_w,
            height: 1,
        };

        let line = Line::from(vec![
            Span::raw(" "),
            button(grid_label, layout == Some(ListLayout::Grid)),
            Span::raw(" "),
            button(column_label, layout == Some(ListLayout::Column)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_grid(&mut self, frame: &mut Frame, area: Rect, tiles: &[Tile]) {
        let Some(first) = tiles.first() else {
            return;
        };
        let tile_w = (first.width / PX_PER_CELL).max(8).min(area.width.max(1));
        let per_row = (area.width / (tile_w + 1)).max(1) as usize;
        let rows_total = tiles.len().div_ceil(per_row);
        let rows_visible = (area.height / GRID_TILE_HEIGHT) as usize;
        self.scroll = self.scroll.min(rows_total.saturating_sub(rows_visible.max(1)));

        for (r, chunk) in tiles
            .chunks(per_row)
            .skip(self.scroll)
            .take(rows_visible)
            .enumerate()
        {
            for (c, tile) in chunk.iter().enumerate() {
                let rect = Rect {
                    x: area.x + c as u16 * (tile_w + 1),
                    y: area.y + r as u16 * GRID_TILE_HEIGHT,
                    width: tile_w,
                    height: GRID_TILE_HEIGHT,
                };
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(style_unfocused_border());
                let inner = block.inner(rect);
                frame.render_widget(block, rect);
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        truncate(&tile.url, inner.width as usize),
                        style_link(),
                    )),
                    inner,
                );
            }
        }
    }

    fn draw_column(&mut self, frame: &mut Frame, area: Rect, tiles: &[Tile]) {
        let height = area.height as usize;
        self.scroll = self.scroll.min(tiles.len().saturating_sub(height.max(1)));
        let width = (area.width as usize).saturating_sub(3);
        let lines: Vec<Line> = tiles
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|tile| {
                Line::from(vec![
                    Span::styled(" ★ ", Style::default().fg(C_FAVORITE)),
                    Span::styled(truncate(&tile.url, width), style_link()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

impl Component for FavoritesPanel {
    fn id(&self) -> ComponentId {
        ComponentId::FavoritesPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &UiContext) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Char('g') => return vec![Action::GridView],
            KeyCode::Char('c') => return vec![Action::ColumnView],
            KeyCode::Char('r') => return vec![Action::Refresh],
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll += 10,
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _ctx: &UiContext) -> Vec<Action> {
        let (col, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if hit(self.grid_button, col, row) => {
                vec![Action::GridView]
            }
            MouseEventKind::Down(MouseButton::Left) if hit(self.column_button, col, row) => {
                vec![Action::ColumnView]
            }
            MouseEventKind::ScrollUp if hit(self.body_area, col, row) => {
                self.scroll = self.scroll.saturating_sub(1);
                vec![]
            }
            MouseEventKind::ScrollDown if hit(self.body_area, col, row) => {
                self.scroll += 1;
                vec![]
            }
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _ctx: &UiContext) -> Vec<Action> {
        if matches!(action, Action::GridView | Action::ColumnView | Action::Refresh) {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        let content = ctx.screen.favorites();
        let count = match content {
            FavoritesContent::Tiles(tiles) => tiles.len().to_string(),
            _ => String::new(),
        };
        let badge = (!count.is_empty()).then(|| Badge {
            text: &count,
            color: C_FAVORITE,
        });
        let block = pane_chrome("favorites", Some('3'), true, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        let layout = ctx.screen.list_layout();
        self.draw_toolbar(frame, rows[0], layout);
        self.body_area = rows[2];

        match content {
            FavoritesContent::Unloaded => frame.render_widget(
                Paragraph::new(Span::styled(" loading…", style_muted())),
                rows[2],
            ),
            FavoritesContent::Placeholder(text) => frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", text), Style::default().fg(C_MUTED)))
                    .wrap(Wrap { trim: false }),
                rows[2],
            ),
            FavoritesContent::Error(text) => frame.render_widget(
                Paragraph::new(Span::styled(format!(" {}", text), Style::default().fg(C_ERROR)))
                    .wrap(Wrap { trim: false }),
                rows[2],
            ),
            FavoritesContent::Tiles(tiles) => match layout {
                Some(ListLayout::Column) => self.draw_column(frame, rows[2], tiles),
                _ => self.draw_grid(frame, rows[2], tiles),
            },
        }
    }
}

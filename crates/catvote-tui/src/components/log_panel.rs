//! LogPanel component: tail of the log file.
//!
//! Shows one line (most recent log) when collapsed; expands to full panel.
//! Handles its own scroll state.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    component::{Component, UiContext},
    theme::{C_ERROR, C_MUTED, C_SECONDARY, C_TOAST_WARNING},
    widgets::pane_chrome::pane_chrome_borders,
};

pub struct LogPanel {
    pub expanded: bool,
    pub scroll: usize,
    /// Track last log count to detect new entries for auto-scroll
    last_log_count: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            expanded: false,
            scroll: 0,
            last_log_count: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
        if self.expanded {
            self.scroll = usize::MAX;
        }
    }
}

impl Component for LogPanel {
    fn id(&self) -> ComponentId {
        ComponentId::LogPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _ctx: &UiContext) -> Vec<Action> {
        if key.kind == KeyEventKind::Release || !self.expanded {
            return vec![];
        }
        match key.code {
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::End => self.scroll = usize::MAX,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _ctx: &UiContext) -> Vec<Action> {
        if !self.expanded {
            return vec![];
        }
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _ctx: &UiContext) -> Vec<Action> {
        if *action == Action::ToggleLogs {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext) {
        if area.height == 0 {
            return;
        }
        frame.render_widget(Clear, area);

        if !self.expanded || area.height <= 1 {
            let last = ctx
                .log_lines
                .last()
                .map(|s| compact_log_line(s))
                .unwrap_or_else(|| "(no log)".to_string());
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(" log ", Style::default().fg(C_MUTED)),
                    Span::styled(last, Style::default().fg(C_SECONDARY)),
                ])),
                area,
            );
            return;
        }

        let block = pane_chrome_borders(
            "log",
            None,
            false,
            None,
            Borders::LEFT | Borders::BOTTOM | Borders::RIGHT | Borders::TOP,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let logs = ctx.log_lines;
        let height = inner.height as usize;
        let log_count = logs.len();

        // Stick to the bottom while new lines arrive
        if log_count > self.last_log_count {
            let max_scroll = log_count.saturating_sub(height);
            if self.scroll >= max_scroll.saturating_sub(1) {
                self.scroll = usize::MAX;
            }
            self.last_log_count = log_count;
        }

        if logs.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no log entries yet",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let max_scroll = log_count.saturating_sub(height);
        self.scroll = self.scroll.min(max_scroll);

        let lines: Vec<Line> = logs
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|msg| {
                let compact = compact_log_line(msg);
                let color = if compact.contains("ERROR") {
                    C_ERROR
                } else if compact.contains("WARN") {
                    C_TOAST_WARNING
                } else {
                    C_MUTED
                };
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(compact, Style::default().fg(color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

// ── Log line formatting ───────────────────────────────────────────────────────

/// `2024-05-01T10:00:00.123Z  INFO catvote::controller: msg` → `10:00:00 INFO msg`.
fn compact_log_line(raw: &str) -> String {
    let clean = raw.trim();
    let mut rest = clean;
    let mut head: Vec<String> = Vec::new();

    if let Some((tok, rem)) = split_first_token(rest) {
        if let Some(ts) = compact_timestamp(tok) {
            head.push(ts);
            rest = rem.trim_start();
        }
    }

    if let Some((tok, rem)) = split_first_token(rest) {
        let upper = tok.to_ascii_uppercase();
        if matches!(
            upper.as_str(),
            "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR"
        ) {
            head.push(upper);
            rest = rem.trim_start();
        }
    }

    // Module path prefix like "catvote::breeds: "
    if let Some((left, msg)) = rest.split_once(": ") {
        if !left.is_empty()
            && left.len() <= 48
            && left
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':'))
        {
            rest = msg.trim_start();
        }
    }

    match (head.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => head.join(" "),
        (false, false) => format!("{} {}", head.join(" "), rest),
    }
}

fn compact_timestamp(token: &str) -> Option<String> {
    let dt = chrono::DateTime::parse_from_rfc3339(token).ok()?;
    let local = dt.with_timezone(&chrono::Local);
    let fmt = if local.date_naive() == chrono::Local::now().date_naive() {
        "%H:%M:%S"
    } else {
        "%m-%d %H:%M"
    };
    Some(local.format(fmt).to_string())
}

fn split_first_token(s: &str) -> Option<(&str, &str)> {
    let mut parts = s.splitn(2, char::is_whitespace);
    let first = parts.next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some((first, parts.next().unwrap_or("")))
}

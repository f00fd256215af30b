//! Toast notification system: transient status messages.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 4,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success, Duration::from_secs(3));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Warning, Duration::from_secs(4));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Drop expired toasts. Returns true when something was removed.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render toasts in the top-right corner of `area`, newest first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            if y >= area.y + area.height {
                break;
            }
            let msg_len = toast.message.chars().count() as u16;
            let w = (msg_len + 4).min(max_width);
            let x = area.x + area.width.saturating_sub(w + 1);

            let (color, icon) = match toast.severity {
                Severity::Info => (C_TOAST_INFO, "·"),
                Severity::Success => (C_TOAST_SUCCESS, "✓"),
                Severity::Warning => (C_TOAST_WARNING, "!"),
                Severity::Error => (C_TOAST_ERROR, "✗"),
            };

            let toast_area = Rect {
                x,
                y,
                width: w,
                height: 1,
            };
            frame.render_widget(Clear, toast_area);
            frame.render_widget(
                Paragraph::new(Line::from(vec![Span::styled(
                    format!(" {} {} ", icon, &toast.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )])),
                toast_area,
            );
            y += 1;
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_replaced() {
        let mut toasts = ToastManager::new();
        toasts.info("copied");
        toasts.success("copied");
        assert_eq!(toasts.toasts.len(), 1);
        assert_eq!(toasts.toasts[0].severity, Severity::Success);
    }

    #[test]
    fn test_expired_toasts_dropped() {
        let mut toasts = ToastManager::new();
        toasts.push("gone", Severity::Info, Duration::ZERO);
        assert!(toasts.tick());
        assert!(toasts.is_empty());
    }
}

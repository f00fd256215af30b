//! Status bar: bottom line with the page label and its keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::navigation::Page;
use crate::theme::{C_MODE, C_MUTED};

fn page_keys(page: Page) -> &'static str {
    match page {
        Page::Voting => " l like  d dislike  f favorite  r new image  y copy url",
        Page::Breeds => " ↑↓/jk move  Enter select  ←→ slide  y copy slide  w copy wiki",
        Page::Favorites => " g grid  c column  ↑↓/jk scroll  r reload",
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, page: Page) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", page.key().to_uppercase()),
            Style::default().fg(C_MODE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(page_keys(page), Style::default().fg(C_MUTED)),
        Span::styled(
            "  Tab/1-3 pages  [ ] back/fwd  K keys  L logs  ? help  q quit",
            Style::default().fg(C_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

//! Component trait: the interface every UI panel implements.
//!
//! - Components own their presentation state (cursor, scroll, hit areas).
//! - Page data comes from the controller's view model through [`UiContext`].
//! - Components produce `Vec<Action>`; they never call the controller.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::carousel::SlideShow;
use crate::session::SessionState;
use crate::view::Screen;

/// Read-only data handed to components each frame.
pub struct UiContext<'a> {
    pub screen: &'a Screen,
    pub session: &'a SessionState,
    pub slideshow: Option<&'a SlideShow>,
    pub log_lines: &'a [String],
}

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Returns actions to be dispatched.
    /// Only called for the component of the visible page (or an open overlay).
    fn handle_key(&mut self, key: KeyEvent, ctx: &UiContext) -> Vec<Action>;

    /// Handle a mouse event inside `area`.
    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, ctx: &UiContext) -> Vec<Action>;

    /// React to an action dispatched by the App.
    fn on_action(&mut self, _action: &Action, _ctx: &UiContext) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, ctx: &UiContext);
}

/// Whether (col, row) falls inside `r`.
pub fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

//! Action enum: all user-initiated intents and internal events.

use catvote_proto::protocol::VoteAction;

use crate::navigation::Page;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    TabBar,
    VotingPanel,
    BreedsPanel,
    FavoritesPanel,
    LogPanel,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    OpenTab(Page),
    NextTab,
    PrevTab,
    HistoryBack,
    HistoryForward,
    /// Re-run the current page's loader.
    Refresh,

    // ── Voting ───────────────────────────────────────────────────────────────
    Vote(VoteAction),

    // ── Breeds ───────────────────────────────────────────────────────────────
    SelectBreed(String),
    CarouselHover(bool),
    CarouselJump(usize),

    // ── Favorites ────────────────────────────────────────────────────────────
    GridView,
    ColumnView,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleLogs,
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Noop,
}

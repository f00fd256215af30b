pub mod breeds_panel;
pub mod favorites_panel;
pub mod help_overlay;
pub mod log_panel;
pub mod tab_bar;
pub mod voting_panel;

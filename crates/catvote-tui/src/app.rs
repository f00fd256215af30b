//! App: component-based event loop around the navigation controller.
//!
//! Architecture:
//! - `App` owns the controller (page state + view model) and the components.
//! - A blocking reader task feeds terminal input into a `tokio::mpsc` channel.
//! - Components turn input into `Vec<Action>`; the App dispatches each Action.
//! - Backend requests run on spawned tasks and come back as
//!   `AppMessage::Loaded`, which the controller applies on this task. Input,
//!   carousel ticks and redraws keep flowing while a request is outstanding.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use catvote_proto::client::HttpClient;
use catvote_proto::protocol::VoteAction;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    action::Action,
    carousel::TerminalCarousel,
    component::{hit, Component, UiContext},
    components::{
        breeds_panel::BreedsPanel, favorites_panel::FavoritesPanel, help_overlay::HelpOverlay,
        log_panel::LogPanel, tab_bar::TabBar, voting_panel::VotingPanel,
    },
    controller::Controller,
    navigation::Page,
    request::{execute, Loaded, Request},
    view::Screen,
    widgets::{status_bar, toast::ToastManager},
};

pub type AppController = Controller<HttpClient, Screen, TerminalCarousel>;

const LOG_TAIL_LINES: usize = 500;

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Loaded(Loaded),
}

/// Areas from the last frame, for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    tab_bar: Rect,
    page: Rect,
    log_panel: Rect,
}

pub struct App {
    controller: AppController,
    start_location: String,
    log_path: PathBuf,
    log_lines: Vec<String>,

    tab_bar: TabBar,
    voting_panel: VotingPanel,
    breeds_panel: BreedsPanel,
    favorites_panel: FavoritesPanel,
    log_panel: LogPanel,
    help_overlay: HelpOverlay,
    toast: ToastManager,

    show_keys_bar: bool,
    pane_areas: PaneAreas,
    /// Where spawned requests report back; set in `event_loop`.
    loaded_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

fn ui_context<'a>(controller: &'a AppController, log_lines: &'a [String]) -> UiContext<'a> {
    UiContext {
        screen: controller.view(),
        session: controller.session(),
        slideshow: controller.breeds().carousel().carousel().slideshow(),
        log_lines,
    }
}

impl App {
    pub fn new(controller: AppController, start_location: String, log_path: PathBuf) -> Self {
        Self {
            controller,
            start_location,
            log_path,
            log_lines: Vec::new(),
            tab_bar: TabBar::new(),
            voting_panel: VotingPanel::new(),
            breeds_panel: BreedsPanel::new(),
            favorites_panel: FavoritesPanel::new(),
            log_panel: LogPanel::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            show_keys_bar: true,
            pane_areas: PaneAreas::default(),
            loaded_tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            if event_tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        });
        self.loaded_tx = Some(tx);

        // Carousel autoplay + toast expiry.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // Log panel tail.
        let mut log_refresh = tokio::time::interval(Duration::from_secs(2));
        log_refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let page = self.controller.begin_startup(&self.start_location);
        info!("catvote started on {}", page);
        self.refresh();
        self.reload_log();

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = ui_tick.tick() => {
                    let moved = self
                        .controller
                        .breeds_mut()
                        .carousel_mut()
                        .carousel_mut()
                        .slideshow_mut()
                        .is_some_and(|s| s.tick(Instant::now()));
                    let expired = self.toast.tick();
                    needs_redraw = expired
                        || (moved && self.controller.current_page() == Page::Breeds);
                }

                _ = log_refresh.tick() => {
                    self.reload_log();
                    needs_redraw = true;
                }
            }
        }

        Ok(())
    }

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a);
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    let redraw = !actions.is_empty()
                        || !matches!(mouse.kind, MouseEventKind::Moved);
                    for a in actions {
                        self.dispatch(a);
                    }
                    redraw
                }
                Event::Resize(_, _) => true,
                _ => false,
            },
            AppMessage::Loaded(loaded) => {
                if let Loaded::Vote { action, result, .. } = &loaded {
                    self.toast_vote(*action, result.is_ok());
                }
                if let Some(next) = self.controller.apply(loaded) {
                    self.spawn_request(next);
                }
                true
            }
        }
    }

    // ── Backend requests ──────────────────────────────────────────────────────

    fn spawn_request(&self, request: Request) {
        let Some(tx) = self.loaded_tx.clone() else {
            warn!("request dropped, event loop not running: {:?}", request);
            return;
        };
        let api = self.controller.api().clone();
        debug!("request: {:?}", request);
        tokio::spawn(async move {
            let loaded = execute(&api, request).await;
            let _ = tx.send(AppMessage::Loaded(loaded)).await;
        });
    }

    /// Request whatever the current page shows.
    fn refresh(&mut self) {
        if let Some(request) = self.controller.refresh_request() {
            self.spawn_request(request);
        }
    }

    fn toast_vote(&mut self, action: VoteAction, accepted: bool) {
        match (action, accepted) {
            (_, false) => self.toast.error("vote failed, see log (L)"),
            (VoteAction::Like, true) => self.toast.success("liked"),
            (VoteAction::Dislike, true) => self.toast.info("disliked"),
            (VoteAction::Favorite, true) => self.toast.success("added to favorites"),
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let ctx = ui_context(&self.controller, &self.log_lines);

        // Global keys: always active
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            _ => {}
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &ctx);
        }

        // Shift+PgUp/PgDn/End scroll the expanded log panel
        if key.modifiers.contains(KeyModifiers::SHIFT)
            && matches!(key.code, KeyCode::PageUp | KeyCode::PageDown | KeyCode::End)
        {
            return self.log_panel.handle_key(key, &ctx);
        }

        let current = self.controller.current_page();
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => return vec![Action::Quit],
            KeyCode::Char('L') => return vec![Action::ToggleLogs],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            KeyCode::Tab => return vec![Action::NextTab],
            KeyCode::BackTab => return vec![Action::PrevTab],
            KeyCode::Char('[') => return vec![Action::HistoryBack],
            KeyCode::Char(']') => return vec![Action::HistoryForward],
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as u8 - b'1') as usize;
                return vec![Action::OpenTab(Page::ALL[idx])];
            }
            _ => {}
        }

        match current {
            Page::Voting => self.voting_panel.handle_key(key, &ctx),
            Page::Breeds => self.breeds_panel.handle_key(key, &ctx),
            Page::Favorites => self.favorites_panel.handle_key(key, &ctx),
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let current = self.controller.current_page();
        let ctx = ui_context(&self.controller, &self.log_lines);
        let areas = self.pane_areas;

        // Hover only matters for the carousel
        if event.kind == MouseEventKind::Moved {
            if current == Page::Breeds && !self.help_overlay.visible {
                return self.breeds_panel.handle_mouse(event, areas.page, &ctx);
            }
            return vec![];
        }

        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant || self.help_overlay.visible {
            return vec![];
        }

        let (col, row) = (event.column, event.row);
        if hit(areas.tab_bar, col, row) {
            return self.tab_bar.handle_mouse(event, areas.tab_bar, &ctx);
        }
        if hit(areas.log_panel, col, row) {
            return self.log_panel.handle_mouse(event, areas.log_panel, &ctx);
        }
        if hit(areas.page, col, row) {
            return match current {
                Page::Voting => self.voting_panel.handle_mouse(event, areas.page, &ctx),
                Page::Breeds => self.breeds_panel.handle_mouse(event, areas.page, &ctx),
                Page::Favorites => self.favorites_panel.handle_mouse(event, areas.page, &ctx),
            };
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Let every component react first
        let secondary: Vec<Action> = {
            let ctx = ui_context(&self.controller, &self.log_lines);
            let mut out = Vec::new();
            out.extend(self.tab_bar.on_action(&action, &ctx));
            out.extend(self.voting_panel.on_action(&action, &ctx));
            out.extend(self.breeds_panel.on_action(&action, &ctx));
            out.extend(self.favorites_panel.on_action(&action, &ctx));
            out.extend(self.log_panel.on_action(&action, &ctx));
            out.extend(self.help_overlay.on_action(&action, &ctx));
            out
        };

        self.apply_action(action);

        // Secondary actions, one level deep
        for a in secondary {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::OpenTab(page) => self.open_tab(page),
            Action::NextTab => self.open_tab(self.controller.current_page().next()),
            Action::PrevTab => self.open_tab(self.controller.current_page().prev()),
            Action::HistoryBack => match self.controller.begin_back() {
                Some(_) => self.refresh(),
                None => self.toast.info("no earlier page"),
            },
            Action::HistoryForward => match self.controller.begin_forward() {
                Some(_) => self.refresh(),
                None => self.toast.info("no later page"),
            },
            Action::Refresh => {
                let page = self.controller.current_page();
                self.controller.show_page(page);
                self.refresh();
            }

            Action::Vote(vote) => {
                if self.controller.current_page() != Page::Voting {
                    return;
                }
                match self.controller.vote_request(vote) {
                    Some(request) => self.spawn_request(request),
                    None => self.toast.warning("no image loaded yet"),
                }
            }

            Action::SelectBreed(id) => {
                let request = self.controller.select_breed_request(&id);
                self.spawn_request(request);
            }
            Action::CarouselHover(hovered) => {
                if let Some(show) = self
                    .controller
                    .breeds_mut()
                    .carousel_mut()
                    .carousel_mut()
                    .slideshow_mut()
                {
                    show.set_hovered(hovered);
                }
            }
            Action::CarouselJump(index) => {
                if let Some(show) = self
                    .controller
                    .breeds_mut()
                    .carousel_mut()
                    .carousel_mut()
                    .slideshow_mut()
                {
                    show.go_to(index, Instant::now());
                }
            }

            Action::GridView => self.controller.show_grid(),
            Action::ColumnView => self.controller.show_column(),

            Action::ToggleLogs => self.reload_log(),
            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            Action::ToggleHelp | Action::Noop => {}

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    fn open_tab(&mut self, page: Page) {
        self.controller.begin_tab(page);
        self.refresh();
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let log_h = if self.log_panel.expanded { 10u16 } else { 1 };
        let status_h = if self.show_keys_bar { 1u16 } else { 0 };

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(log_h),
                Constraint::Length(status_h),
            ])
            .split(area);

        self.pane_areas = PaneAreas {
            tab_bar: outer[0],
            page: outer[1],
            log_panel: outer[2],
        };

        let ctx = ui_context(&self.controller, &self.log_lines);
        self.tab_bar.draw(frame, outer[0], &ctx);

        // Only the visible section is drawn.
        match ctx.screen.visible_page() {
            Some(Page::Voting) => self.voting_panel.draw(frame, outer[1], &ctx),
            Some(Page::Breeds) => self.breeds_panel.draw(frame, outer[1], &ctx),
            Some(Page::Favorites) => self.favorites_panel.draw(frame, outer[1], &ctx),
            None => {}
        }

        self.log_panel.draw(frame, outer[2], &ctx);

        if self.show_keys_bar {
            status_bar::draw_keys_bar(frame, outer[3], ctx.session.current_page());
        }

        // ── Help overlay (on top of everything) ──────────────────────────────
        self.help_overlay.draw(frame, area, &ctx);

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }

    /// Read the last lines of the log file (synchronous, cheap).
    fn reload_log(&mut self) {
        if let Ok(content) = std::fs::read_to_string(&self.log_path) {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(LOG_TAIL_LINES);
            self.log_lines = lines[start..].iter().map(|l| l.to_string()).collect();
        }
    }
}

//! Navigation controller: single-page router and state sync.
//!
//! Owns the session state, the view, and the page loaders. Every page switch
//! is two steps: [`Controller::show_page`] flips visibility synchronously,
//! then the page's [`Request`] runs and [`Controller::apply`] folds the
//! result back in. The event loop runs requests on spawned tasks, so input
//! is handled while a response is outstanding and the last response to
//! arrive wins. The `async` operations below run the same steps inline.

use catvote_proto::client::{CatApi, ClientError};
use catvote_proto::protocol::{ActionOutcome, CatImage, VoteAction};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::breeds::BreedPanel;
use crate::carousel::{Carousel, CarouselAdapter};
use crate::favorites::FavoritesStore;
use crate::navigation::{resolve_location, History, Page, Resolved};
use crate::request::{execute, Loaded, Request};
use crate::session::SessionState;
use crate::view::{ListLayout, View};
use crate::view_toggle::ViewToggle;

pub struct Controller<A: CatApi, V: View, C: Carousel> {
    api: A,
    view: V,
    session: SessionState,
    favorites: FavoritesStore,
    breeds: BreedPanel<C>,
    toggle: Option<ViewToggle>,
    history: History,
}

impl<A: CatApi, V: View, C: Carousel> Controller<A, V, C> {
    pub fn new(api: A, mut view: V, favorites: FavoritesStore, carousel: CarouselAdapter<C>) -> Self {
        let session = SessionState::new(favorites.initial());
        let toggle = ViewToggle::init(&mut view);
        Self {
            api,
            view,
            session,
            favorites,
            breeds: BreedPanel::new(carousel),
            toggle,
            history: History::new(Page::Voting.fragment()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn breeds(&self) -> &BreedPanel<C> {
        &self.breeds
    }

    pub fn breeds_mut(&mut self) -> &mut BreedPanel<C> {
        &mut self.breeds
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_page(&self) -> Page {
        self.session.current_page
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    /// Switch the visible section and tab marker. No I/O.
    pub fn show_page(&mut self, page: Page) {
        for p in Page::ALL {
            self.view.set_section_visible(p, false);
            self.view.set_tab_active(p, false);
        }
        if page == Page::Voting {
            self.session.clear_image();
            self.view.set_voting_image("");
        }
        self.view.set_section_visible(page, true);
        self.view.set_tab_active(page, true);
        self.session.current_page = page;
        debug!("navigate: showing {}", page);
    }

    /// What the current page needs from the backend. The local favorites
    /// gallery renders right away and needs nothing.
    pub fn refresh_request(&mut self) -> Option<Request> {
        match self.session.current_page {
            Page::Voting => Some(Request::RandomImage),
            Page::Breeds => {
                if self.view.breed_option_count() == 0 {
                    Some(Request::Breeds)
                } else {
                    self.session.current_breed_id.clone().map(Request::BreedDetails)
                }
            }
            Page::Favorites => self.favorites_request(),
        }
    }

    /// Load whatever the current page displays.
    pub async fn refresh_page(&mut self) {
        if let Some(request) = self.refresh_request() {
            self.run(request).await;
        }
    }

    pub async fn navigate_to_page(&mut self, page: Page) {
        self.show_page(page);
        self.refresh_page().await;
    }

    /// Resolve a `#page` location and show it. Unknown pages fall back to voting.
    pub fn begin_location(&mut self, location: &str) -> Page {
        let page = match resolve_location(location) {
            Resolved::Page(page) => page,
            Resolved::Default => Page::Voting,
            Resolved::Unknown(fragment) => {
                warn!("navigate: unknown page '{}', showing voting", fragment);
                Page::Voting
            }
        };
        self.show_page(page);
        page
    }

    pub async fn load_initial_page(&mut self, location: &str) {
        self.begin_location(location);
        self.refresh_page().await;
    }

    /// Startup: the given location becomes the root of the history.
    pub fn begin_startup(&mut self, location: &str) -> Page {
        let page = self.begin_location(location);
        self.history = History::new(page.fragment());
        info!("navigate: starting on {}", page);
        page
    }

    /// Tab selection: record it in the history and show the page.
    pub fn begin_tab(&mut self, page: Page) {
        self.history.push(page.fragment());
        self.show_page(page);
    }

    pub async fn open_tab(&mut self, page: Page) {
        self.begin_tab(page);
        self.refresh_page().await;
    }

    pub fn begin_back(&mut self) -> Option<Page> {
        let location = self.history.back()?.to_string();
        Some(self.begin_location(&location))
    }

    pub fn begin_forward(&mut self) -> Option<Page> {
        let location = self.history.forward()?.to_string();
        Some(self.begin_location(&location))
    }

    pub async fn go_back(&mut self) {
        if self.begin_back().is_some() {
            self.refresh_page().await;
        }
    }

    pub async fn go_forward(&mut self) {
        if self.begin_forward().is_some() {
            self.refresh_page().await;
        }
    }

    // ── Requests ─────────────────────────────────────────────────────────────

    /// Fold a finished exchange into the session and the view. Returns the
    /// follow-up request, if the result calls for one.
    pub fn apply(&mut self, loaded: Loaded) -> Option<Request> {
        match loaded {
            Loaded::RandomImage(Ok(image)) => self.show_image(image),
            Loaded::RandomImage(Err(e)) => error!("Error fetching random image: {}", e),
            Loaded::Vote {
                action,
                target,
                result,
            } => return self.apply_vote(action, &target, result),
            Loaded::Breeds(result) => {
                return self
                    .breeds
                    .show_breeds(&mut self.view, result)
                    .map(Request::BreedDetails);
            }
            Loaded::BreedDetails { breed_id, result } => {
                self.breeds
                    .show_breed_details(&mut self.view, &mut self.session, &breed_id, result)
            }
            Loaded::Favorites(result) => {
                self.favorites
                    .show_fetched(&mut self.view, &mut self.session, result)
            }
        }
        None
    }

    /// Execute `request` and its follow-ups inline. Returns whether the
    /// first exchange succeeded.
    async fn run(&mut self, request: Request) -> bool {
        let loaded = execute(&self.api, request).await;
        let ok = loaded.is_ok();
        let mut next = self.apply(loaded);
        while let Some(request) = next {
            let loaded = execute(&self.api, request).await;
            next = self.apply(loaded);
        }
        ok
    }

    // ── Voting ───────────────────────────────────────────────────────────────

    pub async fn load_random_image(&mut self) {
        self.run(Request::RandomImage).await;
    }

    /// Request for voting on the image currently on screen, if there is one.
    pub fn vote_request(&self, action: VoteAction) -> Option<Request> {
        let Some(target) = self.session.current_image() else {
            warn!("vote: no image loaded, ignoring {}", action.as_str());
            return None;
        };
        Some(Request::Vote { action, target })
    }

    /// Like, dislike or favorite the current image. Returns whether the
    /// backend accepted it.
    pub async fn handle_vote(&mut self, action: VoteAction) -> bool {
        match self.vote_request(action) {
            Some(request) => self.run(request).await,
            None => false,
        }
    }

    pub async fn handle_favorite(&mut self) -> bool {
        self.handle_vote(VoteAction::Favorite).await
    }

    fn apply_vote(
        &mut self,
        action: VoteAction,
        target: &CatImage,
        result: Result<ActionOutcome, ClientError>,
    ) -> Option<Request> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if action == VoteAction::Favorite => {
                error!("Error adding favorite: {}", e);
                return None;
            }
            Err(e) => {
                error!("Error submitting {}: {}", action.as_str(), e);
                return None;
            }
        };
        if action == VoteAction::Favorite {
            self.favorites
                .record(&mut self.session, target, outcome.favorites, Utc::now());
        }
        self.show_image(outcome.next);

        // A favorite that lands after switching to the gallery shows up there.
        if action == VoteAction::Favorite && self.session.current_page == Page::Favorites {
            return self.favorites_request();
        }
        None
    }

    fn show_image(&mut self, image: CatImage) {
        self.view.set_voting_image(&image.url);
        self.session.set_image(image);
    }

    // ── Breeds ───────────────────────────────────────────────────────────────

    pub async fn load_breeds(&mut self) {
        self.run(Request::Breeds).await;
    }

    pub async fn load_breed_details(&mut self, breed_id: &str) {
        self.run(Request::BreedDetails(breed_id.to_string())).await;
    }

    /// Selector change: mark the breed and return the details request.
    pub fn select_breed_request(&mut self, breed_id: &str) -> Request {
        self.breeds
            .select_breed(&mut self.view, &mut self.session, breed_id);
        Request::BreedDetails(breed_id.to_string())
    }

    pub async fn select_breed(&mut self, breed_id: &str) {
        let request = self.select_breed_request(breed_id);
        self.run(request).await;
    }

    // ── Favorites ────────────────────────────────────────────────────────────

    /// Server favorites need a fetch; local ones render from the session now.
    fn favorites_request(&mut self) -> Option<Request> {
        if self.favorites.fetches() {
            return Some(Request::Favorites);
        }
        self.favorites.render(&mut self.view, &self.session);
        None
    }

    pub async fn display_favorites(&mut self) {
        if let Some(request) = self.favorites_request() {
            self.run(request).await;
        }
    }

    pub fn show_grid(&mut self) {
        if let Some(toggle) = self.toggle.as_mut() {
            toggle.show_grid(&mut self.view);
        }
    }

    pub fn show_column(&mut self) {
        if let Some(toggle) = self.toggle.as_mut() {
            toggle.show_column(&mut self.view);
        }
    }

    pub fn list_layout(&self) -> Option<ListLayout> {
        self.toggle.map(|t| t.layout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    use catvote_proto::client::{ClientError, StatusCode};
    use catvote_proto::protocol::{
        ActionOutcome, Breed, BreedDetails, BreedImage, BreedSummary, Favorite, FavoriteImage,
        FavoriteRecord,
    };
    use catvote_proto::store::LocalStore;

    use crate::carousel::{CarouselOptions, Slide};
    use crate::favorites::{EMPTY_MESSAGE, ERROR_MESSAGE};
    use crate::view::{BreedHeading, ElementId, FavoritesContent, Screen};

    // ── Fakes ────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct FakeApi {
        served: Cell<usize>,
        hang_random: Cell<bool>,
        vote_error: Cell<bool>,
        actions: RefCell<Vec<(VoteAction, String, Option<String>)>>,
        action_favorites: RefCell<Option<Vec<Favorite>>>,
        breeds: RefCell<Option<Vec<BreedSummary>>>,
        details: RefCell<HashMap<String, BreedDetails>>,
        breed_list_calls: Cell<usize>,
        detail_calls: RefCell<Vec<String>>,
        favorites: RefCell<Option<Vec<Favorite>>>,
    }

    impl FakeApi {
        fn next_image(&self) -> CatImage {
            let n = self.served.get() + 1;
            self.served.set(n);
            CatImage {
                url: format!("https://cdn/cat-{}.jpg", n),
                id: Some(format!("cat-{}", n)),
            }
        }

        fn with_breeds(self, entries: &[(&str, &str, usize)]) -> Self {
            *self.breeds.borrow_mut() = Some(
                entries
                    .iter()
                    .map(|(id, name, _)| BreedSummary {
                        id: id.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
            );
            for (id, name, images) in entries {
                self.details
                    .borrow_mut()
                    .insert(id.to_string(), details(id, name, *images));
            }
            self
        }
    }

    impl CatApi for FakeApi {
        async fn fetch_random_image(&self) -> Result<CatImage, ClientError> {
            if self.hang_random.get() {
                std::future::pending::<()>().await;
            }
            Ok(self.next_image())
        }

        async fn submit_action(
            &self,
            action: VoteAction,
            image_url: &str,
            image_id: Option<&str>,
        ) -> Result<ActionOutcome, ClientError> {
            self.actions.borrow_mut().push((
                action,
                image_url.to_string(),
                image_id.map(str::to_string),
            ));
            if self.vote_error.get() {
                return Err(ClientError::Backend("Invalid action".to_string()));
            }
            Ok(ActionOutcome {
                next: self.next_image(),
                favorites: self.action_favorites.borrow().clone(),
            })
        }

        async fn fetch_breeds(&self) -> Result<Vec<BreedSummary>, ClientError> {
            self.breed_list_calls.set(self.breed_list_calls.get() + 1);
            self.breeds.borrow().clone().ok_or(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                context: "fetch breeds",
            })
        }

        async fn fetch_breed_details(&self, breed_id: &str) -> Result<BreedDetails, ClientError> {
            self.detail_calls.borrow_mut().push(breed_id.to_string());
            self.details
                .borrow()
                .get(breed_id)
                .cloned()
                .ok_or(ClientError::Status {
                    status: StatusCode::NOT_FOUND,
                    context: "fetch breed details",
                })
        }

        async fn fetch_favorites(&self) -> Result<Vec<Favorite>, ClientError> {
            self.favorites
                .borrow()
                .clone()
                .ok_or_else(|| ClientError::Backend("Failed to fetch favorites".to_string()))
        }
    }

    fn details(id: &str, name: &str, images: usize) -> BreedDetails {
        BreedDetails {
            breed: Breed {
                id: id.to_string(),
                name: name.to_string(),
                origin: Some(format!("{} land", name)),
                description: format!("All about {}", name),
                wikipedia_url: Some(format!("https://en.wikipedia.org/wiki/{}", name)),
            },
            images: (0..images)
                .map(|i| BreedImage {
                    url: format!("https://cdn/{}-{}.jpg", id, i),
                    id: None,
                })
                .collect(),
        }
    }

    /// Records every build/destroy so the live count can be checked.
    #[derive(Default)]
    struct CountingCarousel {
        live: usize,
        max_live: usize,
        last_slides: Vec<Slide>,
    }

    impl Carousel for CountingCarousel {
        type Handle = ();

        fn build(&mut self, slides: &[Slide], _options: &CarouselOptions) {
            self.live += 1;
            self.max_live = self.max_live.max(self.live);
            self.last_slides = slides.to_vec();
        }

        fn destroy(&mut self, _handle: ()) {
            self.live -= 1;
        }
    }

    /// A view the test can read while a controller future holds `&mut`.
    #[derive(Clone, Default)]
    struct SharedScreen(Rc<RefCell<Screen>>);

    impl View for SharedScreen {
        fn has_element(&self, id: ElementId) -> bool {
            self.0.borrow().has_element(id)
        }
        fn set_section_visible(&mut self, page: Page, visible: bool) {
            self.0.borrow_mut().set_section_visible(page, visible)
        }
        fn set_tab_active(&mut self, page: Page, active: bool) {
            self.0.borrow_mut().set_tab_active(page, active)
        }
        fn set_voting_image(&mut self, src: &str) {
            self.0.borrow_mut().set_voting_image(src)
        }
        fn breed_option_count(&self) -> usize {
            self.0.borrow().breed_option_count()
        }
        fn set_breed_options(&mut self, options: &[BreedSummary]) {
            self.0.borrow_mut().set_breed_options(options)
        }
        fn set_selected_breed(&mut self, id: &str) {
            self.0.borrow_mut().set_selected_breed(id)
        }
        fn set_breed_heading(&mut self, heading: BreedHeading) {
            self.0.borrow_mut().set_breed_heading(heading)
        }
        fn set_breed_description(&mut self, text: &str) {
            self.0.borrow_mut().set_breed_description(text)
        }
        fn set_wiki_link(&mut self, href: Option<&str>) {
            self.0.borrow_mut().set_wiki_link(href)
        }
        fn set_favorites(&mut self, content: FavoritesContent) {
            self.0.borrow_mut().set_favorites(content)
        }
        fn set_list_layout(&mut self, layout: ListLayout) {
            self.0.borrow_mut().set_list_layout(layout)
        }
    }

    type TestController = Controller<FakeApi, Screen, CountingCarousel>;

    fn controller(api: FakeApi) -> TestController {
        Controller::new(
            api,
            Screen::new(),
            FavoritesStore::server(200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        )
    }

    fn stamped(url: &str, ts: &str) -> Favorite {
        Favorite::Record(FavoriteRecord {
            created_at: Some(ts.to_string()),
            image: FavoriteImage {
                id: None,
                url: url.to_string(),
            },
            ..FavoriteRecord::default()
        })
    }

    fn tile_urls(screen: &Screen) -> Vec<String> {
        match screen.favorites() {
            FavoritesContent::Tiles(tiles) => tiles.iter().map(|t| t.url.clone()).collect(),
            other => panic!("expected tiles, got {:?}", other),
        }
    }

    // ── Navigation ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_exactly_one_page_visible_and_active() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 2)]);
        *api.favorites.borrow_mut() = Some(Vec::new());
        let mut c = controller(api);

        for page in [Page::Breeds, Page::Favorites, Page::Voting, Page::Breeds] {
            c.navigate_to_page(page).await;
            assert_eq!(c.view().visible_pages(), vec![page]);
            assert_eq!(c.view().active_tabs(), vec![page]);
            assert_eq!(c.current_page(), page);
        }
    }

    #[tokio::test]
    async fn test_entering_voting_clears_image_before_fetch() {
        let screen = SharedScreen::default();
        let mut c = Controller::new(
            FakeApi::default(),
            screen.clone(),
            FavoritesStore::server(200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        );
        c.navigate_to_page(Page::Voting).await;
        assert_eq!(screen.0.borrow().voting_image(), "https://cdn/cat-1.jpg");

        c.api().hang_random.set(true);
        {
            let fut = c.navigate_to_page(Page::Voting);
            tokio::pin!(fut);
            assert!(futures_util::poll!(&mut fut).is_pending());
            assert_eq!(screen.0.borrow().voting_image(), "");
            assert_eq!(screen.0.borrow().visible_page(), Some(Page::Voting));
        }
        assert_eq!(c.session().current_image(), None);
    }

    #[tokio::test]
    async fn test_show_page_is_synchronous() {
        let mut c = controller(FakeApi::default());
        c.navigate_to_page(Page::Voting).await;
        assert!(c.session().current_image().is_some());

        c.show_page(Page::Voting);
        assert_eq!(c.view().voting_image(), "");
        assert_eq!(c.session().current_image_url(), "");
        assert_eq!(c.api().served.get(), 1);
    }

    #[tokio::test]
    async fn test_initial_location_resolution() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 1)]);
        let mut c = controller(api);

        c.load_initial_page("#breeds").await;
        assert_eq!(c.current_page(), Page::Breeds);

        c.load_initial_page("").await;
        assert_eq!(c.current_page(), Page::Voting);

        c.load_initial_page("#breeds").await;
        c.load_initial_page("#settings").await;
        assert_eq!(c.current_page(), Page::Voting);
        assert_eq!(c.view().visible_pages(), vec![Page::Voting]);
    }

    #[tokio::test]
    async fn test_history_renavigates_without_pushing() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 1)]);
        *api.favorites.borrow_mut() = Some(Vec::new());
        let mut c = controller(api);

        c.begin_startup("");
        c.refresh_page().await;
        c.open_tab(Page::Breeds).await;
        c.open_tab(Page::Favorites).await;
        assert_eq!(c.history().len(), 3);

        c.go_back().await;
        assert_eq!(c.current_page(), Page::Breeds);
        c.go_back().await;
        assert_eq!(c.current_page(), Page::Voting);
        // Nothing further back; stays put.
        c.go_back().await;
        assert_eq!(c.current_page(), Page::Voting);

        c.go_forward().await;
        assert_eq!(c.current_page(), Page::Breeds);
        assert_eq!(c.history().len(), 3);
        assert_eq!(c.view().visible_pages(), vec![Page::Breeds]);
    }

    // ── Voting ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_vote_posts_current_and_shows_next() {
        let mut c = controller(FakeApi::default());
        c.navigate_to_page(Page::Voting).await;

        c.handle_vote(VoteAction::Like).await;
        assert_eq!(
            c.api().actions.borrow()[0],
            (
                VoteAction::Like,
                "https://cdn/cat-1.jpg".to_string(),
                Some("cat-1".to_string())
            )
        );
        assert_eq!(c.session().current_image_url(), "https://cdn/cat-2.jpg");
        assert_eq!(c.session().current_image_id(), Some("cat-2"));
        assert_eq!(c.view().voting_image(), "https://cdn/cat-2.jpg");
    }

    #[tokio::test]
    async fn test_vote_error_keeps_current_image() {
        let mut c = controller(FakeApi::default());
        c.navigate_to_page(Page::Voting).await;
        c.api().vote_error.set(true);

        c.handle_vote(VoteAction::Dislike).await;
        assert_eq!(c.session().current_image_url(), "https://cdn/cat-1.jpg");
        assert_eq!(c.view().voting_image(), "https://cdn/cat-1.jpg");
    }

    #[tokio::test]
    async fn test_vote_without_image_is_skipped() {
        let mut c = controller(FakeApi::default());
        c.show_page(Page::Voting);
        c.handle_vote(VoteAction::Like).await;
        assert!(c.api().actions.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_local_favorite_persists_before_return() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut c = Controller::new(
            FakeApi::default(),
            Screen::new(),
            FavoritesStore::local(LocalStore::open(&path), 200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        );
        c.navigate_to_page(Page::Voting).await;

        c.handle_favorite().await;
        let stored = LocalStore::open(&path).load_favorites();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].url(), "https://cdn/cat-1.jpg");
        assert_eq!(c.session().favorites().len(), 1);
        assert_eq!(c.session().current_image_url(), "https://cdn/cat-2.jpg");

        // Local source renders without asking the backend.
        c.navigate_to_page(Page::Favorites).await;
        assert_eq!(tile_urls(c.view()), vec!["https://cdn/cat-1.jpg"]);
    }

    #[tokio::test]
    async fn test_local_favorites_loaded_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut seed = LocalStore::open(&path);
        seed.save_favorites(&[
            Favorite::Url("a".to_string()),
            Favorite::Url("b".to_string()),
        ])
        .unwrap();

        let mut c = Controller::new(
            FakeApi::default(),
            Screen::new(),
            FavoritesStore::local(LocalStore::open(&path), 200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        );
        c.navigate_to_page(Page::Favorites).await;
        assert_eq!(tile_urls(c.view()), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_server_favorite_adopts_returned_list() {
        let api = FakeApi::default();
        *api.action_favorites.borrow_mut() = Some(vec![Favorite::Url("x".to_string())]);
        let mut c = controller(api);
        c.navigate_to_page(Page::Voting).await;

        c.handle_vote(VoteAction::Favorite).await;
        assert_eq!(c.api().actions.borrow()[0].0, VoteAction::Favorite);
        assert_eq!(c.session().favorites().len(), 1);
    }

    #[tokio::test]
    async fn test_vote_reports_backend_outcome() {
        let mut c = controller(FakeApi::default());
        c.show_page(Page::Voting);
        assert!(!c.handle_vote(VoteAction::Like).await);

        c.load_random_image().await;
        assert!(c.handle_vote(VoteAction::Like).await);

        c.api().vote_error.set(true);
        assert!(!c.handle_vote(VoteAction::Dislike).await);
        assert!(!c.handle_favorite().await);
    }

    #[tokio::test]
    async fn test_server_favorite_landing_on_gallery_refetches() {
        let api = FakeApi::default();
        *api.favorites.borrow_mut() = Some(vec![Favorite::Url("https://cdn/cat-1.jpg".to_string())]);
        let mut c = controller(api);
        c.navigate_to_page(Page::Voting).await;

        let request = c.vote_request(VoteAction::Favorite).unwrap();
        c.begin_tab(Page::Favorites);
        let loaded = execute(c.api(), request).await;
        assert_eq!(c.apply(loaded), Some(Request::Favorites));

        let loaded = execute(c.api(), Request::Favorites).await;
        assert_eq!(c.apply(loaded), None);
        assert_eq!(tile_urls(c.view()), vec!["https://cdn/cat-1.jpg"]);
    }

    #[tokio::test]
    async fn test_local_favorite_landing_on_gallery_rerenders() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = Controller::new(
            FakeApi::default(),
            Screen::new(),
            FavoritesStore::local(LocalStore::open(dir.path().join("storage.json")), 200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        );
        c.navigate_to_page(Page::Voting).await;

        let request = c.vote_request(VoteAction::Favorite).unwrap();
        c.navigate_to_page(Page::Favorites).await;
        assert_eq!(
            c.view().favorites(),
            &FavoritesContent::Placeholder(EMPTY_MESSAGE.to_string())
        );

        let loaded = execute(c.api(), request).await;
        assert_eq!(c.apply(loaded), None);
        assert_eq!(tile_urls(c.view()), vec!["https://cdn/cat-1.jpg"]);
    }

    // ── Interleaving ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_page_switch_while_request_outstanding() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 2)]);
        let mut c = controller(api);

        c.begin_tab(Page::Voting);
        let pending = c.refresh_request().unwrap();
        assert_eq!(pending, Request::RandomImage);

        c.open_tab(Page::Breeds).await;
        assert_eq!(c.view().breed_heading().unwrap().id, "abys");

        // The voting response lands after the user moved on.
        let loaded = execute(c.api(), pending).await;
        assert_eq!(c.apply(loaded), None);
        assert_eq!(c.view().visible_pages(), vec![Page::Breeds]);
        assert_eq!(c.current_page(), Page::Breeds);
        assert_eq!(c.session().current_image_url(), "https://cdn/cat-1.jpg");
    }

    #[tokio::test]
    async fn test_last_arriving_details_win() {
        let api = FakeApi::default()
            .with_breeds(&[("abys", "Abyssinian", 1), ("beng", "Bengal", 2)]);
        let mut c = controller(api);
        c.navigate_to_page(Page::Breeds).await;

        let slow = c.select_breed_request("beng");
        let fast = c.select_breed_request("abys");
        let slow = execute(c.api(), slow).await;
        let fast = execute(c.api(), fast).await;

        c.apply(fast);
        c.apply(slow);
        assert_eq!(c.view().breed_heading().unwrap().id, "beng");
        assert_eq!(c.session().current_breed_id(), Some("beng"));
    }

    // ── Favorites ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_favorites_newest_first() {
        let api = FakeApi::default();
        *api.favorites.borrow_mut() = Some(vec![
            stamped("t1", "2024-01-01T10:00:00Z"),
            stamped("t3", "2024-01-03T10:00:00Z"),
            stamped("t2", "2024-01-02T10:00:00Z"),
        ]);
        let mut c = controller(api);

        c.navigate_to_page(Page::Favorites).await;
        assert_eq!(tile_urls(c.view()), vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_empty_favorites_placeholder() {
        let api = FakeApi::default();
        *api.favorites.borrow_mut() = Some(Vec::new());
        let mut c = controller(api);

        c.display_favorites().await;
        assert_eq!(
            c.view().favorites(),
            &FavoritesContent::Placeholder(EMPTY_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_favorites_fetch_failure_shows_error() {
        let mut c = controller(FakeApi::default());
        c.display_favorites().await;
        assert_eq!(
            c.view().favorites(),
            &FavoritesContent::Error(ERROR_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_view_toggle_through_controller() {
        let mut c = controller(FakeApi::default());
        assert_eq!(c.list_layout(), Some(ListLayout::Grid));
        c.show_column();
        assert_eq!(c.view().list_layout(), Some(ListLayout::Column));

        let mut bare = Controller::new(
            FakeApi::default(),
            Screen::with_elements([ElementId::VotingImage]),
            FavoritesStore::server(200),
            CarouselAdapter::new(CountingCarousel::default(), CarouselOptions::default()),
        );
        bare.show_column();
        assert_eq!(bare.list_layout(), None);
        assert_eq!(bare.view().list_layout(), None);
    }

    // ── Breeds ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_breeds_load_selects_first() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 3), ("beng", "Bengal", 1)]);
        let mut c = controller(api);

        c.navigate_to_page(Page::Breeds).await;
        assert_eq!(c.view().breed_options().len(), 2);
        assert_eq!(c.view().selected_breed().map(|b| b.id.as_str()), Some("abys"));
        assert_eq!(c.session().current_breed_id(), Some("abys"));
        assert_eq!(
            c.view().breed_heading().map(|h| h.label()),
            Some("Abyssinian (Abyssinian land)".to_string())
        );
        let slides = &c.breeds().carousel().carousel().last_slides;
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].url, "https://cdn/abys-0.jpg");
        assert_eq!(slides[2].url, "https://cdn/abys-2.jpg");
    }

    #[tokio::test]
    async fn test_second_details_load_wins() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 3), ("beng", "Bengal", 1)]);
        let mut c = controller(api);

        c.load_breed_details("abys").await;
        c.load_breed_details("beng").await;

        let heading = c.view().breed_heading().unwrap();
        assert_eq!(heading.id, "beng");
        assert_eq!(heading.name, "Bengal");
        assert_eq!(c.view().breed_description(), "All about Bengal");
        assert_eq!(
            c.view().wiki_link(),
            Some("https://en.wikipedia.org/wiki/Bengal")
        );
        assert_eq!(c.session().current_breed_id(), Some("beng"));
        let slides = &c.breeds().carousel().carousel().last_slides;
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].url, "https://cdn/beng-0.jpg");
    }

    #[tokio::test]
    async fn test_failed_breed_list_leaves_selector() {
        let mut c = controller(FakeApi::default());

        c.navigate_to_page(Page::Breeds).await;
        assert_eq!(c.api().breed_list_calls.get(), 1);
        assert!(c.view().breed_options().is_empty());
        assert_eq!(c.view().selected_breed_index(), None);
        assert!(c.api().detail_calls.borrow().is_empty());
        assert_eq!(c.current_page(), Page::Breeds);
    }

    #[tokio::test]
    async fn test_failed_details_keep_previous() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 2)]);
        let mut c = controller(api);
        c.load_breed_details("abys").await;

        c.load_breed_details("nope").await;
        assert_eq!(c.view().breed_heading().map(|h| h.id.as_str()), Some("abys"));
        assert_eq!(c.session().current_breed_id(), Some("abys"));
    }

    #[tokio::test]
    async fn test_missing_wiki_link_hidden() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 1)]);
        api.details
            .borrow_mut()
            .get_mut("abys")
            .unwrap()
            .breed
            .wikipedia_url = Some(String::new());
        let mut c = controller(api);

        c.load_breed_details("abys").await;
        assert_eq!(c.view().wiki_link(), None);
    }

    #[tokio::test]
    async fn test_reentering_breeds_reloads_selected() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 1), ("beng", "Bengal", 2)]);
        let mut c = controller(api);

        c.navigate_to_page(Page::Breeds).await;
        c.select_breed("beng").await;
        c.navigate_to_page(Page::Voting).await;
        c.navigate_to_page(Page::Breeds).await;

        assert_eq!(c.api().breed_list_calls.get(), 1);
        assert_eq!(
            *c.api().detail_calls.borrow(),
            vec!["abys".to_string(), "beng".to_string(), "beng".to_string()]
        );
        assert_eq!(c.view().selected_breed().map(|b| b.id.as_str()), Some("beng"));
    }

    #[tokio::test]
    async fn test_carousel_never_two_live() {
        let api = FakeApi::default().with_breeds(&[("abys", "Abyssinian", 3), ("beng", "Bengal", 1)]);
        let mut c = controller(api);

        c.navigate_to_page(Page::Breeds).await;
        for id in ["beng", "abys", "beng", "abys"] {
            c.select_breed(id).await;
        }
        let carousel = c.breeds().carousel().carousel();
        assert_eq!(carousel.live, 1);
        assert_eq!(carousel.max_live, 1);
    }
}

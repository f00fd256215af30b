//! FavoritesStore: keeps the favorites collection and renders the gallery.
//!
//! Two sources are supported (see `FavoritesSource`):
//! - server: every render re-fetches `GET /favourites`;
//! - local: the collection lives in session state and is mirrored to the
//!   key-value store after each favoriting action.

use catvote_proto::client::ClientError;
use catvote_proto::config::{FavoritesConfig, FavoritesSource};
use catvote_proto::protocol::{CatImage, Favorite};
use catvote_proto::store::LocalStore;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::session::SessionState;
use crate::view::{FavoritesContent, Tile, View};

pub const EMPTY_MESSAGE: &str = "You have no favorite cat images yet.";
pub const ERROR_MESSAGE: &str = "Error loading favorite images. Please try again later.";

pub struct FavoritesStore {
    source: FavoritesSource,
    mirror: Option<LocalStore>,
    tile_width: u16,
}

impl FavoritesStore {
    pub fn new(config: &FavoritesConfig, tile_width: u16) -> Self {
        let mirror = match config.source {
            FavoritesSource::Local => Some(LocalStore::open(&config.storage_file)),
            FavoritesSource::Server => None,
        };
        Self {
            source: config.source,
            mirror,
            tile_width,
        }
    }

    /// Store over an already opened mirror.
    pub fn local(mirror: LocalStore, tile_width: u16) -> Self {
        Self {
            source: FavoritesSource::Local,
            mirror: Some(mirror),
            tile_width,
        }
    }

    pub fn server(tile_width: u16) -> Self {
        Self {
            source: FavoritesSource::Server,
            mirror: None,
            tile_width,
        }
    }

    /// Collection to seed the session with at startup.
    pub fn initial(&self) -> Vec<Favorite> {
        match &self.mirror {
            Some(mirror) => {
                let favorites = mirror.load_favorites();
                info!(
                    "favorites: loaded {} from {}",
                    favorites.len(),
                    mirror.path().display()
                );
                favorites
            }
            None => Vec::new(),
        }
    }

    /// Fold a successful favorite action into the collection.
    ///
    /// Local: append and persist before returning. Server: adopt the list the
    /// backend sent back, if any.
    pub fn record(
        &mut self,
        session: &mut SessionState,
        favorited: &CatImage,
        returned: Option<Vec<Favorite>>,
        now: DateTime<Utc>,
    ) {
        match self.source {
            FavoritesSource::Local => {
                session.favorites.push(Favorite::new(
                    favorited.url.clone(),
                    favorited.id.clone(),
                    now,
                ));
                if let Some(mirror) = self.mirror.as_mut() {
                    if let Err(e) = mirror.save_favorites(&session.favorites) {
                        error!("favorites: failed to persist: {:#}", e);
                    }
                }
            }
            FavoritesSource::Server => {
                if let Some(list) = returned {
                    session.favorites = list;
                }
            }
        }
    }

    /// Whether the gallery must be fetched from the backend before rendering.
    pub fn fetches(&self) -> bool {
        self.source == FavoritesSource::Server
    }

    /// Render the collection held in session state.
    pub fn render<V: View>(&self, view: &mut V, session: &SessionState) {
        view.set_favorites(render_gallery(&session.favorites, self.tile_width));
    }

    /// Adopt a fetched collection and render it. A failed fetch shows the
    /// error message instead.
    pub fn show_fetched<V: View>(
        &self,
        view: &mut V,
        session: &mut SessionState,
        result: Result<Vec<Favorite>, ClientError>,
    ) {
        match result {
            Ok(list) => {
                debug!("favorites: fetched {}", list.len());
                session.favorites = list;
                self.render(view, session);
            }
            Err(e) => {
                error!("Error fetching favorites: {}", e);
                view.set_favorites(FavoritesContent::Error(ERROR_MESSAGE.to_string()));
            }
        }
    }
}

pub fn render_gallery(favorites: &[Favorite], tile_width: u16) -> FavoritesContent {
    // Records whose image was deleted upstream carry no URL.
    let shown: Vec<Favorite> = favorites
        .iter()
        .filter(|f| !f.url().is_empty())
        .cloned()
        .collect();
    if shown.is_empty() {
        return FavoritesContent::Placeholder(EMPTY_MESSAGE.to_string());
    }
    let tiles = gallery_order(&shown)
        .into_iter()
        .map(|f| Tile {
            url: f.url().to_string(),
            width: tile_width,
        })
        .collect();
    FavoritesContent::Tiles(tiles)
}

/// Newest first: by `created_at` when every entry has one, otherwise
/// reverse insertion order. Equal timestamps keep insertion order.
pub fn gallery_order(favorites: &[Favorite]) -> Vec<&Favorite> {
    let stamps: Option<Vec<DateTime<Utc>>> = favorites.iter().map(Favorite::created_at).collect();
    match stamps {
        Some(stamps) => {
            let mut order: Vec<usize> = (0..favorites.len()).collect();
            order.sort_by(|a, b| stamps[*b].cmp(&stamps[*a]));
            order.into_iter().map(|i| &favorites[i]).collect()
        }
        None => favorites.iter().rev().collect(),
    }
}

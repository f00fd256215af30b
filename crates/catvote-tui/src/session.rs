//! SessionState: the controller's single owned copy of what is on screen.
//!
//! Response handlers inside the controller are the only writers; everything
//! else reads through the accessors.

use catvote_proto::protocol::{CatImage, Favorite};

use crate::navigation::Page;

#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) current_page: Page,
    pub(crate) current_image_url: String,
    pub(crate) current_image_id: Option<String>,
    pub(crate) current_breed_id: Option<String>,
    pub(crate) favorites: Vec<Favorite>,
}

impl SessionState {
    pub fn new(favorites: Vec<Favorite>) -> Self {
        Self {
            current_page: Page::Voting,
            current_image_url: String::new(),
            current_image_id: None,
            current_breed_id: None,
            favorites,
        }
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn current_image_url(&self) -> &str {
        &self.current_image_url
    }

    pub fn current_image_id(&self) -> Option<&str> {
        self.current_image_id.as_deref()
    }

    pub fn current_breed_id(&self) -> Option<&str> {
        self.current_breed_id.as_deref()
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    /// The image being voted on, if one is loaded.
    pub fn current_image(&self) -> Option<CatImage> {
        if self.current_image_url.is_empty() {
            return None;
        }
        Some(CatImage {
            url: self.current_image_url.clone(),
            id: self.current_image_id.clone(),
        })
    }

    pub(crate) fn set_image(&mut self, image: CatImage) {
        self.current_image_url = image.url;
        self.current_image_id = image.id;
    }

    pub(crate) fn clear_image(&mut self) {
        self.current_image_url.clear();
        self.current_image_id = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

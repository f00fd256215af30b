//! View binding: the element-level surface the controller writes to.
//!
//! The controller never touches the terminal. It looks up elements and
//! mutates them through [`View`]; [`Screen`] is the page model the ratatui
//! components draw from each frame.

use std::collections::HashSet;

use catvote_proto::protocol::BreedSummary;

use crate::navigation::Page;

/// Addressable elements a widget may need to find before binding to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    VotingImage,
    BreedSelect,
    WikiLink,
    Carousel,
    FavoritesList,
    GridViewButton,
    ColumnViewButton,
}

impl ElementId {
    pub const ALL: [ElementId; 7] = [
        ElementId::VotingImage,
        ElementId::BreedSelect,
        ElementId::WikiLink,
        ElementId::Carousel,
        ElementId::FavoritesList,
        ElementId::GridViewButton,
        ElementId::ColumnViewButton,
    ];
}

/// Breed title line: name, optional `(origin)`, and the id tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedHeading {
    pub name: String,
    pub origin: Option<String>,
    pub id: String,
}

impl BreedHeading {
    /// Name plus origin, without the id tag.
    pub fn label(&self) -> String {
        match &self.origin {
            Some(origin) => format!("{} ({})", self.name, origin),
            None => self.name.clone(),
        }
    }
}

/// One gallery entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub url: String,
    pub width: u16,
}

/// What the favorites list currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FavoritesContent {
    #[default]
    Unloaded,
    Tiles(Vec<Tile>),
    Placeholder(String),
    Error(String),
}

/// Display mode class on the favorites list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLayout {
    Grid,
    Column,
}

pub trait View {
    /// Whether `id` exists on this surface.
    fn has_element(&self, id: ElementId) -> bool;

    fn set_section_visible(&mut self, page: Page, visible: bool);
    fn set_tab_active(&mut self, page: Page, active: bool);

    fn set_voting_image(&mut self, src: &str);

    fn breed_option_count(&self) -> usize;
    fn set_breed_options(&mut self, options: &[BreedSummary]);
    fn set_selected_breed(&mut self, id: &str);
    fn set_breed_heading(&mut self, heading: BreedHeading);
    fn set_breed_description(&mut self, text: &str);
    /// `None` hides the link.
    fn set_wiki_link(&mut self, href: Option<&str>);

    fn set_favorites(&mut self, content: FavoritesContent);
    fn set_list_layout(&mut self, layout: ListLayout);
}

/// The terminal page model.
#[derive(Debug, Clone)]
pub struct Screen {
    elements: HashSet<ElementId>,
    visible: HashSet<Page>,
    active_tabs: HashSet<Page>,
    voting_image: String,
    breed_options: Vec<BreedSummary>,
    selected_breed: Option<usize>,
    breed_heading: Option<BreedHeading>,
    breed_description: String,
    wiki_link: Option<String>,
    favorites: FavoritesContent,
    list_layout: Option<ListLayout>,
}

impl Screen {
    /// A screen with every element present and nothing shown yet.
    pub fn new() -> Self {
        Self::with_elements(ElementId::ALL)
    }

    pub fn with_elements(elements: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            visible: HashSet::new(),
            active_tabs: HashSet::new(),
            voting_image: String::new(),
            breed_options: Vec::new(),
            selected_breed: None,
            breed_heading: None,
            breed_description: String::new(),
            wiki_link: None,
            favorites: FavoritesContent::default(),
            list_layout: None,
        }
    }

    pub fn visible_pages(&self) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|p| self.visible.contains(p))
            .collect()
    }

    pub fn active_tabs(&self) -> Vec<Page> {
        Page::ALL
            .into_iter()
            .filter(|p| self.active_tabs.contains(p))
            .collect()
    }

    pub fn is_tab_active(&self, page: Page) -> bool {
        self.active_tabs.contains(&page)
    }

    /// The single visible page, if the invariant holds.
    pub fn visible_page(&self) -> Option<Page> {
        match self.visible_pages().as_slice() {
            [page] => Some(*page),
            _ => None,
        }
    }

    pub fn voting_image(&self) -> &str {
        &self.voting_image
    }

    pub fn breed_options(&self) -> &[BreedSummary] {
        &self.breed_options
    }

    pub fn selected_breed_index(&self) -> Option<usize> {
        self.selected_breed
    }

    pub fn selected_breed(&self) -> Option<&BreedSummary> {
        self.selected_breed.and_then(|i| self.breed_options.get(i))
    }

    pub fn breed_heading(&self) -> Option<&BreedHeading> {
        self.breed_heading.as_ref()
    }

    pub fn breed_description(&self) -> &str {
        &self.breed_description
    }

    pub fn wiki_link(&self) -> Option<&str> {
        self.wiki_link.as_deref()
    }

    pub fn favorites(&self) -> &FavoritesContent {
        &self.favorites
    }

    pub fn list_layout(&self) -> Option<ListLayout> {
        self.list_layout
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl View for Screen {
    fn has_element(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }

    fn set_section_visible(&mut self, page: Page, visible: bool) {
        if visible {
            self.visible.insert(page);
        } else {
            self.visible.remove(&page);
        }
    }

    fn set_tab_active(&mut self, page: Page, active: bool) {
        if active {
            self.active_tabs.insert(page);
        } else {
            self.active_tabs.remove(&page);
        }
    }

    fn set_voting_image(&mut self, src: &str) {
        self.voting_image = src.to_string();
    }

    fn breed_option_count(&self) -> usize {
        self.breed_options.len()
    }

    fn set_breed_options(&mut self, options: &[BreedSummary]) {
        self.breed_options = options.to_vec();
        // A rebuilt select shows its first option.
        self.selected_breed = if self.breed_options.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    fn set_selected_breed(&mut self, id: &str) {
        if let Some(pos) = self.breed_options.iter().position(|b| b.id == id) {
            self.selected_breed = Some(pos);
        }
    }

    fn set_breed_heading(&mut self, heading: BreedHeading) {
        self.breed_heading = Some(heading);
    }

    fn set_breed_description(&mut self, text: &str) {
        self.breed_description = text.to_string();
    }

    fn set_wiki_link(&mut self, href: Option<&str>) {
        self.wiki_link = href.map(str::to_string);
    }

    fn set_favorites(&mut self, content: FavoritesContent) {
        self.favorites = content;
    }

    fn set_list_layout(&mut self, layout: ListLayout) {
        self.list_layout = Some(layout);
    }
}

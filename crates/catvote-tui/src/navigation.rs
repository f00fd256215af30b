//! Pages, `#fragment` locations, and the back/forward history stack.

use std::fmt;

/// One top-level page. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Voting,
    Breeds,
    Favorites,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Voting, Page::Breeds, Page::Favorites];

    pub fn key(self) -> &'static str {
        match self {
            Self::Voting => "voting",
            Self::Breeds => "breeds",
            Self::Favorites => "favorites",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Voting => "Voting",
            Self::Breeds => "Breeds",
            Self::Favorites => "Favs",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// `#voting` style location for this page.
    pub fn fragment(self) -> String {
        format!("#{}", self.key())
    }

    pub fn index(self) -> usize {
        match self {
            Self::Voting => 0,
            Self::Breeds => 1,
            Self::Favorites => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What a location string asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Page(Page),
    /// Empty or missing fragment.
    Default,
    /// A fragment that names no page.
    Unknown(String),
}

/// Resolve `#breeds`, `breeds`, or a full `scheme://host/#breeds` location.
pub fn resolve_location(location: &str) -> Resolved {
    let fragment = match location.split_once('#') {
        Some((_, frag)) => frag,
        None => location,
    };
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return Resolved::Default;
    }
    match Page::from_key(fragment) {
        Some(page) => Resolved::Page(page),
        None => Resolved::Unknown(fragment.to_string()),
    }
}

/// Browser-style session history of visited locations.
///
/// `push` drops any forward entries; `back`/`forward` move the cursor and
/// return the location to restore.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn push(&mut self, location: impl Into<String>) {
        let location = location.into();
        if self.current() == location {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location);
        self.cursor = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("")
    }
}

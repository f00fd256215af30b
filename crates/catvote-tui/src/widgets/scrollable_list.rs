//! Scrollable selection list: cursor, scroll offset, and click mapping.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        self.scroll_offset = 0;
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn set_selected(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = index;
        }
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Returns (index, &item) pairs visible in `height` rows.
    /// Call `ensure_visible` first to update `scroll_offset`.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.items.is_empty() {
            return Vec::new();
        }
        let start = self.scroll_offset.min(self.items.len());
        let end = (start + height).min(self.items.len());
        (start..end).map(|i| (i, &self.items[i])).collect()
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }

    /// Handle a click at `row` within the rendered area.
    /// Returns the clicked index, if any.
    pub fn handle_click(&mut self, row: usize) -> Option<usize> {
        let target = self.scroll_offset + row;
        if target < self.items.len() {
            self.selected = target;
            return Some(target);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

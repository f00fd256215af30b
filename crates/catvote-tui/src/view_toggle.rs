//! Grid/column display toggle for the favorites list.

use tracing::{error, info};

use crate::view::{ElementId, ListLayout, View};

const REQUIRED: [ElementId; 3] = [
    ElementId::GridViewButton,
    ElementId::ColumnViewButton,
    ElementId::FavoritesList,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewToggle {
    layout: ListLayout,
}

impl ViewToggle {
    /// Bind to the two buttons and the list; `None` when any is missing.
    pub fn init<V: View>(view: &mut V) -> Option<Self> {
        let missing: Vec<ElementId> = REQUIRED
            .into_iter()
            .filter(|id| !view.has_element(*id))
            .collect();
        if !missing.is_empty() {
            error!("view toggle: missing elements {:?}", missing);
            return None;
        }
        view.set_list_layout(ListLayout::Grid);
        Some(Self {
            layout: ListLayout::Grid,
        })
    }

    pub fn show_grid<V: View>(&mut self, view: &mut V) {
        self.apply(view, ListLayout::Grid);
        info!("Grid view activated");
    }

    pub fn show_column<V: View>(&mut self, view: &mut V) {
        self.apply(view, ListLayout::Column);
        info!("Column view activated");
    }

    pub fn layout(&self) -> ListLayout {
        self.layout
    }

    fn apply<V: View>(&mut self, view: &mut V, layout: ListLayout) {
        self.layout = layout;
        view.set_list_layout(layout);
    }
}

//! Session UI state: where the user is, how items are shown, what is selected.
//!
//! Never persisted alongside the collections.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{records::EntityId, vpath::VirtualPath};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::List => write!(f, "list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(AppError::invalid_input(
                "view",
                format!("expected 'grid' or 'list', got '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub current_path: VirtualPath,

    pub view_mode: ViewMode,

    /// Empty means "browse the current directory".
    pub search_query: CompactString,

    pub selected: HashSet<EntityId>,
}

impl UiState {
    /// Move to `path` and drop the selection.
    pub fn navigate(&mut self, path: VirtualPath) {
        self.current_path = path;
        self.selected.clear();
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Returns true if the id was newly selected.
    pub fn toggle_selected(&mut self, id: EntityId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.selected.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_clears_selection() {
        let mut ui = UiState::default();
        ui.selected.insert(EntityId::new());

        ui.navigate(VirtualPath::parse("/docs").unwrap());

        assert_eq!(ui.current_path.as_str(), "/docs");
        assert!(ui.selected.is_empty());
    }

    #[test]
    fn test_toggle_selected() {
        let mut ui = UiState::default();
        let id = EntityId::new();

        assert!(ui.toggle_selected(id));
        assert!(ui.is_selected(&id));
        assert!(!ui.toggle_selected(id));
        assert!(!ui.is_selected(&id));
    }

    #[test]
    fn test_view_mode_parse_and_toggle() {
        assert_eq!("LIST".parse::<ViewMode>().unwrap(), ViewMode::List);
        assert!("tiles".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Grid.toggled(), ViewMode::List);
    }
}

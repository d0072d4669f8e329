//! User input consumed by the engine

use serde::{Deserialize, Serialize};

use crate::row::{Row, SchoolId};
use crate::view::ViewType;

/// An entity picked from a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    School { school: SchoolId, board: String },
    Board { board: String },
}

impl Selection {
    /// Selection for clicking `row` in a list.
    pub fn from_row(row: &Row) -> Self {
        match row.school_id() {
            Some(id) => Selection::School {
                school: id.clone(),
                board: row.board().to_string(),
            },
            None => Selection::Board {
                board: row.board().to_string(),
            },
        }
    }
}

/// Input events the engine reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    /// Free-text search changed
    SearchChanged(String),
    /// Board scoping text changed; empty clears the scope
    BoardScopeChanged(String),
    /// Browse board totals instead of schools in the main grid
    AggregateToggled(bool),
    /// A row in a list was clicked
    Selected(Selection),
    /// Return to the unfocused overview
    Back,
    /// Switch tabs
    ViewTypeChanged(ViewType),
}

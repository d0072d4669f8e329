//! Shared engine state
//!
//! One [`State`] owns the row collections, the search index slots and the
//! user's current selection. Views read from it; only the setters below
//! mutate it, and row collections are only ever replaced as a whole.

use std::sync::Arc;

use ahash::AHashSet;
use tracing::debug;

use crate::aggregate::Collections;
use crate::config::EngineSettings;
use crate::error::CoreError;
use crate::events::{Selection, UiEvent};
use crate::focus::{self, Focus};
use crate::row::{Level, Row};
use crate::search::{board_key, school_key, IndexJob, IndexSlot, KeySelector};
use crate::view::{ViewKey, ViewType};

/// The single source of truth every view refreshes against.
pub struct State {
    collections: Collections,
    board_names: AHashSet<String>,
    school_index: Arc<IndexSlot>,
    board_index: Arc<IndexSlot>,
    focus: Focus,
    search_query: String,
    board_scope: String,
    aggregate_boards: bool,
    view_type: ViewType,
    settings: EngineSettings,
}

impl State {
    pub fn new(collections: Collections, settings: EngineSettings) -> Self {
        let board_names = board_names(&collections);
        Self {
            collections,
            board_names,
            school_index: Arc::new(IndexSlot::new("schools")),
            board_index: Arc::new(IndexSlot::new("boards")),
            focus: Focus::None,
            search_query: String::new(),
            board_scope: String::new(),
            aggregate_boards: false,
            view_type: ViewType::default(),
            settings,
        }
    }

    // Accessors

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    pub fn school_rows(&self) -> &[Row] {
        &self.collections.schools
    }

    pub fn board_rows(&self) -> &[Row] {
        &self.collections.boards
    }

    pub fn sector_rows(&self) -> &[Row] {
        &self.collections.sector
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn board_scope(&self) -> &str {
        &self.board_scope
    }

    pub fn aggregate_boards(&self) -> bool {
        self.aggregate_boards
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn index_slot(&self, level: Level) -> Option<&Arc<IndexSlot>> {
        match level {
            Level::School => Some(&self.school_index),
            Level::Board => Some(&self.board_index),
            Level::Sector => None,
        }
    }

    /// Route for the view that should be visible right now.
    pub fn active_route(&self) -> ViewKey {
        ViewKey::route(self.view_type, self.focus.kind())
    }

    // Setters

    pub fn set_focus(&mut self, focus: Focus) {
        debug!(?focus, "Focus changed");
        self.focus = focus;
    }

    pub fn reset_focus(&mut self) {
        self.set_focus(Focus::None);
    }

    /// Store the search text, trimmed and case-normalized. Whitespace alone
    /// counts as no query.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.trim().to_lowercase();
    }

    pub fn set_board_scope(&mut self, board: &str) {
        self.board_scope = board.to_string();
    }

    pub fn set_aggregate_boards(&mut self, aggregate: bool) {
        self.aggregate_boards = aggregate;
    }

    pub fn set_view_type(&mut self, view_type: ViewType) {
        self.view_type = view_type;
    }

    /// Focus a picked row and fill the search inputs to match it.
    pub fn select(&mut self, selection: Selection) {
        match selection {
            Selection::School { school, board } => {
                self.set_search_query(&school.name);
                self.set_board_scope(&board);
                self.set_focus(Focus::School { school, board });
            }
            Selection::Board { board } => {
                self.set_search_query("");
                self.set_board_scope(&board);
                self.set_focus(Focus::Board { board });
            }
        }
    }

    /// Drop the focus and clear the inputs tied to it.
    pub fn back(&mut self) {
        self.set_search_query("");
        self.set_board_scope("");
        self.reset_focus();
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::SearchChanged(query) => self.set_search_query(&query),
            UiEvent::BoardScopeChanged(board) => self.set_board_scope(&board),
            UiEvent::AggregateToggled(aggregate) => self.set_aggregate_boards(aggregate),
            UiEvent::Selected(selection) => self.select(selection),
            UiEvent::Back => self.back(),
            UiEvent::ViewTypeChanged(view_type) => self.set_view_type(view_type),
        }
    }

    /// Swap in freshly derived collections.
    ///
    /// Both index slots are invalidated so queries stay empty until the new
    /// indices are built. The focus is cleared because it may name an entity
    /// that no longer exists.
    pub fn replace_collections(&mut self, collections: Collections) {
        self.board_names = board_names(&collections);
        self.collections = collections;
        self.school_index.invalidate();
        self.board_index.invalidate();
        self.back();
    }

    /// Capture what is needed to build the index for `level`.
    pub fn index_job(&self, level: Level) -> Option<IndexJob> {
        let (slot, key) = match level {
            Level::School => (&self.school_index, school_key as KeySelector),
            Level::Board => (&self.board_index, board_key as KeySelector),
            Level::Sector => return None,
        };
        Some(IndexJob {
            rows: self.collections.level(level).clone(),
            key,
            generation: slot.generation(),
            chunk_size: self.settings.index_chunk_size,
        })
    }

    // Queries

    /// The board named by the scope text, if it names an existing board.
    pub fn scoped_board(&self) -> Option<&str> {
        let scope = self.board_scope.as_str();
        (!scope.is_empty() && self.board_names.contains(scope)).then_some(scope)
    }

    /// School rows matching the search text, limited to the scoped board.
    pub fn filtered_schools(&self) -> Vec<&Row> {
        let rows: Vec<&Row> = if self.search_query.is_empty() {
            self.collections.schools.iter().collect()
        } else {
            self.school_index.search(&self.collections.schools, &self.search_query)
        };
        match self.scoped_board() {
            Some(board) => rows.into_iter().filter(|row| row.board() == board).collect(),
            None => rows,
        }
    }

    /// Board rows matching the search text.
    pub fn filtered_boards(&self) -> Vec<&Row> {
        if self.search_query.is_empty() {
            self.collections.boards.iter().collect()
        } else {
            self.board_index.search(&self.collections.boards, &self.search_query)
        }
    }

    /// Rows for the main grid at the selected aggregation level.
    pub fn filtered_rows(&self) -> Vec<&Row> {
        if self.aggregate_boards {
            self.filtered_boards()
        } else {
            self.filtered_schools()
        }
    }

    pub fn focused_school_rows(&self) -> Option<Vec<&Row>> {
        focus::focused_school_rows(&self.focus, &self.collections.schools)
    }

    pub fn focused_board_rows(&self) -> Result<Vec<&Row>, CoreError> {
        focus::focused_board_rows(&self.focus, &self.collections.schools, &self.collections.boards)
    }

    pub fn all_board_rows_for_year(&self, year: i32) -> Vec<&Row> {
        focus::board_rows_for_year(&self.collections.boards, year)
    }
}

fn board_names(collections: &Collections) -> AHashSet<String> {
    collections
        .boards
        .iter()
        .map(|row| row.board().to_string())
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::row::fixtures::school;

    pub fn state() -> State {
        let schools = vec![
            school("Maple Public School", "Toronto DSB", 2020, 100.0, 50.0),
            school("Oak Secondary", "Peel DSB", 2020, 200.0, 50.0),
            school("Birch Elementary", "Toronto DSB", 2020, 300.0, 90.0),
            school("Maple Public School", "Toronto DSB", 2019, 100.0, 60.0),
        ];
        State::new(Collections::from_school_rows(schools), EngineSettings::default())
    }

    pub async fn indexed_state() -> State {
        let state = state();
        for level in [Level::School, Level::Board] {
            let job = state.index_job(level).unwrap();
            state.index_slot(level).unwrap().rebuild(job).await;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{indexed_state, state};
    use super::*;
    use crate::row::SchoolId;

    fn names<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
        rows.iter().map(|r| r.display_name()).collect()
    }

    #[test]
    fn test_empty_query_passes_everything_through() {
        let mut state = state();
        assert_eq!(state.filtered_schools().len(), state.school_rows().len());
        state.set_aggregate_boards(true);
        assert_eq!(state.filtered_rows().len(), state.board_rows().len());
    }

    #[test]
    fn test_search_before_index_is_empty() {
        let mut state = state();
        state.set_search_query("Toronto");
        assert!(state.filtered_schools().is_empty());
        assert!(state.filtered_boards().is_empty());
    }

    #[tokio::test]
    async fn test_board_search_waits_for_its_own_index() {
        let mut state = state();
        let job = state.index_job(Level::School).unwrap();
        state.index_slot(Level::School).unwrap().rebuild(job).await;

        state.set_search_query("toronto");
        assert!(!state.filtered_schools().is_empty());
        assert!(state.filtered_boards().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_passes_everything_through() {
        let mut state = state();
        state.set_search_query("   ");
        assert_eq!(state.search_query(), "");
        assert_eq!(state.filtered_schools().len(), state.school_rows().len());
        assert_eq!(state.filtered_boards().len(), state.board_rows().len());

        let mut state = indexed_state().await;
        state.set_search_query(" \t ");
        assert_eq!(state.filtered_schools().len(), state.school_rows().len());
        state.set_search_query("  Oak ");
        assert_eq!(state.search_query(), "oak");
        assert_eq!(names(&state.filtered_schools()), vec!["Oak Secondary"]);
    }

    #[tokio::test]
    async fn test_query_is_case_normalized() {
        let mut state = indexed_state().await;
        state.set_search_query("OAK");
        assert_eq!(state.search_query(), "oak");
        assert_eq!(names(&state.filtered_schools()), vec!["Oak Secondary"]);
    }

    #[tokio::test]
    async fn test_board_scope_is_exact() {
        let mut state = indexed_state().await;
        state.set_search_query("e");
        state.set_board_scope("Toronto DSB");
        let rows = state.filtered_schools();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.board() == "Toronto DSB"));

        state.set_board_scope("Toronto");
        assert_eq!(state.scoped_board(), None);
    }

    #[tokio::test]
    async fn test_aggregate_toggle_switches_level() {
        let mut state = indexed_state().await;
        state.set_aggregate_boards(true);
        state.set_search_query("peel");
        let rows = state.filtered_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].level(), Level::Board);
    }

    #[test]
    fn test_focus_round_trip() {
        let mut state = state();
        state.select(Selection::School {
            school: SchoolId::new("Maple Public School", "Maple Public School Street"),
            board: "Toronto DSB".to_string(),
        });
        let rows = state.focused_board_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.board() == "Toronto DSB"));
        assert_eq!(state.focused_school_rows().unwrap().len(), 2);
        assert_eq!(state.active_route(), ViewKey::School);

        state.back();
        assert!(state.focused_school_rows().is_none());
        assert_eq!(state.focused_board_rows().unwrap().len(), state.board_rows().len());
        assert_eq!(state.active_route(), ViewKey::Overview);
        assert_eq!(state.search_query(), "");
    }

    #[test]
    fn test_selecting_board_scopes_and_clears_query() {
        let mut state = state();
        state.set_search_query("oak");
        state.apply(UiEvent::Selected(Selection::Board {
            board: "Peel DSB".to_string(),
        }));
        assert_eq!(state.search_query(), "");
        assert_eq!(state.scoped_board(), Some("Peel DSB"));
        assert_eq!(state.active_route(), ViewKey::Board);
    }

    #[test]
    fn test_ranking_tab_overrides_focus() {
        let mut state = state();
        state.apply(UiEvent::ViewTypeChanged(ViewType::Ranking));
        assert_eq!(state.active_route(), ViewKey::Ranking);
        state.apply(UiEvent::Selected(Selection::Board {
            board: "Peel DSB".to_string(),
        }));
        assert_eq!(state.active_route(), ViewKey::Ranking);
    }

    #[tokio::test]
    async fn test_replacing_collections_invalidates_indices() {
        let mut state = indexed_state().await;
        state.set_search_query("oak");
        assert_eq!(state.filtered_schools().len(), 1);

        let replacement = Collections::from_school_rows(state.school_rows().to_vec());
        state.replace_collections(replacement);
        state.set_search_query("oak");
        assert!(state.filtered_schools().is_empty());
        assert!(state.focus().is_none());
    }
}

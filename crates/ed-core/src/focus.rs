//! Focus state machine
//!
//! Tracks which entity is currently selected and answers "related rows"
//! queries for it against the school and board collections.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::row::{Row, SchoolId};

/// The currently selected entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Focus {
    #[default]
    None,
    School { school: SchoolId, board: String },
    Board { board: String },
}

/// Discriminant of [`Focus`], used for view routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusKind {
    None,
    School,
    Board,
}

impl Focus {
    pub fn kind(&self) -> FocusKind {
        match self {
            Focus::None => FocusKind::None,
            Focus::School { .. } => FocusKind::School,
            Focus::Board { .. } => FocusKind::Board,
        }
    }

    pub fn school(&self) -> Option<&SchoolId> {
        match self {
            Focus::School { school, .. } => Some(school),
            _ => None,
        }
    }

    /// Board of the focused board, or the board the focused school belongs to.
    pub fn board(&self) -> Option<&str> {
        match self {
            Focus::None => None,
            Focus::School { board, .. } | Focus::Board { board } => Some(board),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Focus::None)
    }
}

/// Every row of the focused school, across years.
///
/// `None` unless a school is focused.
pub fn focused_school_rows<'a>(focus: &Focus, schools: &'a [Row]) -> Option<Vec<&'a Row>> {
    let id = focus.school()?;
    Some(
        schools
            .iter()
            .filter(|row| row.school_id() == Some(id))
            .collect(),
    )
}

/// Board rows related to the current focus.
///
/// With no focus every board row is returned. A focused school is resolved to
/// its board through the school rows; an unknown school or a board with no
/// rows means the selection and the data disagree, which is reported as an
/// error rather than as an empty result.
pub fn focused_board_rows<'a>(focus: &Focus, schools: &[Row], boards: &'a [Row]) -> Result<Vec<&'a Row>, CoreError> {
    match focus {
        Focus::None => Ok(boards.iter().collect()),
        Focus::Board { board } => Ok(rows_for_board(boards, board)),
        Focus::School { school, .. } => {
            let owner = schools
                .iter()
                .find(|row| row.school_id() == Some(school))
                .ok_or_else(|| CoreError::UnknownSchool(school.clone()))?;
            let rows = rows_for_board(boards, owner.board());
            if rows.is_empty() {
                return Err(CoreError::EmptyBoardRows(owner.board().to_string()));
            }
            Ok(rows)
        }
    }
}

/// Every board row for one year, regardless of focus.
pub fn board_rows_for_year(boards: &[Row], year: i32) -> Vec<&Row> {
    boards.iter().filter(|row| row.year() == year).collect()
}

fn rows_for_board<'a>(boards: &'a [Row], board: &str) -> Vec<&'a Row> {
    boards.iter().filter(|row| row.board() == board).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, GroupKey};
    use crate::row::fixtures::school;

    fn data() -> (Vec<Row>, Vec<Row>) {
        let schools = vec![
            school("A", "X", 2020, 100.0, 50.0),
            school("B", "X", 2020, 200.0, 50.0),
            school("A", "X", 2019, 100.0, 40.0),
            school("C", "Y", 2020, 100.0, 10.0),
        ];
        let boards = aggregate(&schools, GroupKey::board_year);
        (schools, boards)
    }

    fn focus_school(name: &str, board: &str) -> Focus {
        Focus::School {
            school: SchoolId::new(name, format!("{} Street", name)),
            board: board.to_string(),
        }
    }

    #[test]
    fn test_focus_kinds() {
        assert_eq!(Focus::default().kind(), FocusKind::None);
        assert_eq!(focus_school("A", "X").kind(), FocusKind::School);
        assert_eq!(Focus::Board { board: "X".into() }.kind(), FocusKind::Board);
        assert_eq!(focus_school("A", "X").board(), Some("X"));
    }

    #[test]
    fn test_school_rows_only_for_school_focus() {
        let (schools, _) = data();
        assert!(focused_school_rows(&Focus::None, &schools).is_none());
        assert!(focused_school_rows(&Focus::Board { board: "X".into() }, &schools).is_none());

        let rows = focused_school_rows(&focus_school("A", "X"), &schools).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.display_name() == "A"));
    }

    #[test]
    fn test_school_focus_resolves_board() {
        let (schools, boards) = data();
        let rows = focused_board_rows(&focus_school("A", "X"), &schools, &boards).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.board() == "X"));
    }

    #[test]
    fn test_scenario_single_board_row() {
        let schools = vec![
            school("A", "X", 2020, 100.0, 50.0),
            school("B", "X", 2020, 200.0, 50.0),
        ];
        let boards = aggregate(&schools, GroupKey::board_year);
        let rows = focused_board_rows(&focus_school("A", "X"), &schools, &boards).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].board(), "X");
        assert_eq!(rows[0].year(), 2020);
        assert_eq!(rows[0].measures().energy, 100.0);
    }

    #[test]
    fn test_no_focus_returns_all_boards() {
        let (schools, boards) = data();
        let rows = focused_board_rows(&Focus::None, &schools, &boards).unwrap();
        assert_eq!(rows.len(), boards.len());
    }

    #[test]
    fn test_unknown_school_is_an_error() {
        let (schools, boards) = data();
        let err = focused_board_rows(&focus_school("Nowhere", "X"), &schools, &boards).unwrap_err();
        assert!(matches!(err, CoreError::UnknownSchool(_)));
    }

    #[test]
    fn test_school_without_board_rows_is_an_error() {
        let (schools, _) = data();
        let err = focused_board_rows(&focus_school("A", "X"), &schools, &[]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyBoardRows(board) if board == "X"));
    }

    #[test]
    fn test_board_rows_for_year() {
        let (_, boards) = data();
        let rows = board_rows_for_year(&boards, 2020);
        assert_eq!(rows.len(), 2);
        assert!(board_rows_for_year(&boards, 1999).is_empty());
    }
}

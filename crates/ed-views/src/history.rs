//! Energy history chart model
//!
//! The line follows the board total when a board is in focus (directly or
//! through a focused school) and the sector total otherwise. A focused
//! school is overlaid as bars. A board focus that resolves to no rows falls
//! back to the sector line so the chart is never drawn empty.

use ed_core::{FocusKind, Row, State};

pub const SECTOR_TITLE: &str = "Overall Sector Performance";
pub const BOARD_TITLE: &str = "Board Performance";
pub const SCHOOL_TITLE: &str = "School vs Board Performance";

/// Weather-normalized intensity for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryChart {
    pub title: &'static str,
    /// Band axis, in display order
    pub years: Vec<i32>,
    pub line: Vec<HistoryPoint>,
    pub bars: Vec<HistoryPoint>,
    /// Top of the y domain; the sector maximum when nothing plotted has a value
    pub y_max: f64,
}

impl HistoryChart {
    /// Build the chart for the current focus.
    ///
    /// Fails if a focused school cannot be tied back to board rows.
    pub fn from_state(state: &State, years: &[i32]) -> anyhow::Result<Self> {
        let (title, line_rows, bar_rows): (&'static str, Vec<&Row>, Vec<&Row>) = match state.focus().kind() {
            FocusKind::None => (SECTOR_TITLE, sector(state), Vec::new()),
            FocusKind::Board => match state.focused_board_rows()? {
                rows if rows.is_empty() => (SECTOR_TITLE, sector(state), Vec::new()),
                rows => (BOARD_TITLE, rows, Vec::new()),
            },
            FocusKind::School => {
                let boards = state.focused_board_rows()?;
                let schools = state.focused_school_rows().unwrap_or_default();
                (SCHOOL_TITLE, boards, schools)
            }
        };

        let line = points(&line_rows, years);
        let bars = points(&bar_rows, years);
        let mut y_max = max_value(line.iter().chain(bars.iter()));
        if y_max == 0.0 {
            // Keep the axis on the sector scale when the focus has no values
            y_max = max_value(points(&sector(state), years).iter());
        }

        Ok(Self {
            title,
            years: years.to_vec(),
            line,
            bars,
            y_max,
        })
    }
}

fn sector(state: &State) -> Vec<&Row> {
    state.sector_rows().iter().collect()
}

fn max_value<'a>(points: impl Iterator<Item = &'a HistoryPoint>) -> f64 {
    points.map(|p| p.value).filter(|v| v.is_finite()).fold(0.0, f64::max)
}

fn points(rows: &[&Row], years: &[i32]) -> Vec<HistoryPoint> {
    let mut points: Vec<HistoryPoint> = rows
        .iter()
        .filter(|row| years.contains(&row.year()))
        .map(|row| HistoryPoint {
            year: row.year(),
            value: row.intensities().energy_int_norm,
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points
}

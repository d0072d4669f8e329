//! Board ranking chart and view
//!
//! Boards are ranked by weather-normalized intensity for one year, lowest
//! first. Bars near the focused board and near either end of the list are
//! drawn taller so they can carry a label; everything else collapses to a
//! thin bar.

use std::cmp::Ordering;

use ed_core::{Row, State, View, ViewKey, Visibility};
use tracing::debug;

use crate::config::ViewSettings;
use crate::surface::SharedSurface;

pub const BASE_BAR_HEIGHT: f64 = 3.0;
pub const BAR_PADDING: f64 = 3.0;
/// Extra height of a bar at distance zero
pub const MAX_BAR_GROWTH: f64 = 12.0;
/// Rows beyond this distance get the base height
pub const GROWTH_DISTANCE: usize = 7;
/// Bars must be taller than this to be labelled
pub const LABEL_MIN_HEIGHT: f64 = 10.0;

/// Height of the bar at `row` out of `count` rows.
///
/// Distance is measured to the nearest of the focused row, the first row and
/// the last row.
pub fn bar_height(row: usize, focused: Option<usize>, count: usize) -> f64 {
    let last = count.saturating_sub(1);
    let mut distance = row.min(last.saturating_sub(row));
    if let Some(focused) = focused {
        distance = distance.min(focused.abs_diff(row));
    }
    if distance > GROWTH_DISTANCE {
        return BASE_BAR_HEIGHT;
    }
    BASE_BAR_HEIGHT + MAX_BAR_GROWTH * (GROWTH_DISTANCE - distance) as f64 / GROWTH_DISTANCE as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBar {
    /// One-based position in the ranking
    pub rank: usize,
    pub board: String,
    pub value: f64,
    pub y: f64,
    pub height: f64,
    pub label: Option<String>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingChart {
    pub year: i32,
    pub bars: Vec<RankedBar>,
    /// Largest plotted value; zero when no board has one
    pub x_max: f64,
}

impl RankingChart {
    pub fn from_state(state: &State, year: i32) -> Self {
        let mut rows = state.all_board_rows_for_year(year);
        rows.sort_by(|a, b| compare_missing_last(norm(a), norm(b)));

        let focused_board = state.focus().board();
        let focused = focused_board.and_then(|board| rows.iter().position(|row| row.board() == board));

        let mut y = 0.0;
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let height = bar_height(i, focused, rows.len());
                let rank = i + 1;
                let bar = RankedBar {
                    rank,
                    board: row.board().to_string(),
                    value: norm(row),
                    y,
                    height,
                    label: (height > LABEL_MIN_HEIGHT).then(|| format!("{}: {}", rank, row.board())),
                    highlighted: Some(i) == focused,
                };
                y += height + BAR_PADDING;
                bar
            })
            .collect::<Vec<_>>();

        let x_max = bars
            .iter()
            .map(|bar| bar.value)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);

        Self { year, bars, x_max }
    }

    pub fn highlighted(&self) -> Option<&RankedBar> {
        self.bars.iter().find(|bar| bar.highlighted)
    }
}

fn norm(row: &Row) -> f64 {
    row.intensities().energy_int_norm
}

fn compare_missing_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Ranking tab: every board for the configured year.
pub struct RankingView {
    surface: SharedSurface,
    year: i32,
    visibility: Visibility,
    chart: Option<RankingChart>,
}

impl RankingView {
    pub fn new(surface: SharedSurface, settings: &ViewSettings) -> Self {
        Self {
            surface,
            year: settings.ranking_year,
            visibility: Visibility::default(),
            chart: None,
        }
    }

    /// Chart drawn by the last refresh
    pub fn chart(&self) -> Option<&RankingChart> {
        self.chart.as_ref()
    }
}

impl View for RankingView {
    fn key(&self) -> ViewKey {
        ViewKey::Ranking
    }

    fn display_name(&self) -> &str {
        "Board Ranking"
    }

    fn refresh(&mut self, state: &State) -> anyhow::Result<()> {
        let chart = RankingChart::from_state(state, self.year);
        debug!(year = self.year, boards = chart.bars.len(), "Ranking refreshed");

        let heading = match state.focus().board() {
            Some(board) => format!("Board: {}", board),
            None => format!("Board ranking {}", self.year),
        };
        let mut surface = self.surface.lock();
        surface.set_heading(ViewKey::Ranking, &heading);
        surface.draw_ranking(ViewKey::Ranking, &chart);
        drop(surface);

        self.chart = Some(chart);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visibility.apply(visible) {
            self.surface.lock().set_displayed(ViewKey::Ranking, visible);
        }
    }

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

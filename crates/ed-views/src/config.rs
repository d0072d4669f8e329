//! View configuration

use serde::{Deserialize, Serialize};

/// Display settings shared by the built-in views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Rows per page in the search grid
    pub grid_page_size: usize,

    /// Year the board ranking is computed for
    pub ranking_year: i32,

    /// Years plotted on the history chart, in axis order
    pub history_years: Vec<i32>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            grid_page_size: 10,
            ranking_year: 2020,
            history_years: (2015..=2020).collect(),
        }
    }
}

//! Overview: the search grid plus the sector history
//!
//! Shown while nothing is focused. The grid lists schools or board totals
//! depending on the aggregation toggle, and remembers which entity each
//! displayed row stands for so a row pick can be turned into a
//! [`Selection`].

use ed_core::{Level, Row, Selection, State, View, ViewKey, Visibility};
use tracing::debug;

use crate::config::ViewSettings;
use crate::format::{format_rounded, format_value};
use crate::history::HistoryChart;
use crate::surface::SharedSurface;
use crate::table::{page_count, TableModel};

const SCHOOL_COLUMNS: [&str; 7] = [
    "School",
    "Board",
    "City",
    "Year",
    "Energy Int. (ekWh/sqft)",
    "Norm. Int. (ekWh/HDD/sqft)",
    "GHG (kg)",
];

const BOARD_COLUMNS: [&str; 6] = [
    "Board",
    "Year",
    "Schools",
    "Energy Int. (ekWh/sqft)",
    "Norm. Int. (ekWh/HDD/sqft)",
    "GHG (kg)",
];

/// A grid row and the entity it selects
struct GridEntry {
    cells: Vec<String>,
    selection: Selection,
}

impl GridEntry {
    fn from_row(row: &Row) -> Self {
        let intensities = row.intensities();
        let mut cells = match row.level() {
            Level::School => vec![
                row.display_name().to_string(),
                row.board().to_string(),
                row.city().unwrap_or_default().to_string(),
                row.year().to_string(),
            ],
            Level::Board | Level::Sector => vec![
                row.display_name().to_string(),
                row.year().to_string(),
                row.members().to_string(),
            ],
        };
        cells.push(format_value(intensities.energy_int, 2));
        cells.push(format_value(intensities.energy_int_norm, 6));
        cells.push(format_rounded(row.measures().ghg_kg));

        Self {
            cells,
            selection: Selection::from_row(row),
        }
    }
}

pub struct OverviewView {
    surface: SharedSurface,
    settings: ViewSettings,
    visibility: Visibility,
    entries: Vec<GridEntry>,
    boards: bool,
    page: usize,
}

impl OverviewView {
    pub fn new(surface: SharedSurface, settings: ViewSettings) -> Self {
        Self {
            surface,
            settings,
            visibility: Visibility::default(),
            entries: Vec::new(),
            boards: false,
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.entries.len(), self.page_size())
    }

    /// Rows per page; a configured size of zero still shows one row.
    fn page_size(&self) -> usize {
        self.settings.grid_page_size.max(1)
    }

    /// Jump to `page` (clamped) and redraw the grid.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
        self.draw_table();
    }

    /// Entity behind row `position` of the current page.
    pub fn selection_at(&self, position: usize) -> Option<Selection> {
        let page_size = self.page_size();
        if position >= page_size {
            return None;
        }
        let index = self.page * page_size + position;
        self.entries.get(index).map(|entry| entry.selection.clone())
    }

    fn draw_table(&self) {
        let columns: &[&str] = if self.boards { &BOARD_COLUMNS } else { &SCHOOL_COLUMNS };
        let cells: Vec<Vec<String>> = self.entries.iter().map(|e| e.cells.clone()).collect();
        let table = TableModel::paginate(columns, &cells, self.page, self.page_size());
        self.surface.lock().draw_table(ViewKey::Overview, &table);
    }
}

impl View for OverviewView {
    fn key(&self) -> ViewKey {
        ViewKey::Overview
    }

    fn display_name(&self) -> &str {
        "Overview"
    }

    fn refresh(&mut self, state: &State) -> anyhow::Result<()> {
        self.boards = state.aggregate_boards();
        self.entries = state.filtered_rows().into_iter().map(GridEntry::from_row).collect();
        self.page = 0;
        debug!(rows = self.entries.len(), boards = self.boards, "Grid refreshed");

        let chart = HistoryChart::from_state(state, &self.settings.history_years)?;
        self.draw_table();

        let mut surface = self.surface.lock();
        surface.set_heading(ViewKey::Overview, chart.title);
        surface.draw_history(ViewKey::Overview, &chart);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visibility.apply(visible) {
            self.surface.lock().set_displayed(ViewKey::Overview, visible);
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

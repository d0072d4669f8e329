//! Rendering surface the views draw into
//!
//! Each view owns one panel, named by its [`ViewKey`]. The surface decides
//! how a panel actually reaches the user; views only hand it finished models.

use std::sync::Arc;

use ed_core::ViewKey;
use parking_lot::Mutex;

use crate::history::HistoryChart;
use crate::ranking::RankingChart;
use crate::table::TableModel;

pub trait Surface: Send {
    /// Show or hide a panel
    fn set_displayed(&mut self, panel: ViewKey, displayed: bool);

    fn set_heading(&mut self, panel: ViewKey, heading: &str);

    fn draw_table(&mut self, panel: ViewKey, table: &TableModel);

    fn draw_history(&mut self, panel: ViewKey, chart: &HistoryChart);

    fn draw_ranking(&mut self, panel: ViewKey, chart: &RankingChart);
}

/// Surface shared by every registered view
pub type SharedSurface = Arc<Mutex<dyn Surface>>;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Keeps the latest model drawn into each panel.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub headings: HashMap<ViewKey, String>,
        pub tables: HashMap<ViewKey, TableModel>,
        pub histories: HashMap<ViewKey, HistoryChart>,
        pub rankings: HashMap<ViewKey, RankingChart>,
        pub display_calls: Vec<(ViewKey, bool)>,
    }

    impl RecordingSurface {
        pub fn shared() -> Arc<Mutex<RecordingSurface>> {
            Arc::new(Mutex::new(Self::default()))
        }
    }

    impl Surface for RecordingSurface {
        fn set_displayed(&mut self, panel: ViewKey, displayed: bool) {
            self.display_calls.push((panel, displayed));
        }

        fn set_heading(&mut self, panel: ViewKey, heading: &str) {
            self.headings.insert(panel, heading.to_string());
        }

        fn draw_table(&mut self, panel: ViewKey, table: &TableModel) {
            self.tables.insert(panel, table.clone());
        }

        fn draw_history(&mut self, panel: ViewKey, chart: &HistoryChart) {
            self.histories.insert(panel, chart.clone());
        }

        fn draw_ranking(&mut self, panel: ViewKey, chart: &RankingChart) {
            self.rankings.insert(panel, chart.clone());
        }
    }
}

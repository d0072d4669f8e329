//! Built-in views for the energy dashboard
//!
//! Views turn the engine state into display models (tables and charts) and
//! hand them to a [`Surface`]. They never render pixels themselves.

pub mod config;
mod detail;
pub mod format;
pub mod history;
mod overview;
pub mod ranking;
mod surface;
pub mod table;

pub use config::ViewSettings;
pub use detail::DetailView;
pub use history::{HistoryChart, HistoryPoint};
pub use overview::OverviewView;
pub use ranking::{RankedBar, RankingChart, RankingView};
pub use surface::{SharedSurface, Surface};
pub use table::TableModel;

use ed_core::View;

/// One view per route, in refresh order.
pub fn default_views(surface: SharedSurface, settings: &ViewSettings) -> Vec<Box<dyn View>> {
    vec![
        Box::new(OverviewView::new(surface.clone(), settings.clone())),
        Box::new(DetailView::school(surface.clone(), settings)),
        Box::new(DetailView::board(surface.clone(), settings)),
        Box::new(RankingView::new(surface, settings)),
    ]
}

//! Core engine for the school energy dashboard
//!
//! This crate holds the row model, the aggregation engine, the search
//! indices, the focus state machine and the view manager, plus the
//! [`Session`] that wires them together at startup.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod events;
pub mod focus;
pub mod row;
pub mod search;
pub mod session;
pub mod state;
pub mod view;
pub mod view_manager;

// Re-export commonly used types
pub use aggregate::{aggregate, Collections, GroupKey, SECTOR_LABEL};
pub use config::EngineSettings;
pub use error::CoreError;
pub use events::{Selection, UiEvent};
pub use focus::{Focus, FocusKind};
pub use row::{Coverage, Intensities, Level, Measures, RawRecord, Row, SchoolDetail, SchoolId, Weighted};
pub use search::{IndexSlot, SearchIndex};
pub use session::{RowSource, Session};
pub use state::State;
pub use view::{View, ViewKey, ViewType, Visibility};
pub use view_manager::ViewManager;

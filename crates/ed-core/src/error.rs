use thiserror::Error;

use crate::row::SchoolId;
use crate::view::ViewKey;

/// Errors raised by the engine.
///
/// All of these mean the wiring between views and data is broken; none of
/// them are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("School '{}' at '{}' not found", .0.name, .0.address)]
    UnknownSchool(SchoolId),

    #[error("No board rows for board '{0}' of the focused school")]
    EmptyBoardRows(String),

    #[error("No view registered for route {0:?}")]
    MissingView(ViewKey),

    #[error("More than one view registered for route {0:?}")]
    DuplicateView(ViewKey),
}

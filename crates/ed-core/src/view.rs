//! View abstraction - the contract every independently rendered surface implements

use serde::{Deserialize, Serialize};

use crate::focus::FocusKind;
use crate::state::State;

/// Explicit tab selection, orthogonal to the focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewType {
    /// Energy history of the focused entity
    #[default]
    History,
    /// Boards ranked against each other
    Ranking,
}

/// Route a registered view answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKey {
    /// Search grid with the sector history, shown when nothing is focused
    Overview,
    School,
    Board,
    Ranking,
}

impl ViewKey {
    /// Every route; each must have exactly one registered view.
    pub const ALL: [ViewKey; 4] = [ViewKey::Overview, ViewKey::School, ViewKey::Board, ViewKey::Ranking];

    /// Pick the route for the current tab and focus.
    pub fn route(view_type: ViewType, focus: FocusKind) -> ViewKey {
        match (view_type, focus) {
            (ViewType::Ranking, _) => ViewKey::Ranking,
            (ViewType::History, FocusKind::None) => ViewKey::Overview,
            (ViewType::History, FocusKind::School) => ViewKey::School,
            (ViewType::History, FocusKind::Board) => ViewKey::Board,
        }
    }
}

/// Base trait for all views
pub trait View: Send {
    /// Route this view is shown for
    fn key(&self) -> ViewKey;

    /// Get the display name
    fn display_name(&self) -> &str;

    /// Pull current data out of the state and redraw.
    ///
    /// Called on every state change, whether or not the view is visible.
    fn refresh(&mut self, state: &State) -> anyhow::Result<()>;

    /// Show or hide the view. Repeating the current visibility does nothing.
    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get as any mut for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Last visibility applied to a view.
///
/// Starts unknown so the first request always goes through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility(Option<bool>);

impl Visibility {
    /// Record `visible`; returns `true` only if it differs from the last value.
    pub fn apply(&mut self, visible: bool) -> bool {
        if self.0 == Some(visible) {
            return false;
        }
        self.0 = Some(visible);
        true
    }

    pub fn is_visible(&self) -> bool {
        self.0.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        assert_eq!(ViewKey::route(ViewType::History, FocusKind::None), ViewKey::Overview);
        assert_eq!(ViewKey::route(ViewType::History, FocusKind::School), ViewKey::School);
        assert_eq!(ViewKey::route(ViewType::History, FocusKind::Board), ViewKey::Board);
        for kind in [FocusKind::None, FocusKind::School, FocusKind::Board] {
            assert_eq!(ViewKey::route(ViewType::Ranking, kind), ViewKey::Ranking);
        }
    }

    #[test]
    fn test_visibility_is_idempotent() {
        let mut visibility = Visibility::default();
        assert!(!visibility.is_visible());
        assert!(visibility.apply(false));
        assert!(!visibility.apply(false));
        assert!(visibility.apply(true));
        assert!(!visibility.apply(true));
        assert!(visibility.is_visible());
    }
}

//! Detail panels for a focused school or board

use ed_core::{Focus, State, View, ViewKey, Visibility};

use crate::config::ViewSettings;
use crate::history::HistoryChart;
use crate::surface::SharedSurface;

/// Heading and history chart for the focused entity.
///
/// One instance is registered for [`ViewKey::School`] and one for
/// [`ViewKey::Board`]. While the focus is of the other kind the panel keeps
/// its last content.
pub struct DetailView {
    key: ViewKey,
    name: String,
    surface: SharedSurface,
    years: Vec<i32>,
    visibility: Visibility,
}

impl DetailView {
    pub fn school(surface: SharedSurface, settings: &ViewSettings) -> Self {
        Self::new(ViewKey::School, "School", surface, settings)
    }

    pub fn board(surface: SharedSurface, settings: &ViewSettings) -> Self {
        Self::new(ViewKey::Board, "Board", surface, settings)
    }

    fn new(key: ViewKey, name: &str, surface: SharedSurface, settings: &ViewSettings) -> Self {
        Self {
            key,
            name: name.to_string(),
            surface,
            years: settings.history_years.clone(),
            visibility: Visibility::default(),
        }
    }

    fn heading(&self, focus: &Focus) -> Option<String> {
        match (self.key, focus) {
            (ViewKey::School, Focus::School { school, .. }) => Some(format!("School: {}", school.name)),
            (ViewKey::Board, Focus::Board { board }) => Some(format!("Board: {}", board)),
            _ => None,
        }
    }
}

impl View for DetailView {
    fn key(&self) -> ViewKey {
        self.key
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn refresh(&mut self, state: &State) -> anyhow::Result<()> {
        let Some(heading) = self.heading(state.focus()) else {
            return Ok(());
        };
        let chart = HistoryChart::from_state(state, &self.years)?;

        let mut surface = self.surface.lock();
        surface.set_heading(self.key, &heading);
        surface.draw_history(self.key, &chart);
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visibility.apply(visible) {
            self.surface.lock().set_displayed(self.key, visible);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{maple, state};
    use crate::history::{BOARD_TITLE, SCHOOL_TITLE};
    use crate::surface::testing::RecordingSurface;

    #[test]
    fn test_school_detail() {
        let surface = RecordingSurface::shared();
        let mut view = DetailView::school(surface.clone(), &ViewSettings::default());
        let mut state = state();
        state.set_focus(Focus::School {
            school: maple(),
            board: "Toronto DSB".to_string(),
        });
        view.refresh(&state).unwrap();

        let surface = surface.lock();
        assert_eq!(surface.headings[&ViewKey::School], "School: Maple Public School");
        assert_eq!(surface.histories[&ViewKey::School].title, SCHOOL_TITLE);
    }

    #[test]
    fn test_board_detail() {
        let surface = RecordingSurface::shared();
        let mut view = DetailView::board(surface.clone(), &ViewSettings::default());
        let mut state = state();
        state.set_focus(Focus::Board {
            board: "Peel DSB".to_string(),
        });
        view.refresh(&state).unwrap();

        let surface = surface.lock();
        assert_eq!(surface.headings[&ViewKey::Board], "Board: Peel DSB");
        assert_eq!(surface.histories[&ViewKey::Board].title, BOARD_TITLE);
    }

    #[test]
    fn test_other_focus_leaves_panel_alone() {
        let surface = RecordingSurface::shared();
        let mut view = DetailView::school(surface.clone(), &ViewSettings::default());
        view.refresh(&state()).unwrap();
        assert!(surface.lock().headings.is_empty());
    }
}

//! View manager - owns the registered views and keeps them in step with the state

use ahash::AHashMap;
use tracing::debug;

use crate::error::CoreError;
use crate::state::State;
use crate::view::{View, ViewKey};

/// Registry of views with exactly one visible at a time.
pub struct ViewManager {
    views: Vec<Box<dyn View>>,
    routes: AHashMap<ViewKey, usize>,
}

impl ViewManager {
    /// Register `views` in order.
    ///
    /// Fails if any route lacks a view or has more than one.
    pub fn new(views: Vec<Box<dyn View>>) -> Result<Self, CoreError> {
        let mut routes = AHashMap::new();
        for (idx, view) in views.iter().enumerate() {
            if routes.insert(view.key(), idx).is_some() {
                return Err(CoreError::DuplicateView(view.key()));
            }
        }
        if let Some(missing) = ViewKey::ALL.iter().find(|key| !routes.contains_key(*key)) {
            return Err(CoreError::MissingView(*missing));
        }
        Ok(Self { views, routes })
    }

    /// Refresh every view, then show only the one routed from the state.
    ///
    /// Views refresh in registration order before any visibility changes,
    /// so a view being revealed is already up to date.
    pub fn update_from_state(&mut self, state: &State) -> anyhow::Result<ViewKey> {
        let active_key = state.active_route();
        let active = self.index_of(active_key)?;

        for view in self.views.iter_mut() {
            view.refresh(state)?;
        }
        for (idx, view) in self.views.iter_mut().enumerate() {
            view.set_visible(idx == active);
        }

        debug!(?active_key, "Views updated");
        Ok(active_key)
    }

    /// The view currently routed from the state.
    pub fn active_view(&self, state: &State) -> Result<&dyn View, CoreError> {
        let idx = self.index_of(state.active_route())?;
        Ok(self.views[idx].as_ref())
    }

    pub fn view(&self, key: ViewKey) -> Option<&dyn View> {
        self.routes.get(&key).map(|idx| self.views[*idx].as_ref())
    }

    pub fn view_mut(&mut self, key: ViewKey) -> Option<&mut (dyn View + 'static)> {
        let idx = *self.routes.get(&key)?;
        Some(self.views[idx].as_mut())
    }

    /// Downcast the view registered for `key`.
    pub fn view_as<T: 'static>(&self, key: ViewKey) -> Option<&T> {
        self.view(key)?.as_any().downcast_ref::<T>()
    }

    /// Keys of the views currently visible.
    pub fn visible(&self) -> Vec<ViewKey> {
        self.views
            .iter()
            .filter(|view| view.is_visible())
            .map(|view| view.key())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn index_of(&self, key: ViewKey) -> Result<usize, CoreError> {
        self.routes.get(&key).copied().ok_or(CoreError::MissingView(key))
    }
}

#[cfg(test)]
pub(crate) mod test_views {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::state::State;
    use crate::view::{View, ViewKey, Visibility};

    /// View that records every call into a shared log.
    pub struct RecordingView {
        key: ViewKey,
        name: String,
        visibility: Visibility,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingView {
        pub fn new(key: ViewKey, log: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                key,
                name: format!("{:?}", key),
                visibility: Visibility::default(),
                log,
            }
        }
    }

    impl View for RecordingView {
        fn key(&self) -> ViewKey {
            self.key
        }

        fn display_name(&self) -> &str {
            &self.name
        }

        fn refresh(&mut self, _state: &State) -> anyhow::Result<()> {
            self.log.lock().push(format!("refresh {}", self.name));
            Ok(())
        }

        fn set_visible(&mut self, visible: bool) {
            if self.visibility.apply(visible) {
                self.log.lock().push(format!("visible {} {}", self.name, visible));
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

    pub fn all_views(log: &Arc<Mutex<Vec<String>>>) -> Vec<Box<dyn View>> {
        ViewKey::ALL
            .iter()
            .map(|key| Box::new(RecordingView::new(*key, log.clone())) as Box<dyn View>)
            .collect()
    }
}

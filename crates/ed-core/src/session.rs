//! Startup orchestration and input dispatch
//!
//! A [`Session`] owns the state and the view manager for the lifetime of the
//! process. Everything runs on one thread: the only suspension points are
//! the data load and the cooperative yields while search indices are built,
//! and no lock is ever held across them.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::aggregate::Collections;
use crate::config::EngineSettings;
use crate::events::UiEvent;
use crate::row::{Level, RawRecord};
use crate::state::State;
use crate::view::{View, ViewKey};
use crate::view_manager::ViewManager;

/// Source of raw records, e.g. a CSV file.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Read every record.
    async fn load(&self) -> anyhow::Result<Vec<RawRecord>>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}

/// Running engine: shared state plus the views rendering it.
pub struct Session {
    state: Arc<RwLock<State>>,
    views: Mutex<ViewManager>,
}

impl Session {
    /// Load, aggregate, register views and build the search indices.
    pub async fn launch(
        source: &dyn RowSource,
        views: Vec<Box<dyn View>>,
        settings: EngineSettings,
    ) -> anyhow::Result<Self> {
        let raw = source.load().await?;
        info!(source = source.source_name(), records = raw.len(), "Loaded records");
        let session = Self::start(raw, views, settings)?;
        session.build_indices().await?;
        Ok(session)
    }

    /// Aggregate `raw`, register `views` and show unfiltered data.
    ///
    /// Search is not live until [`Session::build_indices`] has run.
    pub fn start(raw: Vec<RawRecord>, views: Vec<Box<dyn View>>, settings: EngineSettings) -> anyhow::Result<Self> {
        let collections = Collections::derive(raw);
        info!(
            schools = collections.schools.len(),
            boards = collections.boards.len(),
            years = collections.sector.len(),
            "Aggregated rows"
        );

        let session = Self {
            state: Arc::new(RwLock::new(State::new(collections, settings))),
            views: Mutex::new(ViewManager::new(views)?),
        };
        session.refresh()?;
        Ok(session)
    }

    /// Build the school index, then the board index, yielding before each,
    /// then refresh so search results appear.
    pub async fn build_indices(&self) -> anyhow::Result<()> {
        for level in [Level::School, Level::Board] {
            tokio::task::yield_now().await;
            let job = self.state.read().index_job(level);
            let slot = self.state.read().index_slot(level).cloned();
            if let (Some(job), Some(slot)) = (job, slot) {
                slot.rebuild(job).await;
            }
        }
        self.refresh()?;
        Ok(())
    }

    /// Replace every collection with ones derived from `raw` and rebuild the
    /// search indices.
    pub async fn reload(&self, raw: Vec<RawRecord>) -> anyhow::Result<()> {
        let collections = Collections::derive(raw);
        info!(schools = collections.schools.len(), "Reloading rows");
        self.state.write().replace_collections(collections);
        self.refresh()?;
        self.build_indices().await
    }

    /// Apply one input event and bring the views up to date.
    pub fn dispatch(&self, event: UiEvent) -> anyhow::Result<ViewKey> {
        self.state.write().apply(event);
        self.refresh()
    }

    /// Refresh every view against the current state.
    pub fn refresh(&self) -> anyhow::Result<ViewKey> {
        let state = self.state.read();
        self.views.lock().update_from_state(&state)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.state.read())
    }

    pub fn with_views<R>(&self, f: impl FnOnce(&mut ViewManager) -> R) -> R {
        f(&mut self.views.lock())
    }

    /// Whether both search indices are built.
    pub fn search_ready(&self) -> bool {
        let state = self.state.read();
        [Level::School, Level::Board]
            .iter()
            .filter_map(|level| state.index_slot(*level))
            .all(|slot| slot.is_ready())
    }
}

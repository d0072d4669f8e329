//! Fuzzy search over a row collection
//!
//! A [`SearchIndex`] is an immutable snapshot of one collection together
//! with the lower-cased search key of every row. Indices live in an
//! [`IndexSlot`] which starts empty and is filled once a build completes;
//! queries against an empty slot return nothing.

use std::sync::Arc;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::row::Row;

/// Produces the search string for a row.
pub type KeySelector = fn(&Row) -> String;

/// Search key for school rows: board, school name and city.
pub fn school_key(row: &Row) -> String {
    match row.school_detail() {
        Some(detail) => format!("{} {} {}", row.board(), detail.id.name, detail.city),
        None => row.board().to_string(),
    }
}

/// Search key for aggregate rows: the group name.
pub fn board_key(row: &Row) -> String {
    row.display_name().to_string()
}

/// Immutable fuzzy index over one collection.
pub struct SearchIndex {
    rows: Arc<Vec<Row>>,
    keys: Vec<String>,
}

impl SearchIndex {
    /// Build the index in one go.
    pub fn build(rows: Arc<Vec<Row>>, key: KeySelector) -> Self {
        let keys = rows.iter().map(|row| key(row).to_lowercase()).collect();
        Self { rows, keys }
    }

    /// Build the index, handing control back to the scheduler every
    /// `chunk_size` rows.
    pub async fn build_cooperative(rows: Arc<Vec<Row>>, key: KeySelector, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let mut keys = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(chunk_size) {
            keys.extend(chunk.iter().map(|row| key(row).to_lowercase()));
            tokio::task::yield_now().await;
        }
        Self { rows, keys }
    }

    /// The collection this index was built from
    pub fn rows(&self) -> &Arc<Vec<Row>> {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of matching rows, best match first.
    ///
    /// An empty query matches every row in collection order.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let query = query.trim();
        if query.is_empty() {
            return (0..self.rows.len()).collect();
        }

        let pattern = Pattern::new(query, CaseMatching::Ignore, Normalization::Smart, AtomKind::Fuzzy);
        let mut matcher = Matcher::new(Config::DEFAULT);
        let mut buf = Vec::new();

        let mut scored: Vec<(usize, u32)> = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(idx, key)| {
                pattern
                    .score(Utf32Str::new(key, &mut buf), &mut matcher)
                    .map(|score| (idx, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.into_iter().map(|(idx, _)| idx).collect()
    }
}

#[derive(Default)]
struct SlotState {
    generation: u64,
    index: Option<Arc<SearchIndex>>,
}

/// Holder for the current index of one collection.
///
/// Each replacement of the underlying collection bumps the slot generation;
/// a build only installs its result if the generation it was started for is
/// still current. Builds for the same slot run one at a time.
pub struct IndexSlot {
    name: &'static str,
    state: RwLock<SlotState>,
    build_lock: tokio::sync::Mutex<()>,
}

impl IndexSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: RwLock::new(SlotState::default()),
            build_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// The installed index, if a build has completed for the current generation.
    pub fn get(&self) -> Option<Arc<SearchIndex>> {
        self.state.read().index.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().index.is_some()
    }

    /// Drop the installed index because its collection was replaced.
    pub fn invalidate(&self) -> u64 {
        let mut state = self.state.write();
        state.generation += 1;
        state.index = None;
        state.generation
    }

    /// Query the installed index against `rows`, the collection it must have
    /// been built from. Empty until a build for that collection has completed.
    pub fn search<'a>(&self, rows: &'a Arc<Vec<Row>>, query: &str) -> Vec<&'a Row> {
        match self.get() {
            Some(index) if Arc::ptr_eq(index.rows(), rows) => index
                .search(query)
                .into_iter()
                .map(|idx| &rows[idx])
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Build an index for `job` and install it if the job is still current.
    ///
    /// Returns whether the index was installed.
    pub async fn rebuild(&self, job: IndexJob) -> bool {
        let _guard = self.build_lock.lock().await;
        if job.generation != self.generation() {
            debug!(slot = self.name, "Skipping index build for replaced collection");
            return false;
        }

        let index = SearchIndex::build_cooperative(job.rows, job.key, job.chunk_size).await;
        let len = index.len();

        let mut state = self.state.write();
        if state.generation != job.generation {
            debug!(slot = self.name, "Discarding index built for replaced collection");
            return false;
        }
        state.index = Some(Arc::new(index));
        info!(slot = self.name, rows = len, "Search index ready");
        true
    }
}

/// Everything needed to build one slot's index, captured together so the
/// rows and generation always match.
#[derive(Clone)]
pub struct IndexJob {
    pub rows: Arc<Vec<Row>>,
    pub key: KeySelector,
    pub generation: u64,
    pub chunk_size: usize,
}

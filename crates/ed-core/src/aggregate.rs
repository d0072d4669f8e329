//! Aggregation engine
//!
//! Rolls a collection of rows up into one aggregate row per group key. The
//! engine has no notion of hierarchy: board totals come from aggregating
//! school rows by board and year, sector totals from aggregating the board
//! totals again by year alone.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::row::{Coverage, Level, Measures, RawRecord, Row, Weighted};

/// Label used as the group name for sector-wide totals
pub const SECTOR_LABEL: &str = "All Boards";

/// Key a row is grouped under.
///
/// The identity fields of the resulting aggregate come from the key, so every
/// member of a group shares them by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// `None` groups across all boards
    pub board: Option<String>,
    pub year: i32,
}

impl GroupKey {
    /// Group by owning board and year.
    pub fn board_year(row: &Row) -> Self {
        Self {
            board: Some(row.board().to_string()),
            year: row.year(),
        }
    }

    /// Group by year across every board.
    pub fn year(row: &Row) -> Self {
        Self {
            board: None,
            year: row.year(),
        }
    }

    pub fn label(&self) -> &str {
        self.board.as_deref().unwrap_or(SECTOR_LABEL)
    }

    fn level(&self) -> Level {
        if self.board.is_some() {
            Level::Board
        } else {
            Level::Sector
        }
    }
}

/// Sum of the finite values seen so far. Stays missing until one arrives.
#[derive(Debug, Clone, Copy, Default)]
struct FiniteSum {
    total: f64,
    seen: bool,
}

impl FiniteSum {
    fn add(&mut self, value: f64) {
        if value.is_finite() {
            self.total += value;
            self.seen = true;
        }
    }

    fn value(&self) -> f64 {
        if self.seen {
            self.total
        } else {
            f64::NAN
        }
    }
}

/// Numerator and backing area summed over the rows that report both.
#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    value: FiniteSum,
    area: FiniteSum,
}

impl WeightedSum {
    fn add(&mut self, weighted: Weighted) {
        if !weighted.is_missing() && weighted.area.is_finite() {
            self.value.add(weighted.value);
            self.area.add(weighted.area);
        }
    }

    fn value(&self) -> Weighted {
        Weighted::new(self.value.value(), self.area.value())
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    floor_area: FiniteSum,
    energy: FiniteSum,
    energy_norm: FiniteSum,
    ghg_kg: FiniteSum,
    energy_cover: WeightedSum,
    energy_norm_cover: WeightedSum,
    ghg_cover: WeightedSum,
    members: usize,
}

impl Accumulator {
    fn add(&mut self, row: &Row) {
        let measures = row.measures();
        self.floor_area.add(measures.floor_area);
        self.energy.add(measures.energy);
        self.energy_norm.add(measures.energy_norm);
        self.ghg_kg.add(measures.ghg_kg);

        let coverage = row.coverage();
        self.energy_cover.add(coverage.energy);
        self.energy_norm_cover.add(coverage.energy_norm);
        self.ghg_cover.add(coverage.ghg_kg);
        self.members += 1;
    }

    fn finish(self, key: GroupKey) -> Row {
        let measures = Measures {
            floor_area: self.floor_area.value(),
            energy: self.energy.value(),
            energy_norm: self.energy_norm.value(),
            ghg_kg: self.ghg_kg.value(),
        };
        let coverage = Coverage {
            energy: self.energy_cover.value(),
            energy_norm: self.energy_norm_cover.value(),
            ghg_kg: self.ghg_cover.value(),
        };
        let level = key.level();
        let board = key.label().to_string();
        Row::aggregate(level, board, key.year, measures, coverage, self.members)
    }
}

/// Produce one aggregate row per distinct key, in first-seen key order.
///
/// Additive measures are summed with missing values skipped. Each intensity
/// divides its summed numerator by the area of only those rows that reported
/// it, so intensities stay area-weighted and a member with a missing value
/// does not dilute its group.
pub fn aggregate<F>(rows: &[Row], key_fn: F) -> Vec<Row>
where
    F: Fn(&Row) -> GroupKey,
{
    let mut groups: IndexMap<GroupKey, Accumulator> = IndexMap::new();
    for row in rows {
        groups.entry(key_fn(row)).or_default().add(row);
    }
    groups
        .into_iter()
        .map(|(key, acc)| acc.finish(key))
        .collect()
}

/// Every row collection derived from one load of raw records.
///
/// Collections are shared behind `Arc` and replaced wholesale, never edited.
#[derive(Debug, Clone)]
pub struct Collections {
    pub schools: Arc<Vec<Row>>,
    pub boards: Arc<Vec<Row>>,
    pub sector: Arc<Vec<Row>>,
}

impl Collections {
    /// Build school rows and roll them up to board and sector totals.
    pub fn derive(raw: Vec<RawRecord>) -> Self {
        let schools: Vec<Row> = raw.into_iter().map(Row::from_raw).collect();
        Self::from_school_rows(schools)
    }

    pub fn from_school_rows(schools: Vec<Row>) -> Self {
        let boards = aggregate(&schools, GroupKey::board_year);
        let sector = aggregate(&boards, GroupKey::year);
        debug!(
            schools = schools.len(),
            boards = boards.len(),
            sector = sector.len(),
            "Derived row collections"
        );
        Self {
            schools: Arc::new(schools),
            boards: Arc::new(boards),
            sector: Arc::new(sector),
        }
    }

    pub fn empty() -> Self {
        Self::from_school_rows(Vec::new())
    }

    pub fn level(&self, level: Level) -> &Arc<Vec<Row>> {
        match level {
            Level::School => &self.schools,
            Level::Board => &self.boards,
            Level::Sector => &self.sector,
        }
    }
}

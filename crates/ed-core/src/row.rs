//! Row model
//!
//! A [`Row`] is one record at a given granularity: a single school for one
//! year, a board total for one year, or the sector total for one year. The
//! additive [`Measures`] are fixed at construction and the derived
//! [`Intensities`] are computed from them exactly once. Rows are never
//! mutated afterwards.

use serde::{Deserialize, Serialize};

/// Raw field values for one school and year, as produced by a data loader.
///
/// Numeric fields that could not be parsed are carried as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub year: i32,
    pub board: String,
    pub school: String,
    pub address: String,
    pub city: String,
    /// Floor area in square feet
    pub floor_area: f64,
    /// Energy use intensity in ekWh per square foot
    pub energy_intensity: f64,
    pub heating_degree_days: f64,
    pub ghg_kg: f64,
}

/// Additive quantities that can be summed across rows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measures {
    pub floor_area: f64,
    /// Total energy in ekWh
    pub energy: f64,
    /// Energy divided by heating degree days
    pub energy_norm: f64,
    pub ghg_kg: f64,
}

impl Measures {
    /// Derive the additive quantities for a single school record.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let energy = raw.energy_intensity * raw.floor_area;
        Self {
            floor_area: raw.floor_area,
            energy,
            energy_norm: ratio(energy, raw.heating_degree_days),
            ghg_kg: raw.ghg_kg,
        }
    }
}

/// A numerator together with the floor area of the rows that reported it.
///
/// Both halves are missing together, so a row that lacks the numerator (or
/// its area) adds nothing to either side of an aggregate intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weighted {
    pub value: f64,
    pub area: f64,
}

impl Weighted {
    pub const MISSING: Self = Self {
        value: f64::NAN,
        area: f64::NAN,
    };

    pub fn new(value: f64, area: f64) -> Self {
        if value.is_finite() && area.is_finite() {
            Self { value, area }
        } else {
            Self::MISSING
        }
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_nan()
    }

    fn intensity(&self) -> f64 {
        ratio(self.value, self.area)
    }
}

/// Intensity numerators, each paired with the area that backs it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub energy: Weighted,
    pub energy_norm: Weighted,
    pub ghg_kg: Weighted,
}

impl Coverage {
    pub(crate) fn of_measures(measures: &Measures) -> Self {
        Self {
            energy: Weighted::new(measures.energy, measures.floor_area),
            energy_norm: Weighted::new(measures.energy_norm, measures.floor_area),
            ghg_kg: Weighted::new(measures.ghg_kg, measures.floor_area),
        }
    }
}

/// Metrics normalized by floor area. `NaN` means missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intensities {
    /// ekWh per square foot
    pub energy_int: f64,
    /// ekWh per heating degree day per square foot
    pub energy_int_norm: f64,
    /// GHG kg per square foot
    pub ghg_int: f64,
}

impl Intensities {
    fn from_coverage(coverage: &Coverage) -> Self {
        Self {
            energy_int: coverage.energy.intensity(),
            energy_int_norm: coverage.energy_norm.intensity(),
            ghg_int: coverage.ghg_kg.intensity(),
        }
    }
}

/// Divide, yielding `NaN` instead of infinities when the denominator is zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || numerator.is_nan() || denominator.is_nan() {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Granularity of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    School,
    Board,
    Sector,
}

/// Identity of a school. Names alone are not unique across the province,
/// so the street address is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchoolId {
    pub name: String,
    pub address: String,
}

impl SchoolId {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Fields only present on school-level rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolDetail {
    pub id: SchoolId,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum RowKind {
    School(SchoolDetail),
    Aggregate { level: Level, members: usize },
}

/// One record at school, board or sector granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    year: i32,
    board: String,
    measures: Measures,
    coverage: Coverage,
    intensities: Intensities,
    kind: RowKind,
}

impl Row {
    /// Build a school row from a raw record.
    pub fn from_raw(raw: RawRecord) -> Self {
        let measures = Measures::from_raw(&raw);
        let detail = SchoolDetail {
            id: SchoolId::new(raw.school, raw.address),
            city: raw.city,
        };
        Self::school(detail, raw.board, raw.year, measures)
    }

    /// Build a school row from already-derived measures.
    pub fn school(detail: SchoolDetail, board: impl Into<String>, year: i32, measures: Measures) -> Self {
        let coverage = Coverage::of_measures(&measures);
        Self {
            year,
            board: board.into(),
            intensities: Intensities::from_coverage(&coverage),
            measures,
            coverage,
            kind: RowKind::School(detail),
        }
    }

    pub(crate) fn aggregate(
        level: Level,
        board: String,
        year: i32,
        measures: Measures,
        coverage: Coverage,
        members: usize,
    ) -> Self {
        Self {
            year,
            board,
            intensities: Intensities::from_coverage(&coverage),
            measures,
            coverage,
            kind: RowKind::Aggregate { level, members },
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Owning board, or the sector label for sector totals
    pub fn board(&self) -> &str {
        &self.board
    }

    pub fn measures(&self) -> &Measures {
        &self.measures
    }

    pub fn intensities(&self) -> &Intensities {
        &self.intensities
    }

    pub fn coverage(&self) -> &Coverage {
        &self.coverage
    }

    pub fn level(&self) -> Level {
        match &self.kind {
            RowKind::School(_) => Level::School,
            RowKind::Aggregate { level, .. } => *level,
        }
    }

    /// School-only fields; `None` for aggregates.
    pub fn school_detail(&self) -> Option<&SchoolDetail> {
        match &self.kind {
            RowKind::School(detail) => Some(detail),
            RowKind::Aggregate { .. } => None,
        }
    }

    pub fn school_id(&self) -> Option<&SchoolId> {
        self.school_detail().map(|detail| &detail.id)
    }

    /// Number of finer rows summed into this one (1 for schools).
    pub fn members(&self) -> usize {
        match &self.kind {
            RowKind::School(_) => 1,
            RowKind::Aggregate { members, .. } => *members,
        }
    }

    /// Name shown to the user: the school name, or the group key for aggregates.
    pub fn display_name(&self) -> &str {
        match &self.kind {
            RowKind::School(detail) => &detail.id.name,
            RowKind::Aggregate { .. } => &self.board,
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.school_detail().map(|detail| detail.city.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn raw(area: f64, eui: f64, hdd: f64) -> RawRecord {
        RawRecord {
            year: 2020,
            board: "Toronto DSB".to_string(),
            school: "Maple PS".to_string(),
            address: "1 Maple Ave".to_string(),
            city: "Toronto".to_string(),
            floor_area: area,
            energy_intensity: eui,
            heating_degree_days: hdd,
            ghg_kg: 1500.0,
        }
    }

    #[test]
    fn test_derived_metrics_from_raw() {
        let row = Row::from_raw(raw(1000.0, 2.0, 4000.0));
        assert_eq!(row.measures().energy, 2000.0);
        assert_eq!(row.measures().energy_norm, 0.5);
        assert_eq!(row.intensities().energy_int, 2.0);
        assert_eq!(row.intensities().energy_int_norm, 0.0005);
        assert_eq!(row.intensities().ghg_int, 1.5);
        assert_eq!(row.level(), Level::School);
        assert_eq!(row.display_name(), "Maple PS");
        assert_eq!(row.city(), Some("Toronto"));
    }

    #[test]
    fn test_zero_area_is_missing_not_zero() {
        let row = Row::from_raw(raw(0.0, 2.0, 4000.0));
        assert!(row.intensities().energy_int.is_nan());
        assert!(row.intensities().ghg_int.is_nan());
    }

    #[test]
    fn test_zero_degree_days_is_missing() {
        let row = Row::from_raw(raw(1000.0, 2.0, 0.0));
        assert!(row.measures().energy_norm.is_nan());
        assert!(row.intensities().energy_int_norm.is_nan());
        assert_eq!(row.intensities().energy_int, 2.0);
    }

    #[test]
    fn test_malformed_measure_propagates_nan() {
        let row = Row::from_raw(raw(1000.0, f64::NAN, 4000.0));
        assert!(row.measures().energy.is_nan());
        assert!(row.intensities().energy_int.is_nan());
        assert_eq!(row.measures().floor_area, 1000.0);
    }

    #[test]
    fn test_coverage_pairs_numerator_with_area() {
        let row = Row::from_raw(raw(1000.0, 2.0, f64::NAN));
        assert_eq!(row.coverage().energy, Weighted::new(2000.0, 1000.0));
        assert!(row.coverage().energy_norm.is_missing());
        assert!(row.coverage().energy_norm.area.is_nan());
        assert_eq!(row.coverage().ghg_kg.area, 1000.0);
    }
}

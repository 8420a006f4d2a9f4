use std::collections::{BTreeMap, BTreeSet};

use super::columns::{CATEGORICAL, START_YEAR};
use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: selected values per column plus a start-year range
// ---------------------------------------------------------------------------

/// Label of the sidebar entry that switches a column's filter off.
pub const ALL_LABEL: &str = "All (no filter)";

/// Used when the rows carry no `Start year` at all.
pub const DEFAULT_YEAR_BOUNDS: YearRange = YearRange {
    low: 1900,
    high: 2100,
};

/// Selection state of one categorical column.
///
/// `All` and an empty `Values` set both mean "no filter".  Deselecting every
/// value therefore shows everything rather than nothing, same as picking
/// the "All" entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    #[default]
    All,
    Values(BTreeSet<String>),
}

impl ColumnSelection {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn is_unfiltered(&self) -> bool {
        match self {
            ColumnSelection::All => true,
            ColumnSelection::Values(set) => set.is_empty(),
        }
    }

    /// A missing value never passes a non-empty selection.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            ColumnSelection::Values(set) if !set.is_empty() => {
                value.is_some_and(|v| set.contains(v))
            }
            _ => true,
        }
    }
}

/// Inclusive `Start year` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub low: i64,
    pub high: i64,
}

impl YearRange {
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Missing years are outside every range, however wide.
    pub fn contains(&self, year: Option<f64>) -> bool {
        year.is_some_and(|y| self.low as f64 <= y && y <= self.high as f64)
    }

    /// Clamp into `bounds`, keeping `low <= high`.
    pub fn clamp_to(self, bounds: YearRange) -> YearRange {
        let low = self.low.clamp(bounds.low, bounds.high);
        let high = self.high.clamp(low, bounds.high);
        YearRange { low, high }
    }
}

/// Constraints chosen for one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Categorical selections; a column with no entry is unfiltered.
    pub columns: BTreeMap<String, ColumnSelection>,
    pub year_range: YearRange,
}

impl FilterSpec {
    /// No categorical filtering, the given year range.
    pub fn new(year_range: YearRange) -> Self {
        Self {
            columns: BTreeMap::new(),
            year_range,
        }
    }

    pub fn with_selection(mut self, column: &str, selection: ColumnSelection) -> Self {
        self.columns.insert(column.to_string(), selection);
        self
    }

    pub fn selection(&self, column: &str) -> Option<&ColumnSelection> {
        self.columns.get(column)
    }

    fn accepts_column(&self, record: &Record, column: &str) -> bool {
        self.selection(column)
            .map_or(true, |sel| sel.accepts(record.text(column)))
    }
}

// ---------------------------------------------------------------------------
// FilteredDataset – an order-preserving view
// ---------------------------------------------------------------------------

/// Row subset of a [`Dataset`], stored as indices in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredDataset<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredDataset<'a> {
    /// View over every row.
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the rows that pass every categorical selection and the year range.
///
/// Selections on columns the dataset lacks are ignored.  So is the year range
/// when there is no `Start year` column.  Row order is preserved.
pub fn apply_filters<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredDataset<'a> {
    let mut view = subset_before(dataset, spec, CATEGORICAL.len());
    if dataset.has_column(START_YEAR) {
        let records = &dataset.records;
        view.indices
            .retain(|&i| spec.year_range.contains(records[i].number(START_YEAR)));
    }
    view
}

/// Rows passing only the categorical selections; the year slider's bounds
/// are computed over this subset.
pub fn categorical_subset<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> FilteredDataset<'a> {
    subset_before(dataset, spec, CATEGORICAL.len())
}

/// Observed `Start year` span of `rows`, or [`DEFAULT_YEAR_BOUNDS`] when no
/// row has one.
pub fn year_bounds<'r>(rows: impl IntoIterator<Item = &'r Record>) -> YearRange {
    let (min, max) = rows
        .into_iter()
        .filter_map(|r| r.number(START_YEAR))
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

    if min.is_finite() && max.is_finite() {
        YearRange::new(min as i64, max as i64)
    } else {
        DEFAULT_YEAR_BOUNDS
    }
}

/// Sidebar options for a categorical column.
///
/// Only rows passing the selections of the columns above `column` in
/// sidebar order count, so picking a region narrows the countries offered.
pub fn column_options(dataset: &Dataset, spec: &FilterSpec, column: &str) -> Vec<String> {
    if !dataset.has_column(column) {
        return Vec::new();
    }
    let position = CATEGORICAL
        .iter()
        .position(|c| *c == column)
        .unwrap_or(CATEGORICAL.len());

    let options: BTreeSet<&str> = subset_before(dataset, spec, position)
        .rows()
        .filter_map(|r| r.text(column))
        .collect();
    options.into_iter().map(str::to_string).collect()
}

/// Categorical columns among the first `upto` in sidebar order that are
/// present and actually constrain something.
fn active_columns(dataset: &Dataset, spec: &FilterSpec, upto: usize) -> Vec<&'static str> {
    CATEGORICAL[..upto]
        .iter()
        .copied()
        .filter(|col| dataset.has_column(col))
        .filter(|col| spec.selection(col).is_some_and(|s| !s.is_unfiltered()))
        .collect()
}

fn subset_before<'a>(dataset: &'a Dataset, spec: &FilterSpec, upto: usize) -> FilteredDataset<'a> {
    let active = active_columns(dataset, spec, upto);
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| active.iter().all(|col| spec.accepts_column(rec, col)))
        .map(|(i, _)| i)
        .collect();
    FilteredDataset { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{COUNTRY, PLANT_TYPE, REGION, STATUS};
    use crate::data::model::CellValue;

    fn row(status: Option<&str>, region: Option<&str>, year: Option<f64>) -> Record {
        let text = |v: Option<&str>| v.map_or(CellValue::Missing, |s| CellValue::Text(s.into()));
        Record::from_iter([
            (STATUS, text(status)),
            (REGION, text(region)),
            (START_YEAR, year.map_or(CellValue::Missing, CellValue::Number)),
        ])
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![STATUS.into(), REGION.into(), START_YEAR.into()],
            vec![
                row(Some("operating"), Some("Asia"), Some(2001.0)),
                row(Some("retired"), Some("Europe"), Some(1975.0)),
                row(None, Some("Asia"), Some(2010.0)),
                row(Some("operating"), None, None),
                row(Some("construction"), Some("Africa"), Some(2024.0)),
            ],
        )
    }

    #[test]
    fn no_filter_with_full_range_keeps_every_row_with_a_year() {
        let ds = sample();
        let spec = FilterSpec::new(year_bounds(&ds.records))
            .with_selection(STATUS, ColumnSelection::All)
            .with_selection(REGION, ColumnSelection::Values(BTreeSet::new()));

        let view = apply_filters(&ds, &spec);
        assert_eq!(view.indices(), &[0, 1, 2, 4]);
    }

    #[test]
    fn full_dataset_returned_when_nothing_constrains() {
        let ds = Dataset::new(
            vec![STATUS.into(), START_YEAR.into()],
            vec![
                row(Some("operating"), None, Some(2000.0)),
                row(Some("retired"), None, Some(1990.0)),
            ],
        );
        let spec = FilterSpec::new(year_bounds(&ds.records));
        let view = apply_filters(&ds, &spec);
        assert_eq!(view.len(), ds.len());
        assert!(view.rows().zip(&ds.records).all(|(a, b)| a == b));
    }

    #[test]
    fn selection_keeps_only_members_and_drops_missing() {
        let ds = sample();
        let spec = FilterSpec::new(DEFAULT_YEAR_BOUNDS)
            .with_selection(REGION, ColumnSelection::values(["Asia", "Africa"]));

        let view = apply_filters(&ds, &spec);
        assert_eq!(view.indices(), &[0, 2, 4]);
        assert!(view
            .rows()
            .all(|r| matches!(r.text(REGION), Some("Asia") | Some("Africa"))));
    }

    #[test]
    fn filters_combine_with_and() {
        let ds = sample();
        let spec = FilterSpec::new(YearRange::new(2000, 2020))
            .with_selection(STATUS, ColumnSelection::values(["operating", "retired"]))
            .with_selection(REGION, ColumnSelection::values(["Asia", "Europe"]));

        assert_eq!(apply_filters(&ds, &spec).indices(), &[0]);
    }

    #[test]
    fn missing_start_year_excluded_even_with_widest_range() {
        let ds = sample();
        let spec = FilterSpec::new(YearRange::new(i64::MIN, i64::MAX));
        let view = apply_filters(&ds, &spec);
        assert!(!view.indices().contains(&3));
        assert!(view.rows().all(|r| r.number(START_YEAR).is_some()));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = sample();
        let spec = FilterSpec::new(YearRange::new(1975, 2001));
        assert_eq!(apply_filters(&ds, &spec).indices(), &[0, 1]);
    }

    #[test]
    fn absent_columns_are_skipped() {
        let ds = sample();
        let spec = FilterSpec::new(DEFAULT_YEAR_BOUNDS)
            .with_selection(COUNTRY, ColumnSelection::values(["Chile"]));
        assert_eq!(apply_filters(&ds, &spec).len(), 4);

        let no_years = Dataset::new(
            vec![STATUS.into()],
            vec![Record::from_iter([(STATUS, CellValue::Text("operating".into()))])],
        );
        let spec = FilterSpec::new(YearRange::new(2000, 2000));
        assert_eq!(apply_filters(&no_years, &spec).len(), 1);
    }

    #[test]
    fn applying_twice_is_identical() {
        let ds = sample();
        let spec = FilterSpec::new(YearRange::new(1970, 2030))
            .with_selection(STATUS, ColumnSelection::values(["operating"]));
        let a = apply_filters(&ds, &spec);
        let b = apply_filters(&ds, &spec);
        assert_eq!(a.indices(), b.indices());
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn year_bounds_default_when_no_years() {
        let ds = Dataset::new(
            vec![STATUS.into(), START_YEAR.into()],
            vec![row(Some("operating"), None, None)],
        );
        assert_eq!(year_bounds(&ds.records), DEFAULT_YEAR_BOUNDS);
        assert_eq!(year_bounds(&sample().records), YearRange::new(1975, 2024));
    }

    #[test]
    fn year_bounds_ignore_infinite_years() {
        let ds = Dataset::new(
            vec![STATUS.into(), START_YEAR.into()],
            vec![
                row(Some("operating"), None, Some(1950.0)),
                row(Some("operating"), None, Some(2000.0)),
                row(Some("operating"), None, Some(f64::INFINITY)),
            ],
        );
        assert_eq!(year_bounds(&ds.records), YearRange::new(1950, 2000));
    }

    #[test]
    fn options_cascade_from_earlier_columns_only() {
        let ds = sample();
        let spec = FilterSpec::new(DEFAULT_YEAR_BOUNDS)
            .with_selection(STATUS, ColumnSelection::values(["operating"]))
            .with_selection(REGION, ColumnSelection::values(["Europe"]));

        // Region sits above Status, so the Status selection doesn't narrow it.
        assert_eq!(column_options(&ds, &spec, REGION), vec!["Africa", "Asia", "Europe"]);
        // Status sees only European rows.
        assert_eq!(column_options(&ds, &spec, STATUS), vec!["retired"]);
        assert!(column_options(&ds, &spec, PLANT_TYPE).is_empty());
    }

    #[test]
    fn clamp_keeps_order() {
        let bounds = YearRange::new(1990, 2000);
        assert_eq!(YearRange::new(1950, 2050).clamp_to(bounds), bounds);
        assert_eq!(
            YearRange::new(2005, 1995).clamp_to(bounds),
            YearRange::new(2000, 2000)
        );
    }
}

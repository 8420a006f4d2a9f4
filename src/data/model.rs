use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::columns::Schema;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A cell after load: categorical text, a coerced number, or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Number(v) => write!(f, "{v:.2}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

static MISSING: CellValue = CellValue::Missing;

// ---------------------------------------------------------------------------
// Record – one row
// ---------------------------------------------------------------------------

/// One plant row: column name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn get(&self, column: &str) -> &CellValue {
        self.values.get(column).unwrap_or(&MISSING)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_text()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, CellValue)>>(iter: T) -> Self {
        Record {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table.  Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in file order.
    pub records: Vec<Record>,
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// Which known columns are present.
    pub schema: Schema,
    /// Sorted distinct non-missing values per present categorical column.
    pub unique_values: BTreeMap<String, BTreeSet<String>>,
}

impl Dataset {
    /// Build schema and categorical indices from the loaded rows.
    pub fn new(column_names: Vec<String>, records: Vec<Record>) -> Self {
        let schema = Schema::new(column_names.iter().cloned());

        let mut unique_values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for col in schema.categorical() {
            let values = records
                .iter()
                .filter_map(|r| r.text(col))
                .map(str::to_string)
                .collect();
            unique_values.insert(col.to_string(), values);
        }

        Dataset {
            records,
            column_names,
            schema,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.schema.has(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{REGION, STATUS};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn unique_values_skip_missing_and_sort() {
        let records = vec![
            Record::from_iter([(STATUS, text("retired")), (REGION, CellValue::Missing)]),
            Record::from_iter([(STATUS, text("operating")), (REGION, text("Asia"))]),
            Record::from_iter([(STATUS, CellValue::Missing), (REGION, text("Asia"))]),
        ];
        let ds = Dataset::new(vec![STATUS.into(), REGION.into()], records);

        let statuses: Vec<_> = ds.unique_values[STATUS].iter().cloned().collect();
        assert_eq!(statuses, vec!["operating", "retired"]);
        assert_eq!(ds.unique_values[REGION].len(), 1);
    }

    #[test]
    fn header_only_table_is_empty() {
        let ds = Dataset::new(vec![STATUS.into(), REGION.into()], Vec::new());
        assert!(ds.is_empty());
        assert!(ds.has_column(STATUS));
        assert!(ds.unique_values[STATUS].is_empty());
    }

    #[test]
    fn absent_cell_reads_as_missing() {
        let rec = Record::from_iter([(STATUS, text("operating"))]);
        assert!(rec.get("Region").is_missing());
        assert_eq!(rec.number("Start year"), None);
    }

    #[test]
    fn display_renders_whole_numbers_without_decimals() {
        assert_eq!(CellValue::Number(2001.0).to_string(), "2001");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.50");
        assert_eq!(CellValue::Missing.to_string(), "<missing>");
    }
}

use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Known column names
// ---------------------------------------------------------------------------

pub const PLANT_TYPE: &str = "Plant Type";
pub const TECHNOLOGY: &str = "Technology";
pub const REGION: &str = "Region";
pub const SUBREGION: &str = "Subregion";
pub const COUNTRY: &str = "Country/area";
pub const STATUS: &str = "Status";

pub const START_YEAR: &str = "Start year";
pub const RETIRED_YEAR: &str = "Retired year";
pub const CAPACITY_MW: &str = "installed capacity MW";

/// Categorical filter columns, in sidebar order.  Cascading options depend on
/// this order (each column only offers values surviving the ones above it).
pub const CATEGORICAL: [&str; 6] = [PLANT_TYPE, TECHNOLOGY, REGION, SUBREGION, COUNTRY, STATUS];

/// Columns coerced to numbers at load time.
pub const NUMERIC: [&str; 3] = [START_YEAR, RETIRED_YEAR, CAPACITY_MW];

pub fn is_numeric(column: &str) -> bool {
    NUMERIC.contains(&column)
}

// ---------------------------------------------------------------------------
// Schema – which known columns the loaded file actually carries
// ---------------------------------------------------------------------------

/// Explicit column-presence index built once per dataset.
///
/// Every filter and aggregate step asks the schema before touching a column,
/// so a file lacking e.g. `Region` just skips that step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    present: BTreeSet<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            present: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, column: &str) -> bool {
        self.present.contains(column)
    }

    pub fn has_all(&self, columns: &[&str]) -> bool {
        columns.iter().all(|c| self.has(c))
    }

    /// Categorical filter columns present in this schema, in sidebar order.
    pub fn categorical(&self) -> impl Iterator<Item = &'static str> + '_ {
        CATEGORICAL.into_iter().filter(|c| self.has(c))
    }

    /// Known columns (categorical and numeric) the file does not have.
    pub fn missing_known(&self) -> Vec<&'static str> {
        CATEGORICAL
            .into_iter()
            .chain(NUMERIC)
            .filter(|c| !self.has(c))
            .collect()
    }
}

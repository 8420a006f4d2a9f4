use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::aggregate::{capacity_by_status, capacity_by_year, StatusCapacity, YearCapacity};
use crate::data::columns::{CAPACITY_MW, START_YEAR, STATUS};
use crate::data::filter::{apply_filters, FilterSpec, FilteredDataset};
use crate::data::model::Dataset;

/// Maximum number of rows shown in the data table.
pub const DISPLAY_CAP: usize = 10;
/// Seed for the display sample, so the same filters always show the same rows.
pub const SAMPLE_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// DashboardView – everything the presentation layer draws for one cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Rows passing the current filters.
    pub row_count: usize,
    /// Dataset indices of the rows shown in the table.
    pub sample: Vec<usize>,
    /// `None` when `Status` or capacity is absent, or no rows pass.
    pub by_status: Option<Vec<StatusCapacity>>,
    /// `None` when `Start year` or capacity is absent, or no rows pass.
    pub by_year: Option<Vec<YearCapacity>>,
}

/// One render cycle: filter, sample, aggregate.
///
/// Pure function of its inputs; the caller decides when to run it (on load
/// and whenever a sidebar control changes).
pub fn run(dataset: &Dataset, spec: &FilterSpec) -> DashboardView {
    let filtered = apply_filters(dataset, spec);
    log::debug!("Filters keep {} of {} rows", filtered.len(), dataset.len());

    let sample = display_sample(&filtered);

    let by_status = (!filtered.is_empty() && dataset.schema.has_all(&[STATUS, CAPACITY_MW]))
        .then(|| capacity_by_status(&filtered));
    let by_year = (!filtered.is_empty() && dataset.schema.has_all(&[START_YEAR, CAPACITY_MW]))
        .then(|| capacity_by_year(&filtered));

    DashboardView {
        row_count: filtered.len(),
        sample,
        by_status,
        by_year,
    }
}

/// Up to [`DISPLAY_CAP`] rows for the table.  Larger sets get a seeded random
/// sample, so repeated calls with the same rows pick the same ones.
pub fn display_sample(rows: &FilteredDataset<'_>) -> Vec<usize> {
    let indices = rows.indices();
    if indices.len() <= DISPLAY_CAP {
        return indices.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    rand::seq::index::sample(&mut rng, indices.len(), DISPLAY_CAP)
        .into_iter()
        .map(|pos| indices[pos])
        .collect()
}

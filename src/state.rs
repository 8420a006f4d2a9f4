use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::columns::STATUS;
use crate::data::filter::{
    categorical_subset, column_options, year_bounds, ColumnSelection, FilterSpec, YearRange,
    DEFAULT_YEAR_BOUNDS,
};
use crate::data::loader::DatasetCache;
use crate::data::model::Dataset;
use crate::pipeline::{self, DashboardView};

// ---------------------------------------------------------------------------
// Sidebar multiselect with an "All (no filter)" entry
// ---------------------------------------------------------------------------

/// Widget state of one categorical filter.  While `include_all` is ticked
/// the individual picks are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelect {
    pub include_all: bool,
    pub chosen: BTreeSet<String>,
}

impl Default for MultiSelect {
    fn default() -> Self {
        Self {
            include_all: true,
            chosen: BTreeSet::new(),
        }
    }
}

impl MultiSelect {
    pub fn selection(&self) -> ColumnSelection {
        if self.include_all {
            ColumnSelection::All
        } else {
            ColumnSelection::Values(self.chosen.clone())
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    cache: DatasetCache,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,
    pub source_path: Option<PathBuf>,

    /// Per-column sidebar selections.
    pub selections: BTreeMap<String, MultiSelect>,
    /// Current slider values.
    pub year_range: YearRange,
    /// Slider limits, observed over the categorically filtered rows.
    pub year_bounds: YearRange,
    /// Offered values per categorical column, in sidebar order.  Rebuilt
    /// only by `refilter`.
    pub sidebar_options: Vec<(String, Vec<String>)>,

    /// Output of the last pipeline run.
    pub view: DashboardView,
    /// Bar colours of the capacity-by-status chart.
    pub status_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            cache: DatasetCache::new(config.encoding),
            config,
            dataset: None,
            source_path: None,
            selections: BTreeMap::new(),
            year_range: DEFAULT_YEAR_BOUNDS,
            year_bounds: DEFAULT_YEAR_BOUNDS,
            sidebar_options: Vec::new(),
            view: DashboardView::default(),
            status_colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load the configured CSV.
    pub fn load_configured(&mut self) {
        let path = self.config.csv_path.clone();
        self.load(&path);
    }

    /// Load `path` through the cache.  On failure nothing downstream runs:
    /// the dataset is cleared and the error becomes the status message.
    pub fn load(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => self.set_dataset(path, dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dataset = None;
                self.source_path = None;
                self.sidebar_options.clear();
                self.view = DashboardView::default();
                self.status_message = Some(format!("{e}. Check your path."));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset every filter.
    pub fn set_dataset(&mut self, path: &Path, dataset: Arc<Dataset>) {
        self.selections = dataset
            .schema
            .categorical()
            .map(|col| (col.to_string(), MultiSelect::default()))
            .collect();
        self.year_bounds = year_bounds(&dataset.records);
        self.year_range = self.year_bounds;
        self.status_colors = dataset
            .unique_values
            .get(STATUS)
            .map(ColorMap::new)
            .unwrap_or_default();

        self.dataset = Some(dataset);
        self.source_path = Some(path.to_path_buf());
        self.status_message = None;
        self.refilter();
    }

    pub fn filter_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::new(self.year_range);
        for (col, select) in &self.selections {
            spec.columns.insert(col.clone(), select.selection());
        }
        spec
    }

    /// Sidebar options for `column` as of the last `refilter`.
    pub fn options(&self, column: &str) -> &[String] {
        self.sidebar_options
            .iter()
            .find(|(col, _)| col == column)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Recompute everything downstream of the sidebar.
    ///
    /// Columns are walked top to bottom: each one's options are rebuilt from
    /// the (already pruned) picks above it, and picks that fell out of them
    /// are dropped.  Then the year bounds are recomputed; if they moved, the
    /// slider resets to the new full span.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.clone() else {
            return;
        };

        let mut sidebar_options = Vec::new();
        for col in ds.schema.categorical() {
            let offered = column_options(&ds, &self.filter_spec(), col);
            if let Some(select) = self.selections.get_mut(col) {
                select.chosen.retain(|v| offered.contains(v));
            }
            sidebar_options.push((col.to_string(), offered));
        }
        self.sidebar_options = sidebar_options;

        let bounds = year_bounds(categorical_subset(&ds, &self.filter_spec()).rows());
        if bounds != self.year_bounds {
            self.year_bounds = bounds;
            self.year_range = bounds;
        } else {
            self.year_range = self.year_range.clamp_to(bounds);
        }

        self.view = pipeline::run(&ds, &self.filter_spec());
    }

    pub fn set_include_all(&mut self, column: &str, include_all: bool) {
        if let Some(select) = self.selections.get_mut(column) {
            select.include_all = include_all;
        }
        self.refilter();
    }

    /// Toggle a single value in a column's picks.
    pub fn toggle_value(&mut self, column: &str, value: &str) {
        if let Some(select) = self.selections.get_mut(column) {
            if !select.chosen.remove(value) {
                select.chosen.insert(value.to_string());
            }
        }
        self.refilter();
    }

    pub fn set_year_range(&mut self, low: i64, high: i64) {
        self.year_range = YearRange::new(low, high).clamp_to(self.year_bounds);
        self.refilter();
    }
}

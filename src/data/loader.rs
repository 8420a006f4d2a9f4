use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use super::columns;
use super::model::{CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found at {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid {encoding:?} text", .path.display())]
    Encoding { path: PathBuf, encoding: TextEncoding },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file has no header row")]
    NoColumns,
}

// ---------------------------------------------------------------------------
// Text encoding
// ---------------------------------------------------------------------------

/// Encoding the input file is decoded with.  Chosen at deployment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[serde(alias = "utf-8")]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[default]
    #[serde(alias = "latin-1", alias = "iso-8859-1")]
    Latin1,
}

impl TextEncoding {
    fn decode(self, bytes: Vec<u8>) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let text = String::from_utf8(bytes).ok()?;
                Some(match text.strip_prefix('\u{feff}') {
                    Some(rest) => rest.to_string(),
                    None => text,
                })
            }
            TextEncoding::Latin1 => Some(bytes.into_iter().map(char::from).collect()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited file with a header row.
///
/// Columns listed in [`columns::NUMERIC`] are coerced to numbers: anything that
/// doesn't parse becomes [`CellValue::Missing`] instead of failing the load.
/// Every other column stays text.  Empty cells are missing everywhere; a
/// blank-but-not-empty text cell is kept as text.
pub fn load_csv(path: &Path, encoding: TextEncoding) -> Result<Dataset, LoaderError> {
    if !path.is_file() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = encoding.decode(bytes).ok_or_else(|| LoaderError::Encoding {
        path: path.to_path_buf(),
        encoding,
    })?;

    parse_csv(&text)
}

/// Parse already-decoded CSV text.
pub fn parse_csv(text: &str) -> Result<Dataset, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoaderError::NoColumns);
    }
    let numeric: Vec<bool> = headers.iter().map(|h| columns::is_numeric(h)).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        // Short rows pad with missing; extra trailing fields are dropped.
        let record: Record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let raw = row.get(i).unwrap_or("");
                let value = if numeric[i] {
                    coerce_numeric(raw)
                } else {
                    parse_text(raw)
                };
                (name.clone(), value)
            })
            .collect();
        records.push(record);
    }

    Ok(Dataset::new(headers, records))
}

/// Numeric coercion: unparseable or non-finite values become missing, never
/// an error.
pub fn coerce_numeric(raw: &str) -> CellValue {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Missing,
    }
}

fn parse_text(raw: &str) -> CellValue {
    if raw.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(raw.to_string())
    }
}

// ---------------------------------------------------------------------------
// Per-session cache
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by resolved path.
///
/// Populated on first load of a path and never invalidated; later loads of
/// the same path hand back the same `Arc` without reading the file again.
#[derive(Debug, Default)]
pub struct DatasetCache {
    encoding: TextEncoding,
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            entries: HashMap::new(),
        }
    }

    /// Return the cached dataset for `path`, reading it on first use.
    ///
    /// The existence check runs on every call, so a file that disappears
    /// mid-session is reported even if an older copy is cached.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }
        let key = path.canonicalize().map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(hit) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {}", key.display());
            return Ok(Arc::clone(hit));
        }

        let dataset = Arc::new(load_csv(&key, self.encoding)?);
        log::info!(
            "Loaded {} rows x {} columns from {}",
            dataset.len(),
            dataset.column_names.len(),
            key.display()
        );
        let missing = dataset.schema.missing_known();
        if !missing.is_empty() {
            log::warn!("Columns absent from dataset, related views are skipped: {missing:?}");
        }

        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::columns::{CAPACITY_MW, START_YEAR, STATUS};

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn numeric_columns_are_coerced_and_bad_values_go_missing() {
        let csv = "Status,Start year,installed capacity MW,Plant name\n\
                   operating,2001,1500.5,Alpha\n\
                   retired,unknown,,Beta\n\
                   operating, 1999 ,n/a,\n";
        let ds = parse_csv(csv).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].number(START_YEAR), Some(2001.0));
        assert_eq!(ds.records[0].number(CAPACITY_MW), Some(1500.5));
        assert!(ds.records[1].get(START_YEAR).is_missing());
        assert!(ds.records[1].get(CAPACITY_MW).is_missing());
        assert_eq!(ds.records[2].number(START_YEAR), Some(1999.0));
        assert!(ds.records[2].get("Plant name").is_missing());
        assert_eq!(ds.records[1].text(STATUS), Some("retired"));
    }

    #[test]
    fn nan_literal_is_missing() {
        assert_eq!(coerce_numeric("NaN"), CellValue::Missing);
        assert_eq!(coerce_numeric("-12"), CellValue::Number(-12.0));
    }

    #[test]
    fn infinite_values_are_missing() {
        assert_eq!(coerce_numeric("inf"), CellValue::Missing);
        assert_eq!(coerce_numeric("-infinity"), CellValue::Missing);

        let ds = parse_csv("Start year
1950
2000
inf
").unwrap();
        assert!(ds.records[2].get(START_YEAR).is_missing());
        assert_eq!(
            crate::data::filter::year_bounds(&ds.records),
            crate::data::filter::YearRange::new(1950, 2000)
        );
    }

    #[test]
    fn blank_text_is_kept_and_empty_text_is_missing() {
        let ds = parse_csv("Status,Region
 ,
").unwrap();
        assert_eq!(ds.records[0].text(STATUS), Some(" "));
        assert!(ds.records[0].get("Region").is_missing());
    }

    #[test]
    fn ragged_rows_pad_with_missing() {
        let ds = parse_csv("Status,Region,Start year\noperating\n").unwrap();
        assert_eq!(ds.records[0].text(STATUS), Some("operating"));
        assert!(ds.records[0].get("Region").is_missing());
        assert!(ds.records[0].get(START_YEAR).is_missing());
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(matches!(parse_csv(""), Err(LoaderError::NoColumns)));
    }

    #[test]
    fn latin1_bytes_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "plants.csv", b"Country/area,Status\nC\xf4te d'Ivoire,operating\n");

        let ds = load_csv(&path, TextEncoding::Latin1).unwrap();
        assert_eq!(ds.records[0].text("Country/area"), Some("Côte d'Ivoire"));

        let err = load_csv(&path, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, LoaderError::Encoding { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let mut cache = DatasetCache::new(TextEncoding::Latin1);

        let err = cache.load(&path).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(p) if p == path));
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_returns_same_dataset_without_rereading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "plants.csv", b"Status\noperating\n");
        let mut cache = DatasetCache::new(TextEncoding::Utf8);

        let first = cache.load(&path).unwrap();
        write_file(&dir, "plants.csv", b"Status\noperating\nretired\n");
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_keys_by_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let path = write_file(&dir, "plants.csv", b"Status\noperating\n");
        let indirect = dir.path().join("sub").join("..").join("plants.csv");
        let mut cache = DatasetCache::new(TextEncoding::Utf8);

        let a = cache.load(&path).unwrap();
        let b = cache.load(&indirect).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}

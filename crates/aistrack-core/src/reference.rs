//! Static lookup tables loaded once at startup.
//!
//! Two tab-separated files with two columns each:
//! - Maritime Identification Digits (first three MMSI digits) to country
//! - Ship type and cargo code to description
//!
//! Lookups never fail; a missing key resolves to [`UNKNOWN`].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Value returned for any key the tables do not contain.
pub const UNKNOWN: &str = "Unknown";

/// Errors that can occur while loading a reference table.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The table file could not be opened.
    #[error("Failed to open reference table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be read.
    #[error("Malformed reference table {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Country and ship type lookup tables.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataStore {
    countries: HashMap<String, String>,
    ship_types: HashMap<String, String>,
}

impl ReferenceDataStore {
    /// Build a store from in-memory tables.
    pub fn new(countries: HashMap<String, String>, ship_types: HashMap<String, String>) -> Self {
        Self {
            countries,
            ship_types,
        }
    }

    /// Load both tables from disk. A missing file is an error.
    pub fn load(
        country_table: impl AsRef<Path>,
        ship_type_table: impl AsRef<Path>,
    ) -> Result<Self, ReferenceError> {
        let countries = read_table(country_table.as_ref())?;
        let ship_types = read_table(ship_type_table.as_ref())?;
        info!(
            "Loaded {} country codes and {} ship types",
            countries.len(),
            ship_types.len()
        );
        Ok(Self::new(countries, ship_types))
    }

    /// Country for an MMSI, keyed by its first three digits.
    pub fn country(&self, mmsi: &str) -> &str {
        mmsi.get(..3)
            .and_then(|mid| self.countries.get(mid))
            .map(String::as_str)
            .unwrap_or(UNKNOWN)
    }

    /// Description of a type and cargo code. Zero and absent codes are unknown.
    pub fn ship_type(&self, code: Option<u8>) -> &str {
        match code {
            None | Some(0) => UNKNOWN,
            Some(code) => self
                .ship_types
                .get(&code.to_string())
                .map(String::as_str)
                .unwrap_or(UNKNOWN),
        }
    }
}

fn read_table(path: &Path) -> Result<HashMap<String, String>, ReferenceError> {
    let file = std::fs::File::open(path).map_err(|source| ReferenceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(file).map_err(|source| ReferenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse `key<TAB>value` rows. Rows with fewer than two columns are skipped.
fn parse_table<R: Read>(reader: R) -> Result<HashMap<String, String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut table = HashMap::new();
    for record in reader.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(key), Some(value)) => {
                table.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => debug!("Skipping reference row {:?}", record),
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store() -> ReferenceDataStore {
        let countries = parse_table("211\tGermany\n218\tGermany\n244\tNetherlands\n".as_bytes()).unwrap();
        let types = parse_table("70\tCargo\n80\tTanker\n".as_bytes()).unwrap();
        ReferenceDataStore::new(countries, types)
    }

    #[test]
    fn test_country_by_prefix() {
        let store = store();
        assert_eq!(store.country("244123456"), "Netherlands");
        assert_eq!(store.country("211457860"), "Germany");
    }

    #[test]
    fn test_country_miss_is_unknown() {
        let store = store();
        assert_eq!(store.country("999000000"), UNKNOWN);
        assert_eq!(store.country("21"), UNKNOWN);
    }

    #[test]
    fn test_ship_type_lookup() {
        let store = store();
        assert_eq!(store.ship_type(Some(70)), "Cargo");
        assert_eq!(store.ship_type(Some(0)), UNKNOWN);
        assert_eq!(store.ship_type(None), UNKNOWN);
        assert_eq!(store.ship_type(Some(99)), UNKNOWN);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let table = parse_table("211\tGermany\njunk\n\n232\tUnited Kingdom\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table["232"], "United Kingdom");
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let mid = dir.path().join("mid.csv");
        let types = dir.path().join("shiptypes.txt");
        writeln!(std::fs::File::create(&mid).unwrap(), "211\tGermany").unwrap();
        writeln!(std::fs::File::create(&types).unwrap(), "52\tTug").unwrap();

        let store = ReferenceDataStore::load(&mid, &types).unwrap();
        assert_eq!(store.country("211000000"), "Germany");
        assert_eq!(store.ship_type(Some(52)), "Tug");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReferenceDataStore::load(dir.path().join("nope.csv"), dir.path().join("nope.txt"));
        assert!(matches!(result, Err(ReferenceError::Open { .. })));
    }
}

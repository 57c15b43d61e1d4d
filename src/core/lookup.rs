/*
 * Loads the lookup table that maps folder identifiers to display names.
 * The table comes from a two-column tabular source (CSV): the first row is a
 * header and is skipped, column one is the identifier (kept verbatim as a
 * string key), column two the display name used as the rename prefix. Rows
 * may carry extra columns, which are ignored; rows with fewer than two
 * columns are an error. Duplicate keys resolve last-row-wins.
 *
 * It uses a trait-based approach (`LookupLoaderOperations`) so the run
 * procedure can be exercised against mock loaders in tests. The concrete
 * implementation (`CoreLookupLoader`) reads the file through the csv crate.
 */
use crate::core::models::LookupTable;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum LookupError {
    NotFound(PathBuf),
    Csv { path: PathBuf, cause: csv::Error },
    TooFewColumns { path: PathBuf, line: u64 },
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound(p) => {
                write!(f, "Lookup table file does not exist: {p:?}")
            }
            LookupError::Csv { path, cause } => {
                write!(f, "Failed to read lookup table {path:?}: {cause}")
            }
            LookupError::TooFewColumns { path, line } => {
                write!(
                    f,
                    "Lookup table {path:?} has fewer than two columns at line {line}"
                )
            }
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Csv { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

pub trait LookupLoaderOperations: Send + Sync {
    fn load_lookup_table(&self, path: &Path) -> Result<LookupTable>;
}

pub struct CoreLookupLoader {}

impl CoreLookupLoader {
    pub fn new() -> Self {
        CoreLookupLoader {}
    }
}

impl Default for CoreLookupLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupLoaderOperations for CoreLookupLoader {
    /*
     * Reads the two leftmost columns of the CSV file at `path` into a fresh
     * `LookupTable`. The reader is configured with headers enabled (the
     * first row is discarded) and flexible record lengths, so a short row is
     * reported by this loader with its line number rather than rejected
     * wholesale by the csv crate.
     */
    fn load_lookup_table(&self, path: &Path) -> Result<LookupTable> {
        log::trace!("LookupLoader: Loading lookup table from {path:?}");
        if !path.is_file() {
            return Err(LookupError::NotFound(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|cause| LookupError::Csv {
                path: path.to_path_buf(),
                cause,
            })?;

        let mut table = LookupTable::new();
        for record_result in reader.records() {
            let record = record_result.map_err(|cause| LookupError::Csv {
                path: path.to_path_buf(),
                cause,
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let identifier = record.get(0).ok_or(LookupError::TooFewColumns {
                path: path.to_path_buf(),
                line,
            })?;
            let display_name = record.get(1).ok_or(LookupError::TooFewColumns {
                path: path.to_path_buf(),
                line,
            })?;
            // Last row wins on duplicate identifiers.
            table.insert(identifier.to_string(), display_name.to_string());
        }

        log::debug!(
            "LookupLoader: Loaded {} entries from {path:?}.",
            table.len()
        );
        Ok(table)
    }
}

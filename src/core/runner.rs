/*
 * The run procedure tying the core together: validate the request, load the
 * lookup table, then classify and copy every source root sequentially. The
 * adapter in `main` supplies an `ExtractionRequest` and gets back either the
 * final counters or the first error encountered. Loading happens before any
 * copying, so a lookup failure leaves the destination untouched.
 */
use crate::core::extractor::{ExtractError, ExtractorOperations};
use crate::core::lookup::{LookupError, LookupLoaderOperations};
use crate::core::models::{CopyCounters, ExtractionRequest};

#[derive(Debug)]
pub enum RunError {
    NoSourcesSelected,
    NoDestinationSelected,
    Lookup(LookupError),
    Extract(ExtractError),
}

impl From<LookupError> for RunError {
    fn from(err: LookupError) -> Self {
        RunError::Lookup(err)
    }
}

impl From<ExtractError> for RunError {
    fn from(err: ExtractError) -> Self {
        RunError::Extract(err)
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::NoSourcesSelected => {
                write!(f, "No source folder selected; at least one is required")
            }
            RunError::NoDestinationSelected => write!(f, "No destination folder selected"),
            RunError::Lookup(e) => write!(f, "{e}"),
            RunError::Extract(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Lookup(e) => Some(e),
            RunError::Extract(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;

/*
 * Executes one processing run. Counters start at zero regardless of any
 * previous run; on success they satisfy on_time + late == total files
 * copied. On failure the error is returned as-is; copies made before the
 * failure are kept (no undo of partial runs).
 */
pub fn execute_run(
    request: &ExtractionRequest,
    loader: &dyn LookupLoaderOperations,
    extractor: &dyn ExtractorOperations,
) -> Result<CopyCounters> {
    if request.sources.is_empty() {
        return Err(RunError::NoSourcesSelected);
    }
    if request.destination.as_os_str().is_empty() {
        return Err(RunError::NoDestinationSelected);
    }

    let table = loader.load_lookup_table(&request.lookup_path)?;
    log::info!(
        "Runner: Lookup table loaded ({} entries); processing {} source root(s).",
        table.len(),
        request.sources.len()
    );

    let counters = extractor.extract(&request.sources, &request.destination, &table)?;
    log::info!(
        "Runner: Finished. {} file(s) on time, {} too late.",
        counters.on_time,
        counters.late
    );
    Ok(counters)
}

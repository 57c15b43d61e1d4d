use std::collections::HashMap;
use std::path::PathBuf;

// Maps a 6-digit folder identifier to the display name used as the rename
// prefix. Built fresh from the tabular source for every run; never persisted.
// Duplicate keys in the source resolve last-row-wins, which plain insertion
// into a HashMap already gives us.
pub type LookupTable = HashMap<String, String>;

/*
 * The three inputs of a processing run, as supplied by the adapter:
 * one or more source roots to walk, the destination root, and the path of
 * the tabular source the lookup table is loaded from. The adapter owns how
 * these were obtained (command line, persisted last-used path); the core only
 * validates and consumes them.
 */
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub lookup_path: PathBuf,
}

impl ExtractionRequest {
    pub fn new(sources: Vec<PathBuf>, destination: PathBuf, lookup_path: PathBuf) -> Self {
        ExtractionRequest {
            sources,
            destination,
            lookup_path,
        }
    }
}

/*
 * Running totals of a processing run. `on_time` counts files copied into the
 * destination root, `late` counts files routed to the destination's
 * "TE LAAT" subfolder. Both start at zero for every run and are incremented
 * only after a file copy has actually succeeded.
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyCounters {
    pub on_time: u64,
    pub late: u64,
}

impl CopyCounters {
    pub fn total(&self) -> u64 {
        self.on_time + self.late
    }

    /// Bumps the counter matching the late flag of the copied file.
    pub fn record_copy(&mut self, late: bool) {
        if late {
            self.late += 1;
        } else {
            self.on_time += 1;
        }
    }
}

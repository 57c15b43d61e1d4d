/*
 * This module consolidates the core, platform-agnostic logic of the application.
 * It re-exports the key data structures and core functionalities (including
 * abstractions like `LookupLoaderOperations`, `ExtractorOperations`, and
 * `ConfigManagerOperations`) for loading the lookup table, classifying and
 * copying source trees, and persisting the last-used lookup path. The run
 * procedure in `runner` ties them together for the adapter in `main`.
 */
pub mod config;
pub mod extractor;
pub mod identifier;
pub mod lookup;
pub mod models;
pub mod path_utils;
pub mod runner;

// Re-export key structures
pub use models::{CopyCounters, ExtractionRequest, LookupTable};

// Re-export lookup loader related items
pub use lookup::{CoreLookupLoader, LookupError, LookupLoaderOperations};

// Re-export extractor related items
pub use extractor::{CoreExtractor, ExtractError, ExtractorOperations, LATE_FOLDER_NAME};

// Re-export config related items
pub use config::{ConfigError, ConfigManagerOperations, CoreConfigManager};

pub use runner::{RunError, execute_run};

/*
 * Persists the convenience setting of the application: the path of the last
 * used lookup table file. The value lives in a single-line plain-text file of
 * fixed name in the user's documents directory, read at startup and rewritten
 * whenever a new lookup path is supplied. Absence of the file is not an
 * error; failures here never block a run (the adapter logs and continues).
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) to allow for
 * different storage backends or mock implementations for testing. The primary
 * concrete implementation (`CoreConfigManager`) handles file system
 * interactions, utilizing the shared path utility for the documents
 * directory.
 */
use crate::core::path_utils;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const LAST_LOOKUP_PATH_FILENAME: &str = "last_lookup_path.txt";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoDocumentsDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoDocumentsDirectory => {
                write!(f, "Could not determine documents directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_last_lookup_path(&self) -> Result<Option<PathBuf>>;
    fn save_last_lookup_path(&self, lookup_path: &Path) -> Result<()>;
}

pub struct CoreConfigManager {
    file_name: String,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        Self::with_file_name(LAST_LOOKUP_PATH_FILENAME)
    }

    /// Uses a custom file name inside the documents directory. Mainly useful
    /// for tests that must not clobber the real setting.
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        CoreConfigManager {
            file_name: file_name.into(),
        }
    }

    fn config_file_path(&self) -> Result<PathBuf> {
        let documents_dir =
            path_utils::get_documents_dir().ok_or(ConfigError::NoDocumentsDirectory)?;
        Ok(documents_dir.join(&self.file_name))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the last used lookup path. A missing or empty file yields
     * `Ok(None)`; surrounding whitespace in the stored line is trimmed.
     */
    fn load_last_lookup_path(&self) -> Result<Option<PathBuf>> {
        let file_path = self.config_file_path()?;

        if !file_path.exists() {
            log::debug!("ConfigManager: Last lookup path file {file_path:?} does not exist.");
            return Ok(None);
        }

        let mut file = File::open(&file_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        if contents.trim().is_empty() {
            log::debug!("ConfigManager: Last lookup path file {file_path:?} is empty.");
            Ok(None)
        } else {
            let path_text = contents.trim();
            log::debug!("ConfigManager: Loaded last lookup path '{path_text}' from {file_path:?}.");
            Ok(Some(PathBuf::from(path_text)))
        }
    }

    /// Overwrites the stored lookup path with `lookup_path`.
    fn save_last_lookup_path(&self, lookup_path: &Path) -> Result<()> {
        let file_path = self.config_file_path()?;

        let mut file = File::create(&file_path)?;
        file.write_all(lookup_path.to_string_lossy().as_bytes())?;
        log::debug!("ConfigManager: Saved last lookup path {lookup_path:?} to {file_path:?}.");
        Ok(())
    }
}

/*
 * This module provides utility functions for path resolution, focusing on
 * the user's personal documents directory where the last-used lookup path is
 * persisted. It centralizes the directory logic so the config manager stays
 * free of platform specifics.
 */
use directories::UserDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the user's documents directory, creating it if necessary.
 * Uses the platform-reported documents folder when available and falls back
 * to `<home>/Documents` on platforms that do not report one (common on
 * minimal Linux setups without user-dirs configuration).
 *
 * Returns `None` if no home directory can be determined or the directory
 * could not be created.
 */
pub fn get_documents_dir() -> Option<PathBuf> {
    let user_dirs = UserDirs::new()?;
    let documents = user_dirs
        .document_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| user_dirs.home_dir().join("Documents"));

    if !documents.exists() {
        if let Err(e) = fs::create_dir_all(&documents) {
            log::error!("PathUtils: Failed to create documents directory {documents:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created documents directory: {documents:?}");
    }
    Some(documents)
}

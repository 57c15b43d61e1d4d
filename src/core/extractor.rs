/*
 * This module provides the tree classification and copy procedure at the
 * heart of the application. Each source root is walked recursively; at every
 * directory level a child directory is classified as a late marker (recurse
 * with the late flag forced on), a leaf source folder (its name yields an
 * identifier present in the lookup table; its direct files are copied and
 * descent stops), or a plain container (recurse with the flag unchanged).
 * Copied files land flat in the destination root, or flat in the
 * destination's "TE LAAT" subfolder when the late flag is set; source
 * structure is never mirrored any deeper than that.
 */
use crate::core::identifier::extract_identifier;
use crate::core::models::{CopyCounters, LookupTable};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the late-marker folders in source trees and of the destination
/// subfolder late files are routed to. Matched case-insensitively on the
/// source side; created with this exact casing on the destination side.
pub const LATE_FOLDER_NAME: &str = "TE LAAT";

/*
 * Defines custom error types for the classify-and-copy procedure. Every
 * variant carries the offending path (and the underlying I/O cause where
 * there is one) so a failed run can be reported with actionable context.
 * Any of these aborts the run: there is no retry and no skip-and-continue.
 */
#[derive(Debug)]
pub enum ExtractError {
    InvalidPath(PathBuf),
    ReadDir { path: PathBuf, cause: io::Error },
    CreateDir { path: PathBuf, cause: io::Error },
    Copy {
        source_path: PathBuf,
        dest_path: PathBuf,
        cause: io::Error,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::InvalidPath(p) => {
                write!(f, "Source folder does not exist or is not a directory: {p:?}")
            }
            ExtractError::ReadDir { path, cause } => {
                write!(f, "Failed to list directory {path:?}: {cause}")
            }
            ExtractError::CreateDir { path, cause } => {
                write!(f, "Failed to create destination directory {path:?}: {cause}")
            }
            ExtractError::Copy {
                source_path,
                dest_path,
                cause,
            } => {
                write!(
                    f,
                    "Failed to copy {source_path:?} to {dest_path:?}: {cause}"
                )
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::ReadDir { cause, .. }
            | ExtractError::CreateDir { cause, .. }
            | ExtractError::Copy { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

/*
 * Defines the classify-and-copy operation over source trees.
 * Implementations walk every source root, route files beneath "TE LAAT"
 * markers to the destination's late subfolder, rename copied files with the
 * display name looked up from the folder identifier, and report how many
 * files were copied on time and how many late.
 */
pub trait ExtractorOperations: Send + Sync {
    fn extract(
        &self,
        sources: &[PathBuf],
        destination: &Path,
        table: &LookupTable,
    ) -> Result<CopyCounters>;
}

pub struct CoreExtractor {}

impl CoreExtractor {
    pub fn new() -> Self {
        CoreExtractor {}
    }

    /*
     * Recursive classification of one directory level. `late` is inherited:
     * once a branch has passed through a "TE LAAT" marker it stays late for
     * the rest of that branch. Plain files at this level are ignored; only
     * files inside a matched leaf folder are copied.
     */
    fn classify_and_copy(
        &self,
        folder_path: &Path,
        late: bool,
        destination: &Path,
        table: &LookupTable,
        counters: &mut CopyCounters,
    ) -> Result<()> {
        for entry_path in sorted_dir_entries(folder_path)? {
            if !entry_path.is_dir() {
                continue;
            }
            let name = entry_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if name.eq_ignore_ascii_case(LATE_FOLDER_NAME) {
                log::debug!("Extractor: Entering late marker {entry_path:?}.");
                ensure_dir(&destination.join(LATE_FOLDER_NAME))?;
                self.classify_and_copy(&entry_path, true, destination, table, counters)?;
            } else if let Some(display_name) =
                extract_identifier(&name).and_then(|id| table.get(id))
            {
                log::debug!(
                    "Extractor: Leaf folder {entry_path:?} maps to '{display_name}' (late: {late})."
                );
                self.copy_leaf_files(&entry_path, display_name, late, destination, counters)?;
            } else {
                // Plain container (no identifier, or identifier not in the
                // table): traverse transparently with the flag unchanged.
                self.classify_and_copy(&entry_path, late, destination, table, counters)?;
            }
        }
        Ok(())
    }

    /*
     * Copies every regular file directly inside `folder_path` into the
     * destination (or its late subfolder), renamed with the display-name
     * prefix. Subdirectories of a leaf folder are not descended into; the
     * leaf is terminal for its branch.
     */
    fn copy_leaf_files(
        &self,
        folder_path: &Path,
        display_name: &str,
        late: bool,
        destination: &Path,
        counters: &mut CopyCounters,
    ) -> Result<()> {
        let target_dir = if late {
            destination.join(LATE_FOLDER_NAME)
        } else {
            destination.to_path_buf()
        };
        ensure_dir(&target_dir)?;

        for entry_path in sorted_dir_entries(folder_path)? {
            if !entry_path.is_file() {
                continue;
            }
            let file_name = entry_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let renamed = format!("{display_name}_{file_name}");
            let dest_path = resolve_collision(&target_dir.join(renamed));

            fs::copy(&entry_path, &dest_path).map_err(|cause| ExtractError::Copy {
                source_path: entry_path.clone(),
                dest_path: dest_path.clone(),
                cause,
            })?;
            counters.record_copy(late);
            log::trace!("Extractor: Copied {entry_path:?} to {dest_path:?}.");
        }
        Ok(())
    }
}

impl Default for CoreExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorOperations for CoreExtractor {
    /*
     * Walks every source root in order and returns the final counters.
     * The destination root is created if missing. A root that does not exist
     * or is not a directory fails the run before any of its entries are
     * touched; roots already processed keep their copies (no undo).
     */
    fn extract(
        &self,
        sources: &[PathBuf],
        destination: &Path,
        table: &LookupTable,
    ) -> Result<CopyCounters> {
        ensure_dir(destination)?;

        let mut counters = CopyCounters::default();
        for root in sources {
            if !root.is_dir() {
                return Err(ExtractError::InvalidPath(root.clone()));
            }
            log::debug!("Extractor: Processing source root {root:?}.");
            self.classify_and_copy(root, false, destination, table, &mut counters)?;
        }
        log::debug!(
            "Extractor: Run complete. {} on time, {} late.",
            counters.on_time,
            counters.late
        );
        Ok(counters)
    }
}

/*
 * Lists the children of `folder_path`, sorted lexicographically by file
 * name. The underlying read_dir order is platform-dependent; sorting keeps
 * traversal (and therefore collision numbering) deterministic.
 */
fn sorted_dir_entries(folder_path: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = fs::read_dir(folder_path).map_err(|cause| ExtractError::ReadDir {
        path: folder_path.to_path_buf(),
        cause,
    })?;

    let mut paths = Vec::new();
    for entry_result in read_dir {
        let entry = entry_result.map_err(|cause| ExtractError::ReadDir {
            path: folder_path.to_path_buf(),
            cause,
        })?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|cause| ExtractError::CreateDir {
        path: path.to_path_buf(),
        cause,
    })
}

/*
 * Resolves a destination filename collision. If `candidate` is free it is
 * used as-is; otherwise a numeric disambiguator is appended before the
 * extension, starting at "(2)" and counting up until a free name is found.
 * The filesystem is re-checked on every attempt, so collisions introduced
 * earlier in the same run are resolved too.
 */
fn resolve_collision(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 2u32;
    loop {
        let numbered = parent.join(format!("{stem}({counter}){extension}"));
        if !numbered.exists() {
            return numbered;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::LookupTable;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn acme_table() -> LookupTable {
        let mut table = LookupTable::new();
        table.insert("123456".to_string(), "Acme".to_string());
        table
    }

    fn make_file(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut f = File::create(path).unwrap();
        write!(f, "{contents}").unwrap();
    }

    #[test]
    fn test_leaf_folder_files_copied_with_prefix() {
        // Arrange
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("123456_Project/report.pdf"), "report");
        let table = acme_table();

        // Act
        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        // Assert
        let copied = dst.path().join("Acme_report.pdf");
        assert!(copied.is_file());
        assert_eq!(fs::read_to_string(copied).unwrap(), "report");
        assert_eq!(counters.on_time, 1);
        assert_eq!(counters.late, 0);
    }

    #[test]
    fn test_late_marker_routes_to_late_subfolder() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("TE LAAT/123456_Project/late.pdf"), "late");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("TE LAAT/Acme_late.pdf").is_file());
        assert!(!dst.path().join("Acme_late.pdf").exists());
        assert_eq!(counters.on_time, 0);
        assert_eq!(counters.late, 1);
    }

    #[test]
    fn test_late_flag_inherited_through_nested_containers() {
        // The late marker sits above an extra container level; the flag must
        // survive the intermediate recursion.
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(
            &src.path().join("TE LAAT/batch 3/123456_Project/x.pdf"),
            "x",
        );
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("TE LAAT/Acme_x.pdf").is_file());
        assert_eq!(counters.late, 1);
    }

    #[test]
    fn test_late_marker_matched_case_insensitively() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("te laat/123456_Project/x.pdf"), "x");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        // Destination subfolder always uses the canonical casing.
        assert!(dst.path().join("TE LAAT/Acme_x.pdf").is_file());
        assert_eq!(counters.late, 1);
    }

    #[test]
    fn test_same_run_collisions_numbered_in_discovery_order() {
        // Two source roots each contribute a file with the same renamed name.
        let src_a = tempdir().unwrap();
        let src_b = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src_a.path().join("123456_Project/x.pdf"), "first");
        make_file(&src_b.path().join("123456_Project/x.pdf"), "second");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(
                &[src_a.path().to_path_buf(), src_b.path().to_path_buf()],
                dst.path(),
                &table,
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("Acme_x.pdf")).unwrap(),
            "first"
        );
        assert_eq!(
            fs::read_to_string(dst.path().join("Acme_x(2).pdf")).unwrap(),
            "second"
        );
        assert_eq!(counters.on_time, 2);
    }

    #[test]
    fn test_third_collision_gets_next_number() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("123456_Project/x.pdf"), "new");
        // Pre-existing destination files already occupy the base name and (2).
        make_file(&dst.path().join("Acme_x.pdf"), "old");
        make_file(&dst.path().join("Acme_x(2).pdf"), "older");
        let table = acme_table();

        CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("Acme_x(3).pdf")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_collision_for_extensionless_file() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("123456_Project/README"), "new");
        make_file(&dst.path().join("Acme_README"), "old");
        let table = acme_table();

        CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("Acme_README(2)").is_file());
    }

    #[test]
    fn test_seven_digit_folder_is_a_container_not_a_leaf() {
        // "1234567" yields no identifier, so it is traversed transparently;
        // the matched folder inside it is still found.
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("1234567/ignored.txt"), "ignored");
        make_file(&src.path().join("1234567/123456_Inner/found.txt"), "found");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("Acme_found.txt").is_file());
        // The container's own files are never copied.
        assert!(!dst.path().join("Acme_ignored.txt").exists());
        assert_eq!(counters.total(), 1);
    }

    #[test]
    fn test_identifier_without_table_entry_is_a_container() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("999999_Unknown/file.txt"), "data");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        // No identifier match anywhere beneath it, so nothing is copied.
        assert_eq!(counters.total(), 0);
    }

    #[test]
    fn test_leaf_folder_is_terminal() {
        // A matched leaf containing a nested matched folder: only the leaf's
        // direct files are copied, the nested folder is never visited.
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("123456_Project/direct.txt"), "direct");
        make_file(
            &src.path().join("123456_Project/123456_Nested/deep.txt"),
            "deep",
        );
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("Acme_direct.txt").is_file());
        assert!(!dst.path().join("Acme_deep.txt").exists());
        assert_eq!(counters.total(), 1);
    }

    #[test]
    fn test_files_at_container_level_are_ignored() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("loose.txt"), "loose");
        make_file(&src.path().join("123456_Project/kept.txt"), "kept");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert!(dst.path().join("Acme_kept.txt").is_file());
        assert!(!dst.path().join("loose.txt").exists());
        assert_eq!(counters.total(), 1);
    }

    #[test]
    fn test_late_marker_without_identifier_match_copies_nothing() {
        // Late detection alone triggers no copies; only identifier-matched
        // leaves do. The destination late subfolder is still created when the
        // marker is entered.
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        make_file(&src.path().join("TE LAAT/orphan.txt"), "orphan");
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert_eq!(counters.total(), 0);
        assert!(dst.path().join(LATE_FOLDER_NAME).is_dir());
        assert!(!dst.path().join("TE LAAT/orphan.txt").exists());
    }

    #[test]
    fn test_every_leaf_file_copied_exactly_once() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        for name in ["a.txt", "b.txt", "c.txt"] {
            make_file(&src.path().join("123456_Project").join(name), name);
        }
        let table = acme_table();

        let counters = CoreExtractor::new()
            .extract(&[src.path().to_path_buf()], dst.path(), &table)
            .unwrap();

        assert_eq!(counters.on_time, 3);
        let copied: Vec<_> = fs::read_dir(dst.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(copied.len(), 3);
        for name in ["Acme_a.txt", "Acme_b.txt", "Acme_c.txt"] {
            assert!(copied.iter().any(|c| c == name), "Missing {name}");
        }
    }

    #[test]
    fn test_missing_source_root_fails_with_invalid_path() {
        let dst = tempdir().unwrap();
        let missing = dst.path().join("does_not_exist");
        let table = acme_table();

        match CoreExtractor::new().extract(&[missing.clone()], dst.path(), &table) {
            Err(ExtractError::InvalidPath(p)) => assert_eq!(p, missing),
            other => panic!("Expected InvalidPath, got {other:?}"),
        }
    }
}

//! File selection
//!
//! Turns command-line arguments into the list of documents to upload. Only
//! names ending in `.pdf` (any case) are sent; file contents are not
//! inspected here.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Recognized document extension, lower case with the dot
pub const PDF_SUFFIX: &str = ".pdf";

const IGNORED_NAMES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Candidate paths split by the suffix filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Paths that will be uploaded, in input order
    pub accepted: Vec<PathBuf>,
    /// Paths dropped by the filter, in input order
    pub rejected: Vec<PathBuf>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}

/// True when the file name ends with `.pdf`, ignoring case
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(PDF_SUFFIX)
}

/// Split candidate paths into accepted PDFs and rejected others
pub fn select_pdf_files<P: AsRef<Path>>(paths: &[P]) -> Selection {
    let mut selection = Selection::default();

    for path in paths {
        let path = path.as_ref();
        let accepted = path
            .file_name()
            .map(|name| is_pdf_name(&name.to_string_lossy()))
            .unwrap_or(false);

        if accepted {
            selection.accepted.push(path.to_path_buf());
        } else {
            selection.rejected.push(path.to_path_buf());
        }
    }

    selection
}

/// Expand directory arguments into the files they contain
///
/// Directories yield their files sorted by name (only direct children unless
/// `recursive`). Hidden entries and desktop metadata files are skipped. Any
/// other argument passes through as given, even if it does not exist.
pub fn expand_inputs(paths: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut expanded = Vec::new();

    for path in paths {
        if !path.is_dir() {
            expanded.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    expanded.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }
    }

    expanded
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || IGNORED_NAMES.contains(&name.as_ref())
}

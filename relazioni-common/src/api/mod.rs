//! Extraction service API surface
//!
//! Paths, form field names and payload types shared by every client of the
//! `/process_files` and `/download_csv` endpoints.

pub mod types;

pub use types::{ErrorBody, ProcessFilesResponse};

/// Upload endpoint (multipart POST)
pub const PROCESS_FILES_PATH: &str = "/process_files";

/// Prefix of the report download endpoint (GET `/download_csv/{name}`)
pub const DOWNLOAD_CSV_PREFIX: &str = "/download_csv/";

/// Repeatable multipart field carrying one PDF per part
pub const PDF_FILES_FIELD: &str = "pdf_files";

/// Content type sent with every uploaded part
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Server-relative path of a generated report
pub fn download_csv_path(report_filename: &str) -> String {
    format!("{}{}", DOWNLOAD_CSV_PREFIX, report_filename)
}

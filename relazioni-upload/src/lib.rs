//! relazioni-upload library interface
//!
//! Client side of the relazioni extraction service: pick PDFs, send them in
//! one request, render what the service answers. The binary in `main.rs` is a
//! thin command-line shell over [`UploadForm`].

pub mod client;
pub mod error;
pub mod form;
pub mod indicator;
pub mod render;
pub mod selection;

pub use crate::client::UploadClient;
pub use crate::error::UploadError;
pub use crate::form::{SubmissionOutcome, UploadForm};
pub use crate::indicator::{BusyGuard, BusyIndicator, TerminalIndicator};
pub use crate::render::{MessageArea, MessageKind};

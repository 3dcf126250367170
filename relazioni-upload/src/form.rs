//! Upload form: one submission from file selection to rendered result
//!
//! A submission clears the message area, filters the selection, sends at
//! most one request and renders whatever came back. Failures end the current
//! submission only; calling `submit` again starts over.

use crate::client::UploadClient;
use crate::error::UploadError;
use crate::indicator::{BusyGuard, BusyIndicator};
use crate::render::{render_response, MessageArea, MessageKind, NO_PDF_SELECTED};
use crate::selection::select_pdf_files;
use relazioni_common::api::ProcessFilesResponse;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Result of one submission
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// No `.pdf` file in the selection; nothing was sent
    NoValidFiles,
    /// Server answered with 2xx and a decodable payload
    Completed(ProcessFilesResponse),
    /// Request, response or local read failed
    Failed(UploadError),
}

impl SubmissionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmissionOutcome::Completed(_))
    }
}

pub struct UploadForm<I: BusyIndicator> {
    client: UploadClient,
    indicator: I,
    messages: MessageArea,
}

impl<I: BusyIndicator> UploadForm<I> {
    pub fn new(client: UploadClient, indicator: I) -> Self {
        Self {
            client,
            indicator,
            messages: MessageArea::new(),
        }
    }

    pub fn client(&self) -> &UploadClient {
        &self.client
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Message area of the latest submission
    pub fn messages(&self) -> &MessageArea {
        &self.messages
    }

    /// Run one submission over the selected paths
    ///
    /// Takes `&mut self`: a form never has two submissions in flight. Log
    /// events are emitted only while the busy indicator is hidden.
    pub async fn submit(&mut self, selected: &[PathBuf]) -> SubmissionOutcome {
        self.messages.clear();

        let selection = select_pdf_files(selected);
        for skipped in &selection.rejected {
            debug!(path = %skipped.display(), "Skipping non-PDF file");
        }
        if !selection.is_empty() {
            info!(
                url = %self.client.base_url(),
                files = selection.accepted.len(),
                "Submitting files for extraction"
            );
        }

        let busy = BusyGuard::new(&mut self.indicator);

        if selection.is_empty() {
            drop(busy);
            info!(selected = selected.len(), "No PDF files selected");
            self.messages.show_message(NO_PDF_SELECTED, MessageKind::Warning);
            return SubmissionOutcome::NoValidFiles;
        }

        let result = self.client.process_files(&selection.accepted).await;
        drop(busy);

        match result {
            Ok(response) => {
                info!(
                    report = response.report_filename.as_deref().unwrap_or("-"),
                    warnings = response.warnings.len(),
                    errors = response.errors.len(),
                    "Extraction request completed"
                );
                render_response(&response, &mut self.messages);
                SubmissionOutcome::Completed(response)
            }
            Err(err) => {
                error!("Submission failed: {}", err);
                self.messages
                    .show_message(format!("Errore: {}", err), MessageKind::Error);
                SubmissionOutcome::Failed(err)
            }
        }
    }
}

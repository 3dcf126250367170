//! Extraction service HTTP client
//!
//! Sends the selected PDFs to `POST /process_files` as one multipart request
//! and optionally fetches the generated report from `GET /download_csv/{name}`.
//! Nothing is retried: every failure is returned to the caller as-is.

use crate::error::UploadError;
use relazioni_common::api::{
    download_csv_path, ProcessFilesResponse, PDF_CONTENT_TYPE, PDF_FILES_FIELD,
    PROCESS_FILES_PATH,
};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

const USER_AGENT: &str = concat!("relazioni-upload/", env!("CARGO_PKG_VERSION"));

/// Extraction service client
#[derive(Debug, Clone)]
pub struct UploadClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl UploadClient {
    /// Create a client for the service at `base_url`
    ///
    /// `timeout` of `None` waits for the server indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, UploadError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UploadError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UploadError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a server path
    pub fn endpoint(&self, path: &str) -> Result<Url, UploadError> {
        self.base_url
            .join(path)
            .map_err(|e| UploadError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Absolute URL where the named report can be downloaded
    pub fn download_url(&self, report_filename: &str) -> Result<Url, UploadError> {
        self.endpoint(&download_csv_path(report_filename))
    }

    /// Upload the files in one multipart request and decode the response
    ///
    /// Each file becomes one `pdf_files` part. All files are read before the
    /// request starts, so an unreadable file means no request is sent.
    /// Nothing is logged here: the caller's busy line owns the terminal
    /// while this runs.
    pub async fn process_files(
        &self,
        files: &[PathBuf],
    ) -> Result<ProcessFilesResponse, UploadError> {
        let mut form = Form::new();

        for path in files {
            let bytes = tokio::fs::read(path).await.map_err(|e| UploadError::FileRead {
                path: path.clone(),
                reason: e.to_string(),
            })?;

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(PDF_CONTENT_TYPE)?;
            form = form.part(PDF_FILES_FIELD, part);
        }

        let url = self.endpoint(PROCESS_FILES_PATH)?;
        let response = self
            .http_client
            .post(url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UploadError::from_status(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|e| UploadError::Parse(e.to_string()))
    }

    /// Download a generated report into `dest_dir`
    ///
    /// The local file keeps only the last path component of the report name.
    /// Returns the written path.
    pub async fn download_report(
        &self,
        report_filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, UploadError> {
        let local_name = Path::new(report_filename)
            .file_name()
            .ok_or_else(|| UploadError::InvalidReportName(report_filename.to_string()))?;

        let url = self.download_url(report_filename)?;
        tracing::debug!(url = %url, "Downloading report");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UploadError::from_status(status.as_u16(), &body));
        }

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(local_name);
        tokio::fs::write(&dest, &body).await?;

        tracing::info!(path = %dest.display(), bytes = body.len(), "Report saved");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = UploadClient::new("http://127.0.0.1:5000", None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            UploadClient::new("not a url", None),
            Err(UploadError::InvalidUrl(_))
        ));
        assert!(matches!(
            UploadClient::new("mailto:someone@example.com", None),
            Err(UploadError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_endpoints_are_origin_relative() {
        let client = UploadClient::new("http://10.0.0.5:8080/app/", None).unwrap();

        assert_eq!(
            client.endpoint(PROCESS_FILES_PATH).unwrap().as_str(),
            "http://10.0.0.5:8080/process_files"
        );
        assert_eq!(
            client.download_url("report_1717000000.csv").unwrap().as_str(),
            "http://10.0.0.5:8080/download_csv/report_1717000000.csv"
        );
    }

    #[tokio::test]
    async fn test_unreadable_file_is_reported_before_sending() {
        // Port 9 (discard) is never contacted: reading fails first
        let client = UploadClient::new("http://127.0.0.1:9", None).unwrap();
        let missing = PathBuf::from("/definitely/not/here.pdf");

        let result = client.process_files(&[missing.clone()]).await;

        match result {
            Err(UploadError::FileRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected FileRead, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_download_rejects_empty_report_name() {
        let client = UploadClient::new("http://127.0.0.1:9", None).unwrap();
        let dir = tempfile::TempDir::new().unwrap();

        let result = client.download_report("..", dir.path()).await;
        assert!(matches!(result, Err(UploadError::InvalidReportName(_))));
    }
}

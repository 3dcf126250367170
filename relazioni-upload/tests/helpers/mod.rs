//! Test helpers: stub extraction service and a recording busy indicator

#![allow(dead_code)]

pub mod log_capture;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use relazioni_upload::BusyIndicator;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// One multipart part as seen by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Canned answer of `POST /process_files`
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, content_type: &'static str, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct StubState {
    reply: Reply,
    report: Option<(String, String)>,
    requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
}

/// Extraction service stub on an ephemeral local port
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Vec<ReceivedPart>>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        Self::start_with_report(reply, None).await
    }

    /// Also serve `GET /download_csv/{name}` for one report
    pub async fn start_with_report(reply: Reply, report: Option<(&str, &str)>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            report: report.map(|(name, body)| (name.to_string(), body.to_string())),
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/process_files", post(process_files))
            .route("/download_csv/:name", get(download_csv))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Parts of every request received so far
    pub fn requests(&self) -> Vec<Vec<ReceivedPart>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn process_files(State(state): State<StubState>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        parts.push(ReceivedPart {
            field: field_name,
            file_name,
            content_type,
            size,
        });
    }
    state.requests.lock().unwrap().push(parts);

    (
        state.reply.status,
        [(header::CONTENT_TYPE, state.reply.content_type)],
        state.reply.body.clone(),
    )
        .into_response()
}

async fn download_csv(State(state): State<StubState>, Path(name): Path<String>) -> Response {
    match &state.report {
        Some((report_name, body)) if *report_name == name => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            body.clone(),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            serde_json::json!({"error": "Report non trovato"}).to_string(),
        )
            .into_response(),
    }
}

/// Base URL on which nothing is listening
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Create files with the given names under `dir`
pub fn write_files(dir: &std::path::Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, format!("%PDF-1.4\n% {}\n", name)).unwrap();
            path
        })
        .collect()
}

/// Busy indicator that counts transitions
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    visible: bool,
    pub shows: usize,
    pub hides: usize,
}

impl BusyIndicator for RecordingIndicator {
    fn show(&mut self) {
        self.visible = true;
        self.shows += 1;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hides += 1;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

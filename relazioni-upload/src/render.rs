//! Response rendering
//!
//! The message area is an ordered list of nodes, rebuilt for every
//! submission. It can be printed for the terminal or exported as an HTML
//! fragment with the same markup the web form produces.

use relazioni_common::api::{download_csv_path, ProcessFilesResponse};
use reqwest::Url;
use serde_json::Number;
use std::fmt;

/// Text shown when no PDF survives the filter
pub const NO_PDF_SELECTED: &str = "Seleziona almeno un PDF.";

/// Text shown for a successful response with nothing to report
pub const NO_RESULTS: &str = "Nessun risultato restituito.";

/// Label of the report download link
pub const DOWNLOAD_LINK_TEXT: &str = "Scarica Report CSV";

/// Severity of a message, also its CSS class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Success => "success",
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report download link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Server-relative target, `/download_csv/<name>`
    pub href: String,
    pub text: String,
    /// Suggested local file name
    pub download: String,
}

impl DownloadLink {
    pub fn for_report(report_filename: &str) -> Self {
        Self {
            href: download_csv_path(report_filename),
            text: DOWNLOAD_LINK_TEXT.to_string(),
            download: report_filename.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Message { kind: MessageKind, text: String },
    Link(DownloadLink),
}

/// Ordered output of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageArea {
    nodes: Vec<Node>,
}

impl MessageArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.nodes.push(Node::Message {
            kind,
            text: text.into(),
        });
    }

    pub fn append_link(&mut self, link: DownloadLink) {
        self.nodes.push(Node::Link(link));
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Texts of all messages of one kind, in order
    pub fn messages(&self, kind: MessageKind) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Message { kind: k, text } if *k == kind => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<&DownloadLink> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Link(link) => Some(link),
                _ => None,
            })
            .collect()
    }

    /// HTML fragment matching the web form's message area markup
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for node in &self.nodes {
            match node {
                Node::Message { kind, text } => {
                    html.push_str(&format!(
                        "<div class=\"message {}\">{}</div>\n",
                        kind,
                        html_escape(text)
                    ));
                }
                Node::Link(link) => {
                    html.push_str(&format!(
                        "<a href=\"{}\" download=\"{}\" style=\"display: block; margin-top: 0.75rem;\">{}</a>\n",
                        html_escape(&link.href),
                        html_escape(&link.download),
                        html_escape(&link.text)
                    ));
                }
            }
        }
        html
    }

    /// One line per node; links are resolved against `base_url`
    pub fn to_terminal(&self, base_url: &Url) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Message { kind, text } => {
                    out.push_str(&format!("[{}] {}\n", kind, text));
                }
                Node::Link(link) => {
                    let target = base_url
                        .join(&link.href)
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| link.href.clone());
                    out.push_str(&format!("{}: {}\n", link.text, target));
                }
            }
        }
        out
    }
}

/// Append the nodes for a successful response
///
/// Order: message, relation count, download link, warnings, errors. A
/// payload with none of message, report, warnings or errors gets a single
/// "no results" note.
pub fn render_response(response: &ProcessFilesResponse, area: &mut MessageArea) {
    if let Some(message) = &response.message {
        area.show_message(message.as_str(), MessageKind::Success);
    }
    if let Some(count) = &response.num_relazioni_estratte {
        area.show_message(
            format!("Relazioni estratte: {}", count_text(count)),
            MessageKind::Info,
        );
    }
    if let Some(report) = &response.report_filename {
        area.append_link(DownloadLink::for_report(report));
    }
    for warning in &response.warnings {
        area.show_message(warning.as_str(), MessageKind::Warning);
    }
    for error in &response.errors {
        area.show_message(error.as_str(), MessageKind::Error);
    }

    if response.is_empty_result() {
        area.show_message(NO_RESULTS, MessageKind::Info);
    }
}

/// Number as a browser prints it: integral floats lose the `.0`
fn count_text(count: &Number) -> String {
    match count.as_f64() {
        Some(value) if count.is_f64() => value.to_string(),
        _ => count.to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

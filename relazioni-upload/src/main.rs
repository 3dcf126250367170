//! relazioni-upload - submit PDF files to the relazioni extraction service
//!
//! Sends the selected PDFs to `/process_files`, then prints the service's
//! messages, warnings, errors and the report download link.
//!
//! Exit status: 0 completed, 1 failed, 2 no PDF selected.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use relazioni_common::config::{
    config_file_path, load_or_default, load_toml_config, resolve_client_settings,
    write_toml_config, CliOverrides, ClientSettings, ConfigSource, LoggingConfig, TomlConfig,
};
use relazioni_upload::selection::expand_inputs;
use relazioni_common::api::ProcessFilesResponse;
use relazioni_upload::{SubmissionOutcome, TerminalIndicator, UploadClient, UploadForm};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Revision, UTC build time and profile, set by build.rs
const BUILD_ID: &str = env!("RELAZIONI_BUILD_ID");

#[derive(Debug, Parser)]
#[command(
    name = "relazioni-upload",
    version,
    about = "Submit PDF files to the relazioni extraction service"
)]
struct Args {
    /// PDF files or directories to submit
    files: Vec<PathBuf>,

    /// Service base URL (default http://127.0.0.1:5000)
    #[arg(long)]
    server_url: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Descend into sub-directories of directory arguments
    #[arg(long)]
    recursive: bool,

    /// Also write the rendered messages as an HTML fragment
    #[arg(long, value_name = "PATH")]
    html: Option<PathBuf>,

    /// Download the generated CSV report (into DIR, the configured report
    /// directory, or the current directory). DIR needs `--save-report=DIR`
    #[arg(long, value_name = "DIR", num_args = 0..=1, require_equals = true)]
    save_report: Option<Option<PathBuf>>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Write the resolved settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// Process exit status of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Completed,
    Failed,
    NothingToSend,
}

impl RunStatus {
    fn code(self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Failed => 1,
            RunStatus::NothingToSend => 2,
        }
    }
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        ExitCode::from(status.code())
    }
}

fn status_for(outcome: &SubmissionOutcome) -> RunStatus {
    match outcome {
        SubmissionOutcome::Completed(_) => RunStatus::Completed,
        SubmissionOutcome::NoValidFiles => RunStatus::NothingToSend,
        SubmissionOutcome::Failed(_) => RunStatus::Failed,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let cli = CliOverrides {
        server_url: args.server_url.clone(),
        report_dir: args.save_report.clone().flatten(),
        log_level: args.log_level.clone(),
    };

    if args.write_config {
        return write_config(args.config.as_deref(), &cli);
    }

    let (toml_config, source) = load_or_default(args.config.as_deref())?;
    let settings = resolve_client_settings(&cli, &toml_config)?;

    init_tracing(&settings.log_level);

    info!(
        "Starting relazioni-upload v{} ({})",
        env!("CARGO_PKG_VERSION"),
        BUILD_ID
    );
    match &source {
        ConfigSource::File(path) => info!("Config: {}", path.display()),
        ConfigSource::Defaults { looked_at: Some(path) } => {
            warn!("Config file not found at {}, using defaults", path.display())
        }
        ConfigSource::Defaults { looked_at: None } => {
            warn!("No config directory on this platform, using defaults")
        }
    }
    info!("Server: {}", settings.server_url);

    run(&args, &settings).await
}

async fn run(args: &Args, settings: &ClientSettings) -> Result<ExitCode> {
    let client = UploadClient::new(&settings.server_url, settings.request_timeout)?;
    let mut form = UploadForm::new(client, TerminalIndicator::new());

    let selected = expand_inputs(&args.files, args.recursive);
    let outcome = form.submit(&selected).await;

    print!("{}", form.messages().to_terminal(form.client().base_url()));

    if let Some(html_path) = &args.html {
        std::fs::write(html_path, form.messages().to_html())
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        info!("Messages written to {}", html_path.display());
    }

    let response = match outcome {
        SubmissionOutcome::Completed(response) => response,
        other => return Ok(status_for(&other).into()),
    };

    if args.save_report.is_some() {
        let dest_dir = settings
            .report_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(save_report(form.client(), &response, &dest_dir).await.into());
    }

    Ok(RunStatus::Completed.into())
}

/// Fetch the report named in `response` into `dest_dir`
///
/// A response without a report is not a failure.
async fn save_report(
    client: &UploadClient,
    response: &ProcessFilesResponse,
    dest_dir: &Path,
) -> RunStatus {
    let Some(report) = response.report_filename.as_deref() else {
        warn!("No report generated, nothing to download");
        return RunStatus::Completed;
    };

    match client.download_report(report, dest_dir).await {
        Ok(path) => {
            println!("Report salvato: {}", path.display());
            RunStatus::Completed
        }
        Err(e) => {
            error!("Report download failed: {}", e);
            println!("[error] Errore: {}", e);
            RunStatus::Failed
        }
    }
}

/// Persist CLI/ENV overrides on top of the existing config file
fn write_config(explicit: Option<&Path>, cli: &CliOverrides) -> Result<ExitCode> {
    let path = config_file_path(explicit)
        .ok_or_else(|| anyhow!("Could not determine config file location; use --config"))?;

    let existing = if path.exists() {
        load_toml_config(&path)?
    } else {
        TomlConfig::default()
    };
    let settings = resolve_client_settings(cli, &existing)?;

    let config = TomlConfig {
        server_url: Some(settings.server_url),
        request_timeout_secs: existing.request_timeout_secs,
        report_dir: settings.report_dir,
        logging: LoggingConfig {
            level: settings.log_level,
        },
    };
    write_toml_config(&config, &path)?;

    println!("Config written to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(level: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use trustsight::backend::{HttpBackend, SourceFeedback};
use trustsight::core::action::SubmitOrigin;
use trustsight::core::config::{self, ResolvedConfig};
use trustsight::core::controller::Controller;
use trustsight::core::state::Session;
use trustsight::render::{self, Section, plain};

#[derive(Parser)]
#[command(name = "trustsight", about = "Research assistant with trust-scored insights")]
struct Args {
    /// Backend base URL (overrides config file and TRUSTSIGHT_BACKEND_URL)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Ask one question, print the answer and exit
    #[arg(short, long)]
    query: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Mark a source URL as trustworthy
    ApproveSource { url: String },
    /// Report a source URL as unreliable
    FlagSource { url: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to trustsight.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("trustsight.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            warn!("Config load failed: {}", e);
            config::TrustSightConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.backend_url.as_deref());
    info!("TrustSight starting up with backend {}", resolved.backend_url);

    let backend = match HttpBackend::new(Some(resolved.backend_url.clone()), resolved.request_timeout) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match (args.command, args.query) {
        (Some(Command::ApproveSource { url }), _) => {
            feedback(&backend, SourceFeedback::Approve, &url).await
        }
        (Some(Command::FlagSource { url }), _) => {
            feedback(&backend, SourceFeedback::Flag, &url).await
        }
        (None, Some(query)) => one_shot(Controller::new(Arc::new(backend)), &query).await,
        (None, None) => interactive(Controller::new(Arc::new(backend)), &resolved),
    }
}

fn interactive(controller: Controller, config: &ResolvedConfig) -> ExitCode {
    match trustsight::tui::run(controller, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn one_shot(controller: Controller, query: &str) -> ExitCode {
    let mut session = Session::new();
    if !controller
        .submit(&mut session, query, SubmitOrigin::Draft)
        .await
    {
        eprintln!("Nothing to ask: the query is empty.");
        return ExitCode::FAILURE;
    }

    let sections = session
        .last_assistant()
        .and_then(|entry| entry.payload.as_ref())
        .map(render::render)
        .unwrap_or_default();

    if let Some(entry) = session.last_assistant()
        && !matches!(sections.as_slice(), [Section::Error(_)])
    {
        println!("{}\n", entry.content);
    }
    print!("{}", plain::format_sections(&sections));

    if matches!(sections.as_slice(), [Section::Error(_)]) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn feedback(backend: &HttpBackend, kind: SourceFeedback, url: &str) -> ExitCode {
    match backend.send_feedback(kind, url).await {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

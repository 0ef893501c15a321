//! voxtask binary - composition root.
//!
//! 1. Load `.env` and the TOML configuration
//! 2. Initialize tracing
//! 3. Build the Todoist, interpreter and diagnostics adapters
//! 4. Run one command (`--text`) or read commands from stdin until EOF or `exit`

mod cli;
mod prompt;
mod session;

use std::io::BufReader;
use std::sync::Arc;

use clap::Parser;
use voxtask_action::{CommandInterpreter, DiagnosticsSink, TaskStore};
use voxtask_core::{VoxtaskConfig, VoxtaskError};
use voxtask_remote::{HttpDiagnosticsSink, HttpInterpreter, TodoistClient};

use cli::CliArgs;
use prompt::Terminal;
use session::{summarize, Session, SessionSettings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // A missing .env file is fine; the token may come from the environment.
    let dotenv = dotenvy::dotenv();

    // Config.
    let config_file = args.resolve_config_path();
    let config = VoxtaskConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the resolved level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting voxtask v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    // Adapters.
    let token = std::env::var(&config.todoist.api_token_env).map_err(|_| {
        VoxtaskError::Config(format!(
            "Todoist API token not set (expected in {})",
            config.todoist.api_token_env
        ))
    })?;
    let store: Arc<dyn TaskStore> = Arc::new(TodoistClient::from_config(&config.todoist, token)?);
    let interpreter: Arc<dyn CommandInterpreter> =
        Arc::new(HttpInterpreter::from_config(&config.interpreter)?);
    let diagnostics: Option<Arc<dyn DiagnosticsSink>> = if config.diagnostics.enabled {
        Some(Arc::new(HttpDiagnosticsSink::from_config(&config.diagnostics)?))
    } else {
        tracing::info!("Diagnostics logging disabled in config");
        None
    };

    let filter = args.resolve_filter(&config.session.default_filter);
    tracing::info!(filter = %filter, "Session ready");
    let session = Session::new(
        store,
        interpreter,
        diagnostics,
        SessionSettings::from_config(&config, filter),
    );

    let terminal = Terminal::new(BufReader::new(std::io::stdin()), std::io::stdout());

    if let Some(text) = args.text.as_deref() {
        run_one(&session, &terminal, text).await;
        return Ok(());
    }

    loop {
        let Some(line) = terminal.ask("> ") else {
            break;
        };
        if line.eq_ignore_ascii_case("exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        run_one(&session, &terminal, &line).await;
    }

    tracing::info!("Session ended");
    Ok(())
}

async fn run_one<R, W>(session: &Session, terminal: &Terminal<R, W>, transcript: &str)
where
    R: std::io::BufRead + Send,
    W: std::io::Write + Send,
{
    match session.run_cycle(transcript, terminal).await {
        Ok(report) => {
            for line in summarize(&report) {
                terminal.say(&line);
            }
        }
        Err(e) => terminal.say(&format!("Could not load tasks: {e}")),
    }
}

//! Startup Atlas - analytics dashboard and record management for a startup
//! ecosystem database.

use startup_atlas::cli::Cli;
use startup_atlas::commands::{dispatch, CommandContext};
use startup_atlas::config::Config;
use startup_atlas::error::{AtlasError, Result};
use startup_atlas::{db, logging};
use tracing::{debug, error, info};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    match cli.log_path() {
        Some(path) => logging::init_file_logging(&path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli) {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e.message());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    debug!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = config.resolve_connection(
        cli.to_connection_config()?.as_ref(),
        cli.backend_override()?,
        |key| std::env::var(key).ok(),
    )?;
    info!("Connection: {}", connection.display_string());

    let timeout = cli
        .timeout_override()
        .unwrap_or_else(|| config.query.timeout());
    let client = db::connect(&connection)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AtlasError::internal(format!("Failed to start async runtime: {e}")))?;
    let output = runtime.block_on(async {
        let ctx = CommandContext::new(client.as_ref(), timeout).with_assume_yes(cli.yes);
        dispatch(&cli.command, &ctx).await
    })?;

    println!("{}", output.render(cli.format));
    Ok(())
}

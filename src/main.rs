use anyhow::Result;
use clap::Parser;
use playhost::{launcher, LauncherConfig, StartupError};

#[derive(Parser)]
#[command(
    name = "playhost",
    about = "Serves the bundled web game locally and opens the browser",
    version
)]
struct Args {
    /// HTTP port to serve the game on
    #[arg(long, env = "PLAYHOST_PORT")]
    port: Option<u16>,

    /// Directory to serve (default: the directory containing this executable)
    #[arg(long, env = "PLAYHOST_DIR")]
    dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLAYHOST_LOG")]
    log: Option<String>,

    /// Start the server without opening a browser
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = LauncherConfig::new(args.port, args.dir, args.log, args.no_open);

    // Init once — must happen before any tracing calls.
    setup_logging(&config.log);

    if let Err(e) = launcher::run(&config).await {
        if e.downcast_ref::<StartupError>().is_some() {
            // Diagnostic already printed and acknowledged interactively.
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}

/// Initialize the tracing subscriber with the configured level filter.
fn setup_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .compact()
        .init();
}

// SPDX-License-Identifier: MIT
//! Startup orchestration: verify the entry page, start the server, open the
//! browser, and idle until interrupted.

use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::warn;

use crate::browser;
use crate::config::LauncherConfig;
use crate::server;

/// How long the launcher waits after spawning the server before pointing the
/// browser at it. Best-effort settle time, not a readiness handshake.
const SERVER_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum StartupError {
    /// The entry page is missing, so there is nothing to serve.
    #[error("entry file not found: {0}")]
    MissingEntryFile(PathBuf),
}

/// Entry-file gate: the launch proceeds only if the entry page exists.
pub fn verify_entry(config: &LauncherConfig) -> Result<(), StartupError> {
    let entry = config.entry_path();
    if entry.is_file() {
        Ok(())
    } else {
        Err(StartupError::MissingEntryFile(entry))
    }
}

/// Run the full launch sequence. Returns when an interrupt is received, or
/// with an error when startup is refused or the server dies underneath us.
pub async fn run(config: &LauncherConfig) -> Result<()> {
    println!("--- Playhost Game Launcher ---");

    // Pin every relative resolution to the base directory, regardless of
    // which directory the binary was invoked from.
    std::env::set_current_dir(&config.base_dir).with_context(|| {
        format!(
            "failed to enter base directory {}",
            config.base_dir.display()
        )
    })?;
    println!("Serving from: {}", config.base_dir.display());

    if let Err(e) = verify_entry(config) {
        // Fail fast with a visible message. The typical user double-clicked
        // the launcher, so the window closes the moment we return — hold it
        // open until they acknowledge.
        eprintln!(
            "ERROR: {} not found in {}.",
            config.entry_file,
            config.base_dir.display()
        );
        eprintln!("Make sure the game files sit next to the launcher.");
        wait_for_acknowledgment();
        return Err(e.into());
    }

    // Bind before spawning so a bind failure surfaces here instead of inside
    // a detached task. All interfaces, so a phone on the LAN can join too.
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = server::bind(addr)?;
    let router = server::router(&config.base_dir);

    let url = config.root_url();
    println!("Server running at {url}");
    println!("Press Ctrl+C to stop.");

    let mut server_task = tokio::spawn(server::serve(listener, router));

    // Give the accept loop a moment before the browser's first request.
    tokio::time::sleep(SERVER_SETTLE_DELAY).await;

    if config.open_browser {
        println!("Opening browser at {url}");
        browser::open_url(&url);
    }

    tokio::select! {
        biased;

        _ = shutdown_signal() => {
            println!();
            println!("Game closed. Goodbye!");
            server_task.abort();
        }

        res = &mut server_task => {
            // The server never returns on its own; reaching here means it died.
            match res {
                Ok(Ok(())) => warn!("server exited unexpectedly"),
                Ok(Err(e)) => return Err(e).context("server failed"),
                Err(e) => return Err(e).context("server task panicked"),
            }
        }
    }

    Ok(())
}

/// Resolves when a shutdown signal is received.
///
/// On Unix we listen for SIGTERM *and* Ctrl-C.
/// On other platforms we listen for Ctrl-C only.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}

/// Block until the user presses Enter. Only used on the fatal startup path.
fn wait_for_acknowledgment() {
    print!("Press Enter to exit...");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn entry_gate_passes_when_file_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, true);
        assert!(verify_entry(&config).is_ok());
    }

    #[test]
    fn entry_gate_refuses_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, true);
        let err = verify_entry(&config).unwrap_err();
        let StartupError::MissingEntryFile(path) = err;
        assert_eq!(path, dir.path().join("index.html"));
    }

    #[test]
    fn entry_gate_refuses_directory_named_like_entry() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("index.html")).unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, true);
        assert!(verify_entry(&config).is_err());
    }
}

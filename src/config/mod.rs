use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ENTRY_FILE: &str = "index.html";
const CONFIG_FILE: &str = "launcher.toml";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{base_dir}/launcher.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// HTTP port the game is served on (default: 8000).
    port: Option<u16>,
    /// Log level filter string, e.g. "debug", "info,playhost=trace" (default: "info").
    log: Option<String>,
    /// Entry page that must exist before anything starts (default: "index.html").
    entry_file: Option<String>,
    /// Open the default browser once the server is up (default: true).
    open_browser: Option<bool>,
}

fn load_toml(base_dir: &Path) -> Option<TomlConfig> {
    let path = base_dir.join(CONFIG_FILE);
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse launcher.toml — using defaults");
            None
        }
    }
}

// ─── LauncherConfig ───────────────────────────────────────────────────────────

/// Immutable launch configuration, constructed once at startup and passed by
/// reference to both the launcher and the server.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub port: u16,
    /// Directory all served files are read from. Also becomes the process
    /// working directory for the rest of the run.
    pub base_dir: PathBuf,
    /// The page whose presence gates the whole launch sequence.
    pub entry_file: String,
    /// Open the default browser after the server starts.
    pub open_browser: bool,
    pub log: String,
}

impl LauncherConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{base_dir}/launcher.toml`
    ///   3. Built-in defaults
    pub fn new(
        port: Option<u16>,
        dir: Option<PathBuf>,
        log: Option<String>,
        no_open: bool,
    ) -> Self {
        let base_dir = dir.unwrap_or_else(default_base_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&base_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());
        let entry_file = toml
            .entry_file
            .unwrap_or_else(|| DEFAULT_ENTRY_FILE.to_string());
        let open_browser = !no_open && toml.open_browser.unwrap_or(true);

        Self {
            port,
            base_dir,
            entry_file,
            open_browser,
            log,
        }
    }

    /// Absolute path of the entry page.
    pub fn entry_path(&self) -> PathBuf {
        self.base_dir.join(&self.entry_file)
    }

    /// Root URL the browser is pointed at.
    pub fn root_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// The directory containing the launcher executable itself.
///
/// The launcher ships next to the game files, so this is where `index.html`
/// lives no matter which directory the user invoked the binary from. Falls
/// back to the current directory if the executable path cannot be resolved.
fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_toml() {
        let dir = TempDir::new().unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, false);
        assert_eq!(config.port, 8000);
        assert_eq!(config.entry_file, "index.html");
        assert_eq!(config.log, "info");
        assert!(config.open_browser);
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("launcher.toml"),
            "port = 9123\nlog = \"debug\"\nentry_file = \"game.html\"\nopen_browser = false\n",
        )
        .unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, false);
        assert_eq!(config.port, 9123);
        assert_eq!(config.log, "debug");
        assert_eq!(config.entry_file, "game.html");
        assert!(!config.open_browser);
    }

    #[test]
    fn cli_beats_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("launcher.toml"), "port = 9123\n").unwrap();
        let config = LauncherConfig::new(
            Some(9999),
            Some(dir.path().to_path_buf()),
            Some("warn".to_string()),
            false,
        );
        assert_eq!(config.port, 9999);
        assert_eq!(config.log, "warn");
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("launcher.toml"), "port = \"not a number").unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, false);
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn no_open_flag_wins_over_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("launcher.toml"), "open_browser = true\n").unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, true);
        assert!(!config.open_browser);
    }

    #[test]
    fn entry_path_joins_base_dir() {
        let dir = TempDir::new().unwrap();
        let config = LauncherConfig::new(None, Some(dir.path().to_path_buf()), None, false);
        assert_eq!(config.entry_path(), dir.path().join("index.html"));
    }

    #[test]
    fn root_url_uses_configured_port() {
        let dir = TempDir::new().unwrap();
        let config = LauncherConfig::new(Some(8123), Some(dir.path().to_path_buf()), None, false);
        assert_eq!(config.root_url(), "http://localhost:8123");
    }
}

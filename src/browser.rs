// SPDX-License-Identifier: MIT
//! Best-effort browser opening with a single platform fallback.

use std::process::{Command, Stdio};

use tracing::{info, warn};

/// Open `url` in the system's default browser.
///
/// Tries the `open` crate first; on failure, runs one platform-specific
/// command with the identical URL. If that also fails, prints the URL for
/// manual use. Never fatal — the server keeps running regardless.
///
/// Returns whether any mechanism reported success.
pub fn open_url(url: &str) -> bool {
    match open::that(url) {
        Ok(()) => {
            info!(url = %url, "browser opened");
            true
        }
        Err(e) => {
            warn!(err = %e, "default browser launch failed — trying fallback command");
            if run_fallback(url) {
                true
            } else {
                println!("Could not open a browser automatically.");
                println!("Open this URL yourself: {url}");
                false
            }
        }
    }
}

fn run_fallback(url: &str) -> bool {
    let (program, args) = fallback_invocation(url);
    let ok = Command::new(program)
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if ok {
        info!(program = %program, "browser opened via fallback command");
    } else {
        warn!(program = %program, "fallback browser command failed");
    }
    ok
}

/// The one platform-specific fallback: (program, args). The URL is always
/// passed through verbatim as the final argument.
#[cfg(target_os = "macos")]
fn fallback_invocation(url: &str) -> (&'static str, Vec<String>) {
    ("open", vec![url.to_string()])
}

/// `start` is a cmd builtin; the empty string fills the window title slot.
#[cfg(target_os = "windows")]
fn fallback_invocation(url: &str) -> (&'static str, Vec<String>) {
    (
        "cmd",
        vec![
            "/C".to_string(),
            "start".to_string(),
            String::new(),
            url.to_string(),
        ],
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn fallback_invocation(url: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![url.to_string()])
}

//! Environment Configuration Loader
//!
//! Loads `KEY=VALUE` pairs from the canonical location
//! `/etc/resx-forge/environment` so the service and any helper binaries
//! share the same configuration. Variables already set on the process
//! always win over file contents.

use std::path::Path;
use tracing::{debug, info, warn};

/// Paths checked in order of priority
pub const ENV_FILE_PATHS: &[&str] = &[
    "/etc/resx-forge/environment",
    "/etc/resx-forge.env",
    ".env",
];

/// Load environment variables from the first configuration file found.
///
/// `RESX_ENV_FILE` (or the service's `--env-file` flag, which calls
/// [`load_env_file`] directly) takes priority over the canonical paths.
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment() -> Option<String> {
    if let Ok(custom_path) = std::env::var("RESX_ENV_FILE") {
        if let Some(path) = load_env_file(&custom_path) {
            return Some(path);
        }
    }

    let loaded = ENV_FILE_PATHS.iter().find_map(|path| load_env_file(path));
    if loaded.is_none() {
        debug!("No environment file found, using existing environment");
    }
    loaded
}

/// Load one specific environment file.
///
/// Returns the path on success; a missing or unreadable file is None.
pub fn load_env_file(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path.display(), e);
            return None;
        }
    };

    let mut loaded_count = 0;
    let mut skipped_count = 0;

    for (key, value) in parse_env_file(&content) {
        // Don't override existing environment variables
        if std::env::var(&key).is_ok() {
            skipped_count += 1;
            debug!("Skipped (already set): {}", key);
        } else {
            std::env::set_var(&key, &value);
            loaded_count += 1;
            debug!("Loaded: {}", key);
        }
    }

    info!(
        "Loaded {} environment variables from {} ({} skipped - already set)",
        loaded_count,
        path.display(),
        skipped_count
    );

    Some(path.display().to_string())
}

/// Parse `KEY=VALUE` lines, skipping comments and blanks.
///
/// Values may be wrapped in single or double quotes; a value may itself
/// contain `=`.
fn parse_env_file(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }

            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }

            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);

            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

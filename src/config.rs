//! Shell configuration files.
//!
//! Settings live as JSON in the platform config directory. Loads are
//! tolerant — a missing or corrupt file falls back to defaults with a
//! logged warning so a bad file never prevents the console from starting.
//! Saves are atomic (temp file + rename) with restrictive permissions on
//! Unix.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

const SHELL_CONFIG_FILE: &str = "shell.json";

/// Config directory using the platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/portside/`
/// - Linux: `~/.config/portside/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/portside/`
///
/// Falls back to `~/.portside/` if the platform dir is unavailable.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("portside"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".portside")
        })
}

/// Load a JSON config file from `dir`, returning `Default` if missing or
/// corrupt. Corrupt files are visible in logs instead of silently
/// resetting state.
pub fn load_json_config_from<T: DeserializeOwned + Default>(dir: &Path, filename: &str) -> T {
    let path = dir.join(filename);
    if !path.exists() {
        return T::default();
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[config] Could not read {}: {e}", path.display());
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            eprintln!(
                "[config] Corrupt config {}: {e}. Using defaults.",
                path.display()
            );
            T::default()
        }
    }
}

/// Save a JSON config file into `dir` atomically (temp file + rename).
/// Sets 0600 permissions on Unix.
pub fn save_json_config_in<T: Serialize>(
    dir: &Path,
    filename: &str,
    config: &T,
) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create config directory: {e}"))?;

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    let target = dir.join(filename);
    let temp = dir.join(format!("{}.tmp.{}", filename, std::process::id()));

    std::fs::write(&temp, &json).map_err(|e| format!("Failed to write temp config: {e}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&temp, perms)
            .map_err(|e| format!("Failed to set config permissions: {e}"))?;
    }

    // Atomic rename: either the old file or the new file exists, never partial
    std::fs::rename(&temp, &target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        format!("Failed to commit config: {e}")
    })?;

    Ok(())
}

// ---------------------------------------------------------------------------
// ShellConfig
// ---------------------------------------------------------------------------

fn default_timeout_secs() -> u64 {
    30
}

/// Local overrides for the console shell. Everything is optional; an
/// empty file behaves exactly like no file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Override for the production API origin.
    pub production_origin: Option<String>,
    /// Override for the staging API origin.
    pub staging_origin: Option<String>,
    /// Timeout applied to session/config service requests.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            production_origin: None,
            staging_origin: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl ShellConfig {
    pub fn load() -> Self {
        load_json_config_from(&config_dir(), SHELL_CONFIG_FILE)
    }

    pub fn save(&self) -> Result<(), String> {
        save_json_config_in(&config_dir(), SHELL_CONFIG_FILE, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: ShellConfig = load_json_config_from(dir.path(), "shell.json");
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shell.json"), "{not json").unwrap();
        let config: ShellConfig = load_json_config_from(dir.path(), "shell.json");
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShellConfig {
            production_origin: Some("https://registry.internal".to_string()),
            staging_origin: None,
            request_timeout_secs: 5,
        };
        save_json_config_in(dir.path(), "shell.json", &config).unwrap();

        let loaded: ShellConfig = load_json_config_from(dir.path(), "shell.json");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("shell.json"),
            r#"{"staging_origin": "http://127.0.0.1:9000"}"#,
        )
        .unwrap();

        let config: ShellConfig = load_json_config_from(dir.path(), "shell.json");
        assert_eq!(
            config.staging_origin.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.production_origin.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        save_json_config_in(dir.path(), "shell.json", &ShellConfig::default()).unwrap();

        let mode = std::fs::metadata(dir.path().join("shell.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        save_json_config_in(dir.path(), "shell.json", &ShellConfig::default()).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }
}

//! Configuration resolution: environment variables, optional overlay file,
//! built-in defaults.
//!
//! Precedence is environment > overlay file > defaults. The overlay file is a
//! development convenience and is only consulted outside the `production`
//! execution mode.
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use eyre::{Context, Result};

use crate::config::{models::AppConfig, validation::AppConfigValidator};

/// Environment variable naming the execution mode. Anything other than
/// `production` counts as development and enables the overlay file.
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Overlay file names probed under the search path, in order.
const OVERLAY_CANDIDATES: [&str; 2] = [".env", "app_config.env"];

/// Read the current execution mode from the process environment.
pub fn execution_environment() -> String {
    std::env::var(ENVIRONMENT_VAR).unwrap_or_default()
}

/// Load, normalize and validate configuration, then log a startup summary.
///
/// `search_path` is the directory probed for an overlay file in development
/// mode. Validation failure is fatal: no configuration is returned.
pub fn load_config(search_path: &str) -> Result<AppConfig> {
    let environment = execution_environment();
    let config = resolve_config(search_path, &environment)?;
    AppConfigValidator::validate(&config)
        .context("configuration incomplete (environment or overlay file)")?;
    config.log_summary(&environment);
    Ok(config)
}

/// Resolve configuration without validating required fields.
///
/// Used by `load_config` and by the `validate` CLI command, which wants to
/// report validation findings itself.
pub fn resolve_config(search_path: &str, environment: &str) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // Overlay file only outside production; env vars override it either way.
    if environment != "production"
        && let Some(overlay) = find_overlay_file(search_path)
    {
        let format = sniff_format(&overlay);
        let path_str = overlay
            .to_str()
            .ok_or_else(|| eyre::eyre!("Invalid UTF-8 path: {}", overlay.display()))?;
        tracing::debug!(overlay = path_str, "applying configuration overlay file");
        builder = builder.add_source(File::new(path_str, format));
    }

    let settings = builder
        .add_source(Environment::default())
        .build()
        .context("Failed to build configuration sources")?;

    let mut config: AppConfig = settings
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    normalize(&mut config);
    Ok(config)
}

/// First existing regular file among the overlay candidates.
fn find_overlay_file(search_path: &str) -> Option<PathBuf> {
    OVERLAY_CANDIDATES
        .iter()
        .map(|name| Path::new(search_path).join(name))
        .find(|candidate| candidate.is_file())
}

/// Determine file format based on extension. KEY=VALUE overlay files (`.env`)
/// parse as INI.
fn sniff_format(path: &Path) -> FileFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Ini,
    }
}

/// A bare port like "8000" becomes ":8000" so it is usable as a bind address.
fn normalize(config: &mut AppConfig) {
    if !config.web_server_port.is_empty() && !config.web_server_port.starts_with(':') {
        config.web_server_port = format!(":{}", config.web_server_port);
    }
}

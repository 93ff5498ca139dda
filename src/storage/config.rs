//! Configuration management

use crate::error::{Result, StreamVistaError};
use crate::types::Config;
use crate::utils::paths::AppDirs;
use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

/// Load the configuration file of `dirs`, merging with defaults
pub async fn load_config(dirs: &AppDirs) -> Result<Config> {
    load_config_from(&dirs.config_file()).await
}

/// Load configuration from `path`; missing keys keep their defaults
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| StreamVistaError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if !config.player.seek_step_secs.is_finite() || config.player.seek_step_secs <= 0.0 {
        return Err(StreamVistaError::InvalidConfig(
            "player.seek_step_secs must be a positive number".into(),
        ));
    }
    if let Some(url) = &config.catalog_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        return Err(StreamVistaError::InvalidConfig(format!(
            "catalog_url must be an http(s) URL, got {}",
            url
        )));
    }
    Ok(())
}

/// Write `config` to `path` as pretty JSON, creating parent directories
pub async fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?).await?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

/// Open the config file at `path` in an editor, then load what was saved
///
/// A missing file is first seeded with the defaults. Errors if the editor
/// fails or leaves an invalid configuration behind.
pub async fn edit_config(path: &Path, configured_editor: &str) -> Result<Config> {
    if !path.exists() {
        save_config_to(path, &Config::default()).await?;
    }

    let editor = choose_editor(
        configured_editor,
        env::var("VISUAL").ok().or_else(|| env::var("EDITOR").ok()),
    );
    info!(editor = %editor, path = %path.display(), "editing config");

    let status = Command::new(&editor).arg(path).status().await?;
    if !status.success() {
        return Err(StreamVistaError::InvalidConfig(format!(
            "editor `{}` exited with {}",
            editor, status
        )));
    }

    load_config_from(path).await
}

/// The configured editor, else `$VISUAL`/`$EDITOR`, else `vi`
fn choose_editor(configured: &str, from_env: Option<String>) -> String {
    Some(configured.trim())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or(from_env.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_string())
}

//! Where streamvista keeps its files
//!
//! Follows the XDG Base Directory layout: configuration under
//! `$XDG_CONFIG_HOME/streamvista`, the watch-history store under
//! `$XDG_DATA_HOME/streamvista`.

use crate::error::Result;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

const APP_NAME: &str = "streamvista";
const CONFIG_FILE: &str = "config.json";

/// Resolved application directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppDirs {
    /// Resolve from the environment, falling back to the platform defaults
    pub fn from_env() -> Self {
        let home = dirs::home_dir();
        Self {
            config_dir: resolve_base(
                env::var_os("XDG_CONFIG_HOME"),
                dirs::config_dir(),
                home.as_deref(),
                ".config",
            )
            .join(APP_NAME),
            data_dir: resolve_base(
                env::var_os("XDG_DATA_HOME"),
                dirs::data_dir(),
                home.as_deref(),
                ".local/share",
            )
            .join(APP_NAME),
        }
    }

    /// Both directories below `root`, for sandboxed runs
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory of the key-value namespace files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Create both directories if needed
    pub async fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.config_dir).await?;
        fs::create_dir_all(&self.data_dir).await?;
        Ok(())
    }
}

/// Pick the base directory: an absolute XDG value, then the platform
/// directory, then `$HOME/<home_relative>`
///
/// Relative XDG values are ignored.
fn resolve_base(
    xdg: Option<OsString>,
    platform: Option<PathBuf>,
    home: Option<&Path>,
    home_relative: &str,
) -> PathBuf {
    xdg.map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or(platform)
        .unwrap_or_else(|| home.unwrap_or(Path::new("")).join(home_relative))
}

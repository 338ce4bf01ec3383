//! Where the config file and logs live.
//!
//! - **Working directory**: a `sticks.yaml` in the current directory wins,
//!   which is what you want while iterating on a config.
//! - **Portable**: a `.portable` marker next to the executable keeps
//!   everything beside it.
//! - **Per-user** (default): the platform config directory, e.g.
//!   `~/.config/Floating Sticks` or `%APPDATA%\Floating Sticks`.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;

const APP_NAME: &str = "Floating Sticks";
const CONFIG_FILE: &str = "sticks.yaml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config: PathBuf,
    pub logs_dir: PathBuf,
    /// Config lives next to the executable or in the working directory
    pub is_portable: bool,
}

impl AppPaths {
    /// Resolve paths for this run.
    ///
    /// Runs before logging is up, so diagnostics go to stderr in debug builds.
    pub fn detect() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.clone());

        Self::resolve(&cwd, &exe_dir, dirs::config_dir())
    }

    fn resolve(cwd: &Path, exe_dir: &Path, user_config_dir: Option<PathBuf>) -> Self {
        if cwd.join(CONFIG_FILE).exists() {
            #[cfg(debug_assertions)]
            eprintln!("[paths] using {} from {}", CONFIG_FILE, cwd.display());
            return Self::portable(cwd);
        }

        if exe_dir.join(".portable").exists() {
            #[cfg(debug_assertions)]
            eprintln!("[paths] portable mode in {}", exe_dir.display());
            return Self::portable(exe_dir);
        }

        let base = user_config_dir
            .unwrap_or_else(|| exe_dir.to_path_buf())
            .join(APP_NAME);
        Self {
            config: base.join(CONFIG_FILE),
            logs_dir: base.join("logs"),
            is_portable: false,
        }
    }

    fn portable(dir: &Path) -> Self {
        Self {
            config: dir.join(CONFIG_FILE),
            logs_dir: dir.join("logs"),
            is_portable: true,
        }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create the log and config directories, and write a default config
    /// on first run so there is something to edit.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        if !self.logs_dir.exists() {
            debug!("Creating logs directory: {}", self.logs_dir.display());
            std::fs::create_dir_all(&self.logs_dir)
                .with_context(|| format!("Failed to create {}", self.logs_dir.display()))?;
        }

        let base = self.base_dir();
        if !base.exists() {
            std::fs::create_dir_all(&base)
                .with_context(|| format!("Failed to create {}", base.display()))?;
        }

        if !self.config.exists() {
            let yaml = serde_yaml::to_string(&AppConfig::default())
                .context("Failed to serialize default config")?;
            std::fs::write(&self.config, yaml)
                .with_context(|| format!("Failed to write {}", self.config.display()))?;
            info!("Wrote default config to {}", self.config.display());
        }

        Ok(())
    }
}

//! Hot reload of the config file
//!
//! The directory holding the file is watched rather than the file itself, so
//! editors that save by writing a temp file and renaming it still trigger a
//! reload. Bursts of events are coalesced before the file is read again.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Quiet period after the last change before reloading
const SETTLE: Duration = Duration::from_millis(100);

pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    changed: mpsc::UnboundedReceiver<()>,
}

impl ConfigWatcher {
    /// Load the config at `config_path` and start watching it
    pub async fn new(config_path: String) -> Result<(Self, Arc<AppConfig>)> {
        let initial_config = AppConfig::load(&config_path)
            .await
            .context("Failed to load initial config")?;

        let path = PathBuf::from(&config_path);
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .with_context(|| format!("Config path has no file name: {}", config_path))?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, changed) = mpsc::unbounded_channel();

        // Runs on notify's own thread; only nudges the async side
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let relevant = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str()));
                if relevant {
                    debug!("Config file event: {:?}", event.kind);
                    let _ = tx.send(());
                }
            }
            Err(e) => error!("Config watch error: {}", e),
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        info!("Watching {} for changes", path.display());

        Ok((
            Self {
                _watcher: watcher,
                path,
                changed,
            },
            Arc::new(initial_config),
        ))
    }

    /// Wait for the next valid config.
    ///
    /// Edits that fail to parse or validate are logged and skipped. Returns
    /// `None` once the watcher has shut down.
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        loop {
            self.changed.recv().await?;
            while let Ok(Some(())) = tokio::time::timeout(SETTLE, self.changed.recv()).await {}

            match AppConfig::load(&self.path.to_string_lossy()).await {
                Ok(config) => {
                    info!("Configuration reloaded");
                    return Some(config);
                }
                Err(e) => warn!("Keeping previous config: {:#}", e),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Core [`ConfigLoader`] struct: file-backed configuration with optional hot-reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use calltrace_core::LoggerConfig;

use crate::registry::RuleRegistry;

use super::error::{ConfigError, Result};
use super::watcher::handle_fs_event;

/// File-backed configuration loader owning the rule registry.
///
/// Reads a single YAML file into a [`LoggerConfig`], builds the registry
/// from it, and can re-derive both on demand ([`reload`](Self::reload)) or
/// automatically when the file changes ([`watch`](Self::watch)).
#[derive(Debug)]
pub struct ConfigLoader {
    config_path: PathBuf,
    registry: Arc<RuleRegistry>,
    /// Active filesystem watcher (held to keep it alive).
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigLoader {
    /// Load the initial configuration and build the registry from it.
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let config = Self::load_file(&config_path)?;
        info!(path = %config_path.display(), rules = config.rules.len(), "loaded logging configuration");
        Ok(Self {
            registry: Arc::new(RuleRegistry::new(&config)),
            config_path,
            _watcher: None,
        })
    }

    /// Shared handle to the registry built from this loader's config.
    pub fn registry(&self) -> Arc<RuleRegistry> {
        Arc::clone(&self.registry)
    }

    /// Path of the watched config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Parse and validate a configuration file.
    pub fn load_file(path: &Path) -> Result<LoggerConfig> {
        let contents = fs::read_to_string(path)?;
        let config: LoggerConfig = serde_yaml::from_str(&contents)?;
        validate(&config)?;
        Ok(config)
    }

    /// Re-read the config file and atomically swap the registry snapshot.
    ///
    /// On any failure the previous snapshot stays active and the error is
    /// returned to the caller.
    pub fn reload(&self) -> Result<()> {
        match Self::load_file(&self.config_path) {
            Ok(config) => {
                self.registry.reload(&config);
                Ok(())
            }
            Err(e) => {
                warn!(
                    path = %self.config_path.display(),
                    error = %e,
                    "config reload failed, keeping previous configuration"
                );
                Err(e)
            }
        }
    }

    /// Start watching the config file for changes.
    ///
    /// The watcher observes the file's parent directory (editors replace
    /// files via rename) and reloads on create/modify events for the file.
    /// Parse failures keep the previous configuration.
    pub fn watch(&mut self) -> Result<()> {
        let registry = Arc::clone(&self.registry);
        let config_path = self.config_path.clone();
        let watch_dir = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => handle_fs_event(&event, &registry, &config_path),
                Err(e) => warn!(error = %e, "filesystem watcher error"),
            },
        )?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        info!(path = %self.config_path.display(), "watching config file for changes");
        self._watcher = Some(watcher);
        Ok(())
    }
}

/// Reject configurations with out-of-range values before they reach the
/// registry.
fn validate(config: &LoggerConfig) -> Result<()> {
    if config.max_result_size < -1 {
        return Err(ConfigError::Validation(format!(
            "max_result_size must be >= -1, got {}",
            config.max_result_size
        )));
    }
    for (idx, rule) in config.rules.iter().enumerate() {
        if let Some(size) = rule.max_result_size {
            if size < -1 {
                return Err(ConfigError::Validation(format!(
                    "rules[{idx}].max_result_size must be >= -1, got {size}"
                )));
            }
        }
    }
    Ok(())
}

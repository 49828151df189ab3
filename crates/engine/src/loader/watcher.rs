//! Filesystem event handler for the notify watcher (hot-reload).

use std::path::Path;
use std::sync::Arc;

use notify::{Event, EventKind};
use tracing::{info, warn};

use crate::registry::RuleRegistry;

use super::core::ConfigLoader;

/// Handle a single filesystem event from the notify watcher.
///
/// Create/modify events for the config file re-parse it and swap the
/// registry snapshot; failures keep the previous version. Removal of the
/// file keeps the last configuration in effect.
pub(super) fn handle_fs_event(event: &Event, registry: &Arc<RuleRegistry>, config_path: &Path) {
    let concerns_config = event
        .paths
        .iter()
        .any(|path| path.file_name() == config_path.file_name());
    if !concerns_config {
        return;
    }

    match &event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            match ConfigLoader::load_file(config_path) {
                Ok(config) => {
                    registry.reload(&config);
                    info!(path = %config_path.display(), "hot-reloaded logging configuration");
                }
                Err(e) => {
                    warn!(
                        path = %config_path.display(),
                        error = %e,
                        "failed to load config during hot-reload, keeping previous version"
                    );
                }
            }
        }
        EventKind::Remove(_) => {
            warn!(
                path = %config_path.display(),
                "config file removed, keeping last configuration"
            );
        }
        _ => {}
    }
}

//! Ordered rule registry with atomic snapshot reload.
//!
//! A [`Snapshot`] is built once from a [`LoggerConfig`] and never mutated;
//! [`RuleRegistry`] publishes the active snapshot through an `ArcSwap`, so
//! concurrent lookups never block and a reload is a single pointer store.
//! Rule order is match-priority order: the first entry whose matcher accepts
//! the call and whose effective config is enabled wins.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use calltrace_core::{CallRef, LoggerConfig, RuleConfig};

use crate::pattern::{compile, Matcher};


/// One compiled rule: matcher plus fully-merged effective configuration.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    matcher: Matcher,
    config: Arc<RuleConfig>,
}

impl RuleEntry {
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }
}

/// Immutable set of compiled rules plus the global defaults in effect.
#[derive(Debug)]
pub struct Snapshot {
    enabled: bool,
    entries: Vec<RuleEntry>,
}

impl Snapshot {
    /// Build a snapshot from configuration, preserving rule order.
    ///
    /// Rules with a blank or absent pattern, or with `enabled: false`, are
    /// skipped and contribute no entry.
    pub fn build(config: &LoggerConfig) -> Self {
        let defaults = config.default_config();
        let mut entries = Vec::new();

        for rule in &config.rules {
            if !rule.has_pattern() || !rule.enabled {
                continue;
            }
            let pattern = rule.pattern.as_deref().unwrap_or_default();
            entries.push(RuleEntry {
                matcher: compile(pattern),
                config: Arc::new(rule.merge_with_defaults(&defaults)),
            });
        }

        debug!(rules = entries.len(), "compiled logging rules");
        Snapshot {
            enabled: config.enabled,
            entries,
        }
    }

    /// Global enable flag captured at build time.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Compiled entries in match-priority order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }
}

/// Registry holding the active [`Snapshot`].
///
/// Lookups load the current snapshot once and scan it; the snapshot they see
/// is always entirely-old or entirely-new, never a mix. Configs handed out by
/// [`matching_config`](Self::matching_config) stay valid across reloads
/// because they are immutable and reference-counted.
#[derive(Debug)]
pub struct RuleRegistry {
    current: ArcSwap<Snapshot>,
}

impl RuleRegistry {
    pub fn new(config: &LoggerConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::build(config)),
        }
    }

    /// First matching enabled rule's effective config, or `None`.
    ///
    /// A matching-but-disabled entry does not short-circuit the scan; later
    /// entries may still match.
    pub fn matching_config(&self, call: &CallRef<'_>) -> Option<Arc<RuleConfig>> {
        let snapshot = self.current.load();
        for entry in &snapshot.entries {
            if entry.config.enabled && entry.matcher.matches(call) {
                return Some(Arc::clone(&entry.config));
            }
        }
        None
    }

    /// Global kill switch from the current snapshot.
    pub fn logging_enabled(&self) -> bool {
        self.current.load().enabled
    }

    /// Build a new snapshot from `config` and atomically install it.
    ///
    /// Every lookup starting after this returns observes the new snapshot;
    /// lookups already in flight finish against the one they loaded.
    pub fn reload(&self, config: &LoggerConfig) {
        let snapshot = Snapshot::build(config);
        let rules = snapshot.entries.len();
        self.current.store(Arc::new(snapshot));
        info!(rules, "reloaded logging configuration");
    }

    /// The active snapshot (for inspection; lookups go through
    /// [`matching_config`](Self::matching_config)).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}

//! Configuration schema: global defaults plus an ordered rule list.
//!
//! A [`LoggerConfig`] carries the global kill switch, process-wide default
//! values for every logging knob, and the ordered [`LoggingRule`] list. Rule
//! overrides are tri-state (`Option<_>`): an explicit `false` or `0` is an
//! override, only an absent field inherits the default.

use serde::{Deserialize, Serialize};

/// Effective per-rule logging configuration with every field resolved.
///
/// Instances are produced once, by [`LoggingRule::merge_with_defaults`] or
/// [`LoggerConfig::default_config`], and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    pub enabled: bool,
    /// Log argument values in the invocation record.
    pub log_arguments: bool,
    /// Log the return value in the completion record.
    pub log_return_value: bool,
    /// Only emit the completion record when the call took at least this long.
    pub min_duration_ms: u64,
    /// Truncate the rendered result to this many characters; `-1` disables.
    pub max_result_size: i64,
    /// Replace arguments and result with `[PROTECTED]`.
    pub mask_sensitive: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_arguments: true,
            log_return_value: true,
            min_duration_ms: 0,
            max_result_size: -1,
            mask_sensitive: false,
        }
    }
}

/// One configured rule: a match pattern plus optional per-field overrides.
///
/// A rule with a blank or absent pattern, or with `enabled: false`, is
/// skipped when the registry snapshot is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingRule {
    /// Pattern to match: package (`svc.order.*`), class
    /// (`svc.order.OrderService`), method (`svc.order.OrderService.save`),
    /// or a raw matcher expression.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub log_arguments: Option<bool>,
    #[serde(default)]
    pub log_return_value: Option<bool>,
    #[serde(default)]
    pub min_duration_ms: Option<u64>,
    #[serde(default)]
    pub max_result_size: Option<i64>,
    #[serde(default)]
    pub mask_sensitive: Option<bool>,
}

impl Default for LoggingRule {
    fn default() -> Self {
        Self {
            pattern: None,
            enabled: true,
            log_arguments: None,
            log_return_value: None,
            min_duration_ms: None,
            max_result_size: None,
            mask_sensitive: None,
        }
    }
}

impl LoggingRule {
    /// Resolve this rule against the global defaults.
    ///
    /// Absent fields inherit the default value; `enabled` always comes from
    /// the rule itself, never from the defaults.
    pub fn merge_with_defaults(&self, defaults: &RuleConfig) -> RuleConfig {
        RuleConfig {
            enabled: self.enabled,
            log_arguments: self.log_arguments.unwrap_or(defaults.log_arguments),
            log_return_value: self.log_return_value.unwrap_or(defaults.log_return_value),
            min_duration_ms: self.min_duration_ms.unwrap_or(defaults.min_duration_ms),
            max_result_size: self.max_result_size.unwrap_or(defaults.max_result_size),
            mask_sensitive: self.mask_sensitive.unwrap_or(defaults.mask_sensitive),
        }
    }

    /// Whether the rule carries a non-blank pattern.
    pub fn has_pattern(&self) -> bool {
        self.pattern
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Top-level configuration: global kill switch, default knob values, and the
/// ordered rule list. Rule order is match-priority order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    /// Global enable flag. When false, all logging is off regardless of rules.
    pub enabled: bool,
    pub log_arguments: bool,
    pub log_return_value: bool,
    pub min_duration_ms: u64,
    pub max_result_size: i64,
    pub mask_sensitive: bool,
    /// Scope the host interception layer proxies; calls outside it never
    /// reach the engine. Unused by the engine itself.
    pub base_scope: Option<String>,
    pub rules: Vec<LoggingRule>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_arguments: true,
            log_return_value: true,
            min_duration_ms: 0,
            max_result_size: -1,
            mask_sensitive: false,
            base_scope: None,
            rules: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Defaults applied when merging rule overrides.
    pub fn default_config(&self) -> RuleConfig {
        RuleConfig {
            enabled: self.enabled,
            log_arguments: self.log_arguments,
            log_return_value: self.log_return_value,
            min_duration_ms: self.min_duration_ms,
            max_result_size: self.max_result_size,
            mask_sensitive: self.mask_sensitive,
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

//! Rule-driven dynamic call logging engine.
//!
//! This crate provides:
//! - Pattern compiler turning package/class/method/expression patterns into matchers
//! - Ordered rule registry with first-match-wins lookup and atomic snapshot reload
//! - Call interceptor emitting invocation/completion/exception records around calls
//! - YAML configuration loader with hot-reload via `notify` watcher

pub mod interceptor;
pub mod loader;
pub mod pattern;
pub mod registry;
pub mod sink;

pub use interceptor::CallInterceptor;
pub use loader::{ConfigError, ConfigLoader};
pub use pattern::{compile, Matcher};
pub use registry::{RuleEntry, RuleRegistry, Snapshot};
pub use sink::{LogSink, MemorySink, Severity, TracingSink};

pub use calltrace_core::{CallRef, LoggerConfig, LoggingRule, RuleConfig};

//! Shared data model for the calltrace dynamic call-logging engine.
//!
//! This crate provides:
//! - Call identity ([`CallRef`]) as delivered by the host interception layer
//! - Configuration schema ([`LoggerConfig`], [`LoggingRule`]) with serde deserialization
//! - Merged effective per-rule configuration ([`RuleConfig`])

pub mod call;
pub mod config;

pub use call::CallRef;
pub use config::{LoggerConfig, LoggingRule, RuleConfig};

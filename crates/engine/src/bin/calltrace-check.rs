//! calltrace-check — validate a calltrace config file and inspect its rules.
//!
//! Parses and validates the YAML config, prints each rule's compiled matcher
//! and effective configuration, and can probe which rule a given
//! (type, method) call would hit.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use calltrace_core::CallRef;
use calltrace_engine::loader::ConfigLoader;
use calltrace_engine::registry::{RuleRegistry, Snapshot};

// ── CLI ─────────────────────────────────────────────────────────────

/// Validate a calltrace logging configuration and inspect compiled rules.
#[derive(Parser, Debug)]
#[command(name = "calltrace-check", version, about)]
struct Cli {
    /// Path to the calltrace YAML config file.
    #[arg(env = "CALLTRACE_CONFIG", default_value = "calltrace.yml")]
    config: PathBuf,

    /// Probe a call: fully-qualified type name (requires --method).
    #[arg(long = "type", requires = "method")]
    type_name: Option<String>,

    /// Probe a call: method name (requires --type).
    #[arg(long, requires = "type_name")]
    method: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = ConfigLoader::load_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let snapshot = Snapshot::build(&config);
    println!(
        "{}: logging {}, {} active rule(s)",
        cli.config.display(),
        if snapshot.enabled() { "enabled" } else { "disabled" },
        snapshot.entries().len(),
    );

    for (idx, entry) in snapshot.entries().iter().enumerate() {
        let config = entry.config();
        println!(
            "  {:>2}. {}  (args: {}, result: {}, min_duration: {} ms, max_size: {}, masked: {})",
            idx + 1,
            entry.matcher(),
            config.log_arguments,
            config.log_return_value,
            config.min_duration_ms,
            config.max_result_size,
            config.mask_sensitive,
        );
    }

    let skipped = config.rules.len() - snapshot.entries().len();
    if skipped > 0 {
        println!("  ({skipped} rule(s) skipped: disabled or missing pattern)");
    }

    if let (Some(type_name), Some(method)) = (&cli.type_name, &cli.method) {
        let registry = RuleRegistry::new(&config);
        let call = CallRef::new(type_name, method);
        match registry.matching_config(&call) {
            Some(matched) => println!("probe {call}: logged ({matched:?})"),
            None => println!("probe {call}: no matching rule"),
        }
    }

    Ok(())
}

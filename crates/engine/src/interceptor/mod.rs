//! Interception decision and execution around intercepted calls.
//!
//! Per call, four phases:
//! 1. Gate — global kill switch and rule lookup; no match means the real
//!    call runs with zero logging work.
//! 2. Pre-log — an `Invoking` record, with arguments when configured.
//! 3. Timed execution of the real call; failures are logged on the error
//!    channel and re-surfaced unchanged.
//! 4. Post-log — a `Completed` record, only when the call took at least the
//!    configured minimum duration.
//!
//! None of the phases ever alters the wrapped call's result or error.

mod render;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use calltrace_core::{CallRef, RuleConfig};

use crate::registry::RuleRegistry;
use crate::sink::{LogSink, Severity, TracingSink};

use render::{render_arguments, render_display, render_result, PROTECTED};

/// Wraps intercepted calls with rule-driven logging.
///
/// The host interception layer hands each call's identity, arguments, and a
/// closure performing the real invocation to [`invoke`](Self::invoke).
pub struct CallInterceptor {
    registry: Arc<RuleRegistry>,
    sink: Arc<dyn LogSink>,
}

impl CallInterceptor {
    /// Interceptor logging through the `tracing` subscriber.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self::with_sink(registry, Arc::new(TracingSink))
    }

    pub fn with_sink(registry: Arc<RuleRegistry>, sink: Arc<dyn LogSink>) -> Self {
        Self { registry, sink }
    }

    /// Run an intercepted call through the gate/pre-log/execute/post-log
    /// phases. The wrapped call's result or error is returned unchanged.
    pub fn invoke<T, E, F>(
        &self,
        call: CallRef<'_>,
        args: &[&dyn fmt::Debug],
        proceed: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        T: fmt::Debug + 'static,
        E: fmt::Display,
    {
        if !self.registry.logging_enabled() {
            return proceed();
        }
        let config = match self.registry.matching_config(&call) {
            Some(config) if config.enabled => config,
            _ => return proceed(),
        };

        let name = call.qualified();
        self.log_invocation(&name, args, &config);

        let started = Instant::now();
        match proceed() {
            Ok(result) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                self.log_completion(&name, &result, elapsed_ms, &config);
                Ok(result)
            }
            Err(error) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let description = render_display(&error, self.sink.as_ref());
                self.sink.emit(
                    Severity::Error,
                    &format!("!! Exception in {name} after {elapsed_ms} ms. Error: {description}"),
                );
                Err(error)
            }
        }
    }

    fn log_invocation(&self, name: &str, args: &[&dyn fmt::Debug], config: &RuleConfig) {
        if config.log_arguments {
            let rendered = if config.mask_sensitive {
                PROTECTED.to_string()
            } else {
                render_arguments(args, self.sink.as_ref())
            };
            self.sink.emit(
                Severity::Info,
                &format!(">>> Invoking {name} with args: {rendered}"),
            );
        } else {
            self.sink.emit(Severity::Info, &format!(">>> Invoking {name}"));
        }
    }

    fn log_completion<T: fmt::Debug + 'static>(
        &self,
        name: &str,
        result: &T,
        elapsed_ms: u64,
        config: &RuleConfig,
    ) {
        if elapsed_ms < config.min_duration_ms {
            return;
        }
        let rendered = render_result(result, config, self.sink.as_ref());
        self.sink.emit(
            Severity::Info,
            &format!("<<< Completed {name} in {elapsed_ms} ms. Result: {rendered}"),
        );
    }
}

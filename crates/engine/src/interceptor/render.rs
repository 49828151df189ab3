//! Rendering of argument and result values into log-safe strings.
//!
//! A value's own `Debug`/`Display` impl can panic; rendering catches the
//! unwind, reports it on the sink's error channel, and substitutes a
//! placeholder so the wrapped call's outcome is never affected.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use calltrace_core::RuleConfig;

use crate::sink::{LogSink, Severity};

pub(super) const PROTECTED: &str = "[PROTECTED]";
const NOT_LOGGED: &str = "[NOT LOGGED]";
const VOID: &str = "VOID";
const UNRENDERABLE: &str = "<render failed>";
const TRUNCATION_MARKER: &str = "... (truncated)";

/// `[a, b, c]` rendering of the argument list.
pub(super) fn render_arguments(args: &[&dyn fmt::Debug], sink: &dyn LogSink) -> String {
    let parts: Vec<String> = args.iter().map(|arg| render_debug(*arg, sink)).collect();
    format!("[{}]", parts.join(", "))
}

/// Result field of the completion record, in precedence order: absent value,
/// suppressed, masked, then the (possibly truncated) rendering.
pub(super) fn render_result<T: fmt::Debug + 'static>(
    result: &T,
    config: &RuleConfig,
    sink: &dyn LogSink,
) -> String {
    if (result as &dyn Any).is::<()>() {
        return VOID.to_string();
    }
    if !config.log_return_value {
        return NOT_LOGGED.to_string();
    }
    if config.mask_sensitive {
        return PROTECTED.to_string();
    }
    truncate(render_debug(result, sink), config.max_result_size)
}

fn render_debug(value: &dyn fmt::Debug, sink: &dyn LogSink) -> String {
    guard_render(sink, || format!("{value:?}"))
}

pub(super) fn render_display(value: &dyn fmt::Display, sink: &dyn LogSink) -> String {
    guard_render(sink, || format!("{value}"))
}

fn guard_render(sink: &dyn LogSink, render: impl FnOnce() -> String) -> String {
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(rendered) => rendered,
        Err(_) => {
            sink.emit(Severity::Error, "failed to render value for logging");
            UNRENDERABLE.to_string()
        }
    }
}

/// Truncate to `max` characters with a trailing marker; `max < 0` disables.
fn truncate(rendered: String, max: i64) -> String {
    if max < 0 {
        return rendered;
    }
    let max = max as usize;
    if rendered.chars().count() <= max {
        return rendered;
    }
    let head: String = rendered.chars().take(max).collect();
    format!("{head}{TRUNCATION_MARKER}")
}

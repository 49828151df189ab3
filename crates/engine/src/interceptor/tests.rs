//! End-to-end interceptor scenarios against an in-memory sink.

use std::fmt;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use calltrace_core::{CallRef, LoggerConfig, LoggingRule};

use crate::registry::RuleRegistry;
use crate::sink::MemorySink;

use super::*;

fn rule(pattern: &str) -> LoggingRule {
    LoggingRule {
        pattern: Some(pattern.to_string()),
        ..LoggingRule::default()
    }
}

fn setup(rules: Vec<LoggingRule>) -> (Arc<MemorySink>, CallInterceptor) {
    let config = LoggerConfig {
        rules,
        ..LoggerConfig::default()
    };
    setup_config(config)
}

fn setup_config(config: LoggerConfig) -> (Arc<MemorySink>, CallInterceptor) {
    let registry = Arc::new(RuleRegistry::new(&config));
    let sink = Arc::new(MemorySink::new());
    let sink_handle: Arc<dyn LogSink> = sink.clone();
    let interceptor = CallInterceptor::with_sink(registry, sink_handle);
    (sink, interceptor)
}

#[test]
fn globally_disabled_skips_all_logging() {
    let config = LoggerConfig {
        enabled: false,
        rules: vec![rule("svc.order.*")],
        ..LoggerConfig::default()
    };
    let (sink, interceptor) = setup_config(config);

    let result: Result<u32, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[],
        || Ok(7),
    );

    assert_eq!(result.unwrap(), 7);
    assert!(sink.records().is_empty());
}

#[test]
fn unmatched_call_runs_without_logging() {
    let (sink, interceptor) = setup(vec![rule("svc.pay.*")]);

    let result: Result<u32, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&1_u32],
        || Ok(7),
    );

    assert_eq!(result.unwrap(), 7);
    assert!(sink.records().is_empty());
}

#[test]
fn fast_call_below_threshold_gets_pre_log_only() {
    let mut slow_only = rule("svc.order.*");
    slow_only.min_duration_ms = Some(100);
    let (sink, interceptor) = setup(vec![slow_only]);

    let result: Result<&str, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&"order-1"],
        || {
            sleep(Duration::from_millis(20));
            Ok("saved")
        },
    );

    assert_eq!(result.unwrap(), "saved");
    let infos = sink.infos();
    assert_eq!(infos.len(), 1, "completion must be suppressed below threshold");
    assert!(infos[0].starts_with(">>> Invoking svc.order.OrderService.save with args: "));
    assert!(infos[0].contains("\"order-1\""));
}

#[test]
fn slow_call_above_threshold_gets_both_records() {
    let mut slow_only = rule("svc.order.*");
    slow_only.min_duration_ms = Some(100);
    let (sink, interceptor) = setup(vec![slow_only]);

    let result: Result<&str, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&"order-1"],
        || {
            sleep(Duration::from_millis(120));
            Ok("saved")
        },
    );

    assert_eq!(result.unwrap(), "saved");
    let infos = sink.infos();
    assert_eq!(infos.len(), 2);
    assert!(infos[0].starts_with(">>> Invoking svc.order.OrderService.save"));
    assert!(infos[1].starts_with("<<< Completed svc.order.OrderService.save in "));
    assert!(infos[1].ends_with("ms. Result: \"saved\""));
}

#[test]
fn masked_rule_never_exposes_arguments() {
    let mut masked = rule("svc.pay.PaymentService.charge");
    masked.mask_sensitive = Some(true);
    masked.log_arguments = Some(true);
    let (sink, interceptor) = setup(vec![masked]);

    let result: Result<&str, String> = interceptor.invoke(
        CallRef::new("svc.pay.PaymentService", "charge"),
        &[&"4242-4242-4242-4242"],
        || Ok("ok"),
    );

    assert_eq!(result.unwrap(), "ok");
    let infos = sink.infos();
    assert!(infos[0].contains("with args: [PROTECTED]"));
    for record in sink.records() {
        assert!(!record.1.contains("4242"), "sensitive value leaked: {}", record.1);
    }
    // The result is masked too.
    assert!(infos[1].ends_with("Result: [PROTECTED]"));
}

#[test]
fn long_result_is_truncated_with_marker() {
    struct Report;
    impl fmt::Debug for Report {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "abcdefgh")
        }
    }

    let mut capped = rule("svc.report.ReportService.generate");
    capped.max_result_size = Some(5);
    let (sink, interceptor) = setup(vec![capped]);

    let result: Result<Report, String> = interceptor.invoke(
        CallRef::new("svc.report.ReportService", "generate"),
        &[],
        || Ok(Report),
    );

    assert!(result.is_ok());
    let infos = sink.infos();
    assert!(infos[1].ends_with("Result: abcde... (truncated)"));
}

#[test]
fn failing_call_logs_one_error_and_resurfaces_it() {
    let (sink, interceptor) = setup(vec![rule("svc.order.*")]);

    let result: Result<u32, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&"order-1"],
        || Err("constraint violation".to_string()),
    );

    assert_eq!(result.unwrap_err(), "constraint violation");

    let errors = sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("!! Exception in svc.order.OrderService.save after "));
    assert!(errors[0].ends_with("ms. Error: constraint violation"));

    // Pre-log was emitted, completion was not.
    let infos = sink.infos();
    assert_eq!(infos.len(), 1);
    assert!(infos[0].starts_with(">>> Invoking"));
}

#[test]
fn unit_result_logs_as_void() {
    let (sink, interceptor) = setup(vec![rule("svc.order.*")]);

    let result: Result<(), String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "touch"),
        &[],
        || Ok(()),
    );

    assert!(result.is_ok());
    assert!(sink.infos()[1].ends_with("Result: VOID"));
}

#[test]
fn argument_logging_can_be_switched_off() {
    let mut quiet = rule("svc.order.*");
    quiet.log_arguments = Some(false);
    let (sink, interceptor) = setup(vec![quiet]);

    let result: Result<u32, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&"order-1"],
        || Ok(1),
    );

    assert!(result.is_ok());
    let infos = sink.infos();
    assert_eq!(infos[0], ">>> Invoking svc.order.OrderService.save");
}

#[test]
fn return_value_logging_can_be_switched_off() {
    let mut quiet = rule("svc.order.*");
    quiet.log_return_value = Some(false);
    let (sink, interceptor) = setup(vec![quiet]);

    let result: Result<&str, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[],
        || Ok("secret"),
    );

    assert_eq!(result.unwrap(), "secret");
    assert!(sink.infos()[1].ends_with("Result: [NOT LOGGED]"));
}

#[test]
fn panicking_debug_impl_does_not_affect_the_call() {
    struct Hostile;
    impl fmt::Debug for Hostile {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("debug blew up");
        }
    }

    let (sink, interceptor) = setup(vec![rule("svc.order.*")]);

    let result: Result<u32, String> = interceptor.invoke(
        CallRef::new("svc.order.OrderService", "save"),
        &[&Hostile],
        || Ok(11),
    );

    assert_eq!(result.unwrap(), 11);
    assert_eq!(sink.errors().len(), 1);
    // Logging degraded but both info records still went out.
    assert_eq!(sink.infos().len(), 2);
}

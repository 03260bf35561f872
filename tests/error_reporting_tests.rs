//! Error Reporting Integration Tests
//!
//! End-to-end checks of the runtime-context-aware capture path: one
//! initialization path per context, inert registration without
//! configuration, and the swallow-everything contract of `on_error`.

use std::sync::Arc;

use sitebeacon::{
    AnalyticsSink, CapturedError, Instrumentation, ObservabilityConfig, RegisterError,
    RegisterOutcome, RequestInfo, RoutingMetadata, RuntimeContext, Transport,
};
use sitebeacon_analytics::testing::RecordingSink;
use sitebeacon_report::ErrorReporter;
use sitebeacon_report::testing::CountingTransport;

fn init_test_logging() {
    static LOGGING: std::sync::Once = std::sync::Once::new();
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn capture_args() -> (CapturedError, RequestInfo, RoutingMetadata) {
    (
        CapturedError::new("render failed")
            .with_digest("digest-1")
            .with_stack("at Page (/app/docs/page.tsx:12)"),
        RequestInfo::new("GET", "/docs").with_header("x-request-id", "req-7"),
        RoutingMetadata {
            router_kind: "app".to_string(),
            route_path: "/docs".to_string(),
            route_type: "render".to_string(),
            render_source: Some("react-server-components".to_string()),
            revalidate_reason: None,
            render_type: Some("dynamic".to_string()),
        },
    )
}

#[tokio::test]
async fn test_server_context_loads_only_the_server_path() {
    init_test_logging();
    let reporter = ErrorReporter::new();
    let outcome = reporter
        .register_with_transport(RuntimeContext::Server, Arc::new(CountingTransport::new()))
        .await
        .expect("register");

    assert_eq!(outcome, RegisterOutcome::Registered(RuntimeContext::Server));
    assert_eq!(reporter.context(), Some(RuntimeContext::Server));
}

#[tokio::test]
async fn test_edge_context_loads_only_the_edge_path() {
    let reporter = ErrorReporter::new();
    let outcome = reporter
        .register_with_transport(RuntimeContext::Edge, Arc::new(CountingTransport::new()))
        .await
        .expect("register");

    assert_eq!(outcome, RegisterOutcome::Registered(RuntimeContext::Edge));
    assert_eq!(reporter.context(), Some(RuntimeContext::Edge));
}

#[tokio::test]
async fn test_capture_forwards_request_and_routing_context() {
    init_test_logging();
    let transport = Arc::new(CountingTransport::new());
    let reporter = ErrorReporter::new();
    reporter
        .register_with_transport(
            RuntimeContext::Server,
            Arc::clone(&transport) as Arc<dyn Transport>,
        )
        .await
        .expect("register");

    let (error, request, routing) = capture_args();
    reporter.on_error(&error, &request, &routing);
    transport.wait_for(1).await;

    let sends = transport.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0]["error"]["digest"], "digest-1");
    assert_eq!(sends[0]["request"]["method"], "GET");
    assert_eq!(sends[0]["routing"]["route_path"], "/docs");
    assert_eq!(sends[0]["routing"]["render_type"], "dynamic");
}

#[tokio::test]
async fn test_on_error_swallows_reporting_failures() {
    let transport = Arc::new(CountingTransport::new());
    transport.fail_all();

    let reporter = ErrorReporter::new();
    reporter
        .register_with_transport(
            RuntimeContext::Edge,
            Arc::clone(&transport) as Arc<dyn Transport>,
        )
        .await
        .expect("register");

    let (error, request, routing) = capture_args();
    // Every delivery fails; the hook must still return normally.
    reporter.on_error(&error, &request, &routing);
    reporter.on_error(&error, &request, &routing);

    transport.wait_for(2).await;
    assert!(transport.sends().is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_is_a_noop() {
    let reporter = ErrorReporter::new();
    reporter
        .register_with_transport(RuntimeContext::Server, Arc::new(CountingTransport::new()))
        .await
        .expect("first register");

    let second = reporter
        .register_with_transport(RuntimeContext::Server, Arc::new(CountingTransport::new()))
        .await;

    assert!(matches!(second, Err(RegisterError::AlreadyRegistered)));
    assert_eq!(reporter.context(), Some(RuntimeContext::Server));
}

#[tokio::test]
async fn test_unconfigured_process_installs_no_hook() {
    let reporter = ErrorReporter::new();
    let outcome = reporter
        .register(&ObservabilityConfig::disabled(), RuntimeContext::Server)
        .await
        .expect("register");

    assert_eq!(outcome, RegisterOutcome::Inert);
    assert!(!reporter.is_registered());

    let (error, request, routing) = capture_args();
    reporter.on_error(&error, &request, &routing);
}

#[tokio::test]
async fn test_facade_registers_from_configuration() {
    let config = ObservabilityConfig::disabled()
        .with_error_dsn("https://key@ingest.example.com/42");
    let instrumentation = Instrumentation::new(config, |_| {
        Ok(Arc::new(RecordingSink::new()) as Arc<dyn AnalyticsSink>)
    });

    let outcome = instrumentation
        .register_error_reporting(RuntimeContext::Server)
        .await
        .expect("register");

    assert_eq!(outcome, RegisterOutcome::Registered(RuntimeContext::Server));
    assert_eq!(
        instrumentation.reporter().context(),
        Some(RuntimeContext::Server)
    );
}

#[tokio::test]
async fn test_malformed_dsn_degrades_to_inert() {
    let config = ObservabilityConfig::disabled().with_error_dsn("garbage");
    let instrumentation = Instrumentation::new(config, |_| {
        Ok(Arc::new(RecordingSink::new()) as Arc<dyn AnalyticsSink>)
    });

    let outcome = instrumentation
        .register_error_reporting(RuntimeContext::Edge)
        .await
        .expect("register");

    assert_eq!(outcome, RegisterOutcome::Inert);
    assert!(!instrumentation.reporter().is_registered());
}

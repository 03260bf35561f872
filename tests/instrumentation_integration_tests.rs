//! Instrumentation Integration Tests
//!
//! End-to-end checks of the analytics half of the layer: singleton client
//! construction, identity reconciliation, navigation dedup, and web-vitals
//! collection, wired through the `Instrumentation` facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use sitebeacon::{
    AnalyticsSink, ClientFactory, Instrumentation, NavigationState, ObservabilityConfig,
    Transition, UserId, UserProfile, UserTraits, WebVital,
};
use sitebeacon_analytics::testing::{RecordingSink, SinkCall};

/// Facade wired to a shared recording sink with a construction counter.
fn recording_instrumentation(
    config: ObservabilityConfig,
) -> (Instrumentation, Arc<RecordingSink>, Arc<AtomicUsize>) {
    let sink = Arc::new(RecordingSink::new());
    let constructions = Arc::new(AtomicUsize::new(0));
    let shared_sink = Arc::clone(&sink);
    let counter = Arc::clone(&constructions);
    let instrumentation = Instrumentation::new(config, move |_key| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&shared_sink) as Arc<dyn AnalyticsSink>)
    });
    (instrumentation, sink, constructions)
}

#[test]
fn test_disabled_analytics_constructs_no_client() {
    let (instrumentation, sink, constructions) =
        recording_instrumentation(ObservabilityConfig::disabled());

    let user = UserProfile::new(UserId::new_unchecked("user-1"));
    for _ in 0..3 {
        instrumentation.identity().observe(Some(&user));
        instrumentation
            .page_views()
            .on_navigation(&NavigationState::new("/a", ""));
        instrumentation.vitals().init();
        instrumentation.vitals().record(WebVital::Lcp, 1500.0);
    }

    assert_eq!(constructions.load(Ordering::SeqCst), 0);
    assert!(sink.calls().is_empty());
    assert!(!instrumentation.analytics().is_constructed());
}

#[test]
fn test_concurrent_first_calls_construct_exactly_once() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);
    let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_test");
    let factory = Arc::new(ClientFactory::new(&config, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        // Widen the race window so losers genuinely contend.
        std::thread::sleep(std::time::Duration::from_millis(10));
        Ok(Arc::new(RecordingSink::new()) as Arc<dyn AnalyticsSink>)
    }));

    const CALLERS: usize = 8;
    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let factory = Arc::clone(&factory);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                factory.get().expect("client handle")
            })
        })
        .collect();

    let clients: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("caller thread"))
        .collect();

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    for client in &clients[1..] {
        assert!(Arc::ptr_eq(&clients[0], client));
    }
}

#[test]
fn test_identity_events_match_genuine_transitions() {
    let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_test");
    let (instrumentation, sink, _constructions) = recording_instrumentation(config);

    let user_a = UserProfile::new(UserId::new_unchecked("user-a")).with_traits(UserTraits {
        email: Some("a@example.com".to_string()),
        created_at: None,
    });

    let observations = [None, Some(&user_a), Some(&user_a), Some(&user_a), None];
    let transitions: Vec<Transition> = observations
        .iter()
        .map(|profile| instrumentation.identity().observe(*profile))
        .collect();

    assert_eq!(
        transitions,
        vec![
            Transition::Unchanged,
            Transition::Identified,
            Transition::Unchanged,
            Transition::Unchanged,
            Transition::Reset,
        ]
    );
    assert_eq!(
        sink.calls(),
        vec![SinkCall::Identify("user-a".to_string()), SinkCall::Reset]
    );
}

#[test]
fn test_page_views_dedup_consecutive_navigations() {
    let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_test");
    let (instrumentation, sink, _constructions) = recording_instrumentation(config);

    for (path, query) in [("/a", ""), ("/a", ""), ("/b", ""), ("/a", "")] {
        instrumentation
            .page_views()
            .on_navigation(&NavigationState::new(path, query));
    }

    let urls: Vec<String> = sink
        .events()
        .iter()
        .map(|event| {
            event.properties["url"]
                .as_str()
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert_eq!(urls, vec!["/a", "/b", "/a"]);
}

#[test]
fn test_canonical_url_shapes() {
    assert_eq!(
        NavigationState::new("/docs", "tab=2").canonical_url(),
        "/docs?tab=2"
    );
    assert_eq!(NavigationState::new("/docs", "").canonical_url(), "/docs");
}

#[test]
fn test_vitals_init_twice_registers_once() {
    let config = ObservabilityConfig::disabled().with_analytics_write_key("wk_test");
    let (instrumentation, sink, _constructions) = recording_instrumentation(config);

    assert!(instrumentation.vitals().init());
    assert!(!instrumentation.vitals().init());

    assert!(instrumentation.vitals().record(WebVital::Cls, 0.04));
    assert!(!instrumentation.vitals().record(WebVital::Cls, 0.11));

    assert_eq!(sink.events().len(), 1);
    assert_eq!(sink.events()[0].properties["name"], "CLS");
}

#[test]
fn test_global_initialize_is_set_once() {
    let config = ObservabilityConfig::disabled();
    let installed = Instrumentation::initialize(config, |_| {
        Ok(Arc::new(RecordingSink::new()) as Arc<dyn AnalyticsSink>)
    })
    .expect("first initialize");

    assert!(std::ptr::eq(
        installed,
        Instrumentation::global().expect("installed instance")
    ));

    let second = Instrumentation::initialize(ObservabilityConfig::disabled(), |_| {
        Ok(Arc::new(RecordingSink::new()) as Arc<dyn AnalyticsSink>)
    });
    assert!(second.is_err());
}

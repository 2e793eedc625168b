//! Registry and counter behavior under the concurrency contract.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::thread;

use pulsegate_core::label::LabelSet;
use pulsegate_core::registry::MetricRegistry;
use pulsegate_core::resource::Resource;

fn registry() -> MetricRegistry {
    MetricRegistry::new(Resource::new("test-svc", "0.0.0"))
}

#[test]
fn counter_is_idempotent_per_name() {
    let reg = registry();
    let a = reg.counter("requests_total", "requests", "1");
    let b = reg.counter("requests_total", "requests", "1");
    let labels = LabelSet::from_pairs(&[("type", "hits")]);
    a.add(&labels, 2.0).unwrap();
    b.add(&labels, 3.0).unwrap();
    assert_eq!(a.value(&labels), 5.0);
    assert_eq!(b.value(&labels), 5.0);
}

#[test]
fn first_registration_wins_metadata() {
    let reg = registry();
    let first = reg.counter("requests_total", "original", "1");
    let second = reg.counter("requests_total", "changed", "items");
    assert_eq!(second.name(), "requests_total");
    assert_eq!(first.description(), "original");
    assert_eq!(second.description(), "original");
    assert_eq!(second.unit(), "1");
}

#[test]
fn negative_and_non_finite_deltas_are_rejected() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let labels = LabelSet::empty();
    counter.add(&labels, 1.5).unwrap();
    assert!(counter.add(&labels, -1.0).is_err());
    assert!(counter.add(&labels, f64::NAN).is_err());
    assert!(counter.add(&labels, f64::INFINITY).is_err());
    // rejected deltas leave the accumulator untouched
    assert_eq!(counter.value(&labels), 1.5);
}

#[test]
fn zero_delta_registers_the_label_set() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let labels = LabelSet::from_pairs(&[("type", "hits")]);
    counter.add(&labels, 0.0).unwrap();
    assert_eq!(counter.value(&labels), 0.0);
    let snap = reg.snapshot();
    assert_eq!(snap.value("requests_total", &labels), Some(0.0));
}

#[test]
fn error_kind_is_stable() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let err = counter.add(&LabelSet::empty(), -2.0).unwrap_err();
    assert_eq!(err.kind(), "INVALID_DELTA");
}

#[test]
fn distinct_label_sets_do_not_share_accumulators() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let hits = LabelSet::from_pairs(&[("type", "hits"), ("service", "demo")]);
    let misses = LabelSet::from_pairs(&[("type", "misses"), ("service", "demo")]);
    for _ in 0..3 {
        counter.inc(&hits).unwrap();
    }
    for _ in 0..2 {
        counter.inc(&misses).unwrap();
    }
    assert_eq!(counter.value(&hits), 3.0);
    assert_eq!(counter.value(&misses), 2.0);
}

#[test]
fn concurrent_adds_lose_nothing() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let labels = LabelSet::from_pairs(&[("type", "hits")]);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let counter = counter.clone();
        let labels = labels.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..1_000 {
                counter.add(&labels, 1.0).unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(counter.value(&labels), 8_000.0);
}

#[test]
fn snapshot_is_isolated_from_later_increments() {
    let reg = registry();
    let counter = reg.counter("requests_total", "requests", "1");
    let labels = LabelSet::from_pairs(&[("type", "hits")]);
    counter.add(&labels, 4.0).unwrap();
    let snap = reg.snapshot();
    counter.add(&labels, 10.0).unwrap();
    assert_eq!(snap.value("requests_total", &labels), Some(4.0));
    assert_eq!(reg.snapshot().value("requests_total", &labels), Some(14.0));
}

#[test]
fn snapshot_of_empty_registry() {
    let reg = registry();
    let snap = reg.snapshot();
    assert!(snap.is_empty());
    assert_eq!(snap.counters.len(), 0);
    assert_eq!(snap.total_points(), 0);
}

#[test]
fn registered_but_never_incremented_counter_has_no_points() {
    let reg = registry();
    let _ = reg.counter("requests_total", "requests", "1");
    let snap = reg.snapshot();
    let series = snap.series("requests_total").unwrap();
    assert!(series.points.is_empty());
}

//! Snapshot wire-shape tests (JSON as exported by the pipeline).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use pulsegate_core::label::LabelSet;
use pulsegate_core::registry::MetricRegistry;
use pulsegate_core::resource::Resource;

#[test]
fn snapshot_json_shape() {
    let reg = MetricRegistry::new(Resource::new("demo", "1.2.3"));
    let counter = reg.counter("app_requests_total", "Requests handled", "requests");
    let hits = LabelSet::from_pairs(&[("type", "hits"), ("service", "demo")]);
    counter.add(&hits, 3.0).unwrap();

    let value = serde_json::to_value(reg.snapshot()).unwrap();

    let resource = &value["resource"];
    assert_eq!(resource["service.name"], "demo");
    assert_eq!(resource["service.version"], "1.2.3");
    // hyphenated UUIDv4
    assert_eq!(resource["service.instance.id"].as_str().unwrap().len(), 36);

    assert!(value["taken_at_ms"].as_u64().unwrap() > 0);

    let counters = value["counters"].as_array().unwrap();
    assert_eq!(counters.len(), 1);
    let series = &counters[0];
    assert_eq!(series["name"], "app_requests_total");
    assert_eq!(series["description"], "Requests handled");
    assert_eq!(series["unit"], "requests");
    let points = series["points"].as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["labels"]["type"], "hits");
    assert_eq!(points[0]["labels"]["service"], "demo");
    assert_eq!(points[0]["value"], 3.0);
}

#[test]
fn counters_and_points_are_sorted() {
    let reg = MetricRegistry::new(Resource::new("demo", "1.2.3"));
    reg.counter("zz_total", "z", "1")
        .add(&LabelSet::empty(), 1.0)
        .unwrap();
    reg.counter("aa_total", "a", "1")
        .add(&LabelSet::empty(), 1.0)
        .unwrap();
    let snap = reg.snapshot();
    let names: Vec<&str> = snap.counters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["aa_total", "zz_total"]);

    let counter = reg.counter("ordered_total", "points", "1");
    counter
        .add(&LabelSet::from_pairs(&[("type", "misses")]), 1.0)
        .unwrap();
    counter
        .add(&LabelSet::from_pairs(&[("type", "hits")]), 1.0)
        .unwrap();
    let snap = reg.snapshot();
    let series = snap.series("ordered_total").unwrap();
    let kinds: Vec<&str> = series
        .points
        .iter()
        .filter_map(|p| p.labels.get("type"))
        .collect();
    assert_eq!(kinds, ["hits", "misses"]);
}

#[test]
fn instance_id_is_unique_per_resource() {
    let a = Resource::new("demo", "1.0.0");
    let b = Resource::new("demo", "1.0.0");
    assert_ne!(a.instance_id(), b.instance_id());
    assert_eq!(a.service_name(), b.service_name());
    assert_eq!(a.service_version(), "1.0.0");
}

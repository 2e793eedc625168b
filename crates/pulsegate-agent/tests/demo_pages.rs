//! Demo page handlers: published bodies and the points they record.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::extract::{Path, State};

use pulsegate_core::label::LabelSet;
use pulsegate_core::registry::MetricRegistry;
use pulsegate_core::resource::Resource;

use pulsegate_agent::app_state::{AppState, REQUESTS_METRIC};
use pulsegate_agent::handlers::{hello, hello_name, home};

fn state() -> AppState {
    let registry = Arc::new(MetricRegistry::new(Resource::new("demo", "0.0.0")));
    AppState::new(registry, "demo".to_string())
}

#[tokio::test]
async fn pages_serve_the_published_bodies() {
    let state = state();
    let body = home(State(state.clone())).await;
    assert_eq!(
        body.0,
        "<h1>This is the homepage. Try /hello and /hello/Sammy\n</h1>"
    );
    let body = hello(State(state.clone())).await;
    assert_eq!(body.0, "<h1>Hello from Docker!\n</h1>");
    let body = hello_name(State(state), Path("Sammy".to_string())).await;
    assert_eq!(body.0, "<h1>Hello, Sammy!\n</h1>");
}

#[tokio::test]
async fn every_page_records_a_typed_point() {
    let state = state();
    home(State(state.clone())).await;
    hello(State(state.clone())).await;
    hello(State(state.clone())).await;
    hello_name(State(state.clone()), Path("Sammy".to_string())).await;

    let snap = state.registry().snapshot();
    let for_kind = |kind: &str| {
        snap.value(
            REQUESTS_METRIC,
            &LabelSet::from_pairs(&[("type", kind), ("service", "demo")]),
        )
    };
    assert_eq!(for_kind("main"), Some(1.0));
    assert_eq!(for_kind("hello endpoint"), Some(2.0));
    assert_eq!(for_kind("hello{name} endpoint"), Some(1.0));
}

#[tokio::test]
async fn path_name_is_escaped() {
    let state = state();
    let body = hello_name(State(state), Path("<b>&co".to_string())).await;
    assert_eq!(body.0, "<h1>Hello, &lt;b&gt;&amp;co!\n</h1>");
}

//! Demo page handlers.
//!
//! Every request increments the shared request counter before responding;
//! that instrumentation contract is the whole point of the demo app.

use axum::extract::{Path, State};
use axum::response::Html;

use pulsegate_core::label::LabelSet;

use crate::app_state::AppState;

/// Label record attached to every request point: the kind of work (`type`)
/// and the owning service (`service`). Keeping the schema in one struct makes
/// a new label key a type change instead of a scattered string edit.
#[derive(Debug, Clone, Copy)]
pub struct RequestLabels<'a> {
    pub kind: &'static str,
    pub service: &'a str,
}

impl RequestLabels<'_> {
    pub fn to_labels(&self) -> LabelSet {
        LabelSet::from_pairs(&[("type", self.kind), ("service", self.service)])
    }
}

fn record(state: &AppState, kind: &'static str) {
    let labels = RequestLabels {
        kind,
        service: state.service(),
    }
    .to_labels();
    if let Err(e) = state.requests().inc(&labels) {
        tracing::error!(error = %e, page = kind, "request increment rejected");
    }
}

pub async fn home(State(state): State<AppState>) -> Html<&'static str> {
    record(&state, "main");
    Html("<h1>This is the homepage. Try /hello and /hello/Sammy\n</h1>")
}

pub async fn hello(State(state): State<AppState>) -> Html<&'static str> {
    record(&state, "hello endpoint");
    Html("<h1>Hello from Docker!\n</h1>")
}

pub async fn hello_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Html<String> {
    record(&state, "hello{name} endpoint");
    Html(format!("<h1>Hello, {}!\n</h1>", escape_html(&name)))
}

/// Minimal HTML escape for user-supplied path segments.
fn escape_html(v: &str) -> String {
    v.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

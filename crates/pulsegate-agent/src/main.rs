//! pulsegate agent binary.
//!
//! Lifecycle:
//! - load config (strict parsing, defaults when the file is absent)
//! - build the resource descriptor and registry
//! - connect the export pipeline (fail fast, no serving without a collector)
//! - warm up the request counter, then serve the demo app
//! - on shutdown: flip readiness, drain the pipeline bounded by the
//!   configured timeout; a second signal switches to the forced timeout

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use pulsegate_core::registry::MetricRegistry;
use pulsegate_core::resource::Resource;

use pulsegate_agent::export::ExportPipeline;
use pulsegate_agent::handlers::RequestLabels;
use pulsegate_agent::{app_state, config, router, shutdown};

const CONFIG_PATH: &str = "pulsegate.yaml";

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::load_or_default(CONFIG_PATH).expect("config load failed");
    let listen: SocketAddr = cfg
        .http
        .listen
        .parse()
        .expect("http.listen must be a valid SocketAddr");

    let resource = Resource::new(&cfg.service.name, &cfg.service.version);
    tracing::info!(
        service = %resource.service_name(),
        version = %resource.service_version(),
        instance = %resource.instance_id(),
        "starting pulsegate-agent"
    );

    let registry = Arc::new(MetricRegistry::new(resource));

    // No serving without a collector connection.
    let pipeline = match ExportPipeline::connect(&cfg.exporter, Arc::clone(&registry)).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, endpoint = %cfg.exporter.endpoint, "collector connect failed");
            std::process::exit(1);
        }
    };
    let pipeline = pipeline.spawn();

    let state = app_state::AppState::new(Arc::clone(&registry), cfg.service.name.clone());

    // Warm-up burst so the first exports are not empty.
    let hits = RequestLabels {
        kind: "hits",
        service: state.service(),
    }
    .to_labels();
    let misses = RequestLabels {
        kind: "misses",
        service: state.service(),
    }
    .to_labels();
    for step in 1..=10 {
        tracing::info!(step, total = 10, "doing really hard work");
        state
            .requests()
            .inc(&hits)
            .expect("unit increment is always valid");
        state
            .requests()
            .inc(&misses)
            .expect("unit increment is always valid");
    }

    let app = router::build_router(state.clone());

    tracing::info!(%listen, "serving HTTP requests");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    let drain_state = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown::shutdown_signal().await;
            tracing::info!("shutdown signal received");
            drain_state.set_draining();
        })
        .await
        .expect("server failed");

    // Bounded final flush; a second signal switches to the forced timeout.
    let drain = pipeline.drain(cfg.exporter.drain_timeout());
    tokio::pin!(drain);
    tokio::select! {
        outcome = &mut drain => tracing::info!(?outcome, "telemetry drained"),
        _ = shutdown::shutdown_signal() => {
            tracing::warn!(
                timeout_ms = cfg.exporter.forced_drain_timeout_ms,
                "second shutdown signal, forcing quick drain"
            );
            match tokio::time::timeout(cfg.exporter.forced_drain_timeout(), &mut drain).await {
                Ok(outcome) => tracing::info!(?outcome, "telemetry drained under forced timeout"),
                Err(_) => tracing::warn!("drain abandoned"),
            }
        }
    }
}

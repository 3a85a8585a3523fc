//! sockslens exporter binary.
//!
//! Loads the YAML config, registers the metric instruments once, and serves
//! the scrape surface. Duplicate metric registration is fatal here: the
//! process refuses to start rather than export an ambiguous surface.

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use sockslens_exporter::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("sockslens.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .expect("exporter.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("metric registration failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "sockslens-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}

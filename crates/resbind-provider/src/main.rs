//! resbind provider process.
//!
//! - Config: YAML path as the first argument (default `resbind.yaml`)
//! - Logs go to stderr; stdout carries only the handshake line
//! - Handshake: `RESBIND|<protocol version>|http|<bound addr>`

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use resbind_core::error::{ResBindError, Result};
use resbind_core::protocol::plugin::PROTOCOL_VERSION;
use resbind_provider::{app_state, config, router, shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "resbind-provider failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "resbind.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.provider.listen_addr()?;

    let state = app_state::AppState::new(&cfg)?;
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ResBindError::Internal(format!("bind {listen} failed: {e}")))?;
    let bound = listener
        .local_addr()
        .map_err(|e| ResBindError::Internal(format!("local addr: {e}")))?;

    println!("RESBIND|{PROTOCOL_VERSION}|http|{bound}");
    tracing::info!(%bound, config = %path, "resbind-provider starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::on_signal(tokio::signal::ctrl_c()))
        .await
        .map_err(|e| ResBindError::Internal(format!("server failed: {e}")))
}

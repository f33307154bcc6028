//! HTTP server for the interactive mode.
//!
//! # Responsibilities
//! - Build the request context from real headers and the peer address
//! - Run one independent diagnosis per request
//! - Return the text report (or the fatal error with status 500)
//! - Wire up middleware (request ID, tracing, timeout)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::{header, Extensions, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::diagnose::Doctor;
use crate::lifecycle::shutdown_signal;
use crate::panel::SettingsSource;
use crate::report::{render_failure, render_report, Mode};
use crate::request::RequestContext;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Embedded web server that serves the report.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new<S>(config: &ServerConfig, doctor: Doctor<S>) -> Self
    where
        S: SettingsSource + 'static,
    {
        Self {
            router: Self::build_router(config, Arc::new(doctor)),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<S>(config: &ServerConfig, doctor: Arc<Doctor<S>>) -> Router
    where
        S: SettingsSource + 'static,
    {
        Router::new()
            .route("/", get(debug_handler::<S>))
            .route("/debug_ip", get(debug_handler::<S>))
            .route("/debug_ip.php", get(debug_handler::<S>))
            .with_state(doctor)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with all layers, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn debug_handler<S: SettingsSource>(
    State(doctor): State<Arc<Doctor<S>>>,
    headers: HeaderMap,
    extensions: Extensions,
) -> Response {
    let start = Instant::now();
    let peer = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    if peer.is_none() {
        tracing::warn!("No peer address on request; REMOTE_ADDR will be unset");
    }

    let context = RequestContext::from_headers(&headers, peer);
    let (status, body) = match doctor.diagnose(context).await {
        Ok(diagnosis) => (StatusCode::OK, render_report(Mode::Web, &diagnosis)),
        Err(e) => {
            tracing::error!(error = %e, "Diagnosis failed");
            (StatusCode::INTERNAL_SERVER_ERROR, render_failure(Mode::Web, &e))
        }
    };

    tracing::debug!(
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Report served"
    );
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

use std::net::SocketAddr;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::state::AppState;
use crate::{auth, records};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_origin.as_deref());

    Router::new()
        .route("/", get(|| async { "API is running" }))
        .nest(
            "/api",
            Router::new().merge(auth::router()).merge(records::router()),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

fn cors_layer(frontend_origin: Option<&str>) -> CorsLayer {
    match frontend_origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods(Any)
                .allow_headers(Any),
            Err(e) => {
                warn!(error = %e, %origin, "FRONTEND_ORIGIN is not a valid origin, allowing any");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    }
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "3000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

//! Pass-through fetch relay for the benchmark data store.
//!
//! The viewer issues plain GETs against this proxy; every path is forwarded
//! unchanged to the upstream origin. The relay's whole job is to inject
//! permissive CORS and a one-week cache header, and to collapse upstream
//! failures to a diagnostic 404 so the viewer's silent-miss handling works.

use std::env;
use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ONE_WEEK_CACHE: &str = "public, max-age=604800";

#[derive(Clone)]
struct AppState {
    upstream: String,
    http: reqwest::Client,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let upstream = env::var("EDGE_PROXY_UPSTREAM").unwrap_or_else(|_| {
        "https://sid.erda.dk/share_redirect/cbMhbwV1yP/mmearth-bench-explorer".to_string()
    });
    let addr: SocketAddr = env::var("EDGE_PROXY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9400".to_string())
        .parse()
        .expect("invalid EDGE_PROXY_ADDR");

    let state = AppState {
        upstream,
        http: reqwest::Client::new(),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .fallback(relay)
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    info!("edge proxy listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn relay(State(state): State<AppState>, uri: Uri) -> Response {
    let target = format!("{}{}", state.upstream.trim_end_matches('/'), uri.path());

    let response = match state.http.get(&target).send().await {
        Ok(response) => response,
        Err(err) => {
            error!("upstream GET failed: {err}");
            return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        // Non-200 collapses to a diagnostic 404; the viewer treats missing
        // raster tiles as a silent no-op, and the body helps a human debug.
        return (
            StatusCode::NOT_FOUND,
            format!("Error: Could not find file at {target}"),
        )
            .into_response();
    }

    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match response.bytes().await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(&content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            );
            headers.insert(
                http::header::CACHE_CONTROL,
                HeaderValue::from_static(ONE_WEEK_CACHE),
            );
            (StatusCode::OK, headers, Body::from(bytes)).into_response()
        }
        Err(err) => {
            error!("upstream body read failed: {err}");
            (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
        }
    }
}

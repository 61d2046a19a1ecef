use std::{net::SocketAddr, time::Duration};

use axum::{
    body::{self, Body},
    extract::{FromRequest, Query, Request},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, warn, Span};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{notices, users};

/// Same ceiling axum's `DefaultBodyLimit` puts on `Form`, so buffering for the
/// override never rejects a body the handler itself would accept.
const MAX_OVERRIDE_BODY: usize = 2 * 1024 * 1024;

pub fn build_app(state: AppState, public_dir: &str) -> Router {
    let routes = Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .merge(users::router())
        .merge(notices::router())
        .nest_service("/public", ServeDir::new(public_dir))
        .with_state(state);

    // The override has to run before route matching, so the real router
    // sits behind a fallback that carries the middleware.
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn(method_override))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(log_response),
        )
}

fn request_span(req: &axum::http::Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = tracing::field::Empty,
    )
}

fn log_response(res: &Response, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", status.as_u16());
    let latency_ms = latency.as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "request failed");
    } else {
        tracing::debug!(%status, latency_ms, "request served");
    }
}

#[derive(Debug, Default, Deserialize)]
struct MethodField {
    #[serde(rename = "_method")]
    method: Option<String>,
}

fn override_target(raw: Option<&str>) -> Option<Method> {
    match raw?.trim().to_ascii_uppercase().as_str() {
        "PATCH" => Some(Method::PATCH),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Lets HTML forms reach PATCH/PUT/DELETE routes by POSTing `_method`,
/// either in the query string or as a form field.
pub async fn method_override(req: Request, next: Next) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let from_query = Query::<MethodField>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(f)| override_target(f.method.as_deref()));

    let (req, target) = match from_query {
        Some(m) => (req, Some(m)),
        None if is_form(&req) => {
            let (parts, body) = req.into_parts();
            let bytes = match body::to_bytes(body, MAX_OVERRIDE_BODY).await {
                Ok(b) => b,
                Err(e) => {
                    warn!(error = %e, limit = MAX_OVERRIDE_BODY, "form body too large or unreadable");
                    return StatusCode::PAYLOAD_TOO_LARGE.into_response();
                }
            };
            let field_req = axum::http::Request::builder()
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(bytes.clone()));
            let target = match field_req {
                Ok(field_req) => Form::<MethodField>::from_request(field_req, &())
                    .await
                    .ok()
                    .and_then(|Form(f)| override_target(f.method.as_deref())),
                Err(_) => None,
            };
            (Request::from_parts(parts, Body::from(bytes)), target)
        }
        None => (req, None),
    };

    let mut req = req;
    if let Some(method) = target {
        debug!(%method, uri = %req.uri(), "method override");
        *req.method_mut() = method;
    }
    next.run(req).await
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on http://{}/login", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

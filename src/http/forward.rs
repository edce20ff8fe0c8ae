//! Request forwarding.
//!
//! # Responsibilities
//! - Extract the `proto` and `cors-host` control parameters
//! - Build the target URL: `{scheme}://{host}{original-path-and-query}`
//! - Perform the outbound GET on a worker task bounded by a deadline
//! - Map every outcome to exactly one response: 200 + CORS header + body,
//!   or 500 with the literal body `Error`
//!
//! # Design Decisions
//! - The scheme is derived per request; there is no process-wide mutable
//!   default, so `proto` never affects other requests
//! - The inbound path and query are forwarded verbatim, control
//!   parameters included, for compatibility with existing callers
//! - Failure causes are logged server-side and never put on the wire

use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::server::{AppState, OutboundClient};

/// Fixed failure body. Callers never see the underlying cause.
const FAILURE_BODY: &str = "Error";

/// Error type for the outbound fetch. All variants collapse to the same
/// caller-visible 500 response; the distinction exists for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid target URL: {0}")]
    InvalidTarget(#[from] axum::http::Error),

    #[error("connect failed: {0}")]
    Connect(#[source] hyper_util::client::legacy::Error),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("body read failed: {0}")]
    BodyRead(#[source] axum::Error),

    #[error("fetch worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Control parameters recognized on the inbound query string.
///
/// First occurrence wins; everything else on the query string is left
/// untouched and forwarded to the target.
#[derive(Debug, Default, PartialEq)]
pub struct ControlParams {
    /// Scheme override for this request (`proto=`). Empty values are
    /// treated as absent.
    pub proto: Option<String>,

    /// Target host (`cors-host=`). Passed through verbatim, unvalidated;
    /// a missing or malformed host surfaces as a fetch failure.
    pub cors_host: Option<String>,
}

impl ControlParams {
    pub fn from_uri(uri: &Uri) -> Self {
        let query = uri.query().unwrap_or("");
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "proto" if params.proto.is_none() && !value.is_empty() => {
                    params.proto = Some(value.into_owned());
                }
                "cors-host" if params.cors_host.is_none() => {
                    params.cors_host = Some(value.into_owned());
                }
                _ => {}
            }
        }
        params
    }
}

/// Build the target URL from scheme, host, and the full inbound
/// path+query. The query string is appended verbatim, `proto` and
/// `cors-host` included.
pub fn target_url(scheme: &str, host: &str, inbound: &Uri) -> String {
    let path_and_query = inbound
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}://{}{}", scheme, host, path_and_query)
}

/// Perform a single GET against `url`, bounded by `deadline`.
///
/// The fetch runs on a spawned worker so the caller can give up at the
/// deadline without blocking on the transport. When the deadline fires the
/// worker is aborted and its join awaited for at most `abort_grace`; a
/// worker that ignores the abort past the grace period is abandoned and
/// logged rather than blocking the request forever.
pub async fn fetch(
    client: OutboundClient,
    url: String,
    deadline: Duration,
    abort_grace: Duration,
) -> Result<Bytes, FetchError> {
    let target: Uri = url.parse::<Uri>().map_err(axum::http::Error::from)?;

    let mut worker = tokio::spawn(async move {
        let request = Request::builder()
            .uri(target)
            .body(Body::empty())
            .map_err(FetchError::InvalidTarget)?;

        let response: axum::http::Response<hyper::body::Incoming> = client
            .request(request)
            .await
            .map_err(FetchError::Connect)?;

        // Full body is collected before relaying; the deadline caps how
        // long this can run, and a mid-read drop becomes BodyRead.
        axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
            .await
            .map_err(FetchError::BodyRead)
    });

    match tokio::time::timeout(deadline, &mut worker).await {
        Ok(joined) => joined?,
        Err(_elapsed) => {
            worker.abort();
            // Drain the worker so its outcome can never reach a response,
            // but only within the grace period.
            if tokio::time::timeout(abort_grace, &mut worker).await.is_err() {
                tracing::warn!(url = %url, "fetch worker ignored abort, abandoning it");
            }
            tracing::warn!(url = %url, "cancelled fetch at deadline");
            Err(FetchError::DeadlineExceeded)
        }
    }
}

/// Catch-all handler: every inbound request becomes at most one outbound
/// GET and exactly one inbound response.
pub async fn forward_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let uri = request.uri().clone();

    tracing::info!(uri = %uri, "inbound request");

    let params = ControlParams::from_uri(&uri);
    let scheme = params
        .proto
        .as_deref()
        .unwrap_or(&state.config.upstream.default_scheme);
    let host = params.cors_host.as_deref().unwrap_or("");

    let target = target_url(scheme, host, &uri);
    let deadline = Duration::from_secs(state.config.upstream.fetch_timeout_secs);
    let abort_grace = Duration::from_millis(state.config.upstream.abort_grace_ms);

    match fetch(state.client.clone(), target.clone(), deadline, abort_grace).await {
        Ok(body) => {
            crate::observability::metrics::record_request(StatusCode::OK.as_u16(), start);
            (
                StatusCode::OK,
                [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(target = %target, error = %e, "forward failed");
            crate::observability::metrics::record_request(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                start,
            );
            (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_BODY).into_response()
        }
    }
}

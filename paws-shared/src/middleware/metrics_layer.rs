//! Prometheus request metrics for services that opt in (currently the
//! matching service, whose swipe feed is the hottest endpoint in the app).

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

const REQUEST_DURATION: &str = "paws_http_request_duration_seconds";
const REQUESTS_TOTAL: &str = "paws_http_requests_total";

/// Latency buckets sized for short CRUD handlers; the 2.5s/5s tail exists
/// for the candidate feed, which fans out to the profile service.
const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Records a counter and latency histogram per route template. Uses the
/// matched path (`/matches/:id`) rather than the raw URI so label
/// cardinality stays bounded.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [("method", method), ("path", path), ("status", status)];

    counter!(REQUESTS_TOTAL, &labels).increment(1);
    histogram!(REQUEST_DURATION, &labels).record(duration);

    response
}

/// Installs the global Prometheus recorder. Call once at startup, before
/// the router is built; the returned handle renders the `/metrics` body.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), DURATION_BUCKETS)?
        .install_recorder()?;
    Ok(handle)
}

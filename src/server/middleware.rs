//! Request-logging middleware installed over every route the server builds.
//!
//! Each request gets its own span carrying the method, path and a generated
//! request id; status code and latency are recorded when the response is
//! produced.
use std::time::Duration;

use axum::{body::Body, extract::Request, response::Response};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer},
};
use tracing::Span;
use uuid::Uuid;

use crate::tracing_setup::create_request_span;

/// Opens a request-scoped span with a fresh request id.
#[derive(Debug, Clone)]
pub struct MakeRequestSpan;

impl MakeSpan<Body> for MakeRequestSpan {
    fn make_span(&mut self, request: &Request) -> Span {
        let request_id = Uuid::new_v4().to_string();
        create_request_span(request.method().as_str(), request.uri().path(), &request_id)
    }
}

/// Records status and latency into the request span on completion.
#[derive(Debug, Clone)]
pub struct RecordOnResponse;

impl OnResponse<Body> for RecordOnResponse {
    fn on_response(self, response: &Response, latency: Duration, span: &Span) {
        span.record("http.status_code", response.status().as_u16());
        span.record("duration_ms", latency.as_millis() as u64);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = latency.as_millis() as u64,
            "request completed"
        );
    }
}

/// The logging layer applied to the materialized route table.
pub(crate) fn request_trace_layer()
-> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeRequestSpan, DefaultOnRequest, RecordOnResponse>
{
    TraceLayer::new_for_http()
        .make_span_with(MakeRequestSpan)
        .on_response(RecordOnResponse)
}

//! Request correlation
//!
//! Every inbound request carries an identifier in `X-Request-ID`. When the
//! client does not send one, `tower_http::request_id::SetRequestIdLayer`
//! generates a UUID; when it sends one that could not travel as gRPC
//! metadata, the gateway replaces it (see [`RequestId::parse`]).
//!
//! The identifier reaches logs through a per-request `tracing` span built by
//! [`RequestSpan`]. Handlers, use cases and persistence adapters all run
//! inside that span, so their events carry `req_id=...` without looking the
//! identifier up themselves.
//!
//! Spans do not cross the network. [`RequestContext::outbound`] copies the
//! identifier into the metadata of an outgoing `tonic::Request`, and the
//! receiving service builds its own span from that header with the same
//! [`RequestSpan`] maker.
//!
//! ```text
//! gateway:  request{service="api-gateway" req_id=abc123 ...}: board created
//! service:  request{service="boards-service" req_id=abc123 ...}: CreateBoard called
//! ```

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, Request};
use std::convert::Infallible;
use std::fmt;
use tonic::metadata::{MetadataMap, MetadataValue};
use tower_http::trace::MakeSpan;
use tracing::Span;
use uuid::Uuid;

/// Header (and gRPC metadata key) carrying the correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied id that is accepted as-is.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation identifier for one request.
///
/// Always visible ASCII, so it is valid both as an HTTP header value and as
/// an ASCII gRPC metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh random id (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts a client-supplied id if it can be forwarded unchanged.
    ///
    /// Returns `None` for empty values, values longer than
    /// [`MAX_REQUEST_ID_LEN`], and values with whitespace or non-ASCII bytes.
    pub fn parse(raw: &str) -> Option<Self> {
        let usable = !raw.is_empty()
            && raw.len() <= MAX_REQUEST_ID_LEN
            && raw.bytes().all(|b| b.is_ascii_graphic());

        usable.then(|| Self(raw.to_string()))
    }

    /// Reads and validates the `x-request-id` header.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-request context handed to every gateway call.
///
/// Inserted into request extensions by the gateway middleware and extracted
/// by handlers. Remote-proxy backends use it to stamp outbound RPCs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
}

impl RequestContext {
    pub fn new(request_id: RequestId) -> Self {
        Self { request_id }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Copies the correlation id into outgoing gRPC metadata.
    pub fn inject(&self, metadata: &mut MetadataMap) {
        // Infallible for ids built through `RequestId`, which are visible ASCII.
        if let Ok(value) = MetadataValue::try_from(self.request_id.as_str()) {
            metadata.insert(REQUEST_ID_HEADER, value);
        }
    }

    /// Wraps `message` in a `tonic::Request` that carries the correlation id.
    pub fn outbound<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        self.inject(request.metadata_mut());
        request
    }
}

/// Reads the context stored by the gateway middleware. Outside that
/// middleware it is rebuilt from the `x-request-id` header, or a fresh id.
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }
        let request_id = RequestId::from_headers(&parts.headers).unwrap_or_default();
        Ok(RequestContext::new(request_id))
    }
}

/// `MakeSpan` shared by the HTTP gateway and the gRPC services.
///
/// gRPC metadata travels as HTTP/2 headers, so the same maker reads the
/// correlation id on both sides.
#[derive(Debug, Clone, Copy)]
pub struct RequestSpan {
    service: &'static str,
}

impl RequestSpan {
    pub fn new(service: &'static str) -> Self {
        Self { service }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let req_id = RequestId::from_headers(request.headers())
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        tracing::info_span!(
            "request",
            service = self.service,
            req_id = %req_id,
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

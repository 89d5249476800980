//! Request correlation middleware
//!
//! Runs after `SetRequestIdLayer` and before `TraceLayer`:
//!
//! 1. Keeps the incoming `x-request-id` if it can be forwarded as gRPC
//!    metadata, otherwise replaces it with a UUID v4 on the request itself,
//!    so the span built by `TraceLayer` shows the id that is forwarded.
//! 2. Stores a [`RequestContext`] in the request extensions.
//! 3. Echoes the id in the `X-Request-ID` response header.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use taskify_shared::correlation::{RequestContext, RequestId, REQUEST_ID_HEADER};

pub async fn request_context(mut req: Request, next: Next) -> Response {
    let request_id = match RequestId::from_headers(req.headers()) {
        Some(id) => id,
        None => {
            let id = RequestId::new();
            if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                req.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            id
        }
    };

    req.extensions_mut()
        .insert(RequestContext::new(request_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

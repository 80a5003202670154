//! Request-id correlation and structured access logging. Runs before every
//! other middleware in the stack so the request id is available to it.

use axum::body::Body;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

use ot_types::extract::RequestId;

pub async fn request_span(RequestId(request_id): RequestId, mut req: Request<Body>, next: Next) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	let span = tracing::info_span!("request", %request_id, %method, %path);
	let _guard = span.enter();

	if let Ok(value) = HeaderValue::from_str(&request_id) {
		req.headers_mut().insert("x-request-id", value.clone());
	}

	let start = Instant::now();
	let mut response = next.run(req).await;
	let elapsed_ms = start.elapsed().as_millis();

	tracing::info!(status = response.status().as_u16(), elapsed_ms, "request completed");

	if let Ok(value) = HeaderValue::from_str(&request_id) {
		response.headers_mut().insert("x-request-id", value);
	}
	response
}

// vim: ts=4

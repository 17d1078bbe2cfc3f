//! Response building module
//!
//! Every response leaving this service, success or error, carries the same
//! cross-origin header set and a JSON body, so browser callers never fail a
//! CORS check on a 4xx/5xx.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::ApiError;
use crate::logger;

/// Header name carrying the update shared secret
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Base cross-origin header set, attached to every response
const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type, X-API-Key"),
];

fn base_builder(status: StatusCode) -> hyper::http::response::Builder {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json; charset=utf-8");
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    builder
}

fn finish(
    builder: hyper::http::response::Builder,
    body: Bytes,
    context: &str,
) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build {context} response: {e}"));
        Response::new(Full::new(Bytes::from(r#"{"error":"Internal server error"}"#)))
    })
}

/// Build JSON response with the base header set
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    json_response_with_headers(status, body, &[])
}

/// Build JSON response with the base header set plus caller-supplied headers
pub fn json_response_with_headers<T: Serialize>(
    status: StatusCode,
    body: &T,
    extra_headers: &[(&str, &str)],
) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return finish(
                base_builder(StatusCode::INTERNAL_SERVER_ERROR),
                Bytes::from(r#"{"error":"Internal server error"}"#),
                "fallback",
            );
        }
    };

    let mut builder = base_builder(status);
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    finish(builder, Bytes::from(json), status.as_str())
}

/// Build the preflight short-circuit response: 200, empty body, CORS set
pub fn preflight_response() -> Response<Full<Bytes>> {
    finish(base_builder(StatusCode::OK), Bytes::new(), "OPTIONS")
}

/// 404 for unmatched routes
pub fn not_found() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &serde_json::json!({"error": "Not found"}),
    )
}

/// Translate an `ApiError` into its JSON error response
pub fn error_response(error: &ApiError) -> Response<Full<Bytes>> {
    json_response(
        error.status(),
        &serde_json::json!({"error": error.to_string()}),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_cors_headers(response: &Response<Full<Bytes>>) {
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET, POST, OPTIONS");
        assert_eq!(
            headers["Access-Control-Allow-Headers"],
            "Content-Type, X-API-Key"
        );
        assert_eq!(headers["Content-Type"], "application/json; charset=utf-8");
    }

    #[test]
    fn test_json_response_has_cors_set() {
        let response = json_response(StatusCode::OK, &serde_json::json!({"success": true}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
    }

    #[test]
    fn test_error_response_keeps_cors_set() {
        let response = error_response(&ApiError::Unauthorized);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_cors_headers(&response);
    }

    #[test]
    fn test_extra_headers_are_appended() {
        let response = json_response_with_headers(
            StatusCode::OK,
            &serde_json::json!({}),
            &[("Cache-Control", "public, max-age=3600")],
        );
        assert_eq!(response.headers()["Cache-Control"], "public, max-age=3600");
        assert_cors_headers(&response);
    }

    #[test]
    fn test_preflight_is_empty_200() {
        let response = preflight_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(&response);
    }
}

// API module entry
// Routes incoming requests to the read, update, and health handlers

mod handlers;
pub mod response;
pub mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::error::ApiError;
use crate::logger;
use response::{error_response, not_found, preflight_response, API_KEY_HEADER};

/// Main entry point for request handling
///
/// Dispatches on (method, path); `OPTIONS` is answered before routing so
/// preflights succeed even for paths that do not exist. Generic over the
/// body type so tests can drive it without a live connection.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if method == Method::OPTIONS {
        preflight_response()
    } else {
        match (&method, path.as_str()) {
            (&Method::GET, "/") => handlers::root_summary(),
            (&Method::GET, "/api/prices") => handlers::read_prices(&state).await,
            (&Method::POST, "/api/update") => handle_update(req, &state).await,
            (&Method::GET, "/api/health") => handlers::health(&state).await,
            _ => not_found(),
        }
    };

    if state.config.logging.access_log {
        logger::log_request(method.as_str(), &path, response.status().as_u16());
    }

    Ok(response)
}

/// Extract the key header and body, then run the update handler.
///
/// Authentication comes first; a bad key short-circuits before the body
/// size check or any body read.
async fn handle_update<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: hyper::body::Body,
    B::Error: std::fmt::Display,
{
    let api_key = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    if !state.authenticator.verify(api_key.as_deref()) {
        return error_response(&ApiError::Unauthorized);
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return error_response(&ApiError::Validation(
                "Failed to read request body".to_string(),
            ));
        }
    };

    handlers::update_prices(state, api_key.as_deref(), &body).await
}

/// Validate Content-Length against the configured limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size = content_length.to_str().ok()?.parse::<u64>().ok()?;
    if size > max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {size} bytes (max: {max_body_size})"
        ));
        return Some(error_response(&ApiError::Validation(
            "Request body too large".to_string(),
        )));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        Config, HttpConfig, LoggingConfig, PerformanceConfig, RecordPolicy, ServerConfig,
        StorageBackend, StorageConfig, UpdateConfig,
    };
    use crate::store::MemoryStore;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: false,
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive_timeout: 75,
                read_timeout: 30,
                write_timeout: 30,
                max_connections: None,
            },
            http: HttpConfig { max_body_size: 64 },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                base_url: String::new(),
                auth_token: None,
                timeout: 30,
            },
            update: UpdateConfig {
                api_key: "secret".to_string(),
                record_policy: RecordPolicy::Passthrough,
                default_currency: "TRY".to_string(),
            },
        };
        Arc::new(AppState::with_store(
            config,
            Arc::new(MemoryStore::new()),
        ))
    }

    fn request(method: Method, path: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(Bytes::from(body)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_options_short_circuits_any_path() {
        let state = test_state();
        for path in ["/", "/api/prices", "/api/update", "/no/such/route"] {
            let response = handle_request(request(Method::OPTIONS, path, ""), Arc::clone(&state))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            assert!(bytes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/", ""), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["endpoints"]["prices"], "GET /api/prices");
    }

    #[tokio::test]
    async fn test_unmatched_route_is_404() {
        let state = test_state();
        for (method, path) in [
            (Method::GET, "/api/unknown"),
            (Method::POST, "/api/prices"),
            (Method::GET, "/api/update"),
            (Method::DELETE, "/api/update"),
        ] {
            let response = handle_request(request(method, path, ""), Arc::clone(&state))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"], "Not found");
        }
    }

    #[tokio::test]
    async fn test_update_routed_with_header() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/update")
            .header("X-API-Key", "secret")
            .body(Full::new(Bytes::from(r#"[{"company":"Acme"}]"#)))
            .unwrap();
        let response = handle_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = handle_request(request(Method::GET, "/api/prices", ""), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_key_wins_over_oversized_body() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/update")
            .header("X-API-Key", "wrong")
            .header("content-length", "1000")
            .body(Full::new(Bytes::from("[]")))
            .unwrap();
        let response = handle_request(req, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid API key");
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_before_read() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/update")
            .header("X-API-Key", "secret")
            .header("content-length", "1000")
            .body(Full::new(Bytes::from("[]")))
            .unwrap();
        let response = handle_request(req, state).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_routed() {
        let state = test_state();
        let response = handle_request(request(Method::GET, "/api/health", ""), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["dataCount"], 0);
    }
}

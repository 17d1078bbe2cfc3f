//! Endpoint handlers module
//!
//! Read, update, and health handlers over the snapshot store. Handlers take
//! pre-extracted inputs (key header, collected body) so they can be driven
//! directly by tests with a fake store.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::Value;

use super::response::{error_response, json_response, json_response_with_headers};
use super::types::{HealthResponse, PriceRecord, PricesResponse, UpdateResponse};
use crate::config::{AppState, RecordPolicy};
use crate::error::ApiError;
use crate::logger;
use crate::store::{StoreError, SNAPSHOT_KEY, TIMESTAMP_KEY};

/// Successful reads may be cached downstream; the snapshot changes every
/// few days, so an hour of staleness is acceptable.
const READ_CACHE_CONTROL: &str = "public, max-age=3600";

/// Current instant, ISO-8601 with millisecond precision
fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `GET /`: endpoint summary
pub fn root_summary() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "status": "ok",
            "message": "EV charging price API",
            "endpoints": {
                "prices": "GET /api/prices",
                "update": "POST /api/update",
                "health": "GET /api/health"
            }
        }),
    )
}

/// `GET /api/prices`: serve the current snapshot
pub async fn read_prices(state: &AppState) -> Response<Full<Bytes>> {
    match try_read_prices(state).await {
        Ok(response) => response,
        Err(e) => {
            if matches!(e, ApiError::Storage(_)) {
                logger::log_error(&format!("Read failed: {e}"));
            }
            error_response(&e)
        }
    }
}

async fn try_read_prices(state: &AppState) -> Result<Response<Full<Bytes>>, ApiError> {
    let Some(raw) = state.store.get(SNAPSHOT_KEY).await? else {
        return Err(ApiError::NotFound("No price data available yet".to_string()));
    };

    let data: Value = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Corrupt(format!("snapshot is not valid JSON: {e}")))?;
    let count = data
        .as_array()
        .ok_or_else(|| StoreError::Corrupt("snapshot is not an array".to_string()))?
        .len();

    // Best-effort: a missing or unreadable timestamp does not fail the read
    let last_updated = state.store.get(TIMESTAMP_KEY).await.ok().flatten();

    Ok(json_response_with_headers(
        StatusCode::OK,
        &PricesResponse {
            success: true,
            data,
            count,
            last_updated,
            timestamp: now_iso(),
        },
        &[("Cache-Control", READ_CACHE_CONTROL)],
    ))
}

/// `POST /api/update`: replace the snapshot wholesale
pub async fn update_prices(
    state: &AppState,
    api_key: Option<&str>,
    body: &[u8],
) -> Response<Full<Bytes>> {
    match try_update_prices(state, api_key, body).await {
        Ok(response) => response,
        Err(e) => {
            if matches!(e, ApiError::Storage(_)) {
                logger::log_error(&format!("Update failed: {e}"));
            }
            error_response(&e)
        }
    }
}

async fn try_update_prices(
    state: &AppState,
    api_key: Option<&str>,
    body: &[u8],
) -> Result<Response<Full<Bytes>>, ApiError> {
    if !state.authenticator.verify(api_key) {
        return Err(ApiError::Unauthorized);
    }

    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid JSON: {e}")))?;

    let Value::Array(records) = parsed else {
        return Err(ApiError::Validation("Data must be an array".to_string()));
    };

    let accepted = apply_record_policy(records, &state.config.update)?;
    let count = accepted.len();

    let serialized = serde_json::to_string(&accepted)
        .map_err(|e| ApiError::Validation(format!("Unserializable data: {e}")))?;

    // Two independent writes; the store has no multi-key transaction, so a
    // fault between them can leave a new snapshot with the old timestamp.
    state.store.put(SNAPSHOT_KEY, &serialized).await?;
    let timestamp = now_iso();
    state.store.put(TIMESTAMP_KEY, &timestamp).await?;

    Ok(json_response(
        StatusCode::OK,
        &UpdateResponse {
            success: true,
            message: format!("{count} records saved"),
            timestamp,
        },
    ))
}

/// Apply the configured record policy to an incoming batch
fn apply_record_policy(
    records: Vec<Value>,
    update: &crate::config::UpdateConfig,
) -> Result<Vec<Value>, ApiError> {
    match update.record_policy {
        RecordPolicy::Passthrough => Ok(records),
        RecordPolicy::Filter => {
            let total = records.len();
            let kept: Vec<Value> = records
                .into_iter()
                .filter_map(|value| {
                    let mut record: PriceRecord = serde_json::from_value(value).ok()?;
                    record.validate().ok()?;
                    record.apply_default_currency(&update.default_currency);
                    serde_json::to_value(record).ok()
                })
                .collect();
            if kept.len() < total {
                logger::log_warning(&format!(
                    "Filtered {} invalid records out of {total}",
                    total - kept.len()
                ));
            }
            Ok(kept)
        }
        RecordPolicy::Strict => records
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let mut record: PriceRecord = serde_json::from_value(value).map_err(|e| {
                    ApiError::Validation(format!("Invalid record at index {index}: {e}"))
                })?;
                record.validate().map_err(|e| {
                    ApiError::Validation(format!("Invalid record at index {index}: {e}"))
                })?;
                record.apply_default_currency(&update.default_currency);
                serde_json::to_value(record)
                    .map_err(|e| ApiError::Validation(format!("Unserializable data: {e}")))
            })
            .collect(),
    }
}

/// `GET /api/health`: liveness probe, not a freshness probe
pub async fn health(state: &AppState) -> Response<Full<Bytes>> {
    match try_health(state).await {
        Ok(response) => response,
        Err(e) => {
            logger::log_error(&format!("Health check failed: {e}"));
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({"status": "error", "error": e.to_string()}),
            )
        }
    }
}

async fn try_health(state: &AppState) -> Result<Response<Full<Bytes>>, StoreError> {
    let snapshot = state.store.get(SNAPSHOT_KEY).await?;
    let last_updated = state.store.get(TIMESTAMP_KEY).await?;

    // A missing snapshot is still healthy; the probe reports presence only
    let data_count = snapshot
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .and_then(|value| value.as_array().map(Vec::len))
        .unwrap_or(0);

    Ok(json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "healthy",
            data_count,
            last_updated,
            timestamp: now_iso(),
        },
    ))
}

// API data types module
// Wire shapes for price records and endpoint payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One charging-network price entry.
///
/// Only used when a record policy other than `passthrough` is active;
/// unknown fields (logo URLs, country codes, whatever the pipeline adds)
/// are carried through untouched via the flattened map.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ac_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dc_currency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PriceRecord {
    /// Check the fields this layer cares about; everything else passes.
    pub fn validate(&self) -> Result<(), String> {
        if self.company.trim().is_empty() {
            return Err("company must be non-empty".to_string());
        }
        if self.ac_price.is_some_and(|p| p < 0.0) {
            return Err("acPrice must be non-negative".to_string());
        }
        if self.dc_price.is_some_and(|p| p < 0.0) {
            return Err("dcPrice must be non-negative".to_string());
        }
        Ok(())
    }

    /// Fill missing currency codes from the deployment default.
    pub fn apply_default_currency(&mut self, currency: &str) {
        if self.ac_price.is_some() && self.ac_currency.is_none() {
            self.ac_currency = Some(currency.to_string());
        }
        if self.dc_price.is_some() && self.dc_currency.is_none() {
            self.dc_currency = Some(currency.to_string());
        }
    }
}

/// Successful `GET /api/prices` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricesResponse {
    pub success: bool,
    pub data: Value,
    pub count: usize,
    pub last_updated: Option<String>,
    pub timestamp: String,
}

/// Successful `POST /api/update` payload
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

/// `GET /api/health` payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub data_count: usize,
    pub last_updated: Option<String>,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_camel_case_and_keeps_extras() {
        let record: PriceRecord = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "websiteUrl": "https://acme.example",
            "acPrice": 8.5,
            "dcPrice": 12.0,
            "acCurrency": "TRY",
            "dcCurrency": "TRY",
            "logoUrl": "https://acme.example/logo.png"
        }))
        .unwrap();

        assert_eq!(record.company, "Acme");
        assert_eq!(record.ac_price, Some(8.5));
        assert!(record.extra.contains_key("logoUrl"));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_company() {
        let record: PriceRecord =
            serde_json::from_value(serde_json::json!({"company": "  "})).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let record: PriceRecord =
            serde_json::from_value(serde_json::json!({"company": "Acme", "dcPrice": -1.0}))
                .unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_default_currency_only_fills_present_tariffs() {
        let mut record: PriceRecord =
            serde_json::from_value(serde_json::json!({"company": "Acme", "acPrice": 8.5}))
                .unwrap();
        record.apply_default_currency("TRY");
        assert_eq!(record.ac_currency.as_deref(), Some("TRY"));
        assert!(record.dc_currency.is_none());
    }
}

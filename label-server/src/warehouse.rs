//! Upstream warehouse API client
//!
//! Fetches return orders from the warehouse management API and flattens
//! them into the display-keyed lines the label pipeline consumes: one line
//! per order line item, keyed by the labels the search UI shows.

use std::time::Duration;

use label_engine::DisplayRecord;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::core::Config;

/// Statuses worth retrying: upstream gateway hiccups, not client errors.
const RETRYABLE: [u16; 3] = [502, 503, 504];
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_millis(250);
const SEARCH_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream error {status}: {details}")]
    Status { status: u16, details: String },

    #[error("invalid order number: {0}")]
    BadOrderNo(String),
}

/// Client for the warehouse return-order API.
#[derive(Debug, Clone)]
pub struct WarehouseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WarehouseClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.upstream_timeout_ms))
            .build()
            .unwrap_or_default();
        if config.api_key.is_empty() {
            warn!("no API_KEY set; upstream search will be rejected");
        }
        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch return orders matching `original_order_no` and flatten them
    /// to display-keyed label lines.
    #[instrument(skip(self))]
    pub async fn search_return_orders(
        &self,
        original_order_no: &str,
    ) -> Result<Vec<DisplayRecord>, WarehouseError> {
        let order_no = parse_order_no(original_order_no)?;
        let raw = self.fetch_return_orders(order_no).await?;
        let lines = shape_to_label_lines(&raw);
        info!(orders = raw.len(), lines = lines.len(), "flattened return orders");
        Ok(lines)
    }

    /// Raw order search with bounded retry on gateway errors.
    async fn fetch_return_orders(&self, order_no: i64) -> Result<Vec<Value>, WarehouseError> {
        let url = format!("{}/returnOrder/search", self.base_url);
        let filter = format!("originalOrderNo eq {}", order_no);
        let limit = SEARCH_LIMIT.to_string();

        let mut attempt = 1;
        loop {
            let res = self
                .http
                .get(&url)
                .header("Accept", "application/json")
                .header("API-Key", &self.api_key)
                .query(&[("filter", filter.as_str()), ("limit", limit.as_str())])
                .send()
                .await?;

            let status = res.status();
            if status.is_success() {
                let body: Value = res.json().await?;
                return Ok(match body {
                    Value::Array(orders) => orders,
                    _ => Vec::new(),
                });
            }

            if RETRYABLE.contains(&status.as_u16()) && attempt < MAX_ATTEMPTS {
                let delay = BACKOFF_BASE * 2u32.pow(attempt - 1);
                warn!(status = status.as_u16(), attempt, delay_ms = delay.as_millis() as u64, "retrying upstream search");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let details = res.text().await.unwrap_or_default();
            return Err(WarehouseError::Status { status: status.as_u16(), details });
        }
    }
}

/// Accepts an integer-valued order number in string or numeric spelling.
fn parse_order_no(raw: &str) -> Result<i64, WarehouseError> {
    let raw = raw.trim();
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .ok_or_else(|| WarehouseError::BadOrderNo(raw.to_string()))
}

/// Flatten raw order objects into one display-keyed line per line item.
///
/// Output keys are the exact display labels the label pipeline normalizes
/// from, plus a private `_meta` object carrying the lob id for logo
/// selection. A numeric order number truncates to an integer so the label
/// never shows a float.
pub fn shape_to_label_lines(raw_orders: &[Value]) -> Vec<DisplayRecord> {
    let mut lines = Vec::new();
    for order in raw_orders {
        let orig_no = match order.get("originalOrderNo") {
            Some(Value::Number(n)) => n
                .as_f64()
                .map(|f| Value::from(f.trunc() as i64))
                .unwrap_or(Value::Null),
            Some(v) => v.clone(),
            None => Value::Null,
        };

        let items = order
            .get("returnOrderLineItemList")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for li in items {
            let mut line = Map::new();
            line.insert("_meta".into(), json!({ "_lobId": order.get("lobId").cloned() }));
            line.insert("Date".into(), field(order, "createDate"));
            line.insert("Order #".into(), orig_no.clone());
            line.insert("ASN #".into(), field(order, "returnAsnId"));
            line.insert("Return Status".into(), field(order, "returnOrderStatus"));
            line.insert("Reason".into(), field(order, "returnReason"));
            line.insert("Category".into(), field(order, "returnCategory"));
            line.insert("Instructions".into(), field(order, "returnInstructions"));
            line.insert("Rcpt Id".into(), field(li, "returnItemReceiptId"));
            line.insert("SKU".into(), field(li, "sku"));
            line.insert("Shipped".into(), field(li, "originalShippedQuantity"));
            line.insert("Expected".into(), field(li, "expectedReturnQuantity"));
            line.insert("Actual".into(), field(li, "actualReturnQuantity"));
            line.insert("Condition".into(), field(li, "returnOrderLineInspectionStatus"));
            line.insert(
                "IVC Status".into(),
                li.get("customFields")
                    .and_then(|cf| cf.get("ivcStatus"))
                    .cloned()
                    .unwrap_or(Value::Null),
            );
            lines.push(DisplayRecord::new(line));
        }
    }
    lines
}

fn field(obj: &Value, key: &str) -> Value {
    obj.get(key).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_engine::normalize;

    fn raw_order() -> Value {
        json!({
            "lobId": 19816,
            "createDate": "2024-03-05T10:15:00Z",
            "originalOrderNo": 5512.0,
            "returnAsnId": "ASN-31",
            "returnOrderStatus": "Processed",
            "returnReason": "Damaged",
            "returnCategory": "Mirror",
            "returnInstructions": "Inspect",
            "returnOrderLineItemList": [
                {
                    "returnItemReceiptId": "R-1",
                    "sku": "IVM-100",
                    "originalShippedQuantity": 2,
                    "expectedReturnQuantity": 2,
                    "actualReturnQuantity": 1,
                    "returnOrderLineInspectionStatus": "Sellable",
                    "customFields": { "ivcStatus": "PASS" }
                },
                {
                    "returnItemReceiptId": "R-2",
                    "sku": "IVM-200",
                    "actualReturnQuantity": 3
                }
            ]
        })
    }

    #[test]
    fn test_flatten_one_line_per_line_item() {
        let lines = shape_to_label_lines(&[raw_order()]);
        assert_eq!(lines.len(), 2);

        let first = normalize(&lines[0]);
        assert_eq!(first.sku, "IVM-100");
        assert_eq!(first.original_order_no, "5512");
        assert_eq!(first.ivc_status, "PASS");
        assert_eq!(first.lob_id, Some(19816));

        // Second line item has no custom fields; IVC normalizes empty.
        let second = normalize(&lines[1]);
        assert_eq!(second.sku, "IVM-200");
        assert_eq!(second.ivc_status, "");
        assert_eq!(second.original_order_no, "5512");
    }

    #[test]
    fn test_flatten_skips_orders_without_line_items() {
        let lines = shape_to_label_lines(&[json!({ "originalOrderNo": 1 })]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_numeric_order_no_truncates() {
        let mut order = raw_order();
        order["originalOrderNo"] = json!(5512.9);
        let lines = shape_to_label_lines(&[order]);
        assert_eq!(normalize(&lines[0]).original_order_no, "5512");
    }

    #[test]
    fn test_parse_order_no() {
        assert_eq!(parse_order_no("5512").unwrap(), 5512);
        assert_eq!(parse_order_no(" 5512.0 ").unwrap(), 5512);
        assert!(parse_order_no("abc").is_err());
        assert!(parse_order_no("").is_err());
    }
}

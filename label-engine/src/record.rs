//! Label record types and field normalization
//!
//! The upstream search endpoint flattens return orders into one line per
//! line item, keyed by human-readable display labels ("Order #", "SKU", ...).
//! [`normalize`] maps such a record onto the canonical internal field names
//! the layout engine works with.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flattened order/line-item projection keyed by display labels.
///
/// Values may be JSON strings, numbers, or null. A private `_meta` object
/// carries the line-of-business id used for logo selection; it is not a
/// display field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayRecord(serde_json::Map<String, Value>);

impl DisplayRecord {
    pub fn new(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }

    /// First non-null value among `keys`, rendered as display text.
    ///
    /// The canonical spelling comes first in each chain; legacy spellings
    /// follow. Null and missing both fall through, so a record carrying
    /// `"Receipt Id": null, "Rcpt Id": "R1"` still resolves to `R1`.
    fn text(&self, keys: &[&str]) -> String {
        for key in keys {
            match self.0.get(*key) {
                None | Some(Value::Null) => continue,
                Some(v) => return value_text(v),
            }
        }
        String::new()
    }

    /// Line-of-business id from the `_meta._lobId` side channel.
    pub fn lob_id(&self) -> Option<i64> {
        let meta = self.0.get("_meta")?;
        match meta.get("_lobId")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// SKU display value, if present and non-empty.
    ///
    /// Callers use this to reject a record before any layout work starts.
    pub fn sku(&self) -> Option<String> {
        let sku = self.text(&["SKU"]);
        if sku.trim().is_empty() { None } else { Some(sku) }
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// The canonical label record: same facts as a [`DisplayRecord`], under
/// fixed internal field names. Every field is always present; absent
/// display values normalize to empty strings, never to an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalLabelRecord {
    pub create_date: String,
    pub original_order_no: String,
    pub return_asn_id: String,
    pub return_order_status: String,
    pub return_reason: String,
    pub return_category: String,
    pub instructions: String,
    pub return_item_receipt_id: String,
    pub sku: String,
    pub original_shipped_quantity: String,
    pub expected_return_quantity: String,
    pub actual_return_quantity: String,
    pub return_order_line_inspection_status: String,
    pub ivc_status: String,
    pub lob_id: Option<i64>,
}

impl CanonicalLabelRecord {
    /// Identifier used in error context: order number, falling back to SKU.
    pub fn identifier(&self) -> String {
        if !self.original_order_no.is_empty() {
            self.original_order_no.clone()
        } else {
            self.sku.clone()
        }
    }
}

/// Map a display-keyed record onto canonical field names.
///
/// Total function: every field read uses a fallback chain (canonical key,
/// then documented legacy key, then empty). The input is never mutated.
pub fn normalize(record: &DisplayRecord) -> CanonicalLabelRecord {
    CanonicalLabelRecord {
        create_date: record.text(&["Date"]),
        original_order_no: record.text(&["Order #"]),
        return_asn_id: record.text(&["ASN #"]),
        return_order_status: record.text(&["Return Status"]),
        return_reason: record.text(&["Reason"]),
        return_category: record.text(&["Category"]),
        instructions: record.text(&["Instructions"]),
        return_item_receipt_id: record.text(&["Receipt Id", "Rcpt Id"]),
        sku: record.text(&["SKU"]),
        original_shipped_quantity: record.text(&["Shipped", "Shipped Qty"]),
        expected_return_quantity: record.text(&["Expected", "Expected Qty"]),
        actual_return_quantity: record.text(&["Actual", "Actual Qty"]),
        return_order_line_inspection_status: record.text(&["Condition"]),
        ivc_status: record.text(&["IVC Status"]),
        lob_id: record.lob_id(),
    }
}

/// Format a date source as MM/DD/YYYY.
///
/// Empty input renders as an empty string; unparseable non-empty input
/// passes through verbatim rather than producing a placeholder token.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%m/%d/%Y").to_string();
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%m/%d/%Y").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%m/%d/%Y").to_string();
    }
    raw.to_string()
}

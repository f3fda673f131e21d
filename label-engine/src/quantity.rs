//! Physical label count resolution
//!
//! One return line can require several physical labels (one per returned
//! unit). The count comes from an explicit caller override or from the
//! record's actual returned quantity, and is never allowed to reach zero:
//! a malformed quantity must not silently drop a label.

use crate::record::CanonicalLabelRecord;

/// A canonical record paired with its resolved repeat count.
#[derive(Debug, Clone)]
pub struct LabelJob {
    pub record: CanonicalLabelRecord,
    pub count: u32,
}

impl LabelJob {
    pub fn new(record: CanonicalLabelRecord, explicit_count: Option<f64>) -> Self {
        let count = resolve_count(&record, explicit_count);
        Self { record, count }
    }
}

/// Resolve the number of physical labels to emit for a record.
///
/// Takes `explicit` when it is a positive finite number, otherwise parses
/// `actual_return_quantity`, otherwise defaults to 1. The result is floored
/// and clamped to at least 1.
pub fn resolve_count(record: &CanonicalLabelRecord, explicit: Option<f64>) -> u32 {
    let chosen = explicit
        .filter(|c| c.is_finite() && *c > 0.0)
        .or_else(|| parse_quantity(&record.actual_return_quantity));

    match chosen {
        // Clamp in f64 space before narrowing: a cast through i64 would
        // wrap counts past u32::MAX back to zero.
        Some(v) => v.floor().clamp(1.0, u32::MAX as f64) as u32,
        None => 1,
    }
}

fn parse_quantity(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

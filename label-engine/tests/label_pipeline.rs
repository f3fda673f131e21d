//! End-to-end pipeline tests: display record in, both label targets out.

use label_engine::{
    AssetStore, Assembler, CanonicalLabelRecord, DisplayRecord, Element, LayoutEngine, normalize,
    resolve_count,
};
use serde_json::json;

fn display_record() -> DisplayRecord {
    serde_json::from_value(json!({
        "Date": "2024-03-05T10:15:00Z",
        "Order #": 5512,
        "ASN #": "ASN-31",
        "Return Status": "Processed",
        "Reason": "Arrived damaged",
        "Category": "Mirror",
        "Instructions": "Inspect before restock",
        "Receipt Id": "R-9",
        "SKU": "IVM-4820",
        "Shipped": 2,
        "Expected": 2,
        "Actual": "2",
        "Condition": "Damaged",
        "IVC Status": "FAIL",
        "_meta": { "_lobId": 19816 }
    }))
    .unwrap()
}

fn assembler() -> Assembler {
    Assembler::standard(AssetStore::new("/nonexistent/assets"))
}

#[test]
fn test_display_record_to_pdf() {
    let record = normalize(&display_record());
    let artifact = assembler().build_single(&record, None).unwrap();

    assert!(artifact.bytes.starts_with(b"%PDF"));
    assert_eq!(artifact.labels, 2);
    assert_eq!(artifact.filename, "return-label-5512-IVM-4820.pdf");
}

#[test]
fn test_display_record_to_command_text() {
    let record = normalize(&display_record());
    let artifact = assembler().build_command_text(&record, None).unwrap();

    assert_eq!(artifact.labels, 2);
    assert_eq!(artifact.text.matches("^XA").count(), 2);
    assert!(artifact.text.contains("^FDIVM-4820^FS"));
    assert!(artifact.text.contains("FAIL"));
}

#[test]
fn test_both_targets_share_one_plan() {
    let record = normalize(&display_record());
    let plan = LayoutEngine::standard().plan(&record).unwrap();

    // The barcode both targets emit carries the same content, from the
    // same plan element.
    let barcode_data = plan
        .elements
        .iter()
        .find_map(|e| match e {
            Element::Barcode { data, .. } => Some(data.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(barcode_data, "IVM-4820");

    let zpl = assembler().build_command_text(&record, Some(1.0)).unwrap();
    assert!(zpl.text.contains(&format!("^FD{}^FS", barcode_data)));
}

#[test]
fn test_count_resolution_feeds_expansion() {
    let record = normalize(&display_record());
    assert_eq!(resolve_count(&record, None), 2);
    assert_eq!(resolve_count(&record, Some(5.0)), 5);

    let artifact = assembler().build_command_text(&record, Some(5.0)).unwrap();
    assert_eq!(artifact.labels, 5);
}

#[test]
fn test_batch_of_mixed_records() {
    let mut second = normalize(&display_record());
    second.sku = "IVM-9000".to_string();
    second.actual_return_quantity = "1".to_string();
    let first = normalize(&display_record());

    let artifact = assembler().build_batch(&[first, second]).unwrap();
    assert_eq!(artifact.labels, 3);
    assert_eq!(artifact.filename, "return-labels-batch.pdf");
}

#[test]
fn test_record_without_sku_is_rejected_everywhere() {
    let record = CanonicalLabelRecord::default();
    assert!(assembler().build_single(&record, None).is_err());
    assert!(assembler().build_command_text(&record, None).is_err());
    assert!(assembler().build_batch(&[record]).is_err());
}

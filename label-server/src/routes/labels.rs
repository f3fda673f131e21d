//! Label build, preview, and print routes
//!
//! Every route takes display-keyed items (the shape the search route
//! returns), normalizes them, and hands them to the assembler. Routes fail
//! fast with 400 before any rendering when an item has no SKU.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use label_engine::{CanonicalLabelRecord, DisplayRecord, NetworkPrinter, Printer, normalize};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::AppState;
use crate::spool;
use crate::utils::{AppError, AppResponse, ok};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/zpl", post(zpl))
        .route("/zpl-all", post(zpl_all))
        .route("/preview-pdf", post(preview_pdf))
        .route("/preview-pdf-all", post(preview_pdf_all))
        .route("/print-zpl", post(print_zpl))
        .route("/print-all", post(print_all))
        .route("/print-pdf-os", post(print_pdf_os))
        .route("/printers", get(printers))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleLabelRequest {
    item: Option<DisplayRecord>,
    count: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchLabelRequest {
    items: Option<Vec<DisplayRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSingleRequest {
    item: Option<DisplayRecord>,
    count: Option<f64>,
    zebra_host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintBatchRequest {
    items: Option<Vec<DisplayRecord>>,
    zebra_host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPrintRequest {
    item: Option<DisplayRecord>,
    count: Option<f64>,
    printer_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrintOutcome {
    pub sent: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoolOutcome {
    pub printer: String,
    pub labels: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterList {
    pub default_printer: Option<String>,
    pub printers: Vec<String>,
}

/// Reject an absent item or an item without a SKU before any layout work.
fn require_item(item: Option<DisplayRecord>) -> Result<CanonicalLabelRecord, AppError> {
    let item = item
        .filter(|i| i.sku().is_some())
        .ok_or_else(|| AppError::Validation("Body must include item with SKU".to_string()))?;
    Ok(normalize(&item))
}

fn require_items(items: Option<Vec<DisplayRecord>>) -> Result<Vec<CanonicalLabelRecord>, AppError> {
    let items = items
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::Validation("items[] required".to_string()))?;
    Ok(items.iter().map(normalize).collect())
}

fn require_host(host: Option<String>) -> Result<String, AppError> {
    host.map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::Validation("Missing zebraHost".to_string()))
}

fn pdf_response(artifact: label_engine::PdfArtifact) -> Response {
    let disposition = format!("inline; filename=\"{}\"", artifact.filename);
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("inline")),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// POST /api/labels/zpl - command text for one item, `count` copies
#[instrument(skip_all)]
pub async fn zpl(
    State(state): State<AppState>,
    Json(req): Json<SingleLabelRequest>,
) -> Result<Response, AppError> {
    let record = require_item(req.item)?;
    let artifact = state.assembler.build_command_text(&record, req.count)?;
    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        artifact.text,
    )
        .into_response())
}

/// POST /api/labels/zpl-all - combined command text for every line
#[instrument(skip_all)]
pub async fn zpl_all(
    State(state): State<AppState>,
    Json(req): Json<BatchLabelRequest>,
) -> Result<Response, AppError> {
    let records = require_items(req.items)?;
    let artifact = state.assembler.build_command_text_batch(&records)?;

    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        artifact.text,
    )
        .into_response();
    if let Ok(count) = HeaderValue::from_str(&artifact.labels.to_string()) {
        response.headers_mut().insert("x-label-count", count);
    }
    Ok(response)
}

/// POST /api/labels/preview-pdf - streams one label PDF inline
#[instrument(skip_all)]
pub async fn preview_pdf(
    State(state): State<AppState>,
    Json(req): Json<SingleLabelRequest>,
) -> Result<Response, AppError> {
    let record = require_item(req.item)?;
    let artifact = state.assembler.build_single(&record, req.count)?;
    Ok(pdf_response(artifact))
}

/// POST /api/labels/preview-pdf-all - one multi-page PDF for all lines
#[instrument(skip_all)]
pub async fn preview_pdf_all(
    State(state): State<AppState>,
    Json(req): Json<BatchLabelRequest>,
) -> Result<Response, AppError> {
    let records = require_items(req.items)?;
    let artifact = state.assembler.build_batch(&records)?;
    Ok(pdf_response(artifact))
}

/// POST /api/labels/print-zpl - raw TCP dispatch of one item's labels
#[instrument(skip_all)]
pub async fn print_zpl(
    State(state): State<AppState>,
    Json(req): Json<PrintSingleRequest>,
) -> Result<Json<AppResponse<PrintOutcome>>, AppError> {
    let record = require_item(req.item)?;
    let host = require_host(req.zebra_host)?;
    let artifact = state.assembler.build_command_text(&record, req.count)?;

    let printer = NetworkPrinter::new(host, req.port);
    printer.print(artifact.text.as_bytes()).await?;
    Ok(ok(PrintOutcome { sent: artifact.labels }))
}

/// POST /api/labels/print-all - raw TCP dispatch of a whole batch
#[instrument(skip_all)]
pub async fn print_all(
    State(state): State<AppState>,
    Json(req): Json<PrintBatchRequest>,
) -> Result<Json<AppResponse<PrintOutcome>>, AppError> {
    let records = require_items(req.items)?;
    let host = require_host(req.zebra_host)?;
    let artifact = state.assembler.build_command_text_batch(&records)?;

    let printer = NetworkPrinter::new(host, req.port);
    printer.print(artifact.text.as_bytes()).await?;
    Ok(ok(PrintOutcome { sent: artifact.labels }))
}

/// POST /api/labels/print-pdf-os - build the PDF and hand it to the OS
/// spooler
#[instrument(skip_all)]
pub async fn print_pdf_os(
    State(state): State<AppState>,
    Json(req): Json<OsPrintRequest>,
) -> Result<Json<AppResponse<SpoolOutcome>>, AppError> {
    let record = require_item(req.item)?;
    let artifact = state.assembler.build_single(&record, req.count)?;
    let labels = artifact.labels;

    let path = state.storage.store(&artifact)?;
    let receipt = spool::print_pdf(&path, req.printer_name.as_deref()).await?;
    Ok(ok(SpoolOutcome { printer: receipt.printer, labels }))
}

/// GET /api/labels/printers - spooler printer list and default
#[instrument(skip_all)]
pub async fn printers() -> Json<AppResponse<PrinterList>> {
    ok(PrinterList {
        default_printer: spool::default_printer().await,
        printers: spool::list_printers().await,
    })
}

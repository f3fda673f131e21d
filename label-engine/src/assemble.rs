//! Batch assembly
//!
//! Expands label jobs into per-unit layout plans and hands them to a
//! renderer. The batch is the one primitive: a single-record build is a
//! batch of one. Expansion preserves input order, repeats each record by
//! its resolved count, and never deduplicates. A batch either renders
//! completely or fails with the offending record's identifier; no partial
//! artifacts escape.

use tracing::{info, instrument};

use crate::assets::AssetStore;
use crate::error::LabelResult;
use crate::layout::{LayoutEngine, LayoutPlan};
use crate::pdf::PdfRenderer;
use crate::quantity::LabelJob;
use crate::record::CanonicalLabelRecord;
use crate::zpl::ZplRenderer;

/// A rendered PDF and the name artifact storage files it under.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub labels: u32,
}

/// Rendered printer command text and the physical label count it produces.
#[derive(Debug, Clone)]
pub struct ZplArtifact {
    pub text: String,
    pub labels: u32,
}

/// Drives the layout engine and both renderers for single and batch builds.
pub struct Assembler {
    layout: LayoutEngine,
    pdf: PdfRenderer,
    zpl: ZplRenderer,
}

impl Assembler {
    pub fn new(layout: LayoutEngine, assets: AssetStore) -> Self {
        Self {
            layout,
            pdf: PdfRenderer::new(assets.clone()),
            zpl: ZplRenderer::new(assets),
        }
    }

    pub fn standard(assets: AssetStore) -> Self {
        Self::new(LayoutEngine::standard(), assets)
    }

    /// One plan per physical label, in job order.
    ///
    /// Fails on the first record that cannot be planned; nothing from the
    /// records before it leaks out.
    fn plans(&self, jobs: &[LabelJob]) -> LabelResult<Vec<LayoutPlan>> {
        let mut plans = Vec::with_capacity(jobs.iter().map(|j| j.count as usize).sum());
        for job in jobs {
            let plan = self.layout.plan(&job.record)?;
            for _ in 0..job.count {
                plans.push(plan.clone());
            }
        }
        Ok(plans)
    }

    /// Build a PDF for one record, repeated `count` times (resolved against
    /// the record's actual quantity when absent).
    #[instrument(skip_all, fields(record = %record.identifier()))]
    pub fn build_single(
        &self,
        record: &CanonicalLabelRecord,
        count: Option<f64>,
    ) -> LabelResult<PdfArtifact> {
        let filename = single_filename(record);
        let job = LabelJob::new(record.clone(), count);
        self.build_pdf(std::slice::from_ref(&job), filename)
    }

    /// Build one multi-page PDF covering every record in order.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn build_batch(&self, records: &[CanonicalLabelRecord]) -> LabelResult<PdfArtifact> {
        let jobs = batch_jobs(records);
        self.build_pdf(&jobs, "return-labels-batch.pdf".to_string())
    }

    fn build_pdf(&self, jobs: &[LabelJob], filename: String) -> LabelResult<PdfArtifact> {
        let plans = self.plans(jobs)?;
        let labels = plans.len() as u32;
        let bytes = self.pdf.render(&plans)?;
        info!(labels, filename = %filename, "assembled pdf artifact");
        Ok(PdfArtifact { bytes, filename, labels })
    }

    /// Build the printer command text for one record, repeated `count`
    /// times as consecutive label formats.
    #[instrument(skip_all, fields(record = %record.identifier()))]
    pub fn build_command_text(
        &self,
        record: &CanonicalLabelRecord,
        count: Option<f64>,
    ) -> LabelResult<ZplArtifact> {
        let job = LabelJob::new(record.clone(), count);
        self.build_zpl(std::slice::from_ref(&job))
    }

    /// Build concatenated command text covering every record in order.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn build_command_text_batch(
        &self,
        records: &[CanonicalLabelRecord],
    ) -> LabelResult<ZplArtifact> {
        let jobs = batch_jobs(records);
        self.build_zpl(&jobs)
    }

    fn build_zpl(&self, jobs: &[LabelJob]) -> LabelResult<ZplArtifact> {
        let plans = self.plans(jobs)?;
        let labels = plans.len() as u32;
        let mut text = String::new();
        for plan in &plans {
            text.push_str(&self.zpl.render(plan)?);
        }
        info!(labels, "assembled command text");
        Ok(ZplArtifact { text, labels })
    }
}

fn batch_jobs(records: &[CanonicalLabelRecord]) -> Vec<LabelJob> {
    records
        .iter()
        .map(|r| LabelJob::new(r.clone(), None))
        .collect()
}

fn single_filename(record: &CanonicalLabelRecord) -> String {
    format!(
        "return-label-{}-{}.pdf",
        safe_name_part(&record.original_order_no),
        safe_name_part(&record.sku)
    )
}

fn safe_name_part(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "unknown".to_string() } else { cleaned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelError;

    fn assembler() -> Assembler {
        Assembler::standard(AssetStore::new("/nonexistent/assets"))
    }

    fn record(sku: &str, actual: &str) -> CanonicalLabelRecord {
        CanonicalLabelRecord {
            sku: sku.to_string(),
            actual_return_quantity: actual.to_string(),
            original_order_no: "100".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_batch_expansion_preserves_order_and_counts() {
        let records = vec![record("A1", "2"), record("B2", "1"), record("A1", "3")];
        let artifact = assembler().build_command_text_batch(&records).unwrap();

        // [2, 1, 3] expands to 6 labels, duplicates intact.
        assert_eq!(artifact.labels, 6);
        assert_eq!(artifact.text.matches("^XA").count(), 6);

        // First A1 block precedes B2, B2 precedes the second A1 run.
        let first_b = artifact.text.find("^FDB2^FS").unwrap();
        let first_a = artifact.text.find("^FDA1^FS").unwrap();
        let last_a = artifact.text.rfind("^FDA1^FS").unwrap();
        assert!(first_a < first_b);
        assert!(first_b < last_a);
    }

    #[test]
    fn test_single_is_a_batch_of_one() {
        let artifact = assembler()
            .build_command_text(&record("A1", ""), Some(2.0))
            .unwrap();
        assert_eq!(artifact.labels, 2);
        assert_eq!(artifact.text.matches("^XA").count(), 2);
    }

    #[test]
    fn test_batch_fails_whole_on_bad_record() {
        let records = vec![record("A1", "1"), record("", "1")];
        match assembler().build_batch(&records) {
            Err(LabelError::Input { record_id, field }) => {
                assert_eq!(record_id, "100");
                assert_eq!(field, "sku");
            }
            other => panic!("expected Input error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_pdf_artifact_naming() {
        let artifact = assembler().build_single(&record("SKU/9", "1"), None).unwrap();
        assert_eq!(artifact.filename, "return-label-100-SKU_9.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.labels, 1);

        let artifact = assembler()
            .build_batch(&[record("A1", "1"), record("B2", "2")])
            .unwrap();
        assert_eq!(artifact.filename, "return-labels-batch.pdf");
        assert_eq!(artifact.labels, 3);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = assembler().build_command_text(&record("A1", "2"), None).unwrap();
        let b = assembler().build_command_text(&record("A1", "2"), None).unwrap();
        assert_eq!(a.text, b.text);
    }
}

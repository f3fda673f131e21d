//! OS print spooler binding
//!
//! Submits PDF files to the system spooler through the CUPS command line
//! tools (`lp` for submission, `lpstat` for discovery). Platforms without
//! these tools report an explicit spooler error rather than panicking.

use std::path::Path;

use label_engine::{LabelError, LabelResult};
use tracing::{info, instrument, warn};

/// Outcome of a spooler submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SpoolReceipt {
    pub printer: String,
}

/// List spooler printer names.
///
/// An unavailable spooler yields an empty list, matching discovery
/// semantics: no printers is a valid answer.
#[instrument]
pub async fn list_printers() -> Vec<String> {
    match run("lpstat", &["-e"]).await {
        Ok(out) => out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!(error = %e, "spooler unavailable, no printers listed");
            Vec::new()
        }
    }
}

/// Resolve the system default printer name, if one is configured.
#[instrument]
pub async fn default_printer() -> Option<String> {
    let out = run("lpstat", &["-d"]).await.ok()?;
    // "system default destination: NAME"; no colon means none configured
    let (_, name) = out.split_once(':')?;
    let name = name.trim();
    if name.is_empty() { None } else { Some(name.to_string()) }
}

/// Submit a PDF file to the spooler, on the named printer or the system
/// default.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn print_pdf(path: impl AsRef<Path>, printer: Option<&str>) -> LabelResult<SpoolReceipt> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LabelError::Spooler(format!(
            "artifact not found: {}",
            path.display()
        )));
    }
    let path_arg = path
        .to_str()
        .ok_or_else(|| LabelError::Spooler("artifact path is not valid UTF-8".to_string()))?;

    let mut args: Vec<&str> = Vec::new();
    if let Some(name) = printer {
        args.push("-d");
        args.push(name);
    }
    args.push(path_arg);

    run("lp", &args).await.map_err(LabelError::Spooler)?;

    let printer = match printer {
        Some(name) => name.to_string(),
        None => default_printer().await.unwrap_or_else(|| "(default)".to_string()),
    };
    info!(printer = %printer, "submitted artifact to spooler");
    Ok(SpoolReceipt { printer })
}

async fn run(program: &str, args: &[&str]) -> Result<String, String> {
    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| format!("{} unavailable: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_artifact_is_a_spooler_error() {
        let err = print_pdf("/nonexistent/label.pdf", None).await.unwrap_err();
        assert!(matches!(err, LabelError::Spooler(_)));
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error() {
        let err = run("definitely-not-a-spooler-tool", &[]).await.unwrap_err();
        assert!(err.contains("unavailable"));
    }
}

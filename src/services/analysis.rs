// Analysis Pipeline
// File in, verdict out: extraction followed by one classification.

use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{display_name, Analysis, Document};
use crate::services::classifier::{Classifier, ClassifierError};
use crate::services::extraction::{extract_document, unsupported_format, ExtractError};
use crate::services::text_processor::preview;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Classify(#[from] ClassifierError),
}

pub fn analyze_file(path: &Path, classifier: &Classifier) -> Result<Analysis, AnalysisError> {
    let t0 = Instant::now();
    let file_name = display_name(path);

    let outcome = run(path, &file_name, classifier);
    match &outcome {
        Ok(analysis) => info!(
            file = %analysis.file_name,
            format = %analysis.format,
            chars = analysis.extracted_chars,
            human = analysis.result.human,
            ai = analysis.result.ai,
            verdict = analysis.verdict.label(),
            elapsed_ms = t0.elapsed().as_millis(),
            "analysis.completed"
        ),
        Err(e) => warn!(
            file = %file_name,
            error = %e,
            elapsed_ms = t0.elapsed().as_millis(),
            "analysis.failed"
        ),
    }
    outcome
}

fn run(path: &Path, file_name: &str, classifier: &Classifier) -> Result<Analysis, AnalysisError> {
    let document = Document::from_path(path).ok_or_else(|| unsupported_format(path))?;
    let text = extract_document(&document)?;
    debug!(file = %file_name, preview = %preview(&text, 80), "analysis.text");
    let result = classifier.classify(&text)?;

    Ok(Analysis {
        file_name: file_name.to_string(),
        format: document.format,
        extracted_chars: text.chars().count(),
        result,
        verdict: result.verdict(),
    })
}

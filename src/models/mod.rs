// AuthentiAI Data Models
// Documents, classification results and verdicts shared by the GUI and the CLI

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ============ Document ============

/// Supported input formats, inferred from the file extension.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentFormat {
    PlainText,
    Word,
    Pdf,
    Pages,
}

impl DocumentFormat {
    /// Extensions accepted by the file picker, in display order.
    pub const EXTENSIONS: [&'static str; 4] = ["txt", "docx", "pdf", "pages"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::Word),
            "pdf" => Some(Self::Pdf),
            "pages" => Some(Self::Pages),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Word => "docx",
            Self::Pdf => "pdf",
            Self::Pages => "pages",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A file selected for analysis. Lives for a single request.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub format: DocumentFormat,
}

impl Document {
    /// Returns `None` when the extension is not one of the supported formats.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = DocumentFormat::from_path(&path)?;
        Some(Self { path, format })
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Base name of a path for status messages, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ============ Classification ============

/// Which class the model leans towards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Human,
    Ai,
}

impl Verdict {
    /// Conclusion shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Human => "Umano",
            Self::Ai => "AI",
        }
    }

    /// Indicator color as RGB.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Human => [0, 128, 0],
            Self::Ai => [255, 0, 0],
        }
    }
}

/// Two-class probability split. `human + ai == 1`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub human: f64,
    pub ai: f64,
}

impl ClassificationResult {
    pub fn new(human: f64, ai: f64) -> Self {
        Self { human, ai }
    }

    /// Strictly-greater comparison: a tie is reported as AI.
    pub fn verdict(&self) -> Verdict {
        if self.human > self.ai {
            Verdict::Human
        } else {
            Verdict::Ai
        }
    }

    pub fn human_percent(&self) -> f64 {
        self.human * 100.0
    }

    pub fn ai_percent(&self) -> f64 {
        self.ai * 100.0
    }
}

/// Outcome of one successful analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub file_name: String,
    pub format: DocumentFormat,
    pub extracted_chars: usize,
    pub result: ClassificationResult,
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_extension(".docx"), Some(DocumentFormat::Word));
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("pages"), Some(DocumentFormat::Pages));
        assert_eq!(DocumentFormat::from_extension("rtf"), None);
    }

    #[test]
    fn test_document_from_path() {
        let doc = Document::from_path("/tmp/essay.Pages").unwrap();
        assert_eq!(doc.format, DocumentFormat::Pages);
        assert_eq!(doc.file_name(), "essay.Pages");
        assert!(Document::from_path("/tmp/no_extension").is_none());
    }

    #[test]
    fn test_verdict_prefers_larger_probability() {
        assert_eq!(ClassificationResult::new(0.8, 0.2).verdict(), Verdict::Human);
        assert_eq!(ClassificationResult::new(0.3, 0.7).verdict(), Verdict::Ai);
        assert_eq!(ClassificationResult::new(0.5, 0.5).verdict(), Verdict::Ai);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Human.label(), "Umano");
        assert_eq!(Verdict::Ai.label(), "AI");
        assert_eq!(Verdict::Human.rgb(), [0, 128, 0]);
    }

    #[test]
    fn test_analysis_serialization() {
        let result = ClassificationResult::new(0.25, 0.75);
        let analysis = Analysis {
            file_name: "a.txt".to_string(),
            format: DocumentFormat::PlainText,
            extracted_chars: 12,
            result,
            verdict: result.verdict(),
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"fileName\":\"a.txt\""));
        assert!(json.contains("\"format\":\"plainText\""));
        assert!(json.contains("\"verdict\":\"ai\""));
    }
}

// View State
// What the window shows, independent of how it is drawn. Two states: idle
// (no result) and result-shown. Every analysis replaces the whole state.

use std::fmt::Display;
use std::path::Path;

use crate::models::{display_name, Analysis, ClassificationResult, Verdict};

pub const IDLE_STATUS: &str = "Nessun file caricato";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StatusKind {
    Idle,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

/// Labels rendered in the result area.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub human_line: String,
    pub ai_line: String,
    pub conclusion_line: String,
    pub verdict: Verdict,
}

impl ResultView {
    pub fn from_result(result: &ClassificationResult) -> Self {
        let verdict = result.verdict();
        Self {
            human_line: format!("Probabilità Umano: {:.2}%", result.human_percent()),
            ai_line: format!("Probabilità AI: {:.2}%", result.ai_percent()),
            conclusion_line: format!("Conclusione: {}", verdict.label()),
            verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub status: StatusLine,
    pub result: Option<ResultView>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            status: StatusLine {
                text: IDLE_STATUS.to_string(),
                kind: StatusKind::Idle,
            },
            result: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.result.is_none()
    }

    /// Replace the view with the outcome of analysing `path`.
    pub fn apply<E: Display>(&mut self, path: &Path, outcome: Result<Analysis, E>) {
        let name = display_name(path);
        *self = match outcome {
            Ok(analysis) => Self {
                status: StatusLine {
                    text: format!("✔ Caricato: {}", name),
                    kind: StatusKind::Loaded,
                },
                result: Some(ResultView::from_result(&analysis.result)),
            },
            Err(e) => Self {
                status: StatusLine {
                    text: format!("✖ Errore caricamento: {}\n{}", name, e),
                    kind: StatusKind::Failed,
                },
                result: None,
            },
        };
    }
}

// Classifier Adapter
// Turns text into a (human, ai) probability pair using a pluggable
// sequence-classification backend. The backend produces raw logits; softmax
// and validation happen here so every backend behaves the same.

pub mod bert;

use thiserror::Error;
use tracing::debug;

use crate::models::ClassificationResult;

pub use bert::BertBackend;

/// Default token budget; longer inputs are truncated, not rejected.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Logit index of the "human" class.
pub const HUMAN_INDEX: usize = 0;
/// Logit index of the "AI" class.
pub const AI_INDEX: usize = 1;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Errore caricamento modello: {0}")]
    ModelLoad(String),
    #[error("Errore tokenizzazione: {0}")]
    Tokenization(String),
    #[error("Errore inferenza: {0}")]
    Inference(String),
    #[error("Il modello ha prodotto {0} punteggi invece di 2")]
    UnexpectedLogits(usize),
    #[error("Il modello ha prodotto punteggi non finiti")]
    NonFiniteLogits,
}

/// A loaded sequence-classification model.
///
/// Implementations run one deterministic forward pass per call and return the
/// raw class scores, truncating input beyond their maximum length.
pub trait ClassifierBackend {
    /// Short identifier for logs (e.g. "bert").
    fn backend_id(&self) -> &str;

    fn logits(&self, text: &str) -> Result<Vec<f64>, ClassifierError>;
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Owns the model for the lifetime of the process. Analyses borrow it.
pub struct Classifier {
    backend: Box<dyn ClassifierBackend>,
}

impl Classifier {
    pub fn new(backend: impl ClassifierBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn backend_id(&self) -> &str {
        self.backend.backend_id()
    }

    pub fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        let logits = self.backend.logits(text)?;
        if logits.len() != 2 {
            return Err(ClassifierError::UnexpectedLogits(logits.len()));
        }
        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ClassifierError::NonFiniteLogits);
        }

        let probs = softmax(&logits);
        debug!(
            backend = self.backend_id(),
            logit_human = logits[HUMAN_INDEX],
            logit_ai = logits[AI_INDEX],
            "classifier.logits"
        );
        Ok(ClassificationResult::new(probs[HUMAN_INDEX], probs[AI_INDEX]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Verdict;

    /// Backend returning fixed logits.
    pub(crate) struct StubBackend {
        pub logits: Vec<f64>,
    }

    impl StubBackend {
        pub(crate) fn new(logits: &[f64]) -> Self {
            Self {
                logits: logits.to_vec(),
            }
        }
    }

    impl ClassifierBackend for StubBackend {
        fn backend_id(&self) -> &str {
            "stub"
        }

        fn logits(&self, _text: &str) -> Result<Vec<f64>, ClassifierError> {
            Ok(self.logits.clone())
        }
    }

    fn assert_distribution(result: &ClassificationResult) {
        assert!((0.0..=1.0).contains(&result.human));
        assert!((0.0..=1.0).contains(&result.ai));
        assert!((result.human + result.ai - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        for logits in [[0.0, 0.0], [2.5, -1.0], [-30.0, 40.0], [1e3, 1e3 - 1.0]] {
            let probs = softmax(&logits);
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_softmax_known_values() {
        let probs = softmax(&[0.0, 0.0]);
        assert!((probs[0] - 0.5).abs() < 1e-12);

        let probs = softmax(&[(3.0f64).ln(), 0.0]);
        assert!((probs[0] - 0.75).abs() < 1e-12);
        assert!((probs[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_large_logits_do_not_overflow() {
        let probs = softmax(&[1000.0, 0.0]);
        assert!(probs[0].is_finite());
        assert!((probs[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_confident_human_sample() {
        let classifier = Classifier::new(StubBackend::new(&[4.0, -2.0]));
        let result = classifier.classify("Ieri sono andato al mare con mio nonno.").unwrap();
        assert_distribution(&result);
        assert!(result.human > result.ai);
        assert_eq!(result.verdict(), Verdict::Human);
        assert_eq!(result.verdict().label(), "Umano");
    }

    #[test]
    fn test_confident_ai_sample() {
        let classifier = Classifier::new(StubBackend::new(&[-1.5, 3.0]));
        let result = classifier.classify("In conclusione, è importante notare che...").unwrap();
        assert_distribution(&result);
        assert_eq!(result.verdict(), Verdict::Ai);
    }

    #[test]
    fn test_repeated_classification_is_deterministic() {
        let classifier = Classifier::new(StubBackend::new(&[0.1, 0.2]));
        let first = classifier.classify("a").unwrap();
        let second = classifier.classify("a").unwrap();
        assert_eq!(first, second);
        assert_eq!(classifier.backend_id(), "stub");
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let classifier = Classifier::new(StubBackend::new(&[0.1, 0.2, 0.3]));
        let err = classifier.classify("text").unwrap_err();
        assert!(matches!(err, ClassifierError::UnexpectedLogits(3)));
    }

    #[test]
    fn test_non_finite_logits_are_rejected() {
        let classifier = Classifier::new(StubBackend::new(&[f64::NAN, 0.0]));
        let err = classifier.classify("text").unwrap_err();
        assert!(matches!(err, ClassifierError::NonFiniteLogits));
    }
}

// BERT sequence-classification backend
// Loads a fine-tuned BERT classifier exported for rust-bert:
//   <dir>/config.json    model configuration (must declare two labels)
//   <dir>/vocab.txt      WordPiece vocabulary
//   <dir>/rust_model.ot  weights converted from the PyTorch checkpoint

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rust_bert::bert::{BertConfig, BertForSequenceClassification};
use rust_tokenizers::tokenizer::{BertTokenizer, Tokenizer, TruncationStrategy};
use rust_tokenizers::TokenizedInput;
use tch::{nn, Device, Tensor};
use tracing::{debug, info};

use super::{ClassifierBackend, ClassifierError};
use crate::services::config_store::ModelConfig;

pub const CONFIG_FILE: &str = "config.json";
pub const VOCAB_FILE: &str = "vocab.txt";
pub const WEIGHTS_FILE: &str = "rust_model.ot";

/// `[CLS]` and `[SEP]` always take two positions.
const MIN_MAX_LENGTH: usize = 2;

pub struct BertBackend {
    tokenizer: BertTokenizer,
    model: BertForSequenceClassification,
    _var_store: nn::VarStore,
    device: Device,
    max_length: usize,
}

impl BertBackend {
    /// Load tokenizer, configuration and weights from `dir`.
    pub fn load(dir: &Path, options: &ModelConfig) -> Result<Self, ClassifierError> {
        let t0 = Instant::now();
        if !dir.is_dir() {
            return Err(ClassifierError::ModelLoad(format!(
                "cartella del modello non trovata: {}",
                dir.display()
            )));
        }
        let config_path = require_file(dir, CONFIG_FILE)?;
        let vocab_path = require_file(dir, VOCAB_FILE)?;
        let weights_path = require_file(dir, WEIGHTS_FILE)?;

        let config = read_config(&config_path)?;
        let num_labels = config.id2label.as_ref().map(|m| m.len()).unwrap_or(0);
        if num_labels != 2 {
            return Err(ClassifierError::ModelLoad(format!(
                "{} dichiara {} etichette, ne servono 2",
                config_path.display(),
                num_labels
            )));
        }

        let tokenizer = BertTokenizer::from_file(
            &vocab_path,
            options.lower_case,
            options.strip_accents(),
        )
        .map_err(|e| ClassifierError::ModelLoad(format!("{}: {}", vocab_path.display(), e)))?;

        let device = parse_device(&options.device);
        let mut var_store = nn::VarStore::new(device);
        let model = BertForSequenceClassification::new(var_store.root(), &config)
            .map_err(|e| ClassifierError::ModelLoad(e.to_string()))?;
        var_store
            .load(&weights_path)
            .map_err(|e| ClassifierError::ModelLoad(format!("{}: {}", weights_path.display(), e)))?;

        info!(
            dir = %dir.display(),
            device = ?device,
            max_length = options.max_length,
            load_ms = t0.elapsed().as_millis(),
            "model.loaded"
        );

        Ok(Self {
            tokenizer,
            model,
            _var_store: var_store,
            device,
            max_length: options.max_length,
        })
    }
}

impl ClassifierBackend for BertBackend {
    fn backend_id(&self) -> &str {
        "bert"
    }

    fn logits(&self, text: &str) -> Result<Vec<f64>, ClassifierError> {
        let encoded = encode_input(&self.tokenizer, text, self.max_length)?;

        let segment_ids: Vec<i64> = encoded.segment_ids.iter().map(|&s| s as i64).collect();
        let input_ids = Tensor::from_slice(&encoded.token_ids)
            .unsqueeze(0)
            .to_device(self.device);
        let token_type_ids = Tensor::from_slice(&segment_ids)
            .unsqueeze(0)
            .to_device(self.device);
        let mask = input_ids.ones_like();

        let output = tch::no_grad(|| {
            self.model.forward_t(
                Some(&input_ids),
                Some(&mask),
                Some(&token_type_ids),
                None,
                None,
                false,
            )
        });

        let logits = output.logits;
        let width = logits.size().last().copied().unwrap_or(0);
        (0..width)
            .map(|i| {
                logits
                    .f_double_value(&[0, i])
                    .map_err(|e| ClassifierError::Inference(e.to_string()))
            })
            .collect()
    }
}

/// Single-sequence encoding, truncated to `max_length` tokens including the special ones.
fn encode_input(
    tokenizer: &BertTokenizer,
    text: &str,
    max_length: usize,
) -> Result<TokenizedInput, ClassifierError> {
    if max_length < MIN_MAX_LENGTH {
        return Err(ClassifierError::Tokenization(format!(
            "maxLength {} troppo piccolo (minimo {})",
            max_length, MIN_MAX_LENGTH
        )));
    }
    let encoded = tokenizer.encode(text, None, max_length, &TruncationStrategy::LongestFirst, 0);
    debug!(
        tokens = encoded.token_ids.len(),
        truncated = encoded.num_truncated_tokens,
        "classifier.tokenized"
    );
    Ok(encoded)
}

fn require_file(dir: &Path, name: &str) -> Result<PathBuf, ClassifierError> {
    let path = dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ClassifierError::ModelLoad(format!(
            "file mancante: {}",
            path.display()
        )))
    }
}

fn read_config(path: &Path) -> Result<BertConfig, ClassifierError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ClassifierError::ModelLoad(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| ClassifierError::ModelLoad(format!("{}: {}", path.display(), e)))
}

fn parse_device(name: &str) -> Device {
    match name.trim().to_lowercase().as_str() {
        "cpu" => Device::Cpu,
        "cuda" | "gpu" => Device::Cuda(0),
        _ => Device::cuda_if_available(),
    }
}

// AuthentiAI Core Services

pub mod analysis;
pub mod classifier;
pub mod config_store;
pub mod extraction;
pub mod text_processor;

pub use analysis::{analyze_file, AnalysisError};
pub use classifier::{BertBackend, Classifier, ClassifierBackend, ClassifierError};
pub use config_store::{AppConfig, ConfigStore, ModelConfig};
pub use extraction::{extract_text, ExtractError};

use std::path::{Path, PathBuf};

use anyhow::Context;
use authentiai_lib::models::Analysis;
use authentiai_lib::services::analyze_file;
use authentiai_lib::{load_classifier, load_config};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    file: String,
    model_dir: String,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin classify_file -- <file.(txt|docx|pdf|pages)> [--model <dir>] [--json] [--out <json_path>]\n\nNotes:\n  - Without --model the directory comes from config.json or AUTHENTIAI_MODEL_DIR.\n  - RUST_LOG=debug shows extraction and tokenization details on stderr."
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let path = PathBuf::from(&args[1]);
    let model_arg = parse_arg_value(&args, "--model").map(PathBuf::from);
    let as_json = has_flag(&args, "--json");
    let out_path = parse_arg_value(&args, "--out");

    let config = load_config();
    let model_dir = model_arg.unwrap_or_else(|| config.model.resolve_dir());
    let classifier = load_classifier(&config, Some(model_dir.as_path()))
        .with_context(|| format!("loading model from {}", model_dir.display()))?;

    let analysis = analyze_file(&path, &classifier)
        .with_context(|| format!("analysing {}", path.display()))?;

    let output = Output {
        file: path.display().to_string(),
        model_dir: model_dir.display().to_string(),
        analysis: &analysis,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&path, &analysis);
    }

    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(&output)?;
        std::fs::write(&out_path, json).with_context(|| format!("writing {}", out_path))?;
        eprintln!("Wrote JSON: {}", out_path);
    }

    Ok(())
}

fn print_summary(path: &Path, analysis: &Analysis) {
    println!("File: {}", path.display());
    println!("Format: {}", analysis.format);
    println!("Extracted: {} chars", analysis.extracted_chars);
    println!("Probabilità Umano: {:.2}%", analysis.result.human_percent());
    println!("Probabilità AI: {:.2}%", analysis.result.ai_percent());
    println!("Conclusione: {}", analysis.verdict.label());
}

//! Build the question bank JSON from a directory of raw corpus files
//!
//! Reads `questions.raw_dir`, pairs every question with its answer and writes
//! the result to `questions.json_path`. Both paths come from the usual
//! configuration sources; `--input` and `--output` override them.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use QuizBot::{config::Settings, quiz::corpus::{self, CorpusParser}};

/// Convert raw quiz corpus files into the question bank JSON
#[derive(Parser, Debug)]
#[command(
    name = "prepare_questions",
    version,
    long_about = r#"Reads every .txt file in the corpus directory, pairs each "Вопрос" paragraph
with the following "Ответ" paragraph and writes a {question: answer} JSON object.

Examples:
  prepare_questions                                  # Paths from config.toml / QUIZBOT_* env
  prepare_questions --input raw --output bank.json   # Explicit paths"#
)]
struct Args {
    /// Directory with raw .txt corpus files [default: questions.raw_dir]
    #[arg(short, long)]
    input: Option<String>,

    /// Question bank JSON to write [default: questions.json_path]
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("failed to load configuration")?;
    let input = args.input.unwrap_or(settings.questions.raw_dir);
    let output = args.output.unwrap_or(settings.questions.json_path);

    let parser = CorpusParser::new()?;
    let pairs = parser
        .parse_dir(&input)
        .await
        .with_context(|| format!("failed to read corpus from {}", input))?;
    if pairs.is_empty() {
        bail!("no questions found in {}", input);
    }

    let written = corpus::write_bank(&pairs, &output)
        .await
        .with_context(|| format!("failed to write {}", output))?;

    info!(input = %input, output = %output, questions = written, "Question bank written");
    Ok(())
}

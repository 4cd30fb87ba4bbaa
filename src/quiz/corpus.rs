//! Raw corpus conversion
//!
//! Corpus files are plain text where paragraphs are separated by blank lines.
//! A paragraph starting with `Вопрос` is a question; the next paragraph
//! starting with `Ответ` is its answer. Everything else (titles, sources,
//! authors, comments) is skipped.

use std::path::{Path, PathBuf};
use regex::Regex;
use tokio::fs;
use tracing::{debug, info, warn};
use crate::utils::errors::{QuizBotError, Result};

const QUESTION_LABEL: &str = "Вопрос";
const ANSWER_LABEL: &str = "Ответ";

/// Splits corpus text into question/answer pairs
#[derive(Debug, Clone)]
pub struct CorpusParser {
    paragraph_break: Regex,
}

impl CorpusParser {
    pub fn new() -> Result<Self> {
        // Blank lines may carry stray spaces or carriage returns
        let paragraph_break = Regex::new(r"\r?\n[ \t\r]*\n")
            .map_err(|e| QuizBotError::Config(format!("Invalid paragraph pattern: {}", e)))?;
        Ok(Self { paragraph_break })
    }

    /// Extract question/answer pairs in document order
    pub fn parse(&self, text: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut pending_question: Option<String> = None;
        let text = text.replace("\r\n", "\n");

        for paragraph in self.paragraph_break.split(&text) {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            if paragraph.starts_with(QUESTION_LABEL) {
                if let Some(orphan) = pending_question.replace(paragraph.to_string()) {
                    debug!(question = %orphan, "Skipping question without answer");
                }
            } else if paragraph.starts_with(ANSWER_LABEL) {
                match pending_question.take() {
                    Some(question) => pairs.push((question, paragraph.to_string())),
                    None => debug!(answer = %paragraph, "Skipping answer without question"),
                }
            }
        }

        pairs
    }

    /// Parse every `.txt` file in a directory, sorted by file name
    pub async fn parse_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<(String, String)>> {
        let dir = dir.as_ref();
        let mut files: Vec<PathBuf> = Vec::new();

        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                files.push(path);
            }
        }
        files.sort();

        let mut pairs = Vec::new();
        for path in files {
            let bytes = fs::read(&path).await?;
            let text = String::from_utf8(bytes).map_err(|_| {
                QuizBotError::InvalidInput(format!("{} is not valid UTF-8", path.display()))
            })?;

            let file_pairs = self.parse(&text);
            if file_pairs.is_empty() {
                warn!(path = %path.display(), "No questions found in corpus file");
            }
            debug!(path = %path.display(), questions = file_pairs.len(), "Parsed corpus file");
            pairs.extend(file_pairs);
        }

        info!(dir = %dir.display(), questions = pairs.len(), "Corpus parsed");
        Ok(pairs)
    }
}

/// Write pairs as the question bank JSON object
pub async fn write_bank(pairs: &[(String, String)], path: impl AsRef<Path>) -> Result<usize> {
    let map: serde_json::Map<String, serde_json::Value> = pairs
        .iter()
        .map(|(question, answer)| (question.clone(), serde_json::Value::String(answer.clone())))
        .collect();

    let serialized = serde_json::to_string_pretty(&map)?;
    fs::write(path.as_ref(), serialized).await?;
    Ok(map.len())
}

//! Question bank
//!
//! An immutable question → answer mapping loaded once at startup.

use std::collections::HashMap;
use std::path::Path;
use rand::Rng;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, info};
use crate::utils::errors::{QuizBotError, Result};

/// Read-only collection of questions and their canonical answers
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// Question/answer pairs in load order
    entries: Vec<(String, String)>,
    /// Question text to position in `entries`
    index: HashMap<String, usize>,
}

impl QuestionBank {
    /// Build a bank from question/answer pairs
    ///
    /// Duplicate questions keep the last answer. An empty input is rejected.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (question, answer) in pairs {
            match index.get(&question) {
                Some(&position) => entries[position].1 = answer,
                None => {
                    index.insert(question.clone(), entries.len());
                    entries.push((question, answer));
                }
            }
        }

        if entries.is_empty() {
            return Err(QuizBotError::EmptyQuestionBank);
        }

        Ok(Self { entries, index })
    }

    /// Parse a bank from its JSON form `{question: answer}`
    pub fn from_json(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;

        let Value::Object(map) = value else {
            return Err(QuizBotError::Config(
                "Question bank must be a JSON object".to_string()
            ));
        };

        Self::from_map(map)
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        let mut pairs = Vec::with_capacity(map.len());
        for (question, answer) in map {
            match answer {
                Value::String(answer) => pairs.push((question, answer)),
                other => {
                    return Err(QuizBotError::Config(format!(
                        "Answer for question '{}' must be a string, got {}",
                        question, other
                    )));
                }
            }
        }
        Self::from_pairs(pairs)
    }

    /// Load the bank from a UTF-8 JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading question bank");

        let content = fs::read_to_string(path).await?;
        let bank = Self::from_json(&content)?;

        info!(path = %path.display(), questions = bank.len(), "Question bank loaded");
        Ok(bank)
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical answer for a question
    pub fn answer(&self, question: &str) -> Option<&str> {
        self.index
            .get(question)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains(&self, question: &str) -> bool {
        self.index.contains_key(question)
    }

    /// Pick a question uniformly at random
    pub fn random_question<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str> {
        if self.entries.is_empty() {
            return Err(QuizBotError::EmptyQuestionBank);
        }
        let position = rng.gen_range(0..self.entries.len());
        Ok(self.entries[position].0.as_str())
    }

    /// Iterate over questions in load order
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(question, _)| question.as_str())
    }
}

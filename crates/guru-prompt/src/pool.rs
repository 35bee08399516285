//! The fixed pool of suggested prompts shown on the welcome screen.
//!
//! ```rust
//! use guru_prompt::pool::PromptPool;
//!
//! let pool = PromptPool::builtin();
//! assert_eq!(pool.len(), 10);
//! assert!(pool.iter().all(|p| !p.is_empty()));
//! ```
use std::{collections::HashSet, sync::LazyLock};

use guru_core::error::{GuruError, Result};

const BUILTIN_PROMPTS: [&str; 10] = [
    "🚀 What are the top 3 AI trends dominating 2026?",
    "📈 How is data analytics transforming the retail industry right now?",
    "💡 Give me a unique startup idea combining AI and sustainability.",
    "🐍 Write a Python script to automate a daily data cleaning task.",
    "🌍 Summarize the most recent breakthrough in space exploration.",
    "🧠 Explain the concept of 'Agentic AI' in simple terms.",
    "🎨 Suggest a creative prompt for an AI image generator.",
    "📊 How can a Data Analyst use LLMs to improve SQL query writing?",
    "🔬 What is the current state of Quantum Computing in 2026?",
    "⚡ Give me 5 tips to improve my productivity using AI tools.",
];

static BUILTIN: LazyLock<PromptPool> = LazyLock::new(|| PromptPool {
    entries: BUILTIN_PROMPTS.iter().map(|p| p.to_string()).collect(),
});

/// An immutable set of candidate prompts. Entries are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPool {
    entries: Vec<String>,
}

impl PromptPool {
    /// # Errors
    ///
    /// * [`GuruError::InvalidArgument`] – an entry is empty or appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.trim().is_empty() {
                return Err(GuruError::invalid_argument("prompt pool entries must not be empty"));
            }
            if !seen.insert(entry.as_str()) {
                return Err(GuruError::invalid_argument(format!(
                    "duplicate prompt pool entry: {entry:?}"
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The process-wide default pool.
    pub fn builtin() -> &'static PromptPool {
        &BUILTIN
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn contains(&self, prompt: &str) -> bool {
        self.iter().any(|p| p == prompt)
    }
}

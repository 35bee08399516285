//! Model identifiers used throughout the **guru** workspace.
//!
//! Pick an enum variant instead of typing literal strings such as
//! `"llama-3.1-8b-instant"`; the backend crate maps the variant onto its own
//! naming scheme. Anything not covered lands in [`Model::Custom`].
//!
//! ```rust
//! use guru_core::model::{GroqModel, Model};
//! assert_eq!(Model::from(GroqModel::Llama3_1_8bInstant),
//!            Model::Groq(GroqModel::Llama3_1_8bInstant));
//! assert_eq!(Model::from_id("llama-3.1-8b-instant"),
//!            Model::Groq(GroqModel::Llama3_1_8bInstant));
//! ```
use std::{borrow::Cow, fmt::Display};

/// Universal identifier for an LLM model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Models hosted on Groq's OpenAI-compatible endpoint.
    Groq(GroqModel),
    /// Any model name not covered by a dedicated enum (self-hosted, beta, …).
    Custom(Cow<'static, str>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroqModel {
    Llama3_1_8bInstant,
    Llama3_3_70bVersatile,
    Gemma2_9bIt,
}

impl GroqModel {
    pub const ALL: [GroqModel; 3] = [
        GroqModel::Llama3_1_8bInstant,
        GroqModel::Llama3_3_70bVersatile,
        GroqModel::Gemma2_9bIt,
    ];

    /// Wire identifier of the model.
    pub fn id(self) -> &'static str {
        match self {
            GroqModel::Llama3_1_8bInstant => "llama-3.1-8b-instant",
            GroqModel::Llama3_3_70bVersatile => "llama-3.3-70b-versatile",
            GroqModel::Gemma2_9bIt => "gemma2-9b-it",
        }
    }
}

impl Model {
    /// Resolve a wire identifier, falling back to [`Model::Custom`].
    pub fn from_id(id: impl Into<Cow<'static, str>>) -> Self {
        let id = id.into();
        GroqModel::ALL
            .into_iter()
            .find(|model| model.id() == id)
            .map(Model::Groq)
            .unwrap_or(Model::Custom(id))
    }

    pub fn id(&self) -> &str {
        match self {
            Model::Groq(model) => model.id(),
            Model::Custom(id) => id,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Groq(GroqModel::Llama3_1_8bInstant)
    }
}

impl From<GroqModel> for Model {
    fn from(val: GroqModel) -> Self {
        Model::Groq(val)
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

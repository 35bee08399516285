use futures_core::stream::Stream;

use crate::{credential::Credential, error::Result, generic::GenericMessage, model::Model};

/// A provider that delivers the model's answer **incrementally**.
///
/// A backend turns a message list into a network call to a concrete provider
/// and yields the reply as UTF-8 text deltas, in arrival order. The stream
/// ends when the provider signals completion; nothing is buffered up front.
pub trait StreamingChatProvider: Send + Sync {
    /// The delta stream. Borrowing `self` lets back-ends share a pooled HTTP
    /// client without cloning it per request.
    type Delta<'s>: Stream<Item = Result<String>> + Send + 's
    where
        Self: 's;

    /// Start a streaming chat completion.
    fn chat_complete_stream<'s>(&'s self, params: ChatCompleteParameters) -> Self::Delta<'s>;
}

/// Everything a backend needs for one request.
#[derive(Debug, Clone)]
pub struct ChatCompleteParameters {
    pub messages: Vec<GenericMessage>,
    pub model: Model,
    pub credential: Credential,
    pub temperature: Option<f64>,
}

impl ChatCompleteParameters {
    pub fn new(messages: Vec<GenericMessage>, model: Model, credential: Credential) -> Self {
        Self {
            messages,
            model,
            credential,
            temperature: None,
        }
    }

    pub fn messages(&self) -> &[GenericMessage] {
        &self.messages
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

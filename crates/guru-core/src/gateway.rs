//! Completion gateway: the one place a request to the model is put together.
//!
//! The gateway is **generic over the backend type `B`**, so any crate that
//! implements [`StreamingChatProvider`] (e.g. `guru-openai`, or an in-memory
//! fake in tests) plugs in without dynamic dispatch.
//!
//! ```rust
//! use guru_core::gateway::compose_messages;
//! use guru_core::generic::{GenericRole, Turn};
//!
//! let history = [Turn::user("hi"), Turn::assistant("hello"), Turn::user("bye")];
//! let messages = compose_messages(&history, "Be brief.");
//!
//! assert_eq!(messages.len(), 4);
//! assert_eq!(messages[0].role, GenericRole::System);
//! assert_eq!(messages[3].content, "bye");
//! ```
use std::sync::Arc;

use crate::{
    credential::Credential,
    error::{GuruError, Result},
    generic::{GenericMessage, Turn},
    model::Model,
    provider::{ChatCompleteParameters, StreamingChatProvider},
};

/// Build the outbound message list: the system instruction first, followed by
/// the full history in chronological order.
pub fn compose_messages<'h>(
    history: impl IntoIterator<Item = &'h Turn>,
    system_instruction: &str,
) -> Vec<GenericMessage> {
    let history = history.into_iter();
    let mut messages = Vec::with_capacity(history.size_hint().0 + 1);
    messages.push(GenericMessage::system(system_instruction));
    messages.extend(history.map(GenericMessage::from));
    messages
}

/// A gateway bound to a single backend and model.
///
/// Clone it to share across sessions; the backend sits behind an `Arc`.
#[derive(Debug)]
pub struct CompletionGateway<B> {
    backend: Arc<B>,
    model: Model,
    temperature: Option<f64>,
}

impl<B> Clone for CompletionGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

impl<B> CompletionGateway<B>
where
    B: StreamingChatProvider,
{
    pub fn new(backend: B, model: impl Into<Model>) -> Self {
        Self {
            backend: Arc::new(backend),
            model: model.into(),
            temperature: None,
        }
    }

    /// Sampling temperature sent with every request. Unset means the
    /// upstream default.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Issue a streaming completion for `history`.
    ///
    /// # Errors
    ///
    /// * [`GuruError::CredentialMissing`] – `credential` is `None`. Returned
    ///   before any request is built, so no network call happens.
    ///
    /// Failures of the request itself arrive as items of the returned stream.
    pub fn complete<'g, 'h>(
        &'g self,
        history: impl IntoIterator<Item = &'h Turn>,
        system_instruction: &str,
        credential: Option<&Credential>,
    ) -> Result<B::Delta<'g>> {
        let credential = credential.ok_or(GuruError::CredentialMissing)?;

        let messages = compose_messages(history, system_instruction);
        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "issuing streaming completion"
        );

        let mut params =
            ChatCompleteParameters::new(messages, self.model.clone(), credential.clone());
        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature);
        }
        Ok(self.backend.chat_complete_stream(params))
    }
}

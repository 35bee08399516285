//! Per-client chat session.
//!
//! A [`Session`] is the whole mutable state of one conversation. It is passed
//! explicitly to every handler of the [`ChatController`](crate::controller::ChatController);
//! nothing lives in process-wide globals, so two sessions never observe each
//! other.
use std::fmt;

use guru_core::{
    assembler::DisplayUpdate,
    credential::{self, Credential, CredentialOrigin},
    error::{GuruError, Result},
    generic::Turn,
    transcript::Transcript,
};
use guru_prompt::{PromptPool, SUGGESTION_COUNT, sample_with};
use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A completion request for the turn at `turn_index` failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeFailure {
    pub turn_index: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    transcript: Transcript,
    suggestions: Vec<String>,
    stored_credential: Option<Credential>,
    manual_credential: Option<Credential>,
    live: Option<DisplayUpdate>,
    failure: Option<ExchangeFailure>,
}

/// Mutable views the controller needs while a reply is streaming.
pub(crate) struct ExchangeParts<'s> {
    pub transcript: &'s mut Transcript,
    pub live: &'s mut Option<DisplayUpdate>,
    pub failure: &'s mut Option<ExchangeFailure>,
}

impl Session {
    /// Start a session and draw its suggested prompts.
    ///
    /// # Errors
    ///
    /// * [`GuruError::InvalidArgument`] – `pool` holds fewer than
    ///   [`SUGGESTION_COUNT`] prompts.
    pub fn start(pool: &PromptPool, stored_credential: Option<Credential>) -> Result<Self> {
        Self::start_with(pool, stored_credential, &mut rand::thread_rng())
    }

    /// Same as [`Session::start`] with a caller-provided RNG.
    pub fn start_with<R>(
        pool: &PromptPool,
        stored_credential: Option<Credential>,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let suggestions = sample_with(pool, SUGGESTION_COUNT, rng)?;
        let session = Self {
            id: SessionId::random(),
            transcript: Transcript::new(),
            suggestions,
            stored_credential,
            manual_credential: None,
            live: None,
            failure: None,
        };

        tracing::info!(
            session = %session.id,
            suggestions = session.suggestions.len(),
            stored_credential = session.stored_credential.is_some(),
            "session started"
        );
        Ok(session)
    }

    /// Throw the conversation away and start over with freshly drawn
    /// suggestions. The stored credential survives, a manually entered one
    /// does not.
    pub fn reset(&mut self, pool: &PromptPool) -> Result<()> {
        let fresh = Self::start(pool, self.stored_credential.clone())?;
        let previous = std::mem::replace(self, fresh);
        tracing::info!(previous = %previous.id, session = %self.id, "session reset");
        Ok(())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The prompts drawn at session start; only offered while the
    /// conversation is still empty.
    pub fn suggested_prompts(&self) -> Option<&[String]> {
        self.transcript
            .is_empty()
            .then_some(self.suggestions.as_slice())
    }

    /// Display value of the reply currently streaming, if any.
    pub fn live_reply(&self) -> Option<&DisplayUpdate> {
        self.live.as_ref()
    }

    /// The failure scoped to the pending turn, if its exchange failed.
    pub fn failure(&self) -> Option<&ExchangeFailure> {
        self.failure.as_ref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.resolved_credential().map(|(c, _)| c)
    }

    pub fn resolved_credential(&self) -> Option<(&Credential, CredentialOrigin)> {
        credential::resolve(
            self.stored_credential.as_ref(),
            self.manual_credential.as_ref(),
        )
    }

    /// Record a key typed in by the user. This counts as new input, so a
    /// failure recorded for the pending turn is cleared and the next
    /// reconcile sends it again.
    ///
    /// # Errors
    ///
    /// * [`GuruError::InvalidArgument`] – the key is empty.
    pub fn enter_credential(&mut self, key: impl Into<String>) -> Result<()> {
        let credential = Credential::new(key)
            .ok_or_else(|| GuruError::invalid_argument("credential must not be empty"))?;

        if self.stored_credential.is_some() {
            tracing::debug!(session = %self.id, "manual credential shadowed by stored one");
        }
        self.manual_credential = Some(credential);
        self.failure = None;
        Ok(())
    }

    /// `true` if the pending user turn already had a failed exchange.
    pub fn pending_turn_failed(&self) -> bool {
        match (&self.failure, self.transcript.is_awaiting_response()) {
            (Some(failure), true) => failure.turn_index + 1 == self.transcript.len(),
            _ => false,
        }
    }

    pub(crate) fn push_user_turn(&mut self, text: &str) {
        self.transcript.append(Turn::user(text));
        self.failure = None;
        tracing::debug!(
            session = %self.id,
            turns = self.transcript.len(),
            "user turn appended"
        );
    }

    pub(crate) fn exchange_parts(&mut self) -> ExchangeParts<'_> {
        ExchangeParts {
            transcript: &mut self.transcript,
            live: &mut self.live,
            failure: &mut self.failure,
        }
    }
}

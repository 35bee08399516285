//! Reacts to user input and keeps a session's transcript answered.
//!
//! Both input events funnel into the same append path. After either one, and
//! on every re-render, the presentation layer calls
//! [`ChatController::reconcile`], which only talks to the model when the last
//! turn is an unanswered user turn. Calling it again once the reply is
//! committed does nothing.
use guru_core::{
    assembler::{AssemblerState, DisplaySink, DisplayUpdate, StreamingAssembler},
    error::{GuruError, Result},
    gateway::CompletionGateway,
    provider::StreamingChatProvider,
};
use guru_prompt::SystemInstruction;
use tracing::Instrument as _;

use crate::session::{ExchangeFailure, Session};

/// Upper bound on a single typed message, in characters.
pub const MAX_INPUT_CHARS: usize = 16_000;

/// What a call to [`ChatController::reconcile`] did.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The transcript is empty or already answered; no request was made.
    Idle,
    /// A reply was streamed and committed as an assistant turn.
    Committed,
    /// A user turn is pending but no credential is available yet.
    AwaitingCredential,
    /// The pending turn already failed; it is not re-sent until the user
    /// adds another turn.
    Failed,
}

pub struct ChatController<B> {
    gateway: CompletionGateway<B>,
    instruction: SystemInstruction,
}

impl<B> ChatController<B>
where
    B: StreamingChatProvider,
{
    pub fn new(gateway: CompletionGateway<B>, instruction: SystemInstruction) -> Self {
        Self {
            gateway,
            instruction,
        }
    }

    pub fn gateway(&self) -> &CompletionGateway<B> {
        &self.gateway
    }

    pub fn instruction(&self) -> &SystemInstruction {
        &self.instruction
    }

    /// The user picked one of the suggested prompts.
    ///
    /// # Errors
    ///
    /// * [`GuruError::InvalidArgument`] – `text` is not one of the prompts
    ///   currently offered by the session.
    pub fn on_suggested_prompt_click(&self, session: &mut Session, text: &str) -> Result<()> {
        let offered = session
            .suggested_prompts()
            .is_some_and(|prompts| prompts.iter().any(|p| p == text));
        if !offered {
            return Err(GuruError::invalid_argument(format!(
                "{text:?} is not a suggested prompt of this session"
            )));
        }

        session.push_user_turn(text);
        Ok(())
    }

    /// The user typed and sent a message.
    ///
    /// # Errors
    ///
    /// * [`GuruError::InvalidArgument`] – the text is blank or longer than
    ///   [`MAX_INPUT_CHARS`].
    pub fn on_free_text_submit(&self, session: &mut Session, text: &str) -> Result<()> {
        validate_input(text)?;
        session.push_user_turn(text);
        Ok(())
    }

    /// Answer the pending user turn, if there is one.
    ///
    /// Fragments are forwarded to `sink` as they arrive and mirrored in
    /// [`Session::live_reply`]. Dropping the returned future abandons the
    /// request without touching the transcript.
    ///
    /// # Errors
    ///
    /// The gateway failure of this exchange. It is also recorded as
    /// [`Session::failure`] and the transcript stays awaiting a response.
    pub async fn reconcile<D>(&self, session: &mut Session, sink: D) -> Result<Reconciliation>
    where
        D: DisplaySink,
    {
        let span = tracing::debug_span!("reconcile", session = %session.id());
        self.reconcile_inner(session, sink).instrument(span).await
    }

    async fn reconcile_inner<D>(&self, session: &mut Session, sink: D) -> Result<Reconciliation>
    where
        D: DisplaySink,
    {
        if !session.transcript().is_awaiting_response() {
            tracing::trace!("nothing pending");
            return Ok(Reconciliation::Idle);
        }
        if session.pending_turn_failed() {
            tracing::debug!("pending turn already failed; waiting for new input");
            return Ok(Reconciliation::Failed);
        }
        let Some(credential) = session.credential().cloned() else {
            tracing::info!("no credential available; request withheld");
            return Ok(Reconciliation::AwaitingCredential);
        };

        let parts = session.exchange_parts();
        let turn_index = parts.transcript.len() - 1;

        let fragments = match self.gateway.complete(
            parts.transcript.all(),
            self.instruction.as_str(),
            Some(&credential),
        ) {
            Ok(fragments) => fragments,
            Err(GuruError::CredentialMissing) => return Ok(Reconciliation::AwaitingCredential),
            Err(err) => return Err(err),
        };

        let sink = LiveSink {
            live: parts.live,
            inner: sink,
        };

        match StreamingAssembler::new()
            .run(fragments, parts.transcript, sink)
            .await
        {
            Ok(_) => Ok(Reconciliation::Committed),
            Err(err) => {
                tracing::warn!(turn = turn_index, error = %err, "exchange failed");
                *parts.failure = Some(ExchangeFailure {
                    turn_index,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

#[cfg(feature = "openai")]
impl ChatController<guru_openai::OpenAiAdapter> {
    /// Controller talking to the OpenAI-compatible endpoint described by
    /// `config`.
    pub fn from_config(config: &crate::config::GuruConfig) -> Result<Self> {
        let mut builder = guru_openai::OpenAiAdapterBuilder::new();
        if let Some(base_url) = &config.base_url {
            builder = builder.with_base_url(base_url.clone());
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.with_timeout(timeout);
        }

        let mut gateway = CompletionGateway::new(builder.build()?, config.model());
        if let Some(temperature) = config.temperature {
            gateway = gateway.with_temperature(temperature);
        }
        Ok(Self::new(gateway, config.system_instruction()))
    }
}

fn validate_input(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(GuruError::invalid_argument("message must not be empty"));
    }

    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(GuruError::invalid_argument(format!(
            "message has {chars} characters, the limit is {MAX_INPUT_CHARS}"
        )));
    }
    Ok(())
}

/// Mirrors every update into the session before passing it on. Clears the
/// live value when dropped, which covers commit, failure and cancellation.
struct LiveSink<'s, D> {
    live: &'s mut Option<DisplayUpdate>,
    inner: D,
}

impl<D: DisplaySink> DisplaySink for LiveSink<'_, D> {
    fn publish(&mut self, update: &DisplayUpdate) {
        *self.live = Some(update.clone());
        self.inner.publish(update);
    }

    fn transition(&mut self, from: AssemblerState, to: AssemblerState) {
        self.inner.transition(from, to);
    }
}

impl<D> Drop for LiveSink<'_, D> {
    fn drop(&mut self) {
        *self.live = None;
    }
}

//! Reassembles a streamed reply and commits it to the transcript.
//!
//! ```text
//!   Idle ──first fragment──► Streaming ──exhausted──► Committed
//!     │                         │
//!     └──────exhausted──────────┤
//!                               └──error──► Failed
//! ```
//!
//! [`StreamingAssembler::commit`] and [`StreamingAssembler::fail`] consume
//! the assembler, so a terminal instance cannot be fed again: every new user
//! turn starts from [`StreamingAssembler::new`]. The reply buffer lives
//! inside the assembler and is dropped with it.
use futures_core::stream::Stream;
use futures_util::StreamExt;

use crate::{
    error::{GuruError, Result},
    generic::Turn,
    transcript::Transcript,
};

/// Glyph appended to the display value while more fragments may follow.
pub const IN_PROGRESS_MARKER: char = '▌';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    Streaming,
    Committed,
    Failed,
}

/// The value a presentation layer shows for the reply being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayUpdate {
    pub text: String,
    pub in_progress: bool,
}

impl DisplayUpdate {
    /// Text with the [`IN_PROGRESS_MARKER`] appended while in progress.
    pub fn rendered(&self) -> String {
        if self.in_progress {
            let mut out = String::with_capacity(self.text.len() + IN_PROGRESS_MARKER.len_utf8());
            out.push_str(&self.text);
            out.push(IN_PROGRESS_MARKER);
            out
        } else {
            self.text.clone()
        }
    }
}

/// Receiver of display updates, implemented by the presentation layer.
pub trait DisplaySink {
    fn publish(&mut self, update: &DisplayUpdate);

    fn transition(&mut self, _from: AssemblerState, _to: AssemblerState) {}
}

/// Sink that ignores everything.
impl DisplaySink for () {
    fn publish(&mut self, _update: &DisplayUpdate) {}
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn publish(&mut self, update: &DisplayUpdate) {
        (**self).publish(update)
    }

    fn transition(&mut self, from: AssemblerState, to: AssemblerState) {
        (**self).transition(from, to)
    }
}

#[derive(Debug)]
pub struct StreamingAssembler {
    state: AssemblerState,
    buffer: String,
    fragments: usize,
}

impl Default for StreamingAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Idle,
            buffer: String::new(),
            fragments: 0,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Text received so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn display(&self) -> DisplayUpdate {
        DisplayUpdate {
            text: self.buffer.clone(),
            in_progress: self.state == AssemblerState::Streaming,
        }
    }

    /// Append one fragment verbatim and publish the grown buffer.
    pub fn accept(&mut self, fragment: &str, sink: &mut impl DisplaySink) {
        if self.state == AssemblerState::Idle {
            self.move_to(AssemblerState::Streaming, sink);
        }
        self.buffer.push_str(fragment);
        self.fragments += 1;
        sink.publish(&self.display());
    }

    /// Finish the reply: publish it without the marker, then append it to
    /// `transcript` as an assistant turn.
    pub fn commit(mut self, transcript: &mut Transcript, sink: &mut impl DisplaySink) -> DisplayUpdate {
        self.move_to(AssemblerState::Committed, sink);
        let update = self.display();
        sink.publish(&update);

        tracing::debug!(
            fragments = self.fragments,
            chars = self.buffer.chars().count(),
            "assistant reply committed"
        );
        transcript.append(Turn::assistant(self.buffer));
        update
    }

    /// Abandon the reply. The transcript is not touched; the error is
    /// handed back for display.
    pub fn fail(mut self, error: GuruError, sink: &mut impl DisplaySink) -> GuruError {
        tracing::warn!(
            fragments = self.fragments,
            error = %error,
            "assistant reply discarded"
        );
        self.move_to(AssemblerState::Failed, sink);
        error
    }

    /// Drive `fragments` to the end and commit, or fail on the first error.
    pub async fn run<S, D>(
        mut self,
        fragments: S,
        transcript: &mut Transcript,
        mut sink: D,
    ) -> Result<DisplayUpdate>
    where
        S: Stream<Item = Result<String>>,
        D: DisplaySink,
    {
        futures_util::pin_mut!(fragments);

        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(fragment) => self.accept(&fragment, &mut sink),
                Err(error) => return Err(self.fail(error, &mut sink)),
            }
        }

        Ok(self.commit(transcript, &mut sink))
    }

    fn move_to(&mut self, to: AssemblerState, sink: &mut impl DisplaySink) {
        let from = std::mem::replace(&mut self.state, to);
        sink.transition(from, to);
    }
}

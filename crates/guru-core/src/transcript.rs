//! Append-only conversation log of a single session.
use serde::Serialize;

use crate::generic::{Role, Turn};

/// Ordered history of [`Turn`]s.
///
/// There is no way to remove, replace or reorder a turn once appended; the
/// only mutation is [`Transcript::append`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// `true` iff the most recent turn is an unanswered user turn.
    pub fn is_awaiting_response(&self) -> bool {
        self.last().is_some_and(|turn| turn.role() == Role::User)
    }

    /// All turns, oldest first. Call again to restart.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &Turn> + Clone + '_ {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

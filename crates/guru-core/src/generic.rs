//! Roles, turns and messages shared by every crate in the workspace.
//!
//! Two role types exist on purpose:
//!
//! * [`Role`] tags a [`Turn`] stored in a transcript. Only the two speakers of
//!   a conversation can appear there.
//! * [`GenericRole`] tags a [`GenericMessage`] sent to a provider, which
//!   additionally knows the `system` instruction.
//!
//! Turning a `Turn` into a `GenericMessage` is a plain `From` conversion, so
//! back-ends never see transcript internals.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Speaker of a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Messages originating from the human user.
    User,
    /// Messages produced by the assistant / model.
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation.
///
/// Fields are private: once created a turn cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// High-level chat roles recognised by OpenAI-style providers.
///
/// The `Display` implementation renders the canonical lowercase name.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenericRole {
    /// Defines global behaviour and style guidelines.
    System,
    Assistant,
    User,
}

impl Display for GenericRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericRole::System => write!(f, "system"),
            GenericRole::Assistant => write!(f, "assistant"),
            GenericRole::User => write!(f, "user"),
        }
    }
}

impl From<Role> for GenericRole {
    fn from(value: Role) -> Self {
        match value {
            Role::User => GenericRole::User,
            Role::Assistant => GenericRole::Assistant,
        }
    }
}

/// Provider-independent outbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage {
    pub role: GenericRole,
    pub content: String,
}

impl GenericMessage {
    /// ```rust
    /// use guru_core::generic::{GenericMessage, GenericRole};
    ///
    /// let sys = GenericMessage::new("You are a helpful bot.", GenericRole::System);
    /// assert_eq!(sys.role.to_string(), "system");
    /// ```
    pub fn new(content: impl Into<String>, role: GenericRole) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(content, GenericRole::System)
    }
}

impl From<&Turn> for GenericMessage {
    fn from(turn: &Turn) -> Self {
        Self::new(turn.content(), turn.role().into())
    }
}

impl From<Turn> for GenericMessage {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role.into(),
            content: turn.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_converts_into_message_with_matching_role() {
        let msg: GenericMessage = Turn::assistant("hi there").into();
        assert_eq!(msg.role, GenericRole::Assistant);
        assert_eq!(msg.content, "hi there");

        let msg = GenericMessage::from(&Turn::user("hello"));
        assert_eq!(msg.role, GenericRole::User);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Turn::user("x")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"x"}"#);
        assert_eq!(GenericRole::System.to_string(), "system");
    }
}

use guru_core::error::GuruError;
use guru_core::generic::{GenericMessage, GenericRole};
use guru_core::provider::ChatCompleteParameters;
use serde::{Deserialize, Serialize};

use crate::impl_builder_methods;
use crate::model_map::map_model;

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            stream: None,
        }
    }
}

impl_builder_methods!(
    ChatCompletionRequest,
    temperature: f64,
    stream: bool
);

impl TryFrom<&ChatCompleteParameters> for ChatCompletionRequest {
    type Error = GuruError;

    fn try_from(value: &ChatCompleteParameters) -> Result<Self, Self::Error> {
        let model = map_model(value.model()).ok_or_else(|| GuruError::ModelNotSupported {
            provider: "openai",
            model: value.model().to_string(),
        })?;

        let request = Self::new(
            model.into_owned(),
            value.messages().iter().map(Into::into).collect(),
        );
        Ok(match value.temperature {
            Some(temperature) => request.temperature(temperature),
            None => request,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    #[serde(other)]
    Other,
}

impl From<GenericRole> for MessageRole {
    fn from(value: GenericRole) -> Self {
        match value {
            GenericRole::System => MessageRole::System,
            GenericRole::Assistant => MessageRole::Assistant,
            GenericRole::User => MessageRole::User,
        }
    }
}

impl From<&GenericMessage> for ChatCompletionMessage {
    fn from(value: &GenericMessage) -> Self {
        Self {
            role: value.role.into(),
            content: value.content.clone(),
        }
    }
}

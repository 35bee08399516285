use serde::Deserialize;

use super::{chat_completion::FinishReason, common::ApiErrorEnvelope};

/// The only part of a streamed delta that is rendered. Role announcements
/// and null content both decode to `None`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionMessageDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: ChatCompletionMessageDelta,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// One `chat.completion.chunk` event. Metadata such as `id` and `model` is
/// ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunkResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChunkChoice>,
}

/// What a `data:` line of the event stream may carry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StreamPayload {
    Error(ApiErrorEnvelope),
    Chunk(ChatCompletionChunkResponse),
}

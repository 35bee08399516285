//! OpenAI-compatible streaming backend for the Guru chat engine.
//!
//! Speaks the `chat/completions` wire format with `stream: true` and
//! defaults to Groq's endpoint ([`client::DEFAULT_BASE_URL`]).
mod adapter;
mod model_map;
mod provider_impl_chat_stream;
mod sse;

pub use adapter::{OpenAiAdapter, OpenAiAdapterBuilder};
pub mod api_v1;
pub mod client;
pub mod error;

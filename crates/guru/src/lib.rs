//! # `guru` – The umbrella crate
//!
//! One dependency line for the whole chat engine:
//!
//! | Crate             | What it provides                                                          |
//! |-------------------|---------------------------------------------------------------------------|
//! | **`guru-core`**   | Transcript, streaming assembler, completion gateway, credentials, errors   |
//! | **`guru-prompt`** | Suggested-prompt pool, sampler, system instruction                         |
//! | **`guru-openai`** | Streaming backend for OpenAI-compatible endpoints, Groq by default *(opt)* |
//!
//! On top of those this crate adds the per-client [`Session`], the
//! [`ChatController`] that keeps it answered, and the deployment
//! [`GuruConfig`].
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use guru::{ChatController, GuruConfig, Reconciliation, Session, prompt::PromptPool};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GuruConfig::load(None)?;
//!     let controller = ChatController::from_config(&config)?;
//!     let mut session = Session::start(PromptPool::builtin(), config.stored_credential()?)?;
//!
//!     let first = session.suggested_prompts().unwrap_or_default()[0].clone();
//!     controller.on_suggested_prompt_click(&mut session, &first)?;
//!
//!     if controller.reconcile(&mut session, ()).await? == Reconciliation::Committed {
//!         let reply = session.transcript().last().unwrap();
//!         println!("{}", reply.content());
//!     }
//!     Ok(())
//! }
//! ```
#![doc(html_root_url = "https://docs.rs/guru/latest")]

pub mod config;
pub mod controller;
pub mod secrets;
pub mod session;

pub use guru_core::*;
pub use guru_prompt as prompt;

#[cfg(feature = "openai")]
pub use guru_openai as openai;

pub use config::GuruConfig;
pub use controller::{ChatController, MAX_INPUT_CHARS, Reconciliation};
pub use session::{ExchangeFailure, Session, SessionId};

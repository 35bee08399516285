//! Provider-agnostic building blocks of the Guru chat engine.
//!
//! * [`transcript`] – append-only conversation log.
//! * [`assembler`] – turns a fragment stream into one committed assistant turn.
//! * [`gateway`] – builds the request and hands it to a backend.
//! * [`provider`] – the trait a backend implements.
//! * [`credential`] – the API key and the policy choosing it.
pub mod assembler;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod generic;
pub mod model;
pub mod provider;
pub mod transcript;

pub use gateway::CompletionGateway;

//! Prompt-side helpers of the Guru chat engine: the suggested-prompt pool,
//! the sampler that picks from it, and the system instruction.
pub mod instruction;
pub mod pool;
pub mod sampler;

pub use instruction::SystemInstruction;
pub use pool::PromptPool;
pub use sampler::{SUGGESTION_COUNT, sample, sample_with};

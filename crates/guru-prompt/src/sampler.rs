//! Draws the handful of suggestions shown while a conversation is empty.
//!
//! Sampling happens once per session start; re-rendering the welcome screen
//! reuses the stored result so the suggestions do not shuffle under the
//! user's cursor.
use guru_core::error::{GuruError, Result};
use rand::Rng;

use crate::pool::PromptPool;

/// Number of suggestions offered on a fresh session.
pub const SUGGESTION_COUNT: usize = 3;

/// Draw `k` distinct prompts from `pool`, uniformly at random, using the
/// thread-local RNG.
///
/// ```rust
/// use guru_prompt::{pool::PromptPool, sampler::sample};
///
/// let picked = sample(PromptPool::builtin(), 3).unwrap();
/// assert_eq!(picked.len(), 3);
/// ```
pub fn sample(pool: &PromptPool, k: usize) -> Result<Vec<String>> {
    sample_with(pool, k, &mut rand::thread_rng())
}

/// Same as [`sample`] with a caller-provided RNG.
///
/// # Errors
///
/// * [`GuruError::InvalidArgument`] – `k` exceeds the pool size.
pub fn sample_with<R>(pool: &PromptPool, k: usize, rng: &mut R) -> Result<Vec<String>>
where
    R: Rng + ?Sized,
{
    if k > pool.len() {
        return Err(GuruError::invalid_argument(format!(
            "cannot sample {k} prompts from a pool of {}",
            pool.len()
        )));
    }

    // `index::sample` yields distinct indices in shuffled order.
    let indices = rand::seq::index::sample(rng, pool.len(), k);
    tracing::trace!(k, pool = pool.len(), "prompts sampled");

    let picked = indices
        .into_iter()
        .filter_map(|i| pool.get(i).map(str::to_owned))
        .collect();

    Ok(picked)
}

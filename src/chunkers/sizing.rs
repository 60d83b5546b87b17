//! Near-even chunk sizing under a per-chunk token budget.

use crate::error::{Result, TranslationError};

/// Compute the target chunk size for `token_count` tokens split under a
/// budget of `token_limit` tokens per chunk.
///
/// Texts that fit the budget come back unchanged. Longer texts are divided
/// into `ceil(token_count / token_limit)` chunks of near-equal size, with the
/// remainder left over by the budget spread across them. The result never
/// exceeds `token_limit`.
///
/// ```
/// use translation_agent::chunkers::calculate_chunk_size;
///
/// assert_eq!(calculate_chunk_size(1000, 500).unwrap(), 500);
/// assert_eq!(calculate_chunk_size(1530, 500).unwrap(), 389);
/// assert_eq!(calculate_chunk_size(2242, 500).unwrap(), 496);
/// ```
pub fn calculate_chunk_size(token_count: usize, token_limit: usize) -> Result<usize> {
    if token_limit == 0 {
        return Err(TranslationError::InvalidInput(
            "token limit per chunk must be positive".to_string(),
        ));
    }

    if token_count <= token_limit {
        return Ok(token_count);
    }

    let num_chunks = token_count.div_ceil(token_limit);
    let mut chunk_size = token_count / num_chunks;

    let remaining_tokens = token_count % token_limit;
    if remaining_tokens > 0 {
        chunk_size += remaining_tokens / num_chunks;
    }

    // The remainder spread can overshoot when the last chunk is nearly full
    // (1999 / 1000 would give 1498).
    Ok(chunk_size.min(token_limit))
}

//! Parallel row processing utilities.

use rayon::prelude::*;

use crate::error::Result;
use crate::progress::ProgressContext;

/// Multiplier for number of chunks relative to CPU threads.
/// Using 2x threads provides good load balancing when some chunks finish faster.
const CHUNKS_PER_THREAD: usize = 2;

/// Compute optimal rows per chunk for parallel image processing.
///
/// Returns the number of rows that divides the image height into roughly `num_cpus * 2` chunks.
/// Minimum of 1 row per chunk.
#[inline]
pub fn rows_per_chunk(height: usize) -> usize {
    let num_chunks = rayon::current_num_threads() * CHUNKS_PER_THREAD;
    (height / num_chunks).max(1)
}

/// Fill `output` row by row in parallel, polling `ctx` for cancellation once per chunk.
///
/// `f(y, row)` receives the row index and the mutable output row.
/// Returns `Error::Cancelled` as soon as any chunk observes a cancellation request;
/// rows already written stay written.
pub fn try_par_rows<F>(
    output: &mut [f32],
    width: usize,
    height: usize,
    ctx: &ProgressContext,
    f: F,
) -> Result<()>
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    debug_assert_eq!(output.len(), width * height);
    if output.is_empty() {
        return Ok(());
    }

    let rows = rows_per_chunk(height);
    output
        .par_chunks_mut(width * rows)
        .enumerate()
        .try_for_each(|(chunk_idx, chunk)| {
            ctx.check()?;
            let y_start = chunk_idx * rows;
            for (local_y, row) in chunk.chunks_mut(width).enumerate() {
                f(y_start + local_y, row);
            }
            Ok(())
        })
}

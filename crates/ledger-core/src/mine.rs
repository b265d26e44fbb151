use crate::{
    constants::PARALLEL_WINDOW,
    pow::{Puzzle, SearchLimits},
    PowError, Solution,
};
use rayon::prelude::*;
use tracing::info;

/// Solves the puzzle by scanning windows of candidates in parallel.
///
/// Each window is searched with `find_first`, and windows are visited in
/// ascending order, so the result is always the smallest solving candidate:
/// the same value [`Puzzle::solve`] returns. Limits are checked between
/// windows, so `max_attempts` is rounded up to a whole window.
pub fn solve_parallel(
    puzzle: &Puzzle,
    previous: Solution,
    limits: SearchLimits<'_>,
) -> Result<Solution, PowError> {
    let mut start: Solution = 1;
    let mut attempts = 0u64;
    loop {
        if limits.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(PowError::SearchExhausted { previous, attempts });
        }
        if limits.is_cancelled() {
            return Err(PowError::Cancelled { previous, attempts });
        }

        let end = start.saturating_add(PARALLEL_WINDOW);
        let found = (start..end)
            .into_par_iter()
            .find_first(|candidate| puzzle.verify(*candidate, previous));

        if let Some(solution) = found {
            info!(previous, solution, "parallel search solved puzzle");
            return Ok(solution);
        }

        attempts += end - start;
        if end == Solution::MAX {
            return Err(PowError::SearchExhausted { previous, attempts });
        }
        start = end;
    }
}

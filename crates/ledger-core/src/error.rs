use crate::Solution;
use thiserror::Error;

/// Errors surfaced by the bounded or cancellable puzzle searches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    #[error("difficulty must be between 1 and {max} leading zeros, got {got}")]
    InvalidDifficulty { got: usize, max: usize },
    #[error("no solution for previous solution {previous} after {attempts} attempts")]
    SearchExhausted { previous: Solution, attempts: u64 },
    #[error("search for previous solution {previous} cancelled after {attempts} attempts")]
    Cancelled { previous: Solution, attempts: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("previous digest mismatch: expected {expected}, got {actual}")]
    PreviousDigestMismatch { expected: String, actual: String },
    #[error("solution {solution} does not solve the puzzle for previous solution {previous}")]
    InvalidSolution { solution: Solution, previous: Solution },
    #[error(transparent)]
    Pow(#[from] PowError),
}

/// Why a chain snapshot failed validation. Reported as data, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainFault {
    #[error("block {sequence_number} does not link to the digest of its predecessor")]
    BrokenLink { sequence_number: u64 },
    #[error("block {sequence_number} carries a solution that fails the puzzle")]
    UnsolvedPuzzle { sequence_number: u64 },
}

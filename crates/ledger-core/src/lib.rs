use serde::{Deserialize, Serialize};

pub mod clock;
pub mod constants;
pub mod error;
pub mod mine;
pub mod service;

pub use chain::{check_chain, digest_of, validate, validate_with, Ledger};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ChainFault, LedgerError, PowError};
pub use pow::{Puzzle, SearchLimits};
pub use service::{ChainSnapshot, MiningConfig, SharedLedger, Validity};

/// Puzzle answer carried by every block.
pub type Solution = u64;

/// One entry of the ledger.
///
/// The serde representation of this struct *is* the canonical encoding used
/// for digesting: compact JSON with the fields in declaration order. Renaming
/// or reordering a field invalidates the links of every block already minted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub sequence_number: u64,
    pub created_at: String,
    pub solution: Solution,
    pub previous_digest: String,
}

impl Block {
    pub fn new(
        sequence_number: u64,
        created_at: impl Into<String>,
        solution: Solution,
        previous_digest: impl Into<String>,
    ) -> Self {
        Self {
            sequence_number,
            created_at: created_at.into(),
            solution,
            previous_digest: previous_digest.into(),
        }
    }

    /// First block of every ledger.
    pub fn genesis(created_at: impl Into<String>) -> Self {
        Self::new(
            1,
            created_at,
            constants::GENESIS_SOLUTION,
            constants::GENESIS_PREVIOUS_DIGEST,
        )
    }

    /// `{"sequence_number":..,"created_at":"..","solution":..,"previous_digest":".."}`
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("block always serializes to json")
    }

    pub fn digest(&self) -> String {
        pow::digest(self.canonical_bytes())
    }
}

pub mod pow {
    use super::Solution;
    use crate::constants::{CANCEL_POLL_INTERVAL, DIFFICULTY, HASH_HEX_SIZE};
    use crate::error::PowError;
    use sha2::{Digest, Sha256};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// SHA-256 of `bytes` as 64 lowercase hex characters.
    pub fn digest(bytes: impl AsRef<[u8]>) -> String {
        hex::encode(Sha256::digest(bytes.as_ref()))
    }

    /// Number of leading `'0'` characters in a hex digest.
    pub fn count_leading_zero_chars(hex_digest: &str) -> usize {
        hex_digest.bytes().take_while(|b| *b == b'0').count()
    }

    /// The puzzle input: `solution² - previous²` as signed decimal text.
    pub fn operation(solution: Solution, previous: Solution) -> String {
        let solution_sq = u128::from(solution) * u128::from(solution);
        let previous_sq = u128::from(previous) * u128::from(previous);
        if solution_sq >= previous_sq {
            (solution_sq - previous_sq).to_string()
        } else {
            format!("-{}", previous_sq - solution_sq)
        }
    }

    pub fn meets_difficulty(hex_digest: &str) -> bool {
        Puzzle::default().meets(hex_digest)
    }

    pub fn solve(previous: Solution) -> Solution {
        Puzzle::default().solve(previous)
    }

    pub fn verify(solution: Solution, previous: Solution) -> bool {
        Puzzle::default().verify(solution, previous)
    }

    /// Optional bounds on a search. The default is unbounded.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SearchLimits<'a> {
        pub max_attempts: Option<u64>,
        pub cancel: Option<&'a AtomicBool>,
    }

    impl SearchLimits<'_> {
        pub(crate) fn is_cancelled(&self) -> bool {
            self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
        }
    }

    /// Hash-prefix puzzle with a fixed number of leading hex zeros.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Puzzle {
        difficulty: usize,
    }

    impl Default for Puzzle {
        fn default() -> Self {
            Self {
                difficulty: DIFFICULTY,
            }
        }
    }

    impl Puzzle {
        pub fn new(difficulty: usize) -> Result<Self, PowError> {
            if difficulty == 0 || difficulty > HASH_HEX_SIZE {
                return Err(PowError::InvalidDifficulty {
                    got: difficulty,
                    max: HASH_HEX_SIZE,
                });
            }
            Ok(Self { difficulty })
        }

        pub fn difficulty(&self) -> usize {
            self.difficulty
        }

        /// Textual check on the hex string, not a numeric comparison.
        pub fn meets(&self, hex_digest: &str) -> bool {
            hex_digest.len() >= self.difficulty
                && count_leading_zero_chars(hex_digest) >= self.difficulty
        }

        pub fn verify(&self, solution: Solution, previous: Solution) -> bool {
            self.meets(&digest(operation(solution, previous)))
        }

        /// First candidate, counting up from 1, that solves the puzzle
        /// against `previous`. Blocks until found.
        pub fn solve(&self, previous: Solution) -> Solution {
            self.search(previous, SearchLimits::default())
                .expect("solution space exhausted (practically impossible)")
        }

        pub fn solve_bounded(
            &self,
            previous: Solution,
            max_attempts: u64,
        ) -> Result<Solution, PowError> {
            self.search(
                previous,
                SearchLimits {
                    max_attempts: Some(max_attempts),
                    cancel: None,
                },
            )
        }

        /// Same search as [`Puzzle::solve`], giving up once `limits` says so.
        /// The cancel flag is polled every `CANCEL_POLL_INTERVAL` attempts.
        pub fn search(
            &self,
            previous: Solution,
            limits: SearchLimits<'_>,
        ) -> Result<Solution, PowError> {
            let mut attempts = 0u64;
            for candidate in 1..=Solution::MAX {
                if limits.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(PowError::SearchExhausted { previous, attempts });
                }
                if attempts % CANCEL_POLL_INTERVAL == 0 && limits.is_cancelled() {
                    return Err(PowError::Cancelled { previous, attempts });
                }
                attempts += 1;
                if self.verify(candidate, previous) {
                    return Ok(candidate);
                }
            }
            Err(PowError::SearchExhausted { previous, attempts })
        }
    }
}

pub mod chain {
    use super::*;
    use crate::clock::{format_timestamp, Clock, SystemClock};
    use crate::error::{ChainFault, LedgerError};
    use crate::pow::Puzzle;
    use std::sync::Arc;
    use tracing::{debug, info};

    /// Append-only, in-memory sequence of blocks. Always holds genesis.
    #[derive(Clone, Debug)]
    pub struct Ledger {
        blocks: Vec<Block>,
        puzzle: Puzzle,
        clock: Arc<dyn Clock>,
    }

    impl Default for Ledger {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Ledger {
        pub fn new() -> Self {
            Self::with_config(Puzzle::default(), Arc::new(SystemClock))
        }

        pub fn with_config(puzzle: Puzzle, clock: Arc<dyn Clock>) -> Self {
            let mut ledger = Self {
                blocks: Vec::new(),
                puzzle,
                clock,
            };
            ledger.create_genesis();
            ledger
        }

        fn create_genesis(&mut self) {
            let genesis = Block::genesis(format_timestamp(self.clock.now()));
            self.blocks.push(genesis);
        }

        pub fn latest_block(&self) -> &Block {
            self.blocks
                .last()
                .expect("ledger always holds the genesis block")
        }

        /// Appends a block without checking `solution` or `previous_digest`.
        /// The caller must have solved the puzzle against `latest_block()`
        /// and passed `digest_of(latest_block())`.
        pub fn mine_block(
            &mut self,
            solution: Solution,
            previous_digest: impl Into<String>,
        ) -> Block {
            let sequence_number = self.blocks.len() as u64 + 1;
            let block = Block::new(
                sequence_number,
                format_timestamp(self.clock.now()),
                solution,
                previous_digest,
            );
            self.blocks.push(block.clone());
            info!(sequence_number, solution, "block appended");
            block
        }

        /// Like [`Ledger::mine_block`] but rejects a wrong link or solution.
        pub fn mine_block_verified(
            &mut self,
            solution: Solution,
            previous_digest: impl Into<String>,
        ) -> Result<Block, LedgerError> {
            let previous_digest = previous_digest.into();
            let latest = self.latest_block();
            let expected = digest_of(latest);
            if previous_digest != expected {
                return Err(LedgerError::PreviousDigestMismatch {
                    expected,
                    actual: previous_digest,
                });
            }
            if !self.puzzle.verify(solution, latest.solution) {
                return Err(LedgerError::InvalidSolution {
                    solution,
                    previous: latest.solution,
                });
            }
            Ok(self.mine_block(solution, previous_digest))
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        /// Never true; genesis is created with the ledger.
        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        pub fn puzzle(&self) -> Puzzle {
            self.puzzle
        }

        pub fn is_valid(&self) -> bool {
            validate_with(&self.puzzle, &self.blocks)
        }
    }

    pub fn digest_of(block: &Block) -> String {
        block.digest()
    }

    /// Validates `chain` against the default puzzle.
    pub fn validate(chain: &[Block]) -> bool {
        validate_with(&Puzzle::default(), chain)
    }

    pub fn validate_with(puzzle: &Puzzle, chain: &[Block]) -> bool {
        check_chain(puzzle, chain).is_ok()
    }

    /// Walks the chain from the second block, checking each block's link
    /// and puzzle solution against its predecessor. Stops at the first fault.
    pub fn check_chain(puzzle: &Puzzle, chain: &[Block]) -> Result<(), ChainFault> {
        for pair in chain.windows(2) {
            let (previous, block) = (&pair[0], &pair[1]);
            if block.previous_digest != digest_of(previous) {
                debug!(sequence_number = block.sequence_number, "broken link");
                return Err(ChainFault::BrokenLink {
                    sequence_number: block.sequence_number,
                });
            }
            if !puzzle.verify(block.solution, previous.solution) {
                debug!(sequence_number = block.sequence_number, "unsolved puzzle");
                return Err(ChainFault::UnsolvedPuzzle {
                    sequence_number: block.sequence_number,
                });
            }
        }
        Ok(())
    }
}

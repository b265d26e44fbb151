//! Process-wide ledger shared between request handlers.
//!
//! Miners are serialised by one mutex; the chain itself sits behind a
//! read/write lock that is only taken for writing during the final append.
//! The puzzle search runs with neither lock held for writing, so readers
//! keep going while a block is being mined.

use crate::{
    chain::{digest_of, validate_with, Ledger},
    constants::{NOT_VALID_MESSAGE, VALID_MESSAGE},
    mine::solve_parallel,
    pow::SearchLimits,
    Block, LedgerError,
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MiningConfig {
    /// Use the rayon window search instead of the sequential one.
    pub parallel: bool,
    pub max_attempts: Option<u64>,
}

/// Full copy of the chain plus its length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    NotValid,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn message(self) -> &'static str {
        match self {
            Validity::Valid => VALID_MESSAGE,
            Validity::NotValid => NOT_VALID_MESSAGE,
        }
    }
}

impl From<bool> for Validity {
    fn from(valid: bool) -> Self {
        if valid {
            Validity::Valid
        } else {
            Validity::NotValid
        }
    }
}

struct Inner {
    chain: RwLock<Ledger>,
    miner: Mutex<()>,
    cancel: AtomicBool,
    config: MiningConfig,
}

#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Inner>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger, config: MiningConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                chain: RwLock::new(ledger),
                miner: Mutex::new(()),
                cancel: AtomicBool::new(false),
                config,
            }),
        }
    }

    pub fn config(&self) -> MiningConfig {
        self.inner.config
    }

    /// Solves the puzzle against the tip and appends the resulting block.
    /// Blocks the calling thread for the length of the search.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        let _miner = self.inner.miner.lock();

        let (tip, puzzle) = {
            let chain = self.inner.chain.read();
            (chain.latest_block().clone(), chain.puzzle())
        };

        let limits = SearchLimits {
            max_attempts: self.inner.config.max_attempts,
            cancel: Some(&self.inner.cancel),
        };
        let solved = if self.inner.config.parallel {
            solve_parallel(&puzzle, tip.solution, limits)
        } else {
            puzzle.search(tip.solution, limits)
        };
        let solution = solved.inspect_err(|err| warn!(%err, "mining aborted"))?;

        let previous_digest = digest_of(&tip);
        let block = self.inner.chain.write().mine_block(solution, previous_digest);
        info!(
            sequence_number = block.sequence_number,
            solution, "mined block"
        );
        Ok(block)
    }

    pub fn latest_block(&self) -> Block {
        self.inner.chain.read().latest_block().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.chain.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.chain.read().is_empty()
    }

    pub fn read_chain(&self) -> ChainSnapshot {
        let chain = self.inner.chain.read();
        ChainSnapshot {
            chain: chain.blocks().to_vec(),
            length: chain.len(),
        }
    }

    pub fn check_validity(&self) -> Validity {
        let chain = self.inner.chain.read();
        validate_with(&chain.puzzle(), chain.blocks()).into()
    }

    /// Stops the running search, if any, and every later one.
    pub fn cancel_mining(&self) {
        self.inner.cancel.store(true, Ordering::Relaxed);
    }
}

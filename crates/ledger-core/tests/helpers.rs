#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use ledger_core::{digest_of, Block, FixedClock, Ledger, Puzzle, SharedLedger, MiningConfig};
use std::sync::Arc;

pub const CREATED_AT: &str = "Thu Jan 01 2026 00:00:00 GMT+0000";

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    ))
}

/// Ledger with a two-zero puzzle so tests mine in milliseconds.
pub fn easy_ledger() -> Ledger {
    Ledger::with_config(Puzzle::new(2).expect("valid difficulty"), fixed_clock())
}

pub fn easy_shared(config: MiningConfig) -> SharedLedger {
    SharedLedger::new(easy_ledger(), config)
}

/// Mines `count` blocks the way the node does: solve against the tip,
/// digest the tip, then append.
pub fn mine_blocks(ledger: &mut Ledger, count: usize) -> Vec<Block> {
    let puzzle = ledger.puzzle();
    (0..count)
        .map(|_| {
            let tip = ledger.latest_block().clone();
            let solution = puzzle.solve(tip.solution);
            ledger.mine_block(solution, digest_of(&tip))
        })
        .collect()
}

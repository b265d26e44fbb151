pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// Leading `'0'` hex characters a puzzle digest must start with.
pub const DIFFICULTY: usize = 5;
pub const GENESIS_SOLUTION: u64 = 1;
pub const GENESIS_PREVIOUS_DIGEST: &str = "0";
/// How often (in attempts) a cancellable search polls its flag.
pub const CANCEL_POLL_INTERVAL: u64 = 4096;
/// Candidates handed to the parallel solver per window.
pub const PARALLEL_WINDOW: u64 = 1 << 16;
/// Mirrors the shape of a JavaScript `Date#toString`.
pub const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
pub const VALID_MESSAGE: &str = "The Blockchain is valid.";
pub const NOT_VALID_MESSAGE: &str = "The Blockchain is not valid.";

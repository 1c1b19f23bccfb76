//! Ledger engine constants

/// Default retention window: how far below the best height a new block may
/// still attach, and how long losing forks are kept in memory.
pub const DEFAULT_CUTOFF_AGE: u64 = 10;

/// Block reward paid by a coinbase transaction.
pub const COINBASE_REWARD: i64 = 25;

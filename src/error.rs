//! Rejection reasons for transactions and blocks
//!
//! Invalid transactions and blocks are expected operational input, so both
//! enums are ordinary values carried back to the caller, never panics. Each
//! variant renders a human-readable reason via `thiserror`.

use crate::types::{BlockHash, UtxoId};
use thiserror::Error;

/// Why a single transaction failed validation.
///
/// Variants are ordered the way the checks run; validation short-circuits
/// on the first failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxReject {
    #[error("input {input} references {id}, which is not in the current snapshot")]
    MissingUtxo { input: usize, id: UtxoId },

    #[error("signature on input {input} does not verify under the owning address")]
    BadSignature { input: usize },

    #[error("input {input} claims {id}, already claimed by an earlier input")]
    DuplicateUtxo { input: usize, id: UtxoId },

    #[error("output {index} has negative value {value}")]
    NegativeOutput { index: usize, value: i64 },

    #[error("input sum {input_sum} is below output sum {output_sum}")]
    InputSumTooLow { input_sum: i64, output_sum: i64 },
}

/// Why a block was refused admission into the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockReject {
    /// Only the genesis block supplied at construction may omit a previous
    /// hash; a second genesis is never admissible.
    #[error("block declares no previous-block hash")]
    MissingPrevHash,

    /// Unknown parents are not buffered for retry; the block is discarded.
    #[error("previous block {0} is not in the retained forest")]
    UnknownParent(BlockHash),

    /// Block acceptance is all-or-nothing.
    #[error("only {accepted} of {proposed} transactions are mutually valid")]
    InvalidTransactions { accepted: usize, proposed: usize },

    /// The candidate attaches too far below the best branch.
    #[error("height {height} is at or below the cutoff (best height {best_height}, cutoff age {cutoff_age})")]
    StaleHeight {
        height: u64,
        best_height: u64,
        cutoff_age: u64,
    },
}

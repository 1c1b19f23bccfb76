//! # utxo-ledger
//!
//! A minimal ledger-validation and fork-choice engine over unspent
//! transaction outputs.
//!
//! Given an unordered batch of proposed transactions, the engine decides
//! which subset is mutually consistent with a ledger snapshot; given a
//! tree of candidate blocks, it decides which one extends the canonical
//! chain.
//!
//! ## Architecture
//!
//! - [`LedgerSnapshot`]: passive UTXO store, deep-copyable.
//! - [`TxValidator`]: validates single transactions and greedily selects
//!   a maximal conflict-free ordered subset from a candidate batch.
//! - [`BlockNode`]: an admitted block bound to its parent, derived height
//!   and resulting snapshot.
//! - [`ChainManager`]: the block forest, longest-chain fork choice with
//!   incumbent-wins ties, the pending-transaction pool and an eager
//!   retention window.
//!
//! ## Design principles
//!
//! 1. **Invalidity is data**: rejected transactions and blocks come back
//!    as typed reasons, never as panics.
//! 2. **All-or-nothing admission**: a block with one bad transaction
//!    leaves the forest untouched.
//! 3. **Bounded memory**: nodes outside the retention window are evicted
//!    as soon as the best pointer moves.
//! 4. **Exact version pinning** for the cryptographic dependencies.
//!
//! ## Usage
//!
//! ```rust
//! use utxo_ledger::{Block, ChainManager, Transaction, crypto};
//!
//! let (_, miner) = crypto::keypair(&[1u8; 32]);
//! let mut genesis = Block::genesis(Transaction::coinbase(25, miner));
//! genesis.finalize();
//!
//! let chain = ChainManager::new(genesis);
//! assert_eq!(chain.best_height(), 1);
//! assert_eq!(chain.best_snapshot().len(), 1);
//! ```

pub mod block;
pub mod chain;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod types;
pub mod validator;

// Re-export the working surface
pub use block::Block;
pub use chain::{BlockNode, ChainManager};
pub use constants::{COINBASE_REWARD, DEFAULT_CUTOFF_AGE};
pub use error::{BlockReject, TxReject};
pub use ledger::LedgerSnapshot;
pub use transaction::{Input, Transaction};
pub use types::{Address, BlockHash, Output, TxHash, UtxoId};
pub use validator::TxValidator;

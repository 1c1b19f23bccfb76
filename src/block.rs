//! Block value object
//!
//! A block binds a previous-block hash (absent only for genesis), one
//! distinguished coinbase transaction and an ordered list of ordinary
//! transactions. Like transactions, blocks are finalized exactly once and
//! the resulting hash is their identity.

use crate::crypto;
use crate::transaction::Transaction;
use crate::types::{BlockHash, HASH_LEN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    prev_hash: Option<BlockHash>,
    coinbase: Transaction,
    transactions: Vec<Transaction>,
    hash: Option<BlockHash>,
}

impl Block {
    /// Start a block extending `prev_hash`.
    pub fn new(prev_hash: BlockHash, coinbase: Transaction) -> Self {
        Self::build(Some(prev_hash), coinbase)
    }

    /// Start a genesis block (no previous hash).
    pub fn genesis(coinbase: Transaction) -> Self {
        Self::build(None, coinbase)
    }

    fn build(prev_hash: Option<BlockHash>, coinbase: Transaction) -> Self {
        debug_assert!(coinbase.is_finalized(), "coinbase must be finalized");
        debug_assert!(coinbase.inputs().is_empty(), "coinbase takes no inputs");
        Block {
            prev_hash,
            coinbase,
            transactions: Vec::new(),
            hash: None,
        }
    }

    /// Append a finalized ordinary transaction.
    pub fn add_transaction(&mut self, tx: Transaction) {
        debug_assert!(self.hash.is_none(), "block already finalized");
        debug_assert!(tx.is_finalized(), "transactions must be finalized");
        self.transactions.push(tx);
    }

    /// Compute the content hash over the previous hash, the coinbase and
    /// every transaction identity. First call wins; later calls are no-ops.
    pub fn finalize(&mut self) {
        if self.hash.is_some() {
            return;
        }
        let mut buf = Vec::new();
        match self.prev_hash {
            Some(prev) => buf.extend_from_slice(prev.as_bytes()),
            None => buf.extend_from_slice(&[0u8; HASH_LEN]),
        }
        buf.extend_from_slice(self.coinbase.hash().as_bytes());
        for tx in &self.transactions {
            buf.extend_from_slice(tx.hash().as_bytes());
        }
        self.hash = Some(BlockHash(crypto::digest(&buf)));
    }

    pub fn is_finalized(&self) -> bool {
        self.hash.is_some()
    }

    /// Identity of a finalized block.
    pub fn hash(&self) -> BlockHash {
        self.hash.expect("block not finalized")
    }

    pub fn prev_hash(&self) -> Option<BlockHash> {
        self.prev_hash
    }

    pub fn coinbase(&self) -> &Transaction {
        &self.coinbase
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

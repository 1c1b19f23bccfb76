//! Block forest maintenance and fork choice
//!
//! [`ChainManager`] owns a forest of [`BlockNode`]s keyed by block hash,
//! a best-branch pointer and the pending-transaction pool. Admission
//! re-validates every transaction of a candidate block against the
//! parent's snapshot, enforces the liveness window and is all-or-nothing.
//! Fork choice is longest-chain with ties favoring the incumbent. Nodes
//! that fall out of the retention window are evicted eagerly so memory
//! stays bounded by the window, not by chain history.

use crate::block::Block;
use crate::constants::DEFAULT_CUTOFF_AGE;
use crate::error::BlockReject;
use crate::ledger::LedgerSnapshot;
use crate::transaction::Transaction;
use crate::types::{BlockHash, TxHash, UtxoId};
use crate::validator::TxValidator;
use log::debug;
use std::collections::{HashMap, HashSet};

/// A block admitted into the chain: the block itself, its parent link,
/// its derived height and exclusive ownership of the ledger snapshot that
/// results from applying it. Never mutated after construction.
pub struct BlockNode {
    block: Block,
    parent: Option<BlockHash>,
    height: u64,
    snapshot: LedgerSnapshot,
}

impl BlockNode {
    /// Wrap `block` under `parent`, taking ownership of `snapshot`.
    /// Height is derived once here: genesis is 1, otherwise parent + 1.
    pub fn new(block: Block, parent: Option<&BlockNode>, snapshot: LedgerSnapshot) -> Self {
        let (parent, height) = match parent {
            Some(node) => (Some(node.block.hash()), node.height + 1),
            None => (None, 1),
        };
        BlockNode {
            block,
            parent,
            height,
            snapshot,
        }
    }

    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn parent_hash(&self) -> Option<BlockHash> {
        self.parent
    }

    /// Defensive copy of this node's snapshot. The canonical instance
    /// stays owned by the node so callers cannot corrupt it.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.snapshot.clone()
    }

    fn snapshot_ref(&self) -> &LedgerSnapshot {
        &self.snapshot
    }
}

/// The block-tree maintainer: forest, best pointer, pending pool,
/// retention window.
pub struct ChainManager {
    forest: HashMap<BlockHash, BlockNode>,
    best: BlockHash,
    pending: HashMap<TxHash, Transaction>,
    cutoff_age: u64,
}

impl ChainManager {
    /// Build a chain holding only `genesis`, with the default retention
    /// window. The genesis block is assumed valid; its snapshot is built
    /// from its coinbase outputs alone.
    pub fn new(genesis: Block) -> Self {
        Self::with_cutoff(genesis, DEFAULT_CUTOFF_AGE)
    }

    /// Same as [`new`](Self::new) with an explicit retention window.
    pub fn with_cutoff(genesis: Block, cutoff_age: u64) -> Self {
        let mut snapshot = LedgerSnapshot::new();
        add_coinbase_outputs(&mut snapshot, genesis.coinbase());

        let node = BlockNode::new(genesis, None, snapshot);
        let best = node.block.hash();

        let mut forest = HashMap::new();
        forest.insert(best, node);

        ChainManager {
            forest,
            best,
            pending: HashMap::new(),
            cutoff_age,
        }
    }

    /// Try to admit `block` into the forest.
    ///
    /// Rejections are expected outcomes, reported as a [`BlockReject`]
    /// reason; no partial state is ever committed for a rejected block.
    /// On success the node is inserted, included transactions leave the
    /// pending pool, the best pointer moves if the new height strictly
    /// exceeds the old best, and out-of-window nodes are evicted.
    pub fn admit_block(&mut self, block: Block) -> Result<(), BlockReject> {
        // A second genesis is never admissible after construction.
        let prev = match block.prev_hash() {
            Some(prev) => prev,
            None => {
                debug!("rejecting block: no previous hash");
                return Err(BlockReject::MissingPrevHash);
            }
        };

        // No orphan buffering: a block referencing a parent outside the
        // retained forest is discarded for good.
        let parent = match self.forest.get(&prev) {
            Some(parent) => parent,
            None => {
                debug!("rejecting block {}: unknown parent {}", block.hash(), prev);
                return Err(BlockReject::UnknownParent(prev));
            }
        };
        let parent_height = parent.height;

        // Fresh single-use validator seeded from the parent's snapshot;
        // acceptance is all-or-nothing.
        let mut validator = TxValidator::new(parent.snapshot_ref());
        let proposed = block.transactions().len();
        let accepted = validator.select_and_apply(block.transactions());
        if accepted.len() != proposed {
            debug!(
                "rejecting block {}: {} of {} transactions valid",
                block.hash(),
                accepted.len(),
                proposed
            );
            return Err(BlockReject::InvalidTransactions {
                accepted: accepted.len(),
                proposed,
            });
        }

        // Liveness window: the candidate must land strictly above
        // best_height - cutoff_age. Written addition-side to avoid
        // underflow while the chain is still short.
        let height = parent_height + 1;
        let best_height = self.best_height();
        if height + self.cutoff_age <= best_height {
            debug!(
                "rejecting block {}: height {} too far below best {}",
                block.hash(),
                height,
                best_height
            );
            return Err(BlockReject::StaleHeight {
                height,
                best_height,
                cutoff_age: self.cutoff_age,
            });
        }

        let mut snapshot = validator.into_snapshot();
        add_coinbase_outputs(&mut snapshot, block.coinbase());

        // Included transactions leave the pending pool, once each, by hash.
        for tx in block.transactions() {
            self.pending.remove(&tx.hash());
        }

        let hash = block.hash();
        let node = BlockNode::new(block, self.forest.get(&prev), snapshot);
        debug_assert_eq!(node.height, height, "parent vanished during admission");
        self.forest.insert(hash, node);
        debug!("admitted block {} at height {}", hash, height);

        // Strict '>' keeps the incumbent on height ties: first to reach a
        // height wins.
        if height > best_height {
            self.best = hash;
            self.prune();
        }

        Ok(())
    }

    /// Record `tx` as known-but-unconfirmed. No validation happens here;
    /// validity is re-derived when the transaction is included in a block.
    pub fn add_pending_transaction(&mut self, tx: Transaction) {
        self.pending.insert(tx.hash(), tx);
    }

    /// The block at the tip of the best branch.
    pub fn best_block(&self) -> &Block {
        &self.best_node().block
    }

    pub fn best_height(&self) -> u64 {
        self.best_node().height
    }

    /// Copy of the best branch's ledger snapshot, for assembling the next
    /// candidate block.
    pub fn best_snapshot(&self) -> LedgerSnapshot {
        self.best_node().snapshot()
    }

    /// Transactions known but not yet included in any admitted block.
    pub fn pending_pool(&self) -> &HashMap<TxHash, Transaction> {
        &self.pending
    }

    /// Whether `hash` is still in the retained forest.
    pub fn contains_block(&self, hash: &BlockHash) -> bool {
        self.forest.contains_key(hash)
    }

    /// Number of retained nodes, best branch included.
    pub fn retained_blocks(&self) -> usize {
        self.forest.len()
    }

    fn best_node(&self) -> &BlockNode {
        self.forest
            .get(&self.best)
            .expect("best pointer must reference a retained node")
    }

    /// Evict every node that has fallen more than `cutoff_age` below the
    /// best height and is not an ancestor of the best node. Runs after
    /// each best-pointer move; the bounded-memory guarantee depends on it.
    fn prune(&mut self) {
        let best_height = self.best_height();
        if best_height <= self.cutoff_age {
            return;
        }
        let cutoff = best_height - self.cutoff_age;

        let mut best_branch = HashSet::new();
        let mut cursor = Some(self.best);
        while let Some(hash) = cursor {
            best_branch.insert(hash);
            cursor = self.forest.get(&hash).and_then(|node| node.parent);
        }

        let before = self.forest.len();
        self.forest
            .retain(|hash, node| node.height >= cutoff || best_branch.contains(hash));
        let evicted = before - self.forest.len();
        if evicted > 0 {
            debug!("evicted {} nodes below height {}", evicted, cutoff);
        }
    }
}

/// Fold a block's coinbase outputs into `snapshot`, keyed by the coinbase
/// hash and output position.
fn add_coinbase_outputs(snapshot: &mut LedgerSnapshot, coinbase: &Transaction) {
    let txid = coinbase.hash();
    for (k, output) in coinbase.outputs().iter().enumerate() {
        snapshot.put(UtxoId::new(txid, k as u32), output.clone());
    }
}

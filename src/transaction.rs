//! Transaction value object
//!
//! A transaction is built incrementally (inputs, outputs, signatures) and
//! then finalized exactly once, at which point its double-SHA-256 content
//! hash becomes its identity. Finalized transactions are immutable.

use crate::crypto;
use crate::types::{Address, Output, TxHash, UtxoId};
use serde::{Deserialize, Serialize};

/// A reference to an unspent output, plus the signature authorizing its
/// spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub prev_txid: TxHash,
    pub output_index: u32,
    pub signature: Vec<u8>,
}

impl Input {
    /// The unspent-output identifier this input claims.
    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::new(self.prev_txid, self.output_index)
    }
}

/// An ordered list of inputs and outputs with a one-time content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    hash: Option<TxHash>,
}

impl Transaction {
    /// Start an empty, unfinalized transaction.
    pub fn new() -> Self {
        Transaction {
            inputs: Vec::new(),
            outputs: Vec::new(),
            hash: None,
        }
    }

    /// Build a finalized coinbase: no inputs, one reward output.
    pub fn coinbase(value: i64, address: Address) -> Self {
        let mut tx = Transaction::new();
        tx.add_output(value, address);
        tx.finalize();
        tx
    }

    /// Append an input claiming output `output_index` of `prev_txid`, with
    /// an empty signature slot.
    pub fn add_input(&mut self, prev_txid: TxHash, output_index: u32) {
        debug_assert!(self.hash.is_none(), "transaction already finalized");
        self.inputs.push(Input {
            prev_txid,
            output_index,
            signature: Vec::new(),
        });
    }

    /// Append an output of `value` owned by `address`.
    pub fn add_output(&mut self, value: i64, address: Address) {
        debug_assert!(self.hash.is_none(), "transaction already finalized");
        self.outputs.push(Output::new(value, address));
    }

    /// Attach the signature for input `index`.
    pub fn set_signature(&mut self, index: usize, signature: Vec<u8>) {
        debug_assert!(self.hash.is_none(), "transaction already finalized");
        self.inputs[index].signature = signature;
    }

    /// The canonical bytes input `index`'s signature must cover: that
    /// input's claimed outpoint plus every output. Signature fields are
    /// excluded by construction, so the payload is stable before and after
    /// signing.
    pub fn signing_payload(&self, index: usize) -> Vec<u8> {
        let input = &self.inputs[index];
        let mut buf = Vec::new();
        buf.extend_from_slice(input.prev_txid.as_bytes());
        buf.extend_from_slice(&input.output_index.to_le_bytes());
        push_outputs(&mut buf, &self.outputs);
        buf
    }

    /// Compute the content hash. The first call fixes the hash as this
    /// transaction's identity; later calls are no-ops.
    pub fn finalize(&mut self) {
        if self.hash.is_none() {
            self.hash = Some(TxHash(crypto::digest(&self.content_bytes())));
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.hash.is_some()
    }

    /// Identity of a finalized transaction.
    pub fn hash(&self) -> TxHash {
        self.hash.expect("transaction not finalized")
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Canonical serialization the content hash commits to: every input
    /// including its signature, then every output.
    fn content_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for input in &self.inputs {
            buf.extend_from_slice(input.prev_txid.as_bytes());
            buf.extend_from_slice(&input.output_index.to_le_bytes());
            buf.extend_from_slice(&(input.signature.len() as u32).to_le_bytes());
            buf.extend_from_slice(&input.signature);
        }
        push_outputs(&mut buf, &self.outputs);
        buf
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction::new()
    }
}

fn push_outputs(buf: &mut Vec<u8>, outputs: &[Output]) {
    for output in outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        buf.extend_from_slice(output.address.as_bytes());
    }
}

//! Per-batch transaction validation and greedy selection
//!
//! A [`TxValidator`] owns a private working copy of a ledger snapshot and
//! is single-use: one validation attempt per instance. `check` is a pure
//! read; `select_and_apply` mutates the working snapshot as it accepts
//! candidates, which is what makes intra-batch chaining and first-wins
//! double-spend resolution fall out of a plain left-to-right pass.

use crate::crypto;
use crate::error::TxReject;
use crate::ledger::LedgerSnapshot;
use crate::transaction::Transaction;
use crate::types::UtxoId;
use log::debug;
use std::collections::HashSet;

pub struct TxValidator {
    snapshot: LedgerSnapshot,
}

impl TxValidator {
    /// Seed a validator with an independent copy of `snapshot`. The
    /// caller's snapshot is never mutated.
    pub fn new(snapshot: &LedgerSnapshot) -> Self {
        TxValidator {
            snapshot: snapshot.clone(),
        }
    }

    /// Check `tx` against the current working snapshot.
    ///
    /// Rules, in order, short-circuiting on the first failure:
    /// 1. every claimed UTXO exists in the working snapshot,
    /// 2. each input's signature verifies under the owning output's
    ///    address over that input's signing payload,
    /// 3. no UTXO is claimed twice within the transaction,
    /// 4. every output value is non-negative,
    /// 5. input sum covers output sum (the difference is an implicit fee).
    ///
    /// Never mutates state; an invalid transaction is an expected outcome,
    /// not an error.
    pub fn check(&self, tx: &Transaction) -> Result<(), TxReject> {
        let mut claimed = HashSet::new();
        let mut input_sum: i64 = 0;

        for (i, input) in tx.inputs().iter().enumerate() {
            let id = input.utxo_id();

            let origin = self
                .snapshot
                .get(&id)
                .ok_or(TxReject::MissingUtxo { input: i, id })?;

            if !crypto::verify(&origin.address, &tx.signing_payload(i), &input.signature) {
                return Err(TxReject::BadSignature { input: i });
            }

            if !claimed.insert(id) {
                return Err(TxReject::DuplicateUtxo { input: i, id });
            }

            input_sum += origin.value;
        }

        let mut output_sum: i64 = 0;
        for (i, output) in tx.outputs().iter().enumerate() {
            if output.value < 0 {
                return Err(TxReject::NegativeOutput {
                    index: i,
                    value: output.value,
                });
            }
            output_sum += output.value;
        }

        if input_sum < output_sum {
            return Err(TxReject::InputSumTooLow {
                input_sum,
                output_sum,
            });
        }

        Ok(())
    }

    /// Boolean view of [`check`](Self::check).
    pub fn is_valid(&self, tx: &Transaction) -> bool {
        match self.check(tx) {
            Ok(()) => true,
            Err(reason) => {
                debug!("transaction {} invalid: {}", tx.hash(), reason);
                false
            }
        }
    }

    /// Greedy left-to-right pass over `candidates`.
    ///
    /// Each candidate is checked against the snapshot as mutated by the
    /// candidates already accepted in this call; accepted transactions
    /// have their inputs removed and outputs added before the next
    /// candidate runs. Invalid candidates are dropped silently. Ordering
    /// is significant: of two transactions spending the same UTXO, only
    /// the earlier is accepted, while a transaction spending an output
    /// produced earlier in the same batch is acceptable.
    pub fn select_and_apply(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        let mut accepted = Vec::new();

        for tx in candidates {
            match self.check(tx) {
                Err(reason) => {
                    debug!("dropping transaction {}: {}", tx.hash(), reason);
                }
                Ok(()) => {
                    self.apply(tx);
                    accepted.push(tx.clone());
                }
            }
        }

        accepted
    }

    /// The working snapshot as it stands now.
    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    /// Consume the validator, yielding the post-application snapshot.
    pub fn into_snapshot(self) -> LedgerSnapshot {
        self.snapshot
    }

    /// Fold an accepted transaction into the working snapshot: claimed
    /// UTXOs out, produced outputs in, keyed by the transaction's own
    /// hash and output position.
    fn apply(&mut self, tx: &Transaction) {
        for input in tx.inputs() {
            self.snapshot.remove(&input.utxo_id());
        }
        let txid = tx.hash();
        for (k, output) in tx.outputs().iter().enumerate() {
            self.snapshot.put(UtxoId::new(txid, k as u32), output.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Output, TxHash, UtxoId};

    // Signature-free paths only; the signed cases live in
    // tests/validator_tests.rs with real keys.

    fn seeded(entries: &[(UtxoId, i64)]) -> LedgerSnapshot {
        let mut snapshot = LedgerSnapshot::new();
        for (id, value) in entries {
            snapshot.put(*id, Output::new(*value, Address([2; 33])));
        }
        snapshot
    }

    #[test]
    fn test_missing_utxo_rejected_first() {
        let validator = TxValidator::new(&seeded(&[]));
        let mut tx = Transaction::new();
        tx.add_input(TxHash([1; 32]), 0);
        tx.add_output(-5, Address([2; 33])); // also negative, but rule 1 fires first
        tx.finalize();

        assert!(matches!(
            validator.check(&tx),
            Err(TxReject::MissingUtxo { input: 0, .. })
        ));
    }

    #[test]
    fn test_check_does_not_mutate_snapshot() {
        let id = UtxoId::new(TxHash([1; 32]), 0);
        let validator = TxValidator::new(&seeded(&[(id, 10)]));
        let mut tx = Transaction::new();
        tx.add_input(TxHash([1; 32]), 0);
        tx.finalize();

        let _ = validator.check(&tx);
        assert!(validator.snapshot().contains(&id));
    }

    #[test]
    fn test_select_and_apply_drops_invalid_keeps_going() {
        let id = UtxoId::new(TxHash([1; 32]), 0);
        let mut validator = TxValidator::new(&seeded(&[(id, 10)]));

        // Spends a UTXO that was never in the snapshot.
        let mut bogus = Transaction::new();
        bogus.add_input(TxHash([9; 32]), 0);
        bogus.finalize();

        // Valid zero-output spend needs a signature, so use a coinbase-like
        // no-input transaction, which passes every rule trivially.
        let mut free = Transaction::new();
        free.add_output(0, Address([2; 33]));
        free.finalize();

        let accepted = validator.select_and_apply(&[bogus, free.clone()]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].hash(), free.hash());
        // The accepted transaction's output landed in the snapshot.
        assert!(validator
            .snapshot()
            .contains(&UtxoId::new(free.hash(), 0)));
    }

    #[test]
    fn test_into_snapshot_returns_working_state() {
        let id = UtxoId::new(TxHash([1; 32]), 0);
        let validator = TxValidator::new(&seeded(&[(id, 10)]));
        let snapshot = validator.into_snapshot();
        assert!(snapshot.contains(&id));
    }
}

//! Core value types for ledger validation
//!
//! Every identifier here has structural equality and hashing so it can be
//! used directly as a map key; nothing in the engine compares by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a content hash in bytes.
pub const HASH_LEN: usize = 32;

/// Length of an address (compressed secp256k1 public key) in bytes.
pub const ADDRESS_LEN: usize = 33;

/// Content hash of a finalized transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxHash(pub [u8; HASH_LEN]);

/// Content hash of a finalized block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockHash(pub [u8; HASH_LEN]);

impl TxHash {
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl BlockHash {
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({}..)", hex::encode(&self.0[..4]))
    }
}

/// Owner address: a compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}..)", hex::encode(&self.0[..4]))
    }
}

// serde derives stop at 32-byte arrays, so the 33-byte address is
// serialized as a hex string.
impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("address must be 33 bytes"))?;
        Ok(Address(bytes))
    }
}

/// Unspent-output identifier: (originating transaction, output position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtxoId {
    pub txid: TxHash,
    pub index: u32,
}

impl UtxoId {
    pub fn new(txid: TxHash, index: u32) -> Self {
        UtxoId { txid, index }
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// A transaction output: a value owned by an address.
///
/// Immutable once attached to a finalized transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub value: i64,
    pub address: Address,
}

impl Output {
    pub fn new(value: i64, address: Address) -> Self {
        Output { value, address }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_utxo_id_structural_equality() {
        let a = UtxoId::new(TxHash([7; 32]), 1);
        let b = UtxoId::new(TxHash([7; 32]), 1);
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, "first");
        // A freshly built identifier with the same fields hits the same slot.
        assert_eq!(map.get(&b), Some(&"first"));
    }

    #[test]
    fn test_utxo_id_index_matters() {
        let a = UtxoId::new(TxHash([7; 32]), 0);
        let b = UtxoId::new(TxHash([7; 32]), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_display_is_hex() {
        let hash = TxHash([0xab; 32]);
        assert_eq!(hash.to_string(), "ab".repeat(32));
    }

    #[test]
    fn test_address_serde_round_trip() {
        let address = Address([0x02; 33]);
        let json = serde_json::to_string(&address).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address, back);
    }

    #[test]
    fn test_address_deserialize_wrong_length() {
        let result: Result<Address, _> = serde_json::from_str("\"0202\"");
        assert!(result.is_err());
    }
}

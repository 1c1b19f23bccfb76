//! Cryptographic capabilities: content hashing and signature verification
//!
//! The ledger engine treats both as fast, synchronous primitives. Hashing
//! is double SHA-256 over a canonical serialization; signatures are
//! DER-encoded ECDSA over secp256k1, verified under the owning output's
//! address (a compressed public key). Malformed keys or signatures simply
//! fail verification; they are never surfaced as errors.

use crate::types::Address;
use bitcoin_hashes::{sha256d, Hash as _, HashEngine};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1};
pub use secp256k1::SecretKey;
use sha2::{Digest, Sha256};

/// Double SHA-256 over `bytes`.
pub fn digest(bytes: &[u8]) -> [u8; 32] {
    let mut engine = sha256d::Hash::engine();
    engine.input(bytes);
    sha256d::Hash::from_engine(engine).into_inner()
}

/// Verify a DER signature over `message` under `address`.
///
/// Returns false for unparsable addresses or signatures as well as for
/// honest verification failures.
pub fn verify(address: &Address, message: &[u8], signature: &[u8]) -> bool {
    let pubkey = match PublicKey::from_slice(address.as_bytes()) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    let signature = match Signature::from_der(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    let digest = Sha256::digest(message);
    let message = match Message::from_digest_slice(&digest) {
        Ok(msg) => msg,
        Err(_) => return false,
    };

    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
}

/// Produce a DER signature over `message` with `secret`.
///
/// Counterpart of [`verify`]; used by block assemblers and tests. The core
/// validation path never signs.
pub fn sign(secret: &SecretKey, message: &[u8]) -> Vec<u8> {
    let secp = Secp256k1::signing_only();
    let digest = Sha256::digest(message);
    let message = Message::from_digest_slice(&digest).expect("sha256 digest is 32 bytes");
    secp.sign_ecdsa(&message, secret).serialize_der().to_vec()
}

/// Derive a deterministic keypair from a 32-byte seed.
///
/// The seed must be a valid secp256k1 scalar (any low, non-zero byte
/// pattern works).
pub fn keypair(seed: &[u8; 32]) -> (SecretKey, Address) {
    let secp = Secp256k1::signing_only();
    let secret = SecretKey::from_slice(seed).expect("seed is not a valid secp256k1 scalar");
    let address = Address(PublicKey::from_secret_key(&secp, &secret).serialize());
    (secret, address)
}

//! In-process Ed25519 signer/verifier used as ground truth.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

pub use ed25519_dalek::SIGNATURE_LENGTH;

/// Detached Ed25519 signature over `message`. Total for every message
/// length, including zero.
pub fn sign(key: &SigningKey, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
    key.sign(message).to_bytes()
}

/// `sign`, in the canonical encoding used for comparison and reporting
/// (standard base64 alphabet, padded, no line wraps).
pub fn sign_base64(key: &SigningKey, message: &[u8]) -> String {
    STANDARD.encode(sign(key, message))
}

/// Whether `signature` is a valid signature of `message` under `key`.
///
/// Verification failure is a normal outcome, not an error: wrong-length or
/// otherwise malformed signatures return `false` like any invalid one.
pub fn verify(key: &VerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    match Signature::from_slice(signature) {
        Ok(sig) => key.verify(message, &sig).is_ok(),
        Err(_) => false,
    }
}

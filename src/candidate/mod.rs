//! Candidate implementation boundary: an opaque sign capability reachable
//! only through a narrow external interface.

mod subprocess;

pub use subprocess::{DEFAULT_TIMEOUT_SECS, SubprocessSigner};

use crate::errors::HarnessError;

/// An implementation under test.
///
/// The differential loop only depends on this seam, so the subprocess-backed
/// signer could be swapped for an in-process or network-backed candidate
/// without touching the loop.
pub trait CandidateSigner {
    /// Obtains the candidate's signature for `message` under the secret key
    /// given as lowercase hex. The returned string is the candidate's
    /// base64-encoded signature, taken verbatim.
    async fn sign(&self, secret_hex: &str, message: &[u8]) -> Result<String, HarnessError>;
}

/// Checks that `secret_hex` is a well-formed hex encoding before it is
/// handed across the boundary. A malformed key is a harness defect, not a
/// conformance finding, and must never degrade into a silent empty
/// signature.
pub fn validate_secret_hex(secret_hex: &str) -> Result<(), HarnessError> {
    hex::decode(secret_hex)
        .map_err(|e| HarnessError::MalformedSecretKey(format!("{secret_hex:?}: {e}")))?;
    Ok(())
}

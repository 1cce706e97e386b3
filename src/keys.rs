use ed25519_dalek::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::errors::HarnessError;

/// The single Ed25519 key pair a run is conducted under.
///
/// Generated once at startup and immutable afterwards; the differential loop
/// owns it and lends it to the reference signer, the reference verifier and
/// the candidate driver.
pub struct KeyPair {
    signing: SigningKey,
    verifying: VerifyingKey,
}

impl KeyPair {
    /// Draws a fresh key pair from the OS entropy source.
    ///
    /// # Errors
    /// Returns `HarnessError::Entropy` if the entropy source is unavailable.
    /// That is fatal: without trustworthy key material there is nothing to
    /// test.
    pub fn generate() -> Result<Self, HarnessError> {
        let mut seed = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        getrandom::fill(&mut seed[..]).map_err(|e| HarnessError::Entropy(e.to_string()))?;
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();
        Ok(Self { signing, verifying })
    }

    pub fn signing(&self) -> &SigningKey {
        &self.signing
    }

    pub fn verifying(&self) -> &VerifyingKey {
        &self.verifying
    }

    /// Lowercase hex of the 32-byte secret seed, the sole parameter the
    /// candidate boundary accepts.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing.to_bytes())
    }

    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying.to_bytes()
    }
}

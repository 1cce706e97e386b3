use std::sync::{Arc, Mutex};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::SigningKey;
use sigdiff::candidate::{CandidateSigner, SubprocessSigner};
use sigdiff::errors::HarnessError;
use sigdiff::keys::KeyPair;
use sigdiff::reference;
use sigdiff::runner::DiffRunner;

fn refsign() -> SubprocessSigner {
    SubprocessSigner::new(env!("CARGO_BIN_EXE_refsign"))
}

/// In-process candidate backed by the reference signer itself.
struct InProcessCandidate {
    key: SigningKey,
}

impl CandidateSigner for InProcessCandidate {
    async fn sign(&self, _secret_hex: &str, message: &[u8]) -> Result<String, HarnessError> {
        Ok(reference::sign_base64(&self.key, message))
    }
}

/// Candidate that returns the same string no matter the input.
struct FixedCandidate(&'static str);

impl CandidateSigner for FixedCandidate {
    async fn sign(&self, _secret_hex: &str, _message: &[u8]) -> Result<String, HarnessError> {
        Ok(self.0.to_string())
    }
}

/// Correct candidate that appends a newline, as a sloppy shim would.
struct TrailingNewlineCandidate {
    key: SigningKey,
}

impl CandidateSigner for TrailingNewlineCandidate {
    async fn sign(&self, _secret_hex: &str, message: &[u8]) -> Result<String, HarnessError> {
        Ok(format!("{}\n", reference::sign_base64(&self.key, message)))
    }
}

/// Records the message length of every invocation.
struct RecordingCandidate {
    key: SigningKey,
    lengths: Arc<Mutex<Vec<usize>>>,
}

impl CandidateSigner for RecordingCandidate {
    async fn sign(&self, _secret_hex: &str, message: &[u8]) -> Result<String, HarnessError> {
        self.lengths.lock().unwrap().push(message.len());
        Ok(reference::sign_base64(&self.key, message))
    }
}

#[tokio::test]
async fn loop_passes_with_a_conforming_in_process_candidate() {
    let keys = KeyPair::generate().unwrap();
    let candidate = InProcessCandidate { key: keys.signing().clone() };
    let report = DiffRunner::new(keys, candidate).with_cases(10).quiet().run().await.unwrap();
    assert_eq!(report.cases, 11);
    assert_eq!(report.checks, 22);
}

#[tokio::test]
async fn loop_halts_at_case_zero_on_garbage_output() {
    let keys = KeyPair::generate().unwrap();
    let err = DiffRunner::new(keys, FixedCandidate("definitely not base64"))
        .with_cases(10)
        .quiet()
        .run()
        .await
        .unwrap_err();
    match &err {
        HarnessError::SignatureMismatch { case, message_len, candidate, .. } => {
            assert_eq!(*case, 0);
            assert_eq!(*message_len, 0);
            assert_eq!(candidate, "definitely not base64");
        }
        other => panic!("expected SignatureMismatch, got {other:?}"),
    }
    assert!(err.is_conformance());
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn trailing_newline_counts_as_a_divergence() {
    // The comparison takes the candidate output verbatim; a shim that
    // appends a newline diverges even though the signature bytes are right.
    let keys = KeyPair::generate().unwrap();
    let candidate = TrailingNewlineCandidate { key: keys.signing().clone() };
    let err = DiffRunner::new(keys, candidate).with_cases(3).quiet().run().await.unwrap_err();
    assert!(matches!(err, HarnessError::SignatureMismatch { case: 0, .. }), "got {err:?}");
}

#[tokio::test]
async fn message_lengths_increase_strictly_in_order() {
    let keys = KeyPair::generate().unwrap();
    let lengths = Arc::new(Mutex::new(Vec::new()));
    let candidate =
        RecordingCandidate { key: keys.signing().clone(), lengths: Arc::clone(&lengths) };
    DiffRunner::new(keys, candidate).with_cases(7).quiet().run().await.unwrap();
    let seen = lengths.lock().unwrap();
    assert_eq!(*seen, (0..=7usize).collect::<Vec<_>>());
}

#[tokio::test]
async fn loop_matches_the_reference_shim_end_to_end() {
    let keys = KeyPair::generate().unwrap();
    let report = DiffRunner::new(keys, refsign()).with_cases(8).quiet().run().await.unwrap();
    assert_eq!(report.cases, 9);
}

#[tokio::test]
async fn candidate_signing_is_idempotent_for_a_fixed_input() {
    let keys = KeyPair::generate().unwrap();
    let hexsk = keys.secret_hex();
    let message = b"repeatable input";
    let first = refsign().sign(&hexsk, message).await.unwrap();
    let second = refsign().sign(&hexsk, message).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn five_byte_scenario_matches_and_verifies() {
    let keys = KeyPair::generate().unwrap();
    let message = [0x01u8, 0x02, 0x03, 0x04, 0x05];

    let reference_sig = reference::sign(keys.signing(), &message);
    let candidate_b64 = refsign().sign(&keys.secret_hex(), &message).await.unwrap();
    let candidate_sig = STANDARD.decode(&candidate_b64).unwrap();

    assert_eq!(candidate_sig.len(), 64);
    assert_eq!(candidate_sig, reference_sig);
    assert!(reference::verify(keys.verifying(), &message, &candidate_sig));

    // Mutating any single byte of the message must break verification.
    for i in 0..message.len() {
        let mut mutated = message;
        mutated[i] ^= 0x01;
        assert!(!reference::verify(keys.verifying(), &mutated, &candidate_sig), "byte {i}");
    }
}

#[tokio::test]
async fn infrastructure_failure_propagates_out_of_the_loop() {
    let keys = KeyPair::generate().unwrap();
    let missing = SubprocessSigner::new("/definitely/not/here/csign");
    let err = DiffRunner::new(keys, missing).with_cases(3).quiet().run().await.unwrap_err();
    assert!(matches!(err, HarnessError::Spawn { .. }), "got {err:?}");
    assert_eq!(err.exit_code(), 1);
}

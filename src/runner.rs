//! The differential test loop: an explicit sequential state machine over
//! message lengths 0..=N.

use std::io::Write;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::RngCore;
use serde::Serialize;

use crate::candidate::CandidateSigner;
use crate::errors::HarnessError;
use crate::keys::KeyPair;
use crate::reference;

/// Highest message length exercised by default; cases run for every length
/// in `0..=DEFAULT_CASES`.
pub const DEFAULT_CASES: u32 = 100;

/// One iteration of the loop: a random message whose length equals its
/// index. Created at the start of an iteration, discarded after comparison.
#[derive(Debug)]
pub struct TestCase {
    pub index: u32,
    pub message: Vec<u8>,
}

impl TestCase {
    fn draw(index: u32) -> Self {
        let mut message = vec![0u8; index as usize];
        rand::rng().fill_bytes(&mut message);
        Self { index, message }
    }
}

/// Outcome of the two sub-checks run against a single case. Anything other
/// than `Match` is terminal for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    Match,
    SignatureMismatch { reference: String, candidate: String },
    VerificationFailure { signature: String },
}

/// Summary of a fully successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Cases exercised, including the empty message.
    pub cases: u32,
    /// Passed sub-checks: one comparison and one verification per case.
    pub checks: u32,
}

/// Orchestrates the case sequence against one candidate under one key pair.
pub struct DiffRunner<C: CandidateSigner> {
    keys: KeyPair,
    candidate: C,
    cases: u32,
    progress: bool,
}

impl<C: CandidateSigner> DiffRunner<C> {
    pub fn new(keys: KeyPair, candidate: C) -> Self {
        Self { keys, candidate, cases: DEFAULT_CASES, progress: true }
    }

    /// Sets the highest message length N; the run covers `0..=N`.
    #[must_use]
    pub fn with_cases(mut self, cases: u32) -> Self {
        self.cases = cases;
        self
    }

    /// Suppresses the per-check progress markers on stdout.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    /// Runs all cases in order and stops at the first divergence.
    ///
    /// # Errors
    /// The first non-`Match` outcome or infrastructure failure, carrying the
    /// failing case index. Nothing is retried: a divergence is a correctness
    /// defect, not a transient condition.
    pub async fn run(&self) -> Result<RunReport, HarnessError> {
        let secret_hex = self.keys.secret_hex();
        for index in 0..=self.cases {
            let case = TestCase::draw(index);
            self.check(&secret_hex, &case).await?;
        }
        log::info!("all {} cases matched and verified", self.cases + 1);
        Ok(RunReport { cases: self.cases + 1, checks: (self.cases + 1) * 2 })
    }

    async fn check(&self, secret_hex: &str, case: &TestCase) -> Result<(), HarnessError> {
        log::debug!("case {}: message length {}", case.index, case.message.len());
        let reference_sig = reference::sign(self.keys.signing(), &case.message);
        let candidate_b64 = self.candidate.sign(secret_hex, &case.message).await?;
        match self.evaluate(case, &reference_sig, &candidate_b64) {
            ComparisonOutcome::Match => Ok(()),
            ComparisonOutcome::SignatureMismatch { reference, candidate } => {
                log::error!("case {}: candidate signature diverges from reference", case.index);
                Err(HarnessError::SignatureMismatch {
                    case: case.index,
                    message_len: case.message.len(),
                    reference,
                    candidate,
                })
            }
            ComparisonOutcome::VerificationFailure { signature } => {
                log::error!("case {}: candidate signature failed verification", case.index);
                Err(HarnessError::VerificationFailure {
                    case: case.index,
                    message_len: case.message.len(),
                    signature,
                })
            }
        }
    }

    fn evaluate(
        &self,
        case: &TestCase,
        reference_sig: &[u8; reference::SIGNATURE_LENGTH],
        candidate_b64: &str,
    ) -> ComparisonOutcome {
        // Strict decode: alphabet or padding deviations (and any trailing
        // bytes) must surface as a divergence, not vanish behind a lenient
        // parse.
        let decoded = STANDARD.decode(candidate_b64.as_bytes()).unwrap_or_default();
        if decoded.as_slice() != reference_sig.as_slice() {
            return ComparisonOutcome::SignatureMismatch {
                reference: STANDARD.encode(reference_sig),
                candidate: candidate_b64.to_string(),
            };
        }
        self.tick();
        if !reference::verify(self.keys.verifying(), &case.message, &decoded) {
            return ComparisonOutcome::VerificationFailure {
                signature: candidate_b64.to_string(),
            };
        }
        self.tick();
        ComparisonOutcome::Match
    }

    fn tick(&self) {
        if self.progress {
            print!(".");
            let _ = std::io::stdout().flush();
        }
    }
}

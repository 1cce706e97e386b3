use thiserror::Error;

/// Everything that can end a run early.
///
/// Conformance variants mean the candidate implementation disagrees with the
/// reference; infrastructure variants mean the harness itself could not do
/// its job. CI must be able to tell the two apart, so each class maps to its
/// own exit code.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(
        "case {case}: signatures don't match (message length {message_len})\n  reference: {reference}\n  candidate: {candidate}"
    )]
    SignatureMismatch { case: u32, message_len: usize, reference: String, candidate: String },

    #[error(
        "case {case}: candidate signature failed verification (message length {message_len}, signature {signature})"
    )]
    VerificationFailure { case: u32, message_len: usize, signature: String },

    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    #[error("malformed secret key hex: {0}")]
    MalformedSecretKey(String),

    #[error("failed to start candidate '{program}': {detail}")]
    Spawn { program: String, detail: String },

    #[error("candidate I/O error: {0}")]
    CandidateIo(String),

    #[error("candidate '{program}' did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("config error: {0}")]
    Config(String),
}

impl HarnessError {
    /// True for findings about the candidate implementation, false for
    /// failures of the harness itself.
    pub fn is_conformance(&self) -> bool {
        matches!(self, Self::SignatureMismatch { .. } | Self::VerificationFailure { .. })
    }

    /// Process exit code for this error: 2 for a signature mismatch, 3 for a
    /// verification failure, 1 for any infrastructure failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SignatureMismatch { .. } => 2,
            Self::VerificationFailure { .. } => 3,
            _ => 1,
        }
    }
}

//! Crate-wide error type.
//!
//! Every fallible public operation returns a [`Result<T, Error>`], or, for the
//! two verification entry points, a [`crate::signature::VerificationResult`]
//! carrying an `Option<Error>` — a failed verification is an expected outcome,
//! not an exceptional one, so it is not modeled as `Err`.

use thiserror::Error;

/// The set of errors surfaced by this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Public or private key has the wrong length or could not be decoded.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// The context loader could not resolve a `@context` URL.
    #[error("failed to resolve JSON-LD context '{url}': {reason}")]
    ContextResolutionFailure {
        /// The context URL that failed to resolve.
        url: String,
        /// Underlying loader error message.
        reason: String,
    },

    /// The JSON-LD processor (expansion, compaction, framing or
    /// normalization) reported a failure.
    #[error("JSON-LD canonicalization failed: {0}")]
    CanonicalizationFailure(String),

    /// `proof` is missing from the credential, or is not a JSON object, or
    /// is missing a required field other than `proofValue`.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// `proofValue` is required but absent.
    #[error("proof is missing required field 'proofValue'")]
    MissingProofValue,

    /// `proofValue` could not be base64-decoded.
    #[error("proofValue is not valid base64: {0}")]
    InvalidProofValueEncoding(String),

    /// `nonce` could not be base64-decoded.
    #[error("nonce is not valid base64: {0}")]
    InvalidNonceEncoding(String),

    /// A derived-proof verification encountered a proof whose `type` is not
    /// `BbsBlsSignatureProof2020`.
    #[error("expected derived proof type 'BbsBlsSignatureProof2020', found '{0}'")]
    WrongProofType(String),

    /// None of the proofs on the credential are derivable with this suite.
    #[error("no proof on the credential is derivable with this suite")]
    NoDerivableProofs,

    /// A statement present in the framed output has no match in the
    /// canonicalized source document.
    #[error("frame is not a subset of the source document")]
    FrameNotASubset,

    /// The BBS+ oracle rejected a signature during `Verify`.
    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),

    /// The BBS+ oracle rejected a derived proof during `VerifyProof`.
    #[error("derived proof verification failed: {0}")]
    ProofInvalid(String),

    /// The BBS+ oracle failed to produce a signature during `Sign`.
    #[error("signing failed: {0}")]
    SigningFailure(String),

    /// `DeriveProof` was called with an empty nonce.
    #[error("nonce must not be empty")]
    EmptyNonce,
}

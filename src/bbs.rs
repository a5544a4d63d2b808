//! The BBS+ primitive seam.
//!
//! Signing, verification, zero-knowledge proof derivation and proof
//! verification over BLS12-381 are an external collaborator of this crate
//! (see `SPEC_FULL.md` §1): a production deployment plugs in a real BBS+
//! implementation here (e.g. the `bbs` crate). This module defines only the
//! contract [`SignatureSuite`](crate::signature::SignatureSuite) drives.

/// Abstract contract for the BBS+ signature scheme over BLS12-381.
///
/// `messages` is always the concatenation of proof n-quads followed by
/// document n-quads, in that order (see `SPEC_FULL.md` §4.6); this trait
/// does not itself enforce that ordering, it only consumes the vector the
/// caller built.
pub trait BbsPlusScheme: Send + Sync {
    /// Signs `messages` with `private_key`, returning the raw signature
    /// bytes. Implementations MUST return an error (mapped by the caller to
    /// [`crate::error::Error::SigningFailure`]) rather than panic.
    fn sign(&self, messages: &[Vec<u8>], private_key: &[u8]) -> Result<Vec<u8>, String>;

    /// Verifies `signature` over `messages` under `public_key`.
    fn verify(&self, messages: &[Vec<u8>], signature: &[u8], public_key: &[u8]) -> Result<(), String>;

    /// Derives a zero-knowledge proof of knowledge of `signature` over
    /// `messages`, revealing only the 0-indexed positions in `revealed_indexes`.
    fn derive_proof(
        &self,
        messages: &[Vec<u8>],
        signature: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        revealed_indexes: &[usize],
    ) -> Result<Vec<u8>, String>;

    /// Verifies a derived proof produced by [`BbsPlusScheme::derive_proof`].
    fn verify_proof(
        &self,
        messages: &[Vec<u8>],
        proof: &[u8],
        nonce: &[u8],
        public_key: &[u8],
    ) -> Result<(), String>;
}

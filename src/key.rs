//! `did:key` encoding for BLS12-381 G2 public keys.
//!
//! Mirrors the multicodec/multibase construction the source repo's own
//! `did:key` method uses for its other supported curves (see
//! `Algorithm::muticodec_prefix` in the original `methods::did_key::alg`
//! module), extended here with the `bls12_381-g2-pub` multicodec.

use multibase::Base::Base58Btc;

use crate::error::Error;

/// Length in bytes of a compressed BLS12-381 G2 public key.
pub const PUBLIC_KEY_LENGTH: usize = 96;

/// Length in bytes of a BLS12-381 scalar private key.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Multicodec prefix for `bls12_381-g2-pub` (`0xeb`), unsigned-varint encoded.
///
/// `0xeb` does not fit in a single varint byte, so the encoding spills into a
/// second byte (`0xeb 0x01`), matching the registry value used throughout
/// the BBS+ JSON-LD signature suites.
pub const MULTICODEC_BLS12_381_G2_PUB: [u8; 2] = [0xeb, 0x01];

/// Validates that `bytes` is a well-formed BLS12-381 G2 public key (96 bytes)
/// and returns its `did:key` identifier.
///
/// `did:key:z<Base58BTC(varint(0xeb) || publicKey)>`
pub fn did_key(public_key: &[u8]) -> Result<String, Error> {
    validate_public_key_length(public_key)?;
    Ok(format!("did:key:{}", encode_multibase(public_key)))
}

/// Returns the verification-method URL for `public_key`: the `did:key`
/// identifier with a `#<same multibase key>` fragment appended.
pub fn did_key_verification_method(public_key: &[u8]) -> Result<String, Error> {
    validate_public_key_length(public_key)?;
    let mb = encode_multibase(public_key);
    Ok(format!("did:key:{mb}#{mb}"))
}

/// Validates a 32-byte BLS12-381 scalar private key's length.
pub fn validate_private_key_length(private_key: &[u8]) -> Result<(), Error> {
    if private_key.len() != PRIVATE_KEY_LENGTH {
        return Err(Error::InvalidKeyMaterial(format!(
            "expected a {PRIVATE_KEY_LENGTH}-byte private key, got {} bytes",
            private_key.len()
        )));
    }
    Ok(())
}

/// Validates a 96-byte BLS12-381 G2 public key's length.
pub fn validate_public_key_length(public_key: &[u8]) -> Result<(), Error> {
    if public_key.len() != PUBLIC_KEY_LENGTH {
        return Err(Error::InvalidKeyMaterial(format!(
            "expected a {PUBLIC_KEY_LENGTH}-byte public key, got {} bytes",
            public_key.len()
        )));
    }
    Ok(())
}

fn encode_multibase(public_key: &[u8]) -> String {
    multibase::encode(
        Base58Btc,
        [&MULTICODEC_BLS12_381_G2_PUB[..], public_key].concat(),
    )
}

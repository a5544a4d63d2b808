//! Proof model constants and the single/sequence polymorphism helpers.
//!
//! A credential's `proof` field may hold either one proof object or an
//! ordered array of them (see `SPEC_FULL.md` §3, §9). Rather than modeling
//! that as an enum throughout the codebase, every consumer normalizes to a
//! `Vec<Value>` on the way in and unwraps length-1 sequences on the way out.

use chrono::Utc;
use serde_json::{json, Value};

use crate::context::{CONTEXT_CREDENTIALS_V1, CONTEXT_SECURITY_BBS_V1, CONTEXT_SECURITY_V2};
use crate::error::Error;

/// Proof type emitted on an issued credential.
pub const PROOF_TYPE_BBS_BLS_SIGNATURE_2020: &str = "BbsBlsSignature2020";
/// Proof type emitted on a derived (selectively-disclosed) credential.
pub const PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020: &str = "BbsBlsSignatureProof2020";
/// The `sec:`-prefixed synonym accepted as input, never emitted.
pub const PROOF_TYPE_SEC_BBS_BLS_SIGNATURE_2020: &str = "sec:BbsBlsSignature2020";
/// The single supported `proofPurpose`.
pub const PROOF_PURPOSE_ASSERTION_METHOD: &str = "assertionMethod";
/// `YYYY-MM-DDThh:mm:ssZ`, UTC, second precision, no fractional seconds.
pub const PROOF_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// The field name under which a credential's proof(s) live.
pub const FIELD_PROOF: &str = "proof";
const FIELD_CONTEXT: &str = "@context";
const FIELD_TYPE: &str = "type";
const FIELD_PROOF_VALUE: &str = "proofValue";
const FIELD_NONCE: &str = "nonce";
const FIELD_ISSUER: &str = "issuer";

/// Formats `now` (UTC) per [`PROOF_TIMESTAMP_FORMAT`].
pub fn now_as_proof_timestamp() -> String {
    Utc::now().format(PROOF_TIMESTAMP_FORMAT).to_string()
}

/// The default proof `@context`: `[credentials/v1, security/bbs/v1]`.
pub fn default_proof_context() -> Value {
    json!([CONTEXT_CREDENTIALS_V1, CONTEXT_SECURITY_BBS_V1])
}

/// The proof `@context` used when filtering proofs during derivation:
/// `[security/v2]`.
pub fn security_v2_context() -> Value {
    json!([CONTEXT_SECURITY_V2])
}

/// Normalizes a credential's `proof` field (single object or array) into a
/// `Vec<Value>`, each entry guaranteed to be a JSON object.
///
/// Fails with [`Error::MalformedProof`] if `proof` is absent, or if any
/// entry is not an object.
pub fn extract_proofs(credential: &Value) -> Result<Vec<Value>, Error> {
    let proof = credential
        .get(FIELD_PROOF)
        .ok_or_else(|| Error::MalformedProof("credential has no 'proof' field".to_string()))?;

    let proofs: Vec<Value> = match proof {
        Value::Array(entries) => entries.clone(),
        Value::Object(_) => vec![proof.clone()],
        _ => {
            return Err(Error::MalformedProof(
                "'proof' is neither an object nor an array".to_string(),
            ))
        }
    };

    for p in &proofs {
        if !p.is_object() {
            return Err(Error::MalformedProof(
                "a 'proof' array entry is not an object".to_string(),
            ));
        }
    }

    Ok(proofs)
}

/// Inverse of [`extract_proofs`]: a single-element sequence collapses to
/// the bare object; anything else stays an array, preserving order.
pub fn proofs_to_value(mut proofs: Vec<Value>) -> Value {
    if proofs.len() == 1 {
        proofs.remove(0)
    } else {
        Value::Array(proofs)
    }
}

/// Returns `true` if `proof_type` is a supported source type for
/// derivation: `BbsBlsSignature2020` or its `sec:`-prefixed synonym.
pub fn is_supported_source_proof_type(proof_type: &str) -> bool {
    proof_type == PROOF_TYPE_BBS_BLS_SIGNATURE_2020 || proof_type == PROOF_TYPE_SEC_BBS_BLS_SIGNATURE_2020
}

/// Reads a required string field from a JSON object, failing with
/// [`Error::MalformedProof`] naming `field` when absent or non-string.
pub fn require_str_field<'a>(obj: &'a Value, field: &str) -> Result<&'a str, Error> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedProof(format!("proof is missing required field '{field}'")))
}

/// Removes and base64-(standard, padded)-decodes `proofValue` from a proof
/// object, failing with [`Error::MissingProofValue`] or
/// [`Error::InvalidProofValueEncoding`].
pub fn take_proof_value(proof: &mut Value) -> Result<Vec<u8>, Error> {
    let raw = proof
        .as_object_mut()
        .and_then(|o| o.remove(FIELD_PROOF_VALUE))
        .ok_or(Error::MissingProofValue)?;
    let encoded = raw.as_str().ok_or(Error::MissingProofValue)?;
    decode_base64(encoded).map_err(Error::InvalidProofValueEncoding)
}

/// Removes and base64-decodes `nonce` from a proof object, failing with
/// [`Error::InvalidNonceEncoding`] if present but malformed, or returning
/// `Ok(None)` if absent.
pub fn take_nonce(proof: &mut Value) -> Result<Vec<u8>, Error> {
    let raw = proof
        .as_object_mut()
        .and_then(|o| o.remove(FIELD_NONCE))
        .ok_or_else(|| Error::MalformedProof("proof is missing required field 'nonce'".to_string()))?;
    let encoded = raw
        .as_str()
        .ok_or_else(|| Error::MalformedProof("'nonce' is not a string".to_string()))?;
    decode_base64(encoded).map_err(Error::InvalidNonceEncoding)
}

/// Base64 (standard, padded) - encodes `bytes`.
pub fn encode_base64(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn decode_base64(s: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(s)
        .map_err(|err| err.to_string())
}

/// Adds the default `@context` to `proof` if it has none.
pub fn with_default_context(mut proof: Value) -> Value {
    if proof.get(FIELD_CONTEXT).is_none() {
        if let Some(obj) = proof.as_object_mut() {
            obj.insert(FIELD_CONTEXT.to_string(), default_proof_context());
        }
    }
    proof
}

/// Strips the `@context` field from `proof` (used for the compact
/// on-the-wire representation of an issued proof).
pub fn strip_context(mut proof: Value) -> Value {
    if let Some(obj) = proof.as_object_mut() {
        obj.remove(FIELD_CONTEXT);
    }
    proof
}

/// Sets `issuer` on `credential` to `did_key` if it has no `issuer` yet.
pub fn set_issuer_if_absent(credential: &mut Value, did_key: &str) {
    if let Some(obj) = credential.as_object_mut() {
        obj.entry(FIELD_ISSUER.to_string())
            .or_insert_with(|| Value::String(did_key.to_string()));
    }
}

/// Builds the skeleton (unsigned) proof for issuance: `type`, `proofPurpose`,
/// `verificationMethod`, `created`, defaulted `@context`, no `proofValue`.
pub fn skeleton_proof(verification_method: &str) -> Value {
    json!({
        FIELD_TYPE: PROOF_TYPE_BBS_BLS_SIGNATURE_2020,
        "proofPurpose": PROOF_PURPOSE_ASSERTION_METHOD,
        "verificationMethod": verification_method,
        "created": now_as_proof_timestamp(),
        FIELD_CONTEXT: default_proof_context(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_proofs_wraps_single_object() {
        let cred = json!({"proof": {"type": "BbsBlsSignature2020"}});
        let proofs = extract_proofs(&cred).unwrap();
        assert_eq!(proofs.len(), 1);
    }

    #[test]
    fn test_extract_proofs_passes_through_array() {
        let cred = json!({"proof": [{"type": "a"}, {"type": "b"}]});
        let proofs = extract_proofs(&cred).unwrap();
        assert_eq!(proofs.len(), 2);
    }

    #[test]
    fn test_extract_proofs_fails_without_proof_field() {
        let cred = json!({});
        assert!(matches!(extract_proofs(&cred).unwrap_err(), Error::MalformedProof(_)));
    }

    #[test]
    fn test_proofs_to_value_collapses_singleton() {
        let v = proofs_to_value(vec![json!({"a": 1})]);
        assert_eq!(v, json!({"a": 1}));
    }

    #[test]
    fn test_proofs_to_value_keeps_array_for_multiple() {
        let v = proofs_to_value(vec![json!({"a": 1}), json!({"a": 2})]);
        assert!(v.is_array());
    }

    #[test]
    fn test_supported_source_proof_types() {
        assert!(is_supported_source_proof_type("BbsBlsSignature2020"));
        assert!(is_supported_source_proof_type("sec:BbsBlsSignature2020"));
        assert!(!is_supported_source_proof_type("Ed25519Signature2020"));
    }

    #[test]
    fn test_base64_round_trip() {
        let mut proof = json!({"proofValue": encode_base64(b"hello")});
        let decoded = take_proof_value(&mut proof).unwrap();
        assert_eq!(decoded, b"hello");
        assert!(proof.get("proofValue").is_none());
    }
}

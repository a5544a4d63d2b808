//! Deterministic stand-ins for the two external collaborators
//! (`JsonLdProcessor`, `BbsPlusScheme`) used to exercise `SignatureSuite`'s
//! orchestration logic without a real RDF canonicalizer or BBS+ library.
//!
//! `FakeProcessor::normalize` flattens a document to sorted `path=value`
//! lines instead of running URDNA2015; `@context` is dropped rather than
//! resolved, which mirrors the real algorithm's property that `@context` is
//! never itself an RDF statement. `FakeProcessor::frame` is a structural
//! projection: it keeps exactly the paths named by the frame, so framed
//! output is always a literal subset of the source document's lines. Neither
//! is a faithful JSON-LD implementation; they exist to pin down
//! `SignatureSuite`'s control flow (index computation, ordering, error
//! propagation).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};

use bbs_vc_utils::bbs::BbsPlusScheme;
use bbs_vc_utils::context::ContextLoader;
use bbs_vc_utils::error::Error;
use bbs_vc_utils::jsonld::JsonLdProcessor;

pub struct FakeProcessor;

#[async_trait]
impl JsonLdProcessor for FakeProcessor {
    async fn normalize(&self, doc: &Value, _loader: &dyn ContextLoader) -> Result<Vec<String>, Error> {
        let mut lines = Vec::new();
        flatten(doc, String::new(), &mut lines);
        lines.sort();
        Ok(lines)
    }

    async fn compact(&self, doc: &Value, _context: &Value, _loader: &dyn ContextLoader) -> Result<Value, Error> {
        Ok(doc.clone())
    }

    async fn frame(&self, input: &Value, frame: &Value, _loader: &dyn ContextLoader) -> Result<Value, Error> {
        Ok(project(input, frame))
    }
}

fn flatten(value: &Value, prefix: String, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                if k == "@context" {
                    continue;
                }
                let next = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                flatten(v, next, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(v, format!("{prefix}[{i}]"), out);
            }
        }
        other => out.push(format!("{prefix}={other}")),
    }
}

fn project(input: &Value, frame: &Value) -> Value {
    match (input, frame) {
        (Value::Object(imap), Value::Object(fmap)) => {
            let mut out = Map::new();
            for (k, fv) in fmap {
                if let Some(iv) = imap.get(k) {
                    out.insert(k.clone(), project(iv, fv));
                }
            }
            Value::Object(out)
        }
        (Value::Array(iarr), Value::Array(farr)) => {
            let subframe = farr.first();
            let projected = iarr
                .iter()
                .map(|item| match subframe {
                    Some(sf) => project(item, sf),
                    None => item.clone(),
                })
                .collect();
            Value::Array(projected)
        }
        (value, _) => value.clone(),
    }
}

/// A non-cryptographic stand-in for the BBS+ oracle. `sign`/`verify` treat
/// the public and private key bytes as interchangeable (the tests always
/// construct a suite with identical bytes for both), and proof derivation
/// binds only to the revealed messages, the nonce and the public key — it
/// does not attempt to hide the unrevealed ones, since that property can
/// only be meaningfully tested against a real BBS+ implementation.
pub struct FakeBbs {
    calls: AtomicU64,
}

impl FakeBbs {
    pub fn new() -> Self {
        Self { calls: AtomicU64::new(0) }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fake key derivation: the BLS12-381 key lengths differ (32 vs 96 bytes),
/// so `FakeBbs` can't use the same bytes for both sides of a sign/verify
/// pair. Tests derive the "public key" for a given private key with this
/// function, which has no cryptographic meaning beyond being deterministic.
pub fn expand_private_to_public(private_key: &[u8]) -> Vec<u8> {
    private_key.iter().cycle().take(96).copied().collect()
}

impl BbsPlusScheme for FakeBbs {
    fn sign(&self, messages: &[Vec<u8>], private_key: &[u8]) -> Result<Vec<u8>, String> {
        self.record_call();
        let fingerprint = expand_private_to_public(private_key);
        Ok(checksum(std::iter::once(fingerprint.as_slice()).chain(messages.iter().map(Vec::as_slice))))
    }

    fn verify(&self, messages: &[Vec<u8>], signature: &[u8], public_key: &[u8]) -> Result<(), String> {
        self.record_call();
        let expected = checksum(std::iter::once(public_key).chain(messages.iter().map(Vec::as_slice)));
        if expected == signature {
            Ok(())
        } else {
            Err("checksum mismatch".to_string())
        }
    }

    fn derive_proof(
        &self,
        messages: &[Vec<u8>],
        _signature: &[u8],
        nonce: &[u8],
        public_key: &[u8],
        revealed_indexes: &[usize],
    ) -> Result<Vec<u8>, String> {
        self.record_call();
        let revealed: Vec<&[u8]> = revealed_indexes.iter().map(|&i| messages[i].as_slice()).collect();
        Ok(checksum(
            revealed.into_iter().chain([nonce, public_key]),
        ))
    }

    fn verify_proof(&self, messages: &[Vec<u8>], proof: &[u8], nonce: &[u8], public_key: &[u8]) -> Result<(), String> {
        self.record_call();
        let expected = checksum(messages.iter().map(Vec::as_slice).chain([nonce, public_key]));
        if expected == proof {
            Ok(())
        } else {
            Err("checksum mismatch".to_string())
        }
    }
}

fn checksum<'a>(parts: impl Iterator<Item = &'a [u8]>) -> Vec<u8> {
    let mut acc: u64 = 0xcbf29ce484222325;
    for part in parts {
        for &b in part {
            acc ^= b as u64;
            acc = acc.wrapping_mul(0x100000001b3);
        }
        acc = acc.wrapping_mul(0x100000001b3);
    }
    acc.to_be_bytes().to_vec()
}

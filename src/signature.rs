//! `SignatureSuite`: issuance, verification, selective disclosure and
//! derived-proof verification over a `BbsPlusScheme` and `JsonLdProcessor`
//! pair injected at construction.
//!
//! Mirrors the source repo's `CryptoProof`-style suite: a small struct
//! holding key material plus collaborators, exposing one method per
//! operation, immutable after construction (see `SPEC_FULL.md` §4.9, §5).

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use zeroize::Zeroizing;

use crate::bbs::BbsPlusScheme;
use crate::canonicalizer::Canonicalizer;
use crate::context::{ContextLoader, DefaultContextLoader};
use crate::error::Error;
use crate::jsonld::JsonLdProcessor;
use crate::key;
use crate::proof::{self, FIELD_PROOF, PROOF_TYPE_BBS_BLS_SIGNATURE_2020, PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020};

/// Optional collaborators and overrides for a [`SignatureSuite`].
///
/// `json_ld_processor` and `bbs_scheme` have no in-crate default — both
/// cryptographic canonicalization and the BBS+ primitive are external
/// collaborators (`SPEC_FULL.md` §1) — so they are required at construction.
/// The context loader does have a usable default ([`DefaultContextLoader`])
/// and may be left unset.
pub struct SignatureSuiteOptions {
    document_loader: Option<Arc<dyn ContextLoader>>,
    contexts: HashMap<String, Value>,
    json_ld_processor: Arc<dyn JsonLdProcessor>,
    bbs_scheme: Arc<dyn BbsPlusScheme>,
}

impl SignatureSuiteOptions {
    /// Builds options with the two required external collaborators and no
    /// overrides.
    pub fn new(json_ld_processor: Arc<dyn JsonLdProcessor>, bbs_scheme: Arc<dyn BbsPlusScheme>) -> Self {
        Self {
            document_loader: None,
            contexts: HashMap::new(),
            json_ld_processor,
            bbs_scheme,
        }
    }

    /// Replaces the context loader entirely.
    pub fn with_document_loader(mut self, loader: Arc<dyn ContextLoader>) -> Self {
        self.document_loader = Some(loader);
        self
    }

    /// Merges `contexts` into the default context table, overriding it on
    /// key collision. Ignored if [`Self::with_document_loader`] was also
    /// called.
    pub fn with_contexts(mut self, contexts: HashMap<String, Value>) -> Self {
        self.contexts = contexts;
        self
    }
}

/// The outcome of a verification operation.
///
/// Verification failures are an expected outcome, not an exceptional one
/// (`SPEC_FULL.md` §7): [`SignatureSuite::verify`] and
/// [`SignatureSuite::verify_proof`] return this instead of `Result::Err`.
#[derive(Debug)]
pub struct VerificationResult {
    /// Whether the signature (or every derived proof) verified.
    pub success: bool,
    /// The failure reason, present iff `success` is `false`.
    pub error: Option<Error>,
}

impl VerificationResult {
    fn success() -> Self {
        Self { success: true, error: None }
    }

    fn failure(error: Error) -> Self {
        Self { success: false, error: Some(error) }
    }
}

/// A `BbsBlsSignature2020` / `BbsBlsSignatureProof2020` suite bound to one
/// key pair and one pair of external collaborators.
pub struct SignatureSuite {
    public_key: Vec<u8>,
    private_key: Option<Zeroizing<Vec<u8>>>,
    canonicalizer: Canonicalizer,
    bbs: Arc<dyn BbsPlusScheme>,
}

impl SignatureSuite {
    /// Validates key material and constructs a suite. `private_key` is
    /// optional — a verify-only suite needs none.
    pub fn new(
        public_key: &[u8],
        private_key: Option<Vec<u8>>,
        options: SignatureSuiteOptions,
    ) -> Result<Self, Error> {
        key::validate_public_key_length(public_key)?;
        if let Some(pk) = &private_key {
            key::validate_private_key_length(pk)?;
        }

        let loader: Arc<dyn ContextLoader> = match options.document_loader {
            Some(loader) => loader,
            None => Arc::new(DefaultContextLoader::new(options.contexts)),
        };

        Ok(Self {
            public_key: public_key.to_vec(),
            private_key: private_key.map(Zeroizing::new),
            canonicalizer: Canonicalizer::new(options.json_ld_processor, loader),
            bbs: options.bbs_scheme,
        })
    }

    /// Issues a `BbsBlsSignature2020` proof over `credential` (`SPEC_FULL.md` §4.4).
    pub async fn sign(&self, credential: &Value) -> Result<Value, Error> {
        let private_key = self
            .private_key
            .as_ref()
            .ok_or_else(|| Error::SigningFailure("suite has no private key configured".to_string()))?;

        let mut credential = credential.clone();
        let did = key::did_key(&self.public_key)?;
        proof::set_issuer_if_absent(&mut credential, &did);

        let verification_method = key::did_key_verification_method(&self.public_key)?;
        let skeleton = proof::skeleton_proof(&verification_method);

        tracing::info!(issuer = %did, proof_type = PROOF_TYPE_BBS_BLS_SIGNATURE_2020, "signing credential");

        let messages = self.prepare_data_for_signing(&credential, &skeleton).await?;
        let signature = self
            .bbs
            .sign(&messages, private_key)
            .map_err(Error::SigningFailure)?;

        let mut issued_proof = skeleton;
        if let Some(obj) = issued_proof.as_object_mut() {
            obj.insert("proofValue".to_string(), json!(proof::encode_base64(&signature)));
        }
        let issued_proof = proof::strip_context(issued_proof);

        if let Some(obj) = credential.as_object_mut() {
            obj.insert(FIELD_PROOF.to_string(), issued_proof);
        }

        Ok(credential)
    }

    /// Verifies a `BbsBlsSignature2020` proof on `credential` (`SPEC_FULL.md` §4.5).
    ///
    /// Does not mutate `credential`.
    pub async fn verify(&self, credential: &Value) -> VerificationResult {
        tracing::info!(proof_type = PROOF_TYPE_BBS_BLS_SIGNATURE_2020, "verifying credential");
        match self.verify_inner(credential).await {
            Ok(()) => VerificationResult::success(),
            Err(err) => VerificationResult::failure(err),
        }
    }

    async fn verify_inner(&self, credential: &Value) -> Result<(), Error> {
        let mut document = credential.clone();
        let proof_value = document
            .as_object_mut()
            .and_then(|o| o.remove(FIELD_PROOF))
            .ok_or_else(|| Error::MalformedProof("credential has no 'proof' field".to_string()))?;
        if !proof_value.is_object() {
            return Err(Error::MalformedProof("'proof' is not an object".to_string()));
        }

        let mut working_proof = proof_value;
        let signature = proof::take_proof_value(&mut working_proof)?;

        let messages = self.prepare_data_for_signing(&document, &working_proof).await?;
        self.bbs
            .verify(&messages, &signature, &self.public_key)
            .map_err(Error::SignatureInvalid)
    }

    /// Builds the BBS+ message vector for `credential_without_proof` and
    /// `proof` (`SPEC_FULL.md` §4.6): proof n-quads, then document n-quads.
    async fn prepare_data_for_signing(
        &self,
        credential_without_proof: &Value,
        proof: &Value,
    ) -> Result<Vec<Vec<u8>>, Error> {
        let proof = proof::with_default_context(proof.clone());
        let doc_quads = self.canonicalizer.normalize(credential_without_proof).await?;
        let proof_quads = self.canonicalizer.normalize(&proof).await?;
        Ok(proof_quads
            .into_iter()
            .chain(doc_quads)
            .map(String::into_bytes)
            .collect())
    }

    /// Selectively discloses `credential` per `frame`, producing one derived
    /// proof per retained source proof (`SPEC_FULL.md` §4.7).
    pub async fn derive_proof(&self, credential: &Value, frame: &Value, nonce: &[u8]) -> Result<Value, Error> {
        if nonce.is_empty() {
            return Err(Error::EmptyNonce);
        }

        tracing::info!(proof_type = PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020, "deriving proof");

        let security_v2_compacted = self
            .canonicalizer
            .compact(credential, &proof::security_v2_context())
            .await?;
        let retained: Vec<Value> = proof::extract_proofs(&security_v2_compacted)?
            .into_iter()
            .filter(|p| {
                p.get("type")
                    .and_then(Value::as_str)
                    .map(proof::is_supported_source_proof_type)
                    .unwrap_or(false)
            })
            .map(|mut p| {
                if let Some(obj) = p.as_object_mut() {
                    obj.insert("@context".to_string(), proof::security_v2_context());
                }
                p
            })
            .collect();
        if retained.is_empty() {
            return Err(Error::NoDerivableProofs);
        }

        let original_context = credential.get("@context").cloned().unwrap_or(Value::Null);
        let mut document_without_proof = credential.clone();
        if let Some(obj) = document_without_proof.as_object_mut() {
            obj.remove(FIELD_PROOF);
        }
        let c0 = self
            .canonicalizer
            .compact(&document_without_proof, &original_context)
            .await?;

        let cred_stmts = self.canonicalizer.normalize(&c0).await?;

        let mut envelope: Option<Value> = None;
        let mut derived_proofs = Vec::with_capacity(retained.len());

        for source_proof in retained {
            let mut source_proof = source_proof;
            let signature = proof::take_proof_value(&mut source_proof)?;
            let proof_for_canon = proof::with_default_context(source_proof.clone());
            let proof_stmts = self.canonicalizer.normalize(&proof_for_canon).await?;

            let mut framed = self.canonicalizer.frame(&c0, frame).await?;
            if let Some(obj) = framed.as_object_mut() {
                obj.insert("@context".to_string(), original_context.clone());
            }
            let framed_stmts = self.canonicalizer.normalize(&framed).await?;

            let indexes = compute_reveal_indexes(proof_stmts.len(), &cred_stmts, &framed_stmts)?;

            let all_stmts: Vec<Vec<u8>> = proof_stmts
                .iter()
                .chain(cred_stmts.iter())
                .map(|s| s.clone().into_bytes())
                .collect();

            let output = self
                .bbs
                .derive_proof(&all_stmts, &signature, nonce, &self.public_key, &indexes)
                .map_err(|err| Error::ProofInvalid(format!("proof derivation failed: {err}")))?;

            let verification_method = proof::require_str_field(&source_proof, "verificationMethod")?.to_string();
            let created = proof::require_str_field(&source_proof, "created")?.to_string();

            derived_proofs.push(json!({
                "type": PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020,
                "proofPurpose": proof::PROOF_PURPOSE_ASSERTION_METHOD,
                "verificationMethod": verification_method,
                "created": created,
                "nonce": proof::encode_base64(nonce),
                "proofValue": proof::encode_base64(&output),
            }));

            if envelope.is_none() {
                envelope = Some(framed);
            }
        }

        let mut envelope = envelope.expect("at least one retained proof guarantees at least one iteration");
        if let Some(obj) = envelope.as_object_mut() {
            obj.insert(FIELD_PROOF.to_string(), proof::proofs_to_value(derived_proofs));
        }
        Ok(envelope)
    }

    /// Verifies every `BbsBlsSignatureProof2020` entry on `credential`
    /// (`SPEC_FULL.md` §4.8). Succeeds iff every derived proof verifies.
    pub async fn verify_proof(&self, credential: &Value) -> VerificationResult {
        tracing::info!(proof_type = PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020, "verifying derived proof");
        match self.verify_proof_inner(credential).await {
            Ok(()) => VerificationResult::success(),
            Err(err) => VerificationResult::failure(err),
        }
    }

    async fn verify_proof_inner(&self, credential: &Value) -> Result<(), Error> {
        let mut document = credential.clone();
        let proofs = proof::extract_proofs(&document)?;
        if let Some(obj) = document.as_object_mut() {
            obj.remove(FIELD_PROOF);
        }

        for mut derived in proofs {
            let proof_type = proof::require_str_field(&derived, "type")?.to_string();
            if proof_type != PROOF_TYPE_BBS_BLS_SIGNATURE_PROOF_2020 {
                return Err(Error::WrongProofType(proof_type));
            }
            if let Some(obj) = derived.as_object_mut() {
                obj.insert("type".to_string(), json!(PROOF_TYPE_BBS_BLS_SIGNATURE_2020));
            }

            let signature = proof::take_proof_value(&mut derived)?;
            let nonce = proof::take_nonce(&mut derived)?;

            let messages = self.prepare_data_for_signing(&document, &derived).await?;
            self.bbs
                .verify_proof(&messages, &signature, &nonce, &self.public_key)
                .map_err(Error::ProofInvalid)?;
        }

        Ok(())
    }
}

/// Computes the reveal-index set for `DeriveProof` (`SPEC_FULL.md` §4.7f):
/// every proof-statement index, plus the index (offset by `proof_len`) of
/// each `cred_stmts` entry matched one-to-one against a `framed_stmts`
/// entry. Duplicate lines in `cred_stmts` are paired against the first
/// unmatched occurrence, in ascending index order.
fn compute_reveal_indexes(
    proof_len: usize,
    cred_stmts: &[String],
    framed_stmts: &[String],
) -> Result<Vec<usize>, Error> {
    let mut used = vec![false; cred_stmts.len()];
    let mut indexes: Vec<usize> = (0..proof_len).collect();

    for framed_line in framed_stmts {
        let matched = cred_stmts
            .iter()
            .enumerate()
            .find(|(i, line)| !used[*i] && *line == framed_line);

        match matched {
            Some((i, _)) => {
                used[i] = true;
                indexes.push(i + proof_len);
            }
            None => return Err(Error::FrameNotASubset),
        }
    }

    Ok(indexes)
}

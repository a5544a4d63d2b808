#![warn(missing_docs)]

/*! # bbs-vc-utils

Issuance, verification and selective disclosure of JSON-LD Verifiable
Credentials signed with BBS+ over BLS12-381, conforming to the
`BbsBlsSignature2020` / `BbsBlsSignatureProof2020` proof suites.

## Features

- **`did:key` encoding** for BLS12-381 G2 public keys ([`key`]).
- **Context resolution** for the `@context` documents the proof suites
  depend on, with a bundled local table and an HTTP(S) fallback ([`context`]).
- **Selective disclosure** of credentials via JSON-LD framing, computing the
  exact set of BBS+ messages a derived proof reveals ([`signature`]).

The BBS+ primitive and the JSON-LD processor (expansion, compaction, framing,
URDNA2015 normalization) are external collaborators: this crate defines the
[`bbs::BbsPlusScheme`] and [`jsonld::JsonLdProcessor`] traits a caller must
supply a concrete implementation of, and orchestrates them rather than
re-implementing either.

*/

pub mod bbs;
pub mod canonicalizer;
pub mod context;
pub mod error;
pub mod jsonld;
pub mod key;
pub mod proof;
pub mod signature;

pub use error::Error;
pub use signature::{SignatureSuite, SignatureSuiteOptions, VerificationResult};

//! The JSON-LD processor seam.
//!
//! Expansion, compaction, framing and RDF dataset normalization (URDNA2015)
//! are an external collaborator of this crate (see `SPEC_FULL.md` §1): a
//! production deployment plugs in a real JSON-LD processor here (e.g. the
//! `json-ld` crate plus an URDNA2015 canonicalizer). This module defines
//! only the contract `Canonicalizer` drives.

use async_trait::async_trait;
use serde_json::Value;

use crate::context::ContextLoader;
use crate::error::Error;

/// Abstract contract for a JSON-LD processor offering the three operations
/// [`Canonicalizer`](crate::canonicalizer::Canonicalizer) needs.
///
/// Every method is handed the [`ContextLoader`] to use as its document
/// loader, so a single processor instance can be reused across suites that
/// carry different context overrides.
#[async_trait]
pub trait JsonLdProcessor: Send + Sync {
    /// Runs URDNA2015 over `doc` with output format `application/n-quads`,
    /// returning the normalized n-quads in canonical order with any
    /// trailing empty line trimmed.
    async fn normalize(&self, doc: &Value, loader: &dyn ContextLoader) -> Result<Vec<String>, Error>;

    /// Compacts `doc` against `context` (a context URL, an inline context
    /// object, or an array of either).
    async fn compact(&self, doc: &Value, context: &Value, loader: &dyn ContextLoader) -> Result<Value, Error>;

    /// Frames `input` against `frame`, with `omitGraph = true` so the
    /// top-level result is a single node rather than a `@graph` wrapper.
    async fn frame(&self, input: &Value, frame: &Value, loader: &dyn ContextLoader) -> Result<Value, Error>;
}

//! Driver over the JSON-LD processor with a fixed options profile.
//!
//! Pins the algorithm (URDNA2015), output format (`application/n-quads`)
//! and framing option (`omitGraph = true`) so callers never have to thread
//! those choices through; the processor and context loader are injected so
//! this crate never has to implement RDF canonicalization itself.

use serde_json::Value;
use std::sync::Arc;

use crate::context::ContextLoader;
use crate::error::Error;
use crate::jsonld::JsonLdProcessor;

/// Canonicalizer: `normalize`/`compact`/`frame` against a fixed JSON-LD
/// processor and context loader.
pub struct Canonicalizer {
    processor: Arc<dyn JsonLdProcessor>,
    loader: Arc<dyn ContextLoader>,
}

impl Canonicalizer {
    /// Builds a canonicalizer over `processor`, resolving contexts via `loader`.
    pub fn new(processor: Arc<dyn JsonLdProcessor>, loader: Arc<dyn ContextLoader>) -> Self {
        Self { processor, loader }
    }

    /// URDNA2015-normalizes `doc`, returning its canonical n-quad lines.
    pub async fn normalize(&self, doc: &Value) -> Result<Vec<String>, Error> {
        tracing::debug!("normalizing document");
        self.processor.normalize(doc, self.loader.as_ref()).await
    }

    /// Compacts `doc` against `context`.
    pub async fn compact(&self, doc: &Value, context: &Value) -> Result<Value, Error> {
        tracing::debug!("compacting document");
        self.processor.compact(doc, context, self.loader.as_ref()).await
    }

    /// Frames `input` against `frame` with `omitGraph = true`.
    pub async fn frame(&self, input: &Value, frame: &Value) -> Result<Value, Error> {
        tracing::debug!("framing document");
        self.processor.frame(input, frame, self.loader.as_ref()).await
    }
}

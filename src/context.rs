//! Resolution of JSON-LD `@context` URLs.
//!
//! Mirrors the two-tier strategy the source repo's normalizer uses: an
//! in-memory table of pre-loaded contexts, falling back to a caching HTTP
//! loader built the same way the source repo's own `did:web` resolver talks
//! HTTP — a plain `hyper` client, optionally wrapped in `hyper-tls`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Client, Uri};
use hyper_tls::HttpsConnector;
use serde_json::Value;

use crate::error::Error;

/// The W3C Verifiable Credentials v1 context.
pub const CONTEXT_CREDENTIALS_V1: &str = "https://www.w3.org/2018/credentials/v1";
/// The `BbsBlsSignature2020` proof suite context.
pub const CONTEXT_SECURITY_BBS_V1: &str = "https://w3id.org/security/bbs/v1";
/// The VC Revocation List 2020 context.
pub const CONTEXT_VC_REVOCATION_LIST_2020_V1: &str = "https://w3id.org/vc-revocation-list-2020/v1";
/// The Permanent Resident Card / citizenship context.
pub const CONTEXT_CITIZENSHIP_V1: &str = "https://w3id.org/citizenship/v1";
/// The Linked Data Security v2 context, used to filter/compact proofs.
pub const CONTEXT_SECURITY_V2: &str = "https://w3id.org/security/v2";

/// A JSON-LD context document together with the URL it was loaded from and,
/// when the transport surfaced one, the URL of an associated `Link` header.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    /// The parsed context document.
    pub document: Value,
    /// The URL the document was fetched from.
    pub document_url: String,
    /// The context URL advertised by a `Link` header, when present.
    pub context_url: Option<String>,
}

/// Abstract contract for resolving `@context` URLs to JSON-LD documents.
///
/// Implementations MUST be deterministic for a fixed URL and MUST NOT mutate
/// caller-visible state in a way observable across calls other than caching.
#[async_trait]
pub trait ContextLoader: Send + Sync {
    /// Resolves `url` to its JSON-LD context document.
    async fn load(&self, url: &str) -> Result<ResolvedContext, Error>;
}

/// The default [`ContextLoader`]: a fixed local table of bundled contexts,
/// falling back to a caching HTTP(S) fetch for anything unrecognized.
pub struct DefaultContextLoader {
    local: HashMap<String, Value>,
    cache: Mutex<HashMap<String, ResolvedContext>>,
    http: Client<HttpConnector>,
    https: Client<HttpsConnector<HttpConnector>>,
}

impl DefaultContextLoader {
    /// Builds a loader pre-populated with the five bundled contexts listed
    /// in the external interface, merging in `overrides` (which win over the
    /// bundled defaults on key collision).
    pub fn new(overrides: HashMap<String, Value>) -> Self {
        let mut local = bundled_contexts();
        local.extend(overrides);

        Self {
            local,
            cache: Mutex::new(HashMap::new()),
            http: Client::new(),
            https: Client::builder().build(HttpsConnector::new()),
        }
    }
}

impl Default for DefaultContextLoader {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl ContextLoader for DefaultContextLoader {
    async fn load(&self, url: &str) -> Result<ResolvedContext, Error> {
        if let Some(doc) = self.local.get(url) {
            tracing::debug!(url, "context resolved from local table");
            return Ok(ResolvedContext {
                document: doc.clone(),
                document_url: url.to_string(),
                context_url: Some(url.to_string()),
            });
        }

        if let Some(cached) = self.cache.lock().unwrap().get(url) {
            tracing::debug!(url, "context resolved from remote cache");
            return Ok(cached.clone());
        }

        tracing::warn!(url, "context not found locally, fetching remotely");
        let resolved = self.fetch(url).await?;
        self.cache
            .lock()
            .unwrap()
            .insert(url.to_string(), resolved.clone());
        Ok(resolved)
    }
}

impl DefaultContextLoader {
    async fn fetch(&self, url: &str) -> Result<ResolvedContext, Error> {
        let uri: Uri = url.parse().map_err(|err| Error::ContextResolutionFailure {
            url: url.to_string(),
            reason: format!("invalid URL: {err}"),
        })?;

        let response = match uri.scheme_str() {
            Some("https") => self.https.get(uri.clone()).await,
            _ => self.http.get(uri.clone()).await,
        }
        .map_err(|err| Error::ContextResolutionFailure {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(Error::ContextResolutionFailure {
                url: url.to_string(),
                reason: format!("server returned status {}", response.status()),
            });
        }

        let context_url = response
            .headers()
            .get(hyper::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|err| Error::ContextResolutionFailure {
                url: url.to_string(),
                reason: err.to_string(),
            })?;

        let document: Value =
            serde_json::from_slice(&body).map_err(|err| Error::ContextResolutionFailure {
                url: url.to_string(),
                reason: format!("response body is not valid JSON: {err}"),
            })?;

        Ok(ResolvedContext {
            document,
            document_url: url.to_string(),
            context_url,
        })
    }
}

fn bundled_contexts() -> HashMap<String, Value> {
    let mut map = HashMap::new();
    map.insert(
        CONTEXT_CREDENTIALS_V1.to_string(),
        serde_json::from_str(include_str!("contexts/credentials_v1.json")).unwrap(),
    );
    map.insert(
        CONTEXT_SECURITY_BBS_V1.to_string(),
        serde_json::from_str(include_str!("contexts/security_bbs_v1.json")).unwrap(),
    );
    map.insert(
        CONTEXT_VC_REVOCATION_LIST_2020_V1.to_string(),
        serde_json::from_str(include_str!("contexts/vc_revocation_list_2020_v1.json")).unwrap(),
    );
    map.insert(
        CONTEXT_CITIZENSHIP_V1.to_string(),
        serde_json::from_str(include_str!("contexts/citizenship_v1.json")).unwrap(),
    );
    map.insert(
        CONTEXT_SECURITY_V2.to_string(),
        serde_json::from_str(include_str!("contexts/security_v2.json")).unwrap(),
    );
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loads_bundled_context_without_network() {
        let loader = DefaultContextLoader::default();
        let resolved = loader.load(CONTEXT_SECURITY_V2).await.unwrap();
        assert_eq!(resolved.document_url, CONTEXT_SECURITY_V2);
        assert!(resolved.document.is_object());
    }

    #[tokio::test]
    async fn test_overrides_win_over_bundled_defaults() {
        let mut overrides = HashMap::new();
        overrides.insert(
            CONTEXT_SECURITY_V2.to_string(),
            serde_json::json!({"@context": "overridden"}),
        );
        let loader = DefaultContextLoader::new(overrides);
        let resolved = loader.load(CONTEXT_SECURITY_V2).await.unwrap();
        assert_eq!(resolved.document, serde_json::json!({"@context": "overridden"}));
    }

    #[tokio::test]
    async fn test_unknown_url_without_network_fails_with_resolution_error() {
        let loader = DefaultContextLoader::default();
        let err = loader.load("https://127.0.0.1:1/unused").await.unwrap_err();
        assert!(matches!(err, Error::ContextResolutionFailure { .. }));
    }
}

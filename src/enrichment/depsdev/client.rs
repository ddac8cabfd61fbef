//! deps.dev API HTTP client.

use super::cache::{CacheKey, ResolutionCache};
use super::response::DependencyGraph;
use crate::enrichment::CancellationToken;
use crate::error::{EnrichError, EnrichmentErrorKind, ErrorContext, Result};
use crate::model::Ecosystem;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// Public deps.dev API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.deps.dev";

/// How often a waiting lookup re-checks its cancellation token.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// deps.dev client configuration.
#[derive(Debug, Clone)]
pub struct DepsDevClientConfig {
    /// Base URL for the deps.dev API
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for DepsDevClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Raw HTTP response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP GET capability.
///
/// Implementations report transport failures as network errors and return
/// every HTTP status, successful or not, as a [`TransportResponse`].
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str, accept: &str, timeout: Duration) -> Result<TransportResponse>;
}

/// `reqwest`-backed transport.
pub struct ReqwestTransport {
    client: Client,
}

/// Helper to convert reqwest errors to enrichment errors
fn network_error(msg: &str, err: &reqwest::Error) -> EnrichError {
    let detail = if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    };
    EnrichError::network(msg, detail)
}

impl ReqwestTransport {
    /// Create a transport whose requests default to `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                EnrichError::enrichment(
                    "creating HTTP client",
                    EnrichmentErrorKind::ClientSetup(e.to_string()),
                )
            })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, accept: &str, timeout: Duration) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .timeout(timeout)
            .send()
            .map_err(|e| network_error("request failed", &e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| network_error("reading response body", &e))?;
        Ok(TransportResponse { status, body })
    }
}

/// Client for the deps.dev `:dependencies` endpoint with an in-memory cache.
pub struct DepsDevClient {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<ResolutionCache>,
    config: DepsDevClientConfig,
    cache_hits: AtomicUsize,
    api_calls: AtomicUsize,
}

impl DepsDevClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: DepsDevClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport, with a fresh cache.
    #[must_use]
    pub fn with_transport(config: DepsDevClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            cache: ResolutionCache::shared(),
            config,
            cache_hits: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
        }
    }

    /// Replace the cache, e.g. to share one between clients.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The cache backing this client.
    #[must_use]
    pub const fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Number of lookups answered from the cache so far.
    #[must_use]
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Number of HTTP requests issued so far.
    #[must_use]
    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    /// Build `{base}/v3/systems/{system}/packages/{name}/versions/{version}:dependencies`.
    ///
    /// Name and version are escaped as single path segments, so a `/` in
    /// either becomes `%2F`.
    pub fn dependencies_url(&self, system: &str, name: &str, version: &str) -> Result<String> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| EnrichError::config(format!("invalid deps.dev base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| EnrichError::config("deps.dev base URL cannot be a base"))?
            .pop_if_empty()
            .extend(["v3", "systems", system, "packages", name, "versions"])
            .push(&format!("{version}:dependencies"));
        Ok(url.into())
    }

    /// Fetch the resolved dependency graph for one package version.
    ///
    /// Cached graphs are returned without a request. Failed lookups are
    /// never cached.
    pub fn fetch(
        &self,
        ecosystem: &Ecosystem,
        name: &str,
        version: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<DependencyGraph>> {
        if name.is_empty() || version.is_empty() {
            return Err(EnrichError::validation(format!(
                "graph lookup needs a name and a pinned version (got {name:?}@{version:?})"
            )));
        }

        let key = CacheKey::new(ecosystem.depsdev_system(), name, version);
        if let Some(graph) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("deps.dev cache hit for {}", key);
            return Ok(graph);
        }

        let context = format!("fetching {key}");
        let timeout = cancel.bound_timeout(self.config.timeout);
        if cancel.is_cancelled() || timeout.is_zero() {
            return Err(EnrichError::cancelled(context));
        }

        let url = self.dependencies_url(&key.system, name, version)?;
        tracing::debug!("GET {}", url);
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        let response = self
            .get_cancellable(url, timeout, cancel)
            .context(context.as_str())?;

        if cancel.is_cancelled() {
            return Err(EnrichError::cancelled(context));
        }

        if response.status != 200 {
            return Err(EnrichError::enrichment(
                context,
                EnrichmentErrorKind::RemoteError {
                    status: response.status,
                    body: response.body,
                },
            ));
        }

        let graph: DependencyGraph = serde_json::from_str(&response.body).map_err(|e| {
            EnrichError::enrichment(
                context.as_str(),
                EnrichmentErrorKind::DecodeError(e.to_string()),
            )
        })?;

        if graph.root().is_none() {
            tracing::debug!("deps.dev graph for {} has no SELF node", key);
        }

        Ok(self.cache.insert(key, graph))
    }

    /// Run the request on a worker thread and wait for it, giving up as soon
    /// as `cancel` fires.
    ///
    /// An abandoned request keeps running until its own timeout; its result
    /// is dropped.
    fn get_cancellable(
        &self,
        url: String,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        thread::Builder::new()
            .name("depsdev-request".to_string())
            .spawn(move || {
                // receiver is gone if the lookup was cancelled
                let _ = tx.send(transport.get(&url, "application/json", timeout));
            })
            .map_err(|e| EnrichError::network("spawning request thread", e.to_string()))?;

        loop {
            match rx.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(result) => return result,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if cancel.is_cancelled() {
                        return Err(EnrichError::cancelled("waiting for response"));
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    return Err(EnrichError::network(
                        "waiting for response",
                        "request thread exited without a response",
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Canned {
        status: u16,
        body: String,
        urls: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpTransport for Canned {
        fn get(&self, url: &str, accept: &str, _timeout: Duration) -> Result<TransportResponse> {
            assert_eq!(accept, "application/json");
            self.urls.lock().unwrap().push(url.to_string());
            Ok(TransportResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client(transport: Arc<Canned>) -> DepsDevClient {
        let config = DepsDevClientConfig {
            base_url: "http://deps.test".to_string(),
            ..Default::default()
        };
        DepsDevClient::with_transport(config, transport)
    }

    const GRAPH: &str = r#"{"nodes":[{"versionKey":{"system":"PYPI","name":"requests","version":"2.31.0"},"relation":"SELF"}],"edges":[]}"#;

    #[test]
    fn test_client_config_defaults() {
        let config = DepsDevClientConfig::default();
        assert_eq!(config.base_url, "https://api.deps.dev");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_url_template_and_escaping() {
        let c = client(Canned::new(200, GRAPH));
        assert_eq!(
            c.dependencies_url("pypi", "requests", "2.31.0").unwrap(),
            "http://deps.test/v3/systems/pypi/packages/requests/versions/2.31.0:dependencies"
        );
        assert_eq!(
            c.dependencies_url("maven", "org.apache:commons-io", "2.5").unwrap(),
            "http://deps.test/v3/systems/maven/packages/org.apache:commons-io/versions/2.5:dependencies"
        );
        let escaped = c.dependencies_url("npm", "@scope/pkg", "1.0 beta").unwrap();
        assert!(escaped.contains("/packages/@scope%2Fpkg/versions/1.0%20beta:dependencies"));
    }

    #[test]
    fn test_second_fetch_is_cached() {
        let transport = Canned::new(200, GRAPH);
        let c = client(Arc::clone(&transport));
        let token = CancellationToken::new();

        let first = c.fetch(&Ecosystem::PyPi, "requests", "2.31.0", &token).unwrap();
        let second = c.fetch(&Ecosystem::PyPi, "requests", "2.31.0", &token).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.urls.lock().unwrap().len(), 1);
        assert_eq!(c.api_calls(), 1);
        assert_eq!(c.cache_hits(), 1);
    }

    #[test]
    fn test_non_200_is_remote_error_and_not_cached() {
        let transport = Canned::new(404, "package not found");
        let c = client(Arc::clone(&transport));
        let err = c
            .fetch(&Ecosystem::PyPi, "nope", "1.0", &CancellationToken::new())
            .unwrap_err();
        assert_eq!(
            err.enrichment_kind(),
            Some(&EnrichmentErrorKind::RemoteError {
                status: 404,
                body: "package not found".to_string()
            })
        );
        assert!(c.cache().is_empty());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let c = client(Canned::new(200, "{\"nodes\": 5}"));
        let err = c
            .fetch(&Ecosystem::PyPi, "requests", "2.31.0", &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(
            err.enrichment_kind(),
            Some(EnrichmentErrorKind::DecodeError(_))
        ));
        assert!(c.cache().is_empty());
    }

    #[test]
    fn test_cancelled_token_makes_no_request() {
        let transport = Canned::new(200, GRAPH);
        let c = client(Arc::clone(&transport));
        let token = CancellationToken::new();
        token.cancel();
        let err = c
            .fetch(&Ecosystem::PyPi, "requests", "2.31.0", &token)
            .unwrap_err();
        assert!(err.is_network());
        assert!(transport.urls.lock().unwrap().is_empty());
    }

    /// Blocks every request well past any test's patience.
    struct Stalled;

    impl HttpTransport for Stalled {
        fn get(&self, _url: &str, _accept: &str, timeout: Duration) -> Result<TransportResponse> {
            std::thread::sleep(timeout);
            Err(EnrichError::network("stalled", "request timed out"))
        }
    }

    #[test]
    fn test_cancel_aborts_in_flight_request() {
        let c = DepsDevClient::with_transport(
            DepsDevClientConfig {
                base_url: "http://deps.test".to_string(),
                timeout: Duration::from_secs(5),
            },
            Arc::new(Stalled),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let start = std::time::Instant::now();
        let err = c
            .fetch(&Ecosystem::PyPi, "requests", "2.31.0", &token)
            .unwrap_err();
        handle.join().unwrap();

        assert!(err.is_cancelled(), "unexpected error: {err}");
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(c.api_calls(), 1);
        assert!(c.cache().is_empty());
    }

    #[test]
    fn test_expired_deadline_aborts_in_flight_request() {
        let c = DepsDevClient::with_transport(
            DepsDevClientConfig {
                base_url: "http://deps.test".to_string(),
                timeout: Duration::from_secs(5),
            },
            Arc::new(Stalled),
        );
        let token = CancellationToken::with_timeout(Duration::from_millis(100));

        let start = std::time::Instant::now();
        let err = c
            .fetch(&Ecosystem::PyPi, "requests", "2.31.0", &token)
            .unwrap_err();

        assert!(err.is_network());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_empty_version_is_rejected_without_request() {
        let transport = Canned::new(200, GRAPH);
        let c = client(Arc::clone(&transport));
        let err = c
            .fetch(&Ecosystem::PyPi, "requests", "", &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, EnrichError::Validation(_)));
        assert!(transport.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cache_key_includes_ecosystem() {
        let transport = Canned::new(200, GRAPH);
        let c = client(Arc::clone(&transport));
        let token = CancellationToken::new();
        c.fetch(&Ecosystem::PyPi, "foo", "1.0", &token).unwrap();
        c.fetch(&Ecosystem::Maven, "foo", "1.0", &token).unwrap();
        assert_eq!(transport.urls.lock().unwrap().len(), 2);
    }
}

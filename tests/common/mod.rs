//! Shared fixtures for integration tests: an in-memory deps.dev.

#![allow(dead_code)]

use reqwest::Url;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use transitive_enrich::enrichment::depsdev::{
    DepsDevClient, DepsDevClientConfig, HttpTransport, POMXML_ENHANCEABLE_EXTRACTOR,
    REQUIREMENTS_EXTRACTOR, ResolutionCache, TransportResponse,
};
use transitive_enrich::{EnrichError, Package};

pub const BASE_URL: &str = "http://deps.test";

/// Serves canned `:dependencies` responses keyed by `system/name@version`.
#[derive(Default)]
pub struct FakeDepsDev {
    responses: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
}

impl FakeDepsDev {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a graph whose root is `name@version` and whose other nodes
    /// are `(name, version, relation)` triples.
    pub fn with_graph(
        mut self,
        system: &str,
        name: &str,
        version: &str,
        deps: &[(&str, &str, &str)],
    ) -> Self {
        let upper = system.to_uppercase();
        let mut nodes = vec![json!({
            "versionKey": {"system": upper, "name": name, "version": version},
            "bundled": false,
            "relation": "SELF",
            "errors": []
        })];
        for (dep, dep_version, relation) in deps {
            nodes.push(json!({
                "versionKey": {"system": upper, "name": dep, "version": dep_version},
                "bundled": false,
                "relation": relation,
                "errors": []
            }));
        }
        let edges: Vec<_> = (1..nodes.len())
            .map(|i| json!({"fromNode": 0, "toNode": i, "requirement": "*"}))
            .collect();
        let body = json!({"nodes": nodes, "edges": edges}).to_string();
        self.responses
            .insert(format!("{system}/{name}@{version}"), (200, body));
        self
    }

    /// Register a raw response for one lookup.
    pub fn with_response(
        mut self,
        system: &str,
        name: &str,
        version: &str,
        status: u16,
        body: &str,
    ) -> Self {
        self.responses.insert(
            format!("{system}/{name}@{version}"),
            (status, body.to_string()),
        );
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Lookup keys requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for FakeDepsDev {
    fn get(
        &self,
        url: &str,
        accept: &str,
        _timeout: Duration,
    ) -> transitive_enrich::Result<TransportResponse> {
        assert_eq!(accept, "application/json");
        let parsed = Url::parse(url).map_err(|e| EnrichError::network("fake", e.to_string()))?;
        let segments: Vec<&str> = parsed.path_segments().map(Iterator::collect).unwrap_or_default();
        let [_, _, system, _, name, _, version] = segments.as_slice() else {
            return Err(EnrichError::network("fake", format!("unexpected path {url}")));
        };
        let version = version.trim_end_matches(":dependencies");
        let key = format!("{system}/{name}@{version}");
        self.requests.lock().unwrap().push(key.clone());

        match self.responses.get(&key) {
            Some((status, body)) => Ok(TransportResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(TransportResponse {
                status: 404,
                body: format!("{key} not found"),
            }),
        }
    }
}

fn raw_client(fake: &Arc<FakeDepsDev>) -> DepsDevClient {
    let config = DepsDevClientConfig {
        base_url: BASE_URL.to_string(),
        ..Default::default()
    };
    DepsDevClient::with_transport(config, Arc::clone(fake) as Arc<dyn HttpTransport>)
}

pub fn client(fake: &Arc<FakeDepsDev>) -> Arc<DepsDevClient> {
    Arc::new(raw_client(fake))
}

pub fn client_with_cache(fake: &Arc<FakeDepsDev>, cache: Arc<ResolutionCache>) -> Arc<DepsDevClient> {
    Arc::new(raw_client(fake).with_cache(cache))
}

/// A package found in a requirements.txt.
pub fn requirement(name: &str, version: &str, path: &str) -> Package {
    Package::new(name, version, "pypi")
        .with_location(path)
        .with_plugin(REQUIREMENTS_EXTRACTOR)
}

/// A package found in a pom.xml.
pub fn pom_dependency(name: &str, version: &str, path: &str) -> Package {
    Package::new(name, version, "maven")
        .with_location(path)
        .with_plugin(POMXML_ENHANCEABLE_EXTRACTOR)
}

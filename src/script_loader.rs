//! Process-wide external script loader.
//!
//! One [`ScriptLoader`] is built at startup and shared by reference. Each URL
//! is fetched at most once for the lifetime of the loader: concurrent callers
//! await the same in-flight load and later callers get the cached outcome,
//! failures included.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptLoadError {
    #[error("Failed to load external script: {url} ({reason})")]
    Failed { url: String, reason: String },
}

impl ScriptLoadError {
    fn failed(url: &str, reason: impl ToString) -> Self {
        ScriptLoadError::Failed {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub type ScriptLoad = BoxFuture<'static, Result<(), ScriptLoadError>>;

/// Performs the actual fetch of one script URL.
pub trait ScriptFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> ScriptLoad;
}

/// Fetches scripts over HTTP with the shared client; a non-2xx status is a failure.
#[derive(Debug, Clone)]
pub struct HttpScriptFetcher {
    client: Arc<Client>,
}

impl HttpScriptFetcher {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl ScriptFetcher for HttpScriptFetcher {
    fn fetch(&self, url: &str) -> ScriptLoad {
        let client = Arc::clone(&self.client);
        let url = url.to_string();
        async move {
            let response = client
                .get(&url)
                .timeout(FETCH_TIMEOUT)
                .send()
                .await
                .map_err(|e| ScriptLoadError::failed(&url, e))?
                .error_for_status()
                .map_err(|e| ScriptLoadError::failed(&url, e))?;
            let body = response
                .bytes()
                .await
                .map_err(|e| ScriptLoadError::failed(&url, e))?;
            tracing::info!("Loaded external script {} ({} bytes)", url, body.len());
            Ok(())
        }
        .boxed()
    }
}

/// Comma-separated attribute value to a list of URLs; blank entries are dropped.
pub fn parse_script_urls(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct ScriptLoader {
    fetcher: Arc<dyn ScriptFetcher>,
    cache: Mutex<HashMap<String, Shared<ScriptLoad>>>,
}

impl std::fmt::Debug for ScriptLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptLoader")
            .field("cached", &self.cached_count())
            .finish()
    }
}

impl ScriptLoader {
    pub fn new(fetcher: Arc<dyn ScriptFetcher>) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn load(&self, url: &str) -> Shared<ScriptLoad> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(url.to_string())
            .or_insert_with(|| {
                tracing::debug!("Starting load of external script {}", url);
                self.fetcher.fetch(url).shared()
            })
            .clone()
    }

    /// Loads every distinct URL, resolving once all have loaded.
    pub async fn load_once(&self, urls: &[String]) -> Result<(), ScriptLoadError> {
        let mut seen = HashSet::new();
        let loads: Vec<Shared<ScriptLoad>> = urls
            .iter()
            .filter(|url| seen.insert(url.as_str()))
            .map(|url| self.load(url))
            .collect();

        try_join_all(loads).await.map(|_| ())
    }

    /// Number of distinct URLs requested so far.
    pub fn cached_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

//! Catalog loading: one deferred fetch per mounted view

use super::deferred::{DeferredTask, Interaction};
use crate::types::{parse_catalog, Product};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Callback used to wake the UI after background work
pub type Repaint = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid catalog body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the product list comes from
pub trait CatalogSource: Send + Sync + 'static {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Product>, FetchError>>;
}

/// `GET <url>?limit=<n>` against the remote catalog
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
    limit: u32,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>, limit: u32) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });
        Self {
            client,
            url: url.into(),
            limit,
        }
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch(&self) -> BoxFuture<'static, Result<Vec<Product>, FetchError>> {
        let request = self.client.get(&self.url).query(&[("limit", self.limit)]);
        debug!(url = %self.url, limit = self.limit, "Requesting catalog");
        fetch_http(request).boxed()
    }
}

async fn fetch_http(request: reqwest::RequestBuilder) -> Result<Vec<Product>, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = %status, "Catalog response received");
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }
    let body = response.bytes().await?;
    Ok(parse_catalog(&body)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Items plus loading flag, owned by one view
#[derive(Debug)]
pub struct CatalogState {
    pub items: Vec<Product>,
    pub status: LoadStatus,
    /// Bumped on every update so readers can tell something changed
    pub revision: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Loading,
            revision: 0,
        }
    }
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    fn settle(&mut self, result: Result<Vec<Product>, FetchError>) {
        match result {
            Ok(items) => {
                info!(count = items.len(), "Catalog loaded");
                self.items = items;
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                self.items.clear();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        self.revision += 1;
    }
}

fn lock(state: &Mutex<CatalogState>) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn fetch_catalog(
    source: Arc<dyn CatalogSource>,
    state: Arc<Mutex<CatalogState>>,
    token: CancellationToken,
    repaint: Repaint,
) {
    {
        let mut s = lock(&state);
        if token.is_cancelled() {
            return;
        }
        s.status = LoadStatus::Loading;
    }

    info!("Fetching catalog");
    let result = tokio::select! {
        _ = token.cancelled() => {
            debug!("Catalog fetch abandoned, view unmounted");
            return;
        }
        result = source.fetch() => result,
    };

    {
        // unmount cancels under the same lock, so this check cannot race it
        let mut s = lock(&state);
        if token.is_cancelled() {
            debug!("Dropping catalog result, view unmounted");
            return;
        }
        s.settle(result);
    }
    repaint();
}

/// Owns the catalog state of one mounted view
pub struct CatalogLoader {
    state: Arc<Mutex<CatalogState>>,
    token: CancellationToken,
    deferred: DeferredTask,
}

impl CatalogLoader {
    /// Mount: queue the fetch for the first quiet frame
    pub fn mount(
        source: Arc<dyn CatalogSource>,
        runtime: tokio::runtime::Handle,
        repaint: Repaint,
    ) -> Self {
        let state = Arc::new(Mutex::new(CatalogState::default()));
        let token = CancellationToken::new();

        let deferred = {
            let state = state.clone();
            let task_token = token.clone();
            DeferredTask::new(token.clone(), move || {
                runtime.spawn(fetch_catalog(source, state, task_token, repaint));
            })
        };

        debug!("Catalog loader mounted");
        Self {
            state,
            token,
            deferred,
        }
    }

    /// Call every frame; starts the fetch once interaction settles
    pub fn poll(&mut self, interaction: Interaction) -> bool {
        self.deferred.poll(interaction)
    }

    /// Deferred fetch not started yet
    pub fn is_pending(&self) -> bool {
        self.deferred.is_pending() && !self.token.is_cancelled()
    }

    /// Cancel the pending or in-flight fetch. State is frozen afterwards.
    pub fn unmount(&self) {
        if self.token.is_cancelled() {
            return;
        }
        let _guard = lock(&self.state);
        self.token.cancel();
        debug!("Catalog loader unmounted");
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&CatalogState) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn revision(&self) -> u64 {
        self.with_state(|s| s.revision)
    }
}

impl Drop for CatalogLoader {
    fn drop(&mut self) {
        self.unmount();
    }
}

//! Shared application state for the web server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use forensim_common::config::SimilarityDefaults;
use forensim_network::{recompute_or_empty, Dataset, MemoCache, SimilarityParams, SimilarityResult};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A recomputation became the current snapshot
    SnapshotPublished { generation: u64, edges: usize, status: String },
    /// A finished recomputation was discarded because a newer one started
    SnapshotDiscarded { generation: u64, latest: u64 },
}

/// The result currently shown to every client.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generation: u64,
    pub params: SimilarityParams,
    pub result: SimilarityResult,
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub dataset: Arc<Dataset>,
    /// Values for parameters a request leaves out
    pub defaults: SimilarityDefaults,
    memo: Mutex<MemoCache>,
    generation: AtomicU64,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(dataset: Dataset, defaults: SimilarityDefaults, memo_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            dataset: Arc::new(dataset),
            defaults,
            memo: Mutex::new(MemoCache::new(memo_capacity)),
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(None),
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Number of the newest request that has started.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Register a new publishing request and return its generation.
    pub fn begin_request(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Recompute off the async runtime, reusing a memoised result when the
    /// same parameters were seen before.
    pub async fn compute(&self, params: SimilarityParams) -> Arc<SimilarityResult> {
        if let Some(hit) = self.memo.lock().await.get(&params) {
            debug!("Memo hit for {:?}", params);
            return hit;
        }

        let dataset = Arc::clone(&self.dataset);
        let job_params = params.clone();
        let result = match tokio::task::spawn_blocking(move || recompute_or_empty(&dataset, &job_params)).await {
            Ok(result) => Arc::new(result),
            Err(e) => {
                warn!("Recomputation task failed: {}", e);
                return Arc::new(SimilarityResult::empty(format!("Error: {e}")));
            }
        };

        self.memo.lock().await.insert(params, Arc::clone(&result));
        result
    }

    /// Publish a finished result as the current snapshot unless a newer
    /// request has started since `generation` was issued.
    pub async fn publish(
        &self,
        generation: u64,
        params: SimilarityParams,
        result: &SimilarityResult,
    ) -> bool {
        let mut current = self.snapshot.write().await;
        let latest = self.latest_generation();
        if generation != latest {
            debug!("Discarding stale snapshot {} (latest {})", generation, latest);
            let _ = self.event_tx.send(AppEvent::SnapshotDiscarded { generation, latest });
            return false;
        }

        info!("Publishing snapshot {}: {}", generation, result.status);
        *current = Some(Arc::new(Snapshot {
            generation,
            params,
            result: result.clone(),
        }));
        let _ = self.event_tx.send(AppEvent::SnapshotPublished {
            generation,
            edges: result.edges.len(),
            status: result.status.clone(),
        });
        true
    }

    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }
}

pub type SharedState = Arc<AppState>;

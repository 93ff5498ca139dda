//! Video catalog store
//!
//! Owns the loaded catalog and the collections derived from it (trending,
//! recommended, search results), plus the persisted watch history. All
//! methods take `&self` so independent operations can be awaited
//! concurrently; interior locks are never held across an await point.

use crate::core::source::CatalogSource;
use crate::error::{Result, StreamVistaError};
use crate::storage::history::History;
use crate::storage::kv::KeyValueStore;
use crate::types::{Config, SearchFilters, Video};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CatalogState {
    videos: Vec<Video>,
    loaded: bool,
    trending: Vec<Video>,
    recommended: Vec<Video>,
    search_results: Vec<Video>,
}

pub struct CatalogStore<S> {
    source: S,
    config: Config,
    state: Mutex<CatalogState>,
    history: Mutex<History>,
    last_persistence_error: Mutex<Option<String>>,
    rng: Mutex<fastrand::Rng>,
    /// Bumped by every search; only the newest search may publish results
    search_generation: AtomicU64,
    // Held across source fetches so concurrent first loads share one fetch
    load_lock: tokio::sync::Mutex<()>,
}

impl<S: CatalogSource> CatalogStore<S> {
    /// Build a store, reading the persisted history from `storage`
    pub fn new(source: S, storage: Arc<dyn KeyValueStore>, config: Config) -> Self {
        let history = History::open(storage, config.max_history_entries);
        let rng = match config.recommend_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Self {
            source,
            config,
            state: Mutex::new(CatalogState::default()),
            history: Mutex::new(history),
            last_persistence_error: Mutex::new(None),
            rng: Mutex::new(rng),
            search_generation: AtomicU64::new(0),
            load_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ============================================
    // Fetching
    // ============================================

    /// Full catalog, fetched from the source on first use
    ///
    /// Callers arriving while the first fetch is in flight wait for it
    /// instead of fetching again.
    pub async fn fetch_all(&self) -> Result<Vec<Video>> {
        if let Some(videos) = self.loaded_videos() {
            return Ok(videos);
        }

        let _load = self.load_lock.lock().await;
        if let Some(videos) = self.loaded_videos() {
            return Ok(videos);
        }
        self.load().await
    }

    /// Refetch the catalog from the source, replacing what is loaded
    ///
    /// On failure the previously loaded catalog is kept.
    pub async fn refresh(&self) -> Result<Vec<Video>> {
        let _load = self.load_lock.lock().await;
        self.load().await
    }

    fn loaded_videos(&self) -> Option<Vec<Video>> {
        let state = self.state.lock();
        state.loaded.then(|| state.videos.clone())
    }

    async fn load(&self) -> Result<Vec<Video>> {
        simulate_latency(self.config.fetch_latency_ms).await;

        let videos = self.source.fetch_videos().await.inspect_err(|e| {
            warn!(error = %e, "catalog retrieval failed");
        })?;
        info!(count = videos.len(), "catalog loaded");

        let mut state = self.state.lock();
        state.videos = videos.clone();
        state.loaded = true;
        Ok(videos)
    }

    /// Most viewed videos, ties kept in catalog order
    pub async fn fetch_trending(&self) -> Result<Vec<Video>> {
        let catalog = self.fetch_all().await?;
        let trending = rank_by_views(catalog, self.config.trending_limit);

        self.state.lock().trending = trending.clone();
        Ok(trending)
    }

    /// A uniformly shuffled sample of the catalog without repeats
    pub async fn fetch_recommended(&self) -> Result<Vec<Video>> {
        let mut catalog = self.fetch_all().await?;
        self.rng.lock().shuffle(&mut catalog);
        catalog.truncate(self.config.recommended_limit);

        self.state.lock().recommended = catalog.clone();
        Ok(catalog)
    }

    /// Recommendations for the page of `video_id`, excluding that video
    pub async fn related(&self, video_id: &str) -> Result<Vec<Video>> {
        let recommended = self.fetch_recommended().await?;
        Ok(recommended
            .into_iter()
            .filter(|v| v.id != video_id)
            .take(self.config.related_limit)
            .collect())
    }

    /// Filter the catalog by free text and category
    ///
    /// When searches overlap, only the most recently started one updates
    /// [`search_results`](Self::search_results); each caller still gets its
    /// own results back.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Video>> {
        let ticket = self.next_search_ticket();

        simulate_latency(self.config.search_latency_ms).await;
        let catalog = self.fetch_all().await?;
        let results = filter_videos(&catalog, query, filters);

        if !self.publish_search(ticket, &results) {
            debug!(query, "search superseded, not publishing results");
        }
        Ok(results)
    }

    fn next_search_ticket(&self) -> u64 {
        self.search_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `results` unless a newer search has started since `ticket`
    fn publish_search(&self, ticket: u64, results: &[Video]) -> bool {
        let mut state = self.state.lock();
        if self.search_generation.load(Ordering::SeqCst) != ticket {
            return false;
        }
        state.search_results = results.to_vec();
        true
    }

    /// Look up one video of the catalog
    pub async fn video(&self, video_id: &str) -> Result<Video> {
        self.fetch_all()
            .await?
            .into_iter()
            .find(|v| v.id == video_id)
            .ok_or_else(|| StreamVistaError::VideoNotFound(video_id.to_string()))
    }

    /// Distinct categories in first-seen catalog order
    ///
    /// Spellings that differ only in case count as one category, the same
    /// way the search category filter compares them.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for video in self.fetch_all().await? {
            if seen.insert(video.category.to_lowercase()) {
                categories.push(video.category);
            }
        }
        Ok(categories)
    }

    // ============================================
    // Watch history
    // ============================================

    /// Record `video_id` as the most recently watched video
    ///
    /// The history is updated before this returns. A storage failure is
    /// logged and kept in [`last_persistence_error`](Self::last_persistence_error);
    /// it never rolls back the in-memory history.
    pub fn add_to_history(&self, video_id: &str) -> Vec<String> {
        let mut history = self.history.lock();
        let result = history.add(video_id);
        self.record_persistence(result);
        history.get_all().to_vec()
    }

    /// Forget every watched video
    pub fn clear_history(&self) -> Vec<String> {
        let mut history = self.history.lock();
        let result = history.clear();
        self.record_persistence(result);
        history.get_all().to_vec()
    }

    /// Watched video IDs, most recent first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().get_all().to_vec()
    }

    /// History resolved against the catalog; IDs no longer in the catalog are skipped
    pub async fn history_videos(&self) -> Result<Vec<Video>> {
        let catalog = self.fetch_all().await?;
        let by_id: HashMap<&str, &Video> = catalog.iter().map(|v| (v.id.as_str(), v)).collect();

        Ok(self
            .history()
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|v| (*v).clone()))
            .collect())
    }

    /// The error of the latest history write, if it failed
    pub fn last_persistence_error(&self) -> Option<String> {
        self.last_persistence_error.lock().clone()
    }

    fn record_persistence(&self, result: Result<()>) {
        let mut slot = self.last_persistence_error.lock();
        match result {
            Ok(()) => *slot = None,
            Err(e) => {
                warn!(error = %e, "watch history not persisted, keeping it in memory");
                *slot = Some(e.to_string());
            }
        }
    }

    // ============================================
    // Snapshots of derived collections
    // ============================================

    pub fn videos(&self) -> Vec<Video> {
        self.state.lock().videos.clone()
    }

    pub fn trending(&self) -> Vec<Video> {
        self.state.lock().trending.clone()
    }

    pub fn recommended(&self) -> Vec<Video> {
        self.state.lock().recommended.clone()
    }

    pub fn search_results(&self) -> Vec<Video> {
        self.state.lock().search_results.clone()
    }
}

async fn simulate_latency(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Sort by views descending (stable) and keep the top `limit`
pub fn rank_by_views(mut videos: Vec<Video>, limit: usize) -> Vec<Video> {
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    videos.truncate(limit);
    videos
}

/// Videos matching `query` and `filters`, in catalog order
///
/// The query is a case-insensitive substring of the title, the description
/// or any tag; an empty query matches everything. A category filter must
/// equal the video's category ignoring case.
pub fn filter_videos(videos: &[Video], query: &str, filters: &SearchFilters) -> Vec<Video> {
    let needle = query.to_lowercase();
    let category = filters
        .category
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase);

    videos
        .iter()
        .filter(|v| matches_query(v, &needle))
        .filter(|v| category.as_ref().is_none_or(|c| v.category.to_lowercase() == *c))
        .cloned()
        .collect()
}

fn matches_query(video: &Video, needle: &str) -> bool {
    needle.is_empty()
        || video.title.to_lowercase().contains(needle)
        || video.description.to_lowercase().contains(needle)
        || video.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

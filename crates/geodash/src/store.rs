//! Client-side project store.
//!
//! [`GeoData`] loads the project list once, keeps the raw filter text the
//! user is typing, debounces it, and derives the visible rows by filtering on
//! the settled text and sorting by the current model. The derived rows are
//! cached and only recomputed when the data, the settled text, or the sort
//! model change.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::project::{Project, ProjectId};
use crate::query::{self, SortModel};
use crate::source::ProjectSource;

/// Lifecycle of the single data load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The fetch has not finished yet.
    #[default]
    Loading,
    /// Data is available.
    Ready,
    /// The fetch failed with this message.
    Failed(String),
}

#[derive(Debug)]
struct RowCache {
    needle: String,
    sort: SortModel,
    indices: Vec<usize>,
}

/// Loaded projects plus the filter and sort state derived from them.
#[derive(Debug)]
pub struct GeoData {
    state: LoadState,
    data: Vec<Project>,
    filter_text: String,
    debounced: Debouncer<String>,
    sort_model: SortModel,
    cache: Option<RowCache>,
}

impl GeoData {
    /// Create an empty store in the loading state.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: LoadState::Loading,
            data: Vec::new(),
            filter_text: String::new(),
            debounced: Debouncer::new(String::new(), debounce),
            sort_model: SortModel::unsorted(),
            cache: None,
        }
    }

    /// Create a store and perform its one load.
    pub async fn load(source: &dyn ProjectSource, debounce: Duration) -> Self {
        let mut store = Self::new(debounce);
        store.fetch(source).await;
        store
    }

    /// Load projects from `source`, replacing any current data.
    ///
    /// Failures are captured in [`LoadState::Failed`]; loading always ends.
    pub async fn fetch(&mut self, source: &dyn ProjectSource) {
        self.state = LoadState::Loading;
        match source.fetch().await {
            Ok(projects) => {
                info!(source = source.name(), count = projects.len(), "projects loaded");
                self.data = projects;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "failed to load projects");
                self.state = LoadState::Failed(e.to_string());
            }
        }
        self.cache = None;
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Check whether the load is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// The load error message, if the load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Update the filter text as typed; the settled value follows after the
    /// debounce period.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.debounced.set(self.filter_text.clone());
    }

    /// Update the filter text and settle it immediately.
    pub fn set_filter_text_now(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.debounced.set_now(self.filter_text.clone());
    }

    /// The filter text as typed.
    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// The settled filter text that rows are filtered by.
    #[must_use]
    pub fn debounced_filter_text(&self) -> String {
        self.debounced.current()
    }

    /// Wait until the settled filter text catches up with the typed text.
    pub async fn settle(&self) {
        let mut rx = self.debounced.subscribe();
        loop {
            if *rx.borrow_and_update() == self.filter_text {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Replace the sort model.
    pub fn set_sort_model(&mut self, model: SortModel) {
        self.sort_model = model;
    }

    /// The current sort model.
    #[must_use]
    pub fn sort_model(&self) -> &SortModel {
        &self.sort_model
    }

    /// Recompute the visible rows if any input changed.
    ///
    /// Returns `true` when the rows were recomputed.
    pub fn refresh(&mut self) -> bool {
        let needle = self.debounced.current();
        if let Some(cache) = &self.cache {
            if cache.needle == needle && cache.sort == self.sort_model {
                return false;
            }
        }
        let indices = query::apply_indices(&self.data, &needle, &self.sort_model);
        debug!(
            filter = %needle,
            rows = indices.len(),
            total = self.data.len(),
            "recomputed visible rows"
        );
        self.cache = Some(RowCache {
            needle,
            sort: self.sort_model.clone(),
            indices,
        });
        true
    }

    /// Visible rows as of the last [`refresh`](Self::refresh).
    ///
    /// Before the first refresh all rows are returned in load order.
    #[must_use]
    pub fn rows(&self) -> Vec<&Project> {
        match &self.cache {
            Some(cache) => cache.indices.iter().map(|&i| &self.data[i]).collect(),
            None => self.data.iter().collect(),
        }
    }

    /// Refresh and return the visible rows.
    pub fn processed(&mut self) -> Vec<&Project> {
        self.refresh();
        self.rows()
    }

    /// All loaded projects, unfiltered, in load order.
    #[must_use]
    pub fn data(&self) -> &[Project] {
        &self.data
    }

    /// Number of loaded projects.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.data.len()
    }

    /// Number of visible rows as of the last refresh.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.cache
            .as_ref()
            .map_or(self.data.len(), |cache| cache.indices.len())
    }

    /// Look up a loaded project by id.
    #[must_use]
    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.data.iter().find(|p| p.id == id)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingSource, FixedSource};
    use super::*;
    use crate::debounce::DEFAULT_DEBOUNCE;
    use crate::project::{fixtures, ProjectStatus};
    use crate::query::{SortField, SortItem};

    fn sample() -> Vec<Project> {
        vec![
            fixtures::project(1, "Mining-Beta-412", 19.076, 72.8777, ProjectStatus::Completed),
            fixtures::project(2, "Urban-Alpha-009", 28.6139, 77.209, ProjectStatus::Active),
            fixtures::project(3, "Rural-Max-300", 13.0827, 80.2707, ProjectStatus::Pending),
        ]
    }

    async fn loaded() -> GeoData {
        GeoData::load(&FixedSource(sample()), DEFAULT_DEBOUNCE).await
    }

    #[tokio::test]
    async fn test_new_store_is_loading() {
        let store = GeoData::new(DEFAULT_DEBOUNCE);
        assert!(store.is_loading());
        assert_eq!(store.total_count(), 0);
    }

    #[tokio::test]
    async fn test_load_success() {
        let store = loaded().await;
        assert_eq!(store.state(), &LoadState::Ready);
        assert!(store.error().is_none());
        assert_eq!(store.total_count(), 3);
        assert_eq!(store.filtered_count(), 3);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error() {
        let store = GeoData::load(&FailingSource, DEFAULT_DEBOUNCE).await;
        assert!(!store.is_loading());
        assert_eq!(store.error(), Some("Failed to fetch data"));
        assert!(store.rows().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_applies_after_debounce() {
        let mut store = loaded().await;
        store.set_filter_text("urban");
        assert_eq!(store.filter_text(), "urban");
        assert_eq!(store.debounced_filter_text(), "");
        assert_eq!(store.processed().len(), 3);

        store.settle().await;
        assert_eq!(store.debounced_filter_text(), "urban");
        let rows = store.processed();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
        assert_eq!(store.filtered_count(), 1);
        assert_eq!(store.total_count(), 3);
    }

    #[tokio::test]
    async fn test_filter_now_skips_debounce() {
        let mut store = loaded().await;
        store.set_filter_text_now("pending");
        let rows = store.processed();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
    }

    #[tokio::test]
    async fn test_sort_model_applies() {
        let mut store = loaded().await;
        store.set_sort_model(SortModel::by(SortItem::desc(SortField::Latitude)));
        let ids: Vec<u32> = store.processed().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(store.sort_model().primary().unwrap().field, SortField::Latitude);
    }

    #[tokio::test]
    async fn test_refresh_is_memoized() {
        let mut store = loaded().await;
        assert!(store.refresh());
        assert!(!store.refresh());

        store.set_sort_model(SortModel::by(SortItem::asc(SortField::ProjectName)));
        assert!(store.refresh());
        assert!(!store.refresh());

        store.set_filter_text_now("a");
        assert!(store.refresh());
    }

    #[tokio::test]
    async fn test_refetch_invalidates_cache() {
        let mut store = loaded().await;
        store.refresh();
        store.fetch(&FixedSource(sample()[..1].to_vec())).await;
        assert_eq!(store.processed().len(), 1);
        assert_eq!(store.total_count(), 1);
    }

    #[tokio::test]
    async fn test_project_lookup() {
        let store = loaded().await;
        assert_eq!(store.project(3).unwrap().project_name, "Rural-Max-300");
        assert!(store.project(42).is_none());
    }
}

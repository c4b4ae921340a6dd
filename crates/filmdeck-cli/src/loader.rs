//! Page loading into a [`MovieStore`].
#![allow(clippy::future_not_send)]

use filmdeck_api::tmdb::{LocalTmdbApi, MovieListQuery, TmdbError};
use filmdeck_store::MovieStore;
use tracing::instrument;

/// Summary of one loaded page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    /// Page that was loaded.
    pub page: u32,
    /// Total pages reported by TMDB.
    pub total_pages: u32,
    /// Movies added to the store by this page.
    pub added: usize,
}

/// Fetches one page of `query` and merges it into `store`.
///
/// Page 1 (or 0) replaces the list; later pages append, skipping ids
/// already present. Search mode follows the query kind. On failure the
/// list, page cursor and search flags are left as they were.
///
/// # Errors
///
/// Returns the [`TmdbError`] of the underlying request.
#[instrument(skip_all, fields(path = query.path(), page = query.page()))]
pub async fn load_page(
    api: &(impl LocalTmdbApi + Sync),
    store: &mut MovieStore,
    query: &MovieListQuery,
) -> Result<PageOutcome, TmdbError> {
    store.set_loading(true);
    let result = api.movie_list(query).await;
    store.set_loading(false);
    let page = result?;

    let requested = query.page();
    match query.search_text() {
        Some(text) => store.set_search_mode(true, Some(text)),
        None => store.set_search_mode(false, None),
    }

    let added = if requested <= 1 {
        store.replace(page.results);
        store.len()
    } else {
        store.append(page.results)
    };
    store.set_page(requested);

    tracing::debug!(added, total = store.len(), "page loaded");
    Ok(PageOutcome {
        page: requested,
        total_pages: page.total_pages,
        added,
    })
}

/// Loads pages `1..=pages` of `query`, stopping early at the last page
/// TMDB reports.
///
/// Returns the outcome of the last loaded page, or `None` when `pages`
/// is 0.
///
/// # Errors
///
/// Returns the first [`TmdbError`]; pages loaded before it stay in `store`.
#[instrument(skip_all, fields(path = query.path(), pages = pages))]
pub async fn load_pages(
    api: &(impl LocalTmdbApi + Sync),
    store: &mut MovieStore,
    query: &MovieListQuery,
    pages: u32,
) -> Result<Option<PageOutcome>, TmdbError> {
    let mut last = None;
    for n in 1..=pages {
        let outcome = load_page(api, store, &query.with_page(n)).await?;
        last = Some(outcome);
        if n >= outcome.total_pages {
            break;
        }
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashMap;
    use std::sync::Mutex;

    use filmdeck_api::tmdb::{
        FailureCause, MovieCredits, MovieDetails, MovieId, MoviePage, MovieSummary, Video,
        WatchProviders,
    };
    use reqwest::StatusCode;

    use super::*;

    /// Mock API serving pre-configured pages keyed by page number.
    struct MockTmdbApi {
        pages: HashMap<u32, Vec<MovieId>>,
        total_pages: u32,
        requested: Mutex<Vec<u32>>,
    }

    impl MockTmdbApi {
        fn new(pages: &[(u32, &[MovieId])], total_pages: u32) -> Self {
            Self {
                pages: pages.iter().map(|(n, ids)| (*n, ids.to_vec())).collect(),
                total_pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    fn failure(path: &str) -> TmdbError {
        TmdbError::NetworkFailure {
            path: String::from(path),
            cause: FailureCause::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: String::from("upstream unavailable"),
            },
        }
    }

    fn summary(id: MovieId) -> MovieSummary {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Movie {id}"),
            "overview": null,
            "release_date": "2001-01-01",
            "poster_path": null,
            "backdrop_path": null,
        }))
        .unwrap()
    }

    impl LocalTmdbApi for MockTmdbApi {
        async fn movie_list(&self, query: &MovieListQuery) -> Result<MoviePage, TmdbError> {
            let page = query.page();
            self.requested.lock().unwrap().push(page);
            let ids = self.pages.get(&page).ok_or_else(|| failure(query.path()))?;
            Ok(MoviePage {
                page,
                results: ids.iter().copied().map(summary).collect(),
                total_pages: self.total_pages,
                total_results: 0,
            })
        }

        async fn movie_details(&self, _movie_id: MovieId) -> Result<MovieDetails, TmdbError> {
            Err(failure("movie"))
        }

        async fn movie_credits(&self, _movie_id: MovieId) -> Result<MovieCredits, TmdbError> {
            Err(failure("movie/credits"))
        }

        async fn movie_videos(&self, _movie_id: MovieId) -> Result<Vec<Video>, TmdbError> {
            Ok(vec![])
        }

        async fn movie_recommendations(
            &self,
            _movie_id: MovieId,
        ) -> Result<Vec<MovieSummary>, TmdbError> {
            Ok(vec![])
        }

        async fn watch_providers(
            &self,
            _movie_id: MovieId,
            _region: Option<&str>,
        ) -> Result<Option<WatchProviders>, TmdbError> {
            Ok(None)
        }
    }

    fn ids(store: &MovieStore) -> Vec<MovieId> {
        store.movies().iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_first_page_replaces_list() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[3, 4])], 10);
        let mut store = MovieStore::new();
        store.replace(vec![summary(1), summary(2)]);

        // Act
        let outcome = load_page(&api, &mut store, &MovieListQuery::popular(1))
            .await
            .unwrap();

        // Assert
        assert_eq!(ids(&store), vec![3, 4]);
        assert_eq!(outcome.added, 2);
        assert_eq!(store.current_page(), 1);
        assert!(!store.view().is_loading);
    }

    #[tokio::test]
    async fn test_next_page_appends_without_duplicates() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[1, 2]), (2, &[2, 3])], 10);
        let mut store = MovieStore::new();
        load_page(&api, &mut store, &MovieListQuery::popular(1))
            .await
            .unwrap();

        // Act
        let outcome = load_page(&api, &mut store, &MovieListQuery::popular(2))
            .await
            .unwrap();

        // Assert
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert_eq!(outcome.added, 1);
        assert_eq!(store.current_page(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_store_untouched() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[1, 2])], 10);
        let mut store = MovieStore::new();
        load_page(&api, &mut store, &MovieListQuery::popular(1))
            .await
            .unwrap();

        // Act
        let err = load_page(&api, &mut store, &MovieListQuery::popular(2))
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.current_page(), 1);
        assert!(!store.view().is_loading);
    }

    #[tokio::test]
    async fn test_search_query_sets_search_mode() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[268]), (2, &[7])], 10);
        let mut store = MovieStore::new();

        // Act
        load_page(&api, &mut store, &MovieListQuery::search("batman", 1))
            .await
            .unwrap();
        let during = store.active_query().map(String::from);
        load_page(&api, &mut store, &MovieListQuery::popular(1))
            .await
            .unwrap();

        // Assert
        assert_eq!(during.as_deref(), Some("batman"));
        assert!(!store.view().is_search_mode);
        assert_eq!(store.view().query, "batman");
        assert_eq!(store.active_query(), None);
    }

    #[tokio::test]
    async fn test_load_pages_accumulates() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[1, 2]), (2, &[2, 3]), (3, &[4])], 10);
        let mut store = MovieStore::new();

        // Act
        let last = load_pages(&api, &mut store, &MovieListQuery::top_rated(1), 3)
            .await
            .unwrap();

        // Assert
        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
        assert_eq!(last.unwrap().page, 3);
        assert_eq!(api.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_pages_stops_at_last_page() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[1]), (2, &[2])], 2);
        let mut store = MovieStore::new();

        // Act
        let last = load_pages(&api, &mut store, &MovieListQuery::popular(1), 5)
            .await
            .unwrap();

        // Assert
        assert_eq!(api.requested(), vec![1, 2]);
        assert_eq!(last.unwrap().total_pages, 2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_load_zero_pages() {
        // Arrange
        let api = MockTmdbApi::new(&[(1, &[1])], 1);
        let mut store = MovieStore::new();

        // Act
        let last = load_pages(&api, &mut store, &MovieListQuery::popular(1), 0)
            .await
            .unwrap();

        // Assert
        assert!(last.is_none());
        assert!(api.requested().is_empty());
        assert!(store.is_empty());
    }
}

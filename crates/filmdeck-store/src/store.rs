//! `MovieStore` - accumulated movie list and its view state.

use std::collections::HashSet;

use filmdeck_api::tmdb::{MovieDetails, MovieId, MovieSummary};

use crate::view::{DisplaySize, ViewState};

/// The movie a detail view is showing.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum SelectedMovie {
    /// A list entry.
    Summary(MovieSummary),
    /// A full detail record.
    Details(Box<MovieDetails>),
}

impl SelectedMovie {
    /// TMDB movie ID.
    #[must_use]
    pub fn id(&self) -> MovieId {
        match self {
            Self::Summary(m) => m.id,
            Self::Details(d) => d.id,
        }
    }

    /// Localized title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Summary(m) => &m.title,
            Self::Details(d) => &d.title,
        }
    }
}

impl From<MovieSummary> for SelectedMovie {
    fn from(movie: MovieSummary) -> Self {
        Self::Summary(movie)
    }
}

impl From<MovieDetails> for SelectedMovie {
    fn from(details: MovieDetails) -> Self {
        Self::Details(Box::new(details))
    }
}

/// Movie list state for one session.
///
/// Invariant: no two entries of `movies` share an `id`.
/// Every mutation goes through `&mut self`, so there is a single writer.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieStore {
    /// Accumulated movies, in insertion order.
    movies: Vec<MovieSummary>,
    /// Movie shown in the detail view.
    selected: Option<SelectedMovie>,
    /// Page cursor. Set by the caller, never advanced here.
    current_page: u32,
    /// Presentation flags.
    view: ViewState,
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore {
    /// Creates an empty store on page 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            selected: None,
            current_page: 1,
            view: ViewState::default(),
        }
    }

    /// Creates an empty store with the given card size.
    #[must_use]
    pub fn with_display_size(display_size: DisplaySize) -> Self {
        let mut store = Self::new();
        store.view.display_size = display_size;
        store
    }

    /// Accumulated movies.
    #[must_use]
    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    /// Number of accumulated movies.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Whether a movie with `id` is in the list.
    #[must_use]
    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    /// Selected movie, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&SelectedMovie> {
        self.selected.as_ref()
    }

    /// Page cursor.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// View flags.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Search text, only while search mode is on.
    #[must_use]
    pub fn active_query(&self) -> Option<&str> {
        self.view
            .is_search_mode
            .then_some(self.view.query.as_str())
    }

    /// Replaces the list with `items`.
    ///
    /// Repeated ids in `items` keep their first occurrence.
    pub fn replace(&mut self, items: Vec<MovieSummary>) {
        let received = items.len();
        self.movies.clear();
        let added = self.append_unique(items, HashSet::with_capacity(received));
        tracing::debug!(received, kept = added, "movie list replaced");
    }

    /// Appends the movies of `items` whose id is not in the list yet.
    ///
    /// Keeps the order of `items`; existing entries are neither moved nor
    /// overwritten. Returns the number of movies added.
    pub fn append(&mut self, items: Vec<MovieSummary>) -> usize {
        if items.is_empty() {
            return 0;
        }
        let received = items.len();
        let mut seen: HashSet<MovieId> =
            HashSet::with_capacity(self.movies.len().saturating_add(received));
        seen.extend(self.movies.iter().map(|m| m.id));
        let added = self.append_unique(items, seen);
        tracing::debug!(
            received,
            added,
            skipped = received.saturating_sub(added),
            total = self.movies.len(),
            "movies appended"
        );
        added
    }

    /// Pushes every item whose id is not in `seen`.
    fn append_unique(&mut self, items: Vec<MovieSummary>, mut seen: HashSet<MovieId>) -> usize {
        let before = self.movies.len();
        self.movies.reserve(items.len());
        for movie in items {
            if seen.insert(movie.id) {
                self.movies.push(movie);
            }
        }
        self.movies.len().saturating_sub(before)
    }

    /// Empties the list. Page cursor and flags are left alone.
    pub fn clear(&mut self) {
        self.movies.clear();
    }

    /// Sets or clears the selected movie.
    pub fn select_movie(&mut self, movie: Option<SelectedMovie>) {
        self.selected = movie;
    }

    /// Sets the page cursor. No bounds checks.
    pub const fn set_page(&mut self, page: u32) {
        self.current_page = page;
    }

    /// Sets the loading flag.
    pub const fn set_loading(&mut self, loading: bool) {
        self.view.is_loading = loading;
    }

    /// Turns search mode on or off.
    ///
    /// `query` replaces the stored search text when given; `None` keeps
    /// the previous text, which is ignored while search mode is off.
    pub fn set_search_mode(&mut self, enabled: bool, query: Option<&str>) {
        self.view.is_search_mode = enabled;
        if let Some(q) = query {
            self.view.query = String::from(q);
        }
    }

    /// Sets the card size.
    pub const fn set_display_size(&mut self, size: DisplaySize) {
        self.view.display_size = size;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn movie(id: MovieId) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {id}"),
            original_title: format!("Movie {id}"),
            original_language: String::from("en"),
            overview: None,
            release_date: Some(String::from("2000-01-01")),
            poster_path: None,
            backdrop_path: None,
            popularity: 1.0,
            vote_average: 7.0,
            vote_count: 100,
            genre_ids: vec![18],
            adult: false,
        }
    }

    fn movies(ids: &[MovieId]) -> Vec<MovieSummary> {
        ids.iter().copied().map(movie).collect()
    }

    fn ids(store: &MovieStore) -> Vec<MovieId> {
        store.movies().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_new_store_defaults() {
        // Arrange & Act
        let store = MovieStore::new();

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.current_page(), 1);
        assert!(store.selected().is_none());
        assert_eq!(store.view(), &ViewState::default());
    }

    #[test]
    fn test_append_skips_existing_ids() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[1, 2]));

        // Act
        let added = store.append(movies(&[2, 3]));

        // Assert
        assert_eq!(added, 1);
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_append_union_without_duplicates() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        store.append(movies(&[5, 1, 9, 3]));
        store.append(movies(&[3, 7, 5, 2]));

        // Assert
        let got = ids(&store);
        assert_eq!(got, vec![5, 1, 9, 3, 7, 2]);
        let unique: HashSet<MovieId> = got.iter().copied().collect();
        assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn test_append_empty_is_noop() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[1, 2, 3]));

        // Act
        let added = store.append(Vec::new());

        // Assert
        assert_eq!(added, 0);
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn test_replace_then_append_same_is_unchanged() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[4, 8, 15]));
        let before = store.movies().to_vec();

        // Act
        let added = store.append(movies(&[4, 8, 15]));

        // Assert
        assert_eq!(added, 0);
        assert_eq!(store.movies(), before.as_slice());
    }

    #[test]
    fn test_append_keeps_page_order() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        store.append(movies(&[10, 20, 30]));
        store.append(movies(&[40, 50]));

        // Assert
        assert_eq!(ids(&store), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_append_does_not_overwrite_existing_entry() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[1]));
        let mut newer = movie(1);
        newer.title = String::from("Renamed");

        // Act
        store.append(vec![newer]);

        // Assert
        assert_eq!(store.movies()[0].title, "Movie 1");
    }

    #[test]
    fn test_append_drops_duplicates_within_batch() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        let added = store.append(movies(&[1, 1, 2]));

        // Assert
        assert_eq!(added, 2);
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_replace_discards_previous_list() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[1, 2, 3]));

        // Act
        store.replace(movies(&[7]));

        // Assert
        assert_eq!(ids(&store), vec![7]);
    }

    #[test]
    fn test_replace_deduplicates() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        store.replace(movies(&[3, 1, 3, 2, 1]));

        // Assert
        assert_eq!(ids(&store), vec![3, 1, 2]);
    }

    #[test]
    fn test_clear_keeps_page_and_flags() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[1, 2]));
        store.set_page(4);
        store.set_display_size(DisplaySize::Small);

        // Act
        store.clear();

        // Assert
        assert!(store.is_empty());
        assert_eq!(store.current_page(), 4);
        assert_eq!(store.view().display_size, DisplaySize::Small);
    }

    #[test]
    fn test_contains() {
        // Arrange
        let mut store = MovieStore::new();
        store.replace(movies(&[550, 680]));

        // Act & Assert
        assert!(store.contains(550));
        assert!(!store.contains(13));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_search_mode_keeps_last_query() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        store.set_search_mode(true, Some("batman"));
        let while_searching = store.active_query().map(String::from);
        store.set_search_mode(false, None);

        // Assert
        assert_eq!(while_searching.as_deref(), Some("batman"));
        assert!(!store.view().is_search_mode);
        assert_eq!(store.view().query, "batman");
        assert_eq!(store.active_query(), None);
    }

    #[test]
    fn test_search_mode_replaces_query() {
        // Arrange
        let mut store = MovieStore::new();
        store.set_search_mode(true, Some("batman"));

        // Act
        store.set_search_mode(true, Some("alien"));

        // Assert
        assert_eq!(store.active_query(), Some("alien"));
    }

    #[test]
    fn test_set_page_has_no_bounds_check() {
        // Arrange
        let mut store = MovieStore::new();

        // Act
        store.set_page(0);

        // Assert
        assert_eq!(store.current_page(), 0);
    }

    #[test]
    fn test_flag_setters() {
        // Arrange
        let mut store = MovieStore::with_display_size(DisplaySize::Medium);

        // Act
        store.set_loading(true);

        // Assert
        assert!(store.view().is_loading);
        assert_eq!(store.view().display_size, DisplaySize::Medium);
    }

    #[test]
    fn test_select_movie_replaces_wholesale() {
        // Arrange
        let mut store = MovieStore::new();
        store.select_movie(Some(SelectedMovie::from(movie(1))));

        // Act
        store.select_movie(Some(SelectedMovie::from(movie(2))));

        // Assert
        let selected = store.selected().unwrap();
        assert_eq!(selected.id(), 2);
        assert_eq!(selected.title(), "Movie 2");

        store.select_movie(None);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_selection_is_independent_of_list() {
        // Arrange
        let mut store = MovieStore::new();
        store.select_movie(Some(SelectedMovie::from(movie(99))));

        // Act
        store.replace(movies(&[1, 2]));
        store.clear();

        // Assert
        assert_eq!(store.selected().map(SelectedMovie::id), Some(99));
    }

    #[test]
    fn test_append_logs_debug_event() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::DEBUG))
            .only()
            .run_with_handle();
        let mut store = MovieStore::new();

        // Act
        with_default(subscriber, || {
            store.append(movies(&[1, 2]));
        });

        // Assert
        handle.assert_finished();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_append_empty_logs_nothing() {
        // Arrange
        let (subscriber, handle) = subscriber::mock().only().run_with_handle();
        let mut store = MovieStore::new();

        // Act
        with_default(subscriber, || {
            store.append(Vec::new());
        });

        // Assert
        handle.assert_finished();
    }
}

//! Logical movie list requests and their query parameters.

/// Minimum vote count applied by rating-sorted discover queries.
///
/// Keeps titles with a handful of votes from topping the list.
pub const MIN_VOTE_COUNT: u32 = 100;

/// Default `sort_by` for [`DiscoverFilters`].
pub const DEFAULT_FILTER_SORT: &str = "vote_average.desc";

const SORT_POPULARITY: &str = "popularity.desc";
const SORT_RATING: &str = "vote_average.desc";

/// Optional filters for a free-form `discover/movie` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverFilters {
    /// Genre filter (`None` = every genre).
    pub genre_id: Option<u32>,
    /// Sort order (default: `vote_average.desc`).
    pub sort_by: String,
    /// Result page (default: 1).
    pub page: u32,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            genre_id: None,
            sort_by: String::from(DEFAULT_FILTER_SORT),
            page: 1,
        }
    }
}

impl DiscoverFilters {
    /// Creates filters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to a genre.
    #[must_use]
    pub const fn genre(mut self, genre_id: u32) -> Self {
        self.genre_id = Some(genre_id);
        self
    }

    /// Sets the sort order (e.g., `"popularity.desc"`).
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// A paginated movie list request.
///
/// Each variant is one logical TMDB operation. The client adds the
/// credential and locale; everything else comes from [`MovieListQuery::params`].
#[derive(Debug, Clone, PartialEq)]
pub enum MovieListQuery {
    /// `movie/popular`.
    Popular {
        /// Result page.
        page: u32,
    },
    /// `movie/top_rated`.
    TopRated {
        /// Result page.
        page: u32,
    },
    /// `search/movie`.
    Search {
        /// Search text.
        query: String,
        /// Result page.
        page: u32,
    },
    /// `discover/movie` sorted by rating, at or above `min_rating`.
    MinRating {
        /// Minimum vote average.
        min_rating: f64,
        /// Result page.
        page: u32,
    },
    /// `discover/movie` in a genre, most popular first.
    Genre {
        /// TMDB genre ID.
        genre_id: u32,
        /// Result page.
        page: u32,
    },
    /// `discover/movie` in a genre, best rated first.
    TopRatedByGenre {
        /// TMDB genre ID.
        genre_id: u32,
        /// Result page.
        page: u32,
    },
    /// `discover/movie` released in a year, most popular first.
    Year {
        /// Primary release year.
        year: u32,
        /// Result page.
        page: u32,
    },
    /// `discover/movie` with caller-chosen filters.
    Filtered(DiscoverFilters),
}

impl MovieListQuery {
    /// Popular movies.
    #[must_use]
    pub const fn popular(page: u32) -> Self {
        Self::Popular { page }
    }

    /// Top rated movies.
    #[must_use]
    pub const fn top_rated(page: u32) -> Self {
        Self::TopRated { page }
    }

    /// Free text search.
    #[must_use]
    pub fn search(query: impl Into<String>, page: u32) -> Self {
        Self::Search {
            query: query.into(),
            page,
        }
    }

    /// Movies rated at least `min_rating`.
    #[must_use]
    pub const fn min_rating(min_rating: f64, page: u32) -> Self {
        Self::MinRating { min_rating, page }
    }

    /// Movies in a genre by popularity.
    #[must_use]
    pub const fn genre(genre_id: u32, page: u32) -> Self {
        Self::Genre { genre_id, page }
    }

    /// Movies in a genre by rating.
    #[must_use]
    pub const fn top_rated_by_genre(genre_id: u32, page: u32) -> Self {
        Self::TopRatedByGenre { genre_id, page }
    }

    /// Movies released in `year` by popularity.
    #[must_use]
    pub const fn year(year: u32, page: u32) -> Self {
        Self::Year { year, page }
    }

    /// Movies matching `filters`.
    #[must_use]
    pub const fn filtered(filters: DiscoverFilters) -> Self {
        Self::Filtered(filters)
    }

    /// Returns the request path relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Popular { .. } => "movie/popular",
            Self::TopRated { .. } => "movie/top_rated",
            Self::Search { .. } => "search/movie",
            Self::MinRating { .. }
            | Self::Genre { .. }
            | Self::TopRatedByGenre { .. }
            | Self::Year { .. }
            | Self::Filtered(_) => "discover/movie",
        }
    }

    /// Returns the requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Popular { page }
            | Self::TopRated { page }
            | Self::Search { page, .. }
            | Self::MinRating { page, .. }
            | Self::Genre { page, .. }
            | Self::TopRatedByGenre { page, .. }
            | Self::Year { page, .. } => *page,
            Self::Filtered(filters) => filters.page,
        }
    }

    /// Returns the same request for another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        match &mut next {
            Self::Popular { page: p }
            | Self::TopRated { page: p }
            | Self::Search { page: p, .. }
            | Self::MinRating { page: p, .. }
            | Self::Genre { page: p, .. }
            | Self::TopRatedByGenre { page: p, .. }
            | Self::Year { page: p, .. } => *p = page,
            Self::Filtered(filters) => filters.page = page,
        }
        next
    }

    /// Returns the search text for [`MovieListQuery::Search`].
    #[must_use]
    pub const fn search_text(&self) -> Option<&str> {
        match self {
            Self::Search { query, .. } => Some(query.as_str()),
            _ => None,
        }
    }

    /// Builds the operation-specific query parameters.
    ///
    /// `api_key` and `language` are not included.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = match self {
            Self::Popular { .. } | Self::TopRated { .. } => Vec::new(),
            Self::Search { query, .. } => vec![("query", query.clone())],
            Self::MinRating { min_rating, .. } => vec![
                ("sort_by", String::from(SORT_RATING)),
                ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
                ("vote_average.gte", min_rating.to_string()),
            ],
            Self::Genre { genre_id, .. } => vec![
                ("with_genres", genre_id.to_string()),
                ("sort_by", String::from(SORT_POPULARITY)),
            ],
            Self::TopRatedByGenre { genre_id, .. } => vec![
                ("with_genres", genre_id.to_string()),
                ("sort_by", String::from(SORT_RATING)),
                ("vote_count.gte", MIN_VOTE_COUNT.to_string()),
            ],
            Self::Year { year, .. } => vec![
                ("primary_release_year", year.to_string()),
                ("sort_by", String::from(SORT_POPULARITY)),
            ],
            Self::Filtered(filters) => {
                let mut p = vec![("sort_by", filters.sort_by.clone())];
                if let Some(genre_id) = filters.genre_id {
                    p.push(("with_genres", genre_id.to_string()));
                }
                p.push(("vote_count.gte", MIN_VOTE_COUNT.to_string()));
                p
            }
        };
        params.push(("page", self.page().to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_popular_params() {
        // Arrange
        let query = MovieListQuery::popular(2);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(query.path(), "movie/popular");
        assert_eq!(params, vec![("page", String::from("2"))]);
    }

    #[test]
    fn test_top_rated_path() {
        // Arrange & Act
        let query = MovieListQuery::top_rated(1);

        // Assert
        assert_eq!(query.path(), "movie/top_rated");
        assert_eq!(value(&query.params(), "page"), Some("1"));
    }

    #[test]
    fn test_search_params() {
        // Arrange
        let query = MovieListQuery::search("batman", 3);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(query.path(), "search/movie");
        assert_eq!(value(&params, "query"), Some("batman"));
        assert_eq!(value(&params, "page"), Some("3"));
        assert_eq!(query.search_text(), Some("batman"));
    }

    #[test]
    fn test_min_rating_params() {
        // Arrange
        let query = MovieListQuery::min_rating(7.5, 1);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(query.path(), "discover/movie");
        assert_eq!(value(&params, "sort_by"), Some("vote_average.desc"));
        assert_eq!(value(&params, "vote_count.gte"), Some("100"));
        assert_eq!(value(&params, "vote_average.gte"), Some("7.5"));
    }

    #[test]
    fn test_genre_sorted_by_popularity() {
        // Arrange
        let query = MovieListQuery::genre(28, 1);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(value(&params, "with_genres"), Some("28"));
        assert_eq!(value(&params, "sort_by"), Some("popularity.desc"));
        assert_eq!(value(&params, "vote_count.gte"), None);
    }

    #[test]
    fn test_top_rated_by_genre_requires_vote_count() {
        // Arrange
        let query = MovieListQuery::top_rated_by_genre(18, 4);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(value(&params, "with_genres"), Some("18"));
        assert_eq!(value(&params, "sort_by"), Some("vote_average.desc"));
        assert_eq!(value(&params, "vote_count.gte"), Some("100"));
        assert_eq!(value(&params, "page"), Some("4"));
    }

    #[test]
    fn test_year_params() {
        // Arrange
        let query = MovieListQuery::year(1999, 1);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(value(&params, "primary_release_year"), Some("1999"));
        assert_eq!(value(&params, "sort_by"), Some("popularity.desc"));
    }

    #[test]
    fn test_filters_without_genre_omit_with_genres() {
        // Arrange
        let query = MovieListQuery::filtered(DiscoverFilters::new());

        // Act
        let params = query.params();

        // Assert
        assert!(params.iter().all(|(k, _)| *k != "with_genres"));
        assert_eq!(value(&params, "sort_by"), Some(DEFAULT_FILTER_SORT));
        assert_eq!(value(&params, "vote_count.gte"), Some("100"));
        assert_eq!(value(&params, "page"), Some("1"));
    }

    #[test]
    fn test_filters_with_genre_and_sort() {
        // Arrange
        let filters = DiscoverFilters::new()
            .genre(35)
            .sort_by("popularity.desc")
            .page(5);
        let query = MovieListQuery::filtered(filters);

        // Act
        let params = query.params();

        // Assert
        assert_eq!(value(&params, "with_genres"), Some("35"));
        assert_eq!(value(&params, "sort_by"), Some("popularity.desc"));
        assert_eq!(query.page(), 5);
    }

    #[test]
    fn test_with_page_keeps_other_fields() {
        // Arrange
        let query = MovieListQuery::search("alien", 1);

        // Act
        let next = query.with_page(2);

        // Assert
        assert_eq!(next, MovieListQuery::search("alien", 2));
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_with_page_on_filters() {
        // Arrange
        let query = MovieListQuery::filtered(DiscoverFilters::new().genre(12));

        // Act
        let next = query.with_page(3);

        // Assert
        assert_eq!(next.page(), 3);
        assert_eq!(value(&next.params(), "with_genres"), Some("12"));
    }
}

//! TMDB API response types.

use std::collections::HashMap;

use serde::Deserialize;

/// TMDB movie identifier.
pub type MovieId = u64;

/// Base URL for TMDB image assets.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Builds an image URL from a `poster_path`/`backdrop_path` and a size tag
/// such as `"w185"`, `"w500"` or `"original"`.
#[must_use]
pub fn poster_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE_URL}/{size}{path}")
}

// --- Movie lists ---

/// Paginated envelope shared by list endpoints
/// (`movie/popular`, `search/movie`, `discover/movie`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A single movie entry from a list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD, empty or null when unknown).
    pub release_date: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
}

impl MovieSummary {
    /// Returns the release year parsed from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<u32> {
        self.release_date.as_deref().and_then(parse_year)
    }
}

/// Parses the leading `YYYY` of a TMDB date string.
fn parse_year(date: &str) -> Option<u32> {
    date.get(..4)?.parse().ok()
}

// --- Movie details ---

/// Response from `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Status (e.g., "Released").
    pub status: Option<String>,
    /// Budget in USD (0 when unknown).
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default)]
    pub revenue: u64,
    /// IMDB identifier (e.g. `tt0137523`).
    pub imdb_id: Option<String>,
    /// Homepage URL.
    pub homepage: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl MovieDetails {
    /// Returns the release year parsed from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<u32> {
        self.release_date.as_deref().and_then(parse_year)
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieCredits {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Cast, ordered by billing.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A cast entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
    /// Profile image path.
    pub profile_path: Option<String>,
}

/// A crew entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// TMDB person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Department (e.g., "Directing").
    #[serde(default)]
    pub department: String,
    /// Job (e.g., "Director").
    #[serde(default)]
    pub job: String,
    /// Profile image path.
    pub profile_path: Option<String>,
}

impl MovieCredits {
    /// Returns the names of crew members whose job is `Director`.
    #[must_use]
    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job == "Director")
            .map(|c| c.name.as_str())
            .collect()
    }
}

// --- Videos ---

/// Response from `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VideosResponse {
    /// Videos.
    pub results: Vec<Video>,
}

/// A trailer, teaser, clip or featurette.
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// TMDB video ID.
    pub id: String,
    /// Key on the hosting site (the video ID when `site` is `"YouTube"`).
    pub key: String,
    /// Video name.
    pub name: String,
    /// Hosting site.
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser").
    #[serde(rename = "type")]
    pub video_type: String,
    /// Whether the video is official.
    #[serde(default)]
    pub official: bool,
    /// Language (ISO 639-1).
    pub iso_639_1: Option<String>,
}

impl Video {
    /// Returns a browser URL when the video is hosted on `YouTube`.
    #[must_use]
    pub fn watch_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

// --- Watch providers ---

/// Response from `movie/{movie_id}/watch/providers` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchProvidersResponse {
    /// Provider data keyed by ISO 3166-1 region code.
    #[serde(default)]
    pub results: HashMap<String, WatchProviders>,
}

/// Watch providers for one region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviders {
    /// TMDB watch page for the region.
    pub link: Option<String>,
    /// Subscription providers.
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    /// Rental providers.
    #[serde(default)]
    pub rent: Vec<Provider>,
    /// Purchase providers.
    #[serde(default)]
    pub buy: Vec<Provider>,
}

/// A streaming, rental or purchase provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    /// Provider ID.
    pub provider_id: u32,
    /// Provider name.
    pub provider_name: String,
    /// Logo image path.
    pub logo_path: Option<String>,
    /// Display priority (lower first).
    #[serde(default)]
    pub display_priority: u32,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

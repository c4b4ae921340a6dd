//! TMDB API client module.
//!
//! Builds GET requests against the TMDB API v3 movie endpoints
//! and extracts the payload fields the rest of filmdeck consumes.

mod api;
mod client;
mod error;
mod query;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_LANGUAGE, DEFAULT_REGION, TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::{FailureCause, TmdbError};
pub use query::{DEFAULT_FILTER_SORT, DiscoverFilters, MIN_VOTE_COUNT, MovieListQuery};
pub use types::{
    CastMember, CrewMember, Genre, MovieCredits, MovieDetails, MovieId, MoviePage, MovieSummary,
    Provider, Video, WatchProviders, poster_url,
};

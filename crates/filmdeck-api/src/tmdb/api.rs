//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::TmdbError;
use super::query::MovieListQuery;
use super::types::{
    MovieCredits, MovieDetails, MovieId, MoviePage, MovieSummary, Video, WatchProviders,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches one page of a movie list (popular, search, discover, ...).
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] if the request fails, the server
    /// answers with a non-success status, or the body cannot be decoded.
    async fn movie_list(&self, query: &MovieListQuery) -> Result<MoviePage, TmdbError>;

    /// Fetches movie details.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieDetails, TmdbError>;

    /// Fetches cast and crew.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    async fn movie_credits(&self, movie_id: MovieId) -> Result<MovieCredits, TmdbError>;

    /// Fetches trailers, teasers and clips.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    async fn movie_videos(&self, movie_id: MovieId) -> Result<Vec<Video>, TmdbError>;

    /// Fetches recommended movies.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    async fn movie_recommendations(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<MovieSummary>, TmdbError>;

    /// Fetches watch providers for one region.
    ///
    /// `region` falls back to the client's default region. Returns `None`
    /// when TMDB has no data for that region.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    async fn watch_providers(
        &self,
        movie_id: MovieId,
        region: Option<&str>,
    ) -> Result<Option<WatchProviders>, TmdbError>;
}

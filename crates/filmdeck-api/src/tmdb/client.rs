//! `TmdbClient` - TMDB API client implementation.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::LocalTmdbApi;
use super::error::{FailureCause, TmdbError};
use super::query::{DiscoverFilters, MovieListQuery};
use super::types::{
    MovieCredits, MovieDetails, MovieId, MoviePage, MovieSummary, TmdbErrorResponse, Video,
    VideosResponse, WatchProviders, WatchProvidersResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default locale attached to every request.
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Default watch-provider region (ISO 3166-1).
pub const DEFAULT_REGION: &str = "BR";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// v3 API key, sent as the `api_key` query parameter.
    api_key: String,
    /// Locale sent as the `language` query parameter.
    language: String,
    /// Default watch-provider region.
    region: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    region: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            language: None,
            region: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    ///
    /// A missing trailing `/` is added so the last path segment
    /// (e.g. `/3`) survives `Url::join`.
    #[must_use]
    pub fn base_url(mut self, mut url: Url) -> Self {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        self
    }

    /// Sets the v3 API key.
    ///
    /// The key is not validated; a missing or wrong key surfaces as an
    /// HTTP 401 from TMDB.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response locale (default: `pt-BR`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the default watch-provider region (default: `BR`).
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_key: self.api_key.unwrap_or_default(),
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            region: self.region.unwrap_or_else(|| String::from(DEFAULT_REGION)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns the locale attached to every request.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the default watch-provider region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sends a GET request with `api_key` and `language` attached and decodes the JSON body.
    ///
    /// No retry: any failure is returned as-is.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TmdbError::network(path, FailureCause::InvalidUrl(e)))?;

        // The key stays out of the log: only path and operation params.
        tracing::debug!(path, language = %self.language, params = ?query, "TMDB API request");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(query)
            .send()
            .await
            .map_err(|e| TmdbError::network(path, FailureCause::Transport(e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(body, |e| {
                format!("code={}, message={}", e.status_code, e.status_message)
            });
            tracing::debug!(path, status = %status, "TMDB API returned an error status");
            return Err(TmdbError::network(
                path,
                FailureCause::Status { status, message },
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TmdbError::network(path, FailureCause::Transport(e)))?;
        serde_json::from_str(&body).map_err(|e| TmdbError::network(path, FailureCause::Decode(e)))
    }

    /// Runs a list query and keeps only its `results`.
    async fn list_results(
        &self,
        query: &MovieListQuery,
    ) -> Result<Vec<MovieSummary>, TmdbError> {
        self.movie_list(query).await.map(|page| page.results)
    }

    /// Popular movies.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn popular(&self, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::popular(page)).await
    }

    /// Top rated movies.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn top_rated(&self, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::top_rated(page)).await
    }

    /// Searches movies by title.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn search(&self, query: &str, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::search(query, page)).await
    }

    /// Movies rated at least `min_rating` with 100 votes or more.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn by_min_rating(
        &self,
        min_rating: f64,
        page: u32,
    ) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::min_rating(min_rating, page)).await
    }

    /// Movies in a genre, most popular first.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn by_genre(&self, genre_id: u32, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::genre(genre_id, page)).await
    }

    /// Movies in a genre, best rated first, with 100 votes or more.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn top_rated_by_genre(
        &self,
        genre_id: u32,
        page: u32,
    ) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::top_rated_by_genre(genre_id, page)).await
    }

    /// Movies released in `year`, most popular first.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn by_year(&self, year: u32, page: u32) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::year(year, page)).await
    }

    /// Movies matching free-form discover filters.
    ///
    /// # Errors
    ///
    /// Returns [`TmdbError::NetworkFailure`] on any request failure.
    pub async fn with_filters(
        &self,
        filters: DiscoverFilters,
    ) -> Result<Vec<MovieSummary>, TmdbError> {
        self.list_results(&MovieListQuery::filtered(filters)).await
    }
}

impl LocalTmdbApi for TmdbClient {
    #[instrument(skip_all, fields(path = query.path(), page = query.page()))]
    async fn movie_list(&self, query: &MovieListQuery) -> Result<MoviePage, TmdbError> {
        self.get_json(query.path(), &query.params()).await
    }

    #[instrument(skip_all)]
    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieDetails, TmdbError> {
        let path = format!("movie/{movie_id}");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_credits(&self, movie_id: MovieId) -> Result<MovieCredits, TmdbError> {
        let path = format!("movie/{movie_id}/credits");
        self.get_json(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_videos(&self, movie_id: MovieId) -> Result<Vec<Video>, TmdbError> {
        let path = format!("movie/{movie_id}/videos");
        let response: VideosResponse = self.get_json(&path, &[]).await?;
        Ok(response.results)
    }

    #[instrument(skip_all)]
    async fn movie_recommendations(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<MovieSummary>, TmdbError> {
        let path = format!("movie/{movie_id}/recommendations");
        let page: MoviePage = self.get_json(&path, &[]).await?;
        Ok(page.results)
    }

    #[instrument(skip_all)]
    async fn watch_providers(
        &self,
        movie_id: MovieId,
        region: Option<&str>,
    ) -> Result<Option<WatchProviders>, TmdbError> {
        let path = format!("movie/{movie_id}/watch/providers");
        let region = region.unwrap_or(&self.region);
        let mut response: WatchProvidersResponse = self.get_json(&path, &[]).await?;
        let providers = response.results.remove(region);
        if providers.is_none() {
            tracing::debug!(movie_id, region, "no watch providers for region");
        }
        Ok(providers)
    }
}

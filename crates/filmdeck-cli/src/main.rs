//! filmdeck - TMDB movie browser CLI.

/// Application configuration (TOML).
mod config;
/// Page loading into a movie store.
mod loader;
/// Movie card rendering.
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use filmdeck_api::tmdb::{
    DiscoverFilters, LocalTmdbApi, MovieDetails, MovieId, MovieListQuery, MovieSummary,
    Provider, TmdbClient, TmdbError,
};
use filmdeck_store::{DisplaySize, MovieStore, SelectedMovie};
use reqwest::StatusCode;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};
use crate::loader::load_pages;
use crate::render::movie_card;

/// Environment variable holding the TMDB API key.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Load several pages of a list and print the accumulated result.
    Browse(BrowseArgs),
    /// Show or edit the configuration file.
    Config(ConfigCommand),
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// Popular movies (`movie/popular`).
    Popular(PageArgs),
    /// Top rated movies (`movie/top_rated`).
    TopRated(PageArgs),
    /// Search movies by title (`search/movie`).
    Search(TmdbSearchArgs),
    /// Movies rated at or above a minimum vote average.
    ByRating(TmdbByRatingArgs),
    /// Movies in a genre.
    ByGenre(TmdbByGenreArgs),
    /// Movies released in a year.
    ByYear(TmdbByYearArgs),
    /// Discover movies with optional genre and sort order.
    Discover(TmdbDiscoverArgs),
    /// Movie details.
    Details(MovieIdArgs),
    /// Cast and crew.
    Credits(MovieIdArgs),
    /// Trailers, teasers and clips.
    Videos(MovieIdArgs),
    /// Recommended movies.
    Recommendations(MovieIdArgs),
    /// Watch providers for a region.
    Providers(TmdbProvidersArgs),
    /// Details, credits, videos, providers and recommendations at once.
    Movie(MovieIdArgs),
}

/// Result page selector.
#[derive(clap::Args)]
struct PageArgs {
    /// Result page (default: 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Result page.
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `tmdb by-rating` subcommand.
#[derive(clap::Args)]
struct TmdbByRatingArgs {
    /// Minimum vote average (e.g. 7.5).
    #[arg(long, required = true)]
    min: f64,
    /// Result page.
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `tmdb by-genre` subcommand.
#[derive(clap::Args)]
struct TmdbByGenreArgs {
    /// TMDB genre ID (e.g. 28 for Action).
    #[arg(long, required = true)]
    genre: u32,
    /// Sort by rating instead of popularity.
    #[arg(long)]
    top_rated: bool,
    /// Result page.
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `tmdb by-year` subcommand.
#[derive(clap::Args)]
struct TmdbByYearArgs {
    /// Primary release year.
    #[arg(long, required = true)]
    year: u32,
    /// Result page.
    #[command(flatten)]
    page: PageArgs,
}

/// Arguments for the `tmdb discover` subcommand.
#[derive(clap::Args)]
struct TmdbDiscoverArgs {
    /// TMDB genre ID. Every genre when omitted.
    #[arg(long)]
    genre: Option<u32>,
    /// Sort order (default: `vote_average.desc`).
    #[arg(long)]
    sort_by: Option<String>,
    /// Result page.
    #[command(flatten)]
    page: PageArgs,
}

/// Single movie selector.
#[derive(clap::Args)]
struct MovieIdArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: MovieId,
}

/// Arguments for the `tmdb providers` subcommand.
#[derive(clap::Args)]
struct TmdbProvidersArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: MovieId,
    /// ISO 3166-1 region code (default: configured region).
    #[arg(long)]
    region: Option<String>,
}

/// List fetched by `browse` when no query is given.
#[derive(Clone, Copy, ValueEnum)]
enum BrowseList {
    /// `movie/popular`.
    Popular,
    /// `movie/top_rated`.
    TopRated,
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// List to browse.
    #[arg(long, value_enum, default_value_t = BrowseList::Popular)]
    list: BrowseList,
    /// Search text. Overrides `--list`.
    #[arg(long)]
    query: Option<String>,
    /// Number of pages to load (default: 1).
    #[arg(long, default_value_t = 1)]
    pages: u32,
    /// Card size: sm, md or lg (default: configured size).
    #[arg(long)]
    size: Option<DisplaySize>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Persist the default card size.
    DisplaySize(DisplaySizeArgs),
}

/// Arguments for the `config display-size` subcommand.
#[derive(clap::Args)]
struct DisplaySizeArgs {
    /// Card size: sm, md or lg.
    size: DisplaySize,
}

/// Loads the configuration for `dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Builds a `TmdbClient` from the `TMDB_API_KEY` environment variable and
/// the `[tmdb]` config section.
///
/// # Errors
///
/// Returns an error if `TMDB_API_KEY` is not set, `base_url` is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_key =
        std::env::var(API_KEY_ENV).context("TMDB_API_KEY environment variable is required")?;

    let mut builder = TmdbClient::builder()
        .api_key(api_key)
        .language(&config.tmdb.language)
        .region(&config.tmdb.region)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(base_url) = config.tmdb.base_url.as_deref() {
        let url = Url::parse(base_url).with_context(|| format!("invalid base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Wraps a list request error, hinting at a bad key on HTTP 401.
fn explain(err: TmdbError) -> anyhow::Error {
    with_hint(err, None)
}

/// Wraps a per-movie request error; HTTP 404 also means an unknown ID.
fn explain_movie(err: TmdbError) -> anyhow::Error {
    with_hint(err, Some("no movie with that ID"))
}

/// Adds a hint to errors the user can fix locally.
fn with_hint(err: TmdbError, not_found: Option<&'static str>) -> anyhow::Error {
    let hint = match err.status() {
        Some(StatusCode::UNAUTHORIZED) => Some("check the TMDB_API_KEY value"),
        Some(StatusCode::NOT_FOUND) => not_found,
        _ => None,
    };
    let err = anyhow::Error::new(err);
    match hint {
        Some(h) => err.context(h),
        None => err,
    }
}

/// Logs a list of movies at `size`.
fn log_movies(movies: &[MovieSummary], size: DisplaySize) {
    for movie in movies {
        tracing::info!("{}", movie_card(movie, size));
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs a single-page list subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_list(query: &MovieListQuery, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let page = client.movie_list(query).await.map_err(explain)?;

    tracing::info!(
        "Page {} of {} ({} results)",
        page.page,
        page.total_pages,
        page.total_results
    );
    log_movies(&page.results, config.view.display_size);

    Ok(())
}

impl TmdbByGenreArgs {
    /// Genre query honoring `--top-rated`.
    fn query(&self) -> MovieListQuery {
        if self.top_rated {
            MovieListQuery::top_rated_by_genre(self.genre, self.page.page)
        } else {
            MovieListQuery::genre(self.genre, self.page.page)
        }
    }
}

impl TmdbDiscoverArgs {
    /// Discover query; unset options keep the filter defaults.
    fn query(&self) -> MovieListQuery {
        let mut filters = DiscoverFilters::new().page(self.page.page);
        if let Some(genre) = self.genre {
            filters = filters.genre(genre);
        }
        if let Some(sort_by) = &self.sort_by {
            filters = filters.sort_by(sort_by);
        }
        MovieListQuery::filtered(filters)
    }
}

/// Logs movie details.
fn log_details(details: &MovieDetails) {
    tracing::info!("ID: {}", details.id);
    tracing::info!("Title: {}", details.title);
    tracing::info!("Original Title: {}", details.original_title);
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("Tagline: {tagline}");
    }
    tracing::info!(
        "Release Date: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Runtime: {}",
        details
            .runtime
            .map_or_else(|| String::from("-"), |r| format!("{r}min"))
    );
    tracing::info!(
        "Genres: {}",
        details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "Rating: {:.1}/10 ({} votes)",
        details.vote_average,
        details.vote_count
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
        tracing::info!("Overview: {overview}");
    }
}

/// Joins provider names for one offer type.
fn provider_names(providers: &[Provider]) -> String {
    if providers.is_empty() {
        return String::from("-");
    }
    providers
        .iter()
        .map(|p| p.provider_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs the `tmdb details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_details(args: &MovieIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;

    let details = client.movie_details(args.id).await.map_err(explain_movie)?;
    log_details(&details);

    Ok(())
}

/// Runs the `tmdb credits` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_credits(args: &MovieIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;

    let credits = client.movie_credits(args.id).await.map_err(explain_movie)?;

    tracing::info!("Directed by: {}", credits.directors().join(", "));
    tracing::info!("Order\tName\t\t\tCharacter");
    for member in &credits.cast {
        tracing::info!(
            "{}\t{}\t\t{}",
            member.order,
            member.name,
            member.character.as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} cast, {} crew", credits.cast.len(), credits.crew.len());

    Ok(())
}

/// Runs the `tmdb videos` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_videos(args: &MovieIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;

    let videos = client.movie_videos(args.id).await.map_err(explain_movie)?;

    tracing::info!("Type\t\tSite\tName\tURL");
    for video in &videos {
        tracing::info!(
            "{}\t\t{}\t{}\t{}",
            video.video_type,
            video.site,
            video.name,
            video.watch_url().as_deref().unwrap_or("-"),
        );
    }
    tracing::info!("Total: {} videos", videos.len());

    Ok(())
}

/// Runs the `tmdb recommendations` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_recommendations(args: &MovieIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let movies = client
        .movie_recommendations(args.id)
        .await
        .map_err(explain_movie)?;
    log_movies(&movies, config.view.display_size);

    Ok(())
}

/// Runs the `tmdb providers` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_providers(args: &TmdbProvidersArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client(&load_config(dir)?)?;
    let region = args
        .region
        .clone()
        .unwrap_or_else(|| String::from(client.region()));

    let providers = client
        .watch_providers(args.id, Some(&region))
        .await
        .map_err(explain_movie)?;

    let Some(p) = providers else {
        tracing::info!("No watch providers for region {region}");
        return Ok(());
    };
    tracing::info!("Region: {region}");
    tracing::info!("Stream: {}", provider_names(&p.flatrate));
    tracing::info!("Rent: {}", provider_names(&p.rent));
    tracing::info!("Buy: {}", provider_names(&p.buy));
    if let Some(link) = p.link.as_deref() {
        tracing::info!("Link: {link}");
    }

    Ok(())
}

/// Runs the `tmdb movie` subcommand.
///
/// Fetches every detail resource concurrently and selects the movie in a
/// fresh store holding its recommendations.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or any request fails.
#[instrument(skip_all)]
async fn run_tmdb_movie(args: &MovieIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let (details, credits, videos, providers, recommendations) = futures::try_join!(
        client.movie_details(args.id),
        client.movie_credits(args.id),
        client.movie_videos(args.id),
        client.watch_providers(args.id, None),
        client.movie_recommendations(args.id),
    )
    .map_err(explain_movie)?;

    let mut store = MovieStore::with_display_size(config.view.display_size);
    store.replace(recommendations);
    store.select_movie(Some(SelectedMovie::from(details)));

    if let Some(SelectedMovie::Details(details)) = store.selected() {
        log_details(details);
    }
    tracing::info!("Directed by: {}", credits.directors().join(", "));
    let cast: Vec<&str> = credits
        .cast
        .iter()
        .take(5)
        .map(|c| c.name.as_str())
        .collect();
    tracing::info!("Starring: {}", cast.join(", "));
    if let Some(trailer) = videos.iter().find(|v| v.video_type == "Trailer") {
        tracing::info!(
            "Trailer: {}",
            trailer.watch_url().as_deref().unwrap_or(&trailer.name)
        );
    }
    if let Some(p) = providers {
        tracing::info!(
            "Stream ({}): {}",
            client.region(),
            provider_names(&p.flatrate)
        );
    } else {
        tracing::info!("No watch providers for region {}", client.region());
    }
    tracing::info!("--- Recommendations ---");
    log_movies(store.movies(), store.view().display_size);

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// Loads pages `1..=--pages` into a `MovieStore`; page 1 replaces the list,
/// later pages append without duplicates.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or any page fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config)?;

    let query = match (&args.query, args.list) {
        (Some(text), _) => MovieListQuery::search(text, 1),
        (None, BrowseList::Popular) => MovieListQuery::popular(1),
        (None, BrowseList::TopRated) => MovieListQuery::top_rated(1),
    };
    let size = args.size.unwrap_or(config.view.display_size);
    let mut store = MovieStore::with_display_size(size);

    let last = load_pages(&client, &mut store, &query, args.pages)
        .await
        .map_err(explain)?;

    if let Some(text) = store.active_query() {
        tracing::info!("Search: {text}");
    }
    log_movies(store.movies(), store.view().display_size);
    if let Some(outcome) = last {
        tracing::info!("Loaded page {} of {}", outcome.page, outcome.total_pages);
    }

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;

    tracing::info!("Config: {}", path.display());
    tracing::info!("tmdb.language = {}", config.tmdb.language);
    tracing::info!("tmdb.region = {}", config.tmdb.region);
    tracing::info!(
        "tmdb.base_url = {}",
        config.tmdb.base_url.as_deref().unwrap_or("-")
    );
    tracing::info!("view.display_size = {}", config.view.display_size);

    Ok(())
}

/// Runs the `config display-size` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
#[instrument(skip_all)]
fn run_config_display_size(args: &DisplaySizeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;

    config.view.display_size = args.size;
    config.save(&path)?;

    tracing::info!("Display size set to {} in {}", args.size, path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Tmdb(tmdb) => match tmdb.command {
            TmdbSubcommands::Popular(args) => {
                run_tmdb_list(&MovieListQuery::popular(args.page), dir).await
            }
            TmdbSubcommands::TopRated(args) => {
                run_tmdb_list(&MovieListQuery::top_rated(args.page), dir).await
            }
            TmdbSubcommands::Search(args) => {
                let query = MovieListQuery::search(args.query, args.page.page);
                run_tmdb_list(&query, dir).await
            }
            TmdbSubcommands::ByRating(args) => {
                let query = MovieListQuery::min_rating(args.min, args.page.page);
                run_tmdb_list(&query, dir).await
            }
            TmdbSubcommands::ByGenre(args) => run_tmdb_list(&args.query(), dir).await,
            TmdbSubcommands::ByYear(args) => {
                run_tmdb_list(&MovieListQuery::year(args.year, args.page.page), dir).await
            }
            TmdbSubcommands::Discover(args) => run_tmdb_list(&args.query(), dir).await,
            TmdbSubcommands::Details(args) => run_tmdb_details(&args, dir).await,
            TmdbSubcommands::Credits(args) => run_tmdb_credits(&args, dir).await,
            TmdbSubcommands::Videos(args) => run_tmdb_videos(&args, dir).await,
            TmdbSubcommands::Recommendations(args) => run_tmdb_recommendations(&args, dir).await,
            TmdbSubcommands::Providers(args) => run_tmdb_providers(&args, dir).await,
            TmdbSubcommands::Movie(args) => run_tmdb_movie(&args, dir).await,
        },
        Commands::Browse(args) => run_browse(&args, dir).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::DisplaySize(args) => run_config_display_size(&args, dir),
        },
    }
}

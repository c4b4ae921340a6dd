//! Text rendering of movie cards.

use filmdeck_api::tmdb::{MovieSummary, poster_url};
use filmdeck_store::DisplaySize;

/// Renders one movie at the given card size.
///
/// - `sm`: id and title.
/// - `md`: adds release year and rating.
/// - `lg`: adds overview and poster URL on indented lines.
#[must_use]
pub fn movie_card(movie: &MovieSummary, size: DisplaySize) -> String {
    let head = format!("{}\t{}", movie.id, movie.title);
    if size == DisplaySize::Small {
        return head;
    }

    let year = movie
        .release_year()
        .map_or_else(|| String::from("-"), |y| y.to_string());
    let mut card = format!(
        "{head} ({year})\t{:.1}/10 ({} votes)",
        movie.vote_average, movie.vote_count
    );
    if size == DisplaySize::Medium {
        return card;
    }

    if let Some(overview) = movie.overview.as_deref().filter(|o| !o.is_empty()) {
        card.push_str("\n    ");
        card.push_str(overview);
    }
    if let Some(path) = movie.poster_path.as_deref() {
        card.push_str("\n    ");
        card.push_str(&poster_url(path, size.poster_size()));
    }
    card
}

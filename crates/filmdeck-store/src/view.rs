//! View flags and display preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Card size used when listing movies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplaySize {
    /// Title only.
    #[serde(rename = "sm")]
    Small,
    /// Title, year and rating.
    #[serde(rename = "md")]
    Medium,
    /// Everything, including the overview.
    #[default]
    #[serde(rename = "lg")]
    Large,
}

impl DisplaySize {
    /// Short tag (`sm`, `md`, `lg`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
        }
    }

    /// TMDB poster size tag matching this card size.
    #[must_use]
    pub const fn poster_size(self) -> &'static str {
        match self {
            Self::Small => "w185",
            Self::Medium => "w342",
            Self::Large => "w500",
        }
    }
}

impl fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a display size tag is not `sm`, `md` or `lg`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid display size '{0}' (expected sm, md or lg)")]
pub struct ParseDisplaySizeError(String);

impl FromStr for DisplaySize {
    type Err = ParseDisplaySizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sm" | "small" => Ok(Self::Small),
            "md" | "medium" => Ok(Self::Medium),
            "lg" | "large" => Ok(Self::Large),
            other => Err(ParseDisplaySizeError(String::from(other))),
        }
    }
}

/// Presentation flags.
///
/// `query` only matters while `is_search_mode` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct ViewState {
    /// A request is in flight.
    pub is_loading: bool,
    /// The list shows search results.
    pub is_search_mode: bool,
    /// Last search text.
    pub query: String,
    /// Card size.
    pub display_size: DisplaySize,
}

//! In-memory state for filmdeck front ends.
//!
//! Holds the accumulated movie list, the page cursor, the selected
//! movie and view preferences. Nothing here touches the network.

mod store;
/// View flags and display preferences.
pub mod view;

#[allow(clippy::module_name_repetitions)]
pub use store::{MovieStore, SelectedMovie};
pub use view::{DisplaySize, ParseDisplaySizeError, ViewState};

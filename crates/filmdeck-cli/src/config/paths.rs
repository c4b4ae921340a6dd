//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Directory name under the user config root.
const APP_DIR: &str = "filmdeck";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// - `dir` given: `{dir}/config.toml`.
/// - `XDG_CONFIG_HOME` set to an absolute path: `$XDG_CONFIG_HOME/filmdeck/config.toml`.
/// - Otherwise: `~/.config/filmdeck/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir,
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

/// Resolves the config path from explicit environment values.
fn config_path_from(
    dir: Option<&PathBuf>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    // Relative XDG_CONFIG_HOME values are ignored.
    if let Some(xdg) = xdg_config_home.map(PathBuf::from).filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }

    let Some(h) = home.filter(|h| !h.is_empty()) else {
        bail!("cannot locate config directory: neither XDG_CONFIG_HOME nor HOME is set");
    };
    Ok(PathBuf::from(h)
        .join(".config")
        .join(APP_DIR)
        .join(CONFIG_FILE))
}

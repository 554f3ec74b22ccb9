//! Filesystem locations used by the crate.
//!
//! The core keeps no state on disk. The only file it writes is the optional
//! span export, which lives under the user data directory unless configured
//! otherwise.

use std::path::PathBuf;

/// Directory name under the platform data home.
const APP_DIR: &str = "storesearch";

/// Returns the data directory for trace output.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/storesearch`
/// 2. `$HOME/.local/share/storesearch`
/// 3. `./.storesearch` as a last resort
#[must_use]
pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var_os("XDG_DATA_HOME"), std::env::var_os("HOME"))
}

fn data_dir_from(xdg_data_home: Option<std::ffi::OsString>, home: Option<std::ffi::OsString>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }
    PathBuf::from(".").join(format!(".{APP_DIR}"))
}

/// Expands a leading `~` against `$HOME`.
///
/// # Examples
///
/// ```
/// use storesearch::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();
    if path == "~" {
        home.into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_data_home_wins() {
        let dir = data_dir_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/xdg/storesearch"));
    }

    #[test]
    fn falls_back_to_home_then_cwd() {
        let dir = data_dir_from(Some("".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.local/share/storesearch"));
        assert_eq!(data_dir_from(None, None), PathBuf::from("./.storesearch"));
    }
}

//! Path utilities for the data directory and user-supplied paths.
//!
//! Handles tilde expansion and picks the default storage location following
//! the XDG base directory layout.

use std::path::PathBuf;

/// Directory name under the user's data home.
const APP_DIR: &str = "classdesk";

/// Returns the default data directory for classdesk storage.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/classdesk`
/// 2. `$HOME/.local/share/classdesk`
/// 3. `.classdesk` in the working directory
///
/// The JSON state file `state.json` and the log file live here.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    if let Some(data_home) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(data_home).join(APP_DIR);
    }
    match std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join(APP_DIR),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, and every path when `HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use classdesk::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("~user/x"), "~user/x");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var("HOME").ok().filter(|h| !h.is_empty()) else {
        return path.to_string();
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_uses_home() {
        let Ok(home) = std::env::var("HOME") else {
            return;
        };
        if home.is_empty() {
            return;
        }
        assert_eq!(expand_tilde("~"), home);
        assert!(expand_tilde("~/data").ends_with("/data"));
        assert!(expand_tilde("~/data").starts_with(home.trim_end_matches('/')));
    }

    #[test]
    fn data_dir_ends_with_app_name() {
        assert!(default_data_dir().ends_with("classdesk") || default_data_dir().ends_with(".classdesk"));
    }
}

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::orchestrator::DEFAULT_SEARCH_ENDPOINT;

pub const API_URL_VAR: &str = "REPO_SEEK_API_URL";
pub const STATE_DIR_VAR: &str = "REPO_SEEK_STATE_DIR";

/// Runtime settings taken from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub state_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_SEARCH_ENDPOINT.to_string());
        let state_dir = non_empty(STATE_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        debug!("Using endpoint {} and state dir {}", api_url, state_dir.display());
        Config { api_url, state_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset_or_blank() {
        let config = Config::from_lookup(|key| (key == API_URL_VAR).then(|| "  ".to_string()));
        assert_eq!(config.api_url, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.state_dir, env::temp_dir());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|key| match key {
            API_URL_VAR => Some("http://localhost:8080/search".into()),
            STATE_DIR_VAR => Some("/var/tmp/seek".into()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://localhost:8080/search");
        assert_eq!(config.state_dir, PathBuf::from("/var/tmp/seek"));
    }
}

use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the reasoning backend lives.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads the backend location from `COACH_BACKEND_URL`, falling back to
    /// the local development default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("COACH_BACKEND_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }

    /// Joins a path onto the base URL.
    #[must_use]
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        let config = BackendConfig::new("http://localhost:8000/");
        assert_eq!(config.endpoint("/feedback"), "http://localhost:8000/feedback");
        assert_eq!(config.endpoint("search"), "http://localhost:8000/search");
    }
}

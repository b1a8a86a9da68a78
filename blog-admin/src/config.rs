use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    /// Reads `BLOG_API_URL`, falling back to the local development server.
    pub fn from_env() -> Self {
        Self::with_api_url(env::var("BLOG_API_URL").ok().as_deref())
    }

    fn with_api_url(value: Option<&str>) -> Self {
        let api_url = value
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Self { api_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_server() {
        assert_eq!(ClientConfig::with_api_url(None).api_url, DEFAULT_API_URL);
        assert_eq!(ClientConfig::with_api_url(Some("  ")).api_url, DEFAULT_API_URL);
    }

    #[test]
    fn strips_trailing_slash() {
        let config = ClientConfig::with_api_url(Some("https://blog.example.com/api/"));
        assert_eq!(config.api_url, "https://blog.example.com/api");
    }
}

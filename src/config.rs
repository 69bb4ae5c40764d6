use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL. Caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// TMDB v3 API key, sent as the `api_key` query parameter
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB read access token, sent as a bearer token
    #[serde(default)]
    pub tmdb_access_token: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OMDB API key
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDB API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// YouTube Data API key
    #[serde(default)]
    pub youtube_api_key: Option<String>,

    /// YouTube Data API base URL
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    /// Jikan (MyAnimeList) API base URL
    #[serde(default = "default_jikan_api_url")]
    pub jikan_api_url: String,

    /// Path to the mood/age/language music query table (bundled table when unset)
    #[serde(default)]
    pub music_queries_path: Option<String>,

    /// Path to the mood/age fallback video table (bundled table when unset)
    #[serde(default)]
    pub music_fallback_path: Option<String>,

    /// Timeout for outbound API requests, in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Sessions idle for longer than this are dropped, in seconds
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_youtube_api_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_jikan_api_url() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_session_idle_secs() -> u64 {
    3600
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Logs a warning for each catalog that has no credentials configured
    pub fn warn_missing_credentials(&self) {
        if self.tmdb_api_key.is_none() && self.tmdb_access_token.is_none() {
            tracing::warn!("Neither TMDB_API_KEY nor TMDB_ACCESS_TOKEN is set; movie recommendations will be unavailable");
        }
        if self.omdb_api_key.is_none() {
            tracing::warn!("OMDB_API_KEY is not set; movie ratings will come from TMDB only");
        }
        if self.youtube_api_key.is_none() {
            tracing::warn!("YOUTUBE_API_KEY is not set; music recommendations will use fallback videos");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.jikan_api_url, "https://api.jikan.moe/v4");
        assert_eq!(config.port, 3000);
        assert_eq!(config.session_idle_secs, 3600);
        assert!(config.redis_url.is_none());
        assert!(config.music_queries_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config: Config = envy::from_iter(vec![
            ("PORT".to_string(), "8080".to_string()),
            ("YOUTUBE_API_KEY".to_string(), "yt-key".to_string()),
            ("REDIS_URL".to_string(), "redis://cache:6379".to_string()),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.youtube_api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
    }
}

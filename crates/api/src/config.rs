use scriptboard_gemini::GeminiConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: derived by
    /// [`default_request_timeout_secs`]). A request that times out gets a
    /// 408 while its studio action keeps running in the background.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes (default: 32 MiB).
    pub max_body_bytes: usize,
    /// Provider settings.
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | derived from poll settings |
    /// | `MAX_BODY_BYTES`       | `33554432`                 |
    ///
    /// Provider variables are documented on [`GeminiConfig::from_env`].
    pub fn from_env() -> Self {
        let gemini = GeminiConfig::from_env();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse()
                .expect("REQUEST_TIMEOUT_SECS must be a valid u64"),
            Err(_) => default_request_timeout_secs(&gemini),
        };
        let poll_budget_secs = gemini.poll.max_elapsed.as_secs();
        if request_timeout_secs <= poll_budget_secs {
            tracing::warn!(
                request_timeout_secs,
                poll_budget_secs,
                "Request timeout does not cover video polling; production requests will \
                 return 408 and report the outcome through the studio snapshot",
            );
        }

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| "33554432".into())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            gemini,
        }
    }
}

/// Request timeout long enough for one final production to report its own
/// outcome: the full poll budget, one more poll interval, and one provider
/// HTTP timeout for the last status check or the clip download.
pub fn default_request_timeout_secs(gemini: &GeminiConfig) -> u64 {
    (gemini.poll.max_elapsed + gemini.poll.interval + gemini.request_timeout).as_secs()
}

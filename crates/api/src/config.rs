//! Server configuration loaded from environment variables.

/// Top-level server configuration.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection string. When unset the server runs on the
    /// in-memory store.
    pub database_url: Option<String>,
    /// Bearer-token verification settings.
    pub auth: AuthConfig,
    /// Chat-completions endpoint settings.
    pub genai: GenAiConfig,
    /// Stock-image search endpoint settings.
    pub image_search: ImageSearchConfig,
    /// Per-image download timeout during slide-deck export (default: `10`).
    pub export_image_timeout_secs: u64,
}

/// Bearer-token verification settings.
///
/// Tokens are issued by an external identity provider and verified here
/// with a shared HS256 secret.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to verify tokens.
    pub jwt_secret: String,
    /// When true, requests without an `Authorization` header run as a
    /// fixed development user instead of being rejected.
    pub auth_optional: bool,
}

/// Chat-completions (OpenAI-compatible) endpoint settings.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Stock-image search endpoint settings.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                      |
    /// |-----------------------------|------------------------------|
    /// | `HOST`                      | `0.0.0.0`                    |
    /// | `PORT`                      | `3000`                       |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                         |
    /// | `DATABASE_URL`              | unset (in-memory store)      |
    /// | `AUTH_JWT_SECRET`           | required unless auth optional|
    /// | `AUTH_OPTIONAL`             | `false`                      |
    /// | `GENAI_BASE_URL`            | `https://api.openai.com/v1`  |
    /// | `GENAI_API_KEY`             | empty                        |
    /// | `GENAI_MODEL`               | `gpt-4o-mini`                |
    /// | `IMAGE_SEARCH_BASE_URL`     | `https://api.freepik.com/v1` |
    /// | `IMAGE_SEARCH_API_KEY`      | empty                        |
    /// | `EXPORT_IMAGE_TIMEOUT_SECS` | `10`                         |
    ///
    /// # Panics
    ///
    /// Panics on unparsable numeric values, and when `AUTH_JWT_SECRET` is
    /// missing while `AUTH_OPTIONAL` is not enabled. Misconfiguration
    /// should fail at startup, not at request time.
    pub fn from_env() -> Self {
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

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());

        let auth_optional = std::env::var("AUTH_OPTIONAL")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let jwt_secret = match std::env::var("AUTH_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if auth_optional => String::new(),
            _ => panic!("AUTH_JWT_SECRET must be set (or AUTH_OPTIONAL=true for local development)"),
        };

        let genai = GenAiConfig {
            base_url: std::env::var("GENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("GENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("GENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };

        let image_search = ImageSearchConfig {
            base_url: std::env::var("IMAGE_SEARCH_BASE_URL")
                .unwrap_or_else(|_| "https://api.freepik.com/v1".into()),
            api_key: std::env::var("IMAGE_SEARCH_API_KEY").unwrap_or_default(),
        };

        let export_image_timeout_secs: u64 = std::env::var("EXPORT_IMAGE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("EXPORT_IMAGE_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                auth_optional,
            },
            genai,
            image_search,
            export_image_timeout_secs,
        }
    }
}

//! Server configuration from the environment.

use axum::http::HeaderValue;
use tracing::warn;

use quire_db::pool::DEFAULT_MAX_CONNECTIONS;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://quire.sqlite";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BODY_LIMIT_MB: usize = 50;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Settings for the HTTP server and its store.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Raw CORS origin list; invalid entries are dropped when the layer is built.
    pub allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,
    /// Seed the demo records into empty tables on startup.
    pub seed_demo_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            body_limit_bytes: DEFAULT_BODY_LIMIT_MB * 1024 * 1024,
            seed_demo_data: true,
        }
    }
}

impl ServerConfig {
    /// Read `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `HOST`, `PORT`,
    /// `ALLOWED_ORIGINS`, `REQUEST_BODY_LIMIT_MB`, and `SEED_DEMO_DATA`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| split_origins(&s))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.allowed_origins),
            body_limit_bytes: parse_var::<usize>("REQUEST_BODY_LIMIT_MB")
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.body_limit_bytes),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.seed_demo_data),
        }
    }

    /// Origins as header values for the CORS layer.
    pub fn cors_origins(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn split_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url, "sqlite://quire.sqlite");
        assert_eq!(config.body_limit_bytes, 50 * 1024 * 1024);
        assert!(config.seed_demo_data);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_split_origins_skips_blanks() {
        assert_eq!(
            split_origins(" https://a.example , ,http://b.example"),
            vec!["https://a.example", "http://b.example"]
        );
    }

    #[test]
    fn test_invalid_origin_dropped() {
        let config = ServerConfig {
            allowed_origins: vec!["http://ok.example".into(), "bad\norigin".into()],
            ..Default::default()
        };
        assert_eq!(config.cors_origins().len(), 1);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
    }
}

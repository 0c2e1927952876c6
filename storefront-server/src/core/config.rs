use anyhow::Context;
use shared::catalog::OrphanPolicy;

/// Default image attached to imported products that come without one
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x600?text=Product";

/// Storefront server configuration
///
/// # Environment variables
///
/// | variable | default | description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | DATABASE_URL | (unset) | PostgreSQL URL; unset runs on the in-memory store |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | default tracing filter when `RUST_LOG` is unset |
/// | LOG_JSON | false | JSON log lines on the console |
/// | LOG_DIR | (unset) | directory for daily rotating log files |
/// | CATEGORY_ORPHAN_POLICY | promote | `promote` or `drop` |
/// | IMPORT_PLACEHOLDER_IMAGE | placehold.co URL | image for imported products without images |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_url: Option<String>,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// How the category tree treats categories whose parent no longer exists
    pub orphan_policy: OrphanPolicy,
    pub import_placeholder_image: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing values fall back to defaults; malformed values are an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let orphan_policy = match non_empty_var("CATEGORY_ORPHAN_POLICY") {
            Some(raw) => raw
                .parse::<OrphanPolicy>()
                .map_err(anyhow::Error::msg)
                .context("invalid CATEGORY_ORPHAN_POLICY")?,
            None => OrphanPolicy::default(),
        };

        let http_port = match non_empty_var("HTTP_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid HTTP_PORT: {raw}"))?,
            None => 3000,
        };

        Ok(Self {
            http_port,
            database_url: non_empty_var("DATABASE_URL"),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: non_empty_var("LOG_DIR"),
            orphan_policy,
            import_placeholder_image: non_empty_var("IMPORT_PLACEHOLDER_IMAGE")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.into()),
        })
    }

    /// Override selected values on top of the defaults
    ///
    /// Used by tests: no environment lookup, in-memory store.
    pub fn with_overrides(http_port: u16, orphan_policy: OrphanPolicy) -> Self {
        Self {
            http_port,
            orphan_policy,
            ..Self::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            database_url: None,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            orphan_policy: OrphanPolicy::default(),
            import_placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.into(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

use std::path::Path;

use serde::Deserialize;

const DEFAULTS: &str = include_str!("../config/default.toml");
const ENV_PREFIX: &str = "INSTALLATION_REGISTRY";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Settings of the hypermedia REST surface.
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    /// Prefix of every resource path, e.g. `/api`.
    pub base_path: String,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    /// When set, every resource request needs `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub rest: RestConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // The embedded file is part of the binary; failing to parse it is a build defect.
        match parse(DEFAULTS) {
            Ok(cfg) => cfg,
            Err(e) => panic!("Failed to parse embedded default config: {}", e),
        }
    }
}

impl AppConfig {
    /// Token required by the auth middleware, if any.
    pub fn api_token(&self) -> Option<&str> {
        self.security
            .as_ref()
            .and_then(|s| s.api_token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: installation-registry.toml (in CWD)
        .add_source(::config::File::with_name("installation-registry").required(false));

    if let Ok(custom_path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

/// Builds a configuration from the embedded defaults overlaid with `overrides` (TOML).
pub fn parse(overrides: &str) -> anyhow::Result<AppConfig> {
    let cfg = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::from_str(overrides, ::config::FileFormat::Toml))
        .build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    if cfg.server.max_body_bytes < 1024 {
        return Err(anyhow::anyhow!("server.max_body_bytes must be >= 1024"));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Database
    if cfg.database.url.trim().is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }
    if cfg.database.max_connections == 0 {
        return Err(anyhow::anyhow!("database.max_connections must be > 0"));
    }

    // REST surface
    let base = &cfg.rest.base_path;
    if !base.starts_with('/') {
        return Err(anyhow::anyhow!("rest.base_path must start with '/': {}", base));
    }
    if base.len() > 1 && base.ends_with('/') {
        return Err(anyhow::anyhow!("rest.base_path must not end with '/': {}", base));
    }
    if cfg.rest.default_page_size == 0 {
        return Err(anyhow::anyhow!("rest.default_page_size must be > 0"));
    }
    if cfg.rest.default_page_size > cfg.rest.max_page_size {
        return Err(anyhow::anyhow!("rest.default_page_size must be <= rest.max_page_size"));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"));
    if let Some(path) = path {
        if path.starts_with(":memory:") {
            return Ok(());
        }
        // Drop connection parameters such as `?mode=rwc`
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

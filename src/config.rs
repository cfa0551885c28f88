use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Optional bootstrap admin account. The API itself never creates users, so
/// a fresh deployment needs one seeded account to be usable. Credentials are
/// expected via environment overrides rather than the config file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    pub bootstrap_admin_email: Option<String>,
    pub bootstrap_admin_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: kinothek.toml (in CWD)
        .add_source(::config::File::with_name("kinothek").required(false));

    if let Ok(custom_path) = std::env::var("KINOTHEK_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("KINOTHEK").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.database.url.is_empty() {
        return Err(anyhow::anyhow!("database.url must not be empty"));
    }

    // The bootstrap account needs both halves or neither.
    let email_set = cfg.auth.bootstrap_admin_email.as_deref().is_some_and(|v| !v.is_empty());
    let password_set = cfg.auth.bootstrap_admin_password.as_deref().is_some_and(|v| !v.is_empty());
    if email_set != password_set {
        return Err(anyhow::anyhow!(
            "auth.bootstrap_admin_email and auth.bootstrap_admin_password must be set together"
        ));
    }

    Ok(())
}

pub fn ensure_sqlite_parent_dir(url: &str) -> anyhow::Result<()> {
    if let Some(path) = url.strip_prefix("sqlite://") {
        let p = Path::new(path);
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::{self, AppConfig};

    fn default_config() -> AppConfig {
        let defaults: &str = include_str!("../../config/default.toml");
        ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_embedded_defaults_parse_and_validate() {
        let cfg = default_config();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8086);
        assert!(cfg.database.url.starts_with("sqlite://"));
        assert!(cfg.auth.bootstrap_admin_email.is_none());

        config::validate(&cfg).unwrap();
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut cfg = default_config();
        cfg.server.port = 0;
        assert!(config::validate(&cfg).is_err());
    }

    #[test]
    fn test_validate_rejects_half_configured_bootstrap_admin() {
        let mut cfg = default_config();
        cfg.auth.bootstrap_admin_email = Some("admin@example.com".to_string());
        cfg.auth.bootstrap_admin_password = None;
        assert!(config::validate(&cfg).is_err());

        cfg.auth.bootstrap_admin_password = Some("secret".to_string());
        config::validate(&cfg).unwrap();
    }

    #[test]
    fn test_ensure_sqlite_parent_dir_creates_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("nested").join("deeper");
        let url = format!("sqlite://{}/kinothek.db", nested.display());

        config::ensure_sqlite_parent_dir(&url).unwrap();

        assert!(nested.is_dir());
    }
}

//! Integration and unit tests for the catalog application.
//!
//! ## Test Modules
//!
//! - **api_tests**: full-router HTTP tests (auth, roles, CRUD, sort, search)
//! - **storage_tests**: SQL adapter behavior against a real SQLite database
//! - **service_tests**: domain invariants and error mapping
//! - **auth_tests**: password hashing and credential verification
//! - **config_tests**: configuration loading and validation

mod config_tests;
mod service_tests;
mod storage_tests;

pub(crate) mod support {
    use std::collections::HashMap;
    use std::sync::{Mutex, OnceLock};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    use crate::config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};
    use crate::routes;
    use crate::state::AppState;

    /// In-memory database pinned to a single connection so PRAGMAs and data
    /// survive for the whole test.
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_db(&pool).await.unwrap();
        pool
    }

    pub(crate) fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig { host: "127.0.0.1".to_string(), port: 8086 },
            database: DatabaseConfig { url: "sqlite::memory:".to_string() },
            auth: AuthConfig::default(),
        }
    }

    pub(crate) fn test_app(pool: SqlitePool) -> (axum::Router, AppState) {
        let state = AppState::new(pool, test_config());
        (routes::router(state.clone()), state)
    }

    /// Argon2 hashing is deliberately slow; cache hashes per password so the
    /// suite does not pay for it in every test.
    fn cached_hash(password: &str) -> String {
        static CACHE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut cache = cache.lock().unwrap();
        cache
            .entry(password.to_string())
            .or_insert_with(|| crate::service::password::hash(password).unwrap())
            .clone()
    }

    pub(crate) async fn seed_user(pool: &SqlitePool, email: &str, password: &str, role: &str) {
        sqlx::query("INSERT INTO users (email, password_hash, role) VALUES (?1, ?2, ?3)")
            .bind(email)
            .bind(cached_hash(password))
            .bind(role)
            .execute(pool)
            .await
            .unwrap();
    }

    pub(crate) fn basic_auth(email: &str, password: &str) -> String {
        format!("Basic {}", BASE64.encode(format!("{email}:{password}")))
    }

    /// Fire one request at the router and collect status + JSON body.
    pub(crate) async fn request(
        app: &axum::Router,
        method: &str,
        uri: &str,
        auth: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((email, password)) = auth {
            builder = builder.header("authorization", basic_auth(email, password));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

use sqlx::SqlitePool;

use crate::config::AuthConfig;
use crate::service::password;

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    // Pragmas for better durability/performance
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // Foreign keys are critical - fail if this doesn't work
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;
    // The search endpoint promises case-sensitive substring matching; SQLite's
    // LIKE is case-insensitive for ASCII unless this pragma is set.
    sqlx::query("PRAGMA case_sensitive_like=ON;").execute(pool).await?;

    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS actors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            sex INTEGER NOT NULL CHECK (sex IN (0, 1, 2, 9)),
            birthdate TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS films (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NULL,
            release_date TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 10)
        )"#,
    )
    .execute(pool)
    .await?;

    // Join table; deleting either side removes the link, never the other side.
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS films_actors (
            film_id INTEGER NOT NULL,
            actor_id INTEGER NOT NULL,
            PRIMARY KEY (film_id, actor_id),
            FOREIGN KEY (film_id) REFERENCES films(id) ON DELETE CASCADE,
            FOREIGN KEY (actor_id) REFERENCES actors(id) ON DELETE CASCADE
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('user', 'admin'))
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        ("idx_films_rating", "CREATE INDEX IF NOT EXISTS idx_films_rating ON films(rating DESC)"),
        ("idx_films_title", "CREATE INDEX IF NOT EXISTS idx_films_title ON films(title)"),
        (
            "idx_films_release_date",
            "CREATE INDEX IF NOT EXISTS idx_films_release_date ON films(release_date)",
        ),
        ("idx_actors_name", "CREATE INDEX IF NOT EXISTS idx_actors_name ON actors(name)"),
        (
            "idx_films_actors_actor",
            "CREATE INDEX IF NOT EXISTS idx_films_actors_actor ON films_actors(actor_id)",
        ),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            match &e {
                sqlx::Error::Database(db_err) => {
                    let msg = db_err.message().to_lowercase();
                    if msg.contains("already exists") || msg.contains("duplicate") {
                        tracing::debug!("Index {} already exists, skipping", name);
                    } else {
                        tracing::warn!("Failed to create index {}: {}", name, e);
                    }
                }
                _ => {
                    tracing::warn!("Failed to create index {}: {}", name, e);
                }
            }
        }
    }

    Ok(())
}

/// Create the configured bootstrap admin account if it does not exist yet.
pub async fn seed_admin(pool: &SqlitePool, cfg: &AuthConfig) -> anyhow::Result<()> {
    let (Some(email), Some(pass)) =
        (cfg.bootstrap_admin_email.as_deref(), cfg.bootstrap_admin_password.as_deref())
    else {
        return Ok(());
    };
    if email.is_empty() || pass.is_empty() {
        return Ok(());
    }

    let hash = password::hash(pass)
        .map_err(|e| anyhow::anyhow!("failed to hash bootstrap admin password: {}", e))?;

    let result = sqlx::query(
        r#"INSERT INTO users (email, password_hash, role)
           VALUES (?1, ?2, 'admin')
           ON CONFLICT(email) DO NOTHING"#,
    )
    .bind(email)
    .bind(hash)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!(email, "created bootstrap admin account");
    }

    Ok(())
}

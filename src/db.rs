use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::OffsetDateTime;

/// Current time truncated to the microsecond precision of `TIMESTAMPTZ`,
/// so a record returned before storage equals the one read back.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}

/// Build a pool without touching the network.
pub fn lazy_pool(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy(database_url)
        .context("parse DATABASE_URL")
}

/// Probe the database and run migrations in the background.
///
/// Requests are served while this runs; until it succeeds they fail with
/// whatever error the pool reports.
pub fn spawn_connect(pool: PgPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match connect_and_migrate(&pool).await {
            Ok(()) => tracing::info!("connected to database"),
            Err(e) => tracing::error!(error = ?e, "database connection error"),
        }
    })
}

async fn connect_and_migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("connect to database")?;
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_timestamps_have_no_sub_microsecond_part() {
        for _ in 0..100 {
            assert_eq!(now_utc().nanosecond() % 1_000, 0);
        }
    }
}

//! Database module

mod schema;

use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::config::DatabaseConfig;

/// One recorded (IP, user-agent, day) view observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewEvent {
    pub ip: String,
    pub user_agent: String,
    pub date: String,
}

impl ViewEvent {
    pub fn new(ip: String, user_agent: String) -> Self {
        Self {
            ip,
            user_agent,
            date: today_local(),
        }
    }

    #[cfg(test)]
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }
}

/// Current server-local calendar day, `YYYY-MM-DD`
pub fn today_local() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", config.url)).await?;
        Ok(Self { pool })
    }

    /// Single-connection in-memory database; every `:memory:` connection is
    /// a distinct database, so the pool must not grow past one.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        // Enable WAL mode for better concurrency
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;

        sqlx::query(schema::CREATE_TABLE)
            .execute(&self.pool)
            .await?;
        sqlx::query(schema::CREATE_INDEX_DATE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Insert a view event; a duplicate triple is silently dropped.
    /// Returns whether a new row was stored.
    pub async fn record_view(&self, event: &ViewEvent) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO views (ip, user_agent, date) VALUES (?, ?, ?)",
        )
        .bind(&event.ip)
        .bind(&event.user_agent)
        .bind(&event.date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count the views recorded on the given day
    pub async fn count_views_on(&self, date: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM views WHERE date = ?")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn database() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    fn event(ip: &str, user_agent: &str) -> ViewEvent {
        ViewEvent::new(ip.to_string(), user_agent.to_string())
    }

    #[test]
    fn today_local_is_calendar_day() {
        let today = today_local();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[4..5], "-");
        assert_eq!(&today[7..8], "-");
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = database().await;
        db.run_migrations().await.unwrap();
        assert_eq!(db.count_views_on(&today_local()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_triple_stores_one_row() {
        let db = database().await;

        assert!(db.record_view(&event("1.2.3.4", "curl/8")).await.unwrap());
        assert!(!db.record_view(&event("1.2.3.4", "curl/8")).await.unwrap());

        assert_eq!(db.count_views_on(&today_local()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn distinct_user_agents_count_separately() {
        let db = database().await;

        db.record_view(&event("1.2.3.4", "curl/8")).await.unwrap();
        db.record_view(&event("1.2.3.4", "curl/9")).await.unwrap();

        assert_eq!(db.count_views_on(&today_local()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn count_is_scoped_to_the_given_day() {
        let db = database().await;

        let yesterday = event("1.2.3.4", "curl/8").with_date("2026-08-06");
        assert!(db.record_view(&yesterday).await.unwrap());
        db.record_view(&event("1.2.3.4", "curl/8")).await.unwrap();

        assert_eq!(db.count_views_on(&today_local()).await.unwrap(), 1);
        assert_eq!(db.count_views_on("2026-08-06").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn same_triple_on_a_new_day_stores_a_new_row() {
        let db = database().await;

        let base = event("1.2.3.4", "curl/8");
        assert!(db.record_view(&base.clone().with_date("2026-08-05")).await.unwrap());
        assert!(db.record_view(&base.clone().with_date("2026-08-06")).await.unwrap());

        assert_eq!(db.count_views_on("2026-08-05").await.unwrap(), 1);
        assert_eq!(db.count_views_on("2026-08-06").await.unwrap(), 1);
    }
}

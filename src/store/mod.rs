// SQLite snapshot history. Append-only: the ingestion process writes,
// the classification engine only reads. Rows are scoped by stable identity.

pub mod consolidate;

use crate::models::{NodeSnapshot, TimeRange};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// Read failure at the store boundary. Surfaced to the caller; the
/// classifier and consolidator are never invoked on a failed fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("snapshot store query failed: {0}")]
    Query(#[from] sqlx::Error),
}

pub struct SnapshotStore {
    pool: SqlitePool,
    retention_ms: i64,
}

impl SnapshotStore {
    pub async fn connect(path: &str, retention_days: u32) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let retention_ms = (retention_days as i64) * 24 * 60 * 60 * 1000;
        Ok(Self { pool, retention_ms })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS node_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identity TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                health INTEGER NOT NULL,
                uptime_secs INTEGER NOT NULL,
                storage_committed INTEGER NOT NULL,
                storage_used INTEGER NOT NULL,
                credits INTEGER,
                rank INTEGER,
                network TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_node_history_identity_created_at ON node_history(identity, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self, snapshots), fields(repo = "snapshots", operation = "save_snapshots", count = snapshots.len()))]
    pub async fn save_snapshots(
        &self,
        identity: &str,
        snapshots: &[NodeSnapshot],
    ) -> anyhow::Result<()> {
        if snapshots.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for s in snapshots {
            sqlx::query(
                "INSERT INTO node_history (identity, created_at, health, uptime_secs, storage_committed, storage_used, credits, rank, network) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(identity)
            .bind(s.timestamp as i64)
            .bind(s.health as i64)
            .bind(s.uptime_secs as i64)
            .bind(s.storage_committed as i64)
            .bind(s.storage_used as i64)
            .bind(s.credits.map(|c| c as i64))
            .bind(s.rank.map(|r| r as i64))
            .bind(&s.network)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Snapshots for one identity with created_at >= from_ts, ascending.
    /// This is the history-fetch seam of the engine.
    #[instrument(
        skip(self),
        fields(repo = "snapshots", operation = "get_snapshots_since")
    )]
    pub async fn get_snapshots_since(
        &self,
        identity: &str,
        from_ts: i64,
    ) -> Result<Vec<NodeSnapshot>, FetchError> {
        let rows = sqlx::query(
            "SELECT created_at, health, uptime_secs, storage_committed, storage_used, credits, rank, network
             FROM node_history WHERE identity = $1 AND created_at >= $2 ORDER BY created_at ASC",
        )
        .bind(identity)
        .bind(from_ts)
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Self::parse_row(&row)?);
        }
        Ok(out)
    }

    /// History for one display range: window = now - lookback(range).
    #[instrument(skip(self), fields(repo = "snapshots", operation = "get_history"))]
    pub async fn get_history(
        &self,
        identity: &str,
        range: TimeRange,
        now_ms: i64,
    ) -> Result<Vec<NodeSnapshot>, FetchError> {
        let from_ts = now_ms - range.lookback_ms();
        self.get_snapshots_since(identity, from_ts).await
    }

    /// Most recent snapshot for one identity, if any.
    pub async fn get_latest(&self, identity: &str) -> Result<Option<NodeSnapshot>, FetchError> {
        let row = sqlx::query(
            "SELECT created_at, health, uptime_secs, storage_committed, storage_used, credits, rank, network
             FROM node_history WHERE identity = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(Self::parse_row(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(repo = "snapshots", operation = "prune_old_data"))]
    pub async fn prune_old_data(&self) -> anyhow::Result<u64> {
        let cutoff = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_millis() as i64)
            - self.retention_ms;
        let r = sqlx::query("DELETE FROM node_history WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Reclaim space after deletes (run on the maintenance schedule).
    #[instrument(skip(self), fields(repo = "snapshots", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }

    fn parse_row(row: &SqliteRow) -> Result<NodeSnapshot, sqlx::Error> {
        let created_at: i64 = row.try_get("created_at")?;
        let health: i64 = row.try_get("health")?;
        let uptime_secs: i64 = row.try_get("uptime_secs")?;
        let storage_committed: i64 = row.try_get("storage_committed")?;
        let storage_used: i64 = row.try_get("storage_used")?;
        let credits: Option<i64> = row.try_get("credits")?;
        let rank: Option<i64> = row.try_get("rank")?;
        let network: String = row.try_get("network")?;

        Ok(NodeSnapshot {
            timestamp: created_at as u64,
            health: health.clamp(0, 100) as u8,
            uptime_secs: uptime_secs as u64,
            storage_committed: storage_committed as u64,
            storage_used: storage_used as u64,
            credits: credits.map(|c| c as u64),
            rank: rank.map(|r| r as u32),
            network,
        })
    }
}

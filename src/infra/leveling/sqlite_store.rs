use crate::core::leveling::{Ledger, LedgerStore, StoreError, XpRecord};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

/// SQLite ledger store. Same logical ledger as the JSON files, one row per
/// (guild, member). `position` keeps first-award order for leaderboard ties.
pub struct SqliteLedgerStore {
    pool: Pool<Sqlite>,
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

impl SqliteLedgerStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new().connect(&conn_str).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_records (
                guild_id INTEGER NOT NULL,
                member_id INTEGER NOT NULL,
                xp INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL,
                PRIMARY KEY (guild_id, member_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn to_sql(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::Database(format!("{} does not fit in an INTEGER column", value)))
}

fn from_sql(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Database(format!("negative value {} in ledger", value)))
}

const UPSERT_RECORD: &str = r#"
    INSERT INTO ledger_records (guild_id, member_id, xp, level, position)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(guild_id, member_id) DO UPDATE SET
        xp = excluded.xp,
        level = excluded.level,
        position = excluded.position
"#;

impl SqliteLedgerStore {
    async fn upsert<'e, E>(
        executor: E,
        community_id: u64,
        member_id: u64,
        record: &XpRecord,
        position: usize,
    ) -> Result<(), StoreError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(UPSERT_RECORD)
            .bind(to_sql(community_id)?)
            .bind(to_sql(member_id)?)
            .bind(to_sql(record.xp)?)
            .bind(to_sql(record.level)?)
            .bind(to_sql(position as u64)?)
            .execute(executor)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteLedgerStore {
    async fn load(&self, community_id: u64) -> Result<Option<Ledger>, StoreError> {
        let rows = sqlx::query(
            "SELECT member_id, xp, level FROM ledger_records WHERE guild_id = ? ORDER BY position",
        )
        .bind(to_sql(community_id)?)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut ledger = Ledger::new();
        for row in rows {
            ledger.insert(
                from_sql(row.get::<i64, _>("member_id"))?,
                XpRecord {
                    xp: from_sql(row.get::<i64, _>("xp"))?,
                    level: from_sql(row.get::<i64, _>("level"))?,
                },
            );
        }
        Ok(Some(ledger))
    }

    async fn save(&self, community_id: u64, ledger: &Ledger) -> Result<(), StoreError> {
        // One transaction per ledger: either every row lands or none do.
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        for (position, (member_id, record)) in ledger.iter().enumerate() {
            Self::upsert(&mut *tx, community_id, member_id, record, position).await?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    /// An award changes one record, so only that row is written.
    async fn save_member(
        &self,
        community_id: u64,
        ledger: &Ledger,
        member_id: u64,
    ) -> Result<(), StoreError> {
        let (Some(record), Some(position)) = (ledger.get(member_id), ledger.position(member_id))
        else {
            return self.save(community_id, ledger).await;
        };
        Self::upsert(&self.pool, community_id, member_id, record, position).await
    }
}

//! SQLite repository implementation.
//!
//! Implements the repository traits from `draftroom_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use draftroom_core::draft::{
    name_key, DepthChartPosition, DepthChartSlot, Draft, DraftId, DraftSettings, DraftStatus,
    NextPick,
};
use draftroom_core::storage::{
    DepthChartRepository, DraftFilter, DraftRepository, RepositoryError, Result,
};

use super::conversions::{row_to_depth_chart_position, row_to_draft};
use super::error::map_tokio_rusqlite_error_with_id;
use super::schema;

const DRAFT: &str = "Draft";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns "no row touched" into a not-found error.
fn require_row(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

/// SQLite-based repository implementation.
///
/// All statements run on the single `tokio-rusqlite` connection thread, so
/// each one is atomic with respect to every other caller.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a single-row UPDATE/DELETE keyed by draft id.
    async fn execute_for_draft(&self, sql: &'static str, id: DraftId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(sql, [id.0]).map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }
}

// ============================================================================
// DraftRepository implementation
// ============================================================================

#[async_trait]
impl DraftRepository for SqliteRepository {
    async fn get_draft(&self, id: DraftId) -> Result<Option<Draft>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_DRAFT_BY_ID).map_err(wrap_err)?;
                stmt.query_row([id.0], row_to_draft)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }

    async fn list_drafts(&self, filter: &DraftFilter) -> Result<Vec<Draft>> {
        let commish_id = filter.commish_id.map(|id| id.0);
        let status = filter.status.map(|s| s.as_str());

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_DRAFTS).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![commish_id, status], row_to_draft)
                    .map_err(wrap_err)?;

                let mut drafts = Vec::new();
                for row_result in rows {
                    drafts.push(row_result.map_err(wrap_err)?);
                }
                Ok(drafts)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, "list"))
    }

    async fn create_draft(&self, settings: &DraftSettings) -> Result<DraftId> {
        let settings = settings.clone();
        let name = settings.name.clone();
        let key = name_key(&settings.name);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_DRAFT,
                    rusqlite::params![
                        settings.commish_id.0,
                        settings.name,
                        settings.sport,
                        settings.style,
                        settings.rounds,
                        settings.password,
                        settings.using_depth_charts,
                        key
                    ],
                )
                .map_err(wrap_err)?;
                Ok(DraftId(conn.last_insert_rowid()))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, name))
    }

    async fn update_draft(&self, id: DraftId, settings: &DraftSettings) -> Result<()> {
        let settings = settings.clone();
        let key = name_key(&settings.name);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_DRAFT,
                        rusqlite::params![
                            id.0,
                            settings.commish_id.0,
                            settings.name,
                            settings.sport,
                            settings.style,
                            settings.rounds,
                            settings.password,
                            settings.using_depth_charts,
                            key
                        ],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }

    async fn update_status(&self, id: DraftId, status: DraftStatus) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_DRAFT_STATUS,
                        rusqlite::params![id.0, status.as_str()],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }

    async fn update_stats_timestamp(&self, id: DraftId) -> Result<()> {
        self.execute_for_draft(schema::UPDATE_DRAFT_STATS_TIMESTAMP, id)
            .await
    }

    async fn increment_counter(&self, id: DraftId) -> Result<i64> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::INCREMENT_DRAFT_COUNTER, [id.0], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }

    async fn advance_pick(&self, id: DraftId, next: NextPick) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_DRAFT_CURRENT_PICK,
                        rusqlite::params![id.0, next.round, next.pick],
                    )
                    .map_err(wrap_err)?;
                require_row(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, id.to_string()))
    }

    async fn complete_draft(&self, id: DraftId) -> Result<()> {
        self.execute_for_draft(schema::COMPLETE_DRAFT, id).await
    }

    async fn set_in_progress(&self, id: DraftId) -> Result<()> {
        self.execute_for_draft(schema::SET_DRAFT_IN_PROGRESS, id)
            .await
    }

    async fn name_is_unique(&self, name: &str, exclude: Option<DraftId>) -> Result<bool> {
        let key = name_key(name);
        let exclude = exclude.map(|id| id.0);

        self.conn
            .call(move |conn| {
                let count: i64 = conn
                    .query_row(
                        schema::COUNT_DRAFTS_WITH_NAME,
                        rusqlite::params![key, exclude],
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;
                Ok(count == 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, "name check"))
    }

    async fn delete_draft(&self, id: DraftId) -> Result<()> {
        // Depth-chart positions go with it via ON DELETE CASCADE.
        self.execute_for_draft(schema::DELETE_DRAFT, id).await
    }
}

// ============================================================================
// DepthChartRepository implementation
// ============================================================================

#[async_trait]
impl DepthChartRepository for SqliteRepository {
    async fn get_positions(&self, draft_id: DraftId) -> Result<Vec<DepthChartPosition>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_DEPTH_CHART_POSITIONS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([draft_id.0], row_to_depth_chart_position)
                    .map_err(wrap_err)?;

                let mut positions = Vec::new();
                for row_result in rows {
                    positions.push(row_result.map_err(wrap_err)?);
                }
                Ok(positions)
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "DepthChartPosition", draft_id.to_string())
            })
    }

    async fn replace_positions(
        &self,
        draft_id: DraftId,
        slots: &[DepthChartSlot],
    ) -> Result<Vec<DepthChartPosition>> {
        let slots = slots.to_vec();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                // Surface a missing draft as NotFound rather than a foreign key failure.
                tx.query_row(schema::SELECT_DRAFT_BY_ID, [draft_id.0], |_| Ok(()))
                    .map_err(wrap_err)?;

                tx.execute(schema::DELETE_DEPTH_CHART_POSITIONS, [draft_id.0])
                    .map_err(wrap_err)?;
                for (order, slot) in slots.iter().enumerate() {
                    tx.execute(
                        schema::INSERT_DEPTH_CHART_POSITION,
                        rusqlite::params![draft_id.0, slot.position, slot.slots, order as i64],
                    )
                    .map_err(wrap_err)?;
                }

                let mut positions = Vec::new();
                {
                    let mut stmt = tx
                        .prepare(schema::SELECT_DEPTH_CHART_POSITIONS)
                        .map_err(wrap_err)?;
                    let rows = stmt
                        .query_map([draft_id.0], row_to_depth_chart_position)
                        .map_err(wrap_err)?;
                    for row_result in rows {
                        positions.push(row_result.map_err(wrap_err)?);
                    }
                }

                tx.commit().map_err(wrap_err)?;
                Ok(positions)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, DRAFT, draft_id.to_string()))
    }
}

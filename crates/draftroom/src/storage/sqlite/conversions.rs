//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! A `Draft` is only ever constructed here or in the in-memory store.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

use draftroom_core::draft::{DepthChartPosition, Draft, DraftId, DraftStatus, UserId};

// ============================================================================
// Draft conversions
// ============================================================================

/// Convert a SQLite row to a Draft.
///
/// Expected columns: see `draft_columns!` in the schema module.
pub fn row_to_draft(row: &Row) -> rusqlite::Result<Draft> {
    let status: String = row.get(5)?;
    let create_time: String = row.get(9)?;
    let start_time: Option<String> = row.get(10)?;
    let end_time: Option<String> = row.get(11)?;
    let stats_generated: Option<String> = row.get(15)?;

    Ok(Draft {
        id: DraftId(row.get(0)?),
        commish_id: UserId(row.get(1)?),
        name: row.get(2)?,
        sport: row.get(3)?,
        style: row.get(4)?,
        status: parse_status(5, &status)?,
        rounds: row.get(6)?,
        password: row.get(7)?,
        using_depth_charts: row.get(8)?,
        create_time: parse_datetime(9, &create_time)?,
        start_time: parse_optional_datetime(10, start_time)?,
        end_time: parse_optional_datetime(11, end_time)?,
        counter: row.get(12)?,
        current_pick: row.get(13)?,
        current_round: row.get(14)?,
        stats_generated: parse_optional_datetime(15, stats_generated)?,
    })
}

// ============================================================================
// Depth chart conversions
// ============================================================================

/// Convert a SQLite row to a DepthChartPosition.
///
/// Expected columns: id, draft_id, position, slots, display_order
pub fn row_to_depth_chart_position(row: &Row) -> rusqlite::Result<DepthChartPosition> {
    Ok(DepthChartPosition {
        id: row.get(0)?,
        draft_id: DraftId(row.get(1)?),
        position: row.get(2)?,
        slots: row.get(3)?,
        display_order: row.get(4)?,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_status(idx: usize, s: &str) -> rusqlite::Result<DraftStatus> {
    s.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse an RFC 3339 timestamp. SQLite's `strftime` output ends in `Z`.
fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_datetime(
    idx: usize,
    s: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    s.map(|s| parse_datetime(idx, &s)).transpose()
}

//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.
//!
//! Timestamps are RFC 3339 text and every "now" is taken from SQLite itself
//! so a single statement reads and writes a consistent clock.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Drafts table
CREATE TABLE IF NOT EXISTS draft (
    draft_id INTEGER PRIMARY KEY AUTOINCREMENT,
    commish_id INTEGER NOT NULL,
    draft_create_time TEXT NOT NULL,
    draft_start_time TEXT,
    draft_end_time TEXT,
    draft_name TEXT NOT NULL,
    draft_name_key TEXT NOT NULL UNIQUE,
    draft_sport TEXT NOT NULL,
    draft_status TEXT NOT NULL DEFAULT 'setting_up'
        CHECK (draft_status IN ('setting_up', 'in_progress', 'complete')),
    draft_style TEXT NOT NULL,
    draft_rounds INTEGER NOT NULL,
    draft_password TEXT,
    draft_counter INTEGER NOT NULL DEFAULT 0 CHECK (draft_counter >= 0),
    draft_current_pick INTEGER NOT NULL DEFAULT 0,
    draft_current_round INTEGER NOT NULL DEFAULT 0,
    draft_stats_generated TEXT,
    using_depth_charts INTEGER NOT NULL DEFAULT 0
);

-- Depth chart positions table
CREATE TABLE IF NOT EXISTS depth_chart_position (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    draft_id INTEGER NOT NULL,
    position TEXT NOT NULL,
    slots INTEGER NOT NULL,
    display_order INTEGER NOT NULL,
    FOREIGN KEY (draft_id) REFERENCES draft(draft_id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_draft_commish_id ON draft(commish_id);
CREATE INDEX IF NOT EXISTS idx_draft_status ON draft(draft_status);
CREATE INDEX IF NOT EXISTS idx_depth_chart_position_draft_id ON depth_chart_position(draft_id);
"#;

/// Current UTC time as stored in timestamp columns.
macro_rules! now_utc {
    () => {
        "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')"
    };
}

/// Column list shared by every draft SELECT, in `row_to_draft` order.
macro_rules! draft_columns {
    () => {
        "draft_id, commish_id, draft_name, draft_sport, draft_style, draft_status, \
         draft_rounds, draft_password, using_depth_charts, draft_create_time, \
         draft_start_time, draft_end_time, draft_counter, draft_current_pick, \
         draft_current_round, draft_stats_generated"
    };
}

// ============================================================================
// Draft queries
// ============================================================================

pub const INSERT_DRAFT: &str = concat!(
    "INSERT INTO draft (commish_id, draft_name, draft_sport, draft_style, draft_rounds, \
     draft_password, using_depth_charts, draft_name_key, draft_create_time, draft_status, \
     draft_counter) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ",
    now_utc!(),
    ", 'setting_up', 0)"
);

pub const SELECT_DRAFT_BY_ID: &str =
    concat!("SELECT ", draft_columns!(), " FROM draft WHERE draft_id = ?1");

/// Optional filters are passed as NULL to match everything.
pub const SELECT_DRAFTS: &str = concat!(
    "SELECT ",
    draft_columns!(),
    " FROM draft \
     WHERE (?1 IS NULL OR commish_id = ?1) AND (?2 IS NULL OR draft_status = ?2) \
     ORDER BY draft_create_time DESC, draft_id DESC"
);

pub const UPDATE_DRAFT: &str = "UPDATE draft SET commish_id = ?2, draft_name = ?3, \
     draft_sport = ?4, draft_style = ?5, draft_rounds = ?6, draft_password = ?7, \
     using_depth_charts = ?8, draft_name_key = ?9 WHERE draft_id = ?1";

pub const UPDATE_DRAFT_STATUS: &str = "UPDATE draft SET draft_status = ?2 WHERE draft_id = ?1";

pub const UPDATE_DRAFT_STATS_TIMESTAMP: &str = concat!(
    "UPDATE draft SET draft_stats_generated = ",
    now_utc!(),
    " WHERE draft_id = ?1"
);

pub const INCREMENT_DRAFT_COUNTER: &str = "UPDATE draft SET draft_counter = draft_counter + 1 \
     WHERE draft_id = ?1 RETURNING draft_counter";

pub const UPDATE_DRAFT_CURRENT_PICK: &str =
    "UPDATE draft SET draft_current_round = ?2, draft_current_pick = ?3 WHERE draft_id = ?1";

pub const COMPLETE_DRAFT: &str = concat!(
    "UPDATE draft SET draft_status = 'complete', draft_end_time = ",
    now_utc!(),
    " WHERE draft_id = ?1"
);

pub const SET_DRAFT_IN_PROGRESS: &str = concat!(
    "UPDATE draft SET draft_status = 'in_progress', draft_counter = 0, \
     draft_current_pick = 1, draft_current_round = 1, draft_start_time = ",
    now_utc!(),
    ", draft_end_time = NULL WHERE draft_id = ?1"
);

/// Compares `draft_name_key`; bind the lowercased key, not the raw name.
pub const COUNT_DRAFTS_WITH_NAME: &str = "SELECT COUNT(*) FROM draft \
     WHERE draft_name_key = ?1 AND (?2 IS NULL OR draft_id <> ?2)";

pub const DELETE_DRAFT: &str = "DELETE FROM draft WHERE draft_id = ?1";

// ============================================================================
// Depth chart queries
// ============================================================================

pub const SELECT_DEPTH_CHART_POSITIONS: &str = "SELECT id, draft_id, position, slots, \
     display_order FROM depth_chart_position WHERE draft_id = ?1 ORDER BY display_order, id";

pub const INSERT_DEPTH_CHART_POSITION: &str = "INSERT INTO depth_chart_position \
     (draft_id, position, slots, display_order) VALUES (?1, ?2, ?3, ?4)";

pub const DELETE_DEPTH_CHART_POSITIONS: &str =
    "DELETE FROM depth_chart_position WHERE draft_id = ?1";

//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Essays table. Rows are written once and never changed.
CREATE TABLE IF NOT EXISTS essays (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    original_text TEXT NOT NULL CHECK (length(original_text) > 0),
    corrected_text TEXT NOT NULL CHECK (length(corrected_text) > 0),
    -- RFC 3339, UTC, fixed microsecond precision: text order is time order
    timestamp TEXT NOT NULL,
    -- Writing session statistics
    word_count INTEGER NOT NULL DEFAULT 0 CHECK (word_count >= 0),
    paragraph_count INTEGER NOT NULL DEFAULT 0 CHECK (paragraph_count >= 0),
    backspace_count INTEGER NOT NULL DEFAULT 0 CHECK (backspace_count >= 0)
);

CREATE INDEX IF NOT EXISTS idx_essays_timestamp ON essays(timestamp);

CREATE TRIGGER IF NOT EXISTS essays_no_update
BEFORE UPDATE ON essays
BEGIN
    SELECT RAISE(ABORT, 'essays are immutable');
END;

CREATE TRIGGER IF NOT EXISTS essays_no_delete
BEFORE DELETE ON essays
BEGIN
    SELECT RAISE(ABORT, 'essays are immutable');
END;
"#;

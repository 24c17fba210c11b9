//! Canonical SQLite schema for tickets.
//!
//! - `tickets` holds one row per ticket; `ticket_id` is never reused
//! - `author` is written once on insert and guarded by a trigger afterwards

/// Migration v1: the tickets table.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL CHECK (length(body) BETWEEN 1 AND 256),
    is_completed INTEGER NOT NULL DEFAULT 0 CHECK (is_completed IN (0, 1)),
    is_frozen INTEGER NOT NULL DEFAULT 0 CHECK (is_frozen IN (0, 1)),
    author TEXT NOT NULL CHECK (length(trim(author)) > 0)
);
";

/// Migration v2: owner-scoped lookup index and the author immutability guard.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_tickets_author
    ON tickets(author, ticket_id);

CREATE TRIGGER IF NOT EXISTS tickets_author_immutable
BEFORE UPDATE OF author ON tickets
WHEN new.author IS NOT old.author
BEGIN
    SELECT RAISE(ABORT, 'ticket author is immutable');
END;
";

/// Indexes expected by owner-scoped query paths.
pub const REQUIRED_INDEXES: &[&str] = &["idx_tickets_author"];

//! Database schema definitions

// Duplicate (ip, user_agent, date) triples are rejected by the UNIQUE
// constraint; inserts use OR IGNORE so a conflict is a no-op.
pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS views (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ip TEXT NOT NULL,
    user_agent TEXT NOT NULL,
    date TEXT NOT NULL,
    UNIQUE(ip, user_agent, date)
)
"#;

// For the same-day COUNT(*) aggregate
pub const CREATE_INDEX_DATE: &str =
    "CREATE INDEX IF NOT EXISTS idx_views_date ON views(date)";

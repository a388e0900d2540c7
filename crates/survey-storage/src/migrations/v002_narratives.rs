//! V002: editable narratives and the append-only generation history.

pub const MIGRATION_SQL: &str = r#"
-- Current narrative text per (file, analysis type, item).
CREATE TABLE IF NOT EXISTS narratives (
    narrative_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES uploaded_files(file_id) ON DELETE CASCADE,
    analysis_type TEXT NOT NULL,
    analysis_item TEXT NOT NULL,
    analysis_text TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER,
    UNIQUE(file_id, analysis_type, analysis_item)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_narratives_created_at
    ON narratives(created_at);

-- Every generated narrative, including ones later edited or regenerated.
-- Quoted back into prompts as prior context.
CREATE TABLE IF NOT EXISTS narrative_history (
    history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES uploaded_files(file_id) ON DELETE CASCADE,
    analysis_type TEXT NOT NULL,
    analysis_item TEXT NOT NULL,
    analysis_text TEXT NOT NULL,
    model TEXT,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_narrative_history_created_at
    ON narrative_history(created_at);
"#;

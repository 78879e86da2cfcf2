#![forbid(unsafe_code)]

// Append-only. No foreign keys: history outlives the entities it describes.
pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS log_entries (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          actor_id INTEGER,
          action TEXT NOT NULL CHECK(action IN ('create', 'update', 'delete')),
          changes_json TEXT,
          entity_type TEXT NOT NULL,
          entity_id INTEGER NOT NULL,
          ts_ms INTEGER NOT NULL
        );
"#;

#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_document_access_document ON document_access(document_id);
        CREATE INDEX IF NOT EXISTS idx_log_entries_target ON log_entries(entity_type, entity_id, ts_ms);
"#;

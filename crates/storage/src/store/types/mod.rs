#![forbid(unsafe_code)]

use da_core::{Document, DocumentAccess, LogEntry};

/// Result of a write that may turn out to be a no-op.
///
/// `log_entry` is `None` when no audited field changed; nothing was written
/// in that case and `document` is the unchanged current state.
#[derive(Clone, Debug)]
pub struct DocumentUpdate {
    pub document: Document,
    pub log_entry: Option<LogEntry>,
}

#[derive(Clone, Debug)]
pub struct GrantUpdate {
    pub grant: DocumentAccess,
    pub log_entry: Option<LogEntry>,
}

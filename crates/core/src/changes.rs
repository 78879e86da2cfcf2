#![forbid(unsafe_code)]

//! Field-level diffs recorded in the change log.
//!
//! On disk and on the wire a change set is a JSON object mapping a field name
//! to a two-element `[old, new]` array whose items are strings or `null`.

use crate::model::{Document, DocumentField};
use serde::ser::{Serialize, SerializeMap, SerializeTuple, Serializer};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

impl FieldChange {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: Some(old.into()),
            new: Some(new.into()),
        }
    }
}

impl Serialize for FieldChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.old)?;
        pair.serialize_element(&self.new)?;
        pair.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    fields: BTreeMap<String, FieldChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `field` only when the value actually changed.
    pub fn record(&mut self, field: &str, old: &str, new: &str) {
        if old != new {
            self.fields
                .insert(field.to_string(), FieldChange::new(old, new));
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldChange)> {
        self.fields.iter().map(|(field, change)| (field.as_str(), change))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, ChangeSetError> {
        let value: JsonValue = serde_json::from_str(raw).map_err(|_| ChangeSetError::NotJson)?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &JsonValue) -> Result<Self, ChangeSetError> {
        let JsonValue::Object(map) = value else {
            return Err(ChangeSetError::NotObject);
        };
        let mut fields = BTreeMap::new();
        for (field, pair) in map {
            let JsonValue::Array(items) = pair else {
                return Err(ChangeSetError::NotPair {
                    field: field.clone(),
                });
            };
            let [old, new] = items.as_slice() else {
                return Err(ChangeSetError::NotPair {
                    field: field.clone(),
                });
            };
            let change = FieldChange {
                old: scalar(field, old)?,
                new: scalar(field, new)?,
            };
            fields.insert(field.clone(), change);
        }
        Ok(Self { fields })
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, change) in &self.fields {
            map.serialize_entry(field, change)?;
        }
        map.end()
    }
}

fn scalar(field: &str, value: &JsonValue) -> Result<Option<String>, ChangeSetError> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(value) => Ok(Some(value.clone())),
        _ => Err(ChangeSetError::InvalidValue {
            field: field.to_string(),
        }),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeSetError {
    NotJson,
    NotObject,
    NotPair { field: String },
    InvalidValue { field: String },
    UnknownField { field: String },
    NullValue { field: String },
}

impl ChangeSetError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotJson => "changes are not valid json",
            Self::NotObject => "changes must be an object",
            Self::NotPair { .. } => "each change must be an [old, new] pair",
            Self::InvalidValue { .. } => "change values must be strings or null",
            Self::UnknownField { .. } => "change names a field that cannot be restored",
            Self::NullValue { .. } => "change has no old value to restore",
        }
    }
}

/// The changes column of a log entry, validated when it is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Changes {
    Absent,
    Recorded(ChangeSet),
    Malformed(ChangeSetError),
}

impl Changes {
    pub fn from_column(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Absent,
            Some(raw) => match ChangeSet::parse(raw) {
                Ok(set) => Self::Recorded(set),
                Err(err) => Self::Malformed(err),
            },
        }
    }

    pub fn to_column(&self) -> Option<String> {
        match self {
            Self::Recorded(set) => Some(set.to_json()),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    /// A non-empty, well-formed change set, if there is one.
    pub fn usable(&self) -> Option<&ChangeSet> {
        match self {
            Self::Recorded(set) if !set.is_empty() => Some(set),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<ChangeSet> for Changes {
    fn from(value: ChangeSet) -> Self {
        if value.is_empty() {
            Self::Absent
        } else {
            Self::Recorded(value)
        }
    }
}

/// Diff of the audited fields between two states of the same document.
pub fn document_changes(before: &Document, after: &Document) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for field in DocumentField::ALL {
        changes.record(field.as_str(), before.field(field), after.field(field));
    }
    changes
}

/// Replays recorded old values onto `document`.
///
/// The recorded new values are ignored: the current value is overwritten even
/// when later edits changed it since the entry was written.
pub fn restore_document(
    document: &Document,
    changes: &ChangeSet,
) -> Result<Document, ChangeSetError> {
    let mut restored = document.clone();
    for (name, change) in changes.iter() {
        let field = DocumentField::parse(name).ok_or_else(|| ChangeSetError::UnknownField {
            field: name.to_string(),
        })?;
        let old = change.old.clone().ok_or_else(|| ChangeSetError::NullValue {
            field: name.to_string(),
        })?;
        restored.set_field(field, old);
    }
    Ok(restored)
}

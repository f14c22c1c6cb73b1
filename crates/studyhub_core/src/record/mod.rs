//! Boundary adapter between the hosted record store and the canonical model.
//!
//! # Responsibility
//! - Own every remote field name and shape variation.
//! - Hand canonical, validated records to repositories and services.
//!
//! # See also
//! - `model` for the canonical shapes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod remote;

pub use remote::{
    AdapterError, RecordEnvelope, RecordResult, RemoteAssignment, RemoteCourse, RemoteCourseRef,
    RemoteStudent,
};

/// Export of every collection, as produced by a record store dump.
///
/// Records stay raw JSON until import so one malformed record can be
/// rejected on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    #[serde(default)]
    pub courses: Vec<Value>,
    #[serde(default)]
    pub assignments: Vec<Value>,
    #[serde(default)]
    pub students: Vec<Value>,
}

impl RemoteSnapshot {
    /// Parses a snapshot from JSON text. Only the collection layout is
    /// checked here.
    pub fn from_json(text: &str) -> Result<Self, AdapterError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Decodes one raw record into its remote shape.
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, AdapterError> {
    Ok(serde_json::from_value(value)?)
}

/// Best-effort `Id` of a raw record for reporting; `?` when absent.
pub fn record_label(value: &Value) -> String {
    match value.get("Id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id.trim().to_string(),
        _ => "?".to_string(),
    }
}

/// Numeric `Id` of a raw record, when it has one.
pub fn record_id(value: &Value) -> Option<i64> {
    match value.get("Id") {
        Some(Value::Number(id)) => id.as_i64(),
        Some(Value::String(id)) => id.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_record, record_id, record_label, RemoteAssignment, RemoteSnapshot};
    use crate::record::AdapterError;

    #[test]
    fn snapshot_keeps_malformed_records_for_later() {
        let snapshot = RemoteSnapshot::from_json(
            r#"{ "assignments": [
                { "Id": 1, "course_id_c": 1, "title_c": "Ok", "due_date_c": "2024-10-01" },
                { "Id": 2, "course_id_c": 1, "due_date_c": "2024-10-01" },
                { "Id": "3", "course_id_c": 1, "title_c": "Half", "due_date_c": "2024-10-01",
                  "grade_c": 92.5 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(snapshot.assignments.len(), 3);
        assert!(snapshot.courses.is_empty());

        let decoded: Vec<_> = snapshot
            .assignments
            .into_iter()
            .map(decode_record::<RemoteAssignment>)
            .collect();
        assert!(decoded[0].is_ok());
        assert!(matches!(decoded[1], Err(AdapterError::Json(_))));
        assert!(matches!(decoded[2], Err(AdapterError::Json(_))));
    }

    #[test]
    fn record_ids_are_read_from_numbers_and_strings() {
        let value = serde_json::json!({ "Id": " 12 " });
        assert_eq!(record_id(&value), Some(12));
        assert_eq!(record_label(&value), "12");
        let missing = serde_json::json!({ "name_c": "x" });
        assert_eq!(record_id(&missing), None);
        assert_eq!(record_label(&missing), "?");
    }

    #[test]
    fn snapshot_rejects_non_list_collections() {
        assert!(RemoteSnapshot::from_json(r#"{ "courses": 5 }"#).is_err());
    }
}

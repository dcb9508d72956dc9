//! Tests for resilient archive document loading.
//!
//! These tests verify warning collection and error recovery when decoding
//! documents with malformed elements, plus the strict/resilient split that
//! callers rely on: strict decoding for imports, resilient decoding for
//! data-file loads.

use quiver_archive::{
    Error, Warning, decode_array, decode_array_resilient, read_array_document,
    read_array_document_resilient,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct SimpleRecord {
    id: u32,
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct RecordWithOptional {
    id: u32,
    name: String,
    #[serde(default)]
    optional_field: Option<String>,
}

fn write_temp_document(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

mod resilient_decoding {
    use super::*;

    #[test]
    fn mixed_valid_and_invalid_elements() {
        let text = r#"[
            {"id": 1, "name": "first"},
            {"id": "not a number", "name": "broken"},
            {"id": 3, "name": "third"},
            "just a string",
            {"id": 5, "name": "fifth"}
        ]"#;

        let (records, warnings) = decode_array_resilient::<SimpleRecord>(text).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 3, 5]
        );

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].index(), 1);
        assert_eq!(warnings[1].index(), 3);
    }

    #[test]
    fn all_elements_invalid_yields_empty_collection() {
        let text = r#"[1, true, "three"]"#;

        let (records, warnings) = decode_array_resilient::<SimpleRecord>(text).unwrap();

        assert!(records.is_empty());
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn all_elements_valid_yields_no_warnings() {
        let text = r#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#;

        let (records, warnings) = decode_array_resilient::<SimpleRecord>(text).unwrap();

        assert_eq!(records.len(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn warnings_carry_decode_error_details() {
        let text = r#"[{"id": 1}]"#;

        let (records, warnings) = decode_array_resilient::<SimpleRecord>(text).unwrap();

        assert!(records.is_empty());
        assert_eq!(warnings.len(), 1);
        let Warning::MalformedElement { index, error } = &warnings[0];
        assert_eq!(*index, 0);
        assert!(error.contains("name"), "error should name the missing field");
    }

    #[test]
    fn missing_optional_fields_are_not_warnings() {
        let text = r#"[{"id": 1, "name": "a"}]"#;

        let (records, warnings) = decode_array_resilient::<RecordWithOptional>(text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].optional_field, None);
        assert!(warnings.is_empty());
    }

    #[test]
    fn top_level_object_is_a_hard_error() {
        let err = decode_array_resilient::<SimpleRecord>(r#"{"records": []}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn invalid_json_is_a_hard_error() {
        let err = decode_array_resilient::<SimpleRecord>("[{\"id\": 1").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}

mod strict_decoding {
    use super::*;

    #[test]
    fn first_bad_element_fails_the_decode() {
        let text = r#"[{"id": 1, "name": "ok"}, {"id": 2}, {"id": 3}]"#;

        let err = decode_array::<SimpleRecord>(text).unwrap_err();

        match err {
            Error::Element { index, .. } => assert_eq!(index, 1),
            other => panic!("expected Element error, got {other:?}"),
        }
    }

    #[test]
    fn strict_and_resilient_agree_on_clean_input() {
        let text = r#"[{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]"#;

        let strict: Vec<SimpleRecord> = decode_array(text).unwrap();
        let (resilient, warnings) = decode_array_resilient::<SimpleRecord>(text).unwrap();

        assert_eq!(strict, resilient);
        assert!(warnings.is_empty());
    }
}

mod file_loading {
    use super::*;

    #[tokio::test]
    async fn resilient_load_from_corrupted_file() {
        let file = write_temp_document(
            r#"[
                {"id": 1, "name": "keep"},
                {"name": "no id"},
                {"id": 3, "name": "also keep"}
            ]"#,
        );

        let (records, warnings) = read_array_document_resilient::<SimpleRecord, _>(file.path())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].index(), 1);
    }

    #[tokio::test]
    async fn resilient_load_of_empty_file() {
        let file = write_temp_document("");

        let (records, warnings) = read_array_document_resilient::<SimpleRecord, _>(file.path())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn resilient_load_of_empty_array_file() {
        let file = write_temp_document("[]\n");

        let (records, warnings) = read_array_document_resilient::<SimpleRecord, _>(file.path())
            .await
            .unwrap();

        assert!(records.is_empty());
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn strict_load_fails_on_corrupted_file() {
        let file = write_temp_document(r#"[{"id": 1, "name": "ok"}, {"broken": true}]"#);

        let result = read_array_document::<SimpleRecord, _>(file.path()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn large_document_with_sparse_errors() {
        let mut elements: Vec<String> = (0..1000)
            .map(|id| format!(r#"{{"id": {id}, "name": "record-{id}"}}"#))
            .collect();
        // Corrupt every 100th element
        for index in (0..1000).step_by(100) {
            elements[index] = r#"{"wrong": "shape"}"#.to_string();
        }
        let file = write_temp_document(&format!("[{}]", elements.join(",")));

        let (records, warnings) = read_array_document_resilient::<SimpleRecord, _>(file.path())
            .await
            .unwrap();

        assert_eq!(records.len(), 990);
        assert_eq!(warnings.len(), 10);
        assert!(warnings.iter().all(|w| w.index() % 100 == 0));
    }
}

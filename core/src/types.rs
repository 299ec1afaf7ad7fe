//! JSON bodies exchanged with the files API.

use serde::{Deserialize, Serialize};

/// Body of `POST /files`. `data` is URI-component encoded by the sender.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddFile {
    pub name: String,
    pub data: String,
}

/// Body of a successful `GET /files/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileContent {
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_requires_name_and_data() {
        assert!(serde_json::from_str::<AddFile>(r#"{"name":"a"}"#).is_err());
        assert!(serde_json::from_str::<AddFile>(r#"{"data":"a"}"#).is_err());
        let input: AddFile = serde_json::from_str(r#"{"name":"a","data":"b"}"#).unwrap();
        assert_eq!(input.name, "a");
        assert_eq!(input.data, "b");
    }

    #[test]
    fn add_file_ignores_unknown_fields() {
        let input: AddFile =
            serde_json::from_str(r#"{"name":"a","data":"b","extra":1}"#).unwrap();
        assert_eq!(input.data, "b");
    }

    #[test]
    fn file_content_escapes_quotes_and_control_characters() {
        let body = serde_json::to_string(&FileContent {
            data: "say \"hi\"\n\tbye".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"data":"say \"hi\"\n\tbye"}"#);
    }
}

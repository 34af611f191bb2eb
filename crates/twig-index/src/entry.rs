//! Staging entry type.

use serde::{Deserialize, Serialize};
use twig_types::ObjectId;

/// A staged file snapshot: the path as the user named it and the id of its
/// blob in the object store.
///
/// Serialized as `{"path": "...", "hash": "<hex>"}`, which is also the shape
/// of each element of a commit record's `files` list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StagingEntry {
    pub path: String,
    pub hash: ObjectId,
}

impl StagingEntry {
    pub fn new(path: impl Into<String>, hash: ObjectId) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_index_file() {
        let id = ObjectId::from_hex("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed").unwrap();
        let json = serde_json::to_string(&StagingEntry::new("a.txt", id)).unwrap();
        assert_eq!(
            json,
            r#"{"path":"a.txt","hash":"2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"}"#
        );
    }

    #[test]
    fn missing_hash_is_rejected() {
        let parsed: Result<StagingEntry, _> = serde_json::from_str(r#"{"path":"a.txt"}"#);
        assert!(parsed.is_err());
    }
}

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use twig_index::StagingEntry;
use twig_types::ObjectId;

use crate::error::{LedgerError, LedgerResult};

/// An immutable commit: the staged file set plus metadata and parent link.
///
/// Wire format (compact JSON, fields in this order):
/// ```text
/// {"timeStamp":"2024-05-01T12:00:00.000Z","message":"...","files":[{"path":"...","hash":"..."}],"parent":null}
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Creation time, millisecond precision.
    #[serde(rename = "timeStamp", with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Files in staging order.
    pub files: Vec<StagingEntry>,
    /// `None` for the root commit.
    #[serde(deserialize_with = "deserialize_parent")]
    pub parent: Option<ObjectId>,
}

impl CommitRecord {
    /// Build a record, truncating `timestamp` to the precision it is stored at
    /// so that a re-read record compares equal to the written one.
    pub fn new(
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
        files: Vec<StagingEntry>,
        parent: Option<ObjectId>,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(3),
            message: message.into(),
            files,
            parent,
        }
    }

    /// Returns `true` for the first commit of a chain.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The last entry recorded for `path`, if any.
    pub fn file(&self, path: &str) -> Option<&StagingEntry> {
        self.files.iter().rev().find(|f| f.path == path)
    }

    /// The exact bytes stored in the object store.
    pub fn to_bytes(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode the object stored under `id`.
    pub fn from_bytes(id: &ObjectId, data: &[u8]) -> LedgerResult<Self> {
        serde_json::from_slice(data).map_err(|e| LedgerError::CorruptCommitRecord {
            id: *id,
            reason: e.to_string(),
        })
    }

    /// The `log` view of this record.
    pub fn summary(&self, id: ObjectId) -> CommitSummary {
        CommitSummary {
            id,
            timestamp: self.timestamp,
            message: self.message.clone(),
        }
    }
}

/// One line of history as produced by [`crate::CommitChain::log`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub id: ObjectId,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl CommitSummary {
    /// The timestamp as it appears in the commit record.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// Root commits written by older clients carry the empty HEAD text as parent.
fn deserialize_parent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ObjectId>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => ObjectId::from_hex(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

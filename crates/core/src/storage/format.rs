use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;

/// Current storage document version.
pub const CURRENT_VERSION: u16 = 1;

/// On-disk shape of the durable key/value store.
///
/// ```text
/// { "version": 1, "items": { "<key>": "<string value>", ... } }
/// ```
///
/// Values are opaque strings, the same contract as browser local storage:
/// callers serialize their own records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDocument {
    pub version: u16,
    #[serde(default)]
    pub items: BTreeMap<String, String>,
}

impl Default for StorageDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            items: BTreeMap::new(),
        }
    }
}

/// Serialize a document to bytes.
pub fn write_document(doc: &StorageDocument) -> Result<Vec<u8>, CoreError> {
    serde_json::to_vec_pretty(doc)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize storage document: {e}")))
}

/// Parse a document from bytes. Empty input is an empty document.
pub fn read_document(data: &[u8]) -> Result<StorageDocument, CoreError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(StorageDocument::default());
    }

    let doc: StorageDocument = serde_json::from_slice(data)
        .map_err(|e| CoreError::Deserialization(format!("Invalid storage document: {e}")))?;

    if doc.version == 0 || doc.version > CURRENT_VERSION {
        return Err(CoreError::Deserialization(format!(
            "Unsupported storage document version: {}",
            doc.version
        )));
    }

    Ok(doc)
}

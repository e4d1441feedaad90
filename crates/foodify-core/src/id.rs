//! # Record Identifiers
//!
//! Store-generated keys. The text form is the 24-character hex encoding of
//! 12 bytes, the same shape as a MongoDB ObjectId.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of raw bytes in an identifier.
pub const RECORD_ID_LEN: usize = 12;

/// A 12-byte record key, serialized as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId([u8; RECORD_ID_LEN]);

/// Returned when a string is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record id: {0:?}")]
pub struct InvalidRecordId(pub String);

impl RecordId {
    /// Generates a fresh id: 4 bytes of unix time followed by 8 random bytes.
    pub fn new() -> Self {
        let mut bytes = [0u8; RECORD_ID_LEN];
        let secs = Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&Uuid::new_v4().as_bytes()[..8]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; RECORD_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; RECORD_ID_LEN] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != RECORD_ID_LEN * 2 {
            return Err(InvalidRecordId(s.to_string()));
        }
        let mut bytes = [0u8; RECORD_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| InvalidRecordId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_hex()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

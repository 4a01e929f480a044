//! Binary encoding of [`RootState`] for the ledger.
//!
//! Player state is encoded with `bitcode` behind a versioned header so that
//! blobs written by a future build are rejected instead of misread.

use crate::state::RootState;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying an encoded player state.
pub const STATE_MAGIC: u32 = 0x4EA7_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", STATE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("state from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHeader {
    pub magic: u32,
    pub version: u32,
}

impl StateHeader {
    pub fn new() -> Self {
        Self {
            magic: STATE_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != STATE_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for StateHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct EncodeEnvelope<'a> {
    header: StateHeader,
    root: &'a RootState,
}

#[derive(Deserialize)]
struct DecodeEnvelope {
    header: StateHeader,
    root: RootState,
}

impl RootState {
    /// Encode for storage in the ledger. Identical states always encode to
    /// identical bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let envelope = EncodeEnvelope {
            header: StateHeader::new(),
            root: self,
        };
        bitcode::serialize(&envelope).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Decode a blob produced by [`RootState::serialize`], validating the header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DeserializeError> {
        let envelope: DecodeEnvelope =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        envelope.header.validate()?;
        Ok(envelope.root)
    }
}

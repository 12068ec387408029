//! Opaque byte payloads (startup scripts, key material, user data)

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque byte content handed to a provider as-is.
///
/// Serialized as standard base64 so options can be dumped as JSON without
/// mangling binary scripts.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload {
    content: Vec<u8>,
}

impl Payload {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Content as UTF-8 text, if it is valid UTF-8
    pub fn as_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material must not end up in logs.
        f.debug_struct("Payload")
            .field("len", &self.content.len())
            .finish()
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.content))
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Self::new)
            .map_err(serde::de::Error::custom)
    }
}

//! Codec trait and implementations for serializing/deserializing events.
//!
//! A "codec" converts between Rust types and wire frames. Scrawl's browser
//! client speaks JSON text over WebSocket, so frames are `String`s rather
//! than raw bytes. The rest of the server only talks to the [`Codec`]
//! trait and never calls `serde_json` directly.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to text frames and decodes them back.
///
/// `Send + Sync + 'static` lets one codec instance live in the shared
/// server state and be used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the frame is malformed, names an
    /// unknown event, or is missing required fields.
    fn decode<T: DeserializeOwned>(&self, frame: &str) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ```rust
/// use scrawl_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = r#"{"event":"leaveRoom","data":{"roomCode":"R1"}}"#;
/// let event: ClientEvent = codec.decode(frame).unwrap();
/// assert_eq!(event.room_code().as_str(), "R1");
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, frame: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::Decode)
    }
}

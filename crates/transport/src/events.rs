use monitor_core::{McError, Message, Result, SystemSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SYSTEM_UPDATE: &str = "system_update";
pub const ERROR: &str = "error";
pub const STATUS: &str = "status";

/// All frames carried on the push connection.
///
/// On the wire each frame is one line of JSON: `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    SystemUpdate(Box<SystemSnapshot>),
    Error(ErrorPayload),
    /// Sent once by the server to every client right after it connects.
    Status(StatusPayload),
    /// An event we don't handle; carries the event name for debugging.
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub status:      String,
    pub version:     String,
    pub interval_ms: u64,
}

impl StatusPayload {
    pub fn running(interval_ms: u64) -> Self {
        Self {
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            interval_ms,
        }
    }
}

impl Frame {
    pub fn event(&self) -> &str {
        match self {
            Self::SystemUpdate(_) => SYSTEM_UPDATE,
            Self::Error(_) => ERROR,
            Self::Status(_) => STATUS,
            Self::Unknown(name) => name,
        }
    }

    /// The dashboard message this frame maps to, if any.
    pub fn into_message(self) -> Option<Message> {
        match self {
            Self::SystemUpdate(snapshot) => Some(Message::SystemUpdate(snapshot)),
            Self::Error(payload) => Some(Message::Error(payload.message)),
            Self::Status(_) | Self::Unknown(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data:  Value,
}

#[derive(Serialize)]
struct OutFrame<'a, T: Serialize> {
    event: &'a str,
    data:  &'a T,
}

/// Parse one received line into a typed [`Frame`].
pub fn parse_frame(line: &str) -> Result<Frame> {
    let raw: RawFrame = serde_json::from_str(line).map_err(decode_error)?;

    let frame = match raw.event.as_str() {
        SYSTEM_UPDATE => {
            let snapshot = if raw.data.is_null() {
                SystemSnapshot::default()
            } else {
                serde_json::from_value(raw.data).map_err(decode_error)?
            };
            Frame::SystemUpdate(Box::new(snapshot))
        }
        ERROR => Frame::Error(match raw.data {
            Value::Null => ErrorPayload::default(),
            Value::String(message) => ErrorPayload { message: Some(message) },
            data => serde_json::from_value(data).map_err(decode_error)?,
        }),
        STATUS => Frame::Status(serde_json::from_value(raw.data).map_err(decode_error)?),
        _ => Frame::Unknown(raw.event),
    };

    Ok(frame)
}

/// Encode a frame as a single JSON line (without the trailing newline).
pub fn encode_frame(frame: &Frame) -> Result<String> {
    let encoded = match frame {
        Frame::SystemUpdate(snapshot) => serde_json::to_string(&OutFrame {
            event: SYSTEM_UPDATE,
            data:  snapshot.as_ref(),
        }),
        Frame::Error(payload) => serde_json::to_string(&OutFrame { event: ERROR, data: payload }),
        Frame::Status(payload) => serde_json::to_string(&OutFrame { event: STATUS, data: payload }),
        Frame::Unknown(name) => {
            return Err(McError::Transport(format!("cannot encode unknown event '{name}'")))
        }
    };
    encoded.map_err(|e| McError::Transport(format!("encode {}: {e}", frame.event())))
}

fn decode_error(e: serde_json::Error) -> McError {
    McError::Decode(e.to_string())
}

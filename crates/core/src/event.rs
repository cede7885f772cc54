use crate::state::SystemSnapshot;

/// Messages delivered to the dashboard controller.
///
/// Sources:
/// - Transport client  → `Connected`, `Disconnected`, `SystemUpdate`, `Error`
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The push connection was established.
    Connected,
    /// The push connection was lost.
    Disconnected,
    /// A decoded metrics snapshot from the server.
    SystemUpdate(Box<SystemSnapshot>),
    /// Server-side error event; the message may be absent.
    Error(Option<String>),
}

impl Message {
    /// Stable event name, matching the wire names where one exists.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connect",
            Self::Disconnected => "disconnect",
            Self::SystemUpdate(_) => "system_update",
            Self::Error(_) => "error",
        }
    }
}

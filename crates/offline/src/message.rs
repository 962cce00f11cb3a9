//! Control messages posted from pages to the worker.

use serde::{Deserialize, Serialize};

/// A recognised control message.
///
/// Wire shape: `{ "type": "SKIP_WAITING" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate the waiting worker now instead of waiting for every
    /// controlled page to close.
    SkipWaiting,
}

impl WorkerMessage {
    /// Parse a posted message. Anything unrecognised yields `None`.
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skip_waiting() {
        assert_eq!(
            WorkerMessage::parse(r#"{"type":"SKIP_WAITING"}"#),
            Some(WorkerMessage::SkipWaiting)
        );
        // Extra fields are tolerated
        assert_eq!(
            WorkerMessage::parse(r#"{"type":"SKIP_WAITING","from":"banner"}"#),
            Some(WorkerMessage::SkipWaiting)
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(WorkerMessage::parse(r#"{"type":"CLAIM"}"#), None);
        assert_eq!(WorkerMessage::parse("SKIP_WAITING"), None);
    }

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_string(&WorkerMessage::SkipWaiting).unwrap(),
            r#"{"type":"SKIP_WAITING"}"#
        );
    }
}

//! Playback directives sent back to the device.

use serde::{Deserialize, Serialize};

/// The audio stream a play directive refers to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stream {
    /// Opaque token identifying the stream; the track id.
    pub token: String,
    /// Streaming URL.
    pub url: String,
    /// Where the device should start playback.
    pub offset_ms: u64,
    /// Token the device must currently be playing for an enqueue to apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_previous_token: Option<String>,
}

/// How the device should treat a directive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayBehavior {
    /// Interrupt playback and replace the whole device queue.
    ReplaceAll,
    /// Append after the device's current item.
    Enqueue,
    /// Halt playback.
    Stop,
}

/// A playback directive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "behavior", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    ReplaceAll(Stream),
    Enqueue(Stream),
    Stop,
}

impl Directive {
    pub const fn behavior(&self) -> PlayBehavior {
        match self {
            Self::ReplaceAll(_) => PlayBehavior::ReplaceAll,
            Self::Enqueue(_) => PlayBehavior::Enqueue,
            Self::Stop => PlayBehavior::Stop,
        }
    }

    /// The stream, for play and enqueue directives.
    pub const fn stream(&self) -> Option<&Stream> {
        match self {
            Self::ReplaceAll(stream) | Self::Enqueue(stream) => Some(stream),
            Self::Stop => None,
        }
    }
}

/// Visual card shown on devices with a screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub text: String,
}

impl Card {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Everything the response layer needs to answer a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackResponse {
    pub directive: Directive,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directive_wire_format() {
        let directive = Directive::Enqueue(Stream {
            token: "b".into(),
            url: "http://host/stream?id=b".into(),
            offset_ms: 0,
            expected_previous_token: Some("a".into()),
        });

        assert_eq!(
            serde_json::to_value(&directive).unwrap(),
            json!({
                "behavior": "ENQUEUE",
                "token": "b",
                "url": "http://host/stream?id=b",
                "offset_ms": 0,
                "expected_previous_token": "a",
            })
        );
        assert_eq!(
            serde_json::to_value(Directive::Stop).unwrap(),
            json!({ "behavior": "STOP" })
        );
    }

    #[test]
    fn test_behavior() {
        assert_eq!(Directive::Stop.behavior(), PlayBehavior::Stop);
        assert!(Directive::Stop.stream().is_none());
    }
}

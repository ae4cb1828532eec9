//! Playback controller: maps queue transitions to device directives.

use tracing::{debug, info};

use crate::types::{Card, Directive, PlaybackResponse, Stream, Track};

/// How a track should reach the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Start now, replacing whatever the device is playing.
    Play,
    /// Queue after the device's current item.
    Continue,
    /// Halt playback.
    Stop,
}

/// Build the response for `track` in the given mode.
///
/// Speech and card only accompany [`PlaybackMode::Play`]; the device does not
/// accept them while continuing a play list.
pub fn start_playback(
    mode: PlaybackMode,
    track: &Track,
    speech: Option<String>,
    card: Option<Card>,
) -> PlaybackResponse {
    match mode {
        PlaybackMode::Play => play(track, speech, card),
        PlaybackMode::Continue => {
            if speech.is_some() || card.is_some() {
                debug!("Dropping speech and card for enqueued track {}", track.id);
            }
            enqueue(track)
        }
        PlaybackMode::Stop => stop(),
    }
}

/// Replace the device queue with `track`, starting from its stored offset.
pub fn play(track: &Track, speech: Option<String>, card: Option<Card>) -> PlaybackResponse {
    debug!(
        "Play track {} (previous {:?}) at {} ms",
        track.id,
        track.previous_id,
        track.offset.as_millis()
    );
    info!("Playing track: {}", track.display_name());

    PlaybackResponse {
        directive: Directive::ReplaceAll(Stream {
            token: track.id.clone(),
            url: track.uri.clone(),
            offset_ms: track.offset.as_millis(),
            expected_previous_token: None,
        }),
        speech,
        card,
    }
}

/// Enqueue `track` after the device's current item, from the beginning.
pub fn enqueue(track: &Track) -> PlaybackResponse {
    debug!("Enqueue track {} after {:?}", track.id, track.previous_id);
    info!("Enqueuing track: {}", track.display_name());

    PlaybackResponse {
        directive: Directive::Enqueue(Stream {
            token: track.id.clone(),
            url: track.uri.clone(),
            offset_ms: 0,
            expected_previous_token: track.previous_id.clone(),
        }),
        speech: None,
        card: None,
    }
}

/// Halt playback.
pub fn stop() -> PlaybackResponse {
    debug!("Stop playback");

    PlaybackResponse {
        directive: Directive::Stop,
        speech: None,
        card: None,
    }
}

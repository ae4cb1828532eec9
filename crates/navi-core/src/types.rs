//! Core domain types for Navi.

pub mod common;
pub mod directive;
pub mod queue;
pub mod track;

pub use common::{Duration, Offset};
pub use directive::{Card, Directive, PlayBehavior, PlaybackResponse, Stream};
pub use queue::{MediaQueue, QueueSnapshot, QueueState};
pub use track::{Track, TrackMetadata};

//! # navi-core
//!
//! Core types, the playback queue engine, and the playback controller for
//! the Navi voice music player.

pub mod catalog;
pub mod controller;
pub mod error;
pub mod types;

pub use catalog::{resolve_track, Catalog};
pub use controller::PlaybackMode;
pub use error::{Error, HttpError, Result};
pub use types::*;

//! # navi-subsonic
//!
//! Client for Subsonic compatible music servers such as Navidrome.
//!
//! Resolves song ids into track metadata, builds authenticated stream URIs
//! and reports plays and stars back to the server.

pub mod catalog;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod types;

pub use client::SubsonicClient;
pub use config::ConnectionConfig;
pub use types::StarTarget;

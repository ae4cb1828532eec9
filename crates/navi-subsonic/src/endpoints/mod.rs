//! Typed wrappers around the Subsonic REST endpoints used by Navi.

mod annotation;
mod browsing;
mod media;
mod system;

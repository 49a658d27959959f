//! Marker types describing what a [`DateTimeOf`] denotes.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Marker of an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker of an entity expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

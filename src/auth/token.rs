//! Bearer token models held by the token cache.

pub mod cached;
pub mod secret;

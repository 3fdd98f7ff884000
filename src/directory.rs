//! Directory-facing configuration: validated client options and the endpoint set derived
//! from them.
//!
//! `options` exposes [`ClientOptions`], which fails fast (naming the offending key) when a
//! required credential is missing or is not a string. `endpoints` owns every URL the crate
//! talks to, so flows never format hosts by hand.

pub mod endpoints;
pub mod options;

pub use endpoints::*;
pub use options::*;

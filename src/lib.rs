//! Strata: reactive layers with curve-driven property animation.
//!
//! Re-exports the public surface of `strata-scene`.

pub use strata_scene::*;

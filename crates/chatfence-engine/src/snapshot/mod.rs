//! # Snapshot Testing Support
//!
//! Utilities for testing the engine via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts segments and issues to a stable, serializable
//!   `Snap` for `insta` snapshot testing
//! - **`invariants`**: Runtime checks for segmentation correctness (spans in
//!   bounds, segments tile the buffer, content inside its block, exact round trip)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};

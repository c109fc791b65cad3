//! Platform abstraction layer
//!
//! Browser/native differences stay in `main.rs`; this module holds the
//! host-independent part of input handling.

pub mod input;

pub use input::{Action, KeyboardState};

//! Shared helpers.

mod position;

pub use position::*;

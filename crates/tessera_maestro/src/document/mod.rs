//! Open component and script files.

mod store;

pub use store::*;

//! Carton - The shared toolbox for Tessera.
//!
//! A carton is the case an artist carries their tools in. This crate holds the small,
//! dependency-light pieces every other Tessera crate reaches for.
//!
//! # Modules
//!
//! - **span**: half-open byte ranges used by every source map
//! - **case**: the identifier case conversions used when attribute names are normalized
//! - **hash**: xxHash3 content hashing for cache reuse
//!
//! # Example
//!
//! ```
//! use tessera_carton::{camelize, hyphenate, Span};
//!
//! assert_eq!(camelize("foo-bar"), "fooBar");
//! assert_eq!(hyphenate("fooBar"), "foo-bar");
//!
//! let span = Span::new(4, 10);
//! assert!(span.contains(Span::new(5, 7)));
//! ```

pub mod case;
pub mod hash;
pub mod span;

pub use case::{camelize, capitalize, hyphenate, is_simple_identifier};
pub use hash::hash_str;
pub use span::Span;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

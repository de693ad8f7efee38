//! Armature - The structural parsers for Tessera.
//!
//! Every parser here is tolerant: it never fails outright, it returns what it could
//! recover together with a list of [`ParseError`]s.
//!
//! - [`sfc::parse_sfc`] splits a component file into blocks
//! - [`template::parse_template`] builds the template AST
//! - [`script::analyze_script`] and [`script::analyze_script_setup`] extract the facts
//!   virtual code generation needs from logic blocks
//! - [`css::find_class_names`] scans a style block for class selectors

pub mod css;
pub mod script;
pub mod sfc;
pub mod template;

mod lexer;

pub use css::{find_class_names, ClassName};
pub use script::{analyze_script, analyze_script_setup};
pub use sfc::parse_sfc;
pub use template::parse_template;

pub use tessera_relief::{ParseError, ParseErrorCode};

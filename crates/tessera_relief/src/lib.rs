//! Relief - The sculptured AST surface for Tessera.
//!
//! A relief is a sculpture raised from a flat surface. This crate holds the shapes the
//! parsers in `tessera_armature` raise from component file text:
//!
//! - [`sfc`]: the block descriptor (`<template>`, `<script>`, `<script setup>`, `<style>`,
//!   custom blocks)
//! - [`template`]: the template node sum type with `v-if` chains and `v-for` already
//!   structured
//! - [`script`]: the facts the script analyzer extracts from logic blocks
//! - [`error`]: parse errors shared by every parser
//!
//! All offsets are byte offsets. Template and script spans are relative to their block
//! content; SFC block spans are relative to the whole file.

pub mod error;
pub mod script;
pub mod sfc;
pub mod template;

pub use error::{ParseError, ParseErrorCode};
pub use script::{
    ExportDefault, LabelBinding, LabelVar, MacroCall, RefLabel, ScriptFacts, ScriptSetupFacts,
};
pub use sfc::{BlockAttr, SfcBlock, SfcDescriptor};
pub use template::{
    AttributeNode, AttributeValue, CommentNode, DirectiveArg, DirectiveNode, ElementNode,
    Expression, ForNode, IfBranch, IfNode, InterpolationNode, PropNode, TemplateAst,
    TemplateNode, TextNode,
};

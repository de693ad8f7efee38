//! Facts extracted from logic blocks.
//!
//! The script analyzer does not build a full syntax tree. It records the handful of
//! constructs virtual code generation needs, each as spans relative to the block content.

use compact_str::CompactString;
use serde::Serialize;
use tessera_carton::Span;

/// Facts from a `<script>` block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptFacts {
    pub export_default: Option<ExportDefault>,
}

/// `export default { ... }` or `export default defineComponent({ ... })`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDefault {
    /// The whole statement, from `export` to the end of the expression.
    pub span: Span,
    /// Span of the options object literal when one could be found.
    pub options: Option<Span>,
    /// Keys of `props` in the options object.
    pub props: Vec<CompactString>,
    /// Keys of `components` in the options object.
    pub components: Vec<CompactString>,
}

/// Facts from a `<script setup>` block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScriptSetupFacts {
    /// Whole import declarations.
    pub imports: Vec<Span>,
    /// Bindings exposed to the template (variables, functions, value imports).
    pub exposes: Vec<Span>,
    /// `ref:` sugar labels.
    pub labels: Vec<RefLabel>,
    pub define_props: Option<MacroCall>,
    pub define_emit: Option<MacroCall>,
    /// Keys of the object passed to `defineProps`.
    pub props: Vec<CompactString>,
}

/// A `defineProps(...)` or `defineEmit(s)(...)` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroCall {
    pub span: Span,
    /// Span of the first argument.
    pub args: Option<Span>,
    /// Span of the type argument between `<` and `>`.
    pub type_args: Option<Span>,
}

/// A labeled statement `ref: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefLabel {
    /// Whole statement including the label.
    pub span: Span,
    /// Span of the label identifier.
    pub label: Span,
    pub bindings: Vec<LabelBinding>,
}

/// One `left = right` assignment inside a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelBinding {
    /// `left = right` including surrounding parentheses.
    pub parent: Span,
    pub left: Span,
    pub right: Option<Span>,
    pub vars: Vec<LabelVar>,
}

/// A variable introduced by a label binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelVar {
    pub name: CompactString,
    pub span: Span,
    /// `{ foo }` shorthand inside an object pattern.
    pub is_shorthand: bool,
    /// The label statement is at the top level of the block.
    pub in_root: bool,
}

//! Template AST.
//!
//! `v-if` chains and `v-for` elements are lifted into [`IfNode`] and [`ForNode`] while
//! parsing, the same structure a template compiler produces after its structural
//! transforms. A `<template>` wrapper carrying the structural directive is unwrapped into
//! the branch/loop children.

use compact_str::CompactString;
use serde::Serialize;
use tessera_carton::Span;

use crate::ParseError;

/// Root of a parsed template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateAst {
    pub children: Vec<TemplateNode>,
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize)]
pub enum TemplateNode {
    Element(Box<ElementNode>),
    Text(TextNode),
    Comment(CommentNode),
    Interpolation(InterpolationNode),
    If(Box<IfNode>),
    For(Box<ForNode>),
}

impl TemplateNode {
    pub fn loc(&self) -> Span {
        match self {
            Self::Element(el) => el.loc,
            Self::Text(text) => text.loc,
            Self::Comment(comment) => comment.loc,
            Self::Interpolation(interp) => interp.loc,
            Self::If(node) => node.loc,
            Self::For(node) => node.loc,
        }
    }
}

/// An expression slice of the template source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub content: String,
    pub span: Span,
}

impl Expression {
    pub fn new(content: impl Into<String>, span: Span) -> Self {
        Self {
            content: content.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementNode {
    pub tag: CompactString,
    /// Span of the tag name in the opening tag.
    pub tag_span: Span,
    /// Span of the tag name in the closing tag.
    pub end_tag_span: Option<Span>,
    pub props: Vec<PropNode>,
    pub children: Vec<TemplateNode>,
    pub is_self_closing: bool,
    pub loc: Span,
}

impl ElementNode {
    pub fn directives(&self) -> impl Iterator<Item = &DirectiveNode> {
        self.props.iter().filter_map(|prop| match prop {
            PropNode::Directive(dir) => Some(dir),
            PropNode::Attribute(_) => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeNode> {
        self.props.iter().filter_map(|prop| match prop {
            PropNode::Attribute(attr) => Some(attr),
            PropNode::Directive(_) => None,
        })
    }

    pub fn find_directive(&self, name: &str) -> Option<&DirectiveNode> {
        self.directives().find(|dir| dir.name == name)
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeNode> {
        self.attributes().find(|attr| attr.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum PropNode {
    Attribute(AttributeNode),
    Directive(DirectiveNode),
}

impl PropNode {
    pub fn loc(&self) -> Span {
        match self {
            Self::Attribute(attr) => attr.loc,
            Self::Directive(dir) => dir.loc,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeNode {
    pub name: CompactString,
    pub name_span: Span,
    pub value: Option<AttributeValue>,
    pub loc: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    pub content: String,
    /// Span without quotes.
    pub span: Span,
    /// Span including quotes when the value is quoted.
    pub quoted_span: Span,
}

/// A directive such as `v-bind:foo`, `:foo`, `@click.stop` or `#default="{ item }"`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectiveNode {
    /// Normalized name without the `v-` prefix (`bind`, `on`, `slot`, `model`, `show`, ...).
    pub name: CompactString,
    /// The attribute name as written.
    pub raw_name: CompactString,
    pub arg: Option<DirectiveArg>,
    pub exp: Option<Expression>,
    pub modifiers: Vec<CompactString>,
    pub loc: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveArg {
    pub content: CompactString,
    pub span: Span,
    /// `false` for `[dynamic]` arguments.
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextNode {
    pub content: String,
    pub loc: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    pub content: String,
    pub loc: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterpolationNode {
    pub content: Expression,
    pub loc: Span,
}

/// A `v-if` / `v-else-if` / `v-else` chain.
#[derive(Debug, Clone, Serialize)]
pub struct IfNode {
    pub branches: Vec<IfBranch>,
    pub loc: Span,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfBranch {
    /// `None` for `v-else`.
    pub condition: Option<Expression>,
    pub children: Vec<TemplateNode>,
    pub loc: Span,
}

/// An element carrying `v-for`.
#[derive(Debug, Clone, Serialize)]
pub struct ForNode {
    pub source: Expression,
    pub value: Option<Expression>,
    pub key: Option<Expression>,
    pub index: Option<Expression>,
    pub children: Vec<TemplateNode>,
    pub loc: Span,
}

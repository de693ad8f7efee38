//! Component file block descriptor.

use compact_str::CompactString;
use serde::Serialize;
use tessera_carton::Span;

use crate::ParseError;

/// Parsed result of a component file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SfcDescriptor {
    pub template: Option<SfcBlock>,
    /// Logic block without `setup`.
    pub script: Option<SfcBlock>,
    pub script_setup: Option<SfcBlock>,
    pub styles: Vec<SfcBlock>,
    pub custom_blocks: Vec<SfcBlock>,
    /// Duplicate or unclosed blocks. The first block of a kind wins.
    pub errors: Vec<ParseError>,
}

/// An attribute on a block's opening tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockAttr {
    pub name: CompactString,
    pub value: Option<CompactString>,
    pub name_span: Span,
    /// Span of the value without its quotes.
    pub value_span: Option<Span>,
}

/// One top-level block.
#[derive(Debug, Clone, Serialize)]
pub struct SfcBlock {
    /// Tag name (`template`, `script`, `style`, or a custom block name).
    pub block_type: CompactString,
    pub content: String,
    /// Span of the content in the whole file.
    pub loc: Span,
    pub attrs: Vec<BlockAttr>,
}

impl SfcBlock {
    pub fn attr(&self, name: &str) -> Option<&BlockAttr> {
        self.attrs.iter().find(|attr| attr.name == name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    fn attr_value(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(|attr| attr.value.as_deref())
    }

    pub fn lang(&self) -> Option<&str> {
        self.attr_value("lang")
    }

    pub fn src(&self) -> Option<&str> {
        self.attr_value("src").filter(|src| !src.is_empty())
    }

    pub fn is_setup(&self) -> bool {
        self.has_attr("setup")
    }

    pub fn is_scoped(&self) -> bool {
        self.has_attr("scoped")
    }

    /// The injected name of a CSS module block (`$style` when `module` has no value).
    pub fn module_name(&self) -> Option<&str> {
        let attr = self.attr("module")?;
        Some(attr.value.as_deref().filter(|v| !v.is_empty()).unwrap_or("$style"))
    }
}

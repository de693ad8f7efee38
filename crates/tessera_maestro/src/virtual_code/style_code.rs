//! Style virtual code generation.
//!
//! Style content is kept as is, with a single 1:1 mapping back to its block.

use compact_str::CompactString;
use tessera_armature::{find_class_names, ClassName};
use tessera_carton::Span;
use tessera_relief::SfcBlock;
use tower_lsp::lsp_types::Url;

use super::{virtual_uri, Mapping, MatchMode, SourceMap, VirtualDocument};

/// A `<style>` block as a standalone stylesheet.
#[derive(Debug, Clone)]
pub struct CssVirtualCode {
    pub document: VirtualDocument,
    pub source_map: SourceMap<()>,
    pub scoped: bool,
    /// Injected name for CSS module blocks.
    pub module: Option<CompactString>,
    /// Class selectors, with spans in component file offsets.
    pub class_names: Vec<ClassName>,
}

pub struct StyleCodeGenerator {
    index: usize,
}

impl StyleCodeGenerator {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Build `<base>.__VLS_style_<index>.<lang>`.
    pub fn generate(&self, base_uri: &Url, style: &SfcBlock) -> Option<CssVirtualCode> {
        let lang = style.lang().unwrap_or("css");
        let uri = virtual_uri(base_uri, &format!(".__VLS_style_{}.{}", self.index, lang))?;
        let content = style.content.as_str();
        let len = content.len();

        let mut source_map = SourceMap::new();
        if len > 0 {
            source_map.push(Mapping::new(
                (),
                MatchMode::Offset,
                Span::from_usize(0, len),
                Span::from_usize(0, len),
            ).offset_source(style.loc.start));
        }

        let class_names = find_class_names(content)
            .into_iter()
            .map(|class| ClassName {
                span: class.span.offset_by(style.loc.start),
                ..class
            })
            .collect();

        Some(CssVirtualCode {
            document: VirtualDocument::new(uri, lang, content.to_string()),
            source_map,
            scoped: style.is_scoped(),
            module: style.module_name().map(CompactString::from),
            class_names,
        })
    }
}

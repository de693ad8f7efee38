//! JSON virtual code for custom blocks such as `<i18n lang="json">`.

use tessera_carton::Span;
use tessera_relief::SfcBlock;
use tower_lsp::lsp_types::Url;

use super::{virtual_uri, Mapping, MatchMode, SourceMap, VirtualDocument};

/// A `json`/`jsonc` custom block as a standalone document.
#[derive(Debug, Clone)]
pub struct JsonVirtualCode {
    pub document: VirtualDocument,
    pub source_map: SourceMap<()>,
    /// Position among all custom blocks of the file.
    pub index: usize,
}

pub struct JsonCodeGenerator {
    index: usize,
}

impl JsonCodeGenerator {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Build `<base>.<index>.<lang>`. Other languages produce nothing.
    pub fn generate(&self, base_uri: &Url, block: &SfcBlock) -> Option<JsonVirtualCode> {
        let lang = block.lang().filter(|lang| matches!(*lang, "json" | "jsonc"))?;
        let uri = virtual_uri(base_uri, &format!(".{}.{}", self.index, lang))?;
        let len = block.content.len();

        let mut source_map = SourceMap::new();
        source_map.push(
            Mapping::new((), MatchMode::Offset, Span::from_usize(0, len), Span::from_usize(0, len))
                .offset_source(block.loc.start),
        );

        Some(JsonVirtualCode {
            document: VirtualDocument::new(uri, lang, block.content.clone()),
            source_map,
            index: self.index,
        })
    }
}

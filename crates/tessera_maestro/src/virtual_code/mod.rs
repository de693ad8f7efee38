//! Virtual code layer.
//!
//! A component file is turned into several virtual documents that an external analysis
//! backend or a markup/style sub-service can understand on their own:
//!
//! ```text
//! App.vue
//!     │
//!     ├─► App.vue.__VLS_script.ts     <script> + <script setup>, plus the options object
//!     ├─► App.vue.__VLS_template.ts   template expressions made type-checkable
//!     ├─► App.vue.template.css        inline `style="..."` attributes
//!     ├─► App.vue.template.html       the template content, for the markup service
//!     ├─► App.vue.__VLS_style_0.css   one per <style> block
//!     └─► App.vue.1.json              one per `json`/`jsonc` custom block
//! ```
//!
//! Whether a URI names a virtual document is decided by the build cache, which knows the
//! documents of every build it holds.
//!
//! Every virtual document comes with a [`SourceMap`] back to the component file. The two
//! TypeScript documents also carry a [`TeleportMap`].

mod generator;
mod json_code;
mod mapping_data;
mod script_code;
mod source_file;
mod source_map;
mod style_code;
mod teleport;
mod template_code;
mod template_visitor;

pub use generator::Generator;
pub use json_code::{JsonCodeGenerator, JsonVirtualCode};
pub use mapping_data::{Block, Capabilities, EditTransform, NameTransform, TsMappingData};
pub use script_code::{ScriptCodeGenerator, ScriptInput};
pub use source_file::{BlockDiagnostic, BuildOptions, SourceFile};
pub use source_map::{MappedRange, Mapping, MatchMode, RangePair, SourceMap};
pub use style_code::{CssVirtualCode, StyleCodeGenerator};
pub use teleport::{
    Teleport, TeleportCapabilities, TeleportDirection, TeleportMap, TeleportMappingData,
};
pub use template_code::{
    HtmlVirtualCode, TemplateCodeGenerator, TemplateInput, TemplateScriptData, TemplateVirtualCode,
};
pub use template_visitor::{TemplateVisitor, VisitorOutput};

use compact_str::CompactString;
use tower_lsp::lsp_types::Url;

/// A generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocument {
    pub uri: Url,
    pub language_id: CompactString,
    pub text: String,
}

impl VirtualDocument {
    pub fn new(uri: Url, language_id: impl Into<CompactString>, text: String) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            text,
        }
    }

    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A TypeScript virtual document with its maps.
#[derive(Debug, Clone)]
pub struct TsVirtualCode {
    pub document: VirtualDocument,
    pub source_map: SourceMap<TsMappingData>,
    pub teleports: TeleportMap,
}

/// `file:///a/App.vue` + `.__VLS_script.ts`.
pub fn virtual_uri(base: &Url, suffix: &str) -> Option<Url> {
    Url::parse(&format!("{}{}", base.as_str(), suffix)).ok()
}

/// Language id for a script `lang` attribute value.
pub fn script_language_id(lang: &str) -> &'static str {
    match lang {
        "ts" => "typescript",
        "tsx" => "typescriptreact",
        "jsx" => "javascriptreact",
        _ => "javascript",
    }
}

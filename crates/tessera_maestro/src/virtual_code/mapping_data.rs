//! Payloads carried by script and template source maps.

use bitflags::bitflags;
use tessera_carton::hyphenate;

/// The original block a mapping points back into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Template,
    Script,
    ScriptSetup,
    Style,
    /// The `src` attribute of `<script src>`.
    ScriptSrc,
}

impl Block {
    pub fn is_script(self) -> bool {
        matches!(self, Block::Script | Block::ScriptSetup)
    }
}

bitflags! {
    /// Which request kinds may use a mapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        /// Hover and other position-only features.
        const BASIC = 1 << 0;
        const REFERENCES = 1 << 1;
        const DEFINITIONS = 1 << 2;
        const DIAGNOSTIC = 1 << 3;
        const FORMATTING = 1 << 4;
        /// A rename may start here.
        const RENAME_IN = 1 << 5;
        /// A rename edit may land here.
        const RENAME_OUT = 1 << 6;
        const COMPLETION = 1 << 7;
        const SEMANTIC_TOKENS = 1 << 8;
        const FOLDING_RANGES = 1 << 9;
        const REFERENCES_CODE_LENS = 1 << 10;
        const DISPLAY_WITH_LINK = 1 << 11;

        const RENAME = Self::RENAME_IN.bits() | Self::RENAME_OUT.bits();
    }
}

impl Capabilities {
    /// Copied script code: everything.
    pub const SCRIPT: Self = Self::BASIC
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS)
        .union(Self::RENAME)
        .union(Self::DIAGNOSTIC)
        .union(Self::FORMATTING)
        .union(Self::COMPLETION)
        .union(Self::SEMANTIC_TOKENS)
        .union(Self::FOLDING_RANGES);

    /// Copied `<script setup>` code: everything except formatting and folding.
    pub const SCRIPT_SETUP: Self = Self::BASIC
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS)
        .union(Self::DIAGNOSTIC)
        .union(Self::RENAME)
        .union(Self::COMPLETION)
        .union(Self::SEMANTIC_TOKENS);

    /// Template expressions.
    pub const ALL: Self = Self::SCRIPT_SETUP;

    pub const NO_FORMATTING: Self = Self::SCRIPT_SETUP;

    pub const DIAGNOSTIC_ONLY: Self = Self::DIAGNOSTIC.union(Self::COMPLETION);

    pub const HTML_TAG_OR_ATTR: Self = Self::BASIC
        .union(Self::DIAGNOSTIC)
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS)
        .union(Self::RENAME);

    pub const CLASS_NAME: Self = Self::BASIC
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS)
        .union(Self::RENAME);

    pub const SLOT_NAME: Self = Self::BASIC
        .union(Self::DIAGNOSTIC)
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS);

    pub const SLOT_NAME_EXPORT: Self = Self::SLOT_NAME.union(Self::REFERENCES_CODE_LENS);

    pub const PROP_RAW: Self = Self::REFERENCES
        .union(Self::DEFINITIONS)
        .union(Self::RENAME);

    pub const REFERENCES_ONLY: Self = Self::REFERENCES.union(Self::DEFINITIONS);

    /// Style class properties declared in the template header.
    pub const STYLE_CLASS: Self = Self::BASIC
        .union(Self::REFERENCES)
        .union(Self::DEFINITIONS)
        .union(Self::RENAME)
        .union(Self::DIAGNOSTIC)
        .union(Self::COMPLETION);

    /// Options object entries in the script document.
    pub const OPTIONS: Self = Self::REFERENCES
        .union(Self::DEFINITIONS)
        .union(Self::RENAME);
}

/// Rewrites the new name before the backend sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTransform {
    StripDollarPrefix,
    AddDollarPrefix,
}

impl NameTransform {
    pub fn apply(self, name: &str) -> String {
        match self {
            NameTransform::StripDollarPrefix => name.strip_prefix('$').unwrap_or(name).to_string(),
            NameTransform::AddDollarPrefix => format!("${name}"),
        }
    }
}

/// Rewrites an edit's text when it is mapped back to the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTransform {
    /// If the original spelling is kebab-case, hyphenate the new name too.
    KeepHyphenation,
}

impl EditTransform {
    /// `old_text` is the original spelling at the edited range.
    pub fn apply(self, old_text: &str, new_text: &str) -> String {
        match self {
            EditTransform::KeepHyphenation => {
                if hyphenate(old_text) == old_text {
                    hyphenate(new_text)
                } else {
                    new_text.to_string()
                }
            }
        }
    }
}

/// Payload of script and template source maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsMappingData {
    pub block: Block,
    pub capabilities: Capabilities,
    pub before_rename: Option<NameTransform>,
    pub do_rename: Option<EditTransform>,
}

impl TsMappingData {
    pub const fn new(block: Block, capabilities: Capabilities) -> Self {
        Self {
            block,
            capabilities,
            before_rename: None,
            do_rename: None,
        }
    }

    pub const fn with_before_rename(mut self, transform: NameTransform) -> Self {
        self.before_rename = Some(transform);
        self
    }

    pub const fn with_do_rename(mut self, transform: EditTransform) -> Self {
        self.do_rename = Some(transform);
        self
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}

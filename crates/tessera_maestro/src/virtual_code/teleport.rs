//! Same-document links between two spellings of one symbol.
//!
//! A teleport map lives inside one virtual document. It lets the resolution engine hop
//! from, say, the `count` key of the generated return object to the `count` declaration
//! it was copied from, without asking the backend again.

use bitflags::bitflags;
use tessera_carton::Span;

use super::{Block, Mapping, NameTransform, SourceMap};

/// Which request origins may follow an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeleportDirection {
    /// Both ends trigger each other.
    Sibling,
    /// Source to target only for requests that started in a logic block, target to
    /// source only for requests that started in the template.
    ScriptToTemplate,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TeleportCapabilities: u8 {
        const REFERENCES = 1 << 0;
        const DEFINITIONS = 1 << 1;
        const RENAME = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportMappingData {
    pub direction: TeleportDirection,
    pub capabilities: TeleportCapabilities,
    /// An extra reference site rather than the primary link.
    pub is_additional_reference: bool,
    pub edit_rename_text_to_target: Option<NameTransform>,
    pub edit_rename_text_to_source: Option<NameTransform>,
}

impl TeleportMappingData {
    pub const fn new(direction: TeleportDirection, capabilities: TeleportCapabilities) -> Self {
        Self {
            direction,
            capabilities,
            is_additional_reference: false,
            edit_rename_text_to_target: None,
            edit_rename_text_to_source: None,
        }
    }

    pub const fn additional_reference(mut self) -> Self {
        self.is_additional_reference = true;
        self
    }

    pub const fn with_rename_transforms(
        mut self,
        to_target: NameTransform,
        to_source: NameTransform,
    ) -> Self {
        self.edit_rename_text_to_target = Some(to_target);
        self.edit_rename_text_to_source = Some(to_source);
        self
    }

    fn allows_forward(&self, origin: Block) -> bool {
        match self.direction {
            TeleportDirection::Sibling => true,
            TeleportDirection::ScriptToTemplate => origin.is_script(),
        }
    }

    fn allows_backward(&self, origin: Block) -> bool {
        match self.direction {
            TeleportDirection::Sibling => true,
            TeleportDirection::ScriptToTemplate => origin == Block::Template,
        }
    }
}

/// A reachable teleport end.
#[derive(Debug, Clone, Copy)]
pub struct Teleport<'a> {
    pub range: Span,
    pub data: &'a TeleportMappingData,
    /// Applied to a rename's new text when it crosses this edge.
    pub edit_rename_text: Option<NameTransform>,
}

impl Teleport<'_> {
    pub fn rename_text(&self, new_name: &str) -> String {
        match self.edit_rename_text {
            Some(transform) => transform.apply(new_name),
            None => new_name.to_string(),
        }
    }
}

/// A [`SourceMap`] whose source and target are the same document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeleportMap {
    map: SourceMap<TeleportMappingData>,
}

impl TeleportMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mappings(mappings: Vec<Mapping<TeleportMappingData>>) -> Self {
        Self {
            map: SourceMap::from_mappings(mappings),
        }
    }

    pub fn push(&mut self, mapping: Mapping<TeleportMappingData>) {
        self.map.push(mapping);
    }

    pub fn source_map(&self) -> &SourceMap<TeleportMappingData> {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Every teleport end reachable from `range` for a request that started in `origin`.
    ///
    /// Forward hops come first, then backward ones. The caller filters by the capability
    /// of its own request kind.
    pub fn find_teleports(&self, range: Span, origin: Block) -> Vec<Teleport<'_>> {
        let forward = self
            .map
            .all_to_targets(range)
            .into_iter()
            .filter(|hit| hit.data.allows_forward(origin))
            .map(|hit| Teleport {
                range: hit.range,
                data: hit.data,
                edit_rename_text: hit.data.edit_rename_text_to_target,
            });
        let backward = self
            .map
            .all_to_sources(range)
            .into_iter()
            .filter(|hit| hit.data.allows_backward(origin))
            .map(|hit| Teleport {
                range: hit.range,
                data: hit.data,
                edit_rename_text: hit.data.edit_rename_text_to_source,
            });
        forward.chain(backward).collect()
    }
}

//! Cross-reference resolution over source maps and teleports.
//!
//! A request is mapped from the original file into every TypeScript virtual document,
//! sent to the backend, and widened by following teleports. The widening uses an explicit
//! work-list. The visited set holds every location the backend returned, so a teleport
//! cycle ends once both of its ends are known.

use std::collections::VecDeque;

use tessera_carton::{FxHashSet, Span};
use tower_lsp::lsp_types::{Location, Url};

use super::{IdeContext, MappedLocation};
use crate::backend::{BackendResult, VirtualLocation, WorkspaceChanges};
use crate::error::BackendError;
use crate::virtual_code::{Block, Capabilities, SourceFile, TeleportCapabilities, TsMappingData};

/// A request kind that yields locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationRequest {
    References,
    Definition,
    TypeDefinition,
}

impl LocationRequest {
    pub fn capability(self) -> Capabilities {
        match self {
            LocationRequest::References => Capabilities::REFERENCES,
            LocationRequest::Definition | LocationRequest::TypeDefinition => {
                Capabilities::DEFINITIONS
            }
        }
    }

    fn teleport_capability(self) -> TeleportCapabilities {
        match self {
            LocationRequest::References => TeleportCapabilities::REFERENCES,
            LocationRequest::Definition | LocationRequest::TypeDefinition => {
                TeleportCapabilities::DEFINITIONS
            }
        }
    }

    async fn query(
        self,
        ctx: &IdeContext<'_>,
        uri: &Url,
        offset: u32,
    ) -> BackendResult<Vec<VirtualLocation>> {
        match self {
            LocationRequest::References => ctx.backend.find_references(uri, offset, ctx.cancel).await,
            LocationRequest::Definition => ctx.backend.find_definition(uri, offset, ctx.cancel).await,
            LocationRequest::TypeDefinition => {
                ctx.backend.find_type_definition(uri, offset, ctx.cancel).await
            }
        }
    }
}

/// A position inside a virtual document where a request starts.
#[derive(Debug, Clone)]
pub(crate) struct StartPoint {
    pub uri: Url,
    pub offset: u32,
    pub data: TsMappingData,
}

/// Every TypeScript virtual position `offset` maps to through a mapping with `capability`.
pub(crate) fn start_points(file: &SourceFile, offset: u32, capability: Capabilities) -> Vec<StartPoint> {
    file.ts_codes()
        .flat_map(|code| {
            code.source_map
                .all_to_targets(Span::empty(offset))
                .into_iter()
                .filter(|hit| hit.data.has(capability))
                .map(|hit| StartPoint {
                    uri: code.document.uri.clone(),
                    offset: hit.range.start,
                    data: *hit.data,
                })
        })
        .collect()
}

#[derive(Debug)]
struct Query {
    uri: Url,
    offset: u32,
    new_name: String,
}

/// Work-list state shared by every start point of one request.
pub(crate) struct Resolver<'c, 'a> {
    ctx: &'c IdeContext<'a>,
    visited: FxHashSet<VirtualLocation>,
}

impl<'c, 'a> Resolver<'c, 'a> {
    pub fn new(ctx: &'c IdeContext<'a>) -> Self {
        Self {
            ctx,
            visited: FxHashSet::default(),
        }
    }

    /// Run a location request from one virtual position. Returns `None` once cancelled.
    pub async fn locations(
        &mut self,
        request: LocationRequest,
        uri: Url,
        offset: u32,
        origin: Block,
    ) -> Option<Vec<VirtualLocation>> {
        let mut found = Vec::new();
        let mut queue = VecDeque::from([Query {
            uri,
            offset,
            new_name: String::new(),
        }]);

        while let Some(query) = queue.pop_front() {
            if self.ctx.cancel.is_cancelled() {
                return None;
            }
            let hits = match request.query(self.ctx, &query.uri, query.offset).await {
                Ok(hits) => hits,
                Err(BackendError::Cancelled) => return None,
                Err(err) => {
                    tracing::warn!("{:?} at {}:{} failed: {}", request, query.uri, query.offset, err);
                    continue;
                }
            };

            for hit in hits {
                if !self.visited.insert(hit.clone()) {
                    continue;
                }
                for (range, _) in self.teleports(&hit, origin, request.teleport_capability()) {
                    let target = VirtualLocation::new(hit.uri.clone(), range);
                    if !self.visited.contains(&target) {
                        queue.push_back(Query {
                            uri: hit.uri.clone(),
                            offset: range.start,
                            new_name: String::new(),
                        });
                    }
                }
                found.push(hit);
            }
        }

        Some(found)
    }

    /// Run a rename from one virtual position. Every edit the backend returns is kept
    /// once; teleports re-enter the backend with their rewritten name.
    pub async fn rename(
        &mut self,
        uri: Url,
        offset: u32,
        new_name: String,
        origin: Block,
    ) -> Option<Vec<(VirtualLocation, String)>> {
        let mut edits = Vec::new();
        let mut queue = VecDeque::from([Query {
            uri,
            offset,
            new_name,
        }]);

        while let Some(query) = queue.pop_front() {
            if self.ctx.cancel.is_cancelled() {
                return None;
            }
            let changes: WorkspaceChanges = match self
                .ctx
                .backend
                .rename(&query.uri, query.offset, &query.new_name, self.ctx.cancel)
                .await
            {
                Ok(changes) => changes,
                Err(BackendError::Cancelled) => return None,
                Err(err) => {
                    tracing::warn!("rename at {}:{} failed: {}", query.uri, query.offset, err);
                    continue;
                }
            };

            let mut changes: Vec<_> = changes.into_iter().collect();
            changes.sort_by(|a, b| a.0.cmp(&b.0));
            for (change_uri, text_changes) in changes {
                for change in text_changes {
                    let location = VirtualLocation::new(change_uri.clone(), change.range);
                    if !self.visited.insert(location.clone()) {
                        continue;
                    }
                    for (range, transform) in
                        self.teleports(&location, origin, TeleportCapabilities::RENAME)
                    {
                        let target = VirtualLocation::new(change_uri.clone(), range);
                        if !self.visited.contains(&target) {
                            let new_name = match transform {
                                Some(transform) => transform.apply(&query.new_name),
                                None => query.new_name.clone(),
                            };
                            queue.push_back(Query {
                                uri: change_uri.clone(),
                                offset: range.start,
                                new_name,
                            });
                        }
                    }
                    edits.push((location, change.new_text));
                }
            }
        }

        Some(edits)
    }

    /// Teleport ends reachable from `location` that allow `capability`.
    fn teleports(
        &self,
        location: &VirtualLocation,
        origin: Block,
        capability: TeleportCapabilities,
    ) -> Vec<(Span, Option<crate::virtual_code::NameTransform>)> {
        let Some(file) = self.ctx.cache.get_by_virtual_uri(&location.uri) else {
            return Vec::new();
        };
        let Some(code) = file.ts_code(&location.uri) else {
            return Vec::new();
        };
        code.teleports
            .find_teleports(location.range, origin)
            .into_iter()
            .filter(|teleport| teleport.data.capabilities.contains(capability))
            .map(|teleport| (teleport.range, teleport.edit_rename_text))
            .collect()
    }
}

/// Map virtual locations back, dedupe by `(uri, range)` and convert to LSP locations.
pub(crate) async fn to_lsp_locations(
    ctx: &IdeContext<'_>,
    locations: impl IntoIterator<Item = MappedLocation>,
) -> Vec<Location> {
    let mut seen = FxHashSet::default();
    let mut result = Vec::new();
    for location in locations {
        if !seen.insert((location.uri.clone(), location.range)) {
            continue;
        }
        if let Some(lsp) = ctx.to_lsp_location(&location.uri, location.range).await {
            result.push(lsp);
        }
    }
    result
}

/// The TypeScript half of references and definition requests.
pub(crate) async fn resolve_locations(
    ctx: &IdeContext<'_>,
    request: LocationRequest,
    uri: &Url,
    position: tower_lsp::lsp_types::Position,
) -> Vec<MappedLocation> {
    let capability = request.capability();

    if let Some(file) = ctx.source_file(uri) {
        let Some(offset) = ctx.offset_at(uri, position) else {
            return Vec::new();
        };
        let mut resolver = Resolver::new(ctx);
        let mut mapped = Vec::new();
        for start in start_points(&file, offset, capability) {
            let Some(found) = resolver
                .locations(request, start.uri, start.offset, start.data.block)
                .await
            else {
                return Vec::new();
            };
            mapped.extend(found.iter().flat_map(|location| ctx.map_back(location, capability)));
        }
        return mapped;
    }

    // A plain script file: start right there and keep what lands in component files.
    let Some(offset) = ctx.offset_in_any(uri, position).await else {
        return Vec::new();
    };
    let Some(found) = Resolver::new(ctx)
        .locations(request, uri.clone(), offset, Block::Script)
        .await
    else {
        return Vec::new();
    };
    found
        .iter()
        .flat_map(|location| ctx.map_back(location, capability))
        .filter(|location| location.data.is_some())
        .collect()
}

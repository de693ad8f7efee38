//! Go to definition and go to type definition.

use tessera_carton::Span;
use tower_lsp::lsp_types::{Location, Position, Url};

use super::resolve::{resolve_locations, to_lsp_locations, LocationRequest};
use super::{IdeContext, MappedLocation};
use crate::backend::VirtualLocation;

pub struct DefinitionService;

impl DefinitionService {
    pub async fn definitions(ctx: &IdeContext<'_>, uri: &Url, position: Position) -> Vec<Location> {
        tracing::debug!("definition at {}:{:?}", uri, position);
        let mut mapped = resolve_locations(ctx, LocationRequest::Definition, uri, position).await;
        if ctx.cancel.is_cancelled() {
            return Vec::new();
        }
        mapped.extend(Self::css_definitions(ctx, uri, position));
        to_lsp_locations(ctx, mapped).await
    }

    /// Type definitions have no stylesheet counterpart.
    pub async fn type_definitions(
        ctx: &IdeContext<'_>,
        uri: &Url,
        position: Position,
    ) -> Vec<Location> {
        tracing::debug!("type definition at {}:{:?}", uri, position);
        let mapped = resolve_locations(ctx, LocationRequest::TypeDefinition, uri, position).await;
        if ctx.cancel.is_cancelled() {
            return Vec::new();
        }
        to_lsp_locations(ctx, mapped).await
    }

    fn css_definitions(ctx: &IdeContext<'_>, uri: &Url, position: Position) -> Vec<MappedLocation> {
        let (Some(css), Some(file)) = (ctx.css, ctx.source_file(uri)) else {
            return Vec::new();
        };
        let Some(offset) = ctx.offset_at(uri, position) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for code in file.css_codes() {
            if !css.supports(&code.document.language_id) {
                continue;
            }
            for hit in code.source_map.all_to_targets(Span::empty(offset)) {
                let definition = match css.find_definition(&code.document, hit.range.start) {
                    Ok(Some(definition)) => definition,
                    Ok(None) => continue,
                    Err(err) => {
                        tracing::warn!("style definition in {} failed: {}", code.document.uri, err);
                        continue;
                    }
                };
                result.extend(Self::map_css_location(ctx, &file, definition));
            }
        }
        result
    }

    /// A stylesheet location may point into any style document of the same file.
    fn map_css_location(
        ctx: &IdeContext<'_>,
        file: &crate::virtual_code::SourceFile,
        location: VirtualLocation,
    ) -> Option<MappedLocation> {
        match file.css_code(&location.uri) {
            Some(code) => code
                .source_map
                .to_source(location.range)
                .map(|source| MappedLocation {
                    uri: file.uri.clone(),
                    range: source.range,
                    data: None,
                }),
            None if ctx.cache.owner_of(&location.uri).is_some() => None,
            None => ctx
                .map_back(&location, crate::virtual_code::Capabilities::empty())
                .into_iter()
                .next(),
        }
    }
}

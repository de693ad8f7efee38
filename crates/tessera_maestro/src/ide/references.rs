//! Find references.
//!
//! Script bindings are resolved through the backend and the teleports of each virtual
//! document. Class selectors additionally go through the style service.

use tessera_carton::Span;
use tower_lsp::lsp_types::{Location, Position, Url};

use super::resolve::{resolve_locations, to_lsp_locations, LocationRequest};
use super::{IdeContext, MappedLocation};

pub struct ReferencesService;

impl ReferencesService {
    pub async fn references(ctx: &IdeContext<'_>, uri: &Url, position: Position) -> Vec<Location> {
        tracing::debug!("references at {}:{:?}", uri, position);
        let mut mapped = resolve_locations(ctx, LocationRequest::References, uri, position).await;
        if ctx.cancel.is_cancelled() {
            return Vec::new();
        }
        mapped.extend(Self::css_references(ctx, uri, position));
        to_lsp_locations(ctx, mapped).await
    }

    fn css_references(ctx: &IdeContext<'_>, uri: &Url, position: Position) -> Vec<MappedLocation> {
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
                let references = match css.find_references(&code.document, hit.range.start) {
                    Ok(references) => references,
                    Err(err) => {
                        tracing::warn!("style references in {} failed: {}", code.document.uri, err);
                        continue;
                    }
                };
                result.extend(
                    references
                        .into_iter()
                        .filter(|reference| reference.uri == code.document.uri)
                        .filter_map(|reference| code.source_map.to_source(reference.range))
                        .map(|source| MappedLocation {
                            uri: file.uri.clone(),
                            range: source.range,
                            data: None,
                        }),
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CancellationToken;
    use crate::ide::test_support::*;

    const APP: &str = r#"<template>
  <p @click="count++">{{ count }}</p>
</template>
<script setup>
const count = ref(0)
</script>
"#;

    fn position_of(service: &crate::LanguageService, uri: &Url, needle: &str, nth: usize) -> Position {
        let offset = APP.match_indices(needle).nth(nth).unwrap().0 as u32;
        service.documents().get(uri).unwrap().position_at(offset).unwrap()
    }

    #[tokio::test]
    async fn test_references_cover_script_and_template() {
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, APP);

        let cancel = CancellationToken::new();
        let position = position_of(&service, &uri, "count", 2);
        let locations = service.references(&uri, position, &cancel).await;

        let mut offsets: Vec<u32> = locations
            .iter()
            .map(|location| {
                assert_eq!(location.uri, uri);
                service.documents().get(&uri).unwrap().offset_at(location.range.start).unwrap()
            })
            .collect();
        offsets.sort();
        let expected: Vec<u32> = APP.match_indices("count").map(|(i, _)| i as u32).collect();
        assert_eq!(offsets, expected);
    }

    #[tokio::test]
    async fn test_cancelled_references_are_empty() {
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, APP);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let position = position_of(&service, &uri, "count", 0);
        assert!(service.references(&uri, position, &cancel).await.is_empty());
    }
}

//! Markup features delegated to the markup service on the template HTML document.

use tessera_carton::Span;
use tower_lsp::lsp_types::{LinkedEditingRanges, Position, Url};

use super::IdeContext;

pub struct HtmlFeatureService;

impl HtmlFeatureService {
    /// Ranges that change together with the tag name under the cursor.
    pub fn linked_editing_ranges(
        ctx: &IdeContext<'_>,
        uri: &Url,
        position: Position,
    ) -> Option<LinkedEditingRanges> {
        let html = ctx.html?;
        let file = ctx.source_file(uri)?;
        let code = file.template_html.as_ref()?;
        let offset = ctx.offset_at(uri, position)?;
        let target = code.source_map.to_target(Span::empty(offset))?;

        let spans = match html.find_linked_editing_ranges(&code.document, target.range.start) {
            Ok(spans) => spans?,
            Err(err) => {
                tracing::warn!("linked editing in {} failed: {}", code.document.uri, err);
                return None;
            }
        };
        let ranges: Vec<_> = spans
            .into_iter()
            .filter_map(|span| code.source_map.to_source(span))
            .filter_map(|source| ctx.range_in(uri, source.range))
            .collect();

        (!ranges.is_empty()).then_some(LinkedEditingRanges {
            ranges,
            word_pattern: None,
        })
    }

    /// Closing tag text to insert after `>` was typed.
    pub fn auto_close_tag(ctx: &IdeContext<'_>, uri: &Url, position: Position) -> Option<String> {
        let html = ctx.html?;
        let file = ctx.source_file(uri)?;
        let code = file.template_html.as_ref()?;
        let offset = ctx.offset_at(uri, position)?;
        let target = code.source_map.to_target(Span::empty(offset))?;

        match html.do_tag_complete(&code.document, target.range.start) {
            Ok(snippet) => snippet,
            Err(err) => {
                tracing::warn!("tag completion in {} failed: {}", code.document.uri, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::{BackendResult, HtmlService, WorkspaceChanges};
    use crate::ide::test_support::*;
    use crate::virtual_code::VirtualDocument;

    /// Links the tag name under the cursor with the closing tag of the same name.
    struct TagPairs;

    impl HtmlService for TagPairs {
        fn do_rename(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
            _new_name: &str,
        ) -> BackendResult<WorkspaceChanges> {
            Ok(WorkspaceChanges::default())
        }

        fn find_linked_editing_ranges(
            &self,
            document: &VirtualDocument,
            offset: u32,
        ) -> BackendResult<Option<Vec<Span>>> {
            let Some(word) = word_at(&document.text, offset) else {
                return Ok(None);
            };
            let name = word.text(&document.text);
            let close = format!("</{name}>");
            Ok(document.text.find(&close).map(|start| {
                let start = start as u32 + 2;
                vec![word, Span::new(start, start + name.len() as u32)]
            }))
        }

        fn do_tag_complete(
            &self,
            document: &VirtualDocument,
            offset: u32,
        ) -> BackendResult<Option<String>> {
            let before = &document.text[..offset as usize];
            Ok(before
                .rfind('<')
                .and_then(|open| word_at(before, open as u32 + 1))
                .map(|name| format!("$0</{}>", name.text(before))))
        }
    }

    const APP: &str = "<template>\n  <section>hi</section>\n</template>\n";

    fn position(service: &crate::LanguageService, uri: &Url, offset: u32) -> Position {
        service.documents().get(uri).unwrap().position_at(offset).unwrap()
    }

    #[test]
    fn test_linked_editing_ranges() {
        let (backend, service) = service_with(FakeBackend::default());
        let service = service.with_html_service(Arc::new(TagPairs));
        let uri = open_component(&backend, &service, APP);

        let open = APP.find("section").unwrap() as u32;
        let ranges = service
            .linked_editing_ranges(&uri, position(&service, &uri, open + 2))
            .unwrap();
        let close = APP.rfind("section").unwrap() as u32;
        let doc = service.documents().get(&uri).unwrap();
        assert_eq!(
            ranges.ranges,
            vec![
                doc.range_of(Span::new(open, open + 7)).unwrap(),
                doc.range_of(Span::new(close, close + 7)).unwrap(),
            ]
        );
    }

    #[test]
    fn test_auto_close_tag() {
        let source = "<template>\n  <div>\n</template>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let service = service.with_html_service(Arc::new(TagPairs));
        let uri = open_component(&backend, &service, source);

        let after = source.find("<div>").unwrap() as u32 + 5;
        assert_eq!(
            service.auto_close_tag(&uri, position(&service, &uri, after)),
            Some("$0</div>".to_string())
        );
    }

    #[test]
    fn test_outside_template_is_none() {
        let (backend, service) = service_with(FakeBackend::default());
        let service = service.with_html_service(Arc::new(TagPairs));
        let uri = open_component(&backend, &service, APP);
        assert!(service
            .linked_editing_ranges(&uri, position(&service, &uri, 1))
            .is_none());
    }
}

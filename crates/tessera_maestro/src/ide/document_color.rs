//! Color swatches from style blocks and inline `style` attributes.

use tower_lsp::lsp_types::{ColorInformation, Url};

use super::IdeContext;

pub struct DocumentColorService;

impl DocumentColorService {
    pub fn document_colors(ctx: &IdeContext<'_>, uri: &Url) -> Vec<ColorInformation> {
        let (Some(css), Some(file)) = (ctx.css, ctx.source_file(uri)) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for code in file.css_codes() {
            if !css.supports(&code.document.language_id) {
                continue;
            }
            let colors = match css.find_document_colors(&code.document) {
                Ok(colors) => colors,
                Err(err) => {
                    tracing::warn!("document colors for {} failed: {}", code.document.uri, err);
                    continue;
                }
            };
            for color in colors {
                let range = code
                    .source_map
                    .to_source(color.range)
                    .and_then(|source| ctx.range_in(uri, source.range));
                if let Some(range) = range {
                    result.push(ColorInformation {
                        range,
                        color: color.color,
                    });
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_carton::Span;
    use tower_lsp::lsp_types::Color;

    use super::*;
    use crate::backend::{BackendResult, ColorSpan, CssService, VirtualLocation, WorkspaceChanges};
    use crate::ide::test_support::*;
    use crate::virtual_code::VirtualDocument;

    /// Reports every `red` as a color.
    struct RedFinder;

    impl CssService for RedFinder {
        fn find_definition(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
        ) -> BackendResult<Option<VirtualLocation>> {
            Ok(None)
        }

        fn find_references(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
        ) -> BackendResult<Vec<VirtualLocation>> {
            Ok(Vec::new())
        }

        fn do_rename(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
            _new_name: &str,
        ) -> BackendResult<WorkspaceChanges> {
            Ok(WorkspaceChanges::default())
        }

        fn find_document_colors(&self, document: &VirtualDocument) -> BackendResult<Vec<ColorSpan>> {
            Ok(occurrences(&document.text, "red")
                .into_iter()
                .map(|range| ColorSpan {
                    range,
                    color: Color {
                        red: 1.0,
                        green: 0.0,
                        blue: 0.0,
                        alpha: 1.0,
                    },
                })
                .collect())
        }
    }

    #[test]
    fn test_colors_from_blocks_and_inline_styles() {
        let source = "<template>\n  <p style=\"color: red\">hi</p>\n</template>\n<style>\n.a { color: red }\n</style>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let service = service.with_css_service(Arc::new(RedFinder));
        let uri = open_component(&backend, &service, source);

        let colors = service.document_colors(&uri);
        let doc = service.documents().get(&uri).unwrap();
        let mut offsets: Vec<u32> = colors
            .iter()
            .map(|color| doc.span_of(color.range).unwrap())
            .map(|span: Span| {
                assert_eq!(span.len(), 3);
                span.start
            })
            .collect();
        offsets.sort();
        let expected: Vec<u32> = source.match_indices("red").map(|(i, _)| i as u32).collect();
        assert_eq!(offsets, expected);
    }

    #[test]
    fn test_no_css_service_no_colors() {
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, "<style>\n.a { color: red }\n</style>\n");
        assert!(service.document_colors(&uri).is_empty());
    }
}

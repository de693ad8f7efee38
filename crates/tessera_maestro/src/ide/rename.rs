//! Rename across script, template and style.
//!
//! The backend result wins when it produced any edit. Otherwise the markup service
//! is asked on the template HTML document, and then the style service on every style
//! document.

use std::collections::HashMap;

use tessera_carton::{FxHashSet, Span};
use tower_lsp::lsp_types::{Position, TextEdit, Url, WorkspaceEdit};

use super::resolve::{start_points, Resolver};
use super::{IdeContext, MappedLocation};
use crate::backend::{TextChange, WorkspaceChanges};
use crate::utils::span_to_range_str;
use crate::virtual_code::{Capabilities, SourceFile, SourceMap, VirtualDocument};

/// Edits per file in arrival order. A second edit on the same range is dropped.
#[derive(Debug, Default)]
struct EditSet {
    files: Vec<(Url, Vec<TextChange>)>,
    seen: FxHashSet<(Url, Span)>,
}

impl EditSet {
    fn push(&mut self, uri: &Url, change: TextChange) {
        if !self.seen.insert((uri.clone(), change.range)) {
            return;
        }
        match self.files.iter_mut().find(|(file, _)| file == uri) {
            Some((_, changes)) => changes.push(change),
            None => self.files.push((uri.clone(), vec![change])),
        }
    }

    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub struct RenameService;

impl RenameService {
    pub async fn rename(
        ctx: &IdeContext<'_>,
        uri: &Url,
        position: Position,
        new_name: &str,
    ) -> Option<WorkspaceEdit> {
        tracing::debug!("rename at {}:{:?} to {}", uri, position, new_name);
        let file = ctx.source_file(uri)?;
        let offset = ctx.offset_at(uri, position)?;

        let mut edits = Self::ts_edits(ctx, &file, offset, new_name).await;
        if ctx.cancel.is_cancelled() {
            return None;
        }
        if edits.is_empty() {
            edits = Self::html_edits(ctx, &file, offset, new_name);
        }
        if edits.is_empty() {
            edits = Self::css_edits(ctx, &file, offset, new_name);
        }
        if edits.is_empty() {
            return None;
        }
        Some(Self::to_workspace_edit(ctx, edits).await)
    }

    async fn ts_edits(ctx: &IdeContext<'_>, file: &SourceFile, offset: u32, new_name: &str) -> EditSet {
        let mut resolver = Resolver::new(ctx);
        let mut edits = EditSet::default();

        for start in start_points(file, offset, Capabilities::RENAME_IN) {
            let name = match start.data.before_rename {
                Some(transform) => transform.apply(new_name),
                None => new_name.to_string(),
            };
            let Some(virtual_edits) = resolver
                .rename(start.uri, start.offset, name, start.data.block)
                .await
            else {
                return EditSet::default();
            };

            for (location, new_text) in virtual_edits {
                for mapped in ctx.map_back(&location, Capabilities::RENAME_OUT) {
                    if let Some(text) = Self::edit_text(ctx, &mapped, &new_text) {
                        edits.push(&mapped.uri, TextChange::new(mapped.range, text));
                    }
                }
            }
        }
        edits
    }

    /// Text of an edit landing on `mapped`, or `None` when its transform has no original
    /// spelling to compare against.
    fn edit_text(ctx: &IdeContext<'_>, mapped: &MappedLocation, new_text: &str) -> Option<String> {
        let Some(transform) = mapped.data.and_then(|data| data.do_rename) else {
            return Some(new_text.to_string());
        };
        let Some(owner) = ctx.cache.get(&mapped.uri) else {
            tracing::warn!("no build of {} to rename against, skipping edit", mapped.uri);
            return None;
        };
        Some(transform.apply(mapped.range.text(&owner.text), new_text))
    }

    fn html_edits(ctx: &IdeContext<'_>, file: &SourceFile, offset: u32, new_name: &str) -> EditSet {
        let mut edits = EditSet::default();
        let (Some(html), Some(code)) = (ctx.html, file.template_html.as_ref()) else {
            return edits;
        };
        for hit in code.source_map.all_to_targets(Span::empty(offset)) {
            match html.do_rename(&code.document, hit.range.start, new_name) {
                Ok(changes) => {
                    map_embedded_changes(&file.uri, &code.document, &code.source_map, changes, &mut edits)
                }
                Err(err) => tracing::warn!("markup rename in {} failed: {}", code.document.uri, err),
            }
        }
        edits
    }

    fn css_edits(ctx: &IdeContext<'_>, file: &SourceFile, offset: u32, new_name: &str) -> EditSet {
        let mut edits = EditSet::default();
        let Some(css) = ctx.css else {
            return edits;
        };
        for code in file.css_codes() {
            if !css.supports(&code.document.language_id) {
                continue;
            }
            for hit in code.source_map.all_to_targets(Span::empty(offset)) {
                match css.do_rename(&code.document, hit.range.start, new_name) {
                    Ok(changes) => map_embedded_changes(
                        &file.uri,
                        &code.document,
                        &code.source_map,
                        changes,
                        &mut edits,
                    ),
                    Err(err) => {
                        tracing::warn!("style rename in {} failed: {}", code.document.uri, err)
                    }
                }
            }
        }
        edits
    }

    async fn to_workspace_edit(ctx: &IdeContext<'_>, edits: EditSet) -> WorkspaceEdit {
        let mut changes = HashMap::new();
        for (uri, file_changes) in edits.files {
            let mut text_edits = Vec::with_capacity(file_changes.len());
            let fallback_text = if ctx.documents.contains(&uri) {
                None
            } else {
                ctx.backend.text_document(&uri).await
            };
            for change in file_changes {
                let range = match &fallback_text {
                    Some(text) => span_to_range_str(text, change.range),
                    None => ctx.range_in(&uri, change.range),
                };
                if let Some(range) = range {
                    text_edits.push(TextEdit::new(range, change.new_text));
                }
            }
            changes.insert(uri, text_edits);
        }
        WorkspaceEdit::new(changes)
    }
}

/// Map edits of an embedded document back to its component file.
fn map_embedded_changes(
    file_uri: &Url,
    document: &VirtualDocument,
    source_map: &SourceMap<()>,
    changes: WorkspaceChanges,
    edits: &mut EditSet,
) {
    let Some(changes) = changes.get(&document.uri) else {
        return;
    };
    for change in changes {
        if let Some(source) = source_map.to_source(change.range) {
            edits.push(file_uri, TextChange::new(source.range, change.new_text.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendResult, CancellationToken, ColorSpan, CssService, HtmlService, VirtualLocation,
    };
    use crate::ide::test_support::*;
    use crate::virtual_code::{Block, EditTransform, TsMappingData};
    use std::sync::Arc;

    /// Renames every whole-word occurrence of the word under the cursor.
    struct WordRename;

    impl WordRename {
        fn changes(document: &VirtualDocument, offset: u32, new_name: &str) -> WorkspaceChanges {
            let mut changes = WorkspaceChanges::default();
            if let Some(word) = word_at(&document.text, offset) {
                let word = word.text(&document.text).trim_start_matches('.');
                changes.insert(
                    document.uri.clone(),
                    occurrences(&document.text, word)
                        .into_iter()
                        .map(|span| TextChange::new(span, new_name))
                        .collect(),
                );
            }
            changes
        }
    }

    impl HtmlService for WordRename {
        fn do_rename(
            &self,
            document: &VirtualDocument,
            offset: u32,
            new_name: &str,
        ) -> BackendResult<WorkspaceChanges> {
            Ok(Self::changes(document, offset, new_name))
        }

        fn find_linked_editing_ranges(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
        ) -> BackendResult<Option<Vec<Span>>> {
            Ok(None)
        }

        fn do_tag_complete(
            &self,
            _document: &VirtualDocument,
            _offset: u32,
        ) -> BackendResult<Option<String>> {
            Ok(None)
        }
    }

    impl CssService for WordRename {
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
            document: &VirtualDocument,
            offset: u32,
            new_name: &str,
        ) -> BackendResult<WorkspaceChanges> {
            Ok(Self::changes(document, offset, new_name))
        }

        fn find_document_colors(&self, _document: &VirtualDocument) -> BackendResult<Vec<ColorSpan>> {
            Ok(Vec::new())
        }
    }

    fn offsets_of(edit: &WorkspaceEdit, service: &crate::LanguageService, uri: &Url) -> Vec<(u32, String)> {
        let doc = service.documents().get(uri).unwrap();
        let mut result: Vec<(u32, String)> = edit.changes.as_ref().unwrap()[uri]
            .iter()
            .map(|edit| (doc.offset_at(edit.range.start).unwrap(), edit.new_text.clone()))
            .collect();
        result.sort();
        result
    }

    #[test]
    fn test_transformed_edit_without_build_is_skipped() {
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, "<template><p>{{ a }}</p></template>");
        let cancel = CancellationToken::new();
        let ctx = service.context(&cancel);
        let data = TsMappingData::new(Block::Template, Capabilities::PROP_RAW)
            .with_do_rename(EditTransform::KeepHyphenation);

        let cached = MappedLocation {
            uri: uri.clone(),
            range: Span::new(1, 9),
            data: Some(data),
        };
        assert_eq!(
            RenameService::edit_text(&ctx, &cached, "fooBar").as_deref(),
            Some("foo-bar")
        );

        let unknown = MappedLocation {
            uri: Url::parse("file:///app/Closed.vue").unwrap(),
            ..cached.clone()
        };
        assert_eq!(RenameService::edit_text(&ctx, &unknown, "fooBar"), None);

        let plain = MappedLocation {
            data: None,
            ..unknown
        };
        assert_eq!(
            RenameService::edit_text(&ctx, &plain, "fooBar").as_deref(),
            Some("fooBar")
        );
    }

    #[tokio::test]
    async fn test_rename_script_binding() {
        let source = "<template>\n  <p>{{ count }}</p>\n</template>\n<script setup>\nconst count = 1\n</script>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, source);

        let offset = source.find("count = 1").unwrap() as u32;
        let position = service.documents().get(&uri).unwrap().position_at(offset).unwrap();
        let edit = service
            .rename(&uri, position, "total", &CancellationToken::new())
            .await
            .unwrap();

        let expected: Vec<(u32, String)> = source
            .match_indices("count")
            .map(|(i, _)| (i as u32, "total".to_string()))
            .collect();
        assert_eq!(offsets_of(&edit, &service, &uri), expected);
    }

    #[tokio::test]
    async fn test_markup_fallback() {
        let source = "<template>\n  <div>hi</div>\n</template>\n";
        let (backend, service) = service_with(FakeBackend {
            fail: true,
            ..Default::default()
        });
        let service = service.with_html_service(Arc::new(WordRename));
        let uri = open_component(&backend, &service, source);

        let offset = source.find("div").unwrap() as u32 + 1;
        let position = service.documents().get(&uri).unwrap().position_at(offset).unwrap();
        let edit = service
            .rename(&uri, position, "section", &CancellationToken::new())
            .await
            .unwrap();

        let expected: Vec<(u32, String)> = source
            .match_indices("div")
            .map(|(i, _)| (i as u32, "section".to_string()))
            .collect();
        assert_eq!(offsets_of(&edit, &service, &uri), expected);
    }

    #[tokio::test]
    async fn test_style_fallback() {
        let source = "<style>\n.title { color: red }\n.title:hover {}\n</style>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let service = service.with_css_service(Arc::new(WordRename));
        let uri = open_component(&backend, &service, source);

        let offset = source.find("title").unwrap() as u32;
        let position = service.documents().get(&uri).unwrap().position_at(offset).unwrap();
        let edit = service
            .rename(&uri, position, "heading", &CancellationToken::new())
            .await
            .unwrap();

        let expected: Vec<(u32, String)> = source
            .match_indices("title")
            .map(|(i, _)| (i as u32, "heading".to_string()))
            .collect();
        assert_eq!(offsets_of(&edit, &service, &uri), expected);
    }

    #[tokio::test]
    async fn test_nothing_to_rename() {
        let source = "<template>\n  <p>static</p>\n</template>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, source);

        let position = service.documents().get(&uri).unwrap().position_at(0).unwrap();
        assert!(service
            .rename(&uri, position, "x", &CancellationToken::new())
            .await
            .is_none());
    }

    #[test]
    fn test_edit_set_first_wins() {
        let uri = Url::parse("file:///app/App.vue").unwrap();
        let mut edits = EditSet::default();
        edits.push(&uri, TextChange::new(Span::new(1, 4), "fooBar"));
        edits.push(&uri, TextChange::new(Span::new(1, 4), "foo-bar"));
        edits.push(&uri, TextChange::new(Span::new(8, 9), "x"));
        assert_eq!(edits.files.len(), 1);
        assert_eq!(
            edits.files[0].1,
            vec![TextChange::new(Span::new(1, 4), "fooBar"), TextChange::new(Span::new(8, 9), "x")]
        );
    }
}

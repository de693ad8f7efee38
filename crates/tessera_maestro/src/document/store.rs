//! Rope-backed document store.

use compact_str::CompactString;
use dashmap::DashMap;
use ropey::Rope;
use tessera_carton::Span;
use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, Url};

use crate::utils::{offset_to_position, position_to_offset, range_to_span, span_to_range};

/// An open file.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    /// Increases with every change notification.
    pub version: i32,
    pub content: Rope,
    /// e.g. `vue`, `typescript`
    pub language_id: CompactString,
}

impl Document {
    pub fn new(uri: Url, content: &str, version: i32, language_id: impl Into<CompactString>) -> Self {
        Self {
            uri,
            version,
            content: Rope::from_str(content),
            language_id: language_id.into(),
        }
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    /// Whether this is a component file rather than a plain script.
    pub fn is_component(&self) -> bool {
        self.language_id == "vue" || self.uri.path().ends_with(".vue")
    }

    #[inline]
    pub fn offset_at(&self, position: Position) -> Option<u32> {
        position_to_offset(&self.content, position).map(|offset| offset as u32)
    }

    #[inline]
    pub fn position_at(&self, offset: u32) -> Option<Position> {
        offset_to_position(&self.content, offset as usize)
    }

    #[inline]
    pub fn range_of(&self, span: Span) -> Option<Range> {
        span_to_range(&self.content, span)
    }

    #[inline]
    pub fn span_of(&self, range: Range) -> Option<Span> {
        range_to_span(&self.content, range)
    }

    /// Apply one change event. Ranges outside the document are ignored.
    pub fn apply_change(&mut self, change: &TextDocumentContentChangeEvent, new_version: i32) {
        self.version = new_version;

        let Some(range) = change.range else {
            self.content = Rope::from_str(&change.text);
            return;
        };

        let start = position_to_offset(&self.content, range.start);
        let end = position_to_offset(&self.content, range.end);
        if let (Some(start), Some(end)) = (start, end) {
            if let (Ok(start_char), Ok(end_char)) = (
                self.content.try_byte_to_char(start),
                self.content.try_byte_to_char(end),
            ) {
                self.content.remove(start_char..end_char.max(start_char));
                self.content.insert(start_char, &change.text);
            }
        } else {
            tracing::warn!("change range {:?} is outside {}", range, self.uri);
        }
    }
}

/// Thread-safe document store.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, uri: Url, content: &str, version: i32, language_id: impl Into<CompactString>) {
        let doc = Document::new(uri.clone(), content, version, language_id);
        self.documents.insert(uri, doc);
    }

    /// Returns the closed document, if it was open.
    pub fn close(&self, uri: &Url) -> Option<Document> {
        self.documents.remove(uri).map(|(_, doc)| doc)
    }

    pub fn get(&self, uri: &Url) -> Option<dashmap::mapref::one::Ref<'_, Url, Document>> {
        self.documents.get(uri)
    }

    /// Apply changes in order. Returns `false` when the document is not open.
    pub fn apply_changes(
        &self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
        version: i32,
    ) -> bool {
        let Some(mut doc) = self.documents.get_mut(uri) else {
            return false;
        };
        for change in changes {
            doc.apply_change(change, version);
        }
        true
    }

    /// Version and text, copied out so no shard lock is held afterwards.
    pub fn snapshot(&self, uri: &Url) -> Option<(i32, String)> {
        self.documents
            .get(uri)
            .map(|doc| (doc.version, doc.text()))
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn uris(&self) -> Vec<Url> {
        self.documents.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::make_range;

    fn test_uri() -> Url {
        Url::parse("file:///test.vue").unwrap()
    }

    fn edit(range: Option<Range>, text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_document_creation() {
        let doc = Document::new(test_uri(), "hello world", 1, "vue");

        assert_eq!(doc.text(), "hello world");
        assert_eq!(doc.version, 1);
        assert_eq!(doc.language_id, "vue");
        assert!(doc.is_component());
        assert_eq!(doc.line_count(), 1);
    }

    #[test]
    fn test_plain_script_is_not_component() {
        let doc = Document::new(Url::parse("file:///main.ts").unwrap(), "", 1, "typescript");
        assert!(!doc.is_component());
    }

    #[test]
    fn test_incremental_change() {
        let mut doc = Document::new(test_uri(), "hello world", 1, "vue");

        doc.apply_change(&edit(Some(make_range(0, 6, 0, 11)), "universe"), 2);

        assert_eq!(doc.text(), "hello universe");
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_full_content_change() {
        let mut doc = Document::new(test_uri(), "hello world", 1, "vue");

        doc.apply_change(&edit(None, "completely new content"), 2);

        assert_eq!(doc.text(), "completely new content");
    }

    #[test]
    fn test_out_of_range_change_is_ignored() {
        let mut doc = Document::new(test_uri(), "one line", 1, "vue");

        doc.apply_change(&edit(Some(make_range(4, 0, 4, 1)), "x"), 2);

        assert_eq!(doc.text(), "one line");
        assert_eq!(doc.version, 2);
    }

    #[test]
    fn test_span_conversions() {
        let doc = Document::new(test_uri(), "<template>\n  {{ msg }}\n</template>", 1, "vue");
        let range = doc.range_of(Span::new(16, 19)).unwrap();

        assert_eq!(range, make_range(1, 5, 1, 8));
        assert_eq!(doc.span_of(range), Some(Span::new(16, 19)));
        assert_eq!(doc.offset_at(range.start), Some(16));
        assert_eq!(doc.position_at(19), Some(range.end));
    }

    #[test]
    fn test_document_store() {
        let store = DocumentStore::new();

        store.open(test_uri(), "content", 1, "vue");
        assert!(store.contains(&test_uri()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.uris(), vec![test_uri()]);

        assert!(store.apply_changes(&test_uri(), &[edit(None, "changed")], 2));
        assert_eq!(store.snapshot(&test_uri()), Some((2, "changed".to_string())));

        let closed = store.close(&test_uri()).unwrap();
        assert_eq!(closed.text(), "changed");
        assert!(store.is_empty());
        assert!(!store.apply_changes(&test_uri(), &[edit(None, "gone")], 3));
    }
}

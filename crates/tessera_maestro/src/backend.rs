//! Collaborators the language service talks to.
//!
//! Everything here speaks byte offsets into the documents it is handed. Converting to and
//! from LSP positions is the language service's job.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use tessera_carton::{FxHashMap, Span};
use tower_lsp::lsp_types::{Color, DiagnosticSeverity, DiagnosticTag, NumberOrString, Url};

use crate::config::DiagnosticOptions;
use crate::error::BackendError;
use crate::virtual_code::VirtualDocument;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Edits grouped by document.
pub type WorkspaceChanges = FxHashMap<Url, Vec<TextChange>>;

/// Shared flag checked between backend calls.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A range in some document, virtual or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualLocation {
    pub uri: Url,
    pub range: Span,
}

impl VirtualLocation {
    pub fn new(uri: Url, range: Span) -> Self {
        Self { uri, range }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub range: Span,
    pub new_text: String,
}

impl TextChange {
    pub fn new(range: Span, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInformation {
    pub location: VirtualLocation,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDiagnostic {
    pub range: Span,
    pub severity: DiagnosticSeverity,
    pub code: Option<NumberOrString>,
    pub source: Option<String>,
    pub message: String,
    pub tags: Vec<DiagnosticTag>,
    pub related: Vec<RelatedInformation>,
}

impl BackendDiagnostic {
    pub fn error(range: Span, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: DiagnosticSeverity::ERROR,
            code: None,
            source: None,
            message: message.into(),
            tags: Vec::new(),
            related: Vec::new(),
        }
    }
}

/// Identifies one completion entry for a details request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompletionEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCodeAction {
    pub description: String,
    pub changes: WorkspaceChanges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionDetails {
    /// Signature text, e.g. `const count: Ref<number>`.
    pub display: String,
    pub documentation: Option<String>,
    pub code_actions: Vec<CompletionCodeAction>,
}

/// A type-checking backend that sees virtual TypeScript documents as ordinary files.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn find_references(
        &self,
        uri: &Url,
        offset: u32,
        cancel: &CancellationToken,
    ) -> BackendResult<Vec<VirtualLocation>>;

    async fn find_definition(
        &self,
        uri: &Url,
        offset: u32,
        cancel: &CancellationToken,
    ) -> BackendResult<Vec<VirtualLocation>>;

    async fn find_type_definition(
        &self,
        uri: &Url,
        offset: u32,
        cancel: &CancellationToken,
    ) -> BackendResult<Vec<VirtualLocation>>;

    async fn get_diagnostics(
        &self,
        uri: &Url,
        options: DiagnosticOptions,
        cancel: &CancellationToken,
    ) -> BackendResult<Vec<BackendDiagnostic>>;

    async fn rename(
        &self,
        uri: &Url,
        offset: u32,
        new_name: &str,
        cancel: &CancellationToken,
    ) -> BackendResult<WorkspaceChanges>;

    async fn completion_details(
        &self,
        uri: &Url,
        offset: u32,
        entry: &CompletionEntry,
        cancel: &CancellationToken,
    ) -> BackendResult<Option<CompletionDetails>>;

    /// Current text of a file the backend knows, virtual or not.
    async fn text_document(&self, uri: &Url) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpan {
    pub range: Span,
    pub color: Color,
}

/// Stylesheet features over one style virtual document.
pub trait CssService: Send + Sync {
    /// Whether this service handles `language_id` (`css`, `scss`, ...).
    fn supports(&self, language_id: &str) -> bool {
        matches!(language_id, "css" | "scss" | "less" | "postcss")
    }

    fn find_definition(
        &self,
        document: &VirtualDocument,
        offset: u32,
    ) -> BackendResult<Option<VirtualLocation>>;

    fn find_references(
        &self,
        document: &VirtualDocument,
        offset: u32,
    ) -> BackendResult<Vec<VirtualLocation>>;

    fn do_rename(
        &self,
        document: &VirtualDocument,
        offset: u32,
        new_name: &str,
    ) -> BackendResult<WorkspaceChanges>;

    fn find_document_colors(&self, document: &VirtualDocument) -> BackendResult<Vec<ColorSpan>>;
}

/// Markup features over the template HTML document.
pub trait HtmlService: Send + Sync {
    fn do_rename(
        &self,
        document: &VirtualDocument,
        offset: u32,
        new_name: &str,
    ) -> BackendResult<WorkspaceChanges>;

    fn find_linked_editing_ranges(
        &self,
        document: &VirtualDocument,
        offset: u32,
    ) -> BackendResult<Option<Vec<Span>>>;

    /// Closing tag snippet to insert at `offset`, e.g. `$0</div>`.
    fn do_tag_complete(&self, document: &VirtualDocument, offset: u32)
        -> BackendResult<Option<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_completion_entry_serde() {
        let entry = CompletionEntry {
            name: "ref".into(),
            source: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "ref" }));
        let back: CompletionEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}

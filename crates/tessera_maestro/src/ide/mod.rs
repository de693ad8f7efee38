//! IDE features over component files.
//!
//! [`LanguageService`] owns the open documents and the build cache. Each request borrows
//! them through an [`IdeContext`] and hands it to one of the services:
//! - references, definitions and type definitions
//! - rename with markup and style fallbacks
//! - diagnostics translation
//! - document colors
//! - completion resolve
//! - linked editing ranges and tag auto close

mod completion;
mod definition;
mod diagnostics;
mod document_color;
mod html;
mod references;
mod rename;
mod resolve;

pub use completion::{CompletionData, CompletionService};
pub use definition::DefinitionService;
pub use diagnostics::{sources, DiagnosticService};
pub use document_color::DocumentColorService;
pub use html::HtmlFeatureService;
pub use references::ReferencesService;
pub use rename::RenameService;

use std::sync::Arc;

use compact_str::CompactString;
use parking_lot::RwLock;
use tessera_carton::Span;
use tower_lsp::lsp_types::{
    ColorInformation, CompletionItem, Diagnostic, LinkedEditingRanges, Location, Position, Range,
    TextDocumentContentChangeEvent, Url, WorkspaceEdit,
};

use crate::backend::{AnalysisBackend, CancellationToken, CssService, HtmlService, VirtualLocation};
use crate::cache::SourceFileCache;
use crate::config::ServiceConfig;
use crate::document::DocumentStore;
use crate::error::{MaestroError, Result};
use crate::utils::span_to_range_str;
use crate::virtual_code::{
    BuildOptions, Capabilities, SourceFile, TsMappingData, VirtualDocument,
};

/// The language service for component files.
pub struct LanguageService {
    backend: Arc<dyn AnalysisBackend>,
    css: Option<Arc<dyn CssService>>,
    html: Option<Arc<dyn HtmlService>>,
    documents: DocumentStore,
    cache: SourceFileCache,
    config: RwLock<ServiceConfig>,
}

impl LanguageService {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            css: None,
            html: None,
            documents: DocumentStore::new(),
            cache: SourceFileCache::new(),
            config: RwLock::new(ServiceConfig::default()),
        }
    }

    pub fn with_css_service(mut self, css: Arc<dyn CssService>) -> Self {
        self.css = Some(css);
        self
    }

    pub fn with_html_service(mut self, html: Arc<dyn HtmlService>) -> Self {
        self.html = Some(html);
        self
    }

    pub fn with_config(self, config: ServiceConfig) -> Self {
        *self.config.write() = config;
        self
    }

    pub fn config(&self) -> ServiceConfig {
        self.config.read().clone()
    }

    /// Replace the configuration. Every build is dropped since generated code depends on it.
    pub fn set_config(&self, config: ServiceConfig) {
        *self.config.write() = config;
        self.cache.clear();
        tracing::info!("configuration updated, build cache cleared");
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn open(&self, uri: Url, text: &str, version: i32, language_id: impl Into<CompactString>) {
        tracing::debug!("open {} v{}", uri, version);
        self.documents.open(uri, text, version, language_id);
    }

    /// Open a file from disk by path. The language id follows the extension.
    pub fn open_path(&self, path: impl AsRef<std::path::Path>, version: i32) -> Result<Url> {
        let path = path.as_ref();
        let uri = Url::from_file_path(path)
            .map_err(|()| MaestroError::InvalidUri(path.display().to_string()))?;
        let text = std::fs::read_to_string(path)?;
        let language_id = match path.extension().and_then(|ext| ext.to_str()) {
            Some("vue") => "vue",
            Some("ts") | Some("mts") | Some("cts") => "typescript",
            Some("tsx") => "typescriptreact",
            Some("jsx") => "javascriptreact",
            _ => "javascript",
        };
        self.open(uri.clone(), &text, version, language_id);
        Ok(uri)
    }

    pub fn change(
        &self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
        version: i32,
    ) -> Result<()> {
        if self.documents.apply_changes(uri, changes, version) {
            Ok(())
        } else {
            Err(MaestroError::UnknownDocument(uri.clone()))
        }
    }

    pub fn close(&self, uri: &Url) {
        tracing::debug!("close {}", uri);
        self.documents.close(uri);
        self.cache.remove(uri);
    }

    /// The current build of an open component file.
    pub fn source_file(&self, uri: &Url) -> Option<Arc<SourceFile>> {
        self.context(&CancellationToken::new()).source_file(uri)
    }

    /// Every virtual document generated for an open component file.
    pub fn virtual_documents(&self, uri: &Url) -> Vec<VirtualDocument> {
        self.source_file(uri)
            .map(|file| file.virtual_documents().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn references(
        &self,
        uri: &Url,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<Location> {
        ReferencesService::references(&self.context(cancel), uri, position).await
    }

    pub async fn definitions(
        &self,
        uri: &Url,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<Location> {
        DefinitionService::definitions(&self.context(cancel), uri, position).await
    }

    pub async fn type_definitions(
        &self,
        uri: &Url,
        position: Position,
        cancel: &CancellationToken,
    ) -> Vec<Location> {
        DefinitionService::type_definitions(&self.context(cancel), uri, position).await
    }

    pub async fn rename(
        &self,
        uri: &Url,
        position: Position,
        new_name: &str,
        cancel: &CancellationToken,
    ) -> Option<WorkspaceEdit> {
        RenameService::rename(&self.context(cancel), uri, position, new_name).await
    }

    pub async fn diagnostics(&self, uri: &Url, cancel: &CancellationToken) -> Vec<Diagnostic> {
        DiagnosticService::diagnostics(&self.context(cancel), uri).await
    }

    pub fn document_colors(&self, uri: &Url) -> Vec<ColorInformation> {
        DocumentColorService::document_colors(&self.context(&CancellationToken::new()), uri)
    }

    pub async fn resolve_completion(
        &self,
        item: CompletionItem,
        cancel: &CancellationToken,
    ) -> CompletionItem {
        CompletionService::resolve(&self.context(cancel), item).await
    }

    pub fn linked_editing_ranges(&self, uri: &Url, position: Position) -> Option<LinkedEditingRanges> {
        HtmlFeatureService::linked_editing_ranges(&self.context(&CancellationToken::new()), uri, position)
    }

    pub fn auto_close_tag(&self, uri: &Url, position: Position) -> Option<String> {
        HtmlFeatureService::auto_close_tag(&self.context(&CancellationToken::new()), uri, position)
    }

    fn context<'a>(&'a self, cancel: &'a CancellationToken) -> IdeContext<'a> {
        IdeContext {
            backend: self.backend.as_ref(),
            css: self.css.as_deref(),
            html: self.html.as_deref(),
            documents: &self.documents,
            cache: &self.cache,
            config: self.config(),
            cancel,
        }
    }
}

/// Everything one request may touch.
pub struct IdeContext<'a> {
    pub backend: &'a dyn AnalysisBackend,
    pub css: Option<&'a dyn CssService>,
    pub html: Option<&'a dyn HtmlService>,
    pub documents: &'a DocumentStore,
    pub cache: &'a SourceFileCache,
    /// Snapshot taken when the request started.
    pub config: ServiceConfig,
    pub cancel: &'a CancellationToken,
}

/// A location mapped back out of the virtual documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MappedLocation {
    pub uri: Url,
    pub range: Span,
    /// `None` when the location was never in a virtual document.
    pub data: Option<TsMappingData>,
}

impl IdeContext<'_> {
    /// Build (or reuse) the source file of an open component document.
    pub fn source_file(&self, uri: &Url) -> Option<Arc<SourceFile>> {
        let (version, text) = {
            let doc = self.documents.get(uri)?;
            if !doc.is_component() {
                return None;
            }
            if self.cache.version(uri) == Some(doc.version) {
                return self.cache.get(uri);
            }
            (doc.version, doc.text())
        };
        let options = BuildOptions::from(&self.config);
        Some(self.cache.get_or_build(uri, version, &text, &options))
    }

    /// Byte offset of `position` in an open document.
    pub fn offset_at(&self, uri: &Url, position: Position) -> Option<u32> {
        self.documents.get(uri)?.offset_at(position)
    }

    /// Byte offset of `position`, asking the backend for files that are not open.
    pub async fn offset_in_any(&self, uri: &Url, position: Position) -> Option<u32> {
        if let Some(offset) = self.offset_at(uri, position) {
            return Some(offset);
        }
        let text = self.backend.text_document(uri).await?;
        crate::utils::position_to_offset_str(&text, position).map(|offset| offset as u32)
    }

    /// Range of `span` in an open document.
    pub fn range_in(&self, uri: &Url, span: Span) -> Option<Range> {
        self.documents.get(uri)?.range_of(span)
    }

    pub async fn to_lsp_location(&self, uri: &Url, span: Span) -> Option<Location> {
        let range = self.range_in(uri, span);
        let range = match range {
            Some(range) => range,
            None => {
                let text = self.backend.text_document(uri).await?;
                span_to_range_str(&text, span)?
            }
        };
        Some(Location::new(uri.clone(), range))
    }

    /// Map a location in any document back to the files a user sees.
    ///
    /// Locations in a virtual TypeScript document map through its source map, keeping
    /// only mappings with `capability`. Unmapped virtual locations are dropped. Locations
    /// in documents no held build generated are kept as they are.
    pub(crate) fn map_back(
        &self,
        location: &VirtualLocation,
        capability: Capabilities,
    ) -> Vec<MappedLocation> {
        let Some(file) = self.cache.get_by_virtual_uri(&location.uri) else {
            return vec![MappedLocation {
                uri: location.uri.clone(),
                range: location.range,
                data: None,
            }];
        };
        let Some(code) = file.ts_code(&location.uri) else {
            return Vec::new();
        };
        code.source_map
            .all_to_sources(location.range)
            .into_iter()
            .filter(|hit| hit.data.has(capability))
            .map(|hit| MappedLocation {
                uri: file.uri.clone(),
                range: hit.range,
                data: Some(*hit.data),
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_source_file_requires_component() {
        let (_, service) = service_with(FakeBackend::default());
        let script = Url::parse("file:///app/main.ts").unwrap();
        service.open(script.clone(), "export {}", 1, "typescript");
        assert!(service.source_file(&script).is_none());
        assert!(service.virtual_documents(&script).is_empty());
    }

    #[test]
    fn test_source_file_follows_versions() {
        let (_, service) = service_with(FakeBackend::default());
        let uri = Url::parse("file:///app/App.vue").unwrap();
        service.open(uri.clone(), "<template>{{ a }}</template>", 1, "vue");
        let first = service.source_file(&uri).unwrap();
        assert!(Arc::ptr_eq(&first, &service.source_file(&uri).unwrap()));

        let change = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "<template>{{ b }}</template>".into(),
        };
        service.change(&uri, &[change], 2).unwrap();
        let second = service.source_file(&uri).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.text.contains("{{ b }}"));

        service.close(&uri);
        assert!(service.source_file(&uri).is_none());
        assert!(service.change(&uri, &[], 3).is_err());
    }

    #[test]
    fn test_set_config_rebuilds() {
        let (_, service) = service_with(FakeBackend::default());
        let uri = Url::parse("file:///app/App.vue").unwrap();
        service.open(uri.clone(), "<template><RouterLink /></template>", 1, "vue");
        let before = service.source_file(&uri).unwrap();
        assert!(before.template_data.components.is_empty());

        service.set_config(ServiceConfig {
            global_components: vec!["RouterLink".into()],
            ..Default::default()
        });
        let after = service.source_file(&uri).unwrap();
        assert_eq!(after.template_data.components, vec!["RouterLink"]);
    }

    #[test]
    fn test_map_back_keeps_plain_files() {
        let (backend, service) = service_with(FakeBackend::default());
        open_component(&backend, &service, "<template>{{ a }}</template>");
        let cancel = CancellationToken::new();
        let ctx = service.context(&cancel);

        for plain in [
            "file:///app/util.ts",
            "file:///app/mail.template.ts",
            "file:///app/Gone.vue.__VLS_script.ts",
        ] {
            let location = VirtualLocation::new(Url::parse(plain).unwrap(), Span::new(3, 6));
            let mapped = ctx.map_back(&location, Capabilities::REFERENCES);
            assert_eq!(mapped.len(), 1, "{plain}");
            assert_eq!(mapped[0].uri, location.uri);
            assert_eq!(mapped[0].range, Span::new(3, 6));
            assert!(mapped[0].data.is_none());
        }

        let header = VirtualLocation::new(
            Url::parse("file:///app/App.vue.__VLS_template.ts").unwrap(),
            Span::new(0, 1),
        );
        assert!(ctx.map_back(&header, Capabilities::REFERENCES).is_empty());
    }

    #[test]
    fn test_open_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Hello.vue");
        std::fs::write(&path, "<template>{{ msg }}</template>").unwrap();

        let (_, service) = service_with(FakeBackend::default());
        let uri = service.open_path(&path, 1).unwrap();
        assert_eq!(service.documents().get(&uri).unwrap().language_id, "vue");
        assert!(service.source_file(&uri).is_some());

        let missing = service.open_path(dir.path().join("Missing.vue"), 1);
        assert!(matches!(missing, Err(MaestroError::Io(_))));
        assert!(matches!(
            service.open_path("relative/App.vue", 1),
            Err(MaestroError::InvalidUri(_))
        ));
    }
}

//! Diagnostics for a component file.
//!
//! Backend diagnostics of every TypeScript virtual document are mapped back through
//! mappings with the diagnostic capability. Block parse errors are appended after them.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, NumberOrString, Url,
};

use super::IdeContext;
use crate::backend::BackendDiagnostic;
use crate::error::BackendError;
use crate::virtual_code::{Capabilities, SourceFile, TsVirtualCode};

/// Diagnostic source identifiers.
pub mod sources {
    /// Block parse errors.
    pub const PARSER: &str = "tessera";
    /// Backend diagnostics that do not name a source.
    pub const BACKEND: &str = "ts";
}

pub struct DiagnosticService;

impl DiagnosticService {
    /// Diagnostics in original file coordinates. A cancelled request returns what was
    /// gathered so far.
    pub async fn diagnostics(ctx: &IdeContext<'_>, uri: &Url) -> Vec<Diagnostic> {
        let Some(file) = ctx.source_file(uri) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for code in file.ts_codes() {
            if ctx.cancel.is_cancelled() {
                break;
            }
            let diagnostics = match ctx
                .backend
                .get_diagnostics(&code.document.uri, ctx.config.diagnostics, ctx.cancel)
                .await
            {
                Ok(diagnostics) => diagnostics,
                Err(BackendError::Cancelled) => break,
                Err(err) => {
                    tracing::warn!("diagnostics for {} failed: {}", code.document.uri, err);
                    continue;
                }
            };
            for diagnostic in diagnostics {
                if let Some(mapped) = Self::translate(ctx, &file, code, diagnostic).await {
                    result.push(mapped);
                }
            }
        }

        if ctx.config.report_parse_errors {
            result.extend(Self::parse_errors(ctx, &file));
        }
        tracing::debug!("{} diagnostics for {}", result.len(), uri);
        result
    }

    async fn translate(
        ctx: &IdeContext<'_>,
        file: &SourceFile,
        code: &TsVirtualCode,
        diagnostic: BackendDiagnostic,
    ) -> Option<Diagnostic> {
        let source = code
            .source_map
            .all_to_sources(diagnostic.range)
            .into_iter()
            .find(|hit| hit.data.has(Capabilities::DIAGNOSTIC))?;
        let range = ctx.range_in(&file.uri, source.range)?;

        let mut related = Vec::new();
        for info in diagnostic.related {
            let Some(mapped) = ctx
                .map_back(&info.location, Capabilities::DIAGNOSTIC)
                .into_iter()
                .next()
            else {
                continue;
            };
            if let Some(location) = ctx.to_lsp_location(&mapped.uri, mapped.range).await {
                related.push(DiagnosticRelatedInformation {
                    location,
                    message: info.message,
                });
            }
        }

        Some(Diagnostic {
            range,
            severity: Some(diagnostic.severity),
            code: diagnostic.code,
            source: Some(diagnostic.source.unwrap_or_else(|| sources::BACKEND.to_string())),
            message: diagnostic.message,
            related_information: (!related.is_empty()).then_some(related),
            tags: (!diagnostic.tags.is_empty()).then_some(diagnostic.tags),
            ..Default::default()
        })
    }

    fn parse_errors(ctx: &IdeContext<'_>, file: &SourceFile) -> Vec<Diagnostic> {
        file.diagnostics
            .iter()
            .filter_map(|error| {
                Some(Diagnostic {
                    range: ctx.range_in(&file.uri, error.span)?,
                    severity: Some(DiagnosticSeverity::ERROR),
                    code: Some(NumberOrString::String(error.code.as_str().to_string())),
                    source: Some(sources::PARSER.to_string()),
                    message: error.message.clone(),
                    ..Default::default()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CancellationToken;
    use crate::config::ServiceConfig;
    use crate::ide::test_support::*;

    const APP: &str = "<template>\n  <p>{{ missing }}</p>\n</template>\n<script setup>\nconst count = 1\n</script>\n";

    #[tokio::test]
    async fn test_backend_diagnostics_are_mapped() {
        let (backend, service) = service_with(FakeBackend {
            error_words: vec!["missing".into()],
            ..Default::default()
        });
        let uri = open_component(&backend, &service, APP);

        let diagnostics = service.diagnostics(&uri, &CancellationToken::new()).await;
        let doc = service.documents().get(&uri).unwrap();
        let offset = APP.find("missing").unwrap() as u32;

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(doc.offset_at(diagnostics[0].range.start), Some(offset));
        assert_eq!(diagnostics[0].source.as_deref(), Some("ts"));
        assert_eq!(diagnostics[0].message, "Cannot find name 'missing'.");
    }

    #[tokio::test]
    async fn test_parse_errors_are_reported() {
        let source = "<template>{{ count }}</template>\n<script setup>\nconst s = 'open\n</script>\n";
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, source);

        let diagnostics = service.diagnostics(&uri, &CancellationToken::new()).await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].source.as_deref(), Some(sources::PARSER));
        assert_eq!(
            diagnostics[0].code,
            Some(NumberOrString::String("unterminated-string".into()))
        );

        service.set_config(ServiceConfig {
            report_parse_errors: false,
            ..Default::default()
        });
        assert!(service
            .diagnostics(&uri, &CancellationToken::new())
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_diagnostics_keep_parse_errors() {
        let source = "<template>{{ count }}</template>\n<script setup>\nconst s = 'open\n</script>\n";
        let (backend, service) = service_with(FakeBackend {
            error_words: vec!["count".into()],
            ..Default::default()
        });
        let uri = open_component(&backend, &service, source);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let diagnostics = service.diagnostics(&uri, &cancel).await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].source.as_deref(), Some(sources::PARSER));
    }
}

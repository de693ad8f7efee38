//! # tessera_maestro
//!
//! Maestro - Source maps, virtual documents and cross-reference resolution for Tessera.
//!
//! ## Name Origin
//!
//! A **maestro** conducts an orchestra so that separate instruments play one piece.
//! `tessera_maestro` does the same for a component file: a script block, a template and
//! a handful of style blocks are split into documents that separate analysis services
//! understand, and their answers are conducted back into one result.
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                      tessera_maestro                              |
//! +------------------------------------------------------------------+
//! |                                                                    |
//! |  +--------------------+     +-------------------+                  |
//! |  |  LanguageService   |---->|   IDE services    |                  |
//! |  |  (requests)        |     |   (ide/*)         |                  |
//! |  +--------------------+     +-------------------+                  |
//! |            |                     |          |                      |
//! |            v                     v          v                      |
//! |  +--------------------+   +-----------+  +-------------------+     |
//! |  |  Document Store    |   | Resolver  |  | AnalysisBackend   |     |
//! |  |  (ropey, dashmap)  |   | (teleport |  | CssService        |     |
//! |  +--------------------+   |  walk)    |  | HtmlService       |     |
//! |            |              +-----------+  +-------------------+     |
//! |            v                                                       |
//! |  +-----------------------------------------------------------+    |
//! |  |                   Virtual Code Layer                       |    |
//! |  |  SFC → script.ts, template.ts, template.html, *.css        |    |
//! |  |  SourceMap + TeleportMap, cached per (uri, version)        |    |
//! |  +-----------------------------------------------------------+    |
//! |                                      |                             |
//! |                                      v                             |
//! |  +-----------------------------------------------------------+    |
//! |  |                    Syntax Analysis Layer                   |    |
//! |  |  tessera_armature | tessera_relief | tessera_carton        |    |
//! |  +-----------------------------------------------------------+    |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let service = LanguageService::new(Arc::new(MyBackend::default()));
//! service.open(uri.clone(), &text, 1, "vue");
//! let locations = service.references(&uri, position, &CancellationToken::new()).await;
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod ide;
pub mod utils;
pub mod virtual_code;

pub use backend::{
    AnalysisBackend, BackendDiagnostic, BackendResult, CancellationToken, ColorSpan,
    CompletionCodeAction, CompletionDetails, CompletionEntry, CssService, HtmlService,
    RelatedInformation, TextChange, VirtualLocation, WorkspaceChanges,
};
pub use cache::SourceFileCache;
pub use config::{DiagnosticOptions, ServiceConfig};
pub use document::{Document, DocumentStore};
pub use error::{BackendError, MaestroError, Result};
pub use ide::{
    CompletionData, CompletionService, DefinitionService, DiagnosticService,
    DocumentColorService, HtmlFeatureService, IdeContext, LanguageService, ReferencesService,
    RenameService,
};
pub use virtual_code::{SourceFile, SourceMap, TeleportMap, VirtualDocument};

use std::path::Path;

/// Send `tracing` output to `path` and to stderr.
///
/// Only the first call installs a subscriber. Falls back to stderr alone when the file
/// cannot be opened.
pub fn init_file_logging(path: impl AsRef<Path>) {
    use std::fs::{create_dir_all, OpenOptions};
    use std::sync::Once;
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    static INIT: Once = Once::new();

    let path = path.as_ref();
    INIT.call_once(|| {
        if let Some(dir) = path.parent() {
            let _ = create_dir_all(dir);
        }

        // try_init: an embedding host may already own the global subscriber
        let installed = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => tracing_subscriber::fmt()
                .with_writer(file.and(std::io::stderr))
                .with_ansi(false)
                .try_init(),
            Err(_) => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .try_init(),
        };
        if installed.is_ok() {
            tracing::info!("tessera_maestro logging to {}", path.display());
        }
    });
}

//! Memoized [`SourceFile`] builds keyed by document version.

use std::sync::Arc;

use dashmap::DashMap;
use tessera_carton::hash_str;
use tower_lsp::lsp_types::Url;

use crate::virtual_code::{BuildOptions, SourceFile};

#[derive(Debug, Clone)]
struct CacheEntry {
    version: i32,
    hash: u64,
    file: Arc<SourceFile>,
}

/// One build per component file and version.
///
/// A stale entry is rebuilt wholesale. A new version with identical text keeps the
/// previous build. Every virtual document of a held build is indexed back to its
/// component file.
#[derive(Debug, Default)]
pub struct SourceFileCache {
    entries: DashMap<Url, CacheEntry>,
    owners: DashMap<Url, Url>,
}

impl SourceFileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The build for `(uri, version)`, building it if needed.
    pub fn get_or_build(
        &self,
        uri: &Url,
        version: i32,
        text: &str,
        options: &BuildOptions,
    ) -> Arc<SourceFile> {
        if let Some(entry) = self.entries.get(uri) {
            if entry.version == version {
                return entry.file.clone();
            }
        }

        let hash = hash_str(text);
        if let Some(mut entry) = self.entries.get_mut(uri) {
            if entry.hash == hash {
                tracing::debug!("{} v{} unchanged, reusing v{}", uri, version, entry.version);
                entry.version = version;
                return entry.file.clone();
            }
            tracing::debug!("invalidating {} v{}", uri, entry.version);
        }

        let file = Arc::new(SourceFile::build(uri, text, options));
        for document in file.virtual_documents() {
            self.owners.insert(document.uri.clone(), uri.clone());
        }
        let previous = self.entries.insert(
            uri.clone(),
            CacheEntry {
                version,
                hash,
                file: file.clone(),
            },
        );
        if let Some(previous) = previous {
            self.forget_stale(&previous.file, Some(&file));
        }
        file
    }

    /// Drop index entries of `old` that `current` no longer produces.
    fn forget_stale(&self, old: &SourceFile, current: Option<&SourceFile>) {
        for document in old.virtual_documents() {
            if !current.is_some_and(|file| file.owns(&document.uri)) {
                self.owners.remove(&document.uri);
            }
        }
    }

    /// The latest build of a component file.
    pub fn get(&self, uri: &Url) -> Option<Arc<SourceFile>> {
        self.entries.get(uri).map(|entry| entry.file.clone())
    }

    /// The component file a held build generated `uri` for.
    pub fn owner_of(&self, uri: &Url) -> Option<Url> {
        self.owners.get(uri).map(|owner| owner.clone())
    }

    /// The build owning a virtual document.
    pub fn get_by_virtual_uri(&self, uri: &Url) -> Option<Arc<SourceFile>> {
        let file = self.get(&self.owner_of(uri)?)?;
        file.owns(uri).then_some(file)
    }

    pub fn version(&self, uri: &Url) -> Option<i32> {
        self.entries.get(uri).map(|entry| entry.version)
    }

    pub fn remove(&self, uri: &Url) {
        if let Some((_, entry)) = self.entries.remove(uri) {
            self.forget_stale(&entry.file, None);
            tracing::debug!("evicted {}", uri);
        }
    }

    /// Drop every build, e.g. after a configuration change.
    pub fn clear(&self) {
        self.entries.clear();
        self.owners.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

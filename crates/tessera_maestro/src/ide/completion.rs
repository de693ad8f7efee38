//! Completion item resolution.
//!
//! Items produced on a virtual document carry a [`CompletionData`] payload in their
//! `data` field. Resolving asks the backend for the entry details at that position.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{CompletionItem, Documentation, TextEdit, Url};

use super::IdeContext;
use crate::backend::{CompletionEntry, VirtualLocation};
use crate::virtual_code::Capabilities;

/// Where a completion item came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionData {
    /// The virtual document the item was computed on.
    pub uri: Url,
    pub offset: u32,
    pub entry: CompletionEntry,
}

impl CompletionData {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_item(item: &CompletionItem) -> Option<Self> {
        serde_json::from_value(item.data.clone()?).ok()
    }
}

pub struct CompletionService;

impl CompletionService {
    pub async fn resolve(ctx: &IdeContext<'_>, mut item: CompletionItem) -> CompletionItem {
        let Some(data) = CompletionData::from_item(&item) else {
            return item;
        };

        let details = match ctx
            .backend
            .completion_details(&data.uri, data.offset, &data.entry, ctx.cancel)
            .await
        {
            Ok(Some(details)) => details,
            Ok(None) => return item,
            Err(err) => {
                item.detail = Some(format!("[TS Error] {err}"));
                return item;
            }
        };

        let mut detail_lines = Vec::new();
        let target = ctx.cache.owner_of(&data.uri);
        for action in details.code_actions {
            detail_lines.push(action.description);
            let mut changes: Vec<_> = action.changes.into_iter().collect();
            changes.sort_by(|a, b| a.0.cmp(&b.0));
            for (uri, text_changes) in changes {
                for change in text_changes {
                    let location = VirtualLocation::new(uri.clone(), change.range);
                    let Some(mapped) = ctx
                        .map_back(&location, Capabilities::COMPLETION)
                        .into_iter()
                        .find(|mapped| Some(&mapped.uri) == target.as_ref())
                    else {
                        continue;
                    };
                    if let Some(range) = ctx.range_in(&mapped.uri, mapped.range) {
                        item.additional_text_edits
                            .get_or_insert_with(Vec::new)
                            .push(TextEdit::new(range, change.new_text));
                    }
                }
            }
        }

        if !details.display.is_empty() {
            detail_lines.push(details.display);
        }
        if let Some(documentation) = details.documentation {
            item.documentation = Some(Documentation::String(documentation));
        }
        if !detail_lines.is_empty() {
            item.detail = Some(detail_lines.join("\n"));
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CancellationToken;
    use crate::ide::test_support::*;

    fn item_for(uri: &Url) -> CompletionItem {
        let data = CompletionData {
            uri: Url::parse(&format!("{uri}.__VLS_template.ts")).unwrap(),
            offset: 0,
            entry: CompletionEntry {
                name: "count".into(),
                source: None,
            },
        };
        CompletionItem {
            label: "count".into(),
            data: Some(data.to_value()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_fills_detail_and_documentation() {
        let (backend, service) = service_with(FakeBackend::default());
        let uri = open_component(&backend, &service, "<template>{{ count }}</template>");

        let item = service
            .resolve_completion(item_for(&uri), &CancellationToken::new())
            .await;
        assert_eq!(item.detail.as_deref(), Some("const count: number"));
        assert_eq!(
            item.documentation,
            Some(Documentation::String("A counter.".into()))
        );
    }

    #[tokio::test]
    async fn test_backend_error_goes_to_detail() {
        let (backend, service) = service_with(FakeBackend {
            fail: true,
            ..Default::default()
        });
        let uri = open_component(&backend, &service, "<template>{{ count }}</template>");

        let item = service
            .resolve_completion(item_for(&uri), &CancellationToken::new())
            .await;
        assert_eq!(item.detail.as_deref(), Some("[TS Error] backend down"));
    }

    #[tokio::test]
    async fn test_item_without_data_is_untouched() {
        let (_, service) = service_with(FakeBackend::default());
        let item = CompletionItem {
            label: "x".into(),
            ..Default::default()
        };
        let resolved = service
            .resolve_completion(item.clone(), &CancellationToken::new())
            .await;
        assert_eq!(resolved, item);
    }

    #[test]
    fn test_data_round_trip() {
        let uri = Url::parse("file:///app/App.vue").unwrap();
        let item = item_for(&uri);
        let data = CompletionData::from_item(&item).unwrap();
        assert_eq!(data.entry.name, "count");
        assert!(data.uri.as_str().ends_with(".__VLS_template.ts"));
    }
}

//! Everything derived from one component file version.

use compact_str::CompactString;
use tessera_armature::{analyze_script, analyze_script_setup, parse_sfc, parse_template};
use tessera_carton::{FxHashSet, Span};
use tessera_relief::{ParseError, ParseErrorCode, ScriptFacts, ScriptSetupFacts, SfcDescriptor};
use tower_lsp::lsp_types::Url;

use super::{
    Block, CssVirtualCode, HtmlVirtualCode, JsonCodeGenerator, JsonVirtualCode, ScriptCodeGenerator, ScriptInput, StyleCodeGenerator,
    TemplateCodeGenerator, TemplateInput, TemplateScriptData, TsVirtualCode, VirtualDocument,
};
use crate::config::ServiceConfig;

/// Knobs that change generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub global_components: Vec<CompactString>,
    pub scoped_class_links: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            global_components: Vec::new(),
            scoped_class_links: true,
        }
    }
}

impl From<&ServiceConfig> for BuildOptions {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            global_components: config
                .global_components
                .iter()
                .map(|name| CompactString::from(name.as_str()))
                .collect(),
            scoped_class_links: config.scoped_class_links,
        }
    }
}

/// A parse error with its span in component file offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDiagnostic {
    /// `None` for errors in the block structure itself.
    pub block: Option<Block>,
    pub code: ParseErrorCode,
    pub message: String,
    pub span: Span,
}

impl BlockDiagnostic {
    fn new(block: Option<Block>, error: ParseError, base: u32) -> Self {
        let error = error.offset_by(base);
        Self {
            block,
            code: error.code,
            message: error.message,
            span: error.span,
        }
    }
}

/// Virtual documents and maps of one component file version.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub uri: Url,
    pub text: String,
    pub descriptor: SfcDescriptor,
    pub script: Option<TsVirtualCode>,
    pub template: Option<TsVirtualCode>,
    pub template_css: Option<CssVirtualCode>,
    pub template_html: Option<HtmlVirtualCode>,
    pub styles: Vec<CssVirtualCode>,
    pub jsons: Vec<JsonVirtualCode>,
    pub template_data: TemplateScriptData,
    pub diagnostics: Vec<BlockDiagnostic>,
}

impl SourceFile {
    pub fn build(uri: &Url, text: &str, options: &BuildOptions) -> Self {
        let descriptor = parse_sfc(text);
        let mut diagnostics: Vec<BlockDiagnostic> = descriptor
            .errors
            .iter()
            .cloned()
            .map(|error| BlockDiagnostic::new(None, error, 0))
            .collect();

        let styles: Vec<CssVirtualCode> = descriptor
            .styles
            .iter()
            .enumerate()
            .filter_map(|(index, style)| StyleCodeGenerator::new(index).generate(uri, style))
            .collect();

        let jsons: Vec<JsonVirtualCode> = descriptor
            .custom_blocks
            .iter()
            .enumerate()
            .filter_map(|(index, block)| JsonCodeGenerator::new(index).generate(uri, block))
            .collect();

        let script_facts = descriptor.script.as_ref().and_then(|block| {
            analyze_script(&block.content)
                .map_err(|error| {
                    diagnostics.push(BlockDiagnostic::new(Some(Block::Script), error, block.loc.start))
                })
                .ok()
        });
        let setup_facts = descriptor.script_setup.as_ref().and_then(|block| {
            analyze_script_setup(&block.content)
                .map_err(|error| {
                    diagnostics.push(BlockDiagnostic::new(
                        Some(Block::ScriptSetup),
                        error,
                        block.loc.start,
                    ))
                })
                .ok()
        });

        let script = ScriptCodeGenerator::new(ScriptInput {
            source: text,
            script: descriptor.script.as_ref().zip(script_facts.as_ref()),
            script_setup: descriptor.script_setup.as_ref().zip(setup_facts.as_ref()),
        })
        .generate(uri);

        let template_data = derive_template_data(
            script_facts.as_ref(),
            setup_facts.as_ref().zip(descriptor.script_setup.as_ref().map(|b| b.content.as_str())),
            &options.global_components,
        );

        let mut template = None;
        let mut template_css = None;
        let mut template_html = None;
        if let Some(block) = descriptor
            .template
            .as_ref()
            .filter(|block| block.lang().map_or(true, |lang| lang == "html"))
        {
            let ast = parse_template(&block.content);
            diagnostics.extend(
                ast.errors
                    .iter()
                    .cloned()
                    .map(|error| BlockDiagnostic::new(Some(Block::Template), error, block.loc.start)),
            );
            let generated = TemplateCodeGenerator::new(TemplateInput {
                template: block,
                ast: &ast,
                script_data: &template_data,
                styles: &styles,
                scoped_class_links: options.scoped_class_links,
            })
            .generate(uri);
            if let Some(generated) = generated {
                template = Some(generated.ts);
                template_css = Some(generated.css);
                template_html = Some(generated.html);
            }
        }

        tracing::debug!(
            "built {} ({} styles, {} parse errors)",
            uri,
            styles.len(),
            diagnostics.len()
        );

        Self {
            uri: uri.clone(),
            text: text.to_string(),
            descriptor,
            script,
            template,
            template_css,
            template_html,
            styles,
            jsons,
            template_data,
            diagnostics,
        }
    }

    /// Script document first, then the template document.
    pub fn ts_codes(&self) -> impl Iterator<Item = &TsVirtualCode> {
        self.script.iter().chain(self.template.iter())
    }

    /// Style blocks first, then the inline style document.
    pub fn css_codes(&self) -> impl Iterator<Item = &CssVirtualCode> {
        self.styles.iter().chain(self.template_css.iter())
    }

    pub fn ts_code(&self, uri: &Url) -> Option<&TsVirtualCode> {
        self.ts_codes().find(|code| &code.document.uri == uri)
    }

    pub fn css_code(&self, uri: &Url) -> Option<&CssVirtualCode> {
        self.css_codes().find(|code| &code.document.uri == uri)
    }

    /// Whether `uri` is one of this file's virtual documents.
    pub fn owns(&self, uri: &Url) -> bool {
        self.virtual_documents()
            .any(|document| &document.uri == uri)
    }

    pub fn virtual_documents(&self) -> impl Iterator<Item = &VirtualDocument> {
        self.ts_codes()
            .map(|code| &code.document)
            .chain(self.css_codes().map(|code| &code.document))
            .chain(self.template_html.iter().map(|code| &code.document))
            .chain(self.jsons.iter().map(|code| &code.document))
    }

    pub fn json_code(&self, uri: &Url) -> Option<&JsonVirtualCode> {
        self.jsons.iter().find(|code| &code.document.uri == uri)
    }
}

/// Names the template sees: exposed bindings, root `ref:` variables and props for
/// `<script setup>`, props for a plain options object. Components are capitalized
/// setup imports, `components` keys and global components.
fn derive_template_data(
    script: Option<&ScriptFacts>,
    setup: Option<(&ScriptSetupFacts, &str)>,
    global_components: &[CompactString],
) -> TemplateScriptData {
    let mut data = TemplateScriptData::default();
    let export = script.and_then(|facts| facts.export_default.as_ref());

    if let Some((facts, content)) = setup {
        for expose in &facts.exposes {
            data.context.push(expose.text(content).into());
            let imported = facts
                .imports
                .iter()
                .any(|import| import.contains(*expose));
            if imported && expose.text(content).starts_with(|c: char| c.is_ascii_uppercase()) {
                data.components.push(expose.text(content).into());
            }
        }
        for label in &facts.labels {
            for binding in &label.bindings {
                data.context
                    .extend(binding.vars.iter().filter(|var| var.in_root).map(|var| var.name.clone()));
            }
        }
        data.props.extend(facts.props.iter().cloned());
    }
    if let Some(export) = export {
        data.props.extend(export.props.iter().cloned());
        data.components.extend(export.components.iter().cloned());
    }
    data.context.extend(data.props.iter().cloned());
    data.components.extend(global_components.iter().cloned());

    dedup(&mut data.context);
    dedup(&mut data.components);
    dedup(&mut data.props);
    data
}

fn dedup(names: &mut Vec<CompactString>) {
    let mut seen = FxHashSet::default();
    names.retain(|name| seen.insert(name.clone()));
}

//! Template virtual code generation.
//!
//! ```text
//! import { __VLS_options, __VLS_component } from './App.vue';
//! declare const __VLS_ctx ...            component instance
//! declare const __VLS_components ...     element and component types
//! declare const $style: { ... }          CSS module classes
//! declare const __VLS_styleScopedClasses: { ... }
//! declare var count: typeof __VLS_ctx.count;   one per context name
//! /* Interpolations */
//! ...                                    TemplateVisitor output
//! ```
//!
//! The same build produces the companion `.template.css` document for inline styles and
//! the `.template.html` copy for the markup service.

use compact_str::CompactString;
use tessera_carton::{hyphenate, FxHashSet, Span};
use tessera_relief::{SfcBlock, TemplateAst};
use tower_lsp::lsp_types::Url;

use super::{
    virtual_uri, Block, Capabilities, CssVirtualCode, Generator, Mapping, MatchMode, SourceMap,
    TeleportCapabilities, TeleportDirection, TeleportMap, TeleportMappingData, TemplateVisitor,
    TsMappingData, TsVirtualCode, VirtualDocument,
};

/// Names the template can see, derived from the logic blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateScriptData {
    /// Bindings exposed to the template.
    pub context: Vec<CompactString>,
    /// Registered component names.
    pub components: Vec<CompactString>,
    /// Declared prop names.
    pub props: Vec<CompactString>,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateInput<'a> {
    pub template: &'a SfcBlock,
    pub ast: &'a TemplateAst,
    pub script_data: &'a TemplateScriptData,
    /// Style documents of the same file, for `$style` and scoped class names.
    pub styles: &'a [CssVirtualCode],
    pub scoped_class_links: bool,
}

/// The template content as a markup document.
#[derive(Debug, Clone)]
pub struct HtmlVirtualCode {
    pub document: VirtualDocument,
    pub source_map: SourceMap<()>,
}

/// Everything generated from `<template>`.
#[derive(Debug, Clone)]
pub struct TemplateVirtualCode {
    pub ts: TsVirtualCode,
    pub css: CssVirtualCode,
    pub html: HtmlVirtualCode,
}

pub struct TemplateCodeGenerator<'a> {
    input: TemplateInput<'a>,
    gen: Generator<TsMappingData>,
    teleports: Vec<Mapping<TeleportMappingData>>,
}

impl<'a> TemplateCodeGenerator<'a> {
    pub fn new(input: TemplateInput<'a>) -> Self {
        Self {
            input,
            gen: Generator::new(),
            teleports: Vec::new(),
        }
    }

    pub fn generate(mut self, base_uri: &Url) -> Option<TemplateVirtualCode> {
        let ts_uri = virtual_uri(base_uri, ".__VLS_template.ts")?;
        let css_uri = virtual_uri(base_uri, ".template.css")?;
        let html_uri = virtual_uri(base_uri, ".template.html")?;
        let template_start = self.input.template.loc.start;

        let scoped_names = self
            .input
            .styles
            .iter()
            .filter(|style| style.scoped)
            .flat_map(|style| style.class_names.iter().map(|class| class.name.clone()));
        let output = TemplateVisitor::new(&self.input.script_data.components, scoped_names)
            .with_scoped_class_links(self.input.scoped_class_links)
            .visit(self.input.ast);

        let file_name = base_uri
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        self.write_header(file_name, &output.tags);
        self.write_class_declarations("/* CSS Module */\n", "$style", |style| {
            style.module.is_some()
        });
        self.write_class_declarations(
            "/* Style Scoped */\n",
            "__VLS_styleScopedClasses",
            |style| style.scoped,
        );
        self.write_context();

        self.gen.add_text("/* Interpolations */\n");
        let base = self.gen.offset();
        for mapping in output.mappings {
            self.gen
                .push_mapping(mapping.offset_target(base).offset_source(template_start));
        }
        self.gen.add_text(&output.text);

        let (text, mappings) = self.gen.finish();
        tracing::debug!(
            "generated {} ({} bytes, {} mappings)",
            ts_uri,
            text.len(),
            mappings.len()
        );
        let ts = TsVirtualCode {
            document: VirtualDocument::new(ts_uri, "typescript", text),
            source_map: SourceMap::from_mappings(mappings),
            teleports: TeleportMap::from_mappings(self.teleports),
        };

        let css = CssVirtualCode {
            document: VirtualDocument::new(css_uri, "css", output.css_text),
            source_map: output
                .css_mappings
                .into_iter()
                .map(|mapping| mapping.offset_source(template_start))
                .collect(),
            scoped: false,
            module: None,
            class_names: Vec::new(),
        };

        let content = self.input.template.content.as_str();
        let mut html_map = SourceMap::new();
        if !content.is_empty() {
            html_map.push(
                Mapping::new(
                    (),
                    MatchMode::Offset,
                    Span::from_usize(0, content.len()),
                    Span::from_usize(0, content.len()),
                )
                .offset_source(template_start),
            );
        }
        let html = HtmlVirtualCode {
            document: VirtualDocument::new(html_uri, "html", content.to_string()),
            source_map: html_map,
        };

        Some(TemplateVirtualCode { ts, css, html })
    }

    fn write_header(&mut self, file_name: &str, tags: &FxHashSet<CompactString>) {
        let gen = &mut self.gen;
        gen.add_text(&format!(
            "import {{ __VLS_options, __VLS_component }} from './{file_name}';\n"
        ));
        gen.add_text("declare const __VLS_ctx: InstanceType<typeof __VLS_component>;\n");
        gen.add_text("declare const __VLS_vmUnwrap: typeof __VLS_options & { components: { } };\n");
        gen.add_text("declare const __VLS_Components: typeof __VLS_vmUnwrap.components & __VLS_GlobalComponents & __VLS_PickComponents<typeof __VLS_ctx>;\n");

        gen.add_text("/* Components */\n");
        gen.add_text("declare const __VLS_components: JSX.IntrinsicElements & typeof __VLS_Components;\n");
        gen.add_text("declare const __VLS_componentPropsBase: __VLS_MapPropsTypeBase<typeof __VLS_components>;\n");
        gen.add_text("declare const __VLS_componentProps: __VLS_MapPropsType<typeof __VLS_components>;\n");
        gen.add_text("declare const __VLS_componentEmits: __VLS_MapEmitType<typeof __VLS_components>;\n");

        // completion anchors for the components the template actually uses
        let used: Vec<&CompactString> = self
            .input
            .script_data
            .components
            .iter()
            .filter(|name| tags.contains(name.as_str()) || tags.contains(hyphenate(name).as_str()))
            .collect();
        let sections = [
            ("/* Completion: Emits */\n", "__VLS_componentEmits['{}']('');\n"),
            ("/* Completion: Props */\n", "__VLS_componentPropsBase['{}'][''];\n"),
            ("/* Completion: Slots */\n", "__VLS_components['{}'].__VLS_slots[''];\n"),
        ];
        for (title, line) in sections {
            gen.add_text(title);
            for name in &used {
                gen.add_text("// @ts-ignore\n");
                gen.add_text(&line.replace("{}", name));
            }
        }
    }

    /// One `'cls': string,` property per class name, mapped to every selector that
    /// declares it.
    fn write_class_declarations(
        &mut self,
        title: &str,
        name: &str,
        include: impl Fn(&CssVirtualCode) -> bool,
    ) {
        let styles = self.input.styles;
        let mut classes: Vec<(&CompactString, Vec<Span>)> = Vec::new();
        for style in styles.iter().filter(|style| include(style)) {
            for class in &style.class_names {
                match classes.iter_mut().find(|(name, _)| **name == class.name) {
                    Some((_, spans)) => spans.push(class.span),
                    None => classes.push((&class.name, vec![class.span])),
                }
            }
        }

        self.gen.add_text(title);
        self.gen.add_text(&format!("declare const {name}: {{\n"));
        for (class_name, selectors) in classes {
            let start = self.gen.offset();
            let quoted = Span::new(start, start + class_name.len() as u32 + 2);
            let inner = Span::new(start + 1, start + 1 + class_name.len() as u32);
            for selector in selectors {
                self.gen.add_mapping_at(
                    inner,
                    selector,
                    MatchMode::Offset,
                    TsMappingData::new(Block::Style, Capabilities::STYLE_CLASS),
                );
                self.gen.add_mapping_at(
                    quoted,
                    selector,
                    MatchMode::Gate,
                    TsMappingData::new(
                        Block::Style,
                        Capabilities::STYLE_CLASS | Capabilities::REFERENCES_CODE_LENS,
                    ),
                );
            }
            self.gen.add_text(&format!("'{class_name}': string,\n"));
        }
        self.gen.add_text("};\n");
    }

    /// `declare var count: typeof __VLS_ctx.count;` with a teleport from the instance
    /// property to the template-side declaration.
    fn write_context(&mut self) {
        let data = self.input.script_data;
        let props: FxHashSet<&str> = data.props.iter().map(|prop| prop.as_str()).collect();

        self.gen.add_text("/* Props */\n");
        for name in &data.context {
            self.gen.add_text("declare var ");
            let template_side = self.gen.add_text(name);
            self.gen.add_text(": typeof __VLS_ctx.");
            let script_side = self.gen.add_text(name);
            self.gen.add_text(";");
            self.teleports.push(Mapping::new(
                TeleportMappingData::new(
                    TeleportDirection::ScriptToTemplate,
                    TeleportCapabilities::all(),
                ),
                MatchMode::Offset,
                script_side,
                template_side,
            ));

            if props.contains(name.as_str()) {
                self.gen.add_text(" __VLS_options.props.");
                let option_side = self.gen.add_text(name);
                self.gen.add_text(";");
                self.teleports.push(Mapping::new(
                    TeleportMappingData::new(
                        TeleportDirection::ScriptToTemplate,
                        TeleportCapabilities::all(),
                    )
                    .additional_reference(),
                    MatchMode::Offset,
                    option_side,
                    template_side,
                ));
            }
            self.gen.add_text("\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_code::StyleCodeGenerator;
    use tessera_armature::{parse_sfc, parse_template};

    fn build(source: &str, data: &TemplateScriptData) -> TemplateVirtualCode {
        let descriptor = parse_sfc(source);
        let base = Url::parse("file:///app/App.vue").unwrap();
        let styles: Vec<_> = descriptor
            .styles
            .iter()
            .enumerate()
            .filter_map(|(index, style)| StyleCodeGenerator::new(index).generate(&base, style))
            .collect();
        let template = descriptor.template.as_ref().unwrap();
        let ast = parse_template(&template.content);
        TemplateCodeGenerator::new(TemplateInput {
            template,
            ast: &ast,
            script_data: data,
            styles: &styles,
            scoped_class_links: true,
        })
        .generate(&base)
        .unwrap()
    }

    fn offset_of(text: &str, needle: &str) -> u32 {
        text.find(needle).unwrap() as u32
    }

    #[test]
    fn test_header_and_names() {
        let code = build("<template><div /></template>", &TemplateScriptData::default());
        let text = &code.ts.document.text;
        assert!(text.starts_with("import { __VLS_options, __VLS_component } from './App.vue';\n"));
        assert!(text.contains("/* CSS Module */\ndeclare const $style: {\n};\n"));
        assert!(text.contains("/* Interpolations */\n{\n{\n__VLS_components.div;\n"));
        assert_eq!(
            code.ts.document.uri.as_str(),
            "file:///app/App.vue.__VLS_template.ts"
        );
        assert_eq!(code.css.document.uri.as_str(), "file:///app/App.vue.template.css");
        assert_eq!(code.html.document.uri.as_str(), "file:///app/App.vue.template.html");
        assert_eq!(code.html.document.text, "<div />");
    }

    #[test]
    fn test_interpolation_maps_to_file_offsets() {
        let source = "<template>{{ count }}</template>";
        let data = TemplateScriptData {
            context: vec!["count".into()],
            ..Default::default()
        };
        let code = build(source, &data);
        let text = &code.ts.document.text;

        let expr = offset_of(text, "{ count };") + 2;
        let hit = code
            .ts
            .source_map
            .to_source(Span::new(expr, expr + 5))
            .unwrap();
        assert_eq!(hit.range.text(source), "count");
        assert_eq!(hit.data.block, Block::Template);
    }

    #[test]
    fn test_context_teleports() {
        let data = TemplateScriptData {
            context: vec!["msg".into(), "count".into()],
            props: vec!["msg".into()],
            ..Default::default()
        };
        let code = build("<template><p /></template>", &data);
        let text = &code.ts.document.text;
        assert!(text.contains(
            "/* Props */\ndeclare var msg: typeof __VLS_ctx.msg; __VLS_options.props.msg;\ndeclare var count: typeof __VLS_ctx.count;\n"
        ));

        let template_side = offset_of(text, "declare var msg") + 12;
        let script_side = offset_of(text, "__VLS_ctx.msg") + 10;
        let option_side = offset_of(text, "__VLS_options.props.msg") + 20;
        let template_range = Span::new(template_side, template_side + 3);

        let from_script = code
            .ts
            .teleports
            .find_teleports(Span::new(script_side, script_side + 3), Block::Script);
        assert_eq!(from_script.len(), 1);
        assert_eq!(from_script[0].range, template_range);

        let from_template = code
            .ts
            .teleports
            .find_teleports(template_range, Block::Template);
        let ranges: Vec<_> = from_template.iter().map(|hop| hop.range).collect();
        assert_eq!(
            ranges,
            vec![
                Span::new(script_side, script_side + 3),
                Span::new(option_side, option_side + 3)
            ]
        );
        assert!(from_template[1].data.is_additional_reference);
    }

    #[test]
    fn test_scoped_class_declaration() {
        let source = "<template><div class=\"title\" /></template>\n<style scoped>\n.title { color: red }\n.title:hover {}\n</style>\n";
        let code = build(source, &TemplateScriptData::default());
        let text = &code.ts.document.text;
        assert!(text.contains("declare const __VLS_styleScopedClasses: {\n'title': string,\n};\n"));

        let name = offset_of(text, "'title': string") + 1;
        let targets = code.ts.source_map.all_to_sources(Span::new(name, name + 5));
        let first_selector = offset_of(source, ".title {");
        assert_eq!(targets[0].range, Span::new(first_selector, first_selector + 6));
        assert_eq!(targets[0].data.block, Block::Style);
        assert!(!targets[0].data.has(Capabilities::REFERENCES_CODE_LENS));

        let gate = code
            .ts
            .source_map
            .all_to_sources(Span::new(name - 1, name + 6));
        assert!(gate
            .iter()
            .all(|hit| hit.data.has(Capabilities::REFERENCES_CODE_LENS)));
        assert_eq!(gate.len(), 2);
    }

    #[test]
    fn test_module_classes() {
        let source = "<template><p :class=\"$style.red\" /></template>\n<style module>\n.red {}\n</style>\n";
        let code = build(source, &TemplateScriptData::default());
        assert!(code
            .ts
            .document
            .text
            .contains("/* CSS Module */\ndeclare const $style: {\n'red': string,\n};\n"));
    }

    #[test]
    fn test_inline_css_document() {
        let source = "<template><b style=\"font-weight: 400\" /></template>";
        let code = build(source, &TemplateScriptData::default());
        assert_eq!(code.css.document.text, "b { font-weight: 400 }\n");
        let hit = code.css.source_map.to_source(Span::new(4, 20)).unwrap();
        assert_eq!(hit.range.text(source), "font-weight: 400");
    }

    #[test]
    fn test_completion_anchors_for_used_components() {
        let data = TemplateScriptData {
            components: vec!["MyButton".into(), "Unused".into()],
            ..Default::default()
        };
        let code = build("<template><my-button /></template>", &data);
        let text = &code.ts.document.text;
        assert!(text.contains("__VLS_componentEmits['MyButton']('');\n"));
        assert!(!text.contains("__VLS_componentEmits['Unused']"));
    }
}

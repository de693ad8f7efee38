//! Script virtual code generation.
//!
//! `<script>` and `<script setup>` are compiled into one program:
//!
//! 1. `export * from '<src>'` when `<script src>` is used
//! 2. the `<script>` content, with `export default` blanked when a setup block exists
//! 3. the `<script setup>` content wrapped in `defineComponent({ async setup() { ... } })`,
//!    with `ref:` labels expanded and every top-level binding returned
//! 4. `export const __VLS_options`, the options object the template document reads
//!
//! Mapping source ranges are block relative while generating and are shifted to file
//! offsets when the source map is assembled.

use tessera_carton::Span;
use tessera_relief::{LabelBinding, ScriptFacts, ScriptSetupFacts, SfcBlock};
use tower_lsp::lsp_types::Url;

use super::{
    script_language_id, virtual_uri, Block, Capabilities, Generator, Mapping, MatchMode,
    NameTransform, SourceMap, TeleportCapabilities, TeleportDirection, TeleportMap,
    TeleportMappingData, TsMappingData, TsVirtualCode, VirtualDocument,
};

const VALID_SCRIPT_LANGS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Blocks that analyzed successfully. A block whose analysis failed is left out.
#[derive(Debug, Clone, Copy)]
pub struct ScriptInput<'a> {
    /// The whole component file.
    pub source: &'a str,
    pub script: Option<(&'a SfcBlock, &'a ScriptFacts)>,
    pub script_setup: Option<(&'a SfcBlock, &'a ScriptSetupFacts)>,
}

impl ScriptInput<'_> {
    /// `lang` of the generated document: the setup block's, then the script block's.
    pub fn lang(&self) -> &'static str {
        let setup_lang = self.script_setup.and_then(|(block, _)| block.lang());
        let script_lang = self.script.and_then(|(block, _)| block.lang());
        let lang = setup_lang
            .filter(|lang| *lang != "js")
            .or(script_lang.filter(|lang| *lang != "js"))
            .unwrap_or("js");
        VALID_SCRIPT_LANGS
            .iter()
            .find(|valid| **valid == lang)
            .copied()
            .unwrap_or("js")
    }
}

pub struct ScriptCodeGenerator<'a> {
    input: ScriptInput<'a>,
    gen: Generator<TsMappingData>,
    teleports: Vec<Mapping<TeleportMappingData>>,
}

impl<'a> ScriptCodeGenerator<'a> {
    pub fn new(input: ScriptInput<'a>) -> Self {
        Self {
            input,
            gen: Generator::new(),
            teleports: Vec::new(),
        }
    }

    /// Build `<base>.__VLS_script.<lang>`, or `None` without any usable logic block.
    pub fn generate(mut self, base_uri: &Url) -> Option<TsVirtualCode> {
        if self.input.script.is_none() && self.input.script_setup.is_none() {
            return None;
        }
        let lang = self.input.lang();
        let uri = virtual_uri(base_uri, &format!(".__VLS_script.{lang}"))?;

        self.write_script_src();
        self.write_script();
        self.write_script_setup();
        self.write_export_options();

        let input = self.input;
        let (text, mappings) = self.gen.finish();
        let source_map = mappings
            .into_iter()
            .filter_map(|mapping| assemble(&input, mapping))
            .collect::<SourceMap<_>>();

        tracing::debug!(
            "generated {} ({} bytes, {} mappings, {} teleports)",
            uri,
            text.len(),
            source_map.len(),
            self.teleports.len()
        );

        Some(TsVirtualCode {
            document: VirtualDocument::new(uri, script_language_id(lang), text),
            source_map,
            teleports: TeleportMap::from_mappings(self.teleports),
        })
    }

    fn write_script_src(&mut self) {
        let Some(src) = self.input.script.and_then(|(block, _)| block.src()) else {
            return;
        };
        self.gen.add_text("export * from ");
        self.gen.add_code(
            &format!("'{src}'"),
            Span::empty(0),
            MatchMode::Offset,
            TsMappingData::new(Block::ScriptSrc, Capabilities::SCRIPT),
        );
        self.gen.add_text(";\n");
        self.gen
            .add_text(&format!("import __VLS_ScriptSrc from '{src}';\n"));
        self.gen.add_text("export default __VLS_ScriptSrc;\n");
    }

    fn write_script(&mut self) {
        let Some((block, facts)) = self.input.script else {
            return;
        };
        let mut content = block.content.clone();
        if self.input.script_setup.is_some() {
            if let Some(export) = &facts.export_default {
                blank_range(&mut content, export.span);
            }
        }
        self.gen.add_code(
            &content,
            Span::from_usize(0, content.len()),
            MatchMode::Offset,
            TsMappingData::new(Block::Script, Capabilities::SCRIPT),
        );
    }

    fn write_script_setup(&mut self) {
        let Some((block, facts)) = self.input.script_setup else {
            return;
        };
        let original = block.content.as_str();
        let mut source_code = original.to_string();

        self.gen.add_text("\n/* <script setup> */\n");

        let newlines_only = newlines_only(original);
        let mut imports = facts.imports.clone();
        imports.sort_by_key(|span| span.start);
        let mut import_pos = 0;
        for import in imports {
            if import.start < import_pos {
                continue;
            }
            self.gen.add_code(
                Span::new(import_pos, import.start).text(&newlines_only),
                Span::new(import_pos, import.start),
                MatchMode::Offset,
                setup_data(Capabilities::empty()),
            );
            self.gen.add_code(
                import.text(original),
                import,
                MatchMode::Offset,
                setup_data(Capabilities::SCRIPT_SETUP),
            );
            blank_range(&mut source_code, import);
            import_pos = import.end;
        }
        let tail = Span::from_usize(import_pos as usize, newlines_only.len());
        self.gen.add_code(
            tail.text(&newlines_only),
            tail,
            MatchMode::Offset,
            setup_data(Capabilities::empty()),
        );

        self.gen.add_text("\n");
        self.gen
            .add_text("export default (await import('__VLS_vue')).defineComponent({\n");
        if let Some(type_args) = facts.define_props.and_then(|call| call.type_args) {
            self.gen.add_text("props: ({} as __VLS_DefinePropsToOptions<");
            self.gen.add_code(
                type_args.text(original),
                type_args,
                MatchMode::Offset,
                setup_data(Capabilities::empty()),
            );
            self.gen.add_text(">),\n");
        }
        if let Some(type_args) = facts.define_emit.and_then(|call| call.type_args) {
            self.gen.add_text("emits: ({} as __VLS_ConstructorOverloads<");
            self.gen.add_code(
                type_args.text(original),
                type_args,
                MatchMode::Offset,
                setup_data(Capabilities::empty()),
            );
            self.gen.add_text(">),\n");
        }
        for (key, call) in [("props", facts.define_props), ("emits", facts.define_emit)] {
            if let Some(args) = call.and_then(|call| call.args) {
                self.gen.add_text(key);
                self.gen.add_text(": ");
                self.gen.add_code(
                    args.text(original),
                    args,
                    MatchMode::Offset,
                    setup_data(Capabilities::SCRIPT_SETUP),
                );
                self.gen.add_text(",\n");
            }
        }
        self.gen.add_text("async ");
        self.gen.add_code(
            "setup",
            Span::empty(0),
            MatchMode::Gate,
            setup_data(Capabilities::empty()),
        );
        self.gen.add_text("() {\n");

        let mut labels: Vec<_> = facts.labels.iter().collect();
        labels.sort_by_key(|label| label.span.start);
        let mut ts_offset = 0;
        for label in labels {
            self.map_sub_text(&source_code, Span::new(ts_offset, label.span.start));
            let scope_vars = self.write_label_scope(original, &label.bindings);
            self.write_label_refs(original, &source_code, &label.bindings);
            let mut scope_vars = scope_vars.into_iter();
            for binding in &label.bindings {
                self.write_label_vars(binding, &mut scope_vars);
            }
            ts_offset = label.span.end;
        }
        self.map_sub_text(
            &source_code,
            Span::from_usize(ts_offset as usize, source_code.len()),
        );

        self.gen.add_text("return {\n");
        for expose in &facts.exposes {
            self.write_return_property(expose.text(original), *expose, ",\n");
        }
        for label in &facts.labels {
            for binding in &label.bindings {
                for var in binding.vars.iter().filter(|var| var.in_root) {
                    self.write_return_property(&var.name, var.span, ", \n");
                }
            }
        }
        self.gen.add_text("};\n");
        self.gen.add_text("}});\n");
    }

    /// `{ let a = 1, b = 2; }`: a scope where the label's left-hand sides are plain
    /// declarations, so go-to-definition and rename land on them.
    ///
    /// Returns where each variable landed, in binding then variable order.
    fn write_label_scope(&mut self, original: &str, bindings: &[LabelBinding]) -> Vec<Span> {
        let mut scope_vars = Vec::new();
        self.gen.add_text("{ ");
        for (index, binding) in bindings.iter().enumerate() {
            self.gen.add_text(if index == 0 { "let " } else { ", " });
            let left_start = self.gen.offset();
            scope_vars.extend(binding.vars.iter().map(|var| {
                Span::new(
                    left_start + var.span.start - binding.left.start,
                    left_start + var.span.end - binding.left.start,
                )
            }));
            self.gen.add_code(
                binding.left.text(original),
                binding.left,
                MatchMode::Offset,
                setup_data(
                    Capabilities::COMPLETION
                        | Capabilities::DEFINITIONS
                        | Capabilities::SEMANTIC_TOKENS
                        | Capabilities::RENAME,
                ),
            );
            if let Some(right) = binding.right {
                self.gen.add_text(" = ");
                self.gen.add_text(right.text(original));
            }
        }
        self.gen.add_text("; }\n");
        scope_vars
    }

    /// `const { a: __VLS_refs_a } = <right>;`: the raw refs, destructured the same way.
    fn write_label_refs(&mut self, original: &str, source_code: &str, bindings: &[LabelBinding]) {
        for (index, binding) in bindings.iter().enumerate() {
            self.gen.add_text(if index == 0 { "const " } else { ", " });
            let mut left_pos = binding.left.start;
            let mut vars: Vec<_> = binding.vars.iter().collect();
            vars.sort_by_key(|var| var.span.start);
            for var in vars {
                self.gen
                    .add_text(Span::new(left_pos, var.span.start).text(original));
                if var.is_shorthand {
                    self.gen.add_code(
                        &var.name,
                        var.span,
                        MatchMode::Offset,
                        setup_data(Capabilities::DIAGNOSTIC),
                    );
                    self.gen.add_text(": ");
                }
                self.gen.add_code(
                    &format!("__VLS_refs_{}", var.name),
                    var.span,
                    MatchMode::Gate,
                    setup_data(Capabilities::DIAGNOSTIC),
                );
                left_pos = var.span.end;
            }
            self.gen
                .add_text(Span::new(left_pos, binding.left.end).text(original));
            if let Some(right) = binding.right {
                self.gen.add_text(" = ");
                self.map_sub_text(source_code, right);
            }
        }
        self.gen.add_text(";\n");
    }

    /// The unwrapped binding `x` and the ref handle `$x` for every label variable, with
    /// the teleports that tie them to the declaration scope and to each other.
    fn write_label_vars(&mut self, binding: &LabelBinding, scope_vars: &mut impl Iterator<Item = Span>) {
        for var in &binding.vars {
            let refs_name = format!("__VLS_refs_{}", var.name);

            self.gen.add_text("let ");
            let ref_var = self.gen.add_code(
                &var.name,
                var.span,
                MatchMode::Offset,
                setup_data(Capabilities::BASIC | Capabilities::REFERENCES | Capabilities::DIAGNOSTIC),
            );
            self.gen.add_text(" = (await import('__VLS_vue')).unref(");
            self.write_refs_handle(&refs_name, binding.right);
            self.gen.add_text(&format!("); {};\n", var.name));

            self.gen.add_text("const ");
            let dollar_var = self.gen.add_code(
                &format!("${}", var.name),
                var.span,
                MatchMode::Offset,
                setup_data(Capabilities::BASIC | Capabilities::DIAGNOSTIC)
                    .with_before_rename(NameTransform::StripDollarPrefix),
            );
            self.gen.add_text(" = (await import('__VLS_vue')).ref(");
            self.write_refs_handle(&refs_name, binding.right);
            self.gen.add_text(&format!("); ${};\n", var.name));

            if let Some(scope_var) = scope_vars.next() {
                self.teleports.push(Mapping::new(
                    TeleportMappingData::new(
                        TeleportDirection::Sibling,
                        TeleportCapabilities::REFERENCES | TeleportCapabilities::RENAME,
                    ),
                    MatchMode::Offset,
                    scope_var,
                    ref_var,
                ));
            }
            self.teleports.push(
                Mapping::new(
                    TeleportMappingData::new(
                        TeleportDirection::Sibling,
                        TeleportCapabilities::REFERENCES | TeleportCapabilities::RENAME,
                    )
                    .with_rename_transforms(
                        NameTransform::AddDollarPrefix,
                        NameTransform::StripDollarPrefix,
                    ),
                    MatchMode::Gate,
                    ref_var,
                    dollar_var,
                )
                .with_alternate(
                    MatchMode::Offset,
                    ref_var,
                    Span::new(dollar_var.start + 1, dollar_var.end),
                ),
            );
        }
    }

    fn write_refs_handle(&mut self, refs_name: &str, right: Option<Span>) {
        match right {
            Some(right) => {
                self.gen.add_code(
                    refs_name,
                    right,
                    MatchMode::Offset,
                    setup_data(Capabilities::empty()),
                );
            }
            None => {
                self.gen.add_text(refs_name);
            }
        }
    }

    fn write_return_property(&mut self, name: &str, span: Span, separator: &str) {
        let template_side = self.gen.add_code(
            name,
            span,
            MatchMode::Offset,
            setup_data(Capabilities::empty()),
        );
        self.gen.add_text(": ");
        let script_side = self.gen.add_code(
            name,
            span,
            MatchMode::Offset,
            setup_data(Capabilities::empty()),
        );
        self.gen.add_text(separator);
        self.teleports.push(Mapping::new(
            TeleportMappingData::new(
                TeleportDirection::ScriptToTemplate,
                TeleportCapabilities::all(),
            ),
            MatchMode::Offset,
            script_side,
            template_side,
        ));
    }

    fn map_sub_text(&mut self, source_code: &str, span: Span) {
        self.gen.add_code(
            span.text(source_code),
            span,
            MatchMode::Offset,
            setup_data(Capabilities::SCRIPT_SETUP),
        );
    }

    fn write_export_options(&mut self) {
        self.gen.add_text("\nexport const __VLS_options = {\n");
        self.gen.add_text("...(");
        let options = self
            .input
            .script
            .and_then(|(block, facts)| Some((block, facts.export_default.as_ref()?.options?)));
        match options {
            Some((block, options)) => {
                self.gen.add_code(
                    options.text(&block.content),
                    options,
                    MatchMode::Offset,
                    TsMappingData::new(Block::Script, Capabilities::OPTIONS),
                );
            }
            None => {
                self.gen.add_text("{}");
            }
        }
        self.gen.add_text("),\n");

        if let Some((block, facts)) = self.input.script_setup {
            let content = block.content.as_str();
            let props = facts.define_props;
            let entries = [
                ("props: (", props.and_then(|call| call.args)),
                ("props: ({} as ", props.and_then(|call| call.type_args)),
                ("emits: (", facts.define_emit.and_then(|call| call.args)),
            ];
            for (head, span) in entries {
                let Some(span) = span else {
                    continue;
                };
                self.gen.add_text(head);
                self.gen.add_code(
                    span.text(content),
                    span,
                    MatchMode::Offset,
                    setup_data(Capabilities::OPTIONS),
                );
                self.gen.add_text("),\n");
            }
        }
        self.gen.add_text("};\n");
    }
}

fn setup_data(capabilities: Capabilities) -> TsMappingData {
    TsMappingData::new(Block::ScriptSetup, capabilities)
}

/// Shift a block-relative mapping to file offsets.
fn assemble(input: &ScriptInput<'_>, mapping: Mapping<TsMappingData>) -> Option<Mapping<TsMappingData>> {
    match mapping.data.block {
        Block::Script => {
            let (block, _) = input.script?;
            Some(mapping.offset_source(block.loc.start))
        }
        Block::ScriptSetup => {
            let (block, _) = input.script_setup?;
            Some(mapping.offset_source(block.loc.start))
        }
        Block::ScriptSrc => {
            let (block, _) = input.script?;
            let value = block.attr("src")?.value_span?;
            let quoted = quoted_span(input.source, value);
            Some(Mapping {
                source_range: quoted,
                ..mapping
            })
        }
        Block::Template | Block::Style => Some(mapping),
    }
}

/// Widen `value` over its surrounding quotes when they are present.
fn quoted_span(source: &str, value: Span) -> Span {
    let bytes = source.as_bytes();
    let start = value.start as usize;
    let end = value.end as usize;
    let is_quote = |byte: Option<&u8>| matches!(byte, Some(b'"' | b'\''));
    if start > 0 && is_quote(bytes.get(start - 1)) && is_quote(bytes.get(end)) {
        Span::from_usize(start - 1, end + 1)
    } else {
        value
    }
}

/// Same byte length as `source`, keeping only line breaks.
fn newlines_only(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    for ch in source.chars() {
        if ch == '\n' {
            result.push('\n');
        } else {
            result.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    }
    result
}

/// Replace `span` with a comment of the same byte length, or spaces when it is shorter
/// than four bytes.
fn blank_range(text: &mut String, span: Span) {
    let range = span.as_range();
    if range.end > text.len() || !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end)
    {
        return;
    }
    let len = range.len();
    let filler = if len >= 4 {
        format!("/*{}*/", " ".repeat(len - 4))
    } else {
        " ".repeat(len)
    };
    text.replace_range(range, &filler);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_armature::{analyze_script, analyze_script_setup, parse_sfc};
    use tessera_relief::SfcDescriptor;

    fn uri() -> Url {
        Url::parse("file:///project/App.vue").unwrap()
    }

    fn generate(source: &str) -> (SfcDescriptor, TsVirtualCode) {
        let descriptor = parse_sfc(source);
        let script_facts = descriptor
            .script
            .as_ref()
            .map(|block| analyze_script(&block.content).unwrap());
        let setup_facts = descriptor
            .script_setup
            .as_ref()
            .map(|block| analyze_script_setup(&block.content).unwrap());
        let input = ScriptInput {
            source,
            script: descriptor.script.as_ref().zip(script_facts.as_ref()),
            script_setup: descriptor.script_setup.as_ref().zip(setup_facts.as_ref()),
        };
        let code = ScriptCodeGenerator::new(input).generate(&uri()).unwrap();
        (descriptor, code)
    }

    fn offset_of(text: &str, needle: &str) -> u32 {
        text.find(needle).unwrap() as u32
    }

    #[test]
    fn test_blank_range() {
        let mut text = "abc export default {} xyz".to_string();
        blank_range(&mut text, Span::new(4, 21));
        assert_eq!(text, format!("abc /*{}*/ xyz", " ".repeat(13)));
        assert_eq!(text.len(), 25);

        let mut short = "a = 1".to_string();
        blank_range(&mut short, Span::new(1, 4));
        assert_eq!(short, "a   1");
    }

    #[test]
    fn test_newlines_only_keeps_length() {
        let source = "const é = 1\nfoo()";
        let blank = newlines_only(source);
        assert_eq!(blank.len(), source.len());
        assert_eq!(blank.find('\n'), source.find('\n'));
        assert!(blank.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_script_only_document() {
        let source = "<script>\nexport default { props: { msg: String } }\n</script>\n";
        let (descriptor, code) = generate(source);
        let text = &code.document.text;

        assert!(code.document.uri.as_str().ends_with("App.vue.__VLS_script.js"));
        assert_eq!(code.document.language_id, "javascript");
        assert!(text.starts_with("\nexport default { props: { msg: String } }\n"));
        assert!(text.contains("export const __VLS_options = {\n...({ props: { msg: String } }),\n};\n"));

        // `msg` in the original maps into the copied content first
        let block_start = descriptor.script.unwrap().loc.start;
        let msg = offset_of(source, "msg");
        let hits = code.source_map.all_to_targets(Span::new(msg, msg + 3));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].range, Span::new(msg - block_start, msg - block_start + 3));
        assert_eq!(hits[0].data.block, Block::Script);
        assert!(hits[1].data.has(Capabilities::REFERENCES));
        assert!(!hits[1].data.has(Capabilities::DIAGNOSTIC));
    }

    #[test]
    fn test_export_default_blanked_with_setup() {
        let source = "<script>\nexport default { name: 'A' }\n</script>\n<script setup>\nconst a = 1\n</script>\n";
        let (_, code) = generate(source);
        let text = &code.document.text;

        assert!(text.starts_with("\n/*"));
        assert!(!text.starts_with("\nexport default { name"));
        assert!(text.contains("...({ name: 'A' }),"));
        assert!(text.contains("\n/* <script setup> */\n"));
    }

    #[test]
    fn test_setup_returns_exposed_bindings() {
        let source = "<script setup lang=\"ts\">\nimport { ref } from 'vue'\nconst count = ref(0)\nfunction inc() { count.value++ }\n</script>\n";
        let (_, code) = generate(source);
        let text = &code.document.text;

        assert!(code.document.uri.as_str().ends_with(".__VLS_script.ts"));
        assert!(text.contains("export default (await import('__VLS_vue')).defineComponent({\n"));
        assert!(text.contains("async setup() {\n"));
        assert!(text.contains("return {\nref: ref,\ncount: count,\ninc: inc,\n};\n}});\n"));
        // the import is copied verbatim, the body has it blanked
        assert_eq!(text.matches("import { ref } from 'vue'").count(), 1);

        let key = offset_of(text, "count: count");
        let value = key + "count: ".len() as u32;
        let teleports = code
            .teleports
            .find_teleports(Span::new(value, value + 5), Block::ScriptSetup);
        assert_eq!(teleports.len(), 1);
        assert_eq!(teleports[0].range, Span::new(key, key + 5));
        assert!(code
            .teleports
            .find_teleports(Span::new(value, value + 5), Block::Template)
            .is_empty());
    }

    #[test]
    fn test_define_props_type_args() {
        let source = "<script setup lang=\"ts\">\nconst props = defineProps<{ msg: string }>()\n</script>\n";
        let (_, code) = generate(source);
        let text = &code.document.text;

        assert!(text.contains("props: ({} as __VLS_DefinePropsToOptions<{ msg: string }>),\n"));
        assert!(text.contains("props: ({} as { msg: string }),\n"));
    }

    #[test]
    fn test_ref_label_expansion() {
        let source = "<script setup>\nref: total = 1\n</script>\n";
        let (descriptor, code) = generate(source);
        let text = &code.document.text;

        assert!(text.contains("{ let total = 1; }\n"));
        assert!(text.contains("const __VLS_refs_total = 1;\n"));
        assert!(text.contains("let total = (await import('__VLS_vue')).unref(__VLS_refs_total); total;\n"));
        assert!(text.contains("const $total = (await import('__VLS_vue')).ref(__VLS_refs_total); $total;\n"));
        assert!(text.contains("total: total, \n"));

        // the handle's value maps back to the right-hand side
        let block_start = descriptor.script_setup.unwrap().loc.start;
        let refs = offset_of(text, "unref(__VLS_refs_total)") + "unref(".len() as u32;
        let one = offset_of(source, "= 1") + 2;
        let hit = code
            .source_map
            .all_to_sources(Span::new(refs, refs + 16))
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(hit.range, Span::new(one, one + 1));
        assert!(hit.data.capabilities.is_empty());
        assert!(one > block_start);

        // the scope declaration teleports to the unwrapped binding
        let scope = offset_of(text, "{ let total") + "{ let ".len() as u32;
        let unwrapped = offset_of(text, "let total = (await") + "let ".len() as u32;
        let hops = code
            .teleports
            .find_teleports(Span::new(scope, scope + 5), Block::ScriptSetup);
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].range, Span::new(unwrapped, unwrapped + 5));

        // the unwrapped binding reaches the handle, adding the prefix on rename
        let dollar = offset_of(text, "$total = ");
        let hops = code
            .teleports
            .find_teleports(Span::new(unwrapped, unwrapped + 5), Block::ScriptSetup);
        let to_handle = hops
            .iter()
            .find(|hop| hop.range == Span::new(dollar, dollar + 6))
            .unwrap();
        assert_eq!(to_handle.rename_text("sum"), "$sum");

        // and back
        let hops = code
            .teleports
            .find_teleports(Span::new(dollar, dollar + 6), Block::ScriptSetup);
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].range, Span::new(unwrapped, unwrapped + 5));
        assert_eq!(hops[0].rename_text("$sum"), "sum");
    }

    #[test]
    fn test_script_src_maps_quoted_value() {
        let source = "<script src=\"./logic.ts\"></script>\n";
        let (_, code) = generate(source);
        let text = &code.document.text;

        assert!(text.starts_with("export * from './logic.ts';\nimport __VLS_ScriptSrc from './logic.ts';\n"));
        let quoted = offset_of(source, "\"./logic.ts\"");
        let hit = code
            .source_map
            .to_source(Span::new(14, 26))
            .unwrap();
        assert_eq!(hit.data.block, Block::ScriptSrc);
        assert_eq!(hit.range, Span::new(quoted, quoted + 12));
    }
}

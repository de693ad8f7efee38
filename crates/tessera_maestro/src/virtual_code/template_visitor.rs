//! Template AST to TypeScript.
//!
//! The visitor walks the template once and writes a statement block per element. All
//! mappings point into the template content (block relative). [`super::TemplateCodeGenerator`]
//! places the output under its header and shifts everything to file offsets.

use compact_str::CompactString;
use once_cell::sync::Lazy;
use regex::Regex;
use tessera_carton::{camelize, hyphenate, is_simple_identifier, FxHashMap, FxHashSet, Span};
use tessera_relief::{
    AttributeNode, DirectiveNode, ElementNode, ForNode, IfNode, InterpolationNode, PropNode,
    TemplateAst, TemplateNode,
};

use super::{Block, Capabilities, EditTransform, Generator, Mapping, MatchMode, TsMappingData};

/// `foo`, `foo.bar`, `foo['bar']`: handlers passed through without a wrapper.
static MEMBER_PATH: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^\s*[A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*|\s*\[[^\]]+\])*\s*$").ok()
});

/// Arrow functions and `function` expressions.
static FUNCTION_EXPRESSION: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[\w$]+|(?:async\s*)?\([^)]*?\))\s*(?::[^=]+)?=>|^\s*(?:async\s+)?function(?:\s+[\w$]+)?\s*\(")
        .ok()
});

/// What the walk produced.
#[derive(Debug, Default)]
pub struct VisitorOutput {
    pub text: String,
    pub mappings: Vec<Mapping<TsMappingData>>,
    /// Inline `style` attributes as rules.
    pub css_text: String,
    pub css_mappings: Vec<Mapping<()>>,
    /// Component names of every element, as used in the generated code.
    pub tags: FxHashSet<CompactString>,
}

struct SlotExport {
    name: CompactString,
    var_name: String,
    tag_span: Span,
}

pub struct TemplateVisitor {
    gen: Generator<TsMappingData>,
    css: Generator<()>,
    tags: FxHashSet<CompactString>,
    slots: Vec<SlotExport>,
    element_index: u32,
    /// Hyphenated spelling to registered name.
    components: FxHashMap<String, CompactString>,
    scoped_classes: FxHashSet<CompactString>,
    scoped_class_links: bool,
    /// Tags of the elements being visited, innermost last.
    ancestors: Vec<CompactString>,
}

impl TemplateVisitor {
    pub fn new<'c>(
        components: impl IntoIterator<Item = &'c CompactString>,
        scoped_classes: impl IntoIterator<Item = CompactString>,
    ) -> Self {
        Self {
            gen: Generator::new(),
            css: Generator::new(),
            tags: FxHashSet::default(),
            slots: Vec::new(),
            element_index: 0,
            components: components
                .into_iter()
                .map(|name| (hyphenate(name), name.clone()))
                .collect(),
            scoped_classes: scoped_classes.into_iter().collect(),
            scoped_class_links: true,
            ancestors: Vec::new(),
        }
    }

    /// Whether class names found in scoped styles get a document link.
    pub fn with_scoped_class_links(mut self, enabled: bool) -> Self {
        self.scoped_class_links = enabled;
        self
    }

    pub fn visit(mut self, ast: &TemplateAst) -> VisitorOutput {
        for child in &ast.children {
            self.gen.add_text("{\n");
            self.visit_node(child);
            self.gen.add_text("}\n");
        }
        self.write_slot_exports();

        let (text, mappings) = self.gen.finish();
        let (css_text, css_mappings) = self.css.finish();
        VisitorOutput {
            text,
            mappings,
            css_text,
            css_mappings,
            tags: self.tags,
        }
    }

    fn visit_node(&mut self, node: &TemplateNode) {
        match node {
            TemplateNode::Element(el) => self.visit_element(el),
            TemplateNode::Interpolation(interp) => self.visit_interpolation(interp),
            TemplateNode::If(node) => self.visit_if(node),
            TemplateNode::For(node) => self.visit_for(node),
            TemplateNode::Text(_) | TemplateNode::Comment(_) => {}
        }
    }

    fn visit_element(&mut self, el: &ElementNode) {
        self.gen.add_text("{\n");
        let component = self.component_name(&el.tag);
        self.tags.insert(component);
        self.ancestors.push(el.tag.clone());

        self.write_inline_css(el);
        self.write_import_slots(el);
        self.write_bare_directives(el);
        self.write_element_refs(el);
        self.write_props(el, false);
        self.write_props(el, true);
        self.write_scoped_classes(el);
        self.write_events(el);
        self.write_option_references(el);
        self.write_slot(el);

        for child in &el.children {
            self.visit_node(child);
        }

        self.ancestors.pop();
        self.gen.add_text("}\n");
    }

    fn visit_interpolation(&mut self, interp: &InterpolationNode) {
        self.gen.add_text("{");
        self.write_code(
            false,
            &interp.content.content,
            MatchMode::Offset,
            Capabilities::ALL,
            interp.content.span,
        );
        self.gen.add_text("};\n");
    }

    fn visit_if(&mut self, node: &IfNode) {
        let mut first = true;
        for branch in &node.branches {
            match &branch.condition {
                Some(condition) => {
                    self.gen
                        .add_text(if first { "if (\n(" } else { "else if (\n(" });
                    first = false;
                    self.write_code(
                        false,
                        &condition.content,
                        MatchMode::Offset,
                        Capabilities::ALL,
                        condition.span,
                    );
                    self.gen.add_text(")\n) {\n");
                }
                None => {
                    self.gen.add_text("else {\n");
                }
            }
            for child in &branch.children {
                self.visit_node(child);
            }
            self.gen.add_text("}\n");
        }
    }

    fn visit_for(&mut self, node: &ForNode) {
        let Some(value) = &node.value else {
            return;
        };
        let source_var = self.next_var();

        self.gen
            .add_text(&format!("const {source_var} = __VLS_getVforSourceType("));
        self.write_code(
            false,
            &node.source.content,
            MatchMode::Offset,
            Capabilities::NO_FORMATTING,
            node.source.span,
        );
        self.gen.add_text(");\n");
        self.gen.add_text("for (__VLS_for_key in ");
        self.write_code(
            false,
            &source_var,
            MatchMode::Gate,
            Capabilities::DIAGNOSTIC_ONLY,
            node.source.span,
        );
        self.gen.add_text(") {\n");

        self.gen.add_text("const ");
        self.write_code(
            false,
            &value.content,
            MatchMode::Offset,
            Capabilities::NO_FORMATTING,
            value.span,
        );
        self.gen
            .add_text(&format!(" = {source_var}[__VLS_for_key];\n"));

        for (alias, helper) in [
            (&node.key, "__VLS_getVforKeyType"),
            (&node.index, "__VLS_getVforIndexType"),
        ] {
            if let Some(alias) = alias {
                self.gen.add_text("const ");
                self.write_code(
                    false,
                    &alias.content,
                    MatchMode::Offset,
                    Capabilities::NO_FORMATTING,
                    alias.span,
                );
                self.gen.add_text(&format!(" = {helper}({source_var});\n"));
            }
        }

        for child in &node.children {
            self.visit_node(child);
        }
        self.gen.add_text("}\n");
    }

    /// `<div style="color: red">` becomes `div { color: red }` in the companion stylesheet.
    fn write_inline_css(&mut self, el: &ElementNode) {
        for attr in el.attributes().filter(|attr| attr.name == "style") {
            let Some(value) = attr.value.as_ref().filter(|value| !value.content.is_empty()) else {
                continue;
            };
            self.css.add_text(&format!("{} {{ ", el.tag));
            self.css
                .add_code(&value.content, value.span, MatchMode::Offset, ());
            self.css.add_text(" }\n");
        }
    }

    /// `v-slot` reads the slot type off the owning component.
    fn write_import_slots(&mut self, el: &ElementNode) {
        for dir in el.directives().filter(|dir| dir.name == "slot") {
            let Some(parent) = self
                .ancestors
                .iter()
                .rev()
                .find(|tag| tag.as_str() != "template")
                .cloned()
            else {
                continue;
            };

            if let Some(exp) = &dir.exp {
                self.gen.add_text("let ");
                self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
                self.gen.add_text(" = ");
            }
            let static_arg = dir.arg.as_ref().filter(|arg| arg.is_static && !arg.content.is_empty());
            let slot_name = static_arg.map_or("default", |arg| arg.content.as_str());
            let source = dir.arg.as_ref().map_or(dir.loc, |arg| arg.span);

            let diag_start = self.gen.offset();
            let component = self.component_name(&parent);
            self.gen
                .add_text(&format!("__VLS_components['{component}'].__VLS_slots"));
            self.write_property_access(false, slot_name, Capabilities::SLOT_NAME, source);
            let diag = Span::new(diag_start, self.gen.offset());
            self.gen.add_mapping_at(
                diag,
                source,
                MatchMode::Gate,
                template_data(Capabilities::DIAGNOSTIC_ONLY),
            );
            self.gen.add_text(";\n");
        }
    }

    /// Argument-less directives (`v-show`, `v-model`, `v-bind="obj"`) are checked as plain
    /// expressions.
    fn write_bare_directives(&mut self, el: &ElementNode) {
        for dir in el.directives() {
            if dir.arg.is_some() || dir.name == "slot" {
                continue;
            }
            let Some(exp) = &dir.exp else {
                continue;
            };
            self.gen.add_text("(");
            self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
            self.gen.add_text(");\n");
        }
    }

    /// `ref="input"` finds references of the `input` binding.
    fn write_element_refs(&mut self, el: &ElementNode) {
        for attr in el.attributes().filter(|attr| attr.name == "ref") {
            let Some(value) = &attr.value else {
                continue;
            };
            self.gen.add_text("// @ts-ignore\n");
            self.gen.add_text("(");
            self.write_code(
                false,
                &value.content,
                MatchMode::Offset,
                Capabilities::REFERENCES_ONLY,
                value.span,
            );
            self.gen.add_text(");\n");
        }
    }

    /// Props are type-checked as an object literal against the component's props type.
    ///
    /// `class` and `style` go into a second, unchecked literal because fallthrough attributes
    /// are accepted by every component.
    fn write_props(&mut self, el: &ElementNode, class_or_style_pass: bool) {
        let var_name = self.next_var();
        let component = self.component_name(&el.tag);
        let mut wrapped = false;

        if !class_or_style_pass {
            self.start_props(el, &component, &var_name, class_or_style_pass);
            wrapped = true;
        }

        for prop in &el.props {
            match prop {
                PropNode::Directive(dir) => {
                    if class_or_style_pass {
                        continue;
                    }
                    if matches!(dir.name.as_str(), "bind" | "model") {
                        self.write_bound_prop(dir);
                    }
                }
                PropNode::Attribute(attr) => {
                    let prop_name = prop_key(&attr.name);
                    let is_class_or_style = matches!(prop_name.as_str(), "class" | "style");
                    if is_class_or_style != class_or_style_pass {
                        continue;
                    }
                    if !wrapped {
                        self.start_props(el, &component, &var_name, class_or_style_pass);
                        wrapped = true;
                    }
                    self.write_attribute_prop(attr, &prop_name);
                }
            }
        }

        if wrapped {
            if class_or_style_pass {
                self.gen.add_text("};\n");
            } else {
                self.gen.add_text(&format!("}}; {var_name};\n"));
            }
        }
    }

    fn start_props(
        &mut self,
        el: &ElementNode,
        component: &str,
        var_name: &str,
        class_or_style_pass: bool,
    ) {
        if class_or_style_pass {
            self.gen.add_text("// @ts-ignore\n");
            self.gen
                .add_text(&format!("__VLS_componentProps['{component}'] = {{\n"));
            return;
        }

        let tag_spans = std::iter::once(el.tag_span)
            .chain(el.end_tag_span.filter(|_| !el.is_self_closing));
        for tag_span in tag_spans {
            self.gen.add_text("__VLS_components");
            self.write_property_access(true, component, Capabilities::HTML_TAG_OR_ATTR, tag_span);
            self.gen.add_text(";\n");
        }

        self.gen.add_text("const ");
        self.write_code(
            false,
            var_name,
            MatchMode::Gate,
            Capabilities::DIAGNOSTIC_ONLY,
            el.tag_span,
        );
        self.gen.add_text(&format!(
            ": typeof __VLS_componentProps['{component}'] = {{\n"
        ));
    }

    fn write_bound_prop(&mut self, dir: &DirectiveNode) {
        let Some(arg) = dir.arg.as_ref().filter(|arg| arg.is_static) else {
            return;
        };
        let prop_name = prop_key(&arg.content);
        let prop_value = dir
            .exp
            .as_ref()
            .map_or("undefined", |exp| exp.content.as_str());

        self.map_code(
            &format!("'{prop_name}': ({prop_value})"),
            MatchMode::Gate,
            Capabilities::DIAGNOSTIC_ONLY,
            dir.loc,
        );
        self.write_object_property(true, &prop_name, Capabilities::HTML_TAG_OR_ATTR, arg.span);
        self.gen.add_text(": (");
        match &dir.exp {
            Some(exp) => {
                self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
            }
            None => {
                self.gen.add_text(prop_value);
            }
        }
        self.gen.add_text("),\n");

        if arg.content != prop_name {
            self.write_object_property(true, &arg.content, Capabilities::HTML_TAG_OR_ATTR, arg.span);
            self.gen.add_text(&format!(": ({prop_value}),\n"));
        }
    }

    fn write_attribute_prop(&mut self, attr: &AttributeNode, prop_name: &str) {
        let prop_value = attribute_literal(attr);

        self.map_code(
            &format!("'{prop_name}': {prop_value}"),
            MatchMode::Gate,
            Capabilities::DIAGNOSTIC_ONLY,
            attr.loc,
        );
        self.write_object_property(true, prop_name, Capabilities::HTML_TAG_OR_ATTR, attr.name_span);
        self.gen.add_text(&format!(": {prop_value},\n"));

        if attr.name != prop_name {
            self.write_object_property(true, &attr.name, Capabilities::HTML_TAG_OR_ATTR, attr.name_span);
            self.gen.add_text(&format!(": {prop_value},\n"));
        }
    }

    fn write_scoped_classes(&mut self, el: &ElementNode) {
        for attr in el.attributes().filter(|attr| attr.name == "class") {
            let Some(value) = &attr.value else {
                continue;
            };
            for (offset, class_name) in split_class_names(&value.content) {
                let start = value.span.start + offset as u32;
                let span = Span::new(start, start + class_name.len() as u32);
                let mut capabilities = Capabilities::CLASS_NAME;
                if self.scoped_class_links && self.scoped_classes.contains(class_name) {
                    capabilities |= Capabilities::DISPLAY_WITH_LINK;
                }
                self.gen.add_text("// @ts-ignore\n");
                self.gen.add_text("__VLS_styleScopedClasses");
                self.write_property_access(false, class_name, capabilities, span);
                self.gen.add_text(";\n");
            }
        }
    }

    /// `@evt="handler"` is checked against both the `onEvt` prop and the declared emit.
    fn write_events(&mut self, el: &ElementNode) {
        for dir in el.directives().filter(|dir| dir.name == "on") {
            let (Some(arg), Some(exp)) = (dir.arg.as_ref().filter(|arg| arg.is_static), &dir.exp)
            else {
                continue;
            };
            let var_name = self.next_var();
            let component = self.component_name(&el.tag);
            let event = arg.content.as_str();
            let handler_prop = camelize(&format!("on-{event}"));

            self.gen.add_text(&format!(
                "let {var_name}!: {{ '{event}': __VLS_FirstFunction<typeof __VLS_componentProps['{component}']["
            ));
            self.write_quoted(false, &handler_prop, Capabilities::HTML_TAG_OR_ATTR, arg.span);
            self.gen.add_text(&format!(
                "], __VLS_PickEmitFunction<typeof __VLS_componentEmits['{component}'], '{event}'>> }};\n"
            ));

            self.gen.add_text(&format!("{var_name} = {{\n"));
            self.write_object_property(false, event, Capabilities::HTML_TAG_OR_ATTR, arg.span);
            self.gen.add_text(": ");
            let (open, close) = handler_wrapper(&exp.content);
            self.gen.add_text(open);
            self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
            self.gen.add_text(close);
            self.gen.add_text("\n};\n");
        }
    }

    /// Touch `__VLS_options.props` / `.emits` so that find references on a prop or emit
    /// declaration reaches template usages, including props with default values.
    fn write_option_references(&mut self, el: &ElementNode) {
        let component = self.component_name(&el.tag);
        for prop in &el.props {
            let (props, emits, span) = match prop {
                PropNode::Directive(dir) => {
                    let Some(arg) = dir.arg.as_ref().filter(|arg| arg.is_static) else {
                        continue;
                    };
                    let name = arg.content.as_str();
                    match dir.name.as_str() {
                        "bind" | "model" => (vec![name.to_string(), camelize(name)], vec![], arg.span),
                        "on" => (vec![camelize(&format!("on-{name}"))], vec![name.to_string()], arg.span),
                        _ => continue,
                    }
                }
                PropNode::Attribute(attr) => {
                    if attr.name == "style" {
                        continue;
                    }
                    let name = attr.name.as_str();
                    (vec![name.to_string(), camelize(name)], vec![], attr.name_span)
                }
            };

            let capabilities = Capabilities::HTML_TAG_OR_ATTR.difference(Capabilities::BASIC);
            for (option, names, patch_rename) in [("props", dedup(props), true), ("emits", emits, false)] {
                for name in names {
                    self.gen.add_text("// @ts-ignore\n");
                    self.gen.add_text(&format!(
                        "__VLS_components['{component}'].__VLS_options.{option}"
                    ));
                    self.write_property_access(patch_rename, &name, capabilities, span);
                    self.gen.add_text(";\n");
                }
            }
        }
    }

    /// `<slot>` declares a slot of this component. Its bindings become the slot's type.
    fn write_slot(&mut self, el: &ElementNode) {
        if el.tag != "slot" {
            return;
        }
        let default_bind_var = self.next_var();
        let binds_var = self.next_var();
        let slot_var = self.next_var();
        let slot_name = el
            .find_attribute("name")
            .and_then(|attr| attr.value.as_ref())
            .map(|value| value.content.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("default");

        let default_bind = el
            .directives()
            .find(|dir| dir.arg.is_none() && dir.exp.is_some())
            .and_then(|dir| dir.exp.as_ref());
        if let Some(exp) = default_bind {
            self.gen
                .add_text(&format!("const {default_bind_var} = ("));
            self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
            self.gen.add_text(");\n");
        }

        self.gen.add_text(&format!("const {binds_var} = {{\n"));
        for prop in &el.props {
            match prop {
                PropNode::Directive(dir) => {
                    let (Some(arg), Some(exp)) =
                        (dir.arg.as_ref().filter(|arg| arg.is_static), &dir.exp)
                    else {
                        continue;
                    };
                    self.write_object_property(true, &arg.content, Capabilities::HTML_TAG_OR_ATTR, arg.span);
                    self.gen.add_text(": (");
                    self.write_code(false, &exp.content, MatchMode::Offset, Capabilities::ALL, exp.span);
                    self.gen.add_text("),\n");
                }
                PropNode::Attribute(attr) if attr.name != "name" => {
                    self.write_object_property(true, &attr.name, Capabilities::HTML_TAG_OR_ATTR, attr.name_span);
                    self.gen
                        .add_text(&format!(": ({}),\n", attribute_literal(attr)));
                }
                PropNode::Attribute(_) => {}
            }
        }
        self.gen.add_text("};\n");

        if default_bind.is_some() {
            self.gen.add_text(&format!(
                "var {slot_var}!: typeof {default_bind_var} & typeof {binds_var};\n"
            ));
        } else {
            self.gen
                .add_text(&format!("var {slot_var}!: typeof {binds_var};\n"));
        }

        let export = SlotExport {
            name: slot_name.into(),
            var_name: slot_var,
            tag_span: el.tag_span,
        };
        match self.slots.iter_mut().find(|slot| slot.name == export.name) {
            Some(existing) => *existing = export,
            None => self.slots.push(export),
        }
    }

    fn write_slot_exports(&mut self) {
        self.gen.add_text("export default {\n");
        let slots = std::mem::take(&mut self.slots);
        for slot in &slots {
            self.write_object_property(false, &slot.name, Capabilities::SLOT_NAME_EXPORT, slot.tag_span);
            self.gen.add_text(&format!(": {},\n", slot.var_name));
        }
        self.gen.add_text("};\n");
    }

    fn next_var(&mut self) -> String {
        let name = format!("__VLS_{}", self.element_index);
        self.element_index += 1;
        name
    }

    fn component_name(&self, tag: &str) -> CompactString {
        self.components
            .get(tag)
            .cloned()
            .unwrap_or_else(|| CompactString::from(tag))
    }

    fn write_object_property(&mut self, patch_rename: bool, name: &str, capabilities: Capabilities, source: Span) {
        if is_simple_identifier(name) {
            self.write_code(patch_rename, name, MatchMode::Offset, capabilities, source);
        } else {
            self.write_quoted(patch_rename, name, capabilities, source);
        }
    }

    fn write_property_access(&mut self, patch_rename: bool, name: &str, capabilities: Capabilities, source: Span) {
        if is_simple_identifier(name) {
            self.gen.add_text(".");
            self.write_code(patch_rename, name, MatchMode::Offset, capabilities, source);
        } else {
            self.gen.add_text("[");
            self.write_quoted(patch_rename, name, capabilities, source);
            self.gen.add_text("]");
        }
    }

    /// `'name'` with a Gate over the quotes and an Offset mapping inside them.
    fn write_quoted(&mut self, patch_rename: bool, name: &str, capabilities: Capabilities, source: Span) {
        let gate_capabilities = capabilities.difference(
            Capabilities::RENAME
                | Capabilities::FORMATTING
                | Capabilities::COMPLETION
                | Capabilities::SEMANTIC_TOKENS
                | Capabilities::REFERENCES_CODE_LENS,
        );
        self.map_code_with(
            patch_rename,
            &format!("'{name}'"),
            MatchMode::Gate,
            gate_capabilities,
            source,
        );
        self.gen.add_text("'");
        self.write_code(patch_rename, name, MatchMode::Offset, capabilities, source);
        self.gen.add_text("'");
    }

    fn write_code(
        &mut self,
        patch_rename: bool,
        code: &str,
        mode: MatchMode,
        capabilities: Capabilities,
        source: Span,
    ) -> Span {
        let target = self.map_code_with(patch_rename, code, mode, capabilities, source);
        self.gen.add_text(code);
        target
    }

    /// Map `code` at the current position without writing it.
    fn map_code(&mut self, code: &str, mode: MatchMode, capabilities: Capabilities, source: Span) {
        self.map_code_with(false, code, mode, capabilities, source);
    }

    fn map_code_with(
        &mut self,
        patch_rename: bool,
        code: &str,
        mode: MatchMode,
        capabilities: Capabilities,
        source: Span,
    ) -> Span {
        let mut data = template_data(capabilities);
        if patch_rename {
            data = data.with_do_rename(EditTransform::KeepHyphenation);
        }
        self.gen.add_mapping(code, source, mode, data)
    }
}

fn template_data(capabilities: Capabilities) -> TsMappingData {
    TsMappingData::new(Block::Template, capabilities)
}

/// Object key for an attribute or prop name: kebab-case is camelized.
fn prop_key(name: &str) -> String {
    if hyphenate(name) == name {
        camelize(name)
    } else {
        name.to_string()
    }
}

/// A static attribute value as a template literal, or `true` for a bare attribute.
fn attribute_literal(attr: &AttributeNode) -> String {
    match &attr.value {
        Some(value) => format!("`{}`", value.content.replace('`', "\\`")),
        None => "true".to_string(),
    }
}

/// Wrapper for an inline event handler, matching how the compiler treats it.
fn handler_wrapper(handler: &str) -> (&'static str, &'static str) {
    let is_match = |pattern: &Lazy<Option<Regex>>| {
        pattern
            .as_ref()
            .is_some_and(|regex| regex.is_match(handler))
    };
    if is_match(&MEMBER_PATH) || is_match(&FUNCTION_EXPRESSION) {
        ("", "")
    } else if handler.contains(';') {
        ("$event => {", "}")
    } else {
        ("$event => (", ")")
    }
}

/// Whitespace separated class names with their byte offsets.
fn split_class_names(value: &str) -> Vec<(usize, &str)> {
    let mut names = Vec::new();
    let mut start = None;
    for (index, ch) in value.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(name_start)) => {
                names.push((name_start, &value[name_start..index]));
                start = None;
            }
            (false, None) => start = Some(index),
            _ => {}
        }
    }
    if let Some(name_start) = start {
        names.push((name_start, &value[name_start..]));
    }
    names
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

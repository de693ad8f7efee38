//! Lexical analysis of logic blocks.
//!
//! Works on the token stream from [`crate::lexer`] with matched brackets. Statement
//! boundaries follow semicolons and line breaks where the surrounding tokens cannot
//! continue an expression, which is how automatic semicolon insertion reads in practice.

use compact_str::CompactString;
use tessera_carton::Span;
use tessera_relief::{
    ExportDefault, LabelBinding, LabelVar, MacroCall, ParseError, RefLabel, ScriptFacts,
    ScriptSetupFacts,
};

use crate::lexer::{match_brackets, tokenize, Token, TokenKind};

/// Analyze a `<script>` block.
pub fn analyze_script(source: &str) -> Result<ScriptFacts, ParseError> {
    let cursor = Cursor::new(source)?;
    let mut facts = ScriptFacts::default();

    for (start, end) in cursor.statements(0, cursor.len()) {
        if cursor.is_ident(start, "export") && cursor.is_ident(start + 1, "default") {
            facts.export_default = Some(cursor.export_default(start, end));
        }
    }

    Ok(facts)
}

/// Analyze a `<script setup>` block.
pub fn analyze_script_setup(source: &str) -> Result<ScriptSetupFacts, ParseError> {
    let cursor = Cursor::new(source)?;
    let mut facts = ScriptSetupFacts::default();

    for (start, end) in cursor.statements(0, cursor.len()) {
        let mut head = start;
        if cursor.is_ident(head, "export") {
            head += 1;
        }
        if cursor.is_ident(head, "declare") {
            continue;
        }
        match cursor.text(head) {
            "import" if !cursor.is_punct(head + 1, "(") && !cursor.is_punct(head + 1, ".") => {
                facts.imports.push(cursor.span(start, end));
                cursor.import_bindings(head + 1, end, &mut facts.exposes);
            }
            "const" | "let" | "var" => {
                if cursor.is_ident(head + 1, "enum") {
                    continue;
                }
                for (decl_start, decl_end) in cursor.split_top_level(head + 1, end, ",") {
                    let name_end = cursor
                        .find_top_level(decl_start, decl_end, "=")
                        .or_else(|| cursor.find_top_level(decl_start, decl_end, ":"))
                        .unwrap_or(decl_end);
                    cursor.binding_vars(decl_start, name_end, &mut facts.exposes);
                }
            }
            "function" | "async" | "class" | "abstract" => {
                let mut name = head;
                while name < end
                    && matches!(cursor.text(name), "function" | "async" | "class" | "abstract" | "*")
                {
                    name += 1;
                }
                if name < end && cursor.tokens[name].kind == TokenKind::Ident {
                    facts.exposes.push(cursor.tokens[name].span);
                }
            }
            _ => {}
        }
    }

    facts.labels = cursor.ref_labels();

    for index in 0..cursor.len() {
        let callee = cursor.text(index);
        if !matches!(callee, "defineProps" | "defineEmit" | "defineEmits")
            || cursor.tokens[index].kind != TokenKind::Ident
            || (index > 0 && matches!(cursor.text(index - 1), "." | "?."))
        {
            continue;
        }
        let Some(call) = cursor.macro_call(index) else {
            continue;
        };
        if callee == "defineProps" {
            if facts.define_props.is_none() {
                facts.props = cursor.macro_props(index, &call);
                facts.define_props = Some(call);
            }
        } else if facts.define_emit.is_none() {
            facts.define_emit = Some(call);
        }
    }

    Ok(facts)
}

/// Tokens trailing a line that cannot end a statement.
const CONTINUING_KEYWORDS: &[&str] = &[
    "extends", "implements", "new", "typeof", "keyof", "await", "yield", "in", "of",
    "instanceof", "as", "satisfies", "import", "export", "default", "const", "let", "var",
    "function", "class", "async", "from", "type", "interface", "declare",
];

/// Tokens leading a line that continue the previous one.
const LEADING_CONTINUATIONS: &[&str] = &[
    ".", "?.", ",", "=", "=>", "?", ":", "+", "-", "*", "/", "%", "**", "==", "===", "!=", "!==",
    "<", ">", "<=", ">=", "&&", "||", "??", "&", "|", "^", "+=", "-=", "*=", "/=", "%=", "&&=",
    "||=", "??=", "as", "satisfies", "in", "instanceof", "from", "extends", "implements",
];

struct Cursor<'s> {
    source: &'s str,
    tokens: Vec<Token>,
    matches: Vec<Option<usize>>,
    depths: Vec<u32>,
}

impl<'s> Cursor<'s> {
    fn new(source: &'s str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        let matches = match_brackets(source, &tokens)?;

        let mut depths = Vec::with_capacity(tokens.len());
        let mut depth = 0u32;
        for token in &tokens {
            let text = token.text(source);
            if token.kind == TokenKind::Punct && matches!(text, ")" | "]" | "}") {
                depth = depth.saturating_sub(1);
            }
            depths.push(depth);
            if token.kind == TokenKind::Punct && matches!(text, "(" | "[" | "{") {
                depth += 1;
            }
        }

        Ok(Self {
            source,
            tokens,
            matches,
            depths,
        })
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn text(&self, index: usize) -> &'s str {
        self.tokens
            .get(index)
            .map_or("", |token| token.text(self.source))
    }

    fn is_ident(&self, index: usize, name: &str) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|token| token.is_ident(self.source, name))
    }

    fn is_punct(&self, index: usize, punct: &str) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|token| token.is_punct(self.source, punct))
    }

    fn is_closer(&self, index: usize) -> bool {
        self.tokens[index].kind == TokenKind::Punct
            && matches!(self.text(index), ")" | "]" | "}")
    }

    /// Span covering tokens `start..end`.
    fn span(&self, start: usize, end: usize) -> Span {
        if start >= end {
            let at = self
                .tokens
                .get(start)
                .map_or(self.source.len() as u32, |t| t.span.start);
            return Span::new(at, at);
        }
        Span::new(self.tokens[start].span.start, self.tokens[end - 1].span.end)
    }

    /// Index after token `index`, jumping over a bracketed group.
    fn skip(&self, index: usize) -> usize {
        self.matches[index].map_or(index + 1, |close| close + 1)
    }

    fn continues(&self, prev: usize, next: usize) -> bool {
        let prev_token = self.tokens[prev];
        let prev_text = self.text(prev);
        let next_text = self.text(next);
        match prev_token.kind {
            TokenKind::Punct if !matches!(prev_text, ")" | "]" | "}" | "++" | "--") => {
                return true
            }
            TokenKind::Ident if CONTINUING_KEYWORDS.contains(&prev_text) => return true,
            _ => {}
        }
        if prev_text == ")" && next_text == "{" {
            return true;
        }
        matches!(self.tokens[next].kind, TokenKind::Punct | TokenKind::Ident)
            && LEADING_CONTINUATIONS.contains(&next_text)
    }

    /// Exclusive end index of the statement starting at `start`.
    fn statement_end(&self, start: usize, limit: usize) -> usize {
        let mut index = start;
        while index < limit {
            if index > start
                && self.tokens[index].newline_before
                && !self.continues(index - 1, index)
            {
                return index;
            }
            if self.is_punct(index, ";") {
                return index + 1;
            }
            if self.is_closer(index) {
                return index;
            }
            index = self.skip(index).min(limit);
        }
        limit
    }

    /// Statements between `start` and `limit` at the same bracket depth.
    fn statements(&self, start: usize, limit: usize) -> Vec<(usize, usize)> {
        let mut statements = Vec::new();
        let mut index = start;
        while index < limit {
            if self.is_punct(index, ";") {
                index += 1;
                continue;
            }
            let end = self.statement_end(index, limit);
            if end <= index {
                index += 1;
                continue;
            }
            statements.push((index, end));
            index = end;
        }
        statements
    }

    fn find_top_level(&self, start: usize, end: usize, punct: &str) -> Option<usize> {
        let mut index = start;
        while index < end {
            if self.is_punct(index, punct) {
                return Some(index);
            }
            index = self.skip(index);
        }
        None
    }

    /// Split `start..end` on a separator at the same bracket depth. Empty parts are kept.
    fn split_top_level(&self, start: usize, end: usize, separator: &str) -> Vec<(usize, usize)> {
        let mut parts = Vec::new();
        let mut part_start = start;
        let mut index = start;
        while index < end {
            if self.is_punct(index, separator) {
                parts.push((part_start, index));
                part_start = index + 1;
                index += 1;
                continue;
            }
            index = self.skip(index).min(end);
        }
        if part_start < end {
            parts.push((part_start, end));
        }
        parts
    }

    /// Strip a trailing `;` from a statement range.
    fn without_semicolon(&self, start: usize, end: usize) -> usize {
        if end > start && self.is_punct(end - 1, ";") {
            end - 1
        } else {
            end
        }
    }

    /// Whether `start..end` is exactly one bracketed group opened by `open`.
    fn is_group(&self, start: usize, end: usize, open: &str) -> bool {
        start < end && self.is_punct(start, open) && self.matches[start] == Some(end - 1)
    }

    fn export_default(&self, start: usize, end: usize) -> ExportDefault {
        let expr_start = start + 2;
        let expr_end = self.without_semicolon(start, end);

        let options = if self.is_group(expr_start, expr_end, "{") {
            Some(expr_start)
        } else {
            let mut callee_end = expr_start;
            while callee_end < expr_end
                && (self.tokens[callee_end].kind == TokenKind::Ident
                    || self.is_punct(callee_end, "."))
            {
                callee_end += 1;
            }
            (callee_end > expr_start
                && self.is_punct(callee_end, "(")
                && self.is_punct(callee_end + 1, "{"))
            .then_some(callee_end + 1)
            .filter(|&open| self.matches[open].is_some())
        };

        let mut export = ExportDefault {
            span: self.span(start, end),
            options: options.map(|open| self.group_span(open)),
            props: Vec::new(),
            components: Vec::new(),
        };
        if let Some(open) = options {
            for (key, value) in self.object_entries(open) {
                match key.as_str() {
                    "props" => export.props = self.value_keys(value),
                    "components" => export.components = self.value_keys(value),
                    _ => {}
                }
            }
        }
        export
    }

    fn group_span(&self, open: usize) -> Span {
        let close = self.matches[open].unwrap_or(open);
        self.span(open, close + 1)
    }

    /// `(key, value start index)` pairs of an object literal or type literal at `open`.
    fn object_entries(&self, open: usize) -> Vec<(CompactString, Option<usize>)> {
        let Some(close) = self.matches[open] else {
            return Vec::new();
        };
        let mut entries = Vec::new();
        let mut member_start = true;
        let mut index = open + 1;
        while index < close {
            let token = self.tokens[index];
            let text = self.text(index);
            if token.kind == TokenKind::Punct && matches!(text, "," | ";") {
                member_start = true;
                index += 1;
                continue;
            }
            if token.newline_before && !member_start && !self.continues(index - 1, index) {
                member_start = true;
            }
            if member_start {
                member_start = false;
                let mut key_index = index;
                while matches!(self.text(key_index), "readonly" | "get" | "set" | "async")
                    && key_index + 1 < close
                    && matches!(self.tokens[key_index + 1].kind, TokenKind::Ident | TokenKind::Str)
                {
                    key_index += 1;
                }
                let key_token = self.tokens[key_index];
                if matches!(key_token.kind, TokenKind::Ident | TokenKind::Str) {
                    let key = unquote(key_token.text(self.source));
                    let mut after = key_index + 1;
                    if self.is_punct(after, "?") {
                        after += 1;
                    }
                    let value = self.is_punct(after, ":").then_some(after + 1);
                    if value.is_some()
                        || self.is_punct(after, "(")
                        || self.is_punct(after, ",")
                        || self.is_punct(after, "<")
                        || after == close
                    {
                        entries.push((CompactString::new(key), value));
                    }
                }
            }
            index = self.skip(index);
        }
        entries
    }

    /// Keys of an object literal or string elements of an array literal.
    fn value_keys(&self, value: Option<usize>) -> Vec<CompactString> {
        let Some(value) = value else {
            return Vec::new();
        };
        if self.is_punct(value, "{") {
            return self
                .object_entries(value)
                .into_iter()
                .map(|(key, _)| key)
                .collect();
        }
        if self.is_punct(value, "[") {
            if let Some(close) = self.matches[value] {
                return (value + 1..close)
                    .filter(|&i| self.tokens[i].kind == TokenKind::Str)
                    .map(|i| CompactString::new(unquote(self.text(i))))
                    .collect();
            }
        }
        Vec::new()
    }

    fn import_bindings(&self, start: usize, end: usize, out: &mut Vec<Span>) {
        if self.is_ident(start, "type")
            && !self.is_punct(start + 1, ",")
            && !self.is_ident(start + 1, "from")
        {
            return;
        }
        let mut index = start;
        while index < end && !self.is_ident(index, "from") {
            let token = self.tokens[index];
            if self.is_punct(index, "{") {
                let close = self.matches[index].unwrap_or(end);
                for (spec_start, spec_end) in self.split_top_level(index + 1, close, ",") {
                    if spec_start >= spec_end
                        || (self.is_ident(spec_start, "type") && spec_end - spec_start > 1)
                    {
                        continue;
                    }
                    out.push(self.tokens[spec_end - 1].span);
                }
                index = close + 1;
                continue;
            }
            if self.is_punct(index, "*") && self.is_ident(index + 1, "as") {
                if let Some(name) = self.tokens.get(index + 2) {
                    out.push(name.span);
                }
                index += 3;
                continue;
            }
            if token.kind == TokenKind::Ident {
                out.push(token.span);
            }
            index += 1;
        }
    }

    /// Identifiers bound by a declaration pattern.
    fn binding_vars(&self, start: usize, end: usize, out: &mut Vec<Span>) {
        if start >= end {
            return;
        }
        if end - start == 1 && self.tokens[start].kind == TokenKind::Ident {
            out.push(self.tokens[start].span);
            return;
        }
        let is_object = self.is_group(start, end, "{");
        if !is_object && !self.is_group(start, end, "[") {
            return;
        }
        for (elem_start, elem_end) in self.split_top_level(start + 1, end - 1, ",") {
            if elem_start >= elem_end {
                continue;
            }
            let elem_end = self
                .find_top_level(elem_start, elem_end, "=")
                .unwrap_or(elem_end);
            if self.is_punct(elem_start, "...") {
                self.binding_vars(elem_start + 1, elem_end, out);
            } else if is_object {
                match self.find_top_level(elem_start, elem_end, ":") {
                    Some(colon) => self.binding_vars(colon + 1, elem_end, out),
                    None => self.binding_vars(elem_start, elem_end, out),
                }
            } else {
                self.binding_vars(elem_start, elem_end, out);
            }
        }
    }

    /// `defineProps<T>(arg)` starting at the callee token.
    fn macro_call(&self, callee: usize) -> Option<MacroCall> {
        let mut index = callee + 1;
        let mut type_args = None;
        if self.is_punct(index, "<") {
            let close = self.closing_angle(index)?;
            type_args = Some(self.span(index + 1, close));
            index = close + 1;
        }
        if !self.is_punct(index, "(") {
            return None;
        }
        let close = self.matches[index]?;
        let args = self
            .split_top_level(index + 1, close, ",")
            .first()
            .filter(|(start, end)| start < end)
            .map(|&(start, end)| self.span(start, end));
        Some(MacroCall {
            span: self.span(callee, close + 1),
            args,
            type_args,
        })
    }

    fn closing_angle(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut index = open;
        while index < self.len() {
            match self.text(index) {
                "<" => depth += 1,
                ">" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(index);
                    }
                }
                ";" => return None,
                _ => {}
            }
            index = self.skip(index);
        }
        None
    }

    /// Prop names declared by a `defineProps` call.
    fn macro_props(&self, callee: usize, call: &MacroCall) -> Vec<CompactString> {
        let start_of = |span: Span| {
            (callee..self.len()).find(|&i| self.tokens[i].span.start == span.start)
        };
        if let Some(type_args) = call.type_args {
            if let Some(open) = start_of(type_args).filter(|&i| self.is_punct(i, "{")) {
                return self
                    .object_entries(open)
                    .into_iter()
                    .map(|(key, _)| key)
                    .collect();
            }
        }
        call.args
            .and_then(start_of)
            .map(|open| self.value_keys(Some(open)))
            .unwrap_or_default()
    }

    fn is_label_start(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        let prev = index - 1;
        match self.text(prev) {
            ";" | "}" => true,
            "{" => self.is_block_brace(prev),
            _ => self.tokens[index].newline_before && !self.continues(prev, index),
        }
    }

    /// Whether the `{` at `index` opens a statement block rather than an object literal.
    fn is_block_brace(&self, index: usize) -> bool {
        if index == 0 {
            return true;
        }
        matches!(
            self.text(index - 1),
            ")" | "=>" | ";" | "}" | "{" | "else" | "try" | "finally" | "do"
        ) && !(self.text(index - 1) == "{" && !self.is_block_brace(index - 1))
    }

    fn ref_labels(&self) -> Vec<RefLabel> {
        let mut labels = Vec::new();
        for index in 0..self.len() {
            if !self.is_ident(index, "ref")
                || !self.is_punct(index + 1, ":")
                || !self.is_label_start(index)
            {
                continue;
            }
            let limit = self.enclosing_end(index);
            let end = self.statement_end(index + 2, limit);
            let expr_end = self.without_semicolon(index + 2, end);
            let in_root = self.depths[index] == 0;

            let mut bindings = Vec::new();
            for (part_start, part_end) in self.split_top_level(index + 2, expr_end, ",") {
                self.label_binding(part_start, part_end, None, in_root, &mut bindings);
            }

            labels.push(RefLabel {
                span: self.span(index, end),
                label: self.tokens[index].span,
                bindings,
            });
        }
        labels
    }

    /// Index of the closing bracket enclosing `index`, or the token count.
    fn enclosing_end(&self, index: usize) -> usize {
        let depth = self.depths[index];
        if depth == 0 {
            return self.len();
        }
        (index..self.len())
            .find(|&i| self.depths[i] < depth)
            .unwrap_or(self.len())
    }

    fn label_binding(
        &self,
        start: usize,
        end: usize,
        parenthesized: Option<Span>,
        in_root: bool,
        out: &mut Vec<LabelBinding>,
    ) {
        if start >= end {
            return;
        }
        if self.is_group(start, end, "(") {
            let parent = parenthesized.unwrap_or_else(|| self.span(start, end));
            for (part_start, part_end) in self.split_top_level(start + 1, end - 1, ",") {
                self.label_binding(part_start, part_end, Some(parent), in_root, out);
            }
            return;
        }
        match self.find_top_level(start, end, "=") {
            Some(eq) => {
                let mut vars = Vec::new();
                self.label_vars(start, eq, in_root, &mut vars);
                out.push(LabelBinding {
                    parent: parenthesized.unwrap_or_else(|| self.span(start, end)),
                    left: self.span(start, eq),
                    right: (eq + 1 < end).then(|| self.span(eq + 1, end)),
                    vars,
                });
            }
            None if end - start == 1 && self.tokens[start].kind == TokenKind::Ident => {
                let span = self.tokens[start].span;
                out.push(LabelBinding {
                    parent: span,
                    left: span,
                    right: None,
                    vars: vec![self.label_var(start, false, in_root)],
                });
            }
            None => {}
        }
    }

    fn label_var(&self, index: usize, is_shorthand: bool, in_root: bool) -> LabelVar {
        LabelVar {
            name: CompactString::new(self.text(index)),
            span: self.tokens[index].span,
            is_shorthand,
            in_root,
        }
    }

    /// Identifiers assigned by the left side of a `ref:` binding.
    fn label_vars(&self, start: usize, end: usize, in_root: bool, out: &mut Vec<LabelVar>) {
        if start >= end {
            return;
        }
        if end - start == 1 && self.tokens[start].kind == TokenKind::Ident {
            out.push(self.label_var(start, false, in_root));
            return;
        }
        let is_object = self.is_group(start, end, "{");
        if !is_object && !self.is_group(start, end, "[") {
            if let Some(eq) = self.find_top_level(start, end, "=") {
                if eq == start + 1 && self.tokens[start].kind == TokenKind::Ident {
                    out.push(self.label_var(start, false, in_root));
                }
            }
            return;
        }
        for (elem_start, elem_end) in self.split_top_level(start + 1, end - 1, ",") {
            if elem_start >= elem_end {
                continue;
            }
            if self.is_punct(elem_start, "...") {
                self.label_vars(elem_start + 1, elem_end, in_root, out);
            } else if !is_object {
                self.label_vars(elem_start, elem_end, in_root, out);
            } else if let Some(colon) = self.find_top_level(elem_start, elem_end, ":") {
                self.label_vars(colon + 1, elem_end, in_root, out);
            } else if self.tokens[elem_start].kind == TokenKind::Ident {
                out.push(self.label_var(elem_start, true, in_root));
            }
        }
    }
}

fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'' | b'`')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_relief::ParseErrorCode;

    fn texts<'a>(source: &'a str, spans: &[Span]) -> Vec<&'a str> {
        spans.iter().map(|span| span.text(source)).collect()
    }

    #[test]
    fn test_export_default_object() {
        let source = "import A from './A.vue'\nexport default {\n  props: { msg: String },\n  components: { A },\n}\n";
        let facts = analyze_script(source).unwrap();
        let export = facts.export_default.unwrap();
        assert!(export.span.text(source).starts_with("export default {"));
        assert!(export.span.text(source).ends_with('}'));
        assert!(export.options.unwrap().text(source).starts_with("{\n  props"));
        assert_eq!(export.props, vec!["msg"]);
        assert_eq!(export.components, vec!["A"]);
    }

    #[test]
    fn test_export_default_define_component() {
        let source = "export default defineComponent({ props: ['a', 'b'] });";
        let facts = analyze_script(source).unwrap();
        let export = facts.export_default.unwrap();
        assert_eq!(export.span.text(source), source);
        assert_eq!(export.options.unwrap().text(source), "{ props: ['a', 'b'] }");
        assert_eq!(export.props, vec!["a", "b"]);
    }

    #[test]
    fn test_setup_exposes() {
        let source = "import Foo, { bar, baz as qux, type T } from './foo'\nimport type { U } from './u'\nconst a = 1, { b, c: [d] } = obj\nlet [e, ...f] = arr\nfunction g() {}\nclass H {}\n";
        let facts = analyze_script_setup(source).unwrap();
        assert_eq!(
            texts(source, &facts.exposes),
            vec!["Foo", "bar", "qux", "a", "b", "d", "e", "f", "g", "H"]
        );
        assert_eq!(facts.imports.len(), 2);
        assert_eq!(
            facts.imports[0].text(source),
            "import Foo, { bar, baz as qux, type T } from './foo'"
        );
    }

    #[test]
    fn test_define_props_runtime() {
        let source = "const props = defineProps({ foo: String, 'bar-baz': Number })\nconst emit = defineEmit(['change'])";
        let facts = analyze_script_setup(source).unwrap();
        let props = facts.define_props.unwrap();
        assert_eq!(
            props.args.unwrap().text(source),
            "{ foo: String, 'bar-baz': Number }"
        );
        assert!(props.type_args.is_none());
        assert_eq!(facts.props, vec!["foo", "bar-baz"]);
        assert_eq!(facts.define_emit.unwrap().args.unwrap().text(source), "['change']");
    }

    #[test]
    fn test_define_props_type_literal() {
        let source = "defineProps<{\n  msg: string\n  count?: number; items: Array<Map<string, number>>\n}>()";
        let facts = analyze_script_setup(source).unwrap();
        let props = facts.define_props.unwrap();
        assert!(props.args.is_none());
        assert!(props.type_args.unwrap().text(source).starts_with("{\n  msg"));
        assert_eq!(facts.props, vec!["msg", "count", "items"]);
    }

    #[test]
    fn test_ref_label_simple() {
        let source = "ref: count = 0\nconst other = 1";
        let facts = analyze_script_setup(source).unwrap();
        assert_eq!(facts.labels.len(), 1);
        let label = &facts.labels[0];
        assert_eq!(label.span.text(source), "ref: count = 0");
        assert_eq!(label.label.text(source), "ref");
        let binding = &label.bindings[0];
        assert_eq!(binding.left.text(source), "count");
        assert_eq!(binding.right.unwrap().text(source), "0");
        assert_eq!(binding.parent.text(source), "count = 0");
        assert_eq!(binding.vars[0].name, "count");
        assert!(binding.vars[0].in_root);
        assert!(!binding.vars[0].is_shorthand);
    }

    #[test]
    fn test_ref_label_destructure() {
        let source = "ref: ({ a, b: c, ...d } = useFoo());";
        let facts = analyze_script_setup(source).unwrap();
        let label = &facts.labels[0];
        assert_eq!(label.span.text(source), source);
        let binding = &label.bindings[0];
        assert_eq!(binding.parent.text(source), "({ a, b: c, ...d } = useFoo())");
        assert_eq!(binding.left.text(source), "{ a, b: c, ...d }");
        let vars: Vec<_> = binding
            .vars
            .iter()
            .map(|v| (v.name.as_str(), v.is_shorthand))
            .collect();
        assert_eq!(vars, vec![("a", true), ("c", false), ("d", false)]);
    }

    #[test]
    fn test_ref_label_nested_not_root() {
        let source = "function f() {\n  ref: inner = 1\n}\nconst o = { ref: 1 }";
        let facts = analyze_script_setup(source).unwrap();
        assert_eq!(facts.labels.len(), 1);
        assert!(!facts.labels[0].bindings[0].vars[0].in_root);
        assert_eq!(facts.labels[0].span.text(source), "ref: inner = 1");
    }

    #[test]
    fn test_unterminated_string_fails_analysis() {
        let err = analyze_script_setup("const a = 'oops\n").unwrap_err();
        assert_eq!(err.code, ParseErrorCode::UnterminatedString);
    }
}

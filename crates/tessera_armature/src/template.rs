//! Template parser.
//!
//! A tolerant HTML-like parser: unclosed elements are closed at their parent's end tag or at
//! end of input, stray end tags are skipped, and every recovery is reported as a
//! [`ParseError`]. After the tree is built, `v-if` chains and `v-for` elements are lifted into
//! structural nodes.

use compact_str::CompactString;
use memchr::memchr;
use once_cell::sync::Lazy;
use regex::Regex;
use tessera_carton::Span;
use tessera_relief::{
    AttributeNode, AttributeValue, CommentNode, DirectiveArg, DirectiveNode, ElementNode,
    Expression, ForNode, IfBranch, IfNode, InterpolationNode, ParseError, ParseErrorCode,
    PropNode, TemplateAst, TemplateNode, TextNode,
};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// `lhs in source` / `lhs of source`.
static FOR_ALIAS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)^(\s*)(.*?)\s+(?:in|of)\s+(\S.*?)\s*$").ok());

/// Parse template content.
pub fn parse_template(source: &str) -> TemplateAst {
    let mut parser = Parser::new(source);
    parser.parse();
    let Parser {
        root, mut errors, ..
    } = parser;
    let children = structure_children(root, &mut errors);
    errors.sort_by_key(|error| error.span.start);
    TemplateAst { children, errors }
}

struct OpenElement {
    element: ElementNode,
}

struct Parser<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    stack: Vec<OpenElement>,
    root: Vec<TemplateNode>,
    errors: Vec<ParseError>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            stack: Vec::new(),
            root: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse(&mut self) {
        while self.pos < self.bytes.len() {
            if self.starts_with("<!--") {
                self.parse_comment();
            } else if self.starts_with("</") && self.peek_is_tag_start(2) {
                self.parse_close_tag();
            } else if self.starts_with("<") && self.peek_is_tag_start(1) {
                self.parse_open_tag();
            } else if self.starts_with("{{") {
                self.parse_interpolation();
            } else {
                self.parse_text();
            }
        }

        while let Some(open) = self.stack.pop() {
            self.error(
                ParseErrorCode::UnclosedElement,
                format!("Element is missing end tag: <{}>", open.element.tag),
                open.element.tag_span,
            );
            let mut element = open.element;
            element.loc.end = self.bytes.len() as u32;
            self.add_child(TemplateNode::Element(Box::new(element)));
        }
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.bytes[self.pos..].starts_with(prefix.as_bytes())
    }

    fn peek_is_tag_start(&self, ahead: usize) -> bool {
        self.bytes
            .get(self.pos + ahead)
            .is_some_and(|b| b.is_ascii_alphabetic())
    }

    fn error(&mut self, code: ParseErrorCode, message: impl Into<String>, span: Span) {
        self.errors.push(ParseError::new(code, message, span));
    }

    fn add_child(&mut self, child: TemplateNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.element.children.push(child),
            None => self.root.push(child),
        }
    }

    fn find(&self, from: usize, needle: &str) -> Option<usize> {
        self.source
            .get(from..)?
            .find(needle)
            .map(|offset| from + offset)
    }

    fn parse_comment(&mut self) {
        let start = self.pos;
        let (content_end, end) = match self.find(start + 4, "-->") {
            Some(close) => (close, close + 3),
            None => {
                self.error(
                    ParseErrorCode::UnclosedComment,
                    "Unclosed comment",
                    Span::from_usize(start, self.bytes.len()),
                );
                (self.bytes.len(), self.bytes.len())
            }
        };
        self.add_child(TemplateNode::Comment(CommentNode {
            content: self.source[start + 4..content_end].to_string(),
            loc: Span::from_usize(start, end),
        }));
        self.pos = end;
    }

    fn parse_text(&mut self) {
        let start = self.pos;
        let mut pos = start + 1;
        while pos < self.bytes.len() {
            match memchr(b'<', &self.bytes[pos..]) {
                Some(offset) => {
                    let lt = pos + offset;
                    let interp = self.find(pos, "{{").filter(|&i| i < lt);
                    if let Some(interp) = interp {
                        pos = interp;
                        break;
                    }
                    let next = self.bytes.get(lt + 1).copied();
                    if next.is_some_and(|b| b.is_ascii_alphabetic() || b == b'/' || b == b'!') {
                        pos = lt;
                        break;
                    }
                    pos = lt + 1;
                }
                None => {
                    pos = self.find(pos, "{{").unwrap_or(self.bytes.len());
                    break;
                }
            }
        }
        let end = pos.min(self.bytes.len());
        self.add_child(TemplateNode::Text(TextNode {
            content: self.source[start..end].to_string(),
            loc: Span::from_usize(start, end),
        }));
        self.pos = end;
    }

    fn parse_interpolation(&mut self) {
        let start = self.pos;
        let Some(close) = self.find(start + 2, "}}") else {
            self.error(
                ParseErrorCode::UnclosedInterpolation,
                "Interpolation end sign was not found",
                Span::from_usize(start, start + 2),
            );
            let end = self.bytes.len();
            self.add_child(TemplateNode::Text(TextNode {
                content: self.source[start..end].to_string(),
                loc: Span::from_usize(start, end),
            }));
            self.pos = end;
            return;
        };
        let content_start = start + 2;
        self.add_child(TemplateNode::Interpolation(InterpolationNode {
            content: Expression::new(
                &self.source[content_start..close],
                Span::from_usize(content_start, close),
            ),
            loc: Span::from_usize(start, close + 2),
        }));
        self.pos = close + 2;
    }

    fn scan_tag_name(&mut self) -> Span {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
                break;
            }
            self.pos += 1;
        }
        Span::from_usize(start, self.pos)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn parse_close_tag(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let name_span = self.scan_tag_name();
        let end = memchr(b'>', &self.bytes[self.pos..]).map_or(self.bytes.len(), |o| self.pos + o + 1);
        self.pos = end;
        let name = name_span.text(self.source);

        let Some(depth) = self
            .stack
            .iter()
            .rposition(|open| open.element.tag.eq_ignore_ascii_case(name))
        else {
            self.error(
                ParseErrorCode::UnexpectedClosingTag,
                format!("Invalid end tag: </{name}>"),
                Span::from_usize(start, end),
            );
            return;
        };

        while self.stack.len() > depth + 1 {
            if let Some(open) = self.stack.pop() {
                self.error(
                    ParseErrorCode::UnclosedElement,
                    format!("Element is missing end tag: <{}>", open.element.tag),
                    open.element.tag_span,
                );
                let mut element = open.element;
                element.loc.end = start as u32;
                self.add_child(TemplateNode::Element(Box::new(element)));
            }
        }

        if let Some(open) = self.stack.pop() {
            let mut element = open.element;
            element.end_tag_span = Some(name_span);
            element.loc.end = end as u32;
            self.add_child(TemplateNode::Element(Box::new(element)));
        }
    }

    fn parse_open_tag(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let tag_span = self.scan_tag_name();
        let tag = CompactString::new(tag_span.text(self.source));

        let mut props = Vec::new();
        let mut is_self_closing = false;
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }
            match self.bytes[self.pos] {
                b'>' => {
                    self.pos += 1;
                    break;
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    is_self_closing = true;
                    self.pos += 2;
                    break;
                }
                b'/' => self.pos += 1,
                _ => props.push(self.parse_attribute()),
            }
        }

        let element = ElementNode {
            is_self_closing,
            end_tag_span: None,
            props,
            children: Vec::new(),
            loc: Span::from_usize(start, self.pos),
            tag_span,
            tag,
        };

        let is_void = VOID_ELEMENTS
            .iter()
            .any(|void| element.tag.eq_ignore_ascii_case(void));
        if is_self_closing || is_void {
            self.add_child(TemplateNode::Element(Box::new(element)));
        } else {
            self.stack.push(OpenElement { element });
        }
    }

    fn parse_attribute(&mut self) -> PropNode {
        let start = self.pos;
        let mut bracket_depth = 0usize;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'[' => bracket_depth += 1,
                b']' => bracket_depth = bracket_depth.saturating_sub(1),
                _ if bracket_depth > 0 => {}
                b'=' | b'>' => break,
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => break,
                _ if b.is_ascii_whitespace() => break,
                _ => {}
            }
            self.pos += 1;
        }
        if self.pos == start {
            self.pos += 1;
        }
        let name_span = Span::from_usize(start, self.pos);

        let save = self.pos;
        self.skip_whitespace();
        let value = if self.bytes.get(self.pos) == Some(&b'=') {
            self.pos += 1;
            self.skip_whitespace();
            Some(self.parse_attribute_value())
        } else {
            self.pos = save;
            None
        };
        let loc = Span::from_usize(start, self.pos);

        let name = name_span.text(self.source);
        if is_directive(name) {
            PropNode::Directive(self.build_directive(name_span, value, loc))
        } else {
            PropNode::Attribute(AttributeNode {
                name: CompactString::new(name),
                name_span,
                value,
                loc,
            })
        }
    }

    fn parse_attribute_value(&mut self) -> AttributeValue {
        let quote_start = self.pos;
        match self.bytes.get(self.pos).copied() {
            Some(quote @ (b'"' | b'\'')) => {
                let content_start = self.pos + 1;
                let content_end = memchr(quote, &self.bytes[content_start..])
                    .map_or(self.bytes.len(), |o| content_start + o);
                self.pos = (content_end + 1).min(self.bytes.len());
                AttributeValue {
                    content: self.source[content_start..content_end].to_string(),
                    span: Span::from_usize(content_start, content_end),
                    quoted_span: Span::from_usize(quote_start, self.pos),
                }
            }
            _ => {
                while self.pos < self.bytes.len()
                    && !self.bytes[self.pos].is_ascii_whitespace()
                    && self.bytes[self.pos] != b'>'
                {
                    self.pos += 1;
                }
                let span = Span::from_usize(quote_start, self.pos);
                AttributeValue {
                    content: span.text(self.source).to_string(),
                    span,
                    quoted_span: span,
                }
            }
        }
    }

    fn build_directive(
        &self,
        name_span: Span,
        value: Option<AttributeValue>,
        loc: Span,
    ) -> DirectiveNode {
        let raw = name_span.text(self.source);
        let base = name_span.start as usize;

        // (directive name, offset after the name, whether an argument follows)
        let (name, mut offset, has_arg) = match raw.as_bytes()[0] {
            b':' => ("bind", 1, true),
            b'@' => ("on", 1, true),
            b'#' => ("slot", 1, true),
            b'.' => ("bind", 1, true),
            _ => {
                let body = &raw[2..];
                let end = body.find([':', '.']).unwrap_or(body.len());
                let has_arg = body[end..].starts_with(':');
                (&body[..end], 2 + end + usize::from(has_arg), has_arg)
            }
        };

        let mut arg = None;
        if has_arg {
            let rest = &raw[offset..];
            let len = if rest.starts_with('[') {
                rest.find(']').map_or(rest.len(), |i| i + 1)
            } else {
                rest.find('.').unwrap_or(rest.len())
            };
            let content = &rest[..len];
            arg = if let Some(dynamic) = content.strip_prefix('[') {
                let inner = dynamic.strip_suffix(']').unwrap_or(dynamic);
                Some(DirectiveArg {
                    content: CompactString::new(inner),
                    span: Span::from_usize(base + offset + 1, base + offset + 1 + inner.len()),
                    is_static: false,
                })
            } else {
                (!content.is_empty()).then(|| DirectiveArg {
                    content: CompactString::new(content),
                    span: Span::from_usize(base + offset, base + offset + len),
                    is_static: true,
                })
            };
            offset += len;
        }

        let mut modifiers: Vec<CompactString> = raw[offset..]
            .split('.')
            .filter(|m| !m.is_empty())
            .map(CompactString::new)
            .collect();
        if raw.starts_with('.') {
            modifiers.push(CompactString::const_new("prop"));
        }

        DirectiveNode {
            name: CompactString::new(name),
            raw_name: CompactString::new(raw),
            arg,
            exp: value.map(|value| Expression::new(value.content, value.span)),
            modifiers,
            loc,
        }
    }
}

fn is_directive(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(b':' | b'@' | b'#') => true,
        Some(b'.') => bytes.len() > 1,
        Some(b'v') => bytes.len() > 2 && bytes[1] == b'-' && bytes[2].is_ascii_alphanumeric(),
        _ => false,
    }
}

/// Lift `v-if` chains and `v-for` elements into structural nodes, bottom-up.
fn structure_children(
    children: Vec<TemplateNode>,
    errors: &mut Vec<ParseError>,
) -> Vec<TemplateNode> {
    let mut result: Vec<TemplateNode> = Vec::with_capacity(children.len());
    let mut pending_gap: Vec<TemplateNode> = Vec::new();

    for child in children {
        let TemplateNode::Element(mut element) = child else {
            let is_gap = match &child {
                TemplateNode::Text(text) => text.content.trim().is_empty(),
                TemplateNode::Comment(_) => true,
                _ => false,
            };
            if is_gap && matches!(result.last(), Some(TemplateNode::If(_))) {
                pending_gap.push(child);
            } else {
                result.append(&mut pending_gap);
                result.push(child);
            }
            continue;
        };
        element.children = structure_children(std::mem::take(&mut element.children), errors);

        // `Some(None)` is a plain `v-else`.
        let else_branch = take_directive(&mut element, "else-if")
            .map(|dir| dir.exp)
            .or_else(|| take_directive(&mut element, "else").map(|_| None));

        if let Some(condition) = else_branch {
            if let Some(TemplateNode::If(if_node)) = result.last_mut() {
                pending_gap.clear();
                let loc = element.loc;
                if_node.loc.end = loc.end;
                if_node.branches.push(IfBranch {
                    condition,
                    children: branch_children(element, errors),
                    loc,
                });
                continue;
            }
        }
        result.append(&mut pending_gap);

        if let Some(dir) = take_directive(&mut element, "if") {
            let loc = element.loc;
            result.push(TemplateNode::If(Box::new(IfNode {
                branches: vec![IfBranch {
                    condition: dir.exp,
                    children: branch_children(element, errors),
                    loc,
                }],
                loc,
            })));
            continue;
        }

        result.push(for_or_element(element, errors));
    }

    result.append(&mut pending_gap);
    result
}

fn take_directive(element: &mut ElementNode, name: &str) -> Option<DirectiveNode> {
    let index = element.props.iter().position(
        |prop| matches!(prop, PropNode::Directive(dir) if dir.name == name),
    )?;
    match element.props.remove(index) {
        PropNode::Directive(dir) => Some(dir),
        PropNode::Attribute(_) => None,
    }
}

fn branch_children(
    element: Box<ElementNode>,
    errors: &mut Vec<ParseError>,
) -> Vec<TemplateNode> {
    let has_for = element.find_directive("for").is_some();
    if !has_for && is_unwrapped_template(&element) {
        return element.children;
    }
    vec![for_or_element(element, errors)]
}

fn is_unwrapped_template(element: &ElementNode) -> bool {
    element.tag == "template" && element.find_directive("slot").is_none()
}

fn for_or_element(
    mut element: Box<ElementNode>,
    errors: &mut Vec<ParseError>,
) -> TemplateNode {
    let Some(dir) = take_directive(&mut element, "for") else {
        return TemplateNode::Element(element);
    };
    let parsed = dir.exp.as_ref().and_then(parse_v_for);
    let Some(parts) = parsed else {
        errors.push(ParseError::new(
            ParseErrorCode::InvalidVFor,
            "v-for has invalid expression",
            dir.exp.as_ref().map_or(dir.loc, |exp| exp.span),
        ));
        return TemplateNode::Element(element);
    };

    let loc = element.loc;
    let children = if is_unwrapped_template(&element) {
        element.children
    } else {
        vec![TemplateNode::Element(element)]
    };
    TemplateNode::For(Box::new(ForNode {
        source: parts.source,
        value: parts.value,
        key: parts.key,
        index: parts.index,
        children,
        loc,
    }))
}

struct ForParts {
    source: Expression,
    value: Option<Expression>,
    key: Option<Expression>,
    index: Option<Expression>,
}

fn parse_v_for(exp: &Expression) -> Option<ForParts> {
    let pattern = FOR_ALIAS.as_ref()?;
    let captures = pattern.captures(&exp.content)?;
    let lhs = captures.get(2)?;
    let rhs = captures.get(3)?;
    let base = exp.span.start as usize;

    let source = Expression::new(
        rhs.as_str(),
        Span::from_usize(base + rhs.start(), base + rhs.end()),
    );

    let mut lhs_start = lhs.start();
    let mut lhs_text = lhs.as_str();
    if lhs_text.starts_with('(') && lhs_text.ends_with(')') && lhs_text.len() >= 2 {
        lhs_text = &lhs_text[1..lhs_text.len() - 1];
        lhs_start += 1;
    }

    let mut aliases = split_aliases(lhs_text)
        .into_iter()
        .map(|(start, end)| {
            let text = &lhs_text[start..end];
            let trimmed_start = start + (text.len() - text.trim_start().len());
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| {
                let abs = base + lhs_start + trimmed_start;
                Expression::new(trimmed, Span::from_usize(abs, abs + trimmed.len()))
            })
        });

    Some(ForParts {
        source,
        value: aliases.next().flatten(),
        key: aliases.next().flatten(),
        index: aliases.next().flatten(),
    })
}

/// Split on commas outside brackets. Returns byte ranges.
fn split_aliases(text: &str) -> Vec<(usize, usize)> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (index, b) in text.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth == 0 => {
                parts.push((start, index));
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push((start, text.len()));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(ast: &TemplateAst) -> &ElementNode {
        match &ast.children[0] {
            TemplateNode::Element(el) => el,
            other => panic!("Expected element node, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_element() {
        let ast = parse_template("<div></div>");
        assert!(ast.errors.is_empty());
        let el = first_element(&ast);
        assert_eq!(el.tag, "div");
        assert_eq!(el.tag_span, Span::new(1, 4));
        assert_eq!(el.end_tag_span, Some(Span::new(7, 10)));
        assert_eq!(el.loc, Span::new(0, 11));
    }

    #[test]
    fn test_parse_interpolation() {
        let source = "<p>{{ msg }}</p>";
        let ast = parse_template(source);
        let el = first_element(&ast);
        let TemplateNode::Interpolation(interp) = &el.children[0] else {
            panic!("Expected interpolation node");
        };
        assert_eq!(interp.content.content, " msg ");
        assert_eq!(interp.content.span.text(source), " msg ");
    }

    #[test]
    fn test_parse_directives() {
        let source = r#"<Comp :foo-bar="a" @click.stop="go" v-model:title="t" #item="{ x }" .baz="b" :[key]="c" v-focus />"#;
        let ast = parse_template(source);
        assert!(ast.errors.is_empty());
        let el = first_element(&ast);
        assert!(el.is_self_closing);
        let dirs: Vec<_> = el.directives().collect();
        assert_eq!(dirs.len(), 7);

        assert_eq!(dirs[0].name, "bind");
        let arg = dirs[0].arg.as_ref().unwrap();
        assert_eq!(arg.content, "foo-bar");
        assert_eq!(arg.span.text(source), "foo-bar");
        assert_eq!(dirs[0].exp.as_ref().unwrap().span.text(source), "a");

        assert_eq!(dirs[1].name, "on");
        assert_eq!(dirs[1].arg.as_ref().unwrap().content, "click");
        assert_eq!(dirs[1].modifiers, vec!["stop"]);

        assert_eq!(dirs[2].name, "model");
        assert_eq!(dirs[2].arg.as_ref().unwrap().span.text(source), "title");

        assert_eq!(dirs[3].name, "slot");
        assert_eq!(dirs[3].arg.as_ref().unwrap().content, "item");

        assert_eq!(dirs[4].name, "bind");
        assert_eq!(dirs[4].arg.as_ref().unwrap().span.text(source), "baz");
        assert_eq!(dirs[4].modifiers, vec!["prop"]);

        let dynamic = dirs[5].arg.as_ref().unwrap();
        assert!(!dynamic.is_static);
        assert_eq!(dynamic.span.text(source), "key");

        assert_eq!(dirs[6].name, "focus");
        assert!(dirs[6].arg.is_none());
        assert!(dirs[6].exp.is_none());
    }

    #[test]
    fn test_parse_static_attribute() {
        let source = r#"<div class="a b" disabled></div>"#;
        let ast = parse_template(source);
        let el = first_element(&ast);
        let class = el.find_attribute("class").unwrap();
        let value = class.value.as_ref().unwrap();
        assert_eq!(value.content, "a b");
        assert_eq!(value.quoted_span.text(source), "\"a b\"");
        assert!(el.find_attribute("disabled").unwrap().value.is_none());
    }

    #[test]
    fn test_parse_void_element() {
        let ast = parse_template("<div><input type=\"text\"><span></span></div>");
        assert!(ast.errors.is_empty());
        assert_eq!(first_element(&ast).children.len(), 2);
    }

    #[test]
    fn test_if_chain_structured() {
        let source = "<div v-if=\"a\"></div>\n<!-- c -->\n<p v-else-if=\"b\"></p>\n<span v-else></span>";
        let ast = parse_template(source);
        assert_eq!(ast.children.len(), 1);
        let TemplateNode::If(if_node) = &ast.children[0] else {
            panic!("Expected if node");
        };
        assert_eq!(if_node.branches.len(), 3);
        assert_eq!(if_node.branches[0].condition.as_ref().unwrap().content, "a");
        assert_eq!(if_node.branches[1].condition.as_ref().unwrap().content, "b");
        assert!(if_node.branches[2].condition.is_none());
        let TemplateNode::Element(p) = &if_node.branches[1].children[0] else {
            panic!("Expected element");
        };
        assert!(p.find_directive("else-if").is_none());
    }

    #[test]
    fn test_for_structured() {
        let source = r#"<li v-for="(item, index) in items" :key="item.id">{{ item }}</li>"#;
        let ast = parse_template(source);
        let TemplateNode::For(for_node) = &ast.children[0] else {
            panic!("Expected for node");
        };
        assert_eq!(for_node.source.span.text(source), "items");
        assert_eq!(for_node.value.as_ref().unwrap().span.text(source), "item");
        assert_eq!(for_node.key.as_ref().unwrap().span.text(source), "index");
        assert!(for_node.index.is_none());
        let TemplateNode::Element(li) = &for_node.children[0] else {
            panic!("Expected element");
        };
        assert!(li.find_directive("for").is_none());
        assert!(li.find_directive("bind").is_some());
    }

    #[test]
    fn test_template_for_unwrapped() {
        let source = r#"<template v-for="{ a, b } of list"><i></i><b></b></template>"#;
        let ast = parse_template(source);
        let TemplateNode::For(for_node) = &ast.children[0] else {
            panic!("Expected for node");
        };
        assert_eq!(for_node.value.as_ref().unwrap().content, "{ a, b }");
        assert_eq!(for_node.children.len(), 2);
    }

    #[test]
    fn test_invalid_v_for_reported() {
        let ast = parse_template(r#"<li v-for="items"></li>"#);
        assert_eq!(ast.errors[0].code, ParseErrorCode::InvalidVFor);
        assert!(matches!(ast.children[0], TemplateNode::Element(_)));
    }

    #[test]
    fn test_unclosed_element_recovered() {
        let ast = parse_template("<div><span></div>");
        assert_eq!(ast.errors.len(), 1);
        assert_eq!(ast.errors[0].code, ParseErrorCode::UnclosedElement);
        let div = first_element(&ast);
        assert_eq!(div.children.len(), 1);
    }

    #[test]
    fn test_stray_close_tag() {
        let ast = parse_template("</p><div></div>");
        assert_eq!(ast.errors[0].code, ParseErrorCode::UnexpectedClosingTag);
        assert_eq!(first_element(&ast).tag, "div");
    }

    #[test]
    fn test_text_with_lt() {
        let source = "a < b";
        let ast = parse_template(source);
        assert_eq!(ast.children.len(), 1);
        let TemplateNode::Text(text) = &ast.children[0] else {
            panic!("Expected text");
        };
        assert_eq!(text.content, "a < b");
    }
}

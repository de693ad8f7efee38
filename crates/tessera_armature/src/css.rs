//! Class selector scanning for style blocks.

use compact_str::CompactString;
use once_cell::sync::Lazy;
use regex::Regex;
use tessera_carton::{FxHashSet, Span};

/// `.name` where the name follows CSS identifier rules.
static CLASS_SELECTOR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\.(-?[_a-zA-Z]+[_a-zA-Z0-9-]*)").ok());

/// A class selector occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    pub name: CompactString,
    /// Span of `.name`, including the dot.
    pub span: Span,
}

/// Find class selectors in style text.
///
/// Only selector preludes (the text before each `{`) are scanned, so dotted values in
/// declarations such as `url(a.png)` are skipped. Comments and strings are ignored.
pub fn find_class_names(source: &str) -> Vec<ClassName> {
    let Some(pattern) = CLASS_SELECTOR.as_ref() else {
        return Vec::new();
    };
    let masked = mask_comments_and_strings(source);

    let mut result = Vec::new();
    let mut seen = FxHashSet::default();
    let mut prelude_start = 0;
    for (index, byte) in masked.bytes().enumerate() {
        match byte {
            b'{' => {
                let prelude = &masked[prelude_start..index];
                for captures in pattern.captures_iter(prelude) {
                    let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                        continue;
                    };
                    let start = prelude_start + whole.start();
                    if seen.insert(start) {
                        result.push(ClassName {
                            name: CompactString::new(name.as_str()),
                            span: Span::from_usize(start, prelude_start + whole.end()),
                        });
                    }
                }
                prelude_start = index + 1;
            }
            b'}' | b';' => prelude_start = index + 1,
            _ => {}
        }
    }
    result
}

/// Replace comment and string bytes with spaces, keeping offsets stable.
fn mask_comments_and_strings(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut masked = Vec::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b == b'/' && bytes.get(pos + 1) == Some(&b'*') {
            let end = source[pos + 2..]
                .find("*/")
                .map_or(bytes.len(), |offset| pos + 2 + offset + 2);
            masked.extend(std::iter::repeat(b' ').take(end - pos));
            pos = end;
        } else if b == b'"' || b == b'\'' {
            let mut end = pos + 1;
            while end < bytes.len() && bytes[end] != b && bytes[end] != b'\n' {
                end += if bytes[end] == b'\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(bytes.len());
            masked.extend(std::iter::repeat(b' ').take(end - pos));
            pos = end;
        } else {
            masked.push(if b.is_ascii() { b } else { b' ' });
            pos += 1;
        }
    }
    // Every non-ASCII byte was replaced, so this cannot fail.
    String::from_utf8(masked).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(source: &str) -> Vec<&str> {
        find_class_names(source)
            .into_iter()
            .map(|c| c.span.text(source))
            .collect()
    }

    #[test]
    fn test_find_simple_classes() {
        let source = ".foo { color: red }\n.bar-baz, div.qux > .foo:hover { }";
        let found = find_class_names(source);
        let texts: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(texts, vec!["foo", "bar-baz", "qux", "foo"]);
        assert_eq!(found[0].span, Span::new(0, 4));
        assert_eq!(found[1].span.text(source), ".bar-baz");
    }

    #[test]
    fn test_skip_declarations_and_comments() {
        let source = "/* .nope { } */\n.a { background: url(b.png); margin: .5em }\n.c { content: '.d' }";
        assert_eq!(selectors(source), vec![".a", ".c"]);
    }

    #[test]
    fn test_nested_rules() {
        let source = "@media (max-width: 10.5px) { .m { } }\n.outer { .inner { } }";
        insta::assert_snapshot!(selectors(source).join("\n"), @r"
        .m
        .outer
        .inner
        ");
    }
}

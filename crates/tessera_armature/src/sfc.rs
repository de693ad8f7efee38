//! Component file block splitter.
//!
//! Byte-level scan: only top-level tags are considered, everything between blocks is
//! ignored. `<template>` blocks track nested `<template>` tags; other blocks end at the
//! first matching closing tag.

use compact_str::CompactString;
use memchr::memchr;
use tessera_carton::Span;
use tessera_relief::{BlockAttr, ParseError, ParseErrorCode, SfcBlock, SfcDescriptor};

const TAG_TEMPLATE: &[u8] = b"template";
const TAG_SCRIPT: &[u8] = b"script";
const TAG_STYLE: &[u8] = b"style";

/// Split a component file into its blocks.
///
/// Duplicate `<template>`, `<script>` and `<script setup>` blocks are reported in
/// [`SfcDescriptor::errors`]; the first block of each kind is kept.
pub fn parse_sfc(source: &str) -> SfcDescriptor {
    let mut descriptor = SfcDescriptor::default();
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        let Some(next_lt) = memchr(b'<', &bytes[pos..]) else {
            break;
        };
        pos += next_lt;

        if bytes[pos..].starts_with(b"<!--") {
            pos = match find_bytes(bytes, pos + 4, b"-->") {
                Some(end) => end + 3,
                None => len,
            };
            continue;
        }

        let Some(raw) = parse_block(bytes, source, pos) else {
            pos += 1;
            continue;
        };
        pos = raw.end;

        if raw.unclosed {
            descriptor.errors.push(ParseError::new(
                ParseErrorCode::UnclosedBlock,
                format!("Element is missing end tag: <{}>", raw.block.block_type),
                Span::from_usize(raw.tag_start, raw.tag_end),
            ));
        }

        let block = raw.block;
        let tag = block.block_type.as_bytes();
        let duplicate_span = Span::from_usize(raw.tag_start, raw.tag_end);
        if tag_name_eq(tag, TAG_TEMPLATE) {
            if descriptor.template.is_some() {
                descriptor.errors.push(duplicate_error("<template>", duplicate_span));
            } else {
                descriptor.template = Some(block);
            }
        } else if tag_name_eq(tag, TAG_SCRIPT) {
            let slot = if block.is_setup() {
                &mut descriptor.script_setup
            } else {
                &mut descriptor.script
            };
            if slot.is_some() {
                let name = if block.is_setup() {
                    "<script setup>"
                } else {
                    "<script>"
                };
                descriptor.errors.push(duplicate_error(name, duplicate_span));
            } else {
                *slot = Some(block);
            }
        } else if tag_name_eq(tag, TAG_STYLE) {
            descriptor.styles.push(block);
        } else {
            descriptor.custom_blocks.push(block);
        }
    }

    descriptor
}

fn duplicate_error(name: &str, span: Span) -> ParseError {
    ParseError::new(
        ParseErrorCode::DuplicateBlock,
        format!("Single file component can contain only one {name} element"),
        span,
    )
}

struct RawBlock {
    block: SfcBlock,
    tag_start: usize,
    tag_end: usize,
    end: usize,
    unclosed: bool,
}

fn parse_block(bytes: &[u8], source: &str, start: usize) -> Option<RawBlock> {
    let len = bytes.len();
    let mut pos = start + 1;

    let tag_start = pos;
    while pos < len && is_tag_name_char(bytes[pos]) {
        pos += 1;
    }
    if pos == tag_start || !bytes[tag_start].is_ascii_alphabetic() {
        return None;
    }
    let tag_end = pos;
    let tag_name = &source[tag_start..tag_end];

    let mut attrs = Vec::new();
    while pos < len && bytes[pos] != b'>' {
        while pos < len && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= len || bytes[pos] == b'>' {
            break;
        }
        if bytes[pos] == b'/' {
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < len && !is_whitespace(bytes[pos]) && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let name_span = Span::from_usize(name_start, pos);

        while pos < len && is_whitespace(bytes[pos]) {
            pos += 1;
        }

        let mut value_span = None;
        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && is_whitespace(bytes[pos]) {
                pos += 1;
            }
            if pos < len && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos];
                pos += 1;
                let value_start = pos;
                pos = memchr(quote, &bytes[pos..]).map_or(len, |offset| pos + offset);
                value_span = Some(Span::from_usize(value_start, pos));
                if pos < len {
                    pos += 1;
                }
            } else {
                let value_start = pos;
                while pos < len && !is_whitespace(bytes[pos]) && bytes[pos] != b'>' {
                    pos += 1;
                }
                value_span = Some(Span::from_usize(value_start, pos));
            }
        }

        attrs.push(BlockAttr {
            name: CompactString::new(name_span.text(source)),
            value: value_span.map(|span| CompactString::new(span.text(source))),
            name_span,
            value_span,
        });
    }

    let is_self_closing = pos < len && pos > 0 && bytes[pos - 1] == b'/';
    if pos >= len {
        return None;
    }
    pos += 1;

    let block_type = CompactString::new(tag_name.to_ascii_lowercase());
    if is_self_closing {
        return Some(RawBlock {
            block: SfcBlock {
                block_type,
                content: String::new(),
                loc: Span::from_usize(pos, pos),
                attrs,
            },
            tag_start,
            tag_end,
            end: pos,
            unclosed: false,
        });
    }

    let content_start = pos;
    let nested = tag_name_eq(tag_name.as_bytes(), TAG_TEMPLATE);
    let (content_end, end, unclosed) = match find_closing_tag(bytes, pos, tag_name.as_bytes(), nested)
    {
        Some((close_start, close_end)) => (close_start, close_end, false),
        None => (len, len, true),
    };

    Some(RawBlock {
        block: SfcBlock {
            block_type,
            content: source[content_start..content_end].to_string(),
            loc: Span::from_usize(content_start, content_end),
            attrs,
        },
        tag_start,
        tag_end,
        end,
        unclosed,
    })
}

/// Find `</tag>` starting at `pos`. Returns the closing tag's start and end.
fn find_closing_tag(
    bytes: &[u8],
    mut pos: usize,
    tag: &[u8],
    nested: bool,
) -> Option<(usize, usize)> {
    let len = bytes.len();
    let mut depth = 1usize;

    while pos < len {
        let offset = memchr(b'<', &bytes[pos..])?;
        pos += offset;

        if bytes.get(pos + 1) == Some(&b'/') && is_tag_at(bytes, pos + 2, tag) {
            depth -= 1;
            let after = pos + 2 + tag.len();
            let close_end = memchr(b'>', &bytes[after..]).map_or(len, |o| after + o + 1);
            if depth == 0 {
                return Some((pos, close_end));
            }
            pos = close_end;
            continue;
        }

        if nested && is_tag_at(bytes, pos + 1, tag) {
            let after = pos + 1 + tag.len();
            let open_end = memchr(b'>', &bytes[after..]).map_or(len, |o| after + o);
            if open_end == 0 || bytes.get(open_end - 1) != Some(&b'/') {
                depth += 1;
            }
            pos = open_end;
            continue;
        }

        pos += 1;
    }

    None
}

/// Whether `tag` starts at `pos` and is followed by a tag delimiter.
fn is_tag_at(bytes: &[u8], pos: usize, tag: &[u8]) -> bool {
    let end = pos + tag.len();
    end <= bytes.len()
        && bytes[pos..end].eq_ignore_ascii_case(tag)
        && bytes
            .get(end)
            .map_or(true, |&b| is_whitespace(b) || b == b'>' || b == b'/')
}

fn find_bytes(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}

#[inline(always)]
fn tag_name_eq(name: &[u8], expected: &[u8]) -> bool {
    name.len() == expected.len() && name.eq_ignore_ascii_case(expected)
}

#[inline(always)]
fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[inline(always)]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

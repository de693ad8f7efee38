//! Conversions between byte offsets and LSP positions.
//!
//! A position's `character` is a char index within its line, as stored by the rope.

use ropey::Rope;
use tessera_carton::Span;
use tower_lsp::lsp_types::{Position, Range};

/// Convert a byte offset to an LSP Position (0-based line and character).
pub fn offset_to_position(rope: &Rope, offset: usize) -> Option<Position> {
    if offset > rope.len_bytes() {
        return None;
    }

    let char_idx = rope.try_byte_to_char(offset).ok()?;
    let line = rope.char_to_line(char_idx);
    let character = char_idx - rope.line_to_char(line);

    Some(Position {
        line: line as u32,
        character: character as u32,
    })
}

/// Convert an LSP Position to a byte offset. The character is clamped to the line.
pub fn position_to_offset(rope: &Rope, position: Position) -> Option<usize> {
    let line = position.line as usize;
    if line >= rope.len_lines() {
        return None;
    }

    let line_start_char = rope.line_to_char(line);
    let line_len = rope.line(line).len_chars();
    let char_idx = line_start_char + (position.character as usize).min(line_len);

    rope.try_char_to_byte(char_idx).ok()
}

pub fn span_to_range(rope: &Rope, span: Span) -> Option<Range> {
    Some(Range {
        start: offset_to_position(rope, span.start as usize)?,
        end: offset_to_position(rope, span.end as usize)?,
    })
}

pub fn range_to_span(rope: &Rope, range: Range) -> Option<Span> {
    let start = position_to_offset(rope, range.start)?;
    let end = position_to_offset(rope, range.end)?;
    Some(Span::from_usize(start, end).normalized())
}

/// Same as [`offset_to_position`] over plain text.
///
/// Generated documents are short-lived, so building a rope for one lookup is not worth it.
pub fn offset_to_position_str(content: &str, offset: usize) -> Option<Position> {
    if offset > content.len() || !content.is_char_boundary(offset) {
        return None;
    }

    let before = &content[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);

    Some(Position {
        line: line as u32,
        character: before[line_start..].chars().count() as u32,
    })
}

/// Same as [`position_to_offset`] over plain text.
pub fn position_to_offset_str(content: &str, position: Position) -> Option<usize> {
    let mut line_start = 0usize;
    for _ in 0..position.line {
        line_start += content[line_start..].find('\n')? + 1;
    }

    let line = &content[line_start..];
    let line_end = line.find('\n').unwrap_or(line.len());
    let offset = line[..line_end]
        .char_indices()
        .nth(position.character as usize)
        .map_or(line_end, |(i, _)| i);

    Some(line_start + offset)
}

pub fn span_to_range_str(content: &str, span: Span) -> Option<Range> {
    Some(Range {
        start: offset_to_position_str(content, span.start as usize)?,
        end: offset_to_position_str(content, span.end as usize)?,
    })
}

pub fn range_to_span_str(content: &str, range: Range) -> Option<Span> {
    let start = position_to_offset_str(content, range.start)?;
    let end = position_to_offset_str(content, range.end)?;
    Some(Span::from_usize(start, end).normalized())
}

/// Create an LSP Range from start and end positions.
pub fn make_range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Range {
    Range {
        start: Position {
            line: start_line,
            character: start_char,
        },
        end: Position {
            line: end_line,
            character: end_char,
        },
    }
}

//! Append-only text and mapping builder.
//!
//! Every virtual document is written through a [`Generator`]. Text is only ever appended,
//! so a range handed out by one call stays valid for the rest of the build.

use tessera_carton::Span;

use super::{MatchMode, Mapping};

#[derive(Debug, Clone)]
pub struct Generator<P> {
    text: String,
    mappings: Vec<Mapping<P>>,
}

impl<P> Default for Generator<P> {
    fn default() -> Self {
        Self {
            text: String::new(),
            mappings: Vec::new(),
        }
    }
}

impl<P> Generator<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mappings(&self) -> &[Mapping<P>] {
        &self.mappings
    }

    /// Current length of the generated text.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.text.len() as u32
    }

    /// Append unmapped scaffolding.
    pub fn add_text(&mut self, text: &str) -> Span {
        let start = self.offset();
        self.text.push_str(text);
        Span::new(start, self.offset())
    }

    /// Append `code` and map it to `source`.
    pub fn add_code(&mut self, code: &str, source: Span, mode: MatchMode, data: P) -> Span {
        let target = self.add_text(code);
        self.add_mapping_at(target, source, mode, data);
        target
    }

    /// Map the range `code` would occupy if appended now, without appending it.
    ///
    /// Used to lay a coarse mapping over text that is written afterwards piece by piece.
    pub fn add_mapping(&mut self, code: &str, source: Span, mode: MatchMode, data: P) -> Span {
        let start = self.offset();
        let target = Span::new(start, start + code.len() as u32);
        self.add_mapping_at(target, source, mode, data);
        target
    }

    pub fn add_mapping_at(&mut self, target: Span, source: Span, mode: MatchMode, data: P) {
        self.mappings.push(Mapping::new(data, mode, source, target));
    }

    pub fn push_mapping(&mut self, mapping: Mapping<P>) {
        self.mappings.push(mapping);
    }

    pub fn finish(self) -> (String, Vec<Mapping<P>>) {
        (self.text, self.mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_text_returns_range() {
        let mut gen = Generator::<()>::new();
        assert_eq!(gen.add_text("let "), Span::new(0, 4));
        assert_eq!(gen.add_text("x"), Span::new(4, 5));
        assert_eq!(gen.text(), "let x");
        assert!(gen.mappings().is_empty());
    }

    #[test]
    fn test_add_code_maps_written_text() {
        let mut gen = Generator::new();
        gen.add_text("{");
        let range = gen.add_code("count", Span::new(30, 35), MatchMode::Offset, "expr");
        gen.add_text("};");

        assert_eq!(range, Span::new(1, 6));
        let (text, mappings) = gen.finish();
        assert_eq!(text, "{count};");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].target_range, Span::new(1, 6));
        assert_eq!(mappings[0].source_range, Span::new(30, 35));
        assert_eq!(mappings[0].data, "expr");
    }

    #[test]
    fn test_add_mapping_does_not_write() {
        let mut gen = Generator::new();
        let gate = gen.add_mapping("'a': (b)", Span::new(0, 7), MatchMode::Gate, 1);
        assert_eq!(gate, Span::new(0, 8));
        assert_eq!(gen.text(), "");

        gen.add_text("'a': (b)");
        assert_eq!(gen.offset(), 8);
    }
}

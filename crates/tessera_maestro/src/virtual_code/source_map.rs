//! Bidirectional range mapping between two documents.
//!
//! A [`SourceMap`] is an ordered list of [`Mapping`]s. Each mapping relates a range in
//! the source document to a range in the target document under one [`MatchMode`], and may
//! carry alternate range pairs that are tried after the primary one.
//!
//! Lookups scan mappings in insertion order. The single-result lookups return the first
//! structural match, so the order in which a generator pushes mappings decides which one
//! wins when several overlap.

use smallvec::SmallVec;
use tessera_carton::Span;

/// How a lookup range is matched against a mapped range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The lookup range must lie inside the mapped range. The result keeps the same
    /// relative offsets inside the other side.
    Offset,
    /// The lookup range must equal the mapped range exactly. The result is the whole
    /// other side.
    Gate,
    /// The lookup range must lie inside the mapped range. The result is the whole other
    /// side.
    In,
}

impl MatchMode {
    /// Translate `range` from `from` into `to`, or `None` when it does not match.
    pub fn translate(self, range: Span, from: Span, to: Span) -> Option<Span> {
        match self {
            MatchMode::Gate => {
                (range.start == from.start && range.end == from.end).then(|| to.normalized())
            }
            MatchMode::In => from.contains(range).then(|| to.normalized()),
            MatchMode::Offset => {
                if !from.contains(range) {
                    return None;
                }
                let start = i64::from(to.start) + i64::from(range.start) - i64::from(from.start);
                let end = i64::from(to.end) + i64::from(range.end) - i64::from(from.end);
                Some(Span::new(clamp_offset(start), clamp_offset(end)).normalized())
            }
        }
    }
}

#[inline]
fn clamp_offset(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// One `(mode, source, target)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePair {
    pub mode: MatchMode,
    pub source: Span,
    pub target: Span,
}

/// A mapping entry with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping<P> {
    pub data: P,
    pub mode: MatchMode,
    pub source_range: Span,
    pub target_range: Span,
    /// Equally valid range pairs, tried after the primary one.
    pub alternates: SmallVec<[RangePair; 1]>,
}

impl<P> Mapping<P> {
    pub fn new(data: P, mode: MatchMode, source_range: Span, target_range: Span) -> Self {
        Self {
            data,
            mode,
            source_range,
            target_range,
            alternates: SmallVec::new(),
        }
    }

    pub fn with_alternate(mut self, mode: MatchMode, source: Span, target: Span) -> Self {
        self.alternates.push(RangePair {
            mode,
            source,
            target,
        });
        self
    }

    /// Shift every source range forward by `base`.
    pub fn offset_source(mut self, base: u32) -> Self {
        self.source_range = self.source_range.offset_by(base);
        for pair in &mut self.alternates {
            pair.source = pair.source.offset_by(base);
        }
        self
    }

    /// Shift every target range forward by `base`.
    pub fn offset_target(mut self, base: u32) -> Self {
        self.target_range = self.target_range.offset_by(base);
        for pair in &mut self.alternates {
            pair.target = pair.target.offset_by(base);
        }
        self
    }

    /// The primary triple followed by the alternates.
    pub fn pairs(&self) -> impl Iterator<Item = RangePair> + '_ {
        std::iter::once(RangePair {
            mode: self.mode,
            source: self.source_range,
            target: self.target_range,
        })
        .chain(self.alternates.iter().copied())
    }

    /// Replace the payload, keeping every range.
    pub fn map_data<Q>(self, f: impl FnOnce(P) -> Q) -> Mapping<Q> {
        Mapping {
            data: f(self.data),
            mode: self.mode,
            source_range: self.source_range,
            target_range: self.target_range,
            alternates: self.alternates,
        }
    }

    /// Translate `range` through this mapping. At most one result per mapping: the first
    /// matching pair wins.
    fn translate(&self, range: Span, direction: Direction) -> Option<Span> {
        self.pairs().find_map(|pair| {
            let (from, to) = match direction {
                Direction::SourceToTarget => (pair.source, pair.target),
                Direction::TargetToSource => (pair.target, pair.source),
            };
            pair.mode.translate(range, from, to)
        })
    }
}

/// A lookup result: the translated range and the payload of the mapping that produced it.
#[derive(Debug)]
pub struct MappedRange<'a, P> {
    pub data: &'a P,
    pub range: Span,
}

impl<P> Clone for MappedRange<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for MappedRange<'_, P> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    SourceToTarget,
    TargetToSource,
}

/// Ordered mappings between one source document and one target document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMap<P> {
    mappings: Vec<Mapping<P>>,
}

impl<P> Default for SourceMap<P> {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }
}

impl<P> SourceMap<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the given order; it decides first-match results.
    pub fn from_mappings(mappings: Vec<Mapping<P>>) -> Self {
        Self { mappings }
    }

    pub fn push(&mut self, mapping: Mapping<P>) {
        self.mappings.push(mapping);
    }

    pub fn mappings(&self) -> &[Mapping<P>] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// First match from the source side.
    pub fn to_target(&self, range: Span) -> Option<MappedRange<'_, P>> {
        self.lookup(range, Direction::SourceToTarget).next()
    }

    /// First match from the target side.
    pub fn to_source(&self, range: Span) -> Option<MappedRange<'_, P>> {
        self.lookup(range, Direction::TargetToSource).next()
    }

    /// Every match from the source side, in mapping order.
    pub fn all_to_targets(&self, range: Span) -> Vec<MappedRange<'_, P>> {
        self.lookup(range, Direction::SourceToTarget).collect()
    }

    /// Every match from the target side, in mapping order.
    pub fn all_to_sources(&self, range: Span) -> Vec<MappedRange<'_, P>> {
        self.lookup(range, Direction::TargetToSource).collect()
    }

    pub fn is_source(&self, range: Span) -> bool {
        self.to_target(range).is_some()
    }

    pub fn is_target(&self, range: Span) -> bool {
        self.to_source(range).is_some()
    }

    fn lookup(
        &self,
        range: Span,
        direction: Direction,
    ) -> impl Iterator<Item = MappedRange<'_, P>> + '_ {
        self.mappings.iter().filter_map(move |mapping| {
            mapping
                .translate(range, direction)
                .map(|range| MappedRange {
                    data: &mapping.data,
                    range,
                })
        })
    }
}

impl<P> FromIterator<Mapping<P>> for SourceMap<P> {
    fn from_iter<I: IntoIterator<Item = Mapping<P>>>(iter: I) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
        }
    }
}

impl<P> Extend<Mapping<P>> for SourceMap<P> {
    fn extend<I: IntoIterator<Item = Mapping<P>>>(&mut self, iter: I) {
        self.mappings.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u32, end: u32) -> Span {
        Span::new(start, end)
    }

    fn single(mode: MatchMode, source: Span, target: Span) -> SourceMap<&'static str> {
        SourceMap::from_mappings(vec![Mapping::new("m", mode, source, target)])
    }

    #[test]
    fn test_offset_maps_relative_position() {
        let map = single(MatchMode::Offset, span(10, 20), span(100, 110));

        assert_eq!(map.to_target(span(12, 15)).unwrap().range, span(102, 105));
        assert_eq!(map.to_target(span(10, 10)).unwrap().range, span(100, 100));
        assert_eq!(map.to_target(span(20, 20)).unwrap().range, span(110, 110));
        assert_eq!(map.to_source(span(105, 108)).unwrap().range, span(15, 18));
        assert!(map.to_target(span(9, 12)).is_none());
        assert!(map.to_target(span(15, 21)).is_none());
    }

    #[test]
    fn test_offset_round_trip() {
        let map = single(MatchMode::Offset, span(40, 52), span(7, 19));

        for start in 40..=52 {
            for end in start..=52 {
                let source = span(start, end);
                let target = map.to_target(source).unwrap().range;
                assert_eq!(map.to_source(target).unwrap().range, source);
            }
        }
    }

    #[test]
    fn test_offset_between_unequal_lengths() {
        // `fooBar` generated for `foo-bar` in the source
        let map = single(MatchMode::Offset, span(5, 12), span(30, 36));

        assert_eq!(map.to_source(span(30, 36)).unwrap().range, span(5, 12));
        assert_eq!(map.to_target(span(5, 12)).unwrap().range, span(30, 36));
        assert_eq!(map.to_source(span(30, 30)).unwrap().range, span(5, 6));
    }

    #[test]
    fn test_offset_normalizes_inverted_result() {
        let map = single(MatchMode::Offset, span(0, 10), span(0, 2));
        let mapped = map.to_target(span(5, 5)).unwrap().range;
        assert!(mapped.start <= mapped.end);
        assert_eq!(mapped, span(0, 5));
    }

    #[test]
    fn test_gate_exactness() {
        let map = single(MatchMode::Gate, span(10, 20), span(100, 130));

        assert_eq!(map.to_target(span(10, 20)).unwrap().range, span(100, 130));
        assert!(map.to_target(span(11, 20)).is_none());
        assert!(map.to_target(span(10, 19)).is_none());
        assert!(map.to_target(span(9, 21)).is_none());
        assert!(map.to_target(span(15, 15)).is_none());
        assert_eq!(map.to_source(span(100, 130)).unwrap().range, span(10, 20));
        assert!(map.to_source(span(100, 129)).is_none());
    }

    #[test]
    fn test_in_containment_monotonic() {
        let map = single(MatchMode::In, span(10, 20), span(200, 260));
        let whole = map.to_target(span(10, 20)).unwrap().range;

        for start in 10..=20 {
            for end in start..=20 {
                assert_eq!(map.to_target(span(start, end)).unwrap().range, whole);
            }
        }
        assert!(map.to_target(span(9, 20)).is_none());
    }

    #[test]
    fn test_first_match_follows_insertion_order() {
        let map = SourceMap::from_mappings(vec![
            Mapping::new("first", MatchMode::In, span(0, 50), span(500, 550)),
            Mapping::new("second", MatchMode::Offset, span(10, 20), span(100, 110)),
        ]);

        let first = map.to_target(span(12, 13)).unwrap();
        assert_eq!(*first.data, "first");
        assert_eq!(first.range, span(500, 550));

        let all = map.all_to_targets(span(12, 13));
        assert_eq!(all.len(), 2);
        assert_eq!(*all[0].data, "first");
        assert_eq!(*all[1].data, "second");
        assert_eq!(all[1].range, span(102, 103));
    }

    #[test]
    fn test_first_match_reversed_order() {
        let map = SourceMap::from_mappings(vec![
            Mapping::new("second", MatchMode::Offset, span(10, 20), span(100, 110)),
            Mapping::new("first", MatchMode::In, span(0, 50), span(500, 550)),
        ]);
        assert_eq!(*map.to_target(span(12, 13)).unwrap().data, "second");
    }

    #[test]
    fn test_alternates_are_tried_after_primary() {
        // `x` (10..11) to `$x` (50..52), Gate primary with an Offset alternate onto `x`
        let map = SourceMap::from_mappings(vec![Mapping::new(
            "dollar",
            MatchMode::Gate,
            span(10, 11),
            span(50, 52),
        )
        .with_alternate(MatchMode::Offset, span(10, 11), span(51, 52))]);

        assert_eq!(map.to_target(span(10, 11)).unwrap().range, span(50, 52));
        assert_eq!(map.to_target(span(10, 10)).unwrap().range, span(51, 51));
        assert_eq!(map.to_source(span(51, 52)).unwrap().range, span(10, 11));
        assert_eq!(map.to_source(span(50, 52)).unwrap().range, span(10, 11));
        // one result per mapping even when both pairs match
        assert_eq!(map.all_to_targets(span(10, 11)).len(), 1);
    }

    #[test]
    fn test_offset_source_shifts_alternates() {
        let mapping = Mapping::new((), MatchMode::Offset, span(0, 3), span(10, 13))
            .with_alternate(MatchMode::Gate, span(1, 2), span(20, 21))
            .offset_source(100);

        assert_eq!(mapping.source_range, span(100, 103));
        assert_eq!(mapping.alternates[0].source, span(101, 102));
        assert_eq!(mapping.target_range, span(10, 13));
    }

    #[test]
    fn test_lookup_does_not_touch_input() {
        let map = single(MatchMode::Offset, span(0, 10), span(20, 30));
        let input = span(2, 4);
        let _ = map.to_target(input);
        assert_eq!(input, span(2, 4));
        assert!(map.is_source(input));
        assert!(!map.is_target(input));
    }
}

//! Half-open byte intervals over the heading line.
//!
//! Node spans and ignore ranges both use this type. Offsets are `u32`,
//! which is far more than any heading needs.

/// Half-open `[start, end)` byte interval over the original line.
///
/// # Example
/// ```
/// use anchormark::Range;
///
/// let line = "**bold** text";
/// let range = Range::new(2, 6);
/// assert_eq!(range.slice(line), "bold");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize offsets.
    ///
    /// # Panics
    /// Panics in debug mode if values exceed u32::MAX.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Borrow the text this range covers.
    ///
    /// Ranges produced by the scanner always fall on character boundaries.
    #[inline]
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start_usize()..self.end_usize()]
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// True if the two ranges overlap or share an endpoint.
    #[inline]
    pub const fn touches(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Split `n` bytes off the front, returning them.
    #[inline]
    pub fn take_front(&mut self, n: u32) -> Range {
        debug_assert!(n <= self.len());
        let taken = Range::new(self.start, self.start + n);
        self.start += n;
        taken
    }

    /// Split `n` bytes off the back, returning them.
    #[inline]
    pub fn take_back(&mut self, n: u32) -> Range {
        debug_assert!(n <= self.len());
        let taken = Range::new(self.end - n, self.end);
        self.end -= n;
        taken
    }
}

/// Sort ranges and merge any that overlap or abut. Empty ranges are dropped.
pub fn normalize(ranges: &mut Vec<Range>) {
    ranges.retain(|r| !r.is_empty());
    ranges.sort_unstable();

    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for r in ranges.drain(..) {
        match merged.last_mut() {
            Some(last) if last.touches(&r) => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    *ranges = merged;
}

/// Delete every range from `line`. `ranges` must be normalized.
pub fn delete_ranges(line: &str, ranges: &[Range]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pos = 0usize;
    for r in ranges {
        out.push_str(&line[pos..r.start_usize()]);
        pos = r.end_usize();
    }
    out.push_str(&line[pos..]);
    out
}

use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
};

/// A position `(p, q, s)` in a tri-graded spectral sequence.
///
/// Indices are ordered by total degree `p + q` first, then by `p`, then by `s`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrigradedIndex {
    p: i32,
    q: i32,
    s: i32,
}

impl TrigradedIndex {
    pub const fn new(p: i32, q: i32, s: i32) -> Self {
        Self { p, q, s }
    }

    pub fn p(&self) -> i32 {
        self.p
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn s(&self) -> i32 {
        self.s
    }

    /// The total degree `p + q`.
    pub fn degree(&self) -> i32 {
        self.p + self.q
    }

    /// The index hit by a `d_r` leaving `self`.
    pub fn target(&self, r: u32) -> Self {
        let r = r as i32;
        Self::new(self.p - r, self.q + r - 1, self.s + 1)
    }

    /// The index from which a `d_r` hits `self`.
    pub fn source(&self, r: u32) -> Self {
        let r = r as i32;
        Self::new(self.p + r, self.q - r + 1, self.s - 1)
    }
}

impl From<(i32, i32, i32)> for TrigradedIndex {
    fn from((p, q, s): (i32, i32, i32)) -> Self {
        Self::new(p, q, s)
    }
}

impl Ord for TrigradedIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.degree(), self.p, self.s).cmp(&(other.degree(), other.p, other.s))
    }
}

impl PartialOrd for TrigradedIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for TrigradedIndex {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.q, self.s)
    }
}

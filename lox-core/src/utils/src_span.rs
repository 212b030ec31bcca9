use std::{fmt::Display, ops::Range};

/// Byte range of a piece of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	/// Smallest span covering both `self` and `other`.
	pub fn merge(self, other: SrcSpan) -> Self {
		Self {
			start: self.start.min(other.start),
			end: self.end.max(other.end),
		}
	}

	pub fn range(&self) -> Range<usize> {
		(self.start as usize)..(self.end as usize)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}

//! Decoration marks and the per-pass mark list.

use std::collections::HashMap;

use crate::node::Range;

/// How the display layer should apply a mark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// Text painted over the rendered cells starting at the range start.
    Overlay,
    /// Text inserted before the range start, pushing the rest of the row right.
    Inline,
    /// The range is hidden; a non-empty payload is shown in its place.
    Conceal,
    /// Style only, no text.
    Highlight,
    /// A synthesized whole line drawn above or below the anchor row.
    VirtualLine { above: bool },
}

/// What a mark draws, independent of where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoration {
    pub kind: MarkKind,
    pub text: String,
    pub highlight: Option<String>,
}

impl Decoration {
    pub fn overlay(text: impl Into<String>, highlight: impl Into<String>) -> Self {
        Self::new(MarkKind::Overlay, text.into(), Some(highlight.into()))
    }

    pub fn inline(text: impl Into<String>, highlight: impl Into<String>) -> Self {
        Self::new(MarkKind::Inline, text.into(), Some(highlight.into()))
    }

    /// Hides the range entirely.
    pub fn conceal() -> Self {
        Self::new(MarkKind::Conceal, String::new(), None)
    }

    /// Hides the range and shows `text` in its place.
    pub fn replace(text: impl Into<String>, highlight: impl Into<String>) -> Self {
        Self::new(MarkKind::Conceal, text.into(), Some(highlight.into()))
    }

    pub fn highlight(highlight: impl Into<String>) -> Self {
        Self::new(MarkKind::Highlight, String::new(), Some(highlight.into()))
    }

    pub fn virtual_line(
        above: bool,
        text: impl Into<String>,
        highlight: impl Into<String>,
    ) -> Self {
        Self::new(
            MarkKind::VirtualLine { above },
            text.into(),
            Some(highlight.into()),
        )
    }

    fn new(kind: MarkKind, text: String, highlight: Option<String>) -> Self {
        Self {
            kind,
            text,
            highlight,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    pub range: Range,
    pub exclusive: bool,
    pub decoration: Decoration,
}

impl Mark {
    pub fn kind(&self) -> MarkKind {
        self.decoration.kind
    }

    pub fn text(&self) -> &str {
        &self.decoration.text
    }

    pub fn highlight(&self) -> Option<&str> {
        self.decoration.highlight.as_deref()
    }
}

/// Ordered marks for one render pass.
///
/// Exclusive marks claim their range: a second exclusive mark on an overlapping range is
/// rejected. Non-exclusive marks are always accepted. Accepted marks keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct MarkList {
    marks: Vec<Mark>,
    claimed: HashMap<usize, Vec<(usize, usize)>>,
}

impl MarkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mark, returning whether it was accepted.
    ///
    /// Callers must only record width offsets for accepted marks.
    pub fn add(&mut self, exclusive: bool, range: Range, decoration: Decoration) -> bool {
        if exclusive {
            if self.conflicts(range) {
                tracing::trace!(
                    target: "mdmarks::render",
                    ?range,
                    kind = ?decoration.kind,
                    "exclusive mark rejected"
                );
                return false;
            }
            for row in range.start.row..=range.end.row {
                if let Some(cols) = range.cols_on_row(row) {
                    self.claimed.entry(row).or_default().push(cols);
                }
            }
        }
        self.marks.push(Mark {
            range,
            exclusive,
            decoration,
        });
        true
    }

    /// Returns `true` if an exclusive mark on `range` would be rejected.
    pub fn conflicts(&self, range: Range) -> bool {
        (range.start.row..=range.end.row).any(|row| {
            let Some((start, end)) = range.cols_on_row(row) else {
                return false;
            };
            self.claimed.get(&row).is_some_and(|claimed| {
                claimed
                    .iter()
                    .any(|&(s, e)| (s <= start && start < e) || (start <= s && s < end))
            })
        })
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn into_marks(self) -> Vec<Mark> {
        self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn clear(&mut self) {
        self.marks.clear();
        self.claimed.clear();
    }
}

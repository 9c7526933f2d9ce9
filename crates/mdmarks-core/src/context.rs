//! Per-document render state: the column offset tracker and callout rows.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::node::NodeInfo;
use crate::node::Range;
use crate::text::display_width;

/// State a render pass threads through every handler.
///
/// One instance belongs to one document and is reused across passes; [`RenderContext::reset`]
/// clears the per-pass state before each pass.
#[derive(Clone, Debug, Default)]
pub struct RenderContext {
    offsets: HashMap<usize, BTreeMap<usize, isize>>,
    callouts: BTreeMap<usize, String>,
    passes: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.offsets.clear();
        self.callouts.clear();
        self.passes += 1;
    }

    /// Number of passes this context has been reset for.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Records that every original column from `range.end` onwards on `range.start.row` is
    /// shifted by `delta` rendered cells.
    ///
    /// A negative delta is spread as single-cell steps over the columns ending at `range.end`, so
    /// columns inside a hidden range collapse onto its start instead of jumping backwards.
    pub fn add_offset(&mut self, range: Range, delta: isize) {
        if delta == 0 {
            return;
        }
        let row = range.start.row;
        let end = if range.is_single_row() {
            range.end.col
        } else {
            range.start.col
        };
        let breakpoints = self.offsets.entry(row).or_default();
        if delta > 0 {
            *breakpoints.entry(end).or_default() += delta;
            return;
        }

        let hidden = delta.unsigned_abs();
        let span = end.saturating_sub(range.start.col);
        let steps = hidden.min(span);
        for col in (end + 1 - steps)..=end {
            *breakpoints.entry(col).or_default() -= 1;
        }
        let rest = (hidden - steps) as isize;
        if rest > 0 {
            *breakpoints.entry(end).or_default() -= rest;
        }
        breakpoints.retain(|_, d| *d != 0);
    }

    /// Rendered column of original column `col` on `row`.
    pub fn rendered_col(&self, row: usize, col: usize) -> usize {
        let shift: isize = self
            .offsets
            .get(&row)
            .map(|b| b.range(..=col).map(|(_, d)| *d).sum())
            .unwrap_or(0);
        (col as isize + shift).max(0) as usize
    }

    /// Sum of the deltas recorded at columns in `(start, end]` on `row`.
    pub fn delta_between(&self, row: usize, start: usize, end: usize) -> isize {
        if end <= start {
            return 0;
        }
        self.offsets
            .get(&row)
            .map(|b| b.range(start + 1..=end).map(|(_, d)| *d).sum())
            .unwrap_or(0)
    }

    /// Rendered width of `text` sitting at `start..end` on `row`.
    pub fn width_of(&self, row: usize, start: usize, end: usize, text: &str) -> usize {
        (display_width(text) as isize + self.delta_between(row, start, end)).max(0) as usize
    }

    /// Rendered width of a single-row node.
    pub fn rendered_width(&self, node: &NodeInfo<'_>) -> usize {
        self.width_of(node.start_row(), node.start_col(), node.end_col(), node.text())
    }

    /// Recorded `(col, delta)` breakpoints on `row`, in column order.
    pub fn breakpoints(&self, row: usize) -> Vec<(usize, isize)> {
        self.offsets
            .get(&row)
            .map(|b| b.iter().map(|(c, d)| (*c, *d)).collect())
            .unwrap_or_default()
    }

    pub fn add_callout(&mut self, row: usize, highlight: impl Into<String>) {
        self.callouts.insert(row, highlight.into());
    }

    /// Highlight of the first callout recorded within `start_row..=end_row`.
    pub fn callout_in(&self, start_row: usize, end_row: usize) -> Option<&str> {
        self.callouts
            .range(start_row..=end_row)
            .next()
            .map(|(_, hl)| hl.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_delta_shifts_following_columns() {
        let mut ctx = RenderContext::new();
        ctx.add_offset(Range::on_row(0, 4, 5), 2);
        assert_eq!(ctx.rendered_col(0, 4), 4);
        assert_eq!(ctx.rendered_col(0, 5), 7);
        assert_eq!(ctx.rendered_col(0, 20), 22);
        assert_eq!(ctx.rendered_col(1, 20), 20);
    }

    #[test]
    fn concealed_columns_collapse_onto_range_start() {
        let mut ctx = RenderContext::new();
        // `](url)` hidden at 10..16
        ctx.add_offset(Range::on_row(0, 10, 16), -6);
        assert_eq!(ctx.rendered_col(0, 10), 10);
        assert_eq!(ctx.rendered_col(0, 13), 10);
        assert_eq!(ctx.rendered_col(0, 16), 10);
        assert_eq!(ctx.rendered_col(0, 17), 11);
    }

    #[test]
    fn rendered_col_is_monotone() {
        let mut ctx = RenderContext::new();
        ctx.add_offset(Range::on_row(3, 0, 1), 1);
        ctx.add_offset(Range::on_row(3, 5, 12), -7);
        ctx.add_offset(Range::point(3, 12), 4);
        ctx.add_offset(Range::on_row(3, 20, 25), -5);
        let cols: Vec<_> = (0..30).map(|c| ctx.rendered_col(3, c)).collect();
        assert!(cols.windows(2).all(|w| w[0] <= w[1]), "{cols:?}");
    }

    #[test]
    fn breakpoints_are_merged_per_column() {
        let mut ctx = RenderContext::new();
        ctx.add_offset(Range::point(0, 8), 3);
        ctx.add_offset(Range::on_row(0, 6, 8), -2);
        assert_eq!(ctx.breakpoints(0), [(7, -1), (8, 2)]);
        assert_eq!(ctx.delta_between(0, 0, 8), 1);
        assert_eq!(ctx.delta_between(0, 7, 8), 2);
        assert_eq!(ctx.delta_between(0, 8, 30), 0);
    }

    #[test]
    fn width_of_accounts_for_interior_deltas() {
        let mut ctx = RenderContext::new();
        // cell ` [a](b) ` at 1..10 where `[` became a two-cell icon and `](b)` is hidden
        ctx.add_offset(Range::on_row(0, 2, 3), 1);
        ctx.add_offset(Range::on_row(0, 4, 8), -4);
        assert_eq!(ctx.width_of(0, 1, 10, " [a](b)  "), 9 + 1 - 4);
        assert_eq!(ctx.width_of(0, 11, 14, "日 "), 3);
    }

    #[test]
    fn reset_clears_pass_state() {
        let mut ctx = RenderContext::new();
        ctx.add_offset(Range::on_row(0, 0, 1), 3);
        ctx.add_callout(2, "Info");
        ctx.reset();
        assert_eq!(ctx.rendered_col(0, 5), 5);
        assert_eq!(ctx.callout_in(0, 10), None);
        assert_eq!(ctx.passes(), 1);
    }

    #[test]
    fn finds_callouts_by_row() {
        let mut ctx = RenderContext::new();
        ctx.add_callout(4, "RenderMarkdownWarn");
        assert_eq!(ctx.callout_in(3, 6), Some("RenderMarkdownWarn"));
        assert_eq!(ctx.callout_in(5, 6), None);
    }
}

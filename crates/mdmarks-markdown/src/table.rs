//! Pipe-table layout.
//!
//! A table is measured as a whole before any mark is emitted: every row is split into segments at
//! its pipes, the delimiter row fixes the column count and alignments, and each column gets the
//! widest rendered width found in the header and body. Rendered widths go through the
//! [`RenderContext`], so a cell whose link was concealed earlier in the pass measures as what the
//! reader sees, not as its source text.
//!
//! Three cell modes share that measurement:
//!
//! - [`TableCellMode::Padded`]: pipes redrawn as `│`, cells padded with inline text so every
//!   column lines up.
//! - [`TableCellMode::Raw`]: pipes redrawn in place, nothing padded. Borders follow the delimiter
//!   row so they line up with the untouched pipes.
//! - [`TableCellMode::Overlay`]: each row replaced by a single overlay of trimmed, aligned cells.
//!   Overlay tables run before the inline producers, so the cells carry their links' icons
//!   themselves and widths are measured from that rendered text.

use mdmarks_core::context::RenderContext;
use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::display_width;
use mdmarks_core::text::pad_right;

use crate::config::PipeTableConfig;
use crate::config::TableCellMode;
use crate::config::TableStyle;
use crate::diagnostic::Diagnostic;
use crate::handler::Handler;
use crate::handler::inline_text;
use crate::handler::signed_width;

/// Column alignment as written in the delimiter row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    None,
}

impl Alignment {
    /// `:---:` center, `:---` left, `---:` right, `---` none.
    pub fn from_delimiter(cell: &str) -> Self {
        let cell = cell.trim();
        match (cell.starts_with(':'), cell.len() > 1 && cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (true, false) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        }
    }

    /// Splits `fill` cells of padding into `(before, after)` the content.
    fn split(self, fill: usize) -> (usize, usize) {
        match self {
            Alignment::Left | Alignment::None => (0, fill),
            Alignment::Right => (fill, 0),
            Alignment::Center => (fill / 2, fill - fill / 2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Delimiter,
    Body,
}

/// Columns `start..end` of one cell between two edges, pipes excluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    start: usize,
    end: usize,
}

#[derive(Clone, Debug)]
struct Row<'t> {
    node: NodeInfo<'t>,
    kind: RowKind,
    pipes: Vec<usize>,
    segments: Vec<Segment>,
    leading_pipe: bool,
    trailing_pipe: bool,
    /// Trimmed cell text as displayed, inline decorations applied. Overlay mode only.
    cells: Vec<String>,
}

impl<'t> Row<'t> {
    fn new(node: NodeInfo<'t>, kind: RowKind) -> Self {
        let pipes: Vec<usize> = node
            .children()
            .filter(|c| c.kind() == "|")
            .map(|c| c.start_col())
            .collect();
        let (start, end) = (node.start_col(), node.end_col());
        let leading_pipe = pipes.first() == Some(&start);
        let trailing_pipe = end > start && pipes.last() == Some(&(end - 1));

        let mut segments = Vec::with_capacity(pipes.len() + 1);
        let mut open = (!leading_pipe).then_some(start);
        for &pipe in &pipes {
            if let Some(seg_start) = open {
                segments.push(Segment {
                    start: seg_start,
                    end: pipe,
                });
            }
            open = Some(pipe + 1);
        }
        if let Some(seg_start) = open.filter(|&s| !trailing_pipe && s < end) {
            segments.push(Segment {
                start: seg_start,
                end,
            });
        }

        Self {
            node,
            kind,
            pipes,
            segments,
            leading_pipe,
            trailing_pipe,
            cells: Vec::new(),
        }
    }

    fn row(&self) -> usize {
        self.node.start_row()
    }

    fn text(&self, seg: Segment) -> &'t str {
        self.node
            .line()
            .get(seg.start..seg.end)
            .unwrap_or_default()
    }

    fn rendered_width(&self, context: &RenderContext, seg: Segment) -> usize {
        context.width_of(self.row(), seg.start, seg.end, self.text(seg))
    }

    fn range(&self) -> Range {
        Range::on_row(self.row(), self.node.start_col(), self.node.end_col())
    }

    /// Each segment's text with `replacements` (sorted, single-row) substituted, then trimmed.
    fn rendered_cells(&self, replacements: &[(Range, String)]) -> Vec<String> {
        let line = self.node.line();
        self.segments
            .iter()
            .map(|seg| {
                let mut text = String::new();
                let mut col = seg.start;
                for (range, shown) in replacements {
                    let (start, end) = (range.start.col, range.end.col);
                    if start < col || start < seg.start || end > seg.end {
                        continue;
                    }
                    text.push_str(line.get(col..start).unwrap_or_default());
                    text.push_str(shown);
                    col = end;
                }
                text.push_str(line.get(col..seg.end).unwrap_or_default());
                text.trim().to_string()
            })
            .collect()
    }

    /// Pipes bounding the first `columns` cells.
    fn pipes_within(&self, columns: usize) -> impl Iterator<Item = usize> + '_ {
        let limit = self
            .segments
            .get(columns)
            .map(|extra| extra.start.saturating_sub(1))
            .unwrap_or(usize::MAX);
        self.pipes.iter().copied().filter(move |&col| col <= limit)
    }
}

/// Links, images, autolinks and shortcuts under `node`, in document order.
fn inline_nodes<'t>(node: &NodeInfo<'t>, out: &mut Vec<NodeInfo<'t>>) {
    for child in node.children() {
        match child.kind() {
            "inline_link" | "full_reference_link" | "collapsed_reference_link" | "image"
            | "uri_autolink" | "email_autolink" | "shortcut_link" => out.push(child),
            _ => inline_nodes(&child, out),
        }
    }
}

/// One measured pipe table.
#[derive(Clone, Debug)]
pub struct Table<'t> {
    node: NodeInfo<'t>,
    mode: TableCellMode,
    rows: Vec<Row<'t>>,
    alignments: Vec<Alignment>,
    widths: Vec<usize>,
    mismatches: Vec<Diagnostic>,
}

impl<'t> Table<'t> {
    /// Measures `node` (a `pipe_table`) against the offsets recorded so far in `context`.
    ///
    /// Overlay cells are measured from their source text; see [`Table::layout_with`].
    pub fn layout(
        node: NodeInfo<'t>,
        context: &RenderContext,
        mode: TableCellMode,
    ) -> Result<Self, Diagnostic> {
        Self::layout_with(node, context, mode, |_| None)
    }

    /// Like [`Table::layout`], with `inline` giving the range an inline node hides and the text
    /// it shows, for overlay cells.
    pub fn layout_with<F>(
        node: NodeInfo<'t>,
        context: &RenderContext,
        mode: TableCellMode,
        inline: F,
    ) -> Result<Self, Diagnostic>
    where
        F: Fn(&NodeInfo<'t>) -> Option<(Range, String)>,
    {
        let mut rows: Vec<Row<'t>> = node
            .children()
            .filter_map(|child| {
                let kind = match child.kind() {
                    "pipe_table_header" => RowKind::Header,
                    "pipe_table_delimiter_row" => RowKind::Delimiter,
                    "pipe_table_row" => RowKind::Body,
                    _ => return None,
                };
                Some(Row::new(child, kind))
            })
            .collect();

        let Some(delimiter) = rows.iter().find(|r| r.kind == RowKind::Delimiter) else {
            return Err(Diagnostic::MissingChild {
                parent: node.kind().to_string(),
                child: "pipe_table_delimiter_row",
                row: node.start_row(),
            });
        };
        let alignments: Vec<Alignment> = delimiter
            .segments
            .iter()
            .map(|&seg| Alignment::from_delimiter(delimiter.text(seg)))
            .collect();
        let delimiter_widths: Vec<usize> = delimiter
            .segments
            .iter()
            .map(|&seg| display_width(delimiter.text(seg)))
            .collect();
        let columns = alignments.len();
        if columns == 0 {
            return Err(Diagnostic::EmptyTable {
                row: node.start_row(),
            });
        }

        if mode == TableCellMode::Overlay {
            for row in rows.iter_mut().filter(|r| r.kind != RowKind::Delimiter) {
                let mut nodes = Vec::new();
                inline_nodes(&row.node, &mut nodes);
                let mut replacements: Vec<(Range, String)> = nodes
                    .iter()
                    .filter_map(|n| inline(n))
                    .filter(|(range, _)| range.is_single_row() && range.start.row == row.row())
                    .collect();
                replacements.sort_by_key(|(range, _)| range.start.col);
                row.cells = row.rendered_cells(&replacements);
            }
        }

        let mut mismatches = Vec::new();
        let mut widths: Vec<usize> = match mode {
            TableCellMode::Raw => delimiter_widths,
            TableCellMode::Padded | TableCellMode::Overlay => vec![0; columns],
        };
        for row in rows.iter().filter(|r| r.kind != RowKind::Delimiter) {
            if row.segments.len() != columns {
                mismatches.push(Diagnostic::TableColumnMismatch {
                    row: row.row(),
                    expected: columns,
                    found: row.segments.len(),
                });
            }
            if mode == TableCellMode::Raw {
                continue;
            }
            for (i, &seg) in row.segments.iter().take(columns).enumerate() {
                let width = match mode {
                    TableCellMode::Overlay => {
                        let cell = row.cells.get(i).map(String::as_str).unwrap_or_default();
                        display_width(cell) + 2
                    }
                    _ => row.rendered_width(context, seg),
                };
                widths[i] = widths[i].max(width);
            }
        }
        if mode != TableCellMode::Raw {
            for width in &mut widths {
                *width = (*width).max(2);
            }
        }

        Ok(Self {
            node,
            mode,
            rows,
            alignments,
            widths,
            mismatches,
        })
    }

    pub fn column_count(&self) -> usize {
        self.widths.len()
    }

    /// Rendered inner width of every column, pipes excluded.
    pub fn column_widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    /// Rows whose cell count differs from the delimiter's.
    pub fn mismatches(&self) -> &[Diagnostic] {
        &self.mismatches
    }

    pub fn row_kinds(&self) -> impl Iterator<Item = RowKind> + '_ {
        self.rows.iter().map(|r| r.kind)
    }

    /// Border line such as `┌───┬───┐` for the current widths; corners only on drawn edges.
    fn border(
        &self,
        [left, middle, right]: [char; 3],
        horizontal: char,
        edges: (bool, bool),
    ) -> String {
        let mut line = String::new();
        if edges.0 {
            line.push(left);
        }
        for (i, width) in self.widths.iter().enumerate() {
            if i > 0 {
                line.push(middle);
            }
            line.extend(std::iter::repeat_n(horizontal, *width));
        }
        if edges.1 {
            line.push(right);
        }
        line
    }

    /// Replacement for the delimiter row, alignment indicators at the section ends.
    fn delimiter_line(&self, config: &PipeTableConfig, leading: bool, trailing: bool) -> String {
        let [_, _, _, ml, mm, mr, _, _, _, _, h] = config.border;
        let indicator = config.alignment_indicator;
        let mut line = String::new();
        if leading {
            line.push(ml);
        }
        for (i, (width, align)) in self.widths.iter().zip(&self.alignments).enumerate() {
            if i > 0 {
                line.push(mm);
            }
            let left = matches!(align, Alignment::Left | Alignment::Center);
            let right = matches!(align, Alignment::Right | Alignment::Center);
            match width {
                0 => {}
                1 => line.push(if left || right { indicator } else { h }),
                _ => {
                    line.push(if left { indicator } else { h });
                    line.extend(std::iter::repeat_n(h, width - 2));
                    line.push(if right { indicator } else { h });
                }
            }
        }
        if trailing {
            line.push(mr);
        }
        line
    }

    /// `│ cell │ cell │` for overlay mode.
    fn overlay_line(&self, row: &Row<'t>, vertical: char) -> String {
        let mut line = String::new();
        line.push(vertical);
        for (i, (width, align)) in self.widths.iter().zip(&self.alignments).enumerate() {
            let text = row.cells.get(i).map(String::as_str).unwrap_or_default();
            let inner = width.saturating_sub(2);
            let (before, after) = align.split(inner.saturating_sub(display_width(text)));
            line.push(' ');
            line.push_str(&" ".repeat(before));
            line.push_str(text);
            line.push_str(&" ".repeat(after));
            line.push(' ');
            line.push(vertical);
        }
        pad_right(&line, display_width(row.node.text()))
    }
}

pub(crate) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let config = &h.config.pipe_table;
    if !config.enabled || config.style == TableStyle::None {
        return;
    }
    let render_config = h.config;
    let links = h.links;
    let layout = Table::layout_with(node, &*h.context, config.cell, |n| {
        inline_text(render_config, links, n)
    });
    let table = match layout {
        Ok(table) => table,
        Err(diagnostic) => {
            h.report(diagnostic);
            return;
        }
    };
    for diagnostic in table.mismatches().to_vec() {
        h.report(diagnostic);
    }
    tracing::trace!(
        target: "mdmarks::render",
        row = table.node.start_row(),
        widths = ?table.widths,
        mode = ?table.mode,
        "table layout"
    );
    emit(h, &table, config);
}

fn emit(h: &mut Handler<'_>, table: &Table<'_>, config: &PipeTableConfig) {
    let [tl, tm, tr, _, _, _, bl, bm, br, v, hz] = config.border;
    let full = config.style == TableStyle::Full;
    let Some(first) = table.rows.first() else {
        return;
    };
    let indent = " ".repeat(h.context.rendered_col(first.row(), first.node.start_col()));
    let edges = match table.mode {
        TableCellMode::Overlay => (true, true),
        _ => (first.leading_pipe, first.trailing_pipe),
    };

    if full {
        let line = format!("{indent}{}", table.border([tl, tm, tr], hz, edges));
        let anchor = Range::point(first.row(), 0);
        h.add(false, anchor, Decoration::virtual_line(true, line, &config.head));
    }

    for row in &table.rows {
        match row.kind {
            RowKind::Delimiter => {
                let (leading, trailing) = match table.mode {
                    TableCellMode::Overlay => (true, true),
                    _ => (row.leading_pipe, row.trailing_pipe),
                };
                let line = table.delimiter_line(config, leading, trailing);
                h.replace(row.range(), row.node.text(), &line, &config.row);
            }
            RowKind::Header | RowKind::Body => {
                let highlight = if row.kind == RowKind::Header {
                    &config.head
                } else {
                    &config.row
                };
                match table.mode {
                    TableCellMode::Padded => {
                        emit_pipes(h, table, row, v, highlight);
                        emit_padding(h, table, row, v, &config.filler);
                        conceal_extra_cells(h, table, row);
                    }
                    TableCellMode::Raw => {
                        emit_pipes(h, table, row, v, highlight);
                        conceal_extra_cells(h, table, row);
                    }
                    TableCellMode::Overlay => {
                        let line = table.overlay_line(row, v);
                        if !h.add(true, row.range(), Decoration::overlay(line, highlight)) {
                            emit_pipes(h, table, row, v, highlight);
                        }
                    }
                }
            }
        }
    }

    if full {
        if let Some(last) = table.rows.last() {
            let line = format!("{indent}{}", table.border([bl, bm, br], hz, edges));
            let anchor = Range::point(last.row(), 0);
            h.add(false, anchor, Decoration::virtual_line(false, line, &config.row));
        }
    }
}

fn emit_pipes(
    h: &mut Handler<'_>,
    table: &Table<'_>,
    row: &Row<'_>,
    vertical: char,
    highlight: &str,
) {
    for col in row.pipes_within(table.column_count()) {
        let range = Range::on_row(row.row(), col, col + 1);
        h.add(true, range, Decoration::overlay(vertical.to_string(), highlight));
    }
}

fn emit_padding(
    h: &mut Handler<'_>,
    table: &Table<'_>,
    row: &Row<'_>,
    vertical: char,
    filler: &str,
) {
    let line = row.row();
    for (i, (&width, &align)) in table.widths.iter().zip(&table.alignments).enumerate() {
        match row.segments.get(i) {
            Some(&seg) => {
                let fill = width.saturating_sub(row.rendered_width(h.context, seg));
                let (before, after) = align.split(fill);
                pad(h, Range::point(line, seg.start), before, filler);
                pad(h, Range::point(line, seg.end), after, filler);
            }
            None => {
                let text = format!("{}{vertical}", " ".repeat(width));
                let at = Range::point(line, row.node.end_col());
                h.context.add_offset(at, signed_width(&text));
                h.add(false, at, Decoration::inline(text, filler));
            }
        }
    }
}

/// Hides everything after the pipe closing the last column.
fn conceal_extra_cells(h: &mut Handler<'_>, table: &Table<'_>, row: &Row<'_>) {
    let Some(extra) = row.segments.get(table.column_count()) else {
        return;
    };
    let start = extra.start;
    let end = row.node.end_col();
    let hidden = row.node.line().get(start..end).unwrap_or_default();
    let range = Range::on_row(row.row(), start, end);
    h.add_with_offset(range, Decoration::conceal(), -signed_width(hidden));
}

fn pad(h: &mut Handler<'_>, at: Range, cells: usize, filler: &str) {
    if cells == 0 {
        return;
    }
    h.add(false, at, Decoration::inline(" ".repeat(cells), filler));
    h.context.add_offset(at, cells as isize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParsedDocument;
    use crate::parse::parse;

    #[test]
    fn alignment_from_delimiter() {
        assert_eq!(Alignment::from_delimiter(" :---: "), Alignment::Center);
        assert_eq!(Alignment::from_delimiter(":---"), Alignment::Left);
        assert_eq!(Alignment::from_delimiter("---:"), Alignment::Right);
        assert_eq!(Alignment::from_delimiter("---"), Alignment::None);
        assert_eq!(Alignment::from_delimiter(":"), Alignment::Left);
    }

    #[test]
    fn padding_split_follows_alignment() {
        assert_eq!(Alignment::Left.split(3), (0, 3));
        assert_eq!(Alignment::None.split(3), (0, 3));
        assert_eq!(Alignment::Right.split(3), (3, 0));
        assert_eq!(Alignment::Center.split(3), (1, 2));
    }

    fn table_node(doc: &ParsedDocument) -> NodeInfo<'_> {
        doc.tree().root().child("pipe_table").expect("table")
    }

    #[test]
    fn raw_widths_follow_single_dash_delimiters() {
        let doc = parse("| a | b |\n|-|:-|\n| c | d |\n");
        let context = RenderContext::new();
        let table = Table::layout(table_node(&doc), &context, TableCellMode::Raw)
            .expect("table");
        assert_eq!(table.column_widths(), [1, 2]);
        let config = PipeTableConfig::default();
        assert_eq!(table.delimiter_line(&config, true, true), "├─┼━─┤");
        assert_eq!(table.border(['┌', '┬', '┐'], '─', (true, true)), "┌─┬──┐");
    }

    #[test]
    fn padded_widths_have_a_floor_of_two() {
        let doc = parse("|a|b|\n|-|-|\n");
        let context = RenderContext::new();
        let table = Table::layout(table_node(&doc), &context, TableCellMode::Padded)
            .expect("table");
        assert_eq!(table.column_widths(), [2, 2]);
    }

    #[test]
    fn overlay_cells_use_inline_replacements() {
        let doc = parse("| a | [abc](u) |\n| - | - |\n");
        let context = RenderContext::new();
        let node = table_node(&doc);
        let table = Table::layout_with(node, &context, TableCellMode::Overlay, |n| {
            (n.kind() == "inline_link").then(|| (n.range(), "@ abc".to_string()))
        })
        .expect("table");
        assert_eq!(table.column_widths(), [3, 7]);
        let header = &table.rows[0];
        assert_eq!(header.cells, ["a", "@ abc"]);
        // Padded out to the source row so no source text shows past it.
        let line = table.overlay_line(header, '│');
        assert_eq!(line, "│ a │ @ abc │   ");
    }

    #[test]
    fn borders_drop_missing_outer_edges() {
        let doc = parse("a | b\n--|--\nccc | d\n");
        let context = RenderContext::new();
        let table = Table::layout(table_node(&doc), &context, TableCellMode::Padded)
            .expect("table");
        assert_eq!(table.column_widths(), [4, 2]);
        assert_eq!(table.border(['┌', '┬', '┐'], '─', (false, false)), "────┬──");
    }

    #[test]
    fn extra_cells_lose_their_pipes() {
        let doc = parse("| a | b |\n| - | - |\n| c | d | e |\n");
        let context = RenderContext::new();
        let table = Table::layout(table_node(&doc), &context, TableCellMode::Padded)
            .expect("table");
        let body = &table.rows[2];
        let kept: Vec<usize> = body.pipes_within(table.column_count()).collect();
        assert_eq!(kept, [0, 4, 8]);
        assert_eq!(table.mismatches().len(), 1);
    }
}

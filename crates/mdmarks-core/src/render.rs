//! Reference display adapter: paints a mark list onto the source lines.
//!
//! Hosts with their own display layer (an editor's extmarks, a GUI text widget) consume the
//! [`Mark`] list directly. This adapter exists for terminal previews and tests: it produces one
//! `ratatui` [`Line`] per source row, plus any virtual lines, with marks applied.

use std::collections::HashMap;

use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::mark::Mark;
use crate::mark::MarkKind;
use crate::text::TAB_WIDTH;
use crate::text::char_width;
use crate::theme::Theme;

/// One terminal cell; an empty symbol continues the wide glyph to its left.
#[derive(Clone, Debug)]
struct Cell {
    symbol: String,
    style: Style,
}

impl Cell {
    fn new(symbol: impl Into<String>, style: Style) -> Self {
        Self {
            symbol: symbol.into(),
            style,
        }
    }

    fn is_continuation(&self) -> bool {
        self.symbol.is_empty()
    }
}

pub fn render_lines(source: &str, marks: &[Mark], theme: &Theme) -> Vec<Line<'static>> {
    let mut rows: Vec<&str> = source
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if source.ends_with('\n') {
        rows.pop();
    }

    let mut by_row: HashMap<usize, Vec<&Mark>> = HashMap::new();
    for mark in marks {
        for row in mark.range.start.row..=mark.range.end.row {
            by_row.entry(row).or_default().push(mark);
        }
    }

    let mut out = Vec::with_capacity(rows.len());
    for (row, line) in rows.iter().enumerate() {
        let row_marks = by_row.get(&row).map(Vec::as_slice).unwrap_or(&[]);
        out.extend(virtual_lines(row, row_marks, theme, true));
        out.push(render_row(row, line, row_marks, theme));
        out.extend(virtual_lines(row, row_marks, theme, false));
    }
    out
}

fn virtual_lines(
    row: usize,
    marks: &[&Mark],
    theme: &Theme,
    above: bool,
) -> impl Iterator<Item = Line<'static>> {
    marks
        .iter()
        .filter(move |m| m.range.start.row == row && m.kind() == MarkKind::VirtualLine { above })
        .map(|m| {
            let style = theme.text_primary.patch(theme.style(m.highlight()));
            Line::from(vec![Span::styled(m.text().to_string(), style)])
        })
        .collect::<Vec<_>>()
        .into_iter()
}

fn render_row(row: usize, line: &str, marks: &[&Mark], theme: &Theme) -> Line<'static> {
    let style_of = |m: &Mark| theme.text_primary.patch(theme.style(m.highlight()));

    let hidden: Vec<(usize, usize)> = marks
        .iter()
        .filter(|m| m.kind() == MarkKind::Conceal)
        .filter_map(|m| m.range.cols_on_row(row))
        .collect();
    let highlights: Vec<((usize, usize), Style)> = marks
        .iter()
        .filter(|m| m.kind() == MarkKind::Highlight)
        .filter_map(|m| Some((m.range.cols_on_row(row)?, theme.style(m.highlight()))))
        .collect();
    let insertions: Vec<(usize, &str, Style)> = marks
        .iter()
        .filter(|m| m.range.start.row == row)
        .filter(|m| match m.kind() {
            MarkKind::Inline => true,
            MarkKind::Conceal => !m.text().is_empty(),
            _ => false,
        })
        .map(|m| (m.range.start.col.min(line.len()), m.text(), style_of(m)))
        .collect();

    let mut cells: Vec<Cell> = Vec::new();
    let mut x_at: HashMap<usize, usize> = HashMap::new();
    let columns = line
        .char_indices()
        .map(|(col, ch)| (col, Some(ch)))
        .chain(std::iter::once((line.len(), None)));
    for (col, ch) in columns {
        for (_, text, style) in insertions.iter().filter(|(c, _, _)| *c == col) {
            push_text(&mut cells, text, *style);
        }
        x_at.insert(col, cells.len());
        let Some(ch) = ch else {
            break;
        };
        if hidden.iter().any(|&(s, e)| s <= col && col < e) {
            continue;
        }
        let mut style = theme.text_primary;
        for ((s, e), hl) in &highlights {
            if *s <= col && col < *e {
                style = style.patch(*hl);
            }
        }
        if ch == '\t' {
            for _ in 0..TAB_WIDTH {
                cells.push(Cell::new(" ", style));
            }
        } else {
            push_char(&mut cells, ch, style);
        }
    }

    for mark in marks
        .iter()
        .filter(|m| m.range.start.row == row && m.kind() == MarkKind::Overlay)
    {
        let x = x_at
            .get(&mark.range.start.col)
            .copied()
            .unwrap_or(cells.len());
        paint(&mut cells, x, mark.text(), style_of(mark));
    }

    to_line(cells)
}

fn push_char(cells: &mut Vec<Cell>, ch: char, style: Style) {
    match char_width(ch) {
        0 => {
            if let Some(last) = cells.iter_mut().rev().find(|c| !c.is_continuation()) {
                last.symbol.push(ch);
            }
        }
        w => {
            cells.push(Cell::new(ch.to_string(), style));
            for _ in 1..w {
                cells.push(Cell::new("", style));
            }
        }
    }
}

fn push_text(cells: &mut Vec<Cell>, text: &str, style: Style) {
    for ch in text.chars() {
        push_char(cells, ch, style);
    }
}

fn paint(cells: &mut Vec<Cell>, mut x: usize, text: &str, style: Style) {
    for ch in text.chars() {
        let w = char_width(ch);
        if w == 0 {
            continue;
        }
        while cells.len() < x + w {
            cells.push(Cell::new(" ", Style::default()));
        }
        if cells[x].is_continuation() && x > 0 {
            cells[x - 1] = Cell::new(" ", cells[x - 1].style);
        }
        cells[x] = Cell::new(ch.to_string(), style);
        for dx in 1..w {
            cells[x + dx] = Cell::new("", style);
        }
        x += w;
    }
    if cells.get(x).is_some_and(Cell::is_continuation) {
        cells[x] = Cell::new(" ", style);
    }
}

fn to_line(cells: Vec<Cell>) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut buf = String::new();
    let mut current: Option<Style> = None;
    for cell in cells {
        if current.is_some_and(|s| s != cell.style) {
            spans.push(Span::styled(std::mem::take(&mut buf), current.unwrap_or_default()));
        }
        current = Some(cell.style);
        buf.push_str(&cell.symbol);
    }
    if let Some(style) = current {
        spans.push(Span::styled(buf, style));
    }
    Line::from(spans)
}

/// Concatenated text of a rendered line.
pub fn line_to_plain(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Decoration;
    use crate::mark::MarkList;
    use crate::node::Range;

    fn plain(source: &str, marks: &MarkList) -> Vec<String> {
        render_lines(source, marks.marks(), &Theme::default())
            .iter()
            .map(line_to_plain)
            .collect()
    }

    #[test]
    fn conceal_with_replacement_and_inline_text() {
        let mut marks = MarkList::new();
        marks.add(true, Range::on_row(0, 0, 1), Decoration::replace("@ ", "RenderMarkdownLink"));
        marks.add(true, Range::on_row(0, 5, 12), Decoration::conceal());
        marks.add(false, Range::point(0, 12), Decoration::inline("..", "RenderMarkdownTableFill"));
        assert_eq!(plain("[docs](x.md) tail", &marks), ["@ docs.. tail"]);
    }

    #[test]
    fn overlay_paints_over_rendered_cells() {
        let mut marks = MarkList::new();
        marks.add(true, Range::on_row(0, 0, 1), Decoration::overlay("│", "RenderMarkdownTableRow"));
        marks.add(true, Range::on_row(0, 4, 5), Decoration::overlay("│", "RenderMarkdownTableRow"));
        marks.add(true, Range::on_row(1, 0, 3), Decoration::overlay("━━━━━", "RenderMarkdownDash"));
        assert_eq!(plain("| a |\n---\n", &marks), ["│ a │", "━━━━━"]);
    }

    #[test]
    fn overlay_splitting_a_wide_glyph_blanks_the_remainder() {
        let mut marks = MarkList::new();
        marks.add(true, Range::on_row(0, 0, 3), Decoration::overlay("x", "Hl"));
        assert_eq!(plain("日本", &marks), ["x 本"]);
    }

    #[test]
    fn virtual_lines_surround_their_anchor_row() {
        let mut marks = MarkList::new();
        marks.add(false, Range::point(1, 0), Decoration::virtual_line(true, "┌─┐", "Hl"));
        marks.add(false, Range::point(1, 0), Decoration::virtual_line(false, "└─┘", "Hl"));
        assert_eq!(plain("a\nb\nc", &marks), ["a", "┌─┐", "b", "└─┘", "c"]);
    }

    #[test]
    fn highlights_style_without_changing_text() {
        let mut theme = Theme::default();
        theme.set("Hl", Style::default().fg(ratatui::style::Color::Red));
        let mut marks = MarkList::new();
        marks.add(false, Range::on_row(0, 2, 4), Decoration::highlight("Hl"));
        let lines = render_lines("abcdef", marks.marks(), &theme);
        assert_eq!(line_to_plain(&lines[0]), "abcdef");
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "cd");
        assert_eq!(lines[0].spans[1].style.fg, Some(ratatui::style::Color::Red));
    }
}

use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::display_width;

use super::Handler;
use super::line_slice;

pub(super) fn render_block(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    if !h.config.code.enabled {
        return;
    }
    let tree = node.tree();
    let indent = node.start_col();
    let mut delimiters = node
        .children()
        .filter(|c| c.kind() == "fenced_code_block_delimiter");
    let open = delimiters.next();
    let close = delimiters.next();
    let last_row = close.map(|c| c.start_row()).unwrap_or(node.end_row());

    let rows = node.start_row()..=last_row;
    let widest = rows
        .clone()
        .map(|row| display_width(line_slice(&node, row, indent, usize::MAX)))
        .max()
        .unwrap_or(0);
    let width = widest.max(h.config.code.min_width);
    let highlight = h.config.code.highlight.clone();

    for row in rows {
        let len = tree.line(row).map(str::len).unwrap_or(0);
        h.add(
            false,
            Range::on_row(row, indent.min(len), len),
            Decoration::highlight(highlight.clone()),
        );
    }

    if let Some(open) = open {
        let language = node
            .child("info_string")
            .map(|info| info.child("language").unwrap_or(info));
        match language {
            Some(language) => {
                let icon = h.config.code.icon(language.text()).to_string();
                let row = open.start_row();
                let hidden = line_slice(&node, row, open.start_col(), language.start_col());
                let range = Range::on_row(row, open.start_col(), language.start_col());
                h.replace(range, hidden, &icon, &highlight);
            }
            None => {
                let border = h.config.code.above.repeat(width);
                h.add(true, open.range(), Decoration::overlay(border, highlight.clone()));
            }
        }
    }
    if let Some(close) = close {
        let border = h.config.code.below.repeat(width);
        h.add(true, close.range(), Decoration::overlay(border, highlight));
    }
}

pub(super) fn render_inline(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let code_inline = &h.config.code_inline;
    if !code_inline.enabled {
        return;
    }
    let decoration = Decoration::highlight(code_inline.highlight.clone());
    h.add(false, node.range(), decoration);
}

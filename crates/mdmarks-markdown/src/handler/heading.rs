use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::display_width;

use super::Handler;
use super::line_slice;
use super::signed_width;
use crate::diagnostic::Diagnostic;

pub(super) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    if !h.config.heading.enabled {
        return;
    }
    match node.kind() {
        "atx_heading" => render_atx(h, node),
        "setext_heading" => render_setext(h, node),
        _ => {}
    }
}

fn render_atx(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let Some(marker) = node
        .children()
        .find(|c| c.kind().starts_with("atx_h") && c.kind().ends_with("_marker"))
    else {
        h.report(Diagnostic::MissingChild {
            parent: node.kind().to_string(),
            child: "atx_h_marker",
            row: node.start_row(),
        });
        return;
    };
    let level = marker.text().len();
    let row = marker.start_row();
    let line = node.line();
    let mut end = marker.end_col();
    if line.get(end..).is_some_and(|rest| rest.starts_with(' ')) {
        end += 1;
    }

    let heading = &h.config.heading;
    let icon = heading.icon(level).to_string();
    let fg = heading.highlight(level).to_string();
    let bg = heading.background(level).to_string();
    let hidden = line_slice(&node, row, marker.start_col(), end);
    h.replace(Range::on_row(row, marker.start_col(), end), hidden, &icon, &fg);

    let full = Range::on_row(row, node.start_col(), line.len());
    h.add(false, full, Decoration::highlight(fg));
    h.add(false, full, Decoration::highlight(bg));
}

fn render_setext(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let Some(underline) = node
        .children()
        .find(|c| c.kind().starts_with("setext_h") && c.kind().ends_with("_underline"))
    else {
        h.report(Diagnostic::MissingChild {
            parent: node.kind().to_string(),
            child: "setext_h_underline",
            row: node.start_row(),
        });
        return;
    };
    let level = if underline.kind() == "setext_h1_underline" { 1 } else { 2 };

    let heading = &h.config.heading;
    let icon = heading.icon(level).to_string();
    let fg = heading.highlight(level).to_string();
    let bg = heading.background(level).to_string();
    let rule = h.config.dash.icon.repeat(display_width(underline.text()));

    let content_row = node.start_row();
    let at = Range::point(content_row, node.start_col());
    h.add(false, at, Decoration::inline(icon.clone(), fg.clone()));
    h.context.add_offset(at, signed_width(&icon));

    let rows = Range::new(content_row, node.start_col(), underline.start_row(), 0);
    if !rows.is_empty() {
        h.add(false, rows, Decoration::highlight(fg.clone()));
        h.add(false, rows, Decoration::highlight(bg));
    }
    h.add(true, underline.range(), Decoration::overlay(rule, fg));
}

use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;

use super::Handler;
use super::line_slice;

fn is_task_marker(node: &NodeInfo<'_>) -> bool {
    node.kind().starts_with("task_list_marker")
}

pub(super) fn render_marker(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let bullet = &h.config.bullet;
    if !bullet.enabled {
        return;
    }
    if !matches!(
        node.kind(),
        "list_marker_minus" | "list_marker_plus" | "list_marker_star"
    ) {
        return;
    }
    let is_task = node
        .parent()
        .is_some_and(|item| item.children().any(|c| is_task_marker(&c)));
    if is_task {
        return;
    }
    let level = node.depth("list");
    let Some(icon) = bullet.icon(level) else {
        return;
    };
    let decoration = Decoration::overlay(icon, bullet.highlight.clone());
    let col = node.start_col();
    h.add(true, Range::on_row(node.start_row(), col, col + 1), decoration);
}

pub(super) fn render_checkbox(h: &mut Handler<'_>, node: NodeInfo<'_>, checked: bool) {
    let checkbox = &h.config.checkbox;
    if !checkbox.enabled {
        return;
    }
    let component = if checked {
        &checkbox.checked
    } else {
        &checkbox.unchecked
    };
    let icon = component.icon.clone();
    let highlight = component.highlight.clone();

    let row = node.start_row();
    let start = node
        .parent()
        .and_then(|item| item.children().find(|c| c.kind().starts_with("list_marker")))
        .filter(|marker| marker.start_row() == row)
        .map(|marker| marker.start_col())
        .unwrap_or(node.start_col());
    let mut end = node.end_col();
    if node.line().get(end..).is_some_and(|rest| rest.starts_with(' ')) {
        end += 1;
    }
    let hidden = line_slice(&node, row, start, end);
    h.replace(Range::on_row(row, start, end), hidden, &icon, &highlight);
}

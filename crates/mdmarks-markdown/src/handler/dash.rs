use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;

use super::Handler;

/// Thematic breaks become a full-width rule.
pub(super) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let dash = &h.config.dash;
    if !dash.enabled {
        return;
    }
    let rule = dash.icon.repeat(dash.width);
    let decoration = Decoration::overlay(rule, dash.highlight.clone());
    let range = Range::on_row(node.start_row(), node.start_col(), node.line().len());
    h.add(true, range, decoration);
}

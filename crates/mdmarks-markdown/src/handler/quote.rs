use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;

use super::Handler;

/// Redraws every `>` of a block quote, in the callout's color when it holds one.
pub(super) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let config = h.config;
    if !config.quote.enabled {
        return;
    }
    let highlight = h
        .context
        .callout_in(node.start_row(), node.end_row())
        .unwrap_or(config.quote.highlight.as_str())
        .to_string();
    for marker in node.children().filter(|c| c.kind() == "block_quote_marker") {
        let col = marker.start_col();
        let range = Range::on_row(marker.start_row(), col, col + 1);
        h.add(true, range, Decoration::overlay(&config.quote.icon, &highlight));
    }
}

//! Shortcut links (`[label]` with no definition) are reclassified before anything is drawn:
//! callout first, then a custom checkbox state, then a wiki link.

use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::display_width;
use mdmarks_core::text::leading_spaces;
use mdmarks_core::text::pad_right;

use super::Handler;
use super::line_slice;
use crate::config::CalloutConfig;
use crate::config::CustomCheckbox;
use crate::config::LinkConfig;

pub(super) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let config = h.config;
    let raw = node.text();

    if let Some(callout) = config
        .callouts
        .values()
        .find(|c| c.raw.to_lowercase() == raw.to_lowercase())
    {
        render_callout(h, node, callout);
        return;
    }
    if config.checkbox.enabled {
        let custom = config
            .checkbox
            .custom
            .values()
            .find(|c| c.raw == raw)
            .filter(|_| starts_list_item(&node));
        if let Some(custom) = custom {
            render_custom_checkbox(h, node, custom);
            return;
        }
    }
    render_wiki(h, node);
}

fn render_callout(h: &mut Handler<'_>, node: NodeInfo<'_>, callout: &CalloutConfig) {
    let row = node.start_row();
    let start = node.start_col();
    let first_line = node.line().get(start..).unwrap_or_default().trim_end();
    let raw = node.text();

    let has_title = first_line.len() > raw.len()
        && first_line
            .get(..raw.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(raw));
    let added = if has_title {
        let title = first_line[raw.len()..].trim();
        let icon = callout
            .rendered
            .split_once(' ')
            .map(|(icon, _)| icon)
            .unwrap_or(callout.rendered.as_str());
        let text = format!("{icon} {title}");
        let range = Range::on_row(row, start, start + first_line.len());
        h.replace(range, first_line, &text, &callout.highlight)
    } else {
        let text = pad_right(&callout.rendered, display_width(raw));
        let decoration = Decoration::overlay(text, callout.highlight.clone());
        h.add(true, node.range(), decoration)
    };
    if added {
        h.context.add_callout(row, callout.highlight.clone());
    }
}

/// The shortcut is the first thing after a list item's marker.
fn starts_list_item(node: &NodeInfo<'_>) -> bool {
    let Some(marker) = list_marker(node) else {
        return false;
    };
    let line = node.line();
    let after = line.get(marker.end_col()..).unwrap_or_default();
    let content = marker.end_col() + leading_spaces(after);
    marker.start_row() == node.start_row() && content == node.start_col()
}

fn list_marker<'t>(node: &NodeInfo<'t>) -> Option<NodeInfo<'t>> {
    node.ancestor("list_item")?
        .children()
        .find(|c| c.kind().starts_with("list_marker"))
}

fn render_custom_checkbox(h: &mut Handler<'_>, node: NodeInfo<'_>, custom: &CustomCheckbox) {
    let row = node.start_row();
    let start = list_marker(&node)
        .filter(|marker| marker.start_row() == row)
        .map(|marker| marker.start_col())
        .unwrap_or(node.start_col());
    let mut end = node.end_col();
    if node.line().get(end..).is_some_and(|rest| rest.starts_with(' ')) {
        end += 1;
    }
    let hidden = line_slice(&node, row, start, end);
    h.replace(Range::on_row(row, start, end), hidden, &custom.rendered, &custom.highlight);
}

/// `[[page]]`: the shortcut covers the inner brackets.
fn is_wiki(node: &NodeInfo<'_>) -> bool {
    let line = node.line();
    let start = node.start_col();
    let end = node.end_col();
    node.range().is_single_row()
        && start > 0
        && line.as_bytes().get(start - 1) == Some(&b'[')
        && line.as_bytes().get(end) == Some(&b']')
}

/// The wiki link's concealed range, outer brackets included, and the text shown in its place.
pub(super) fn wiki_text(config: &LinkConfig, node: &NodeInfo<'_>) -> Option<(Range, String)> {
    if !config.enabled || !is_wiki(node) {
        return None;
    }
    let inner = node
        .text()
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or_default();
    let shown = match inner.split_once('|') {
        Some((_, alias)) => alias,
        None => inner,
    };
    let row = node.start_row();
    let range = Range::on_row(row, node.start_col() - 1, node.end_col() + 1);
    Some((range, format!("{}{shown}", config.wiki.icon)))
}

fn render_wiki(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let config = h.config;
    let Some((range, text)) = wiki_text(&config.link, &node) else {
        return;
    };
    let hidden = line_slice(&node, range.start.row, range.start.col, range.end.col);
    h.replace(range, hidden, &text, &config.link.wiki.highlight);
}

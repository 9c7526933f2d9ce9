use mdmarks_core::mark::Decoration;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::closing_bracket;
use mdmarks_core::text::display_width;
use regex::Regex;
use url::Url;

use super::Handler;
use super::signed_width;
use crate::config::LinkConfig;
use crate::diagnostic::Diagnostic;

#[derive(Clone, Debug)]
struct CompiledLink {
    regex: Regex,
    icon: String,
    highlight: Option<String>,
}

/// User link patterns compiled once per pass.
///
/// Patterns are ordered by their display width, shortest first, and the last one matching a
/// destination wins, so `github\.com` beats the broader `^http`.
#[derive(Clone, Debug, Default)]
pub struct LinkMatcher {
    patterns: Vec<CompiledLink>,
}

impl LinkMatcher {
    /// Compiles every custom pattern; invalid ones are reported and left out.
    pub fn new(config: &LinkConfig) -> (Self, Vec<Diagnostic>) {
        let mut components: Vec<_> = config.custom.values().collect();
        components.sort_by_key(|c| display_width(&c.pattern));

        let mut diagnostics = Vec::new();
        let mut patterns = Vec::with_capacity(components.len());
        for component in components {
            match Regex::new(&component.pattern) {
                Ok(regex) => patterns.push(CompiledLink {
                    regex,
                    icon: component.icon.clone(),
                    highlight: component.highlight.clone(),
                }),
                Err(err) => diagnostics.push(Diagnostic::InvalidLinkPattern {
                    pattern: component.pattern.clone(),
                    message: err.to_string(),
                }),
            }
        }
        (Self { patterns }, diagnostics)
    }

    /// Icon and highlight override of the most specific pattern matching `destination`.
    pub fn lookup(&self, destination: &str) -> Option<(&str, Option<&str>)> {
        self.patterns
            .iter()
            .rev()
            .find(|p| p.regex.is_match(destination))
            .map(|p| (p.icon.as_str(), p.highlight.as_deref()))
    }
}

fn is_email(destination: &str) -> bool {
    match Url::parse(destination) {
        Ok(url) => url.scheme() == "mailto",
        Err(_) => !destination.contains('/') && destination.contains('@'),
    }
}

/// How one link node is drawn: the icon replacing its opener and the label kept visible.
struct Resolved<'c> {
    icon: &'c str,
    highlight: &'c str,
    open_len: usize,
    label: (usize, usize),
}

fn resolve<'c>(
    config: &'c LinkConfig,
    links: &'c LinkMatcher,
    node: &NodeInfo<'_>,
) -> Option<Resolved<'c>> {
    if !config.enabled {
        return None;
    }
    let text = node.text();
    let (default_icon, open_len, label) = match node.kind() {
        "inline_link" | "full_reference_link" | "collapsed_reference_link" => {
            (config.hyperlink.as_str(), 1, bracketed_label(node, 0))
        }
        "image" => (config.image.as_str(), 2, bracketed_label(node, 1)),
        "uri_autolink" => (config.hyperlink.as_str(), 1, autolink_label(text)),
        "email_autolink" => (config.email.as_str(), 1, autolink_label(text)),
        _ => return None,
    };
    let (label_start, label_end) = label?;

    let target = match node.child("link_destination") {
        Some(destination) => destination.text(),
        None => text.get(label_start..label_end).unwrap_or_default(),
    };
    let mut icon = default_icon;
    let mut highlight = config.highlight.as_str();
    if node.kind() != "image" && is_email(target) {
        icon = config.email.as_str();
    }
    if let Some((custom_icon, custom_highlight)) = links.lookup(target) {
        icon = custom_icon;
        highlight = custom_highlight.unwrap_or(highlight);
    }
    Some(Resolved {
        icon,
        highlight,
        open_len,
        label: (label_start, label_end),
    })
}

/// What a link node shows once decorated: its icon followed by its label.
pub(super) fn rendered_text(
    config: &LinkConfig,
    links: &LinkMatcher,
    node: &NodeInfo<'_>,
) -> Option<String> {
    let resolved = resolve(config, links, node)?;
    let (start, end) = resolved.label;
    let label = node.text().get(start..end).unwrap_or_default();
    Some(format!("{}{label}", resolved.icon))
}

pub(super) fn render(h: &mut Handler<'_>, node: NodeInfo<'_>) {
    let config = h.config;
    let links = h.links;
    let Some(Resolved {
        icon,
        highlight,
        open_len,
        label: (label_start, label_end),
    }) = resolve(&config.link, links, &node)
    else {
        return;
    };

    let text = node.text();
    let row = node.start_row();
    let start = node.start_col();
    let opener = text.get(..open_len).unwrap_or_default();
    if !h.replace(Range::on_row(row, start, start + open_len), opener, icon, highlight) {
        return;
    }

    let tree = node.tree();
    let base = node.byte_range().start;
    let label_range = Range {
        start: tree.position(base + label_start),
        end: tree.position(base + label_end),
    };
    h.add(false, label_range, Decoration::highlight(highlight));

    let closing = Range {
        start: label_range.end,
        end: node.range().end,
    };
    if !closing.is_single_row() || closing.is_empty() {
        return;
    }
    let closer = text.get(label_end..).unwrap_or_default();
    h.add_with_offset(closing, Decoration::conceal(), -signed_width(closer));
}

fn autolink_label(text: &str) -> Option<(usize, usize)> {
    (text.len() >= 2).then(|| (1, text.len() - 1))
}

/// `(start, end)` of the label inside the node text, skipping `skip` leading bytes (`!`).
fn bracketed_label(node: &NodeInfo<'_>, skip: usize) -> Option<(usize, usize)> {
    if let Some(text) = node.child("link_text").or_else(|| node.child("image_description")) {
        let base = node.byte_range().start;
        let r = text.byte_range();
        return Some((r.start - base, r.end - base));
    }
    let rest = node.text().get(skip..)?;
    let end = closing_bracket(rest)?;
    Some((skip + 1, skip + end))
}

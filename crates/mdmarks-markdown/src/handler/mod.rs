//! Producers: one per capture, each turning a node into marks.

mod code;
mod dash;
mod heading;
mod link;
mod list;
mod quote;
mod shortcut;

pub use link::LinkMatcher;

use mdmarks_core::context::RenderContext;
use mdmarks_core::mark::Decoration;
use mdmarks_core::mark::MarkList;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::node::Range;
use mdmarks_core::text::display_width;

use crate::capture::Capture;
use crate::config::RenderConfig;
use crate::diagnostic::Diagnostic;
use crate::table;

/// Everything a producer may read or write during one pass.
pub(crate) struct Handler<'a> {
    pub config: &'a RenderConfig,
    pub links: &'a LinkMatcher,
    pub marks: &'a mut MarkList,
    pub context: &'a mut RenderContext,
    pub diagnostics: &'a mut Vec<Diagnostic>,
}

impl Handler<'_> {
    pub fn dispatch(&mut self, capture: Capture, node: NodeInfo<'_>) {
        match capture {
            Capture::Heading => heading::render(self, node),
            Capture::Dash => dash::render(self, node),
            Capture::Code => code::render_block(self, node),
            Capture::CodeInline => code::render_inline(self, node),
            Capture::ListMarker => list::render_marker(self, node),
            Capture::CheckboxChecked => list::render_checkbox(self, node, true),
            Capture::CheckboxUnchecked => list::render_checkbox(self, node, false),
            Capture::Quote => quote::render(self, node),
            Capture::Table => table::render(self, node),
            Capture::Link => link::render(self, node),
            Capture::Shortcut => shortcut::render(self, node),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(target: "mdmarks::render", %diagnostic, "decoration skipped");
        self.diagnostics.push(diagnostic);
    }

    pub fn add(&mut self, exclusive: bool, range: Range, decoration: Decoration) -> bool {
        self.marks.add(exclusive, range, decoration)
    }

    /// Adds an exclusive mark and, if accepted, records the width change it causes.
    pub fn add_with_offset(&mut self, range: Range, decoration: Decoration, delta: isize) -> bool {
        let added = self.marks.add(true, range, decoration);
        if added {
            self.context.add_offset(range, delta);
        }
        added
    }

    /// Conceals `range` on one row and shows `text` instead, tracking the width difference.
    pub fn replace(&mut self, range: Range, hidden: &str, text: &str, highlight: &str) -> bool {
        let delta = signed_width(text) - signed_width(hidden);
        self.add_with_offset(range, Decoration::replace(text, highlight), delta)
    }
}

pub(crate) fn signed_width(s: &str) -> isize {
    display_width(s) as isize
}

/// Range an inline node hides and the text it shows instead, when a producer would decorate it.
///
/// Lets block layouts draw inline content themselves when they own the whole row.
pub(crate) fn inline_text(
    config: &RenderConfig,
    links: &LinkMatcher,
    node: &NodeInfo<'_>,
) -> Option<(Range, String)> {
    match node.kind() {
        "shortcut_link" => shortcut::wiki_text(&config.link, node),
        _ => {
            let text = link::rendered_text(&config.link, links, node)?;
            node.range()
                .is_single_row()
                .then(|| (node.range(), text))
        }
    }
}

/// Source text of `cols` on `row`, clamped to the line.
pub(crate) fn line_slice<'t>(node: &NodeInfo<'t>, row: usize, start: usize, end: usize) -> &'t str {
    let line = node.tree().line(row).unwrap_or_default();
    let end = end.min(line.len());
    line.get(start.min(end)..end).unwrap_or_default()
}

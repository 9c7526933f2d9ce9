use mdmarks_core::context::RenderContext;
use mdmarks_core::mark::Mark;
use mdmarks_core::mark::MarkList;
use mdmarks_core::node::NodeInfo;
use mdmarks_core::render::render_lines;
use mdmarks_core::theme::Theme;
use ratatui::text::Line;

use crate::capture::Capture;
use crate::config::RenderConfig;
use crate::diagnostic::Diagnostic;
use crate::handler::Handler;
use crate::handler::LinkMatcher;
use crate::parse::ParsedDocument;
use crate::parse::parse;

/// Everything one pass produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassOutput {
    pub marks: Vec<Mark>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decorates one parsed document.
///
/// `context` is reset first, so calling this twice on the same document yields the same marks.
/// Inline captures (links, shortcuts, inline code) run before block captures so that tables see
/// the width changes of the links inside their cells. Overlay tables run before both and draw
/// their cells' inline content themselves. Within a phase captures run in `(row, col)` order.
pub fn render_pass(
    doc: &ParsedDocument,
    config: &RenderConfig,
    context: &mut RenderContext,
) -> PassOutput {
    context.reset();
    let (links, mut diagnostics) = LinkMatcher::new(&config.link);
    for diagnostic in &diagnostics {
        tracing::warn!(target: "mdmarks::render", %diagnostic, "link pattern ignored");
    }

    let tree = doc.tree();
    let mut resolved: Vec<(Capture, NodeInfo<'_>)> = Vec::with_capacity(doc.captures().len());
    for (name, id) in doc.captures() {
        let Some(node) = tree.get(*id) else {
            continue;
        };
        match Capture::from_name(name) {
            Some(capture) => resolved.push((capture, node)),
            None => {
                let diagnostic = Diagnostic::UnhandledCapture { name: name.clone() };
                tracing::warn!(target: "mdmarks::render", %diagnostic, "capture skipped");
                diagnostics.push(diagnostic);
            }
        }
    }
    resolved.sort_by_key(|(capture, node)| {
        (capture.phase_in(config), node.start_row(), node.start_col())
    });

    let mut marks = MarkList::new();
    let mut handler = Handler {
        config,
        links: &links,
        marks: &mut marks,
        context,
        diagnostics: &mut diagnostics,
    };
    for (capture, node) in resolved {
        handler.dispatch(capture, node);
    }

    tracing::debug!(
        target: "mdmarks::render",
        marks = marks.len(),
        diagnostics = diagnostics.len(),
        "render pass complete"
    );
    PassOutput {
        marks: marks.into_marks(),
        diagnostics,
    }
}

/// Owns the configuration and per-document context for repeated passes over one document.
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    config: RenderConfig,
    context: RenderContext,
}

impl MarkdownRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            context: RenderContext::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Parses `source` with the bundled adapter and runs one pass.
    pub fn render(&mut self, source: &str) -> PassOutput {
        let doc = parse(source);
        render_pass(&doc, &self.config, &mut self.context)
    }

    /// Runs a pass and paints the marks onto `source` for a terminal.
    pub fn lines(&mut self, source: &str, theme: &Theme) -> Vec<Line<'static>> {
        let output = self.render(source);
        render_lines(source, &output.marks, theme)
    }
}

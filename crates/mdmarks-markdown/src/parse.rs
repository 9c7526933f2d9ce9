//! Reference parser adapter built on `pulldown-cmark`.
//!
//! The engine only needs a [`SyntaxTree`] and a list of `(capture name, node)` pairs. This adapter
//! produces both from `pulldown-cmark`'s offset iterator, naming nodes the way tree-sitter's
//! markdown grammar does and adding the marker children (heading markers, list markers, fence
//! delimiters, table pipes) that `pulldown-cmark` folds into its events.

use std::ops;

use mdmarks_core::node::NodeId;
use mdmarks_core::node::Pos;
use mdmarks_core::node::SyntaxTree;
use mdmarks_core::text::closing_bracket;
use mdmarks_core::text::leading_spaces;
use mdmarks_core::text::trailing_spaces;
use pulldown_cmark::BrokenLink;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::LinkType;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;

/// A parsed document: the node arena plus the captures to decorate, in document order.
#[derive(Clone, Debug)]
pub struct ParsedDocument {
    tree: SyntaxTree,
    captures: Vec<(String, NodeId)>,
}

impl ParsedDocument {
    /// Wraps a tree built by another parser.
    pub fn new(tree: SyntaxTree, captures: Vec<(String, NodeId)>) -> Self {
        Self { tree, captures }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn captures(&self) -> &[(String, NodeId)] {
        &self.captures
    }
}

/// Undefined references still become link events so shortcut links (`[!NOTE]`, `[-]`,
/// `[[page]]`) reach the engine.
fn keep_broken_link<'a>(_link: BrokenLink<'a>) -> Option<(CowStr<'a>, CowStr<'a>)> {
    Some((CowStr::Borrowed(""), CowStr::Borrowed("")))
}

pub fn parse(source: &str) -> ParsedDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_with_broken_link_callback(source, options, Some(keep_broken_link));

    let mut b = Builder::new(source);
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => b.start(tag, range),
            Event::End(_) => {
                b.stack.pop();
            }
            Event::Code(_) => {
                let id = b.node("code_span", range);
                b.capture("code_inline", id);
            }
            Event::Rule => {
                let bytes = b.trim_block(range);
                let id = b.node("thematic_break", bytes);
                b.capture("dash", id);
            }
            Event::TaskListMarker(checked) => b.task_marker(checked, range),
            _ => {}
        }
    }
    tracing::trace!(
        target: "mdmarks::parse",
        nodes = b.tree.len(),
        captures = b.captures.len(),
        "parsed document"
    );
    ParsedDocument {
        tree: b.tree,
        captures: b.captures,
    }
}

struct Builder<'s> {
    source: &'s str,
    tree: SyntaxTree,
    captures: Vec<(String, NodeId)>,
    /// One entry per open `Start` event; `None` for tags without a node.
    stack: Vec<Option<NodeId>>,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tree: SyntaxTree::new(source),
            captures: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn capture(&mut self, name: &str, id: NodeId) {
        self.captures.push((name.to_string(), id));
    }

    fn parent_for(&self, bytes: ops::Range<usize>) -> NodeId {
        let from = self
            .stack
            .iter()
            .rev()
            .find_map(|id| *id)
            .unwrap_or(self.tree.root_id());
        self.tree.deepest_containing(from, bytes)
    }

    fn node(&mut self, kind: &str, bytes: ops::Range<usize>) -> NodeId {
        let parent = self.parent_for(bytes.clone());
        self.tree.insert(parent, kind, bytes)
    }

    fn text(&self, bytes: ops::Range<usize>) -> &'s str {
        self.source.get(bytes).unwrap_or_default()
    }

    /// Block ranges come with their line terminators; nodes end at the last visible byte.
    fn trim_block(&self, range: ops::Range<usize>) -> ops::Range<usize> {
        let text = self.text(range.clone());
        range.start..range.start + text.trim_end_matches(['\n', '\r']).len()
    }

    fn line(&self, row: usize) -> &'s str {
        let start = self.tree.offset(Pos::new(row, 0));
        let rest = self.source.get(start..).unwrap_or_default();
        let line = rest.split('\n').next().unwrap_or_default();
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// First non-blank column at or after `from` on `line`.
    fn skip_blank(line: &str, from: usize) -> usize {
        let from = from.min(line.len());
        from + leading_spaces(line.get(from..).unwrap_or_default())
    }

    fn byte(&self, row: usize, col: usize) -> usize {
        self.tree.offset(Pos::new(row, col))
    }

    fn start(&mut self, tag: Tag<'_>, range: ops::Range<usize>) {
        let id = match tag {
            Tag::Paragraph => {
                let bytes = self.trim_block(range);
                Some(self.node("paragraph", bytes))
            }
            Tag::Heading { level, .. } => Some(self.heading(level as usize, range)),
            Tag::BlockQuote(_) => Some(self.block_quote(range)),
            Tag::CodeBlock(CodeBlockKind::Fenced(_)) => Some(self.fenced_code(range)),
            Tag::List(_) => {
                let bytes = self.trim_block(range);
                Some(self.node("list", bytes))
            }
            Tag::Item => Some(self.list_item(range)),
            Tag::Table(_) => Some(self.table(range)),
            Tag::Link { link_type, .. } => self.link(link_type, range),
            Tag::Image { .. } => Some(self.image(range)),
            _ => None,
        };
        self.stack.push(id);
    }

    fn heading(&mut self, level: usize, range: ops::Range<usize>) -> NodeId {
        let bytes = self.trim_block(range);
        let text = self.text(bytes.clone());
        let indent = leading_spaces(text);
        if text[indent..].starts_with('#') {
            let id = self.node("atx_heading", bytes.clone());
            let hashes = text[indent..].bytes().take_while(|&b| b == b'#').count();
            let at = bytes.start + indent;
            self.tree
                .insert(id, &format!("atx_h{level}_marker"), at..at + hashes);
            self.capture("heading", id);
            return id;
        }

        let start = self.tree.position(bytes.start);
        let end = self.tree.position(bytes.end);
        let is_underline = |line: &str| {
            let t = line.trim();
            !t.is_empty() && (t.bytes().all(|b| b == b'=') || t.bytes().all(|b| b == b'-'))
        };
        let underline_row = if end.row > start.row && is_underline(self.line(end.row)) {
            end.row
        } else {
            end.row + 1
        };
        let line = self.line(underline_row);
        let line_start = self.byte(underline_row, 0);
        let underline =
            line_start + leading_spaces(line)..line_start + line.len() - trailing_spaces(line);
        let id = self.node("setext_heading", bytes.start..bytes.end.max(underline.end));
        let kind = if level == 1 {
            "setext_h1_underline"
        } else {
            "setext_h2_underline"
        };
        self.tree.insert(id, kind, underline);
        self.capture("heading", id);
        id
    }

    fn block_quote(&mut self, range: ops::Range<usize>) -> NodeId {
        let bytes = self.trim_block(range);
        let id = self.node("block_quote", bytes.clone());
        let start = self.tree.position(bytes.start);
        let end = self.tree.position(bytes.end);
        for row in start.row..=end.row {
            let line = self.line(row);
            let col = Self::skip_blank(line, start.col);
            if line.as_bytes().get(col) == Some(&b'>') {
                let at = self.byte(row, col);
                self.tree.insert(id, "block_quote_marker", at..at + 1);
            }
        }
        self.capture("quote", id);
        id
    }

    fn fenced_code(&mut self, range: ops::Range<usize>) -> NodeId {
        let bytes = self.trim_block(range);
        let start = self.tree.position(bytes.start);
        let end = self.tree.position(bytes.end);

        let first = self.line(start.row);
        let from = start.col;
        let open_col = Self::skip_blank(first, from);
        let fence = first.as_bytes().get(open_col).copied().unwrap_or(b'`');
        let run = first.as_bytes()[open_col.min(first.len())..]
            .iter()
            .take_while(|&&b| b == fence)
            .count();

        let is_close = |line: &str| {
            let t = line.get(from.min(line.len())..).unwrap_or_default().trim();
            t.len() >= run && t.bytes().all(|b| b == fence)
        };
        let close_row = [end.row, end.row + 1]
            .into_iter()
            .filter(|&row| row > start.row && row < self.tree.line_count())
            .find(|&row| is_close(self.line(row)));

        let node_end = match close_row {
            Some(row) => {
                let line = self.line(row);
                self.byte(row, line.len() - trailing_spaces(line))
            }
            None => bytes.end,
        };
        let id = self.node("fenced_code_block", bytes.start..node_end.max(bytes.end));

        let open_at = self.byte(start.row, open_col);
        self.tree
            .insert(id, "fenced_code_block_delimiter", open_at..open_at + run);
        let rest = first.get(open_col + run..).unwrap_or_default();
        let info = rest.trim();
        if !info.is_empty() {
            let info_at = open_at + run + leading_spaces(rest);
            let info_id = self
                .tree
                .insert(id, "info_string", info_at..info_at + info.len());
            let language = info.split_whitespace().next().unwrap_or_default();
            self.tree
                .insert(info_id, "language", info_at..info_at + language.len());
        }

        let content_end_row = close_row.unwrap_or(end.row + 1);
        if start.row + 1 < content_end_row {
            let content_start = self.byte(start.row + 1, 0);
            let content_end = self.byte(content_end_row, 0);
            let text = self.text(content_start..content_end);
            let len = text.trim_end_matches(['\n', '\r']).len();
            self.tree
                .insert(id, "code_fence_content", content_start..content_start + len);
        }
        if let Some(row) = close_row {
            let line = self.line(row);
            let col = Self::skip_blank(line, from);
            let at = self.byte(row, col);
            let len = (line.len() - trailing_spaces(line)).saturating_sub(col);
            self.tree
                .insert(id, "fenced_code_block_delimiter", at..at + len);
        }
        self.capture("code", id);
        id
    }

    fn list_item(&mut self, range: ops::Range<usize>) -> NodeId {
        let bytes = self.trim_block(range);
        let id = self.node("list_item", bytes.clone());
        let text = self.text(bytes.clone());
        let indent = leading_spaces(text);
        let rest = &text[indent..];
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (kind, len) = match rest.as_bytes().get(digits) {
            Some(b'-') if digits == 0 => ("list_marker_minus", 1),
            Some(b'+') if digits == 0 => ("list_marker_plus", 1),
            Some(b'*') if digits == 0 => ("list_marker_star", 1),
            Some(b'.') if digits > 0 => ("list_marker_dot", digits + 1),
            Some(b')') if digits > 0 => ("list_marker_parenthesis", digits + 1),
            _ => return id,
        };
        let len = if rest[len..].starts_with(' ') { len + 1 } else { len };
        let at = bytes.start + indent;
        let marker = self.tree.insert(id, kind, at..at + len);
        self.capture("list_marker", marker);
        id
    }

    fn task_marker(&mut self, checked: bool, range: ops::Range<usize>) {
        let parent = self.parent_for(range.clone());
        let item = match self.tree.get(parent) {
            Some(node) if node.kind() == "list_item" => Some(parent),
            Some(node) => node.ancestor("list_item").map(|n| n.id()),
            None => None,
        };
        let (kind, capture) = if checked {
            ("task_list_marker_checked", "checkbox_checked")
        } else {
            ("task_list_marker_unchecked", "checkbox_unchecked")
        };
        let id = match item {
            Some(item) => self.tree.insert(item, kind, range),
            None => self.node(kind, range),
        };
        self.capture(capture, id);
    }

    fn link(&mut self, link_type: LinkType, range: ops::Range<usize>) -> Option<NodeId> {
        let (kind, capture) = match link_type {
            LinkType::Inline => ("inline_link", "link"),
            LinkType::Reference | LinkType::ReferenceUnknown => ("full_reference_link", "link"),
            LinkType::Collapsed | LinkType::CollapsedUnknown => {
                ("collapsed_reference_link", "link")
            }
            LinkType::Shortcut | LinkType::ShortcutUnknown => ("shortcut_link", "shortcut"),
            LinkType::Autolink => ("uri_autolink", "link"),
            LinkType::Email => ("email_autolink", "link"),
            #[allow(unreachable_patterns)]
            _ => return None,
        };
        let id = self.node(kind, range.clone());
        if kind == "inline_link" || kind.ends_with("reference_link") {
            self.label_children(id, range, 0, "link_text");
        }
        self.capture(capture, id);
        Some(id)
    }

    fn image(&mut self, range: ops::Range<usize>) -> NodeId {
        let id = self.node("image", range.clone());
        self.label_children(id, range, 1, "image_description");
        self.capture("link", id);
        id
    }

    /// Adds the label child and, for inline links, the destination child.
    fn label_children(&mut self, id: NodeId, range: ops::Range<usize>, skip: usize, kind: &str) {
        let text = self.text(range.clone());
        let Some(close) = text.get(skip..).and_then(closing_bracket).map(|c| c + skip) else {
            return;
        };
        self.tree
            .insert(id, kind, range.start + skip + 1..range.start + close);

        let after = &text[close + 1..];
        let Some(inner) = after.strip_prefix('(') else {
            return;
        };
        let lead = leading_spaces(inner);
        let dest = &inner[lead..];
        let len = match dest.strip_prefix('<') {
            Some(angled) => angled.find('>').map(|i| i + 2).unwrap_or(0),
            None => destination_len(dest),
        };
        if len > 0 {
            let at = range.start + close + 2 + lead;
            self.tree.insert(id, "link_destination", at..at + len);
        }
    }

    fn table(&mut self, range: ops::Range<usize>) -> NodeId {
        let bytes = self.trim_block(range);
        let id = self.node("pipe_table", bytes.clone());
        let start = self.tree.position(bytes.start);
        let end = self.tree.position(bytes.end);
        for (index, row) in (start.row..=end.row).enumerate() {
            let line = self.line(row);
            let row_start = Self::skip_blank(line, start.col);
            let row_end = line.len() - trailing_spaces(line);
            let Some(row_text) = line.get(row_start..row_end).filter(|t| !t.is_empty()) else {
                continue;
            };
            let (row_kind, cell_kind) = match index {
                0 => ("pipe_table_header", "pipe_table_cell"),
                1 => ("pipe_table_delimiter_row", "pipe_table_delimiter_cell"),
                _ => ("pipe_table_row", "pipe_table_cell"),
            };
            let base = self.byte(row, 0);
            let row_id = self
                .tree
                .insert(id, row_kind, base + row_start..base + row_end);

            let pipes = pipe_columns(row_text);
            let mut cell_start = row_start;
            for edge in pipes
                .iter()
                .map(|&p| Some(p + row_start))
                .chain(std::iter::once(None))
            {
                let cell_end = edge.unwrap_or(row_end);
                let cell = &line[cell_start..cell_end];
                if !cell.trim().is_empty() {
                    let s = cell_start + leading_spaces(cell);
                    let e = cell_end - trailing_spaces(cell);
                    self.tree.insert(row_id, cell_kind, base + s..base + e);
                }
                if let Some(pipe) = edge {
                    self.tree.insert(row_id, "|", base + pipe..base + pipe + 1);
                    cell_start = pipe + 1;
                }
            }
        }
        self.capture("table", id);
        id
    }
}

/// Byte length of an unbracketed link destination: up to whitespace or an unbalanced `)`.
fn destination_len(dest: &str) -> usize {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, b) in dest.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'(' => depth += 1,
            b')' if depth == 0 => return i,
            b')' => depth -= 1,
            b' ' | b'\t' | b'\n' => return i,
            _ => {}
        }
    }
    dest.len()
}

/// Columns of the unescaped pipes in one table row.
fn pipe_columns(row: &str) -> Vec<usize> {
    let mut pipes = Vec::new();
    let mut escaped = false;
    for (i, b) in row.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'|' => pipes.push(i),
            _ => {}
        }
    }
    pipes
}

//! Read-only syntax-node views.
//!
//! A parser adapter fills a [`SyntaxTree`] arena once per render pass; handlers only ever see
//! [`NodeInfo`] handles into it. Positions are `(row, byte column)` pairs and ranges are
//! half-open, matching what tree-sitter style parsers report.

use std::fmt;
use std::ops;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Half-open document range in `(row, byte column)` coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub const fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Self {
            start: Pos::new(start_row, start_col),
            end: Pos::new(end_row, end_col),
        }
    }

    /// Range spanning `start_col..end_col` on a single row.
    pub const fn on_row(row: usize, start_col: usize, end_col: usize) -> Self {
        Self::new(row, start_col, row, end_col)
    }

    /// Zero-width range at `(row, col)`.
    pub const fn point(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_single_row(&self) -> bool {
        self.start.row == self.end.row
    }

    /// Column interval this range covers on `row`, `usize::MAX` standing for "to end of line".
    pub fn cols_on_row(&self, row: usize) -> Option<(usize, usize)> {
        if row < self.start.row || row > self.end.row {
            return None;
        }
        let start = if row == self.start.row { self.start.col } else { 0 };
        let end = if row == self.end.row {
            self.end.col
        } else {
            usize::MAX
        };
        Some((start, end))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
struct NodeData {
    kind: String,
    bytes: ops::Range<usize>,
    range: Range,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of parsed nodes over one document snapshot.
///
/// The root node (kind `document`) always exists and covers the whole source.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    source: String,
    line_starts: Vec<usize>,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        let mut tree = Self {
            source,
            line_starts,
            nodes: Vec::new(),
        };
        let len = tree.source.len();
        let range = Range {
            start: Pos::default(),
            end: tree.position(len),
        };
        tree.nodes.push(NodeData {
            kind: "document".to_string(),
            bytes: 0..len,
            range,
            parent: None,
            children: Vec::new(),
        });
        tree
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeInfo<'_> {
        NodeInfo {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<NodeInfo<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeInfo { tree: self, id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Source line `row` without its line terminator.
    pub fn line(&self, row: usize) -> Option<&str> {
        let start = *self.line_starts.get(row)?;
        let end = self
            .line_starts
            .get(row + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let line = self.source.get(start..end)?;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Converts a byte offset into a `(row, byte column)` position.
    pub fn position(&self, byte: usize) -> Pos {
        let byte = byte.min(self.source.len());
        let row = self.line_starts.partition_point(|&s| s <= byte) - 1;
        Pos::new(row, byte - self.line_starts[row])
    }

    /// Byte offset of `(row, col)`, clamped to the source length.
    pub fn offset(&self, pos: Pos) -> usize {
        match self.line_starts.get(pos.row) {
            Some(start) => (start + pos.col).min(self.source.len()),
            None => self.source.len(),
        }
    }

    /// Inserts a node covering `bytes` under `parent`, keeping siblings in document order.
    pub fn insert(&mut self, parent: NodeId, kind: &str, bytes: ops::Range<usize>) -> NodeId {
        let len = self.source.len();
        let bytes = bytes.start.min(len)..bytes.end.min(len).max(bytes.start.min(len));
        let range = Range {
            start: self.position(bytes.start),
            end: self.position(bytes.end),
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: kind.to_string(),
            bytes: bytes.clone(),
            range,
            parent: Some(parent),
            children: Vec::new(),
        });
        let nodes = &self.nodes;
        let siblings = &nodes[parent.0].children;
        let at = siblings.partition_point(|c| nodes[c.0].bytes.start <= bytes.start);
        self.nodes[parent.0].children.insert(at, id);
        id
    }

    /// Deepest node under `from` (inclusive) whose byte span contains `bytes`.
    pub fn deepest_containing(&self, from: NodeId, bytes: ops::Range<usize>) -> NodeId {
        let mut current = from;
        'descend: loop {
            for &child in &self.nodes[current.0].children {
                let span = &self.nodes[child.0].bytes;
                if span.start <= bytes.start && bytes.end <= span.end {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }
}

/// Copyable view of one node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct NodeInfo<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeInfo<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> &'t str {
        &self.data().kind
    }

    pub fn range(&self) -> Range {
        self.data().range
    }

    pub fn byte_range(&self) -> ops::Range<usize> {
        self.data().bytes.clone()
    }

    pub fn start_row(&self) -> usize {
        self.data().range.start.row
    }

    pub fn start_col(&self) -> usize {
        self.data().range.start.col
    }

    pub fn end_row(&self) -> usize {
        self.data().range.end.row
    }

    pub fn end_col(&self) -> usize {
        self.data().range.end.col
    }

    /// Exact source text covered by this node.
    pub fn text(&self) -> &'t str {
        self.tree
            .source
            .get(self.data().bytes.clone())
            .unwrap_or_default()
    }

    /// Full source line the node starts on.
    pub fn line(&self) -> &'t str {
        self.tree.line(self.start_row()).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<NodeInfo<'t>> {
        self.data().parent.map(|id| NodeInfo {
            tree: self.tree,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeInfo<'t>> + use<'t> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&id| NodeInfo { tree, id })
    }

    /// First direct child of the given kind.
    pub fn child(&self, kind: &str) -> Option<NodeInfo<'t>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// Closest ancestor of the given kind.
    pub fn ancestor(&self, kind: &str) -> Option<NodeInfo<'t>> {
        let mut node = self.parent();
        while let Some(n) = node {
            if n.kind() == kind {
                return Some(n);
            }
            node = n.parent();
        }
        None
    }

    /// Number of ancestors of the given kind.
    pub fn depth(&self, kind: &str) -> usize {
        let mut depth = 0;
        let mut node = self.parent();
        while let Some(n) = node {
            if n.kind() == kind {
                depth += 1;
            }
            node = n.parent();
        }
        depth
    }

    pub fn prev_sibling(&self) -> Option<NodeInfo<'t>> {
        let parent = self.parent()?;
        let siblings = &parent.data().children;
        let idx = siblings.iter().position(|&id| id == self.id)?;
        let id = *siblings.get(idx.checked_sub(1)?)?;
        Some(NodeInfo {
            tree: self.tree,
            id,
        })
    }

    pub fn next_sibling(&self) -> Option<NodeInfo<'t>> {
        let parent = self.parent()?;
        let siblings = &parent.data().children;
        let idx = siblings.iter().position(|&id| id == self.id)?;
        let id = *siblings.get(idx + 1)?;
        Some(NodeInfo {
            tree: self.tree,
            id,
        })
    }

    /// First sibling (either side) of the given kind.
    pub fn sibling(&self, kind: &str) -> Option<NodeInfo<'t>> {
        self.parent()?
            .children()
            .find(|c| c.id != self.id && c.kind() == kind)
    }
}

impl fmt::Debug for NodeInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.range();
        write!(
            f,
            "{}[{}:{}-{}:{}]",
            self.kind(),
            r.start.row,
            r.start.col,
            r.end.row,
            r.end.col
        )
    }
}

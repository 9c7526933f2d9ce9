//! `mdmarks-core` holds the document-independent pieces of the mdmarks decoration engine.
//!
//! A Markdown front end walks a syntax tree and emits [`mark::Mark`]s: overlays, inline text,
//! concealed ranges, highlights and virtual lines anchored to source positions. Nothing here knows
//! about Markdown.
//!
//! ## Building blocks
//!
//! - [`node::SyntaxTree`] / [`node::NodeInfo`]: read-only views over a parsed document.
//! - [`mark::MarkList`]: ordered marks with exclusive-range claiming.
//! - [`context::RenderContext`]: per-row column offsets so later handlers can compute rendered
//!   widths after earlier marks changed them.
//! - [`render::render_lines`]: applies a mark list to the source text as `ratatui` lines.
pub mod context;
pub mod mark;
pub mod node;
pub mod render;
pub mod text;
pub mod theme;

//! Markdown decorations for `mdmarks`.
//!
//! Given a parsed document, a render pass walks its captures (headings, code blocks, list
//! markers, checkboxes, quotes, links, tables) and produces the marks a display layer needs to
//! show the document rendered in place: icons over markers, concealed link syntax, padded and
//! bordered tables. The source text is never modified.
//!
//! ## Two layers
//!
//! - [`pass::render_pass`]: the engine. Takes any [`parse::ParsedDocument`], so hosts with their
//!   own tree-sitter style parser can feed it directly.
//! - [`pass::MarkdownRenderer`]: convenience wrapper that parses with `pulldown-cmark` and can
//!   paint the result as `ratatui` lines.
//!
//! ```
//! use mdmarks_markdown::config::RenderConfig;
//! use mdmarks_markdown::pass::MarkdownRenderer;
//!
//! let mut renderer = MarkdownRenderer::new(RenderConfig::default());
//! let output = renderer.render("| a | b |\n| - | - |\n");
//! assert!(output.diagnostics.is_empty());
//! assert!(!output.marks.is_empty());
//! ```
pub mod capture;
pub mod config;
pub mod diagnostic;
mod handler;
pub mod parse;
pub mod pass;
pub mod table;

pub use handler::LinkMatcher;

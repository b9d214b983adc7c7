//! Syntax highlighting module.
//!
//! Renders paste contents as highlighted markup using tree-sitter.

mod highlighter;
mod language;
mod style;

pub use highlighter::{
    detect_language, escape_html, HighlightListener, HighlightSpan, SyntaxHighlighter,
};
pub use language::Language;
pub use style::TokenStyle;

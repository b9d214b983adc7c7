//! Syntax highlighter using tree-sitter.
//!
//! Turns the full document into escaped markup with one `<span>` per styled
//! token, the form the page mirrors under the input.

use super::language::Language;
use super::style::TokenStyle;
use crate::observer::{ChangeEvent, ChangeListener};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// A highlighted span representing a range of text with a style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightSpan {
    /// Start byte offset in the source.
    pub start_byte: usize,
    /// End byte offset in the source.
    pub end_byte: usize,
    /// Token style for this span.
    pub style: TokenStyle,
}

impl HighlightSpan {
    pub fn new(start_byte: usize, end_byte: usize, style: TokenStyle) -> Self {
        Self {
            start_byte,
            end_byte,
            style,
        }
    }
}

/// Appends `text` to `out` with markup characters escaped.
pub fn escape_html_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(&mut out, text);
    out
}

/// Grammars tried when guessing the language of a paste. On a tie the
/// earlier one wins, so a JSON object is not taken for a Python dict.
const DETECTION_ORDER: [Language; 7] = [
    Language::Json,
    Language::Python,
    Language::Rust,
    Language::JavaScript,
    Language::TypeScript,
    Language::C,
    Language::Cpp,
];

/// Guesses the language of `source` from its content.
///
/// The first grammar that parses the whole text without error and yields at
/// least one styled token wins. Text no grammar accepts is plain text.
pub fn detect_language(source: &str) -> Language {
    if source.trim().is_empty() {
        return Language::PlainText;
    }
    let mut highlighter = SyntaxHighlighter::new();
    for language in DETECTION_ORDER {
        highlighter.set_language(language);
        highlighter.parse(source);
        let clean = highlighter
            .tree
            .as_ref()
            .is_some_and(|tree| !tree.root_node().has_error());
        if clean && !highlighter.spans().is_empty() {
            log::debug!("Detected {} from content", language.name());
            return language;
        }
    }
    Language::PlainText
}

/// Syntax highlighter using tree-sitter for parsing.
pub struct SyntaxHighlighter {
    /// Tree-sitter parser.
    parser: Parser,
    /// Parse tree of the last highlighted source.
    tree: Option<Tree>,
    language: Language,
}

impl SyntaxHighlighter {
    /// Creates a plain-text highlighter.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            tree: None,
            language: Language::PlainText,
        }
    }

    pub fn with_language(language: Language) -> Self {
        let mut highlighter = Self::new();
        highlighter.set_language(language);
        highlighter
    }

    /// Sets the language and configures the parser.
    pub fn set_language(&mut self, language: Language) {
        if self.language == language {
            return;
        }

        self.language = language;
        self.tree = None;

        if let Some(ts_lang) = language.tree_sitter_language() {
            if let Err(e) = self.parser.set_language(&ts_lang) {
                log::warn!("Grammar for {} unavailable: {}", language.name(), e);
                self.language = Language::PlainText;
            }
        }
    }

    /// Returns the current language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Parses the source code with a full parse.
    pub fn parse(&mut self, source: &str) {
        if !self.language.has_highlighting() {
            self.tree = None;
            return;
        }
        self.tree = self.parser.parse(source, None);
    }

    /// Returns whether the last parse produced a tree.
    pub fn has_highlighting(&self) -> bool {
        self.language.has_highlighting() && self.tree.is_some()
    }

    /// Styled tokens of the last parsed source, in document order.
    ///
    /// A styled node is emitted whole; its children are not visited, so the
    /// spans never overlap.
    pub fn spans(&self) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        if let Some(tree) = &self.tree {
            let mut cursor = tree.walk();
            Self::collect_spans(&mut cursor, self.language, &mut spans);
        }
        spans
    }

    /// Parses `source` and renders it as escaped markup.
    pub fn highlight_html(&mut self, source: &str) -> String {
        self.parse(source);
        let mut out = String::with_capacity(source.len() + source.len() / 2);
        let mut pos = 0;

        for span in self.spans() {
            if span.start_byte < pos || span.end_byte > source.len() {
                continue;
            }
            let (Some(gap), Some(token)) = (
                source.get(pos..span.start_byte),
                source.get(span.start_byte..span.end_byte),
            ) else {
                continue;
            };
            escape_html_into(&mut out, gap);
            out.push_str("<span class=\"");
            out.push_str(span.style.css_class());
            out.push_str("\">");
            escape_html_into(&mut out, token);
            out.push_str("</span>");
            pos = span.end_byte;
        }

        escape_html_into(&mut out, source.get(pos..).unwrap_or_default());
        out
    }

    fn collect_spans(cursor: &mut TreeCursor, language: Language, spans: &mut Vec<HighlightSpan>) {
        loop {
            let node = cursor.node();
            let styled = match Self::node_style(&node, language) {
                Some(style) if node.end_byte() > node.start_byte() => {
                    spans.push(HighlightSpan::new(node.start_byte(), node.end_byte(), style));
                    true
                }
                _ => false,
            };

            if !styled && cursor.goto_first_child() {
                Self::collect_spans(cursor, language, spans);
                cursor.goto_parent();
            }

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    /// Determines the token style for a tree-sitter node.
    fn node_style(node: &Node, language: Language) -> Option<TokenStyle> {
        let kind = node.kind();

        match language {
            Language::Rust => Self::rust_node_style(node, kind),
            Language::Python => Self::python_node_style(node, kind),
            Language::JavaScript | Language::TypeScript => Self::js_ts_node_style(node, kind),
            Language::C | Language::Cpp => Self::c_cpp_node_style(node, kind),
            Language::Json => Self::json_node_style(node, kind),
            Language::PlainText => None,
        }
    }

    /// Whether `node` is the `field` child of its parent.
    fn is_field_of(node: &Node, field: &str) -> bool {
        node.parent()
            .and_then(|parent| parent.child_by_field_name(field))
            .is_some_and(|child| child.id() == node.id())
    }

    fn parent_kind(node: &Node) -> &'static str {
        node.parent().map(|parent| parent.kind()).unwrap_or_default()
    }

    fn rust_node_style(node: &Node, kind: &str) -> Option<TokenStyle> {
        match kind {
            "fn" | "let" | "mut" | "const" | "static" | "pub" | "mod" | "use" | "crate"
            | "self" | "super" | "impl" | "trait" | "struct" | "enum" | "type" | "where"
            | "async" | "await" | "dyn" | "extern" | "ref" | "unsafe" | "as" | "in" => {
                Some(TokenStyle::Keyword)
            }
            "if" | "else" | "match" | "for" | "while" | "loop" | "break" | "continue"
            | "return" | "yield" => Some(TokenStyle::ControlFlow),

            "string_literal" | "raw_string_literal" => Some(TokenStyle::String),
            "char_literal" => Some(TokenStyle::Char),
            "integer_literal" | "float_literal" => Some(TokenStyle::Number),
            "true" | "false" => Some(TokenStyle::Boolean),
            "line_comment" | "block_comment" => Some(TokenStyle::Comment),
            "type_identifier" | "primitive_type" => Some(TokenStyle::Type),
            "attribute_item" | "inner_attribute_item" => Some(TokenStyle::Attribute),
            "lifetime" => Some(TokenStyle::Lifetime),

            "identifier" => match Self::parent_kind(node) {
                "function_item" | "function_signature_item" if Self::is_field_of(node, "name") => {
                    Some(TokenStyle::Function)
                }
                "call_expression" if Self::is_field_of(node, "function") => {
                    Some(TokenStyle::Function)
                }
                "macro_invocation" => Some(TokenStyle::Macro),
                _ => None,
            },
            "!" if Self::parent_kind(node) == "macro_invocation" => Some(TokenStyle::Macro),
            _ => None,
        }
    }

    fn json_node_style(node: &Node, kind: &str) -> Option<TokenStyle> {
        match kind {
            "string" if Self::is_field_of(node, "key") => Some(TokenStyle::Variable),
            "string" => Some(TokenStyle::String),
            "number" => Some(TokenStyle::Number),
            "true" | "false" => Some(TokenStyle::Boolean),
            "null" => Some(TokenStyle::Constant),
            "comment" => Some(TokenStyle::Comment),
            _ => None,
        }
    }

    fn python_node_style(node: &Node, kind: &str) -> Option<TokenStyle> {
        match kind {
            "def" | "class" | "import" | "from" | "as" | "global" | "nonlocal" | "lambda"
            | "with" | "assert" | "yield" | "del" | "pass" | "raise" | "except" | "finally"
            | "try" | "async" | "await" => Some(TokenStyle::Keyword),
            "if" | "elif" | "else" | "for" | "while" | "break" | "continue" | "return" | "in"
            | "not" | "and" | "or" | "is" => Some(TokenStyle::ControlFlow),

            "string" => Some(TokenStyle::String),
            "integer" | "float" => Some(TokenStyle::Number),
            "true" | "false" => Some(TokenStyle::Boolean),
            "none" => Some(TokenStyle::Constant),
            "comment" => Some(TokenStyle::Comment),
            "decorator" => Some(TokenStyle::Attribute),

            "identifier" => match Self::parent_kind(node) {
                "function_definition" | "class_definition" if Self::is_field_of(node, "name") => {
                    Some(TokenStyle::Function)
                }
                "call" if Self::is_field_of(node, "function") => Some(TokenStyle::Function),
                _ => None,
            },
            _ => None,
        }
    }

    fn js_ts_node_style(node: &Node, kind: &str) -> Option<TokenStyle> {
        match kind {
            "function" | "const" | "let" | "var" | "class" | "extends" | "import" | "export"
            | "default" | "from" | "as" | "new" | "this" | "super" | "static" | "get"
            | "set" | "async" | "await" | "typeof" | "instanceof" | "void" | "delete" | "in"
            | "of" => Some(TokenStyle::Keyword),
            "type" | "interface" | "enum" | "namespace" | "module" | "declare" | "readonly"
            | "abstract" | "implements" | "private" | "protected" | "public" => {
                Some(TokenStyle::Keyword)
            }
            "if" | "else" | "for" | "while" | "do" | "switch" | "case" | "break"
            | "continue" | "return" | "throw" | "try" | "catch" | "finally" | "yield" => {
                Some(TokenStyle::ControlFlow)
            }

            "string" | "template_string" => Some(TokenStyle::String),
            "number" => Some(TokenStyle::Number),
            "true" | "false" => Some(TokenStyle::Boolean),
            "null" | "undefined" => Some(TokenStyle::Constant),
            "comment" => Some(TokenStyle::Comment),
            "type_identifier" | "predefined_type" => Some(TokenStyle::Type),

            "identifier" | "property_identifier" => match Self::parent_kind(node) {
                "function_declaration" | "method_definition"
                    if Self::is_field_of(node, "name") =>
                {
                    Some(TokenStyle::Function)
                }
                "call_expression" if Self::is_field_of(node, "function") => {
                    Some(TokenStyle::Function)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn c_cpp_node_style(node: &Node, kind: &str) -> Option<TokenStyle> {
        match kind {
            "auto" | "const" | "default" | "enum" | "extern" | "inline" | "register"
            | "restrict" | "signed" | "sizeof" | "static" | "struct" | "typedef" | "union"
            | "unsigned" | "void" | "volatile" => Some(TokenStyle::Keyword),
            "class" | "namespace" | "template" | "typename" | "virtual" | "override"
            | "final" | "public" | "private" | "protected" | "friend" | "new" | "delete"
            | "this" | "throw" | "try" | "catch" | "using" | "constexpr" | "noexcept"
            | "decltype" | "explicit" | "mutable" | "operator" => Some(TokenStyle::Keyword),
            "if" | "else" | "for" | "while" | "do" | "switch" | "case" | "break"
            | "continue" | "return" | "goto" => Some(TokenStyle::ControlFlow),

            "string_literal" | "raw_string_literal" | "system_lib_string" => {
                Some(TokenStyle::String)
            }
            "char_literal" => Some(TokenStyle::Char),
            "number_literal" => Some(TokenStyle::Number),
            "true" | "false" => Some(TokenStyle::Boolean),
            "null" | "nullptr" => Some(TokenStyle::Constant),
            "comment" => Some(TokenStyle::Comment),
            "type_identifier" | "primitive_type" | "sized_type_specifier" => {
                Some(TokenStyle::Type)
            }
            "#include" | "#define" | "#ifdef" | "#ifndef" | "#if" | "#else" | "#elif"
            | "#endif" | "preproc_directive" => Some(TokenStyle::Attribute),

            "identifier" => match Self::parent_kind(node) {
                "function_declarator" if Self::is_field_of(node, "declarator") => {
                    Some(TokenStyle::Function)
                }
                "call_expression" if Self::is_field_of(node, "function") => {
                    Some(TokenStyle::Function)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a highlighted mirror of an editor's document.
///
/// Re-renders from the event text on every change, never from a copy of its
/// own.
pub struct HighlightListener {
    highlighter: SyntaxHighlighter,
    markup: String,
    /// Re-detect the language from every new text.
    auto_detect: bool,
}

impl HighlightListener {
    /// A mirror fixed to `language`.
    pub fn new(language: Language) -> Self {
        Self {
            highlighter: SyntaxHighlighter::with_language(language),
            markup: String::new(),
            auto_detect: false,
        }
    }

    /// A mirror that guesses the language from the document on every change.
    pub fn auto() -> Self {
        Self {
            highlighter: SyntaxHighlighter::new(),
            markup: String::new(),
            auto_detect: true,
        }
    }

    /// Markup of the latest document.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn language(&self) -> Language {
        self.highlighter.language()
    }

    /// Fixes the language and stops detection.
    pub fn set_language(&mut self, language: Language) {
        self.auto_detect = false;
        self.highlighter.set_language(language);
    }
}

impl ChangeListener for HighlightListener {
    fn on_change(&mut self, event: &ChangeEvent<'_>) {
        if self.auto_detect {
            self.highlighter.set_language(detect_language(event.text));
        }
        self.markup = self.highlighter.highlight_html(event.text);
    }
}

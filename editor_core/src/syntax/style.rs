//! Token style categories and their markup classes.

/// Token style categories for syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStyle {
    /// Keywords (fn, let, def, class, etc.)
    Keyword,
    /// Control flow keywords (if, else, for, while, return, etc.)
    ControlFlow,
    String,
    Char,
    Number,
    Comment,
    /// Function names at definition and call sites
    Function,
    Type,
    /// Object keys and similar named slots
    Variable,
    /// null, None, nullptr
    Constant,
    /// Attributes, decorators and preprocessor lines
    Attribute,
    Macro,
    /// Lifetime annotations ('a, 'static)
    Lifetime,
    Boolean,
}

impl TokenStyle {
    /// Class name on the wrapping `<span>`, in highlight.js naming.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Keyword | Self::ControlFlow => "hljs-keyword",
            Self::String | Self::Char => "hljs-string",
            Self::Number => "hljs-number",
            Self::Comment => "hljs-comment",
            Self::Function => "hljs-title function_",
            Self::Type => "hljs-type",
            Self::Variable => "hljs-attr",
            Self::Constant | Self::Boolean => "hljs-literal",
            Self::Attribute => "hljs-meta",
            Self::Macro => "hljs-built_in",
            Self::Lifetime => "hljs-symbol",
        }
    }
}

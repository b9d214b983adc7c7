//! Bracket and quote pair table.

use crate::config::ConfigError;

/// Default delimiter pairs. Quotes close with themselves.
pub const DEFAULT_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('<', '>'),
    ('\'', '\''),
    ('"', '"'),
    ('`', '`'),
];

/// Maps each opening delimiter to exactly one closing delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPairs {
    pairs: Vec<(char, char)>,
}

impl Default for BracketPairs {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS.to_vec(),
        }
    }
}

impl BracketPairs {
    /// Builds a table, rejecting an opening delimiter that appears twice.
    pub fn new(pairs: impl IntoIterator<Item = (char, char)>) -> Result<Self, ConfigError> {
        let mut table: Vec<(char, char)> = Vec::new();
        for (open, close) in pairs {
            if table.iter().any(|&(existing, _)| existing == open) {
                return Err(ConfigError::Invalid(format!(
                    "opening delimiter {open:?} is mapped more than once"
                )));
            }
            table.push((open, close));
        }
        Ok(Self { pairs: table })
    }

    /// Returns the closing delimiter for an opening one.
    pub fn closing_for(&self, open: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|&&(o, _)| o == open)
            .map(|&(_, close)| close)
    }

    pub fn is_closing(&self, ch: char) -> bool {
        self.pairs.iter().any(|&(_, close)| close == ch)
    }

    /// A quote-like delimiter opens and closes with the same character.
    pub fn is_quote(&self, ch: char) -> bool {
        self.closing_for(ch) == Some(ch)
    }

    /// Returns true if `open` followed by `close` is an empty pair.
    pub fn is_pair(&self, open: char, close: char) -> bool {
        self.closing_for(open) == Some(close)
    }
}

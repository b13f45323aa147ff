//! Token model for PHP source scanning
//!
//! Sniffs operate on an immutable array of tokens indexed by position.
//! Bracket pairs and closure scopes are resolved once when the stream is
//! built, so sniffs can jump to a matching closer without re-scanning.

use std::ops::Index;

/// The kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A bare name: function calls, constants, class names
    Identifier,
    /// A `$variable`
    Variable,
    /// A reserved word other than `function`
    Keyword,
    /// The `function` keyword introducing a named definition
    FunctionKeyword,
    /// The `function` keyword introducing an anonymous function
    Closure,
    /// The `&` reference marker
    Ampersand,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    Number,
    SingleQuotedString,
    DoubleQuotedString,
    /// Any part of a heredoc or nowdoc: opener, body line, terminator
    Heredoc,
    Whitespace,
    Comment,
    /// Operators and any other punctuation
    Symbol,
}

impl TokenKind {
    /// Whether this token carries no code content
    pub fn is_empty(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Whether this token is part of a string or heredoc literal
    pub fn is_string_literal(self) -> bool {
        matches!(
            self,
            TokenKind::SingleQuotedString | TokenKind::DoubleQuotedString | TokenKind::Heredoc
        )
    }
}

/// Tokens that carry no code content; the standard skip-set for
/// call-site scans
pub const EMPTY_TOKENS: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::Comment];

/// A single lexed token
///
/// Token text never spans a newline, except that a token ending a line
/// carries its trailing `\n`. The first token of a line is therefore the
/// line's indentation whenever any indentation exists, and its text
/// length is the indent width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Source line the token starts on (1-based)
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }
}

/// An immutable token array with resolved bracket and scope links
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    matching: Vec<Option<usize>>,
    scope: Vec<Option<usize>>,
}

impl TokenStream {
    /// Build a stream from raw tokens, resolving bracket pairs and
    /// closure scope closers
    ///
    /// Unmatched openers and closers get no link; consumers treat a
    /// missing link as "not a well-formed construct" rather than an
    /// error.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut matching = vec![None; tokens.len()];

        let mut parens = Vec::new();
        let mut braces = Vec::new();
        let mut brackets = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let stack = match token.kind {
                TokenKind::OpenParen | TokenKind::CloseParen => &mut parens,
                TokenKind::OpenBrace | TokenKind::CloseBrace => &mut braces,
                TokenKind::OpenBracket | TokenKind::CloseBracket => &mut brackets,
                _ => continue,
            };
            match token.kind {
                TokenKind::OpenParen | TokenKind::OpenBrace | TokenKind::OpenBracket => {
                    stack.push(i);
                }
                _ => {
                    if let Some(open) = stack.pop() {
                        matching[open] = Some(i);
                        matching[i] = Some(open);
                    }
                }
            }
        }

        // A closure's scope closer is the brace ending its body: the
        // first open brace after the keyword. Parameter lists cannot
        // contain braces, so a linear scan is enough.
        let mut scope = vec![None; tokens.len()];
        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Closure {
                continue;
            }
            for (j, candidate) in tokens.iter().enumerate().skip(i + 1) {
                if candidate.kind == TokenKind::OpenBrace {
                    scope[i] = matching[j];
                    break;
                }
            }
        }

        Self {
            tokens,
            matching,
            scope,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, pos: usize) -> Option<&Token> {
        self.tokens.get(pos)
    }

    /// The position of the token closing the bracket at `pos`, if the
    /// bracket is matched (works in both directions)
    pub fn matching_closer(&self, pos: usize) -> Option<usize> {
        self.matching.get(pos).copied().flatten()
    }

    /// The position of the brace closing the closure body opened at `pos`
    pub fn scope_closer(&self, pos: usize) -> Option<usize> {
        self.scope.get(pos).copied().flatten()
    }

    /// Find the first token at or after `start` whose kind is not in
    /// `skip`
    pub fn find_next_skipping(&self, start: usize, skip: &[TokenKind]) -> Option<usize> {
        (start..self.tokens.len()).find(|&pos| !skip.contains(&self.tokens[pos].kind))
    }

    /// Find the first token at or before `start` whose kind is not in
    /// `skip`, walking backward
    pub fn find_prev_skipping(&self, start: usize, skip: &[TokenKind]) -> Option<usize> {
        let start = start.min(self.tokens.len().checked_sub(1)?);
        (0..=start).rev().find(|&pos| !skip.contains(&self.tokens[pos].kind))
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, pos: usize) -> &Token {
        &self.tokens[pos]
    }
}

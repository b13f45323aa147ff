//! A reference PHP tokenizer
//!
//! Produces the token model sniffs consume. It covers the constructs the
//! sniffs observe (calls, definitions, closures, strings, heredocs,
//! comments) and is not a full PHP lexer.
//!
//! Tokens are split at newlines: a newline always terminates the token
//! it ends, so the first token of a line is that line's indentation
//! whenever any exists, and a multi-line string comes out as one token
//! per line, all sharing the literal's kind.

use thiserror::Error;

use crate::token::{Token, TokenKind, TokenStream};

/// Errors that can occur during tokenization
#[derive(Error, Debug)]
pub enum LexError {
    #[error("Unterminated string literal starting on line {0}")]
    UnterminatedString(usize),

    #[error("Unterminated heredoc starting on line {0}")]
    UnterminatedHeredoc(usize),
}

/// Reserved words lexed as keywords rather than identifiers, so they
/// never look like call sites
const KEYWORDS: &[&str] = &[
    "array", "list", "isset", "unset", "empty", "echo", "print", "exit", "die", "if", "else",
    "elseif", "for", "foreach", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "use", "new", "class", "interface", "trait", "extends", "implements", "public",
    "private", "protected", "static", "abstract", "final", "const", "var", "try", "catch",
    "finally", "throw", "global", "namespace", "match", "fn", "as", "instanceof", "clone",
    "require", "require_once", "include", "include_once", "true", "false", "null", "and", "or",
    "xor", "yield",
];

/// Tokenize PHP source into a stream with resolved bracket links
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    let tokens = Lexer::new(source).run()?;
    Ok(TokenStream::new(tokens))
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.whitespace(),
                '\'' => self.quoted_string('\'', TokenKind::SingleQuotedString)?,
                '"' => self.quoted_string('"', TokenKind::DoubleQuotedString)?,
                '$' => self.variable(),
                '&' => self.single(TokenKind::Ampersand),
                '(' => self.single(TokenKind::OpenParen),
                ')' => self.single(TokenKind::CloseParen),
                '{' => self.single(TokenKind::OpenBrace),
                '}' => self.single(TokenKind::CloseBrace),
                '[' => self.single(TokenKind::OpenBracket),
                ']' => self.single(TokenKind::CloseBracket),
                ',' => self.single(TokenKind::Comma),
                ';' => self.single(TokenKind::Semicolon),
                '#' => self.line_comment(),
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment(),
                '<' if self.matches_ahead("<<<") => self.heredoc()?,
                '<' if self.matches_ahead("<?php") => self.open_tag(),
                c if c.is_ascii_digit() => self.number(),
                c if c.is_alphabetic() || c == '_' => self.word(),
                _ => self.symbol(),
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.char_at(self.pos + offset)
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    fn matches_ahead(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        let text: String = self.chars[start..self.pos].iter().collect();
        self.tokens.push(Token::new(kind, text, line));
    }

    fn single(&mut self, kind: TokenKind) {
        let start = self.pos;
        self.pos += 1;
        self.push(kind, start, self.line);
    }

    fn whitespace(&mut self) {
        let start = self.pos;
        let line = self.line;
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
        if self.peek() == Some('\n') {
            self.pos += 1;
            self.line += 1;
        }
        self.push(TokenKind::Whitespace, start, line);
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let line = self.line;
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                break;
            }
        }
        self.push(TokenKind::Comment, start, line);
    }

    fn block_comment(&mut self) {
        let mut start = self.pos;
        self.pos += 2;
        loop {
            match self.peek() {
                None => break,
                Some('\n') => {
                    self.pos += 1;
                    self.push(TokenKind::Comment, start, self.line);
                    self.line += 1;
                    start = self.pos;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        if self.pos > start {
            self.push(TokenKind::Comment, start, self.line);
        }
    }

    fn quoted_string(&mut self, quote: char, kind: TokenKind) -> Result<(), LexError> {
        let opening_line = self.line;
        let mut start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => return Err(LexError::UnterminatedString(opening_line)),
                Some('\\') => {
                    self.pos += 1;
                    // A backslash before a newline is a literal backslash;
                    // the newline still splits the token.
                    if !matches!(self.peek(), Some('\n') | None) {
                        self.pos += 1;
                    }
                }
                Some('\n') => {
                    self.pos += 1;
                    self.push(kind, start, self.line);
                    self.line += 1;
                    start = self.pos;
                }
                Some(c) => {
                    self.pos += 1;
                    if c == quote {
                        break;
                    }
                }
            }
        }
        self.push(kind, start, self.line);
        Ok(())
    }

    fn variable(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.push(TokenKind::Variable, start, self.line);
    }

    fn number(&mut self) {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '_') {
            self.pos += 1;
        }
        self.push(TokenKind::Number, start, self.line);
    }

    fn word(&mut self) {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let kind = if text.eq_ignore_ascii_case("function") {
            if self.closure_follows() {
                TokenKind::Closure
            } else {
                TokenKind::FunctionKeyword
            }
        } else if KEYWORDS.contains(&text.to_ascii_lowercase().as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.tokens.push(Token::new(kind, text, self.line));
    }

    /// Whether the `function` keyword just consumed introduces an
    /// anonymous function: next significant token is `(`, allowing a
    /// by-reference `&`
    fn closure_follows(&self) -> bool {
        let mut j = self.pos;
        while matches!(self.char_at(j), Some(' ' | '\t' | '\r' | '\n')) {
            j += 1;
        }
        if self.char_at(j) == Some('&') {
            j += 1;
            while matches!(self.char_at(j), Some(' ' | '\t' | '\r' | '\n')) {
                j += 1;
            }
        }
        self.char_at(j) == Some('(')
    }

    fn open_tag(&mut self) {
        let start = self.pos;
        self.pos += 5;
        self.push(TokenKind::Symbol, start, self.line);
    }

    fn symbol(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_symbol_char(c) {
                break;
            }
            if c == '/' && matches!(self.peek_at(1), Some('/') | Some('*')) {
                break;
            }
            if c == '<' && self.peek_at(1) == Some('<') && self.peek_at(2) == Some('<') {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            // Unrecognized character; consume it so the scan advances.
            self.pos += 1;
        }
        self.push(TokenKind::Symbol, start, self.line);
    }

    fn heredoc(&mut self) -> Result<(), LexError> {
        let opening_line = self.line;
        let start = self.pos;
        self.pos += 3;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.pos += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let label: String = self.chars[label_start..self.pos].iter().collect();
        if quote.is_some() && self.peek() == quote {
            self.pos += 1;
        }
        // Rest of the opener line, including its newline.
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == '\n' {
                break;
            }
        }
        self.push(TokenKind::Heredoc, start, opening_line);
        self.line += 1;

        loop {
            if self.peek().is_none() {
                return Err(LexError::UnterminatedHeredoc(opening_line));
            }
            if let Some(end) = self.terminator_end(&label) {
                let line_start = self.pos;
                self.pos = end;
                self.push(TokenKind::Heredoc, line_start, self.line);
                return Ok(());
            }
            let line_start = self.pos;
            let line = self.line;
            while let Some(c) = self.peek() {
                self.pos += 1;
                if c == '\n' {
                    self.line += 1;
                    break;
                }
            }
            self.push(TokenKind::Heredoc, line_start, line);
        }
    }

    /// If the current line is the heredoc terminator for `label`, the
    /// position just past the label
    fn terminator_end(&self, label: &str) -> Option<usize> {
        if label.is_empty() {
            return None;
        }
        let mut j = self.pos;
        while matches!(self.char_at(j), Some(' ' | '\t')) {
            j += 1;
        }
        for c in label.chars() {
            if self.char_at(j) != Some(c) {
                return None;
            }
            j += 1;
        }
        // The label must not continue as a longer identifier.
        match self.char_at(j) {
            Some(c) if c.is_alphanumeric() || c == '_' => None,
            _ => Some(j),
        }
    }
}

fn is_symbol_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' | '.' | '?' | ':' | '|' | '^' | '%' | '@'
            | '~' | '\\'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .tokens()
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_call() {
        let stream = tokenize("foo($a, 12);").unwrap();
        let kinds: Vec<_> = stream.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Variable,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::CloseParen,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(stream.matching_closer(1), Some(6));
    }

    #[test]
    fn test_newline_terminates_whitespace() {
        let stream = tokenize("foo(\n    1\n);").unwrap();
        let tokens = stream.tokens();
        assert_eq!(tokens[2].kind, TokenKind::Whitespace);
        assert_eq!(tokens[2].text, "\n");
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[3].text, "    ");
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[4].text, "1");
        assert_eq!(tokens[6].text, ")");
        assert_eq!(tokens[6].line, 3);
    }

    #[test]
    fn test_named_function_vs_closure() {
        let stream = tokenize("function foo() {} $f = function () {};").unwrap();
        let tokens = stream.tokens();
        assert_eq!(tokens[0].kind, TokenKind::FunctionKeyword);
        let closure = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Closure)
            .unwrap();
        assert_eq!(tokens[closure].text, "function");
        assert!(stream.scope_closer(closure).is_some());
    }

    #[test]
    fn test_by_reference_closure() {
        let stream = tokenize("$f = function &() { return $x; };").unwrap();
        assert!(stream
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Closure));
    }

    #[test]
    fn test_multi_line_string_splits_per_line() {
        let stream = tokenize("foo(\"one\ntwo\");").unwrap();
        let strings: Vec<_> = stream
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::DoubleQuotedString)
            .collect();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].text, "\"one\n");
        assert_eq!(strings[0].line, 1);
        assert_eq!(strings[1].text, "two\"");
        assert_eq!(strings[1].line, 2);
    }

    #[test]
    fn test_heredoc_tokens() {
        let stream = tokenize("$x = <<<EOT\nline one\nline two\nEOT;\n").unwrap();
        let heredocs: Vec<_> = stream
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Heredoc)
            .collect();
        assert_eq!(heredocs.len(), 4);
        assert_eq!(heredocs[0].text, "<<<EOT\n");
        assert_eq!(heredocs[3].text, "EOT");
        assert_eq!(heredocs[3].line, 4);
        // The terminator's semicolon lexes normally.
        assert!(stream
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Semicolon));
    }

    #[test]
    fn test_nowdoc_label() {
        let stream = tokenize("$x = <<<'EOT'\ntext\nEOT;\n").unwrap();
        let heredocs: Vec<_> = stream
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Heredoc)
            .collect();
        assert_eq!(heredocs.len(), 3);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            tokenize("foo(\"abc"),
            Err(LexError::UnterminatedString(1))
        ));
    }

    #[test]
    fn test_unterminated_heredoc() {
        assert!(matches!(
            tokenize("$x = <<<EOT\nno end\n"),
            Err(LexError::UnterminatedHeredoc(1))
        ));
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        let stream = tokenize("array(1, 2); foo(1);").unwrap();
        assert_eq!(stream.tokens()[0].kind, TokenKind::Keyword);
        assert!(stream
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Identifier && t.text == "foo"));
    }

    #[test]
    fn test_comments() {
        assert!(kinds("foo(); // trailing\n").contains(&TokenKind::Comment));
        let stream = tokenize("/* one\ntwo */ foo();").unwrap();
        let comments: Vec<_> = stream
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Comment)
            .collect();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].line, 1);
        assert_eq!(comments[1].line, 2);
    }

    #[test]
    fn test_open_tag_and_object_operator() {
        let stream = tokenize("<?php\n$obj->foo();").unwrap();
        assert_eq!(stream.tokens()[0].text, "<?php");
        assert_eq!(stream.tokens()[0].kind, TokenKind::Symbol);
        assert!(stream
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Symbol && t.text == "->"));
    }

    #[test]
    fn test_reference_marker() {
        let stream = tokenize("$a = &$b;").unwrap();
        assert!(stream
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Ampersand));
    }
}

//! Sniff: Multi-line function call signature
//!
//! Checks the layout of function calls that span multiple lines:
//! - every line between the parentheses is indented four spaces past the
//!   line on which the call starts
//! - the closing parenthesis sits on a line of its own, sharing it only
//!   with closing parentheses of enclosing calls
//!
//! Single-line calls are left alone, as are function definitions. Nested
//! calls and closure bodies are skipped wholesale; a nested call is
//! checked by its own evaluation at its own identifier.

use rsniff_core::{Diagnostic, TokenKind, TokenStream, EMPTY_TOKENS};

use crate::registry::Sniff;

/// Indent increment applied per call nesting level
const INDENT: usize = 4;

/// Check one candidate identifier for multi-line call layout violations
pub fn check_function_call_signature(tokens: &TokenStream, pos: usize) -> Vec<Diagnostic> {
    // Find the next non-empty token; a call needs a matched `(` here.
    let Some(open_bracket) = tokens.find_next_skipping(pos + 1, EMPTY_TOKENS) else {
        return Vec::new();
    };
    if tokens[open_bracket].kind != TokenKind::OpenParen {
        // Not a function call.
        return Vec::new();
    }
    let Some(close_bracket) = tokens.matching_closer(open_bracket) else {
        // Not a function call.
        return Vec::new();
    };

    // Find the previous non-empty token, also stepping over a
    // by-reference `&`. If it is the `function` keyword this is a
    // definition's parameter list, not a call.
    const SEARCH: &[TokenKind] = &[
        TokenKind::Whitespace,
        TokenKind::Comment,
        TokenKind::Ampersand,
    ];
    if pos > 0 {
        if let Some(previous) = tokens.find_prev_skipping(pos - 1, SEARCH) {
            if tokens[previous].kind == TokenKind::FunctionKeyword {
                return Vec::new();
            }
        }
    }

    if tokens[open_bracket].line == tokens[close_bracket].line {
        // Single-line calls are governed by a different convention.
        return Vec::new();
    }

    check_multi_line_call(tokens, pos, open_bracket, close_bracket)
}

fn check_multi_line_call(
    tokens: &TokenStream,
    stack_ptr: usize,
    open_bracket: usize,
    close_bracket: usize,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    // Work out how far the call itself is indented, so we know how far
    // to indent the arguments.
    let function_indent = function_indent(tokens, stack_ptr);

    // Each line between the parentheses should be indented four spaces.
    let mut last_line = tokens[open_bracket].line;
    let mut i = open_bracket + 1;
    while i < close_bracket {
        // Skip nested call spans; they get their own evaluation.
        if tokens[i].kind == TokenKind::OpenParen {
            if let Some(closer) = tokens.matching_closer(i) {
                i = closer;
                last_line = tokens[i].line;
                i += 1;
                continue;
            }
        }

        if tokens[i].line != last_line {
            last_line = tokens[i].line;

            // A continuation line of the same string or heredoc literal
            // keeps the literal's own layout.
            let kind = tokens[i].kind;
            let continues_literal =
                kind.is_string_literal() && i > 0 && tokens[i - 1].kind == kind;

            if !continues_literal {
                let expected_indent = if tokens[i].line == tokens[close_bracket].line {
                    // The closing parenthesis lines up with the call itself.
                    function_indent
                } else {
                    function_indent + INDENT
                };

                let found_indent = if kind == TokenKind::Whitespace {
                    tokens[i].text.len()
                } else {
                    0
                };

                if expected_indent != found_indent {
                    diagnostics.push(
                        Diagnostic::error(
                            "Indent",
                            format!(
                                "Multi-line function call not indented correctly; \
                                 expected {} spaces but found {}",
                                expected_indent, found_indent
                            ),
                            i,
                            tokens[i].line,
                        )
                        .with_data(vec![expected_indent.to_string(), found_indent.to_string()]),
                    );
                }
            }
        }

        // Skip the rest of a closure; its body follows statement
        // indentation rules, not call argument rules.
        if tokens[i].kind == TokenKind::Closure {
            if let Some(closer) = tokens.scope_closer(i) {
                i = closer;
                last_line = tokens[i].line;
            }
        }

        i += 1;
    }

    // Look backward from the closing parenthesis; anything on its line
    // other than closing parentheses of enclosing calls has to move.
    let close_line = tokens[close_bracket].line;
    let mut prev = tokens.find_prev_skipping(close_bracket - 1, &[TokenKind::Whitespace]);
    while let Some(p) = prev {
        if tokens[p].line != close_line {
            break;
        }
        if tokens[p].kind != TokenKind::CloseParen {
            diagnostics.push(Diagnostic::error(
                "CloseBracketLine",
                "All closing parentheses of a multi-line function call must be on a line by itself",
                close_bracket,
                close_line,
            ));
            break;
        }
        if p == 0 {
            break;
        }
        prev = tokens.find_prev_skipping(p - 1, &[TokenKind::Whitespace]);
    }

    diagnostics
}

/// Leading whitespace width of the line the call starts on
fn function_indent(tokens: &TokenStream, stack_ptr: usize) -> usize {
    let line = tokens[stack_ptr].line;
    let mut first = stack_ptr;
    while first > 0 && tokens[first - 1].line == line {
        first -= 1;
    }
    if tokens[first].kind == TokenKind::Whitespace {
        tokens[first].text.len()
    } else {
        0
    }
}

pub struct FunctionCallSignatureSniff;

impl Sniff for FunctionCallSignatureSniff {
    fn code(&self) -> &'static str {
        "Functions.FunctionCallSignature"
    }

    fn description(&self) -> &'static str {
        "Multi-line function calls must indent each argument line four spaces \
         and close on their own line"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Identifier]
    }

    fn process(&self, tokens: &TokenStream, pos: usize) -> Vec<Diagnostic> {
        check_function_call_signature(tokens, pos)
    }
}

//! rsniff-core: Core abstractions for PHP token sniffing
//!
//! This crate provides:
//! - `Token`, `TokenKind`, `TokenStream`: the token model sniffs scan,
//!   with resolved bracket and closure-scope links
//! - `Diagnostic`, `Severity`: violation records emitted by sniffs
//! - `tokenize()`: a reference PHP tokenizer for tests and batch drivers

mod diagnostic;
pub mod lexer;
mod token;

pub use diagnostic::{Diagnostic, Severity};
pub use lexer::{tokenize, LexError};
pub use token::{Token, TokenKind, TokenStream, EMPTY_TOKENS};

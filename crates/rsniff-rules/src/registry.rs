//! Sniff trait and registry for rsniff formatting checks

use rsniff_core::{Diagnostic, TokenKind, TokenStream};

/// A formatting check driven by individual tokens of interest
pub trait Sniff: Send + Sync {
    /// Dotted identifier for this sniff (e.g. "Functions.FunctionCallSignature")
    fn code(&self) -> &'static str;

    /// A short description of what this sniff verifies
    fn description(&self) -> &'static str;

    /// Token kinds this sniff wants to be invoked for
    fn register(&self) -> &'static [TokenKind];

    /// Evaluate the sniff at one candidate token position
    ///
    /// Pure: every non-applicable candidate returns an empty list.
    fn process(&self, tokens: &TokenStream, pos: usize) -> Vec<Diagnostic>;
}

/// Registry of all available sniffs
pub struct SniffRegistry {
    sniffs: Vec<Box<dyn Sniff>>,
}

impl SniffRegistry {
    /// Create a new registry with all built-in sniffs
    pub fn new() -> Self {
        let mut registry = Self { sniffs: Vec::new() };

        registry.register(Box::new(
            super::function_call_signature::FunctionCallSignatureSniff,
        ));

        registry
    }

    /// Register a new sniff
    pub fn register(&mut self, sniff: Box<dyn Sniff>) {
        self.sniffs.push(sniff);
    }

    /// Get all sniff codes
    pub fn all_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.code()).collect()
    }

    /// Get all sniffs with their descriptions (for listing)
    pub fn list_sniffs(&self) -> Vec<(&'static str, &'static str)> {
        self.sniffs
            .iter()
            .map(|s| (s.code(), s.description()))
            .collect()
    }

    /// Run every sniff over a token stream
    ///
    /// Walks the stream once and invokes each sniff at every token whose
    /// kind it registered for, collecting diagnostics in emission order.
    pub fn run(&self, tokens: &TokenStream) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for pos in 0..tokens.len() {
            let kind = tokens[pos].kind;
            for sniff in &self.sniffs {
                if sniff.register().contains(&kind) {
                    diagnostics.extend(sniff.process(tokens, pos));
                }
            }
        }
        diagnostics
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new()
    }
}

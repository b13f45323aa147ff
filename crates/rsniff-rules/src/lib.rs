//! rsniff-rules: Formatting sniff implementations
//!
//! Available sniffs:
//! - function_call_signature: multi-line function calls must indent each
//!   argument line four spaces past the call and close on their own line

pub mod function_call_signature;
pub mod registry;

pub use function_call_signature::{check_function_call_signature, FunctionCallSignatureSniff};
pub use registry::{Sniff, SniffRegistry};

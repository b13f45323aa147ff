//! Diagnostic types for sniff results

use serde::{Deserialize, Serialize};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be reviewed
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single violation found by a sniff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Short code identifying the violation within its sniff (e.g. "Indent")
    pub code: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Token index the diagnostic points at
    pub position: usize,
    /// Source line (1-based)
    pub line: usize,
    /// Raw values interpolated into the message, kept for hosts that
    /// render reports in their own format
    pub data: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        position: usize,
        line: usize,
    ) -> Self {
        Self {
            code: code.into(),
            severity: Severity::Error,
            message: message.into(),
            position,
            line,
            data: Vec::new(),
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        position: usize,
        line: usize,
    ) -> Self {
        Self {
            code: code.into(),
            severity: Severity::Warning,
            message: message.into(),
            position,
            line,
            data: Vec::new(),
        }
    }

    /// Attach the raw message arguments
    pub fn with_data(mut self, data: Vec<String>) -> Self {
        self.data = data;
        self
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics for the front-end core.
//!
//! Errors carry source locations ([`Span`]) for precise reporting and
//! integrate with [`miette`] for rendering. The lexer and binder never fail:
//! malformed input produces best-effort tokens or `Invalid` bound nodes, and
//! the problem is recorded in a shared [`Diagnostics`] sink.
//!
//! Diagnostic ordering within a sink matches traversal order, which is a
//! stable property of the input.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use std::cell::RefCell;

use ecow::EcoString;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::source_analysis::Span;

/// The code and payload of one diagnostic.
///
/// Each variant carries the arguments its message needs, so rendering is a
/// pure `Display` and callers can still match on the code structurally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagCode {
    // === Lexer ===
    /// A NUL byte appeared in the middle of the source text.
    #[error("embedded NUL character in source text")]
    EmbeddedNull,

    /// A `/*` block comment ran to the end of the input.
    #[error("unterminated block comment")]
    UnterminatedBlockComment,

    /// A string literal hit a newline or end of input before its closing quote.
    #[error("expected closing quote for string literal")]
    ExpectedClosingQuote,

    /// An unrecognized escape sequence in a string literal.
    #[error("unknown character escape '\\{0}'")]
    UnknownEscapeCode(char),

    /// An octal escape sequence whose value does not fit in a byte.
    #[error("octal escape code does not fit in a byte")]
    OctalEscapeCodeTooBig,

    /// A `\x` escape with no hex digits.
    #[error("invalid hexadecimal escape code")]
    InvalidHexEscapeCode,

    /// A vector literal with no digits after the base specifier.
    #[error("expected digits after base specifier")]
    ExpectedVectorDigits,

    /// A digit that is not legal in the literal's base.
    #[error("digit '{0}' is not valid in this base")]
    BadBaseDigitInLiteral(char),

    /// Vector literal digits do not fit in the declared size.
    #[error("literal value does not fit in {0} bits")]
    VectorLiteralOverflow(u32),

    /// A vector literal with a zero or unrepresentable size.
    #[error("size of vector literal must be a positive integer")]
    InvalidVectorSize,

    /// An exponent marker with no digits after it.
    #[error("expected digits after exponent")]
    MissingExponentDigits,

    /// A real literal whose magnitude exceeds the double range.
    #[error("real literal is too large for a 64-bit floating point value")]
    RealLiteralOverflow,

    /// A suffix that looks like a time unit but is not one.
    #[error("invalid time unit '{0}'")]
    BadTimeUnit(EcoString),

    /// Include-filename lexing found no `<...>` or `"..."` filename.
    #[error("expected an include file name")]
    ExpectedIncludeFileName,

    // === Binder ===
    /// A name that does not resolve in the current scope chain.
    #[error("use of undeclared identifier '{0}'")]
    UndeclaredIdentifier(EcoString),

    /// A call with more actual arguments than the subroutine has formals.
    #[error("too many arguments to subroutine call: expected {expected}, got {actual}")]
    TooManyArguments {
        /// Number of formal arguments declared.
        expected: usize,
        /// Number of actual arguments supplied.
        actual: usize,
    },

    /// A unary operator applied to an operand type it does not accept.
    #[error("invalid operand type '{0}' for unary operator")]
    BadUnaryExpression(EcoString),

    /// A binary operator applied to operand types it does not accept.
    #[error("invalid operand types '{0}' and '{1}' for binary operator")]
    BadBinaryExpression(EcoString, EcoString),

    /// Assignment between incompatible types.
    #[error("value of type '{0}' cannot be assigned to target of type '{1}'")]
    BadAssignment(EcoString, EcoString),

    /// Assignment that would require an explicit cast.
    #[error("no implicit conversion from '{0}' to '{1}'; explicit cast required")]
    NoImplicitConversion(EcoString, EcoString),

    /// A `return` statement outside any subroutine.
    #[error("return statement is only valid inside a subroutine")]
    ReturnNotInSubroutine,

    /// An expression that must be constant at bind time but is not.
    #[error("expression is not constant")]
    ExpressionNotConstant,

    /// A range select whose bounds are reversed or empty for the vector's
    /// declared direction.
    #[error("invalid range select bounds")]
    InvalidRangeSelect,
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that marks the compilation unsuccessful.
    Error,
    /// A warning; the recovered result is still usable.
    Warning,
}

/// A diagnostic with its code, severity, and source location.
///
/// The span already knows its file, so a diagnostic is fully located on its
/// own.
#[derive(Debug, Clone, PartialEq, Error, MietteDiagnostic)]
#[error("{code}")]
#[diagnostic()]
pub struct Diagnostic {
    /// The code of this diagnostic, including message arguments.
    #[source]
    pub code: DiagCode,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// The source location of the problem.
    #[label("here")]
    pub span: Span,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(code: DiagCode, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            span,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagCode, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            span,
        }
    }
}

/// An append-only sink of diagnostics.
///
/// The sink is shared by reference between the lexer and binder of one
/// compilation, so it uses interior mutability; it is still single-threaded
/// (`!Sync`), matching the rest of the core.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error diagnostic.
    pub fn add_error(&self, code: DiagCode, span: Span) {
        self.entries.borrow_mut().push(Diagnostic::error(code, span));
    }

    /// Appends a warning diagnostic.
    pub fn add_warning(&self, code: DiagCode, span: Span) {
        self.entries
            .borrow_mut()
            .push(Diagnostic::warning(code, span));
    }

    /// Number of diagnostics recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns true if at least one error-severity diagnostic was recorded.
    ///
    /// A sink with errors marks the compilation unsuccessful; consumers may
    /// still traverse the bound tree safely.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// A snapshot of the recorded diagnostics, in traversal order.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Takes ownership of the diagnostics, leaving the sink empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::FileId;

    fn span(start: u32, end: u32) -> Span {
        Span::new(FileId::default(), start, end)
    }

    #[test]
    fn diagnostic_display() {
        let diag = Diagnostic::error(DiagCode::UndeclaredIdentifier("foo".into()), span(0, 3));
        assert_eq!(diag.to_string(), "use of undeclared identifier 'foo'");

        let diag = Diagnostic::error(
            DiagCode::TooManyArguments {
                expected: 2,
                actual: 3,
            },
            span(0, 1),
        );
        assert_eq!(
            diag.to_string(),
            "too many arguments to subroutine call: expected 2, got 3"
        );
    }

    #[test]
    fn sink_accumulates_in_order() {
        let sink = Diagnostics::new();
        assert!(sink.is_empty());
        assert!(!sink.has_errors());

        sink.add_error(DiagCode::EmbeddedNull, span(4, 5));
        sink.add_error(DiagCode::UnterminatedBlockComment, span(7, 9));

        assert_eq!(sink.len(), 2);
        assert!(sink.has_errors());
        let entries = sink.entries();
        assert_eq!(entries[0].code, DiagCode::EmbeddedNull);
        assert_eq!(entries[1].code, DiagCode::UnterminatedBlockComment);
    }

    #[test]
    fn warnings_do_not_mark_the_compilation_failed() {
        let sink = Diagnostics::new();
        sink.add_warning(DiagCode::VectorLiteralOverflow(4), span(0, 5));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.entries()[0].severity, Severity::Warning);
        assert!(!sink.has_errors());

        sink.add_error(DiagCode::EmbeddedNull, span(6, 7));
        assert!(sink.has_errors());
    }

    #[test]
    fn sink_take_drains() {
        let sink = Diagnostics::new();
        sink.add_error(DiagCode::EmbeddedNull, span(0, 1));
        let taken = sink.take();
        assert_eq!(taken.len(), 1);
        assert!(sink.is_empty());
    }
}

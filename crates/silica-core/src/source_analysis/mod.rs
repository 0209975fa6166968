// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis infrastructure.
//!
//! The [`Lexer`] converts SystemVerilog source text into a stream of
//! [`Token`]s. Each token carries its source location via [`Span`], its
//! kind-specific payload ([`TokenKind`]), and the [`Trivia`] that precedes
//! it, so the token stream reconstructs the input exactly.
//!
//! ```
//! use silica_core::source_analysis::{lex, TokenKind};
//!
//! let tokens = lex("a + 1");
//! assert_eq!(tokens.len(), 3);
//! ```
//!
//! # Error Handling
//!
//! The lexer uses error recovery: malformed input is diagnosed into the
//! shared [`Diagnostics`](crate::diagnostics::Diagnostics) sink and lexing
//! continues with a best-effort token. It never fails and never panics.

mod keywords;
mod lexer;
mod source;
mod token;

// Property-based tests for the lexer.
#[cfg(test)]
mod lexer_property_tests;

pub use keywords::{DirectiveKind, Keyword};
pub use lexer::{lex, lex_with_eof, Lexer, LexerMode};
pub use source::{FileId, SourceText, Span};
pub use token::{IdentifierKind, Token, TokenKind, Trivia};

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! SystemVerilog front-end core.
//!
//! This crate contains the semantic core of a SystemVerilog compiler:
//! - Lexical analysis (trivia-preserving tokenization, four-state literals)
//! - Numeric engine (arbitrary-width four-state integers)
//! - Symbols, scopes, and an interned type system
//! - Binding (syntax tree → typed bound tree with context-determined sizing)
//!
//! Parsing, preprocessing, file management, and elaboration live in
//! separate crates; this one takes pre-loaded source text and a parsed
//! syntax tree and produces tokens, diagnostics, and bound trees.

pub mod diagnostics;
pub mod numeric;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod syntax;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::diagnostics::{DiagCode, Diagnostic, Diagnostics};
    pub use crate::numeric::{LogicBit, SVInt, TimeUnit};
    pub use crate::semantic_analysis::{
        Binder, Compilation, Expression, Scope, Statement, Symbol, SymbolKind, TypeSymbol,
    };
    pub use crate::source_analysis::{
        FileId, Lexer, LexerMode, SourceText, Span, Token, TokenKind, Trivia,
    };
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis: symbols, scopes, types, and the binder.
//!
//! The [`Binder`] walks an untyped syntax tree, resolves names against a
//! [`Scope`], determines the type of every subexpression using the
//! SystemVerilog self-determined / context-determined sizing rules, and
//! produces a typed bound tree.
//!
//! A [`Compilation`] ties one bind run together: it owns the interned
//! [`Types`] and the [`Diagnostics`] sink, and everything allocated through
//! it lives until it drops.

mod binder;
mod bound;
mod symbol;
mod types;

pub use binder::Binder;
pub use bound::{BoundSelector, Expression, Statement};
pub use symbol::{LookupHint, LookupResult, Scope, Symbol, SymbolKind};
pub use types::{TypeSymbol, Types};

use std::rc::Rc;

use crate::diagnostics::{DiagCode, Diagnostics};
use crate::source_analysis::Span;

/// Owns the state shared by one compilation: interned types and the
/// diagnostics sink.
#[derive(Debug, Default)]
pub struct Compilation {
    types: Types,
    diagnostics: Diagnostics,
}

impl Compilation {
    /// Creates an empty compilation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The type factory.
    #[must_use]
    pub fn types(&self) -> &Types {
        &self.types
    }

    /// The diagnostics sink.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Records an error diagnostic at `span`.
    pub fn add_error(&self, code: DiagCode, span: Span) {
        self.diagnostics.add_error(code, span);
    }

    /// An integral type with the default descending dimension.
    #[must_use]
    pub fn get_type(&self, width: u32, signed: bool, four_state: bool) -> Rc<TypeSymbol> {
        self.types.get_type(width, signed, four_state)
    }

    /// The 32-bit signed two-state `int` type.
    #[must_use]
    pub fn get_int_type(&self) -> Rc<TypeSymbol> {
        self.types.get_int_type()
    }

    /// The 1-bit unsigned four-state `logic` type.
    #[must_use]
    pub fn get_logic_type(&self) -> Rc<TypeSymbol> {
        self.types.get_logic_type()
    }

    /// The `real` type.
    #[must_use]
    pub fn get_real_type(&self) -> Rc<TypeSymbol> {
        self.types.get_real_type()
    }

    /// The `shortreal` type.
    #[must_use]
    pub fn get_short_real_type(&self) -> Rc<TypeSymbol> {
        self.types.get_short_real_type()
    }

    /// The error type.
    #[must_use]
    pub fn get_error_type(&self) -> Rc<TypeSymbol> {
        self.types.get_error_type()
    }
}

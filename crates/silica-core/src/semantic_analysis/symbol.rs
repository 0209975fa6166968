// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Symbols and lexical scopes.
//!
//! Named entities (variables, parameters, subroutines, packages, ...) share
//! a common header and carry kind-specific payload. Scope-owning symbols
//! (root, package, module, subroutine) hold an [`Rc<Scope>`]; scopes link
//! back to their parent scope and owner symbol through weak references, so
//! the whole arrangement stays cycle-free and drops with the compilation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ecow::EcoString;

use super::types::TypeSymbol;
use crate::numeric::SVInt;
use crate::source_analysis::Span;

/// Kind-specific payload of a symbol.
#[derive(Debug)]
pub enum SymbolKind {
    /// The root of the symbol tree. Packages hang directly off its scope.
    Root,
    /// A package.
    Package,
    /// A module (scope container only in this core).
    Module,
    /// A subroutine with ordered formal arguments and a return type.
    Subroutine {
        /// Formal arguments, in declaration order. Each is a
        /// [`SymbolKind::FormalArgument`] symbol.
        arguments: Vec<Rc<Symbol>>,
        /// Declared return type.
        return_type: Rc<TypeSymbol>,
    },
    /// A variable with its declared type.
    Variable {
        /// Declared type.
        ty: Rc<TypeSymbol>,
    },
    /// A subroutine formal argument with its declared type.
    FormalArgument {
        /// Declared type.
        ty: Rc<TypeSymbol>,
    },
    /// An elaboration-time constant with its type and value.
    Parameter {
        /// Declared type.
        ty: Rc<TypeSymbol>,
        /// The parameter's constant value.
        value: SVInt,
    },
}

impl SymbolKind {
    /// A short name for diagnostics and debugging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Package => "package",
            Self::Module => "module",
            Self::Subroutine { .. } => "subroutine",
            Self::Variable { .. } => "variable",
            Self::FormalArgument { .. } => "formal argument",
            Self::Parameter { .. } => "parameter",
        }
    }
}

/// A named entity.
#[derive(Debug)]
pub struct Symbol {
    /// The symbol's name.
    pub name: EcoString,
    /// Source location of the declaration.
    pub span: Span,
    /// Kind-specific payload.
    pub kind: SymbolKind,
    /// The scope this symbol owns, for scope-owning kinds.
    scope: Option<Rc<Scope>>,
    /// The scope this symbol is a member of.
    parent: RefCell<Weak<Scope>>,
}

impl Symbol {
    /// Creates a non-scope-owning symbol (variable, formal, parameter).
    #[must_use]
    pub fn new(name: impl Into<EcoString>, span: Span, kind: SymbolKind) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            span,
            kind,
            scope: None,
            parent: RefCell::new(Weak::new()),
        })
    }

    /// Creates the root symbol with a fresh top-level scope.
    #[must_use]
    pub fn new_root() -> Rc<Self> {
        Self::new_scoped("$root", Span::default(), SymbolKind::Root, None)
    }

    /// Creates a scope-owning symbol whose scope is a child of `parent`.
    ///
    /// The new symbol is not added to any scope; use [`Scope::add_member`].
    #[must_use]
    pub fn new_scoped(
        name: impl Into<EcoString>,
        span: Span,
        kind: SymbolKind,
        parent: Option<&Rc<Scope>>,
    ) -> Rc<Self> {
        let scope = Rc::new(Scope {
            parent: parent.map_or_else(Weak::new, Rc::downgrade),
            owner: RefCell::new(Weak::new()),
            members: RefCell::new(Vec::new()),
            index: RefCell::new(HashMap::new()),
        });
        let symbol = Rc::new(Self {
            name: name.into(),
            span,
            kind,
            scope: Some(Rc::clone(&scope)),
            parent: RefCell::new(Weak::new()),
        });
        *scope.owner.borrow_mut() = Rc::downgrade(&symbol);
        symbol
    }

    /// The scope this symbol owns, for scope-owning kinds.
    #[must_use]
    pub fn scope(&self) -> Option<&Rc<Scope>> {
        self.scope.as_ref()
    }

    /// The scope this symbol is a member of, if still alive.
    #[must_use]
    pub fn parent_scope(&self) -> Option<Rc<Scope>> {
        self.parent.borrow().upgrade()
    }

    /// The declared type of a value symbol (variable, formal, parameter).
    #[must_use]
    pub fn value_type(&self) -> Option<&Rc<TypeSymbol>> {
        match &self.kind {
            SymbolKind::Variable { ty }
            | SymbolKind::FormalArgument { ty }
            | SymbolKind::Parameter { ty, .. } => Some(ty),
            _ => None,
        }
    }
}

/// Advisory hint for name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupHint {
    /// Any symbol kind.
    #[default]
    Any,
    /// The name is used as a callee: only subroutines match, so a local
    /// variable cannot shadow a callable further out.
    Callable,
}

/// Result of a scope lookup.
#[derive(Debug, Clone)]
pub enum LookupResult {
    /// The name resolved to a symbol.
    Found(Rc<Symbol>),
    /// The name did not resolve anywhere in the scope chain.
    NotFound,
}

impl LookupResult {
    /// The found symbol, if any.
    #[must_use]
    pub fn found_symbol(&self) -> Option<&Rc<Symbol>> {
        match self {
            Self::Found(symbol) => Some(symbol),
            Self::NotFound => None,
        }
    }
}

/// A lexical scope: ordered member symbols with by-name lookup and a parent
/// link.
#[derive(Debug)]
pub struct Scope {
    /// The enclosing scope.
    parent: Weak<Scope>,
    /// The symbol this scope belongs to.
    owner: RefCell<Weak<Symbol>>,
    /// Members in declaration order.
    members: RefCell<Vec<Rc<Symbol>>>,
    /// Name index into `members`. Later declarations shadow earlier ones.
    index: RefCell<HashMap<EcoString, usize>>,
}

impl Scope {
    /// Adds a member symbol to this scope, recording the back reference.
    pub fn add_member(self: &Rc<Self>, symbol: Rc<Symbol>) {
        *symbol.parent.borrow_mut() = Rc::downgrade(self);
        let mut members = self.members.borrow_mut();
        self.index
            .borrow_mut()
            .insert(symbol.name.clone(), members.len());
        members.push(symbol);
    }

    /// The members of this scope, in declaration order.
    #[must_use]
    pub fn members(&self) -> Vec<Rc<Symbol>> {
        self.members.borrow().clone()
    }

    /// The symbol owning this scope, if still alive.
    #[must_use]
    pub fn owner(&self) -> Option<Rc<Symbol>> {
        self.owner.borrow().upgrade()
    }

    /// The enclosing scope, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<Scope>> {
        self.parent.upgrade()
    }

    /// Looks up a name, searching from this scope outward.
    #[must_use]
    pub fn lookup(&self, name: &str, hint: LookupHint) -> LookupResult {
        if let Some(symbol) = self.local_lookup(name, hint) {
            return LookupResult::Found(symbol);
        }
        match self.parent() {
            Some(parent) => parent.lookup(name, hint),
            None => LookupResult::NotFound,
        }
    }

    /// Looks up a name in this scope only.
    fn local_lookup(&self, name: &str, hint: LookupHint) -> Option<Rc<Symbol>> {
        let members = self.members.borrow();
        let symbol = self
            .index
            .borrow()
            .get(name)
            .map(|&slot| Rc::clone(&members[slot]))?;
        match hint {
            LookupHint::Any => Some(symbol),
            LookupHint::Callable => {
                matches!(symbol.kind, SymbolKind::Subroutine { .. }).then_some(symbol)
            }
        }
    }

    /// Walks owner symbols outward looking for the nearest subroutine.
    #[must_use]
    pub fn find_ancestor_subroutine(&self) -> Option<Rc<Symbol>> {
        if let Some(owner) = self.owner() {
            if matches!(owner.kind, SymbolKind::Subroutine { .. }) {
                return Some(owner);
            }
        }
        self.parent()?.find_ancestor_subroutine()
    }

    /// The topmost scope of the chain (the root symbol's scope).
    #[must_use]
    pub fn root(self: &Rc<Self>) -> Rc<Scope> {
        match self.parent() {
            Some(parent) => parent.root(),
            None => Rc::clone(self),
        }
    }

    /// Finds a package by name among this scope's members. Meaningful on
    /// the root scope.
    #[must_use]
    pub fn find_package(&self, name: &str) -> Option<Rc<Symbol>> {
        self.local_lookup(name, LookupHint::Any)
            .filter(|symbol| matches!(symbol.kind, SymbolKind::Package))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::Types;

    fn span() -> Span {
        Span::default()
    }

    fn span_at(start: u32, end: u32) -> Span {
        Span::new(crate::source_analysis::FileId::default(), start, end)
    }

    #[test]
    fn lookup_finds_member() {
        let types = Types::new();
        let root = Symbol::new_root();
        let scope = root.scope().unwrap();
        scope.add_member(Symbol::new(
            "x",
            span(),
            SymbolKind::Variable {
                ty: types.get_int_type(),
            },
        ));

        let result = scope.lookup("x", LookupHint::Any);
        let symbol = result.found_symbol().unwrap();
        assert_eq!(symbol.name, "x");
        assert!(matches!(
            scope.lookup("y", LookupHint::Any),
            LookupResult::NotFound
        ));
    }

    #[test]
    fn lookup_searches_outward_and_shadows() {
        let types = Types::new();
        let root = Symbol::new_root();
        let root_scope = root.scope().unwrap();
        root_scope.add_member(Symbol::new(
            "x",
            span_at(0, 1),
            SymbolKind::Variable {
                ty: types.get_type(8, false, true),
            },
        ));

        let module = Symbol::new_scoped("m", span(), SymbolKind::Module, Some(root_scope));
        let module_scope = module.scope().unwrap();
        root_scope.add_member(Rc::clone(&module));
        module_scope.add_member(Symbol::new(
            "x",
            span_at(10, 11),
            SymbolKind::Variable {
                ty: types.get_type(16, false, true),
            },
        ));

        // Inner definition shadows the outer one.
        let found = module_scope.lookup("x", LookupHint::Any);
        assert_eq!(found.found_symbol().unwrap().span, span_at(10, 11));

        // Outer names remain visible.
        assert!(module_scope
            .lookup("m", LookupHint::Any)
            .found_symbol()
            .is_some());
    }

    #[test]
    fn callable_hint_skips_variables() {
        let types = Types::new();
        let root = Symbol::new_root();
        let root_scope = root.scope().unwrap();

        let func = Symbol::new_scoped(
            "f",
            span(),
            SymbolKind::Subroutine {
                arguments: Vec::new(),
                return_type: types.get_int_type(),
            },
            Some(root_scope),
        );
        root_scope.add_member(Rc::clone(&func));

        let module = Symbol::new_scoped("m", span(), SymbolKind::Module, Some(root_scope));
        root_scope.add_member(Rc::clone(&module));
        let module_scope = module.scope().unwrap();
        // A variable shadowing the subroutine's name.
        module_scope.add_member(Symbol::new(
            "f",
            span(),
            SymbolKind::Variable {
                ty: types.get_int_type(),
            },
        ));

        let plain = module_scope.lookup("f", LookupHint::Any);
        assert!(matches!(
            plain.found_symbol().unwrap().kind,
            SymbolKind::Variable { .. }
        ));

        let callable = module_scope.lookup("f", LookupHint::Callable);
        assert!(matches!(
            callable.found_symbol().unwrap().kind,
            SymbolKind::Subroutine { .. }
        ));
    }

    #[test]
    fn find_ancestor_subroutine() {
        let types = Types::new();
        let root = Symbol::new_root();
        let root_scope = root.scope().unwrap();
        let func = Symbol::new_scoped(
            "f",
            span(),
            SymbolKind::Subroutine {
                arguments: Vec::new(),
                return_type: types.get_int_type(),
            },
            Some(root_scope),
        );
        root_scope.add_member(Rc::clone(&func));

        let func_scope = func.scope().unwrap();
        assert_eq!(
            func_scope.find_ancestor_subroutine().unwrap().name,
            func.name
        );
        assert!(root_scope.find_ancestor_subroutine().is_none());
    }

    #[test]
    fn find_package_from_root() {
        let root = Symbol::new_root();
        let root_scope = root.scope().unwrap();
        let package = Symbol::new_scoped("p", span(), SymbolKind::Package, Some(root_scope));
        root_scope.add_member(Rc::clone(&package));

        let module = Symbol::new_scoped("m", span(), SymbolKind::Module, Some(root_scope));
        root_scope.add_member(Rc::clone(&module));

        let from_inner = module.scope().unwrap().root();
        assert!(from_inner.find_package("p").is_some());
        assert!(from_inner.find_package("m").is_none());
        assert!(from_inner.find_package("q").is_none());
    }
}

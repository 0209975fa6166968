// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The type system: integral vector types, reals, and the error type.
//!
//! Types are interned: the [`Types`] factory hands out `Rc`s and equal
//! descriptors always return the same allocation, so `Rc::ptr_eq` is type
//! identity. Interned types live as long as the owning [`Compilation`].
//!
//! [`Compilation`]: super::Compilation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A semantic type.
///
/// Real and shortreal carry fixed widths (64 and 32) so the binary-operator
/// sizing rules can treat every operand uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    /// A packed integral type: a vector of two- or four-state bits.
    Integral {
        /// Total bit width. Always at least 1.
        width: u32,
        /// Whether arithmetic on this type is signed.
        signed: bool,
        /// Whether bits may take `X`/`Z` values.
        four_state: bool,
        /// Declared low index of each packed dimension. The default vector
        /// `[w-1:0]` records 0; ascending dimensions record the negated
        /// declared low index, so `lower_bounds[0] >= 0` means descending.
        lower_bounds: Vec<i32>,
    },
    /// The 64-bit real type.
    Real,
    /// The 32-bit shortreal type.
    ShortReal,
    /// The error type, carried by invalid bound nodes.
    Error,
}

impl TypeSymbol {
    /// Bit width of this type. The error type reports 0 so it never wins a
    /// sizing decision.
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Integral { width, .. } => *width,
            Self::Real => 64,
            Self::ShortReal => 32,
            Self::Error => 0,
        }
    }

    /// Whether arithmetic on this type is signed. Reals are always signed.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        match self {
            Self::Integral { signed, .. } => *signed,
            Self::Real | Self::ShortReal => true,
            Self::Error => false,
        }
    }

    /// Whether bits of this type may take `X`/`Z` values.
    #[must_use]
    pub fn is_four_state(&self) -> bool {
        match self {
            Self::Integral { four_state, .. } => *four_state,
            Self::Real | Self::ShortReal | Self::Error => false,
        }
    }

    /// Returns true for integral types.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(self, Self::Integral { .. })
    }

    /// Returns true for real and shortreal.
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real | Self::ShortReal)
    }

    /// Returns true for the error type.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// The declared lower bounds of an integral type's packed dimensions.
    #[must_use]
    pub fn lower_bounds(&self) -> &[i32] {
        match self {
            Self::Integral { lower_bounds, .. } => lower_bounds,
            _ => &[],
        }
    }

    /// Whether the first packed dimension is declared descending (`[7:0]`).
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.lower_bounds().first().is_none_or(|&low| low >= 0)
    }

    /// Whether a value of `source` type can be assigned to this type with
    /// an implicit conversion. Integral and real types convert freely; the
    /// error type converts to nothing.
    #[must_use]
    pub fn is_assignment_compatible(&self, source: &Self) -> bool {
        !self.is_error() && !source.is_error()
    }

    /// Whether a value of `source` type can be cast to this type
    /// explicitly.
    #[must_use]
    pub fn is_cast_compatible(&self, source: &Self) -> bool {
        self.is_assignment_compatible(source)
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integral {
                width,
                signed,
                four_state,
                ..
            } => {
                // Render the common named types by their keyword.
                match (width, signed, four_state) {
                    (32, true, false) => write!(f, "int"),
                    (32, true, true) => write!(f, "integer"),
                    (1, false, true) => write!(f, "logic"),
                    (1, false, false) => write!(f, "bit"),
                    _ => {
                        let base = if *four_state { "logic" } else { "bit" };
                        write!(f, "{base}")?;
                        if *signed {
                            write!(f, " signed")?;
                        }
                        write!(f, "[{}:0]", width - 1)
                    }
                }
            }
            Self::Real => write!(f, "real"),
            Self::ShortReal => write!(f, "shortreal"),
            Self::Error => write!(f, "<error>"),
        }
    }
}

/// Interning key for integral types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IntegralKey {
    width: u32,
    signed: bool,
    four_state: bool,
    lower_bounds: Vec<i32>,
}

/// The type factory. Owns every interned type of one compilation.
#[derive(Debug)]
pub struct Types {
    integral: RefCell<HashMap<IntegralKey, Rc<TypeSymbol>>>,
    real: Rc<TypeSymbol>,
    short_real: Rc<TypeSymbol>,
    error: Rc<TypeSymbol>,
}

impl Types {
    /// Creates an empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            integral: RefCell::new(HashMap::new()),
            real: Rc::new(TypeSymbol::Real),
            short_real: Rc::new(TypeSymbol::ShortReal),
            error: Rc::new(TypeSymbol::Error),
        }
    }

    /// An integral type with the default descending `[width-1:0]` dimension.
    #[must_use]
    pub fn get_type(&self, width: u32, signed: bool, four_state: bool) -> Rc<TypeSymbol> {
        self.get_integral(width, signed, four_state, vec![0])
    }

    /// An integral type with explicit packed-dimension lower bounds.
    #[must_use]
    pub fn get_integral(
        &self,
        width: u32,
        signed: bool,
        four_state: bool,
        lower_bounds: Vec<i32>,
    ) -> Rc<TypeSymbol> {
        let width = width.max(1);
        let key = IntegralKey {
            width,
            signed,
            four_state,
            lower_bounds: lower_bounds.clone(),
        };
        Rc::clone(
            self.integral
                .borrow_mut()
                .entry(key)
                .or_insert_with(|| {
                    Rc::new(TypeSymbol::Integral {
                        width,
                        signed,
                        four_state,
                        lower_bounds,
                    })
                }),
        )
    }

    /// The 32-bit signed two-state `int` type.
    #[must_use]
    pub fn get_int_type(&self) -> Rc<TypeSymbol> {
        self.get_type(32, true, false)
    }

    /// The 1-bit unsigned four-state `logic` type.
    #[must_use]
    pub fn get_logic_type(&self) -> Rc<TypeSymbol> {
        self.get_type(1, false, true)
    }

    /// The `real` type.
    #[must_use]
    pub fn get_real_type(&self) -> Rc<TypeSymbol> {
        Rc::clone(&self.real)
    }

    /// The `shortreal` type.
    #[must_use]
    pub fn get_short_real_type(&self) -> Rc<TypeSymbol> {
        Rc::clone(&self.short_real)
    }

    /// The error type.
    #[must_use]
    pub fn get_error_type(&self) -> Rc<TypeSymbol> {
        Rc::clone(&self.error)
    }
}

impl Default for Types {
    fn default() -> Self {
        Self::new()
    }
}

// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Numeric value types for SystemVerilog literals.
//!
//! The centerpiece is [`SVInt`], the arbitrary-width four-state integer that
//! backs integer and vector literals. [`TimeUnit`] covers the time-literal
//! suffixes.

mod sv_int;

pub use sv_int::{LogicBit, NumericBase, ParsedVector, SVInt, VectorDigit};

/// Unit suffix of a time literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Seconds.
    Seconds,
    /// Milliseconds.
    Milliseconds,
    /// Microseconds.
    Microseconds,
    /// Nanoseconds.
    Nanoseconds,
    /// Picoseconds.
    Picoseconds,
    /// Femtoseconds.
    Femtoseconds,
}

impl TimeUnit {
    /// Looks up a unit from its literal suffix. Suffixes are lowercase only.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "s" => Some(Self::Seconds),
            "ms" => Some(Self::Milliseconds),
            "us" => Some(Self::Microseconds),
            "ns" => Some(Self::Nanoseconds),
            "ps" => Some(Self::Picoseconds),
            "fs" => Some(Self::Femtoseconds),
            _ => None,
        }
    }

    /// The literal suffix for this unit.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
            Self::Nanoseconds => "ns",
            Self::Picoseconds => "ps",
            Self::Femtoseconds => "fs",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_unit_round_trips() {
        for unit in [
            TimeUnit::Seconds,
            TimeUnit::Milliseconds,
            TimeUnit::Microseconds,
            TimeUnit::Nanoseconds,
            TimeUnit::Picoseconds,
            TimeUnit::Femtoseconds,
        ] {
            assert_eq!(TimeUnit::from_suffix(unit.suffix()), Some(unit));
        }
    }

    #[test]
    fn time_unit_rejects_unknown() {
        assert_eq!(TimeUnit::from_suffix("as"), None);
        assert_eq!(TimeUnit::from_suffix("NS"), None);
        assert_eq!(TimeUnit::from_suffix(""), None);
    }
}

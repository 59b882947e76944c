//! Syntax tree of CLDR plural rules and its evaluation.

use super::context::PluralContext;
use std::fmt;

/// Plural operand symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Absolute value
    N,
    /// Integer digits
    I,
    /// Fraction digit count, with trailing zeros
    V,
    /// Fraction digit count, without trailing zeros
    W,
    /// Fraction digits, with trailing zeros
    F,
    /// Fraction digits, without trailing zeros
    T,
    /// Compact exponent
    C,
    /// Exponent
    E,
}

impl Operand {
    /// Operand for its rule symbol.
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'n' => Some(Self::N),
            'i' => Some(Self::I),
            'v' => Some(Self::V),
            'w' => Some(Self::W),
            'f' => Some(Self::F),
            't' => Some(Self::T),
            'c' => Some(Self::C),
            'e' => Some(Self::E),
            _ => None,
        }
    }

    /// Value of the operand in `ctx`.
    #[allow(clippy::cast_precision_loss)]
    pub fn resolve(self, ctx: &PluralContext) -> f64 {
        match self {
            Self::N => ctx.n,
            Self::I => ctx.i as f64,
            Self::V => ctx.v as f64,
            Self::W => ctx.w as f64,
            Self::F => ctx.f as f64,
            Self::T => ctx.t as f64,
            Self::C => f64::from(ctx.c),
            Self::E => f64::from(ctx.e),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::N => "n",
            Self::I => "i",
            Self::V => "v",
            Self::W => "w",
            Self::F => "f",
            Self::T => "t",
            Self::C => "c",
            Self::E => "e",
        };
        f.write_str(symbol)
    }
}

/// `=` or `!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Matches when any right operand matches
    Equals,
    /// Matches when no right operand matches
    NotEquals,
}

/// One entry of a relation's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeItem {
    /// A single value
    Number(f64),
    /// Inclusive range; only whole values fall inside
    Range(f64, f64),
}

impl RangeItem {
    /// Whether `value` matches this item.
    pub fn contains(self, value: f64) -> bool {
        match self {
            Self::Number(expected) => value == expected,
            Self::Range(low, high) => value.fract() == 0.0 && low <= value && value <= high,
        }
    }
}

/// `operand [% modulus] relation range-list`
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operand read from the context
    pub operand: Operand,
    /// Optional modulus applied to the operand
    pub modulo: Option<u64>,
    /// Comparison
    pub relation: Relation,
    /// Values and ranges compared against
    pub right: Vec<RangeItem>,
}

impl Operation {
    /// Evaluates the operation.
    #[allow(clippy::cast_precision_loss)]
    pub fn matches(&self, ctx: &PluralContext) -> bool {
        let mut value = self.operand.resolve(ctx);
        if let Some(modulus) = self.modulo {
            value %= modulus as f64;
        }

        let any = self.right.iter().any(|item| item.contains(value));
        match self.relation {
            Relation::Equals => any,
            Relation::NotEquals => !any,
        }
    }
}

/// Operations joined by `and`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrCondition {
    /// All must match
    pub and_operations: Vec<Operation>,
}

impl OrCondition {
    /// Whether every operation matches.
    pub fn matches(&self, ctx: &PluralContext) -> bool {
        self.and_operations.iter().all(|op| op.matches(ctx))
    }
}

/// A category label with its `or`-joined conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Category the rule selects, e.g. `few`
    pub count_label: String,
    /// Any may match
    pub or_conditions: Vec<OrCondition>,
}

impl Condition {
    /// Whether any `or` branch matches.
    pub fn matches(&self, ctx: &PluralContext) -> bool {
        self.or_conditions.iter().any(|or| or.matches(ctx))
    }
}

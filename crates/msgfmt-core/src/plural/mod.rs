//! CLDR plural rules: grammar, operands and the per-locale table.

pub mod ast;
mod cldr;
pub mod context;
pub mod parser;
pub mod table;

pub use ast::{Condition, Operand, Operation, OrCondition, RangeItem, Relation};
pub use context::PluralContext;
pub use parser::parse_rule;
pub use table::{
    category_rank, global_rules, PluralFn, PluralRuleTable, Pluralizer, CATEGORY_ORDER, OTHER,
};

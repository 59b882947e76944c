//! # msgfmt Core
//!
//! ICU-style message formatting for msgfmt.
//!
//! A pattern is literal text with `{...}` placeholders. A placeholder names a
//! variable and optionally a formatter and its arguments:
//!
//! - `{name}` renders the bound value
//! - `{gender, select, male {He} female {She} other {They}}` picks a branch
//! - `{count, plural, offset:1 =0 {none} one {# item} other {# items}}` picks
//!   a branch by exact value or CLDR plural category
//! - `{amount, number, percent}`, `{day, date, long}` and `{at, time}` render
//!   locale-aware values
//!
//! Braces, `#` and quotes are literal inside single quotes, and `''` is a
//! literal quote. Branches are formatted recursively with the same arguments.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod arguments;
pub mod engine;
pub mod error;
pub mod formatters;
pub mod pattern_parser;
pub mod plural;
pub mod request;
pub mod scanner;
pub mod value;

pub use engine::{
    default_formatter, format_message, CacheStats, FormatEngine, MessageFormatter,
    MessageFormatterBuilder,
};
pub use error::{MessageFormatError, MessageFormatResult};
pub use formatters::{
    DateTimeStyle, Formatter, FormatterRegistry, LocaleValueRenderer, NumberStyle, ValueRenderer,
};
pub use plural::{global_rules, PluralContext, PluralRuleTable, Pluralizer};
pub use request::{FormatRequest, RequestSequence};
pub use scanner::SourceSpan;
pub use value::{IntoArgValue, MessageArgs, Value};

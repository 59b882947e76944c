//! `{variable, plural, [offset:N] [=N {text}]... category {text}...}`

use super::{arguments_of, Formatter};
use crate::arguments::ParsedArguments;
use crate::engine::FormatEngine;
use crate::error::{MessageFormatError, MessageFormatResult};
use crate::plural::{PluralContext, PluralRuleTable, OTHER};
use crate::request::FormatRequest;
use crate::scanner::is_escapable;
use crate::value::{is_decimal, MessageArgs, Value};
use std::sync::Arc;
use tracing::trace;

/// Chooses a block by exact value or plural category and substitutes `#`.
///
/// `=N` blocks are compared against the bound value before any offset. The
/// category is computed on the value minus the offset, which is also what
/// `#` prints. An unbound or null variable counts as 0.
pub struct PluralFormatter {
    rules: Arc<PluralRuleTable>,
}

impl PluralFormatter {
    /// Creates the formatter over a rule table.
    pub fn new(rules: Arc<PluralRuleTable>) -> Self {
        Self { rules }
    }
}

impl Formatter for PluralFormatter {
    fn name(&self) -> &str {
        "plural"
    }

    fn can_format(&self, request: &FormatRequest) -> bool {
        request.formatter_name.as_deref() == Some("plural")
    }

    fn variable_must_exist(&self) -> bool {
        false
    }

    fn format(
        &self,
        locale: &str,
        request: &FormatRequest,
        args: &MessageArgs,
        value: Option<&Value>,
        engine: &dyn FormatEngine,
    ) -> MessageFormatResult<String> {
        let parsed = ParsedArguments::parse(arguments_of(request))?;

        let decimal = value.map_or_else(|| Ok("0".to_string()), Value::to_decimal_string)?;
        let number = parse_decimal(&decimal)?;
        let shown = match parsed.extension("offset") {
            Some(offset) if parse_decimal(offset)? != 0.0 => subtract_decimal(&decimal, offset)?,
            _ => decimal,
        };

        let block = match exact_match(&parsed, number)? {
            Some(block) => block,
            None => {
                let ctx = PluralContext::from_decimal_str(&shown)?;
                let category = self.rules.category(locale, &ctx);
                trace!(variable = %request.variable_name, %category, "Plural category");
                parsed
                    .block(&category)
                    .or_else(|| parsed.block(OTHER))
                    .ok_or_else(|| {
                        MessageFormatError::formatter(format!(
                            "'{}' is '{category}' but there is neither a '{category}' nor an 'other' branch",
                            request.variable_name
                        ))
                    })?
            }
        };

        engine.format_message(&replace_number_sign(block, &shown), args)
    }
}

fn parse_decimal(text: &str) -> MessageFormatResult<f64> {
    let trimmed = text.trim();
    if !is_decimal(trimmed) {
        return Err(MessageFormatError::invalid_number(text));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| MessageFormatError::invalid_number(text))
}

/// Digits and fraction length of a decimal string (`-1.50` is `(-150, 2)`).
fn scaled_decimal(text: &str) -> MessageFormatResult<(i128, u32)> {
    let trimmed = text.trim();
    if !is_decimal(trimmed) {
        return Err(MessageFormatError::invalid_number(text));
    }
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits: i128 = format!("{integer}{fraction}")
        .parse()
        .map_err(|_| MessageFormatError::invalid_number(text))?;
    let scale = u32::try_from(fraction.len()).map_err(|_| MessageFormatError::invalid_number(text))?;
    Ok((if negative { -digits } else { digits }, scale))
}

/// `value - offset` in exact decimal arithmetic, keeping the larger of the
/// two fraction lengths.
fn subtract_decimal(value: &str, offset: &str) -> MessageFormatResult<String> {
    let (left, left_scale) = scaled_decimal(value)?;
    let (right, right_scale) = scaled_decimal(offset)?;
    let scale = left_scale.max(right_scale);
    let widen = |digits: i128, from: u32| {
        10i128
            .checked_pow(scale - from)
            .and_then(|factor| digits.checked_mul(factor))
    };

    let difference = widen(left, left_scale)
        .zip(widen(right, right_scale))
        .and_then(|(left, right)| left.checked_sub(right))
        .ok_or_else(|| MessageFormatError::invalid_number(format!("{value} - {offset}")))?;

    let sign = if difference < 0 { "-" } else { "" };
    let width = usize::try_from(scale).unwrap_or(0) + 1;
    let digits = format!("{:0width$}", difference.unsigned_abs());
    if scale == 0 {
        return Ok(format!("{sign}{digits}"));
    }
    let (integer, fraction) = digits.split_at(digits.len() - (width - 1));
    Ok(format!("{sign}{integer}.{fraction}"))
}

/// First `=N` block whose number equals `value`.
fn exact_match(parsed: &ParsedArguments, value: f64) -> MessageFormatResult<Option<&str>> {
    for block in &parsed.keyed_blocks {
        if let Some(expected) = block.key.strip_prefix('=') {
            if parse_decimal(expected)? == value {
                return Ok(Some(&block.block_text));
            }
        }
    }
    Ok(None)
}

/// Replaces `#` at the block's own brace depth, outside quoted runs.
fn replace_number_sign(block: &str, number: &str) -> String {
    let mut output = String::with_capacity(block.len() + number.len());
    let mut chars = block.chars().peekable();
    let mut depth = 0usize;
    let mut in_escape = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                output.push(c);
                match chars.peek().copied() {
                    Some('\'') => {
                        chars.next();
                        output.push('\'');
                    }
                    Some(next) if !in_escape && is_escapable(next) => in_escape = true,
                    _ if in_escape => in_escape = false,
                    _ => {}
                }
            }
            _ if in_escape => output.push(c),
            '{' => {
                depth += 1;
                output.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                output.push(c);
            }
            '#' if depth == 0 => output.push_str(number),
            _ => output.push(c),
        }
    }

    output
}

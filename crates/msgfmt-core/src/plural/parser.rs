//! Recursive descent parser for CLDR plural rule text.
//!
//! ```text
//! rule        = or_condition ("or" or_condition)* ["@" samples]
//! or_condition = operation ("and" operation)*
//! operation   = operand ["%" integer] ("=" | "!=") range_list
//! range_list  = (number | number ".." number) ("," ...)*
//! ```

use super::ast::{Operand, Operation, OrCondition, RangeItem, Relation};
use crate::error::{MessageFormatError, MessageFormatResult};

/// Parses rule text such as `v = 0 and i % 10 = 2..4 @integer 2, 3`.
///
/// Sample lists after `@` are ignored.
///
/// # Errors
///
/// [`MessageFormatError::InvalidCharacter`] for an unexpected character and
/// [`MessageFormatError::InvalidPluralRule`] when the text ends early.
pub fn parse_rule(text: &str) -> MessageFormatResult<Vec<OrCondition>> {
    RuleParser { text, pos: 0 }.parse()
}

struct RuleParser<'a> {
    text: &'a str,
    pos: usize,
}

impl RuleParser<'_> {
    fn parse(mut self) -> MessageFormatResult<Vec<OrCondition>> {
        let mut conditions = vec![self.or_condition()?];

        loop {
            self.skip_whitespace();
            if self.at_end() {
                return Ok(conditions);
            }
            if !self.keyword("or") {
                return Err(self.unexpected());
            }
            conditions.push(self.or_condition()?);
        }
    }

    fn or_condition(&mut self) -> MessageFormatResult<OrCondition> {
        let mut and_operations = vec![self.operation()?];
        loop {
            self.skip_whitespace();
            if !self.keyword("and") {
                return Ok(OrCondition { and_operations });
            }
            and_operations.push(self.operation()?);
        }
    }

    fn operation(&mut self) -> MessageFormatResult<Operation> {
        self.skip_whitespace();
        let symbol = self.expect_char("an operand")?;
        let operand = Operand::from_symbol(symbol).ok_or_else(|| self.unexpected())?;
        self.bump(symbol);

        self.skip_whitespace();
        let modulo = if self.peek() == Some('%') {
            self.bump('%');
            self.skip_whitespace();
            Some(self.integer()?)
        } else {
            None
        };

        self.skip_whitespace();
        let relation = if self.rest().starts_with("!=") {
            self.pos += 2;
            Relation::NotEquals
        } else if self.expect_char("'=' or '!='")? == '=' {
            self.bump('=');
            Relation::Equals
        } else {
            return Err(self.unexpected());
        };

        Ok(Operation {
            operand,
            modulo,
            relation,
            right: self.range_list()?,
        })
    }

    fn range_list(&mut self) -> MessageFormatResult<Vec<RangeItem>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            let low = self.number()?;
            self.skip_whitespace();

            if self.rest().starts_with("..") {
                self.pos += 2;
                self.skip_whitespace();
                let high = self.number()?;
                items.push(RangeItem::Range(low, high));
            } else {
                items.push(RangeItem::Number(low));
            }

            self.skip_whitespace();
            if self.peek() != Some(',') {
                return Ok(items);
            }
            self.bump(',');
        }
    }

    fn number(&mut self) -> MessageFormatResult<f64> {
        let start = self.pos;
        self.digits("a number")?;

        let rest = self.rest();
        if rest.starts_with('.') && rest[1..].starts_with(|c: char| c.is_ascii_digit()) {
            self.pos += 1;
            self.digits("a number")?;
        }

        self.text[start..self.pos]
            .parse()
            .map_err(|_| MessageFormatError::invalid_rule(self.text, "number out of range"))
    }

    fn integer(&mut self) -> MessageFormatResult<u64> {
        let start = self.pos;
        self.digits("an integer")?;
        self.text[start..self.pos]
            .parse()
            .map_err(|_| MessageFormatError::invalid_rule(self.text, "integer out of range"))
    }

    fn digits(&mut self, expected: &str) -> MessageFormatResult<()> {
        let first = self.expect_char(expected)?;
        if !first.is_ascii_digit() {
            return Err(self.unexpected());
        }
        let len = self
            .rest()
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest().len());
        self.pos += len;
        Ok(())
    }

    /// Consumes `word` when it is next and not the prefix of a longer word.
    fn keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        let matched = rest.starts_with(word)
            && !rest[word.len()..].starts_with(|c: char| c.is_ascii_alphanumeric());
        if matched {
            self.pos += word.len();
        }
        matched
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    /// Samples start at `@`; the rule itself ends there.
    fn at_end(&self) -> bool {
        matches!(self.peek(), None | Some('@'))
    }

    fn expect_char(&self, expected: &str) -> MessageFormatResult<char> {
        match self.peek() {
            Some(c) if c != '@' => Ok(c),
            _ => Err(MessageFormatError::invalid_rule(
                self.text,
                format!("expected {expected} at position {}", self.pos),
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        let len = self
            .rest()
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.rest().len());
        self.pos += len;
    }

    fn unexpected(&self) -> MessageFormatError {
        match self.peek() {
            Some(character) => MessageFormatError::InvalidCharacter {
                character,
                position: self.pos,
                rule: self.text.to_string(),
            },
            None => MessageFormatError::invalid_rule(self.text, "unexpected end of rule"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Operation {
        let mut conditions = parse_rule(text).unwrap();
        assert_eq!(conditions.len(), 1);
        let mut ops = conditions.remove(0).and_operations;
        assert_eq!(ops.len(), 1);
        ops.remove(0)
    }

    #[test]
    fn test_simple_equality() {
        let op = single("n = 1");
        assert_eq!(op.operand, Operand::N);
        assert_eq!(op.modulo, None);
        assert_eq!(op.relation, Relation::Equals);
        assert_eq!(op.right, vec![RangeItem::Number(1.0)]);
    }

    #[test]
    fn test_modulo_and_ranges() {
        let op = single("i % 100 != 12..14, 20");
        assert_eq!(op.operand, Operand::I);
        assert_eq!(op.modulo, Some(100));
        assert_eq!(op.relation, Relation::NotEquals);
        assert_eq!(
            op.right,
            vec![RangeItem::Range(12.0, 14.0), RangeItem::Number(20.0)]
        );
    }

    #[test]
    fn test_without_spaces() {
        let op = single("n%10=3..4,9");
        assert_eq!(op.modulo, Some(10));
        assert_eq!(op.right.len(), 2);
    }

    #[test]
    fn test_decimal_numbers() {
        let op = single("n = 1.5");
        assert_eq!(op.right, vec![RangeItem::Number(1.5)]);
    }

    #[test]
    fn test_or_and_structure() {
        let rule = "v = 0 and i % 10 = 1 and i % 100 != 11 or f % 10 = 1 and f % 100 != 11";
        let conditions = parse_rule(rule).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].and_operations.len(), 3);
        assert_eq!(conditions[1].and_operations.len(), 2);
        assert_eq!(conditions[1].and_operations[0].operand, Operand::F);
    }

    #[test]
    fn test_samples_are_ignored() {
        let conditions = parse_rule("i = 1 and v = 0 @integer 1 @decimal 1.0, 1.00, …").unwrap();
        assert_eq!(conditions[0].and_operations.len(), 2);
    }

    #[test]
    fn test_invalid_operand() {
        let err = parse_rule("x = 1").unwrap_err();
        assert_eq!(
            err,
            MessageFormatError::InvalidCharacter {
                character: 'x',
                position: 0,
                rule: "x = 1".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_relation() {
        let err = parse_rule("n < 1").unwrap_err();
        assert!(matches!(
            err,
            MessageFormatError::InvalidCharacter {
                character: '<',
                position: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_garbage() {
        let err = parse_rule("n = 1 xor n = 2").unwrap_err();
        assert!(matches!(
            err,
            MessageFormatError::InvalidCharacter {
                character: 'x',
                position: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_premature_end() {
        for text in ["", "n", "n =", "n = 1..", "n % = 1", "n = 1 and", "i = 1 or @integer 1"] {
            let err = parse_rule(text).unwrap_err();
            assert!(
                matches!(
                    err,
                    MessageFormatError::InvalidPluralRule { .. }
                        | MessageFormatError::InvalidCharacter { .. }
                ),
                "{text}: {err:?}"
            );
        }
        assert!(matches!(
            parse_rule("n = ").unwrap_err(),
            MessageFormatError::InvalidPluralRule { .. }
        ));
    }

    #[test]
    fn test_keyword_needs_boundary() {
        assert!(parse_rule("n = 1 order").is_err());
    }
}

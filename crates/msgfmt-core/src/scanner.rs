//! Brace and quote aware scanning of pattern text.
//!
//! Quoting follows ICU conventions: `''` is a literal quote, and a quote
//! directly before `{`, `}` or `#` starts an escaped run that lasts until the
//! next lone quote. Braces inside an escaped run are plain text.

use crate::error::{MessageFormatError, MessageFormatResult};
use msgfmt_common::truncate_snippet;
use std::iter::Peekable;
use std::str::CharIndices;
use tracing::trace;

const SNIPPET_CHARS: usize = 24;

/// One top-level `{...}` region of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset of the closing brace (inclusive).
    pub end: usize,
    /// 1-based line of the opening brace.
    pub line: usize,
    /// 1-based column of the opening brace.
    pub column: usize,
    /// Raw text between the braces, nested braces and quotes included.
    pub inner_text: String,
}

impl SourceSpan {
    /// Number of bytes the span covers, braces included.
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A span always covers at least its two braces.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Walks text while tracking 1-based line and column.
///
/// Line feeds start a new line, carriage returns do not advance the column.
pub(crate) struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self::starting_at(text, 1, 0)
    }

    /// Cursor whose first character is reported at `line`, `column + 1`.
    pub(crate) fn starting_at(text: &'a str, line: usize, column: usize) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            line,
            column,
        }
    }

    pub(crate) fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Position that the next character will be reported at.
    pub(crate) fn next_position(&self) -> (usize, usize) {
        (self.line, self.column + 1)
    }
}

/// A character with its byte offset and 1-based position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Located {
    pub(crate) index: usize,
    pub(crate) ch: char,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Iterator for Cursor<'_> {
    type Item = Located;

    fn next(&mut self) -> Option<Located> {
        let (index, ch) = self.chars.next()?;
        let located = match ch {
            '\n' => {
                let here = Located {
                    index,
                    ch,
                    line: self.line,
                    column: self.column + 1,
                };
                self.line += 1;
                self.column = 0;
                here
            }
            '\r' => Located {
                index,
                ch,
                line: self.line,
                column: self.column,
            },
            _ => {
                self.column += 1;
                Located {
                    index,
                    ch,
                    line: self.line,
                    column: self.column,
                }
            }
        };
        Some(located)
    }
}

/// Characters that a preceding quote escapes.
pub(crate) const fn is_escapable(c: char) -> bool {
    matches!(c, '{' | '}' | '#')
}

/// Splits `text` into its top-level brace spans, in source order.
///
/// # Errors
///
/// [`MessageFormatError::MalformedLiteral`] for an escaped run that is never
/// closed or a `}` with nothing open, and
/// [`MessageFormatError::UnbalancedBraces`] when the totals differ.
pub fn scan(text: &str) -> MessageFormatResult<Vec<SourceSpan>> {
    let mut cursor = Cursor::new(text);
    let mut spans = Vec::new();

    let mut balance = 0usize;
    let mut open_count = 0usize;
    let mut close_count = 0usize;
    let mut escape_start: Option<Located> = None;
    let mut current: Option<Located> = None;

    while let Some(here) = cursor.next() {
        if here.ch == '\'' {
            match cursor.peek_char() {
                Some('\'') => {
                    cursor.next();
                }
                Some(next) if escape_start.is_none() && is_escapable(next) => {
                    escape_start = Some(here);
                }
                _ if escape_start.is_some() => escape_start = None,
                _ => {}
            }
            continue;
        }

        if escape_start.is_some() {
            continue;
        }

        match here.ch {
            '{' => {
                open_count += 1;
                balance += 1;
                if balance == 1 {
                    current = Some(here);
                }
            }
            '}' => {
                if balance == 0 {
                    return Err(MessageFormatError::malformed(
                        "Closing brace without a matching opening brace",
                        here.line,
                        here.column,
                        truncate_snippet(&text[here.index..], SNIPPET_CHARS),
                    ));
                }
                close_count += 1;
                balance -= 1;
                if balance == 0 {
                    if let Some(open) = current.take() {
                        spans.push(SourceSpan {
                            start: open.index,
                            end: here.index,
                            line: open.line,
                            column: open.column,
                            inner_text: text[open.index + 1..here.index].to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(open) = escape_start {
        return Err(MessageFormatError::malformed(
            "Unclosed escape sequence",
            open.line,
            open.column,
            truncate_snippet(&text[open.index..], SNIPPET_CHARS),
        ));
    }

    if open_count != close_count {
        return Err(MessageFormatError::UnbalancedBraces {
            open_count,
            close_count,
        });
    }

    trace!(spans = spans.len(), "Scanned pattern");
    Ok(spans)
}

/// Resolves quoting in formatted text.
///
/// `''` becomes `'`. A lone quote before `{`, `}` or `#` is dropped and
/// starts a verbatim run that the next lone quote (also dropped) ends. Any
/// other quote is kept.
pub fn unescape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_escape = false;

    while let Some(c) = chars.next() {
        if c != '\'' {
            output.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some('\'') => {
                chars.next();
                output.push('\'');
            }
            None => {
                if !in_escape {
                    output.push('\'');
                }
            }
            Some(_) if in_escape => in_escape = false,
            Some(next) if is_escapable(next) => in_escape = true,
            Some(_) => output.push('\''),
        }
    }

    output
}

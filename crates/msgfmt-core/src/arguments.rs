//! Parsing of select and plural arguments.
//!
//! Arguments open with optional `key:value` extensions (`offset:1`) followed
//! by keyed blocks such as `one {# item} other {# items}`. Block text is kept
//! raw so nested placeholders and quotes reach the engine untouched.

use crate::error::{MessageFormatError, MessageFormatResult};
use crate::scanner::{is_escapable, Cursor, Located};
use msgfmt_common::truncate_snippet;

const SNIPPET_CHARS: usize = 32;

/// A `key:value` token before the keyed blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterExtension {
    /// Text before the first colon.
    pub key: String,
    /// Text after the first colon.
    pub value: String,
}

/// A key followed by its `{...}` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedBlock {
    /// Branch key, e.g. `male`, `few` or `=0`.
    pub key: String,
    /// Raw text between the block's braces.
    pub block_text: String,
}

/// Extensions and keyed blocks of one argument string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    /// Leading `key:value` tokens in order.
    pub extensions: Vec<FormatterExtension>,
    /// Keyed blocks in order.
    pub keyed_blocks: Vec<KeyedBlock>,
}

impl ParsedArguments {
    /// Parses extensions and then keyed blocks from `args`.
    ///
    /// # Errors
    ///
    /// See [`parse_keyed_blocks`].
    pub fn parse(args: &str) -> MessageFormatResult<Self> {
        let (extensions, stop) = parse_extensions(args);
        let keyed_blocks = parse_keyed_blocks(args, stop)?;
        Ok(Self {
            extensions,
            keyed_blocks,
        })
    }

    /// Value of the first extension named `key`.
    pub fn extension(&self, key: &str) -> Option<&str> {
        self.extensions
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Block of the first keyed block named `key`.
    pub fn block(&self, key: &str) -> Option<&str> {
        self.keyed_blocks
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.block_text.as_str())
    }
}

/// Reads whitespace separated `key:value` tokens from the start of `args`.
///
/// Tokens end at whitespace or `{`. The first token without a colon stops
/// the scan; the returned index is where that token starts, or the length
/// of `args` when every token was an extension.
pub fn parse_extensions(args: &str) -> (Vec<FormatterExtension>, usize) {
    let mut extensions = Vec::new();
    let mut index = 0;

    loop {
        let rest = &args[index..];
        let Some(offset) = rest.find(|c: char| !c.is_whitespace()) else {
            return (extensions, args.len());
        };
        let start = index + offset;
        let end = args[start..]
            .find(|c: char| c.is_whitespace() || c == '{')
            .map_or(args.len(), |len| start + len);

        match args[start..end].split_once(':') {
            Some((key, value)) => {
                extensions.push(FormatterExtension {
                    key: key.to_string(),
                    value: value.to_string(),
                });
                index = end;
            }
            None => return (extensions, start),
        }
    }
}

/// Reads `key {block}` pairs from `args`, starting at byte `from`.
///
/// Quoting inside blocks follows the scanner's rules, so `'{'` does not
/// open a nested block.
///
/// # Errors
///
/// [`MessageFormatError::MalformedLiteral`], positioned within `args`, when
/// a block has no key, a `}` has nothing to close, a block is still open at
/// the end, a key is followed by anything but its block, or a quote appears
/// where a key is expected.
pub fn parse_keyed_blocks(args: &str, from: usize) -> MessageFormatResult<Vec<KeyedBlock>> {
    let mut blocks = Vec::new();
    let mut cursor = Cursor::new(args);

    let mut key = String::new();
    let mut key_ended = false;
    let mut depth = 0usize;
    let mut block_start = 0usize;
    let mut block_open: Option<Located> = None;
    let mut in_escape = false;

    let error = |message: String, at: Located| {
        MessageFormatError::malformed(
            message,
            at.line,
            at.column,
            truncate_snippet(&args[at.index..], SNIPPET_CHARS),
        )
    };

    while let Some(here) = cursor.next() {
        if here.index < from {
            continue;
        }

        if depth == 0 {
            match here.ch {
                '\'' => {
                    return Err(error(
                        "Unexpected quote where a key is expected".to_string(),
                        here,
                    ));
                }
                c if c.is_whitespace() => key_ended = !key.is_empty(),
                '{' => {
                    if key.is_empty() {
                        return Err(error("Expected a key before '{'".to_string(), here));
                    }
                    depth = 1;
                    block_start = here.index + 1;
                    block_open = Some(here);
                }
                '}' => {
                    let message = if key.is_empty() {
                        "Expected a key before '}'".to_string()
                    } else {
                        "Closing brace without a matching opening brace".to_string()
                    };
                    return Err(error(message, here));
                }
                c => {
                    if key_ended {
                        return Err(error(format!("Expected '{{' after key '{key}'"), here));
                    }
                    key.push(c);
                }
            }
            continue;
        }

        if here.ch == '\'' {
            match cursor.peek_char() {
                Some('\'') => {
                    cursor.next();
                }
                Some(next) if !in_escape && is_escapable(next) => in_escape = true,
                _ if in_escape => in_escape = false,
                _ => {}
            }
            continue;
        }
        if in_escape {
            continue;
        }

        match here.ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    blocks.push(KeyedBlock {
                        key: std::mem::take(&mut key),
                        block_text: args[block_start..here.index].to_string(),
                    });
                    key_ended = false;
                    block_open = None;
                }
            }
            _ => {}
        }
    }

    if let Some(open) = block_open {
        return Err(error(format!("Unclosed block for key '{key}'"), open));
    }

    if !key.is_empty() {
        let (line, column) = cursor.next_position();
        return Err(MessageFormatError::malformed(
            format!("Expected '{{' after key '{key}'"),
            line,
            column,
            truncate_snippet(&args[from.min(args.len())..], SNIPPET_CHARS),
        ));
    }

    Ok(blocks)
}

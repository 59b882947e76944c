//! Parsing of a placeholder's inner text into a [`FormatRequest`].
//!
//! The inner text is `variable[, formatter[, arguments]]`. Only the first two
//! commas split; everything after the second one belongs to the arguments.

use crate::error::{MessageFormatError, MessageFormatResult};
use crate::request::{FormatRequest, RequestSequence};
use crate::scanner::{scan, Cursor, Located, SourceSpan};
use msgfmt_common::truncate_snippet;

const SNIPPET_CHARS: usize = 32;

/// A comma-delimited section with the position of each of its characters.
struct Section {
    chars: Vec<Located>,
    /// Where the section begins, reported when it is empty.
    start: (usize, usize),
}

impl Section {
    fn trimmed(&self) -> &[Located] {
        let first = self.chars.iter().position(|c| !c.ch.is_whitespace());
        let Some(first) = first else {
            return &[];
        };
        let last = self
            .chars
            .iter()
            .rposition(|c| !c.ch.is_whitespace())
            .unwrap_or(first);
        &self.chars[first..=last]
    }
}

/// Parses the placeholder in `span` into a request.
///
/// # Errors
///
/// [`MessageFormatError::MalformedLiteral`] when the variable or formatter
/// name is empty, contains whitespace, or (for variables) contains a
/// character other than a letter, digit or underscore. The error points at
/// the offending character.
pub fn parse(span: &SourceSpan) -> MessageFormatResult<FormatRequest> {
    let inner = span.inner_text.as_str();
    let mut cursor = Cursor::starting_at(inner, span.line, span.column);
    let mut sections: Vec<Section> = Vec::with_capacity(2);
    let mut current = Section {
        chars: Vec::new(),
        start: cursor.next_position(),
    };
    let mut arguments: Option<&str> = None;

    while let Some(here) = cursor.next() {
        if here.ch != ',' {
            current.chars.push(here);
            continue;
        }

        let start = cursor.next_position();
        sections.push(std::mem::replace(
            &mut current,
            Section {
                chars: Vec::new(),
                start,
            },
        ));

        if sections.len() == 2 {
            arguments = Some(&inner[here.index + 1..]);
            break;
        }
    }
    if arguments.is_none() {
        sections.push(current);
    }

    let variable_name = variable_name(&sections[0], span)?;
    let formatter_name = match sections.get(1) {
        Some(section) => Some(formatter_name(section, span)?),
        None => None,
    };

    Ok(FormatRequest {
        span: span.clone(),
        variable_name,
        formatter_name,
        formatter_args: arguments.map(|args| args.trim().to_string()),
    })
}

/// Scans `pattern` and parses every top-level placeholder, in source order.
///
/// # Errors
///
/// The first scanner or placeholder error.
pub fn parse_requests(pattern: &str) -> MessageFormatResult<RequestSequence> {
    let requests = scan(pattern)?
        .iter()
        .map(parse)
        .collect::<MessageFormatResult<Vec<_>>>()?;
    Ok(RequestSequence::new(requests))
}

fn malformed(message: String, position: (usize, usize), span: &SourceSpan) -> MessageFormatError {
    MessageFormatError::malformed(
        message,
        position.0,
        position.1,
        truncate_snippet(&span.inner_text, SNIPPET_CHARS),
    )
}

fn variable_name(section: &Section, span: &SourceSpan) -> MessageFormatResult<String> {
    let chars = section.trimmed();
    if chars.is_empty() {
        return Err(malformed(
            "Variable name is empty or whitespace only".to_string(),
            section.start,
            span,
        ));
    }

    for located in chars {
        if located.ch.is_whitespace() {
            return Err(malformed(
                "Variable name contains whitespace".to_string(),
                (located.line, located.column),
                span,
            ));
        }
        if !(located.ch.is_alphanumeric() || located.ch == '_') {
            return Err(malformed(
                format!("Invalid character '{}' in variable name", located.ch),
                (located.line, located.column),
                span,
            ));
        }
    }

    Ok(chars.iter().map(|c| c.ch).collect())
}

fn formatter_name(section: &Section, span: &SourceSpan) -> MessageFormatResult<String> {
    let chars = section.trimmed();
    if chars.is_empty() {
        return Err(malformed(
            "Formatter name is empty or whitespace only".to_string(),
            section.start,
            span,
        ));
    }

    if let Some(space) = chars.iter().find(|c| c.ch.is_whitespace()) {
        return Err(malformed(
            "Formatter name contains whitespace".to_string(),
            (space.line, space.column),
            span,
        ));
    }

    Ok(chars.iter().map(|c| c.ch).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_first(pattern: &str) -> MessageFormatResult<FormatRequest> {
        let spans = scan(pattern).unwrap();
        parse(&spans[0])
    }

    fn error_position(err: &MessageFormatError) -> (usize, usize) {
        match err {
            MessageFormatError::MalformedLiteral { line, column, .. } => (*line, *column),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_variable() {
        let request = parse_first("Hi {name}!").unwrap();
        assert_eq!(request.variable_name, "name");
        assert_eq!(request.formatter_name, None);
        assert_eq!(request.formatter_args, None);
        assert_eq!(request.span.start, 3);
    }

    #[test]
    fn test_sections_are_trimmed() {
        let request = parse_first("{ count ,  plural , one {# item} other {# items} }").unwrap();
        assert_eq!(request.variable_name, "count");
        assert_eq!(request.formatter_name.as_deref(), Some("plural"));
        assert_eq!(
            request.formatter_args.as_deref(),
            Some("one {# item} other {# items}")
        );
    }

    #[test]
    fn test_commas_in_arguments_are_kept() {
        let request = parse_first("{x, select, a {1, 2, 3} other {}}").unwrap();
        assert_eq!(request.formatter_args.as_deref(), Some("a {1, 2, 3} other {}"));
    }

    #[test]
    fn test_formatter_without_arguments() {
        let request = parse_first("{when, date}").unwrap();
        assert_eq!(request.formatter_name.as_deref(), Some("date"));
        assert_eq!(request.formatter_args, None);

        let request = parse_first("{when, date,}").unwrap();
        assert_eq!(request.formatter_args.as_deref(), Some(""));
    }

    #[test]
    fn test_underscore_and_digits() {
        let request = parse_first("{guest_count2}").unwrap();
        assert_eq!(request.variable_name, "guest_count2");
    }

    #[test]
    fn test_invalid_character_position() {
        let err = parse_first("Hello\n  {first-name}").unwrap_err();
        assert_eq!(error_position(&err), (2, 9));
        assert!(err.to_string().contains("Invalid character '-'"));
    }

    #[test]
    fn test_invalid_character_after_newline_in_span() {
        let err = parse_first("{\n ab$}").unwrap_err();
        assert_eq!(error_position(&err), (2, 4));
    }

    #[test]
    fn test_empty_variable() {
        let err = parse_first("ab {  , select, other {x}}").unwrap_err();
        assert!(err.to_string().contains("empty or whitespace only"));
        assert_eq!(error_position(&err), (1, 5));
    }

    #[test]
    fn test_variable_with_whitespace() {
        let err = parse_first("{first name}").unwrap_err();
        assert!(err.to_string().contains("contains whitespace"));
        assert_eq!(error_position(&err), (1, 7));
    }

    #[test]
    fn test_formatter_name_errors() {
        let err = parse_first("{x, }").unwrap_err();
        assert!(err.to_string().contains("Formatter name is empty"));

        let err = parse_first("{x, sel ect, other {}}").unwrap_err();
        assert!(err.to_string().contains("Formatter name contains whitespace"));
        assert_eq!(error_position(&err), (1, 8));
    }

    #[test]
    fn test_parse_requests_in_order() {
        let requests = parse_requests("{a} and {b, select, other {{c}}} '{d}'").unwrap();
        let names: Vec<&str> = requests.iter().map(|r| r.variable_name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(requests.get(1).unwrap().formatter_args.as_deref(), Some("other {{c}}"));
    }

    #[test]
    fn test_parse_requests_reports_first_error() {
        let err = parse_requests("{ok} {bad name} {also bad}").unwrap_err();
        assert!(err.to_string().contains("bad name"));
    }
}

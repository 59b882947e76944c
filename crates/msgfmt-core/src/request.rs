//! Formatting requests produced from scanned spans.

use crate::scanner::SourceSpan;

/// One placeholder to format: where it sits and what it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    /// Location of the placeholder in the working text.
    pub span: SourceSpan,
    /// Variable the placeholder reads.
    pub variable_name: String,
    /// Formatter name, absent for plain `{variable}` placeholders.
    pub formatter_name: Option<String>,
    /// Raw text after the second comma.
    pub formatter_args: Option<String>,
}

impl FormatRequest {
    /// Formatter name, or the empty string for plain placeholders.
    pub fn formatter_name_or_empty(&self) -> &str {
        self.formatter_name.as_deref().unwrap_or("")
    }
}

/// The ordered requests of one pattern.
///
/// Requests are kept in source order; splicing a result into the working
/// text only ever moves the requests after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSequence {
    requests: Vec<FormatRequest>,
}

impl RequestSequence {
    /// Wraps requests already in source order.
    pub const fn new(requests: Vec<FormatRequest>) -> Self {
        Self { requests }
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the pattern had no placeholders.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Request at `index`.
    pub fn get(&self, index: usize) -> Option<&FormatRequest> {
        self.requests.get(index)
    }

    /// Iterates requests in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, FormatRequest> {
        self.requests.iter()
    }

    /// Moves every request after `index` by the length change of replacing
    /// request `index`'s span with `result_len` bytes.
    ///
    /// Each later start and end becomes
    /// `old - (consumed.end - consumed.start - 1) + (result_len - 2)`.
    pub fn shift_indices(&mut self, index: usize, result_len: usize) {
        let Some(consumed) = self.requests.get(index).map(|r| r.span.len()) else {
            return;
        };

        for request in self.requests.iter_mut().skip(index + 1) {
            let span = &mut request.span;
            if result_len >= consumed {
                let grow = result_len - consumed;
                span.start += grow;
                span.end += grow;
            } else {
                let shrink = consumed - result_len;
                span.start -= shrink;
                span.end -= shrink;
            }
        }
    }
}

impl<'a> IntoIterator for &'a RequestSequence {
    type Item = &'a FormatRequest;
    type IntoIter = std::slice::Iter<'a, FormatRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: usize, end: usize, name: &str) -> FormatRequest {
        FormatRequest {
            span: SourceSpan {
                start,
                end,
                line: 1,
                column: start + 1,
                inner_text: name.to_string(),
            },
            variable_name: name.to_string(),
            formatter_name: None,
            formatter_args: None,
        }
    }

    #[test]
    fn test_shift_after_shrinking_splice() {
        // "{name} has {messages}" with "Jeff" spliced over "{name}"
        let mut sequence =
            RequestSequence::new(vec![request(0, 5, "name"), request(11, 20, "messages")]);
        sequence.shift_indices(0, 4);

        let shifted = sequence.get(1).unwrap();
        assert_eq!(shifted.span.start, 9);
        assert_eq!(shifted.span.end, 18);
        assert_eq!(sequence.get(0).unwrap().span.start, 0);
    }

    #[test]
    fn test_shift_after_growing_splice() {
        let mut sequence = RequestSequence::new(vec![
            request(0, 2, "a"),
            request(4, 6, "b"),
            request(8, 10, "c"),
        ]);
        sequence.shift_indices(1, 10);

        assert_eq!(sequence.get(0).unwrap().span.start, 0);
        assert_eq!(sequence.get(1).unwrap().span.start, 4);
        assert_eq!(sequence.get(2).unwrap().span.start, 15);
        assert_eq!(sequence.get(2).unwrap().span.end, 17);
    }

    #[test]
    fn test_shift_matches_formula() {
        let consumed = (3usize, 12usize);
        let result_len = 1usize;
        let old = 20usize;
        let expected = old - (consumed.1 - consumed.0 - 1) + result_len - 2;

        let mut sequence =
            RequestSequence::new(vec![request(consumed.0, consumed.1, "x"), request(old, old + 2, "y")]);
        sequence.shift_indices(0, result_len);
        assert_eq!(sequence.get(1).unwrap().span.start, expected);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = RequestSequence::new(vec![request(0, 2, "a"), request(5, 7, "b")]);
        let mut copy = original.clone();
        copy.shift_indices(0, 0);

        assert_eq!(original.get(1).unwrap().span.start, 5);
        assert_eq!(copy.get(1).unwrap().span.start, 2);
    }

    #[test]
    fn test_shift_out_of_range_is_noop() {
        let mut sequence = RequestSequence::new(vec![request(0, 2, "a")]);
        sequence.shift_indices(3, 100);
        assert_eq!(sequence.get(0).unwrap().span.start, 0);
    }
}

//! Test utilities and shared test helpers for msgfmt.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        // Another test harness may already own the global subscriber.
        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Patterns with known outputs, shared by unit and integration tests.
pub mod pattern_fixtures {
    /// Plain placeholder followed by a plural with `#`.
    pub const NAME_AND_PLURAL: &str = "{name} has {messages, plural, other {# messages}}.";

    /// Exact-match plural key that wins over the category.
    pub const EXACT_MATCH_PLURAL: &str = "{n, plural, =2 {two} one {1} other {#}}";

    /// Gender select with an `other` fallback.
    pub const GENDER_SELECT: &str = "{g, select, male{He} female{She} other{They}}";

    /// Select nested in a select, with an escaped brace in the inner branch.
    pub const NESTED_SELECT_ESCAPED_BRACE: &str = "{s1, select, 1 {{s2, select, 2 {'{'}}}}";

    /// Braces that never balance: four opened, one closed.
    pub const UNBALANCED: &str = "A few {{{{ and one }";

    /// A larger message mixing select, plural with offset and nesting.
    pub fn party_invitation() -> &'static str {
        concat!(
            "{host_gender, select, ",
            "female {{guest_count, plural, offset:1 ",
            "=0 {{host} does not give a party.} ",
            "=1 {{host} invites {guest} to her party.} ",
            "=2 {{host} invites {guest} and one other person to her party.} ",
            "other {{host} invites {guest} and # other people to her party.}}} ",
            "male {{guest_count, plural, offset:1 ",
            "=0 {{host} does not give a party.} ",
            "=1 {{host} invites {guest} to his party.} ",
            "=2 {{host} invites {guest} and one other person to his party.} ",
            "other {{host} invites {guest} and # other people to his party.}}} ",
            "other {{guest_count, plural, offset:1 ",
            "=0 {{host} does not give a party.} ",
            "=1 {{host} invites {guest} to their party.} ",
            "=2 {{host} invites {guest} and one other person to their party.} ",
            "other {{host} invites {guest} and # other people to their party.}}}}"
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use proptest::prelude::*;

    /// Text without braces or quotes.
    pub fn plain_text_strategy() -> impl Strategy<Value = String> {
        r"[a-zA-Z0-9 ,.!?#:\n]{0,12}".prop_map(|s| s.to_string())
    }

    /// Text whose braces are balanced and which contains no quotes.
    pub fn balanced_pattern_strategy() -> impl Strategy<Value = String> {
        plain_text_strategy().prop_recursive(3, 48, 4, |inner| {
            prop::collection::vec(
                prop_oneof![
                    plain_text_strategy(),
                    inner.prop_map(|s| format!("{{{s}}}")),
                ],
                1..5,
            )
            .prop_map(|parts| parts.concat())
        })
    }

    /// Well-formed text mixing `''`, `'{'`, `'}'`, `'#'` escapes with plain
    /// text and balanced brace groups.
    pub fn escaped_pattern_strategy() -> impl Strategy<Value = String> {
        let escape = prop_oneof![
            Just("''".to_string()),
            Just("'{'".to_string()),
            Just("'}'".to_string()),
            Just("'#'".to_string()),
            Just("'{literal}'".to_string()),
            Just("it's".to_string()),
        ];
        let segment = prop_oneof![plain_text_strategy(), escape];
        let group = prop::collection::vec(segment.clone(), 0..4)
            .prop_map(|parts| format!("{{{}}}", parts.concat()));

        prop::collection::vec(prop_oneof![segment, group], 0..8).prop_map(|parts| parts.concat())
    }

    /// Strategy for generating valid locale tags.
    pub fn locale_tag_strategy() -> impl Strategy<Value = String> {
        r"[a-z]{2,3}(-[A-Z]{2})?".prop_map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_party_invitation_is_balanced() {
        let pattern = pattern_fixtures::party_invitation();
        let open = pattern.chars().filter(|c| *c == '{').count();
        let close = pattern.chars().filter(|c| *c == '}').count();
        assert_eq!(open, close);
    }

    #[cfg(feature = "proptest")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_property_balanced_patterns_balance(pattern in property_testing::balanced_pattern_strategy()) {
                let mut depth = 0i32;
                for c in pattern.chars() {
                    match c {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    prop_assert!(depth >= 0);
                }
                prop_assert_eq!(depth, 0);
            }

            #[test]
            fn test_property_locale_tags_parse(tag in property_testing::locale_tag_strategy()) {
                prop_assert!(crate::LocaleTag::parse(&tag).is_ok());
            }
        }
    }
}

//! Common type definitions and newtype wrappers for domain modeling.

use crate::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::{langid, LanguageIdentifier};

/// A normalized locale tag such as `en`, `pt-PT` or `sr-Latn-BA`.
///
/// Parsing is delegated to [`LanguageIdentifier`]. Underscores are accepted
/// as separators and the tag is kept in its canonical hyphenated form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag {
    id: LanguageIdentifier,
    text: String,
}

impl LocaleTag {
    /// Parses and normalizes a locale tag.
    pub fn parse(tag: &str) -> CommonResult<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(CommonError::invalid_locale(tag, "tag is empty"));
        }

        let id = trimmed
            .replace('_', "-")
            .parse::<LanguageIdentifier>()
            .map_err(|e| CommonError::invalid_locale(tag, e.to_string()))?;
        Ok(Self::from(id))
    }

    /// Returns the normalized tag.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the parsed identifier.
    pub const fn identifier(&self) -> &LanguageIdentifier {
        &self.id
    }

    /// Returns the primary language subtag (`pt` for `pt-PT`).
    pub fn language(&self) -> &str {
        self.id.language.as_str()
    }

    /// Key used for case-insensitive table lookups.
    pub fn lookup_key(&self) -> String {
        self.text.to_ascii_lowercase()
    }

    /// Lookup keys from most to least specific (`sr-latn-ba`, `sr-latn`, `sr`).
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut subtags = vec![self.id.language.as_str().to_string()];
        subtags.extend(self.id.script.iter().map(|script| script.as_str().to_string()));
        subtags.extend(self.id.region.iter().map(|region| region.as_str().to_string()));
        subtags.extend(self.id.variants().map(|variant| variant.as_str().to_string()));

        (1..=subtags.len())
            .rev()
            .map(|n| subtags[..n].join("-").to_ascii_lowercase())
            .collect()
    }
}

impl From<LanguageIdentifier> for LocaleTag {
    fn from(id: LanguageIdentifier) -> Self {
        let text = id.to_string();
        Self { id, text }
    }
}

impl Default for LocaleTag {
    fn default() -> Self {
        Self::from(langid!("en"))
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for LocaleTag {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = CommonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.text
    }
}

impl AsRef<str> for LocaleTag {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

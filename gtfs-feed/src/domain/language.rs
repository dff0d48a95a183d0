//! BCP-47 language tags.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::error::{MalformedScalar, ScalarKind};

/// A language tag such as `en`, `fr-CA` or `zh-Hant-TW`.
///
/// Validation is syntactic: a primary subtag of 2-8 letters followed by any
/// number of 1-8 character alphanumeric subtags. Tags compare equal
/// regardless of case, as BCP-47 specifies.
///
/// # Examples
///
/// ```
/// use gtfs_feed::domain::LanguageCode;
///
/// let tag = LanguageCode::parse("en-GB").unwrap();
/// assert_eq!(tag.primary(), "en");
/// assert_eq!(tag, LanguageCode::parse("EN-gb").unwrap());
///
/// assert!(LanguageCode::parse("e").is_err());
/// assert!(LanguageCode::parse("en_GB").is_err());
/// ```
#[derive(Clone)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(s: &str) -> Result<Self, MalformedScalar> {
        let mut subtags = s.split('-');

        let primary = subtags.next().unwrap_or_default();
        if !(2..=8).contains(&primary.len()) {
            return Err(MalformedScalar::new(
                ScalarKind::LanguageCode,
                s,
                "primary subtag must be 2-8 letters",
            ));
        }
        if !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(MalformedScalar::new(
                ScalarKind::LanguageCode,
                s,
                "primary subtag must be letters",
            ));
        }

        for subtag in subtags {
            if !(1..=8).contains(&subtag.len())
                || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
            {
                return Err(MalformedScalar::new(
                    ScalarKind::LanguageCode,
                    s,
                    "subtags must be 1-8 alphanumeric characters",
                ));
            }
        }

        Ok(Self(s.to_string()))
    }

    /// The tag as the publisher wrote it.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag, e.g. `en` for `en-GB`.
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl PartialEq for LanguageCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for LanguageCode {}

impl Hash for LanguageCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl fmt::Debug for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LanguageCode({})", self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_tags() {
        assert!(LanguageCode::parse("en").is_ok());
        assert!(LanguageCode::parse("fra").is_ok());
        assert!(LanguageCode::parse("zh-Hant-TW").is_ok());
        assert!(LanguageCode::parse("es-419").is_ok());
    }

    #[test]
    fn reject_malformed() {
        assert!(LanguageCode::parse("").is_err());
        assert!(LanguageCode::parse("x").is_err());
        assert!(LanguageCode::parse("12").is_err());
        assert!(LanguageCode::parse("en-").is_err());
        assert!(LanguageCode::parse("-en").is_err());
        assert!(LanguageCode::parse("en--GB").is_err());
        assert!(LanguageCode::parse("en-toolongsubtag").is_err());
    }

    #[test]
    fn case_insensitive_equality_and_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(LanguageCode::parse("pt-BR").unwrap());
        assert!(set.contains(&LanguageCode::parse("PT-br").unwrap()));
        assert!(!set.contains(&LanguageCode::parse("pt-PT").unwrap()));
    }

    #[test]
    fn preserves_original_spelling() {
        let tag = LanguageCode::parse("de-CH").unwrap();
        assert_eq!(tag.as_str(), "de-CH");
        assert_eq!(tag.primary(), "de");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Language-region tags always parse
        #[test]
        fn language_region_parses(s in "[a-z]{2,3}-[A-Z]{2}") {
            prop_assert!(LanguageCode::parse(&s).is_ok());
        }

        /// Underscore separators are always rejected
        #[test]
        fn underscore_rejected(s in "[a-z]{2}_[A-Z]{2}") {
            prop_assert!(LanguageCode::parse(&s).is_err());
        }
    }
}

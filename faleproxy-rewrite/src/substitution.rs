//! Whole-word, case-preserving term substitution.
//!
//! A match is classified by comparing it exactly against the source term's
//! upper, capitalized and lower forms, in that order. The first equal form
//! decides which form of the replacement is emitted. A match equal to none
//! of them (`yAle`, `YaLE`) gets the lowercase replacement.

use regex::{Captures, Regex};
use std::borrow::Cow;
use thiserror::Error;

/// Surface form of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseClass {
    /// `YALE`
    Upper,
    /// `Yale`
    Capitalized,
    /// `yale`
    Lower,
}

impl CaseClass {
    /// Order in which classes are tried against a match.
    pub const PRECEDENCE: [CaseClass; 3] = [CaseClass::Upper, CaseClass::Capitalized, CaseClass::Lower];

    /// Class used for matches equal to none of the [`PRECEDENCE`](Self::PRECEDENCE) forms.
    pub const FALLBACK: CaseClass = CaseClass::Lower;

    /// Render `word` in this class.
    ///
    /// ```
    /// use faleproxy_rewrite::CaseClass;
    ///
    /// assert_eq!(CaseClass::Upper.apply("fale"), "FALE");
    /// assert_eq!(CaseClass::Capitalized.apply("fALE"), "Fale");
    /// assert_eq!(CaseClass::Lower.apply("Fale"), "fale");
    /// ```
    pub fn apply(self, word: &str) -> String {
        match self {
            CaseClass::Upper => word.to_uppercase(),
            CaseClass::Lower => word.to_lowercase(),
            CaseClass::Capitalized => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                    None => String::new(),
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("source term must not be empty")]
    EmptySource,
    #[error("source term does not compile to a pattern: {0}")]
    Pattern(String),
}

/// One casing rule: when a match equals `source`, emit `replacement`.
#[derive(Debug, Clone)]
struct CaseRule {
    class: CaseClass,
    source: String,
    replacement: String,
}

/// A compiled (source term, replacement term) pair.
///
/// Immutable once built; share it across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Substitution {
    source: String,
    replacement: String,
    pattern: Regex,
    rules: Vec<CaseRule>,
}

impl Substitution {
    /// Compile a substitution. Surrounding whitespace on the source term is
    /// ignored; an empty source term is rejected.
    ///
    /// ```
    /// use faleproxy_rewrite::Substitution;
    ///
    /// let sub = Substitution::new("Yale", "Fale").unwrap();
    /// assert_eq!(sub.apply("YALE, Yale and yale"), "FALE, Fale and fale");
    /// assert_eq!(sub.apply("Yalevision"), "Yalevision");
    /// ```
    pub fn new(source: &str, replacement: &str) -> Result<Self, SubstitutionError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SubstitutionError::EmptySource);
        }

        // Word boundaries are ASCII-only: `é` next to the term is a separator.
        let pattern = Regex::new(&format!(r"(?i)(?-u:\b){}(?-u:\b)", regex::escape(source)))
            .map_err(|e| SubstitutionError::Pattern(e.to_string()))?;

        let rules = CaseClass::PRECEDENCE
            .iter()
            .map(|&class| CaseRule {
                class,
                source: class.apply(source),
                replacement: class.apply(replacement),
            })
            .collect();

        Ok(Self {
            source: source.to_string(),
            replacement: replacement.to_string(),
            pattern,
            rules,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Casing class of one matched span.
    pub fn classify(&self, matched: &str) -> CaseClass {
        self.rules
            .iter()
            .find(|rule| rule.source == matched)
            .map(|rule| rule.class)
            .unwrap_or(CaseClass::FALLBACK)
    }

    /// Replacement form to emit for one matched span.
    pub fn replacement_for(&self, matched: &str) -> Cow<'_, str> {
        let class = self.classify(matched);
        match self.rules.iter().find(|rule| rule.class == class) {
            Some(rule) => Cow::Borrowed(rule.replacement.as_str()),
            None => Cow::Owned(class.apply(&self.replacement)),
        }
    }

    /// Substitute every whole-word occurrence in `text`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.apply_counted(text).0
    }

    /// Like [`apply`](Self::apply), also returning the number of spans replaced.
    pub fn apply_counted<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut count = 0usize;
        let out = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            count += 1;
            self.replacement_for(&caps[0]).into_owned()
        });
        (out, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yale() -> Substitution {
        Substitution::new("Yale", "Fale").unwrap()
    }

    #[test]
    fn three_casing_classes_map_to_matching_forms() {
        let sub = yale();
        assert_eq!(sub.apply("YALE"), "FALE");
        assert_eq!(sub.apply("Yale"), "Fale");
        assert_eq!(sub.apply("yale"), "fale");
    }

    #[test]
    fn mixed_case_falls_back_to_lowercase() {
        let sub = yale();
        assert_eq!(sub.classify("yAle"), CaseClass::Lower);
        assert_eq!(sub.classify("YaLE"), CaseClass::Lower);
        assert_eq!(sub.apply("yAle and YaLE"), "fale and fale");
    }

    #[test]
    fn classification_follows_precedence() {
        let sub = yale();
        assert_eq!(sub.classify("YALE"), CaseClass::Upper);
        assert_eq!(sub.classify("Yale"), CaseClass::Capitalized);
        assert_eq!(sub.classify("yale"), CaseClass::Lower);

        // A one-letter term has identical upper and capitalized forms; upper wins.
        let single = Substitution::new("a", "b").unwrap();
        assert_eq!(single.classify("A"), CaseClass::Upper);
        assert_eq!(single.apply("A or a"), "B or b");
    }

    #[test]
    fn only_whole_words_match() {
        let sub = yale();
        for text in ["Yalie", "Yalensis", "Yalevision", "NewYale", "Yale_Law", "Yale2024"] {
            assert!(matches!(sub.apply(text), Cow::Borrowed(_)));
        }
        assert_eq!(sub.apply("YALE's Yale-educated (yale)"), "FALE's Fale-educated (fale)");
    }

    #[test]
    fn non_ascii_letters_bound_words() {
        let sub = yale();
        assert_eq!(sub.apply("éYale Yaleé"), "éFale Faleé");
        assert_eq!(sub.apply("Ünï-YALE-ß"), "Ünï-FALE-ß");
    }

    #[test]
    fn untouched_text_is_borrowed() {
        let sub = yale();
        let (out, count) = sub.apply_counted("Harvard and Princeton");
        assert!(matches!(out, Cow::Borrowed("Harvard and Princeton")));
        assert_eq!(count, 0);
    }

    #[test]
    fn counts_each_replaced_span() {
        let (out, count) = yale().apply_counted("Yale, yale, YALE, Yalie");
        assert_eq!(out, "Fale, fale, FALE, Yalie");
        assert_eq!(count, 3);
    }

    #[test]
    fn replacement_casing_is_normalised_per_class() {
        let sub = Substitution::new("yale", "mcFALE").unwrap();
        assert_eq!(sub.source(), "yale");
        assert_eq!(sub.replacement(), "mcFALE");
        assert_eq!(sub.apply("Yale"), "Mcfale");
        assert_eq!(sub.apply("YALE"), "MCFALE");
        assert_eq!(sub.apply("yale"), "mcfale");
    }

    #[test]
    fn regex_metacharacters_in_terms_are_literal() {
        let sub = Substitution::new("a.b", "x").unwrap();
        assert_eq!(sub.apply("axb"), "axb");
        assert_eq!(sub.apply("see a.b here"), "see x here");
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(
            Substitution::new("  ", "Fale"),
            Err(SubstitutionError::EmptySource)
        ));
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(CaseClass::Capitalized.apply(""), "");
        assert_eq!(CaseClass::Capitalized.apply("éCOLE"), "École");
    }
}

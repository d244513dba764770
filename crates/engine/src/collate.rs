//! Locale-aware string ordering.
//!
//! Strings are compared in three passes, like a collator would: base letters
//! first (accents and case ignored), then accents, then case with lowercase
//! first. `"cafe" < "café" < "Café" < "cafes"`.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

fn base_letters(input: &str) -> impl Iterator<Item = char> + '_ {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn with_accents(input: &str) -> impl Iterator<Item = char> + '_ {
    input.nfkd().flat_map(char::to_lowercase)
}

fn case_weights(input: &str) -> impl Iterator<Item = u8> + '_ {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| u8::from(ch.is_uppercase()))
}

/// Compares two strings the way a human-facing sorted table expects.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| with_accents(a).cmp(with_accents(b)))
        .then_with(|| case_weights(a).cmp(case_weights(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_do_not_outrank_letters() {
        assert_eq!(compare("éclair", "eclipse"), Ordering::Less);
        assert_eq!(compare("Zucchero", "ápice"), Ordering::Greater);
    }

    #[test]
    fn case_is_a_tie_breaker_only() {
        assert_eq!(compare("affitto", "Affitto"), Ordering::Less);
        assert_eq!(compare("Affitto", "alimentazione"), Ordering::Less);
        assert_eq!(compare("Salute", "Salute"), Ordering::Equal);
    }

    #[test]
    fn unaccented_before_accented() {
        assert_eq!(compare("cafe", "café"), Ordering::Less);
        assert_eq!(compare("café", "cafes"), Ordering::Less);
    }
}

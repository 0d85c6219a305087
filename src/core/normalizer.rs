/// Text normalization
///
/// Turns an extracted body into the character stream that gets counted:
/// excluded characters are dropped, the rest is lowercased and a fixed set of
/// accented letters is folded to its base letter.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// ASCII punctuation, same set as C's `ispunct` in the "C" locale
pub const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Control characters and spaces that never count as content
pub const EXCLUDED_WHITESPACE: &str = "\n\t\r \u{00A0}\u{2002}\u{2003}\u{2004}\u{2005}\u{2006}\u{2007}\u{2008}\u{2009}\u{200A}\u{2028}\u{2029}\u{3000}";

lazy_static! {
    static ref EXCLUDED: HashSet<char> = ASCII_PUNCTUATION
        .chars()
        .chain(EXCLUDED_WHITESPACE.chars())
        .collect();
}

/// Whether a character is dropped by the exclusion filter
pub fn is_excluded(c: char) -> bool {
    EXCLUDED.contains(&c)
}

/// Simple one-to-one lowercase mapping.
///
/// Characters whose lowercase form expands to more than one character
/// (e.g. U+0130) are returned unchanged.
pub fn to_lower(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Fold an accented vowel or ñ to its unaccented base letter.
///
/// Only this closed table is applied; any other character (ô, ç, à...) is
/// returned as is.
pub fn fold_accent(c: char) -> char {
    match c {
        'á' | 'ä' => 'a',
        'é' | 'ë' => 'e',
        'í' | 'ï' => 'i',
        'ó' | 'ö' => 'o',
        'ú' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Normalize text for counting.
///
/// Stages run in order: exclusion filter, lowercase, accent folding.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !is_excluded(*c))
        .map(to_lower)
        .map(fold_accent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_table() {
        assert_eq!(normalize("Árbol Ñoño"), "arbolnono");
        assert_eq!(normalize("áéíóúñäëïöü"), "aeiounaeiou");
        assert_eq!(normalize("ÁÉÍÓÚÑÄËÏÖÜ"), "aeiounaeiou");
    }

    #[test]
    fn test_unlisted_accents_pass_through() {
        assert_eq!(normalize("Ôç à"), "ôçà");
    }

    #[test]
    fn test_exclusion_set() {
        assert_eq!(normalize("Hello, World!\n\t\r"), "helloworld");
        assert_eq!(normalize("a\u{00A0}b\u{2009}c\u{3000}d\u{2028}e"), "abcde");
        // Punctuation outside the ASCII set is content
        assert_eq!(normalize("«¿Qué?»"), "«¿que»");
        assert_eq!(normalize("—…"), "—…");
    }

    #[test]
    fn test_digits_and_other_scripts_kept() {
        assert_eq!(normalize("Год 1917"), "год1917");
        assert_eq!(normalize("日本語"), "日本語");
    }

    #[test]
    fn test_expanding_lowercase_kept() {
        // U+0130 lowercases to "i\u{307}", which is not a simple mapping
        assert_eq!(normalize("\u{0130}"), "\u{0130}");
    }

    #[test]
    fn test_no_excluded_chars_in_output() {
        let samples = [
            "The \"quick\" brown fox; jumps_over {the} lazy-dog.\r\n",
            "\u{2002}\u{2003}\u{2004}\u{2005}\u{2006}\u{2007}\u{2008}\u{200A}\u{2029}",
            ASCII_PUNCTUATION,
            EXCLUDED_WHITESPACE,
        ];

        for sample in samples {
            let normalized = normalize(sample);
            assert!(
                !normalized.chars().any(is_excluded),
                "excluded character left in {:?}",
                normalized
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = ["Árbol Ñoño", "ÜBER straße", "Σίσυφος", "\u{0130}stanbul!", ""];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }
}

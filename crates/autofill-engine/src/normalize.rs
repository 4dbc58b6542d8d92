//! Text normalization shared by the detector, matcher and filler.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a scraped question label.
///
/// Lowercases, folds typographic apostrophes, drops required-field stars,
/// collapses whitespace and strips trailing `:` / `?` punctuation. Plain
/// apostrophes are kept since variants such as `date d'examen` contain them.
pub fn normalize_label(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02bc}' => '\'',
            '*' => ' ',
            c => c,
        })
        .collect::<String>()
        .to_lowercase();
    let collapsed = WHITESPACE.replace_all(folded.trim(), " ");
    collapsed
        .trim_end_matches(|c: char| c == ':' || c == '?' || c.is_whitespace())
        .to_string()
}

/// Canonical decomposition with combining marks removed.
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Lowercase, trim and strip diacritics, for comparing option labels.
pub fn normalize_option(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = strip_diacritics(&lowered);
    WHITESPACE.replace_all(&stripped, " ").into_owned()
}

/// Replace the accented letters used in exam names by their base letter.
///
/// Cheaper than [`strip_diacritics`] and limited to the French letters that
/// show up in checkbox labels.
pub fn fold_accents(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' | 'ä' => 'a',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

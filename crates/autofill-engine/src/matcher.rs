//! Fuzzy matching of question labels against dictionary keys.

use autofill_config::MatcherConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::dictionary::FlatDictionary;
use crate::profile::ProfileValue;

static WORD_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_,().!]+").expect("valid regex"));

/// Winning dictionary entry for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub key: String,
    pub value: ProfileValue,
    pub score: f64,
}

/// Scores question labels against dictionary keys.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    min_score: f64,
    keyword_categories: Vec<(String, Vec<String>)>,
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new(&MatcherConfig::default())
    }
}

impl FieldMatcher {
    pub fn new(config: &MatcherConfig) -> Self {
        let keyword_categories = config
            .keyword_categories
            .iter()
            .map(|(name, words)| {
                (
                    name.to_lowercase(),
                    words.iter().map(|w| w.to_lowercase()).collect(),
                )
            })
            .collect();
        Self {
            min_score: config.min_score,
            keyword_categories,
        }
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Similarity of `question` and `key` in `[0, 1]`.
    ///
    /// In order: exact equality (1.0), key inside question (at most 0.95,
    /// higher for keys covering more of the question), question inside key
    /// (0.8, only for questions longer than three characters), keyword
    /// category cues (0.85), then word overlap.
    pub fn score(&self, question: &str, key: &str) -> f64 {
        let question = question.trim().to_lowercase();
        let key = key.trim().to_lowercase();
        if question.is_empty() || key.is_empty() {
            return 0.0;
        }
        if question == key {
            return 1.0;
        }

        let question_len = question.chars().count();
        let key_len = key.chars().count();

        if question.contains(&key) {
            return (0.6 + (key_len as f64 / question_len as f64) * 0.35).min(0.95);
        }
        if key.contains(&question) && question_len > 3 {
            return 0.8;
        }
        if self.has_keyword_cues(&question, &key) {
            return 0.85;
        }
        word_score(&question, &key)
    }

    /// A key that names a keyword category matches a question carrying at
    /// least two of that category's keywords.
    fn has_keyword_cues(&self, question: &str, key: &str) -> bool {
        self.keyword_categories.iter().any(|(name, keywords)| {
            let key_in_category = key.contains(name.as_str()) || keywords.iter().any(|w| key.contains(w.as_str()));
            key_in_category && keywords.iter().filter(|w| question.contains(w.as_str())).count() >= 2
        })
    }

    /// Best entry scoring at least `min_score`; the first one wins ties.
    pub fn find_best_match(&self, question: &str, dictionary: &FlatDictionary) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for (key, value) in dictionary.iter() {
            let score = self.score(question, key);
            if score < self.min_score {
                continue;
            }
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(MatchResult {
                    key: key.to_string(),
                    value: value.clone(),
                    score,
                });
            }
        }
        if let Some(found) = &best {
            trace!(question, key = %found.key, score = found.score, "fuzzy match");
        }
        best
    }

    /// Direct lookup of the lowercased, trimmed question.
    pub fn exact_lookup(&self, question: &str, dictionary: &FlatDictionary) -> Option<MatchResult> {
        let key = question.trim().to_lowercase();
        dictionary.get(&key).map(|value| MatchResult {
            key,
            value: value.clone(),
            score: 1.0,
        })
    }
}

fn words(text: &str) -> Vec<&str> {
    WORD_SPLIT
        .split(text)
        .filter(|w| w.chars().count() > 2)
        .collect()
}

fn related(a: &str, b: &str) -> bool {
    a == b || a.contains(b) || b.contains(a)
}

fn word_score(question: &str, key: &str) -> f64 {
    let question_words = words(question);
    let key_words = words(key);
    if question_words.is_empty() || key_words.is_empty() {
        return 0.0;
    }

    let matching = question_words
        .iter()
        .filter(|q| key_words.iter().any(|k| related(q, k)))
        .count();
    let covered = key_words
        .iter()
        .filter(|k| question_words.iter().any(|q| related(q, k)))
        .count();

    let word_score = matching as f64 / question_words.len().max(key_words.len()) as f64;
    let key_word_score = covered as f64 / key_words.len() as f64;
    0.4 * word_score + 0.6 * key_word_score
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;

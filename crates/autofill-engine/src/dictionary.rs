//! Flat dictionary construction.
//!
//! A profile is expanded into a map from every known label variant to the
//! value that should be typed, ticked or selected for it. The dictionary is
//! rebuilt wholesale whenever the profile changes and never patched in place.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::mappings::{exam_full_name, EXAM_TYPE_FULL_VARIANTS, FIELD_MAPPINGS, SIGNATURE_VARIANTS};
use crate::normalize::strip_diacritics;
use crate::profile::{Profile, ProfileValue};

/// Insertion-ordered variant → value map.
///
/// Re-inserting a key replaces its value but keeps its original position,
/// so iteration order is the order in which keys were first declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatDictionary {
    entries: Vec<(String, ProfileValue)>,
    index: HashMap<String, usize>,
}

impl FlatDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ProfileValue) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ProfileValue> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProfileValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for FlatDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// An enriched profile and the dictionary built from it.
///
/// Built in one go and shared behind an `Arc`; a profile update builds a new
/// context and swaps it in.
#[derive(Debug, Clone, Default)]
pub struct ProfileContext {
    profile: Profile,
    dictionary: FlatDictionary,
}

impl ProfileContext {
    pub fn new(profile: &Profile) -> Self {
        let (profile, dictionary) = build_dictionary(profile);
        Self {
            profile,
            dictionary,
        }
    }

    /// The profile, including derived fields such as `choices.examTypesFull`.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn dictionary(&self) -> &FlatDictionary {
        &self.dictionary
    }

    pub fn has_data(&self) -> bool {
        !self.profile.is_empty()
    }
}

/// Canonical gender token for a raw value, if it is a known spelling.
pub fn canonical_gender(raw: &str) -> Option<&'static str> {
    let key = strip_diacritics(raw.trim()).to_lowercase();
    match key.as_str() {
        "feminin" | "female" | "f" | "femme" => Some("femme"),
        "masculin" | "male" | "m" | "homme" => Some("homme"),
        _ => None,
    }
}

fn normalize_gender(value: ProfileValue) -> ProfileValue {
    match &value {
        ProfileValue::Text(raw) => match canonical_gender(raw) {
            Some(token) => ProfileValue::Text(token.to_string()),
            None => value,
        },
        _ => value,
    }
}

fn insert_variants(dictionary: &mut FlatDictionary, variants: &[&str], value: &ProfileValue) {
    if value.is_blank() {
        return;
    }
    for variant in variants {
        dictionary.insert(*variant, value.clone());
    }
}

/// Expand a profile into its flat dictionary.
///
/// Returns the enriched profile next to the dictionary: a list of exam codes
/// in `choices.examTypes` adds `choices.examTypesFull` with the full names.
/// A profile without personal data yields an empty dictionary.
pub fn build_dictionary(profile: &Profile) -> (Profile, FlatDictionary) {
    let mut enriched = profile.clone();
    let mut dictionary = FlatDictionary::new();

    if profile.is_empty() {
        debug!("Profile has no personal data, dictionary left empty");
        return (enriched, dictionary);
    }

    for mapping in FIELD_MAPPINGS {
        for field in mapping.fields {
            let Some(value) = enriched.get(mapping.category, field.field_type).cloned() else {
                continue;
            };

            if mapping.category == "choices" && field.field_type == "examTypes" {
                if let ProfileValue::List(codes) = &value {
                    let full: Vec<String> = codes
                        .iter()
                        .map(|code| {
                            exam_full_name(code)
                                .map(str::to_string)
                                .unwrap_or_else(|| code.clone())
                        })
                        .collect();
                    enriched.set("choices", "examTypesFull", full.clone());
                    insert_variants(&mut dictionary, field.variants, &value);
                    insert_variants(
                        &mut dictionary,
                        EXAM_TYPE_FULL_VARIANTS,
                        &ProfileValue::List(full),
                    );
                    continue;
                }
            }

            let value = if matches!(mapping.category, "personal" | "choices")
                && matches!(field.field_type, "sex" | "gender")
            {
                normalize_gender(value)
            } else {
                value
            };
            insert_variants(&mut dictionary, field.variants, &value);
        }
    }

    let full_name = enriched
        .get("personal", "fullName")
        .cloned()
        .unwrap_or_else(|| ProfileValue::Text(String::new()));
    for variant in SIGNATURE_VARIANTS {
        dictionary.insert(*variant, full_name.clone());
    }

    debug!(entries = dictionary.len(), "Built flat dictionary");
    (enriched, dictionary)
}

#[cfg(test)]
#[path = "dictionary_tests.rs"]
mod tests;

//! Profile model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields of one profile category, keyed by field type (`firstName`, `examTypes`, ...).
pub type Section = BTreeMap<String, ProfileValue>;

/// Category names, in profile order.
pub const CATEGORIES: [&str; 11] = [
    "personal",
    "contact",
    "location",
    "documents",
    "family",
    "languages",
    "professional",
    "medical",
    "dates",
    "misc",
    "choices",
];

/// A single profile value.
///
/// Untagged so profile JSON reads naturally: `null`, `true`, `42`, `"text"`
/// or `["CE", "EO"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl ProfileValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ProfileValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ProfileValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Null, or text that is empty after trimming.
    ///
    /// Lists, booleans and numbers are never blank, even when empty or false.
    pub fn is_blank(&self) -> bool {
        match self {
            ProfileValue::Null => true,
            ProfileValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ProfileValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileValue::Null => Ok(()),
            ProfileValue::Bool(b) => write!(f, "{}", b),
            ProfileValue::Number(n) => write!(f, "{}", n),
            ProfileValue::Text(s) => f.write_str(s),
            ProfileValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for ProfileValue {
    fn from(value: &str) -> Self {
        ProfileValue::Text(value.to_string())
    }
}

impl From<String> for ProfileValue {
    fn from(value: String) -> Self {
        ProfileValue::Text(value)
    }
}

impl From<bool> for ProfileValue {
    fn from(value: bool) -> Self {
        ProfileValue::Bool(value)
    }
}

impl From<Vec<String>> for ProfileValue {
    fn from(value: Vec<String>) -> Self {
        ProfileValue::List(value)
    }
}

impl From<Vec<&str>> for ProfileValue {
    fn from(value: Vec<&str>) -> Self {
        ProfileValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// A person's data, grouped in eleven fixed categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub personal: Section,
    pub contact: Section,
    pub location: Section,
    pub documents: Section,
    pub family: Section,
    pub languages: Section,
    pub professional: Section,
    pub medical: Section,
    pub dates: Section,
    pub misc: Section,
    pub choices: Section,
}

impl Profile {
    /// A profile without personal data counts as "no data loaded".
    pub fn is_empty(&self) -> bool {
        self.personal.is_empty()
    }

    pub fn section(&self, category: &str) -> Option<&Section> {
        Some(match category {
            "personal" => &self.personal,
            "contact" => &self.contact,
            "location" => &self.location,
            "documents" => &self.documents,
            "family" => &self.family,
            "languages" => &self.languages,
            "professional" => &self.professional,
            "medical" => &self.medical,
            "dates" => &self.dates,
            "misc" => &self.misc,
            "choices" => &self.choices,
            _ => return None,
        })
    }

    pub fn section_mut(&mut self, category: &str) -> Option<&mut Section> {
        Some(match category {
            "personal" => &mut self.personal,
            "contact" => &mut self.contact,
            "location" => &mut self.location,
            "documents" => &mut self.documents,
            "family" => &mut self.family,
            "languages" => &mut self.languages,
            "professional" => &mut self.professional,
            "medical" => &mut self.medical,
            "dates" => &mut self.dates,
            "misc" => &mut self.misc,
            "choices" => &mut self.choices,
            _ => return None,
        })
    }

    pub fn get(&self, category: &str, field: &str) -> Option<&ProfileValue> {
        self.section(category)?.get(field)
    }

    /// Text value of a field, if it is text.
    pub fn text(&self, category: &str, field: &str) -> Option<&str> {
        self.get(category, field)?.as_text()
    }

    /// List value of a field, if it is a list.
    pub fn list(&self, category: &str, field: &str) -> Option<&[String]> {
        self.get(category, field)?.as_list()
    }

    /// Set a field; unknown categories are ignored and reported as `false`.
    pub fn set(&mut self, category: &str, field: &str, value: impl Into<ProfileValue>) -> bool {
        match self.section_mut(category) {
            Some(section) => {
                section.insert(field.to_string(), value.into());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile() {
        let json = r#"{
            "personal": {"firstName": "Marie", "age": 34, "married": false, "middleName": null},
            "choices": {"examTypes": ["CE", "EO"]}
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.text("personal", "firstName"), Some("Marie"));
        assert!(matches!(
            profile.get("personal", "age"),
            Some(ProfileValue::Number(_))
        ));
        assert_eq!(
            profile.get("personal", "married"),
            Some(&ProfileValue::Bool(false))
        );
        assert_eq!(
            profile.get("personal", "middleName"),
            Some(&ProfileValue::Null)
        );
        assert_eq!(
            profile.list("choices", "examTypes"),
            Some(&["CE".to_string(), "EO".to_string()][..])
        );
        assert!(profile.contact.is_empty());
    }

    #[test]
    fn test_is_empty_depends_on_personal() {
        let mut profile = Profile::default();
        assert!(profile.is_empty());
        profile.set("contact", "email", "marie@example.com");
        assert!(profile.is_empty());
        profile.set("personal", "lastName", "Dupont");
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_unknown_category() {
        let mut profile = Profile::default();
        assert!(profile.section("hobbies").is_none());
        assert!(!profile.set("hobbies", "music", "jazz"));
    }

    #[test]
    fn test_every_category_is_addressable() {
        let profile = Profile::default();
        for category in CATEGORIES {
            assert!(profile.section(category).is_some(), "{category}");
        }
    }

    #[test]
    fn test_blank_values() {
        assert!(ProfileValue::Null.is_blank());
        assert!(ProfileValue::from("   ").is_blank());
        assert!(!ProfileValue::from("x").is_blank());
        assert!(!ProfileValue::Bool(false).is_blank());
        assert!(!ProfileValue::List(Vec::new()).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProfileValue::from(vec!["CE", "EO"]).to_string(), "CE, EO");
        assert_eq!(ProfileValue::Bool(true).to_string(), "true");
        assert_eq!(ProfileValue::Null.to_string(), "");
    }
}

//! Field-keyed validation messages for the active step.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maps a field or slot identifier to a human-readable message.
///
/// Insertion order follows the order fields are checked, which is the order they render in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, String>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_id: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field_id.into(), message.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.0.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.0.contains_key(field_id)
    }

    /// Drops a single entry, keeping the rest in place.
    pub fn clear_field(&mut self, field_id: &str) -> bool {
        self.0.shift_remove(field_id).is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl FromIterator<(String, String)> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_one_field_preserves_order_of_the_rest() {
        let mut errors = ErrorMap::new();
        errors.insert("childName", "اسم الطفل مطلوب.");
        errors.insert("childBirthDate", "تاريخ الميلاد مطلوب.");
        errors.insert("childGender", "النوع مطلوب.");

        assert!(errors.clear_field("childBirthDate"));
        assert!(!errors.clear_field("childBirthDate"));

        let remaining: Vec<_> = errors.field_ids().collect();
        assert_eq!(remaining, vec!["childName", "childGender"]);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut errors = ErrorMap::new();
        errors.insert("cover", "صورة الغلاف مطلوب.");

        let json = serde_json::to_value(&errors).expect("serialize errors");
        assert_eq!(json, serde_json::json!({"cover": "صورة الغلاف مطلوب."}));
    }
}

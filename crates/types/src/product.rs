//! Product schema definitions.
//!
//! A [`ProductSchema`] is loaded once per catalog and never mutated by the wizard. Text fields
//! and image slots keep their authoring order because step planning partitions them by
//! position.

pub mod validation;

use std::ops::Range;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use self::validation::TextFieldValidation;

/// Data-described definition of one configurable product variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductSchema {
    /// Unique product key; also selects the step sequencing variant.
    pub key: String,
    /// Optional display title for menus and summaries.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether a printed edition exists. When false only electronic delivery is offered.
    #[serde(default)]
    pub has_printed_version: bool,
    /// Free-text fields in authoring order.
    #[serde(default)]
    pub text_fields: Vec<TextFieldDefinition>,
    /// Image upload slots in authoring order.
    #[serde(default)]
    pub image_slots: Vec<ImageSlotDefinition>,
    /// Governs the goal/value selector.
    #[serde(default)]
    pub goal_config: GoalConfig,
    /// Predefined goals offered by the selector.
    #[serde(default)]
    pub goal_options: Vec<GoalOption>,
    /// Whether the product can be purchased as an add-on to another product.
    #[serde(default)]
    pub is_addon: bool,
    /// Add-on keys offered with this product. Empty offers every add-on in the catalog.
    #[serde(default)]
    pub compatible_addons: Vec<String>,
    /// Price of the electronic edition.
    #[serde(default)]
    pub price_electronic: Option<Decimal>,
    /// Price of the printed edition.
    #[serde(default)]
    pub price_printed: Option<Decimal>,
}

impl ProductSchema {
    /// Human-friendly title, falling back to the key.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|title| !title.trim().is_empty()).unwrap_or(&self.key)
    }

    /// Looks up a text field by identifier.
    pub fn text_field(&self, field_id: &str) -> Option<&TextFieldDefinition> {
        self.text_fields.iter().find(|field| field.id == field_id)
    }

    /// Looks up an image slot by identifier.
    pub fn image_slot(&self, slot_id: &str) -> Option<&ImageSlotDefinition> {
        self.image_slots.iter().find(|slot| slot.id == slot_id)
    }

    /// The slot whose upload drives the live preview: the first required slot.
    pub fn primary_image_slot(&self) -> Option<&ImageSlotDefinition> {
        self.image_slots.iter().find(|slot| slot.required)
    }

    /// Text fields whose positions fall inside `range`, clamped to the schema.
    pub fn text_fields_in(&self, range: Range<usize>) -> &[TextFieldDefinition] {
        let end = range.end.min(self.text_fields.len());
        let start = range.start.min(end);
        &self.text_fields[start..end]
    }

    /// Whether the goal selector accepts a free-text custom goal.
    pub fn allows_custom_goal(&self) -> bool {
        matches!(self.goal_config, GoalConfig::PredefinedOrCustom)
    }
}

/// A single free-text input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFieldDefinition {
    pub id: String,
    /// Label shown next to the input. Authors may suffix required labels with `*`.
    pub label: String,
    #[serde(default)]
    pub input_kind: TextInputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Declarative constraints checked once a value is present.
    #[serde(default)]
    pub validate: Option<TextFieldValidation>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextInputKind {
    #[default]
    Text,
    Multiline,
}

/// An image upload slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageSlotDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

/// Controls whether the goal/value selector applies and whether a custom goal is accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalConfig {
    /// No goal selector.
    #[default]
    None,
    /// One of the predefined goals must be chosen.
    Predefined,
    /// A predefined goal or a free-text custom goal must be chosen.
    PredefinedOrCustom,
}

/// One predefined goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalOption {
    pub key: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_with_slots(slots: Vec<ImageSlotDefinition>) -> ProductSchema {
        ProductSchema {
            key: "story".into(),
            title: None,
            has_printed_version: true,
            text_fields: (0..3)
                .map(|index| TextFieldDefinition {
                    id: format!("field_{index}"),
                    label: format!("Field {index}"),
                    input_kind: TextInputKind::Text,
                    required: false,
                    placeholder: None,
                    validate: None,
                })
                .collect(),
            image_slots: slots,
            goal_config: GoalConfig::None,
            goal_options: Vec::new(),
            is_addon: false,
            compatible_addons: Vec::new(),
            price_electronic: None,
            price_printed: None,
        }
    }

    #[test]
    fn primary_slot_is_first_required_slot() {
        let schema = schema_with_slots(vec![
            ImageSlotDefinition { id: "cover".into(), label: "Cover".into(), required: false },
            ImageSlotDefinition { id: "face".into(), label: "Face".into(), required: true },
            ImageSlotDefinition { id: "pet".into(), label: "Pet".into(), required: true },
        ]);

        assert_eq!(schema.primary_image_slot().map(|slot| slot.id.as_str()), Some("face"));
    }

    #[test]
    fn text_field_ranges_are_clamped() {
        let schema = schema_with_slots(Vec::new());

        assert_eq!(schema.text_fields_in(0..4).len(), 3);
        assert_eq!(schema.text_fields_in(2..usize::MAX).len(), 1);
        assert!(schema.text_fields_in(8..11).is_empty());
    }

    #[test]
    fn deserializes_with_defaults() {
        let schema: ProductSchema = serde_yaml::from_str(
            r#"
key: gift_box
price_electronic: 120
text_fields:
  - id: dedication
    label: "Dedication *"
    required: true
"#,
        )
        .expect("parse schema");

        assert!(!schema.has_printed_version);
        assert_eq!(schema.goal_config, GoalConfig::None);
        assert_eq!(schema.price_electronic, Some(Decimal::from(120)));
        assert_eq!(schema.price_printed, None);
        assert_eq!(schema.display_title(), "gift_box");
        assert!(schema.text_field("dedication").is_some_and(|field| field.required));
    }
}

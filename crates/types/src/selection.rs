//! Mutable selection state collected by the wizard.
//!
//! The wizard controller is the only writer. Everything here is plain data so that the final
//! order payload can carry a snapshot of it verbatim.

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Error-map key for the child's display name.
pub const CHILD_NAME_FIELD: &str = "childName";
/// Error-map key for the child's birth date.
pub const CHILD_BIRTH_DATE_FIELD: &str = "childBirthDate";
/// Error-map key for the child's gender.
pub const CHILD_GENDER_FIELD: &str = "childGender";
/// Error-map key for the goal selector.
pub const GOAL_FIELD: &str = "goal";
/// Error-map key for the free-text custom goal.
pub const CUSTOM_GOAL_FIELD: &str = "customGoal";
/// Error-map key for the gift recipient's name.
pub const RECIPIENT_NAME_FIELD: &str = "recipientName";
/// Error-map key for the gift recipient's address.
pub const RECIPIENT_ADDRESS_FIELD: &str = "recipientAddress";
/// Error-map key for the gift recipient's phone.
pub const RECIPIENT_PHONE_FIELD: &str = "recipientPhone";
/// Error-map key for the shipping governorate.
pub const GOVERNORATE_FIELD: &str = "governorate";

/// Goal key that switches the selector into free-text mode.
pub const CUSTOM_GOAL_KEY: &str = "custom";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// A child profile belonging to the current account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChildProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Who the product is personalized for.
///
/// `profile_id` is set when the identity was copied from a saved profile; the inline fields are
/// always populated so validation and the order payload never need the profile store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChildIdentity {
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl ChildIdentity {
    /// Copies a saved profile into an identity, overwriting any inline entry.
    pub fn from_profile(profile: &ChildProfile) -> Self {
        Self {
            profile_id: Some(profile.id.clone()),
            name: profile.name.clone(),
            birth_date: profile.birth_date,
            gender: profile.gender,
        }
    }

    pub fn is_profile_backed(&self) -> bool {
        self.profile_id.is_some()
    }
}

/// Goal/value choice. `chosen_key` is empty until the buyer picks something.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GoalSelection {
    #[serde(default)]
    pub chosen_key: String,
    #[serde(default)]
    pub custom_text: String,
}

impl GoalSelection {
    pub fn is_custom(&self) -> bool {
        self.chosen_key == CUSTOM_GOAL_KEY
    }
}

/// Opaque handle to a file chosen by the buyer. The wizard never reads the bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileHandle {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Printed,
    Electronic,
}

/// Who receives a printed order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingOption {
    /// Shipped to the buyer.
    #[default]
    #[serde(rename = "self")]
    SelfDelivery,
    /// Shipped to a gift recipient; recipient details become required.
    Gift,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShippingSelection {
    #[serde(default)]
    pub option: ShippingOption,
    #[serde(default)]
    pub governorate: Option<String>,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_address: String,
    #[serde(default)]
    pub recipient_phone: String,
}

/// Everything the buyer has chosen for one product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub child_identity: ChildIdentity,
    pub free_text_values: IndexMap<String, String>,
    pub goal_selection: GoalSelection,
    pub image_files: IndexMap<String, FileHandle>,
    pub selected_addon_keys: IndexSet<String>,
    pub delivery_type: DeliveryType,
    pub shipping_selection: ShippingSelection,
}

impl SelectionState {
    /// Empty selection with the given delivery type.
    pub fn new(delivery_type: DeliveryType) -> Self {
        Self {
            child_identity: ChildIdentity::default(),
            free_text_values: IndexMap::new(),
            goal_selection: GoalSelection::default(),
            image_files: IndexMap::new(),
            selected_addon_keys: IndexSet::new(),
            delivery_type,
            shipping_selection: ShippingSelection::default(),
        }
    }

    /// Current value of a free-text field, empty when never set.
    pub fn text_value(&self, field_id: &str) -> &str {
        self.free_text_values.get(field_id).map(String::as_str).unwrap_or("")
    }

    pub fn is_printed(&self) -> bool {
        self.delivery_type == DeliveryType::Printed
    }
}

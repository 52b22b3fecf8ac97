//! Error types for wizard construction and navigation.
//!
//! Validation failures are not errors: they come back as an [`ErrorMap`](qissa_types::ErrorMap).
//! The variants here cover misuse of the controller and configuration problems that must stop
//! the flow instead of producing a malformed order.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("no product schema found for key '{product_key}'")]
    UnknownProduct { product_key: String },

    #[error("step planner produced no steps for product '{product_key}'")]
    EmptyPlan { product_key: String },

    #[error("unknown step '{step_key}' for product '{product_key}'")]
    UnknownStep { step_key: String, product_key: String },

    #[error("wizard has not been started")]
    NotStarted,

    #[error("wizard has already been started")]
    AlreadyStarted,

    #[error("wizard has already been submitted")]
    AlreadySubmitted,

    #[error("unknown child profile '{profile_id}'")]
    UnknownProfile { profile_id: String },

    #[error("unknown field '{field_id}' for product '{product_key}'")]
    UnknownField { field_id: String, product_key: String },

    #[error("unknown image slot '{slot_id}' for product '{product_key}'")]
    UnknownImageSlot { slot_id: String, product_key: String },

    #[error("add-on '{addon_key}' is not offered with product '{product_key}'")]
    AddonNotOffered { addon_key: String, product_key: String },

    #[error("printed delivery is not available for product '{product_key}'")]
    DeliveryUnavailable { product_key: String },

    #[error("unknown governorate '{name}'")]
    UnknownGovernorate { name: String },

    #[error("selected add-on '{addon_key}' is missing from the add-on catalog")]
    UnresolvedAddon { addon_key: String },
}

impl WizardError {
    pub fn unknown_product(product_key: impl Into<String>) -> Self {
        Self::UnknownProduct {
            product_key: product_key.into(),
        }
    }

    pub fn unknown_step(step_key: impl Into<String>, product_key: impl Into<String>) -> Self {
        Self::UnknownStep {
            step_key: step_key.into(),
            product_key: product_key.into(),
        }
    }

    pub fn unknown_field(field_id: impl Into<String>, product_key: impl Into<String>) -> Self {
        Self::UnknownField {
            field_id: field_id.into(),
            product_key: product_key.into(),
        }
    }

    pub fn unknown_image_slot(slot_id: impl Into<String>, product_key: impl Into<String>) -> Self {
        Self::UnknownImageSlot {
            slot_id: slot_id.into(),
            product_key: product_key.into(),
        }
    }

    pub fn addon_not_offered(addon_key: impl Into<String>, product_key: impl Into<String>) -> Self {
        Self::AddonNotOffered {
            addon_key: addon_key.into(),
            product_key: product_key.into(),
        }
    }
}

//! Strongly typed contracts shared by the Qissa wizard engine and its front ends.
//!
//! Product schemas describe what a buyer can personalize, the selection state captures what
//! they have entered so far, and the step, error, pricing, and order types describe what the
//! wizard hands back to the presentation layer and to checkout.

pub mod error_map;
pub mod order;
pub mod pricing;
pub mod product;
pub mod selection;
pub mod steps;

pub use error_map::ErrorMap;
pub use order::OrderPayload;
pub use pricing::{AddonPrice, GOVERNORATES, PriceBreakdown, PriceTables, is_known_governorate};
pub use product::validation::{TextFieldValidation, validate_text_value};
pub use product::{GoalConfig, GoalOption, ImageSlotDefinition, ProductSchema, TextFieldDefinition, TextInputKind};
pub use selection::{
    CHILD_BIRTH_DATE_FIELD, CHILD_GENDER_FIELD, CHILD_NAME_FIELD, CUSTOM_GOAL_FIELD, CUSTOM_GOAL_KEY, ChildIdentity,
    ChildProfile, DeliveryType, FileHandle, GOAL_FIELD, GOVERNORATE_FIELD, Gender, GoalSelection, RECIPIENT_ADDRESS_FIELD,
    RECIPIENT_NAME_FIELD, RECIPIENT_PHONE_FIELD, SelectionState, ShippingOption, ShippingSelection,
};
pub use steps::{FieldRange, StepDefinition};

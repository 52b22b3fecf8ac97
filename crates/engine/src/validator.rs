//! Per-step validation.
//!
//! The validator interprets a [`StepDefinition`] against the product schema: each `includes_*`
//! flag and the text-field range contribute their own checks. It never mutates the selection
//! and always returns a fresh [`ErrorMap`] covering only the fields on that step.

use qissa_types::{
    CHILD_BIRTH_DATE_FIELD, CHILD_GENDER_FIELD, CHILD_NAME_FIELD, CUSTOM_GOAL_FIELD, ErrorMap, GOAL_FIELD, GoalConfig,
    ProductSchema, RECIPIENT_ADDRESS_FIELD, RECIPIENT_NAME_FIELD, RECIPIENT_PHONE_FIELD, SelectionState, ShippingOption,
    StepDefinition, validate_text_value,
};
use qissa_util::{is_blank, required_message, strip_required_marker};

use crate::error::WizardError;
use crate::planner;

pub const CHILD_NAME_LABEL: &str = "اسم الطفل";
pub const CHILD_BIRTH_DATE_LABEL: &str = "تاريخ الميلاد";
pub const CHILD_GENDER_LABEL: &str = "النوع";
pub const GOAL_LABEL: &str = "الهدف";
pub const CUSTOM_GOAL_LABEL: &str = "الهدف المخصص";
pub const RECIPIENT_NAME_LABEL: &str = "اسم المستلم";
pub const RECIPIENT_ADDRESS_LABEL: &str = "عنوان المستلم";
pub const RECIPIENT_PHONE_LABEL: &str = "هاتف المستلم";

const GOAL_UNAVAILABLE_MESSAGE: &str = "الهدف المختار غير متاح.";

/// Validates the selection state visible on one step.
pub trait StepValidator {
    fn validate(&self, step: &StepDefinition, schema: &ProductSchema, selection: &SelectionState) -> ErrorMap;
}

/// Default validator that interprets the product schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaStepValidator;

impl StepValidator for SchemaStepValidator {
    fn validate(&self, step: &StepDefinition, schema: &ProductSchema, selection: &SelectionState) -> ErrorMap {
        validate_step(step, schema, selection)
    }
}

/// Validates a step by key, looking it up in the default plan for the product
/// ([`planner::plan`]). Callers with a custom [`StepPlanner`](crate::planner::StepPlanner) should
/// resolve the step themselves and call [`validate_step`].
///
/// An unknown step key is a caller bug and is reported as an error rather than an entry in the
/// returned map.
pub fn validate(step_key: &str, schema: &ProductSchema, selection: &SelectionState) -> Result<ErrorMap, WizardError> {
    let step = planner::plan(&schema.key)
        .into_iter()
        .find(|step| step.key == step_key)
        .ok_or_else(|| WizardError::unknown_step(step_key, &schema.key))?;
    Ok(validate_step(&step, schema, selection))
}

pub fn validate_step(step: &StepDefinition, schema: &ProductSchema, selection: &SelectionState) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if step.includes_child_identity {
        check_child_identity(selection, &mut errors);
    }
    if let Some(range) = step.field_range {
        check_text_fields(schema, range.resolve(schema.text_fields.len()), selection, &mut errors);
    }
    if step.includes_goal {
        check_goal(schema, selection, &mut errors);
    }
    if step.includes_images {
        check_images(schema, selection, &mut errors);
    }
    if step.includes_delivery {
        check_delivery(selection, &mut errors);
    }
    // the addons step has nothing required

    errors
}

fn check_child_identity(selection: &SelectionState, errors: &mut ErrorMap) {
    let identity = &selection.child_identity;
    if is_blank(&identity.name) {
        errors.insert(CHILD_NAME_FIELD, required_message(CHILD_NAME_LABEL));
    }
    if identity.birth_date.is_none() {
        errors.insert(CHILD_BIRTH_DATE_FIELD, required_message(CHILD_BIRTH_DATE_LABEL));
    }
    if identity.gender.is_none() {
        errors.insert(CHILD_GENDER_FIELD, required_message(CHILD_GENDER_LABEL));
    }
}

fn check_text_fields(
    schema: &ProductSchema, positions: std::ops::Range<usize>, selection: &SelectionState, errors: &mut ErrorMap,
) {
    for field in schema.text_fields_in(positions) {
        let value = selection.text_value(&field.id);
        if is_blank(value) {
            if field.required {
                errors.insert(field.id.clone(), required_message(&field.label));
            }
            continue;
        }
        if let Some(validation) = &field.validate
            && let Err(message) = validate_text_value(value, validation)
        {
            errors.insert(field.id.clone(), format!("{}: {}", strip_required_marker(&field.label), message));
        }
    }
}

fn check_goal(schema: &ProductSchema, selection: &SelectionState, errors: &mut ErrorMap) {
    if schema.goal_config == GoalConfig::None {
        return;
    }
    let goal = &selection.goal_selection;
    if is_blank(&goal.chosen_key) {
        errors.insert(GOAL_FIELD, required_message(GOAL_LABEL));
        return;
    }
    if goal.is_custom() {
        if !schema.allows_custom_goal() {
            errors.insert(GOAL_FIELD, GOAL_UNAVAILABLE_MESSAGE);
        } else if is_blank(&goal.custom_text) {
            errors.insert(CUSTOM_GOAL_FIELD, required_message(CUSTOM_GOAL_LABEL));
        }
        return;
    }
    let known_option = schema.goal_options.iter().any(|option| option.key == goal.chosen_key);
    if !schema.goal_options.is_empty() && !known_option {
        errors.insert(GOAL_FIELD, GOAL_UNAVAILABLE_MESSAGE);
    }
}

fn check_images(schema: &ProductSchema, selection: &SelectionState, errors: &mut ErrorMap) {
    for slot in schema.image_slots.iter().filter(|slot| slot.required) {
        if !selection.image_files.contains_key(&slot.id) {
            errors.insert(slot.id.clone(), required_message(&slot.label));
        }
    }
}

fn check_delivery(selection: &SelectionState, errors: &mut ErrorMap) {
    let shipping = &selection.shipping_selection;
    if !selection.is_printed() || shipping.option != ShippingOption::Gift {
        return;
    }
    let recipient_fields = [
        (RECIPIENT_NAME_FIELD, RECIPIENT_NAME_LABEL, &shipping.recipient_name),
        (RECIPIENT_ADDRESS_FIELD, RECIPIENT_ADDRESS_LABEL, &shipping.recipient_address),
        (RECIPIENT_PHONE_FIELD, RECIPIENT_PHONE_LABEL, &shipping.recipient_phone),
    ];
    for (field_id, label, value) in recipient_fields {
        if is_blank(value) {
            errors.insert(field_id, required_message(label));
        }
    }
}

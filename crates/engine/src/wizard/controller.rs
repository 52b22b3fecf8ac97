//! The stateful wizard controller.
//!
//! A controller is created per configuration session and owns the selection state outright.
//! Every operation runs to completion synchronously. Planning, validation, pricing, and preview
//! generation are delegated to the injected [`WizardCollaborators`]; the controller only sequences
//! them and enforces the transition guards:
//!
//! ```text
//! Idle --begin--> steps[0] --advance(valid)--> steps[1] ... steps[last] --advance(valid)--> Submitted
//!                    ^            |                                    \--submit(valid)--/
//!                    \--retreat---/   retreat at steps[0] => Exit
//! ```

use std::fmt;

use chrono::NaiveDate;
use qissa_types::{
    CHILD_BIRTH_DATE_FIELD, CHILD_GENDER_FIELD, CHILD_NAME_FIELD, CUSTOM_GOAL_FIELD, ChildIdentity, ChildProfile,
    DeliveryType, ErrorMap, FileHandle, GOAL_FIELD, GOVERNORATE_FIELD, Gender, OrderPayload, PriceBreakdown, PriceTables,
    ProductSchema, RECIPIENT_ADDRESS_FIELD, RECIPIENT_NAME_FIELD, RECIPIENT_PHONE_FIELD, SelectionState, ShippingOption,
    StepDefinition, is_known_governorate,
};
use tracing::{debug, info, warn};

use super::previews::{NoopPreviewGenerator, PreviewGenerator, PreviewHandle, PreviewTable};
use super::telemetry::{WizardEvent, WizardTelemetry};
use crate::catalog::{AddonCatalog, Catalog};
use crate::error::WizardError;
use crate::planner::{ProductStepPlanner, StepPlanner};
use crate::pricing::{PriceCalculator, TablePriceCalculator};
use crate::validator::{SchemaStepValidator, StepValidator};

/// Advisory shown once when `advance()` is blocked; field detail lives in the error map.
pub const REQUIRED_FIELDS_NOTICE: &str = "يرجى إكمال جميع الحقول المطلوبة.";

const IDENTITY_FIELDS: [&str; 3] = [CHILD_NAME_FIELD, CHILD_BIRTH_DATE_FIELD, CHILD_GENDER_FIELD];
const RECIPIENT_FIELDS: [&str; 3] = [RECIPIENT_NAME_FIELD, RECIPIENT_ADDRESS_FIELD, RECIPIENT_PHONE_FIELD];

/// Pure services and resource providers the controller delegates to.
pub struct WizardCollaborators {
    pub planner: Box<dyn StepPlanner>,
    pub validator: Box<dyn StepValidator>,
    pub calculator: Box<dyn PriceCalculator>,
    pub previews: Box<dyn PreviewGenerator>,
}

impl Default for WizardCollaborators {
    fn default() -> Self {
        Self {
            planner: Box::new(ProductStepPlanner),
            validator: Box::new(SchemaStepValidator),
            calculator: Box::new(TablePriceCalculator),
            previews: Box::new(NoopPreviewGenerator),
        }
    }
}

/// Account data the wizard may draw identities from.
#[derive(Debug, Clone, Default)]
pub struct AccountContext {
    /// Name of the signed-in account holder, used by "myself".
    pub account_name: Option<String>,
    /// Saved child profiles offered as selectable identities.
    pub child_profiles: Vec<ChildProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Idle,
    /// Index into the planned steps.
    Step(usize),
    Submitted,
}

/// Result of `advance()` and `submit()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { step_key: String },
    Blocked { step_key: String, errors: ErrorMap },
    Submitted(Box<OrderPayload>),
}

/// Result of `retreat()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetreatOutcome {
    Moved { step_key: String },
    /// Retreat from the first step: the caller should close the wizard.
    Exit,
}

pub struct WizardController {
    schema: ProductSchema,
    addon_catalog: AddonCatalog,
    price_tables: PriceTables,
    steps: Vec<StepDefinition>,
    phase: WizardPhase,
    selection: SelectionState,
    errors: ErrorMap,
    notice: Option<String>,
    account: AccountContext,
    previews: PreviewTable,
    collaborators: WizardCollaborators,
    telemetry: WizardTelemetry,
}

impl WizardController {
    /// Creates a controller with the default planner, validator, calculator, and preview generator.
    ///
    /// Fails when the catalog has no schema for `product_key`.
    pub fn new(product_key: &str, catalog: &Catalog, account: AccountContext) -> Result<Self, WizardError> {
        Self::with_collaborators(product_key, catalog, account, WizardCollaborators::default())
    }

    pub fn with_collaborators(
        product_key: &str, catalog: &Catalog, account: AccountContext, collaborators: WizardCollaborators,
    ) -> Result<Self, WizardError> {
        let schema = catalog
            .schema(product_key)
            .cloned()
            .ok_or_else(|| WizardError::unknown_product(product_key))?;
        let steps = collaborators.planner.plan(&schema.key);
        if steps.is_empty() {
            return Err(WizardError::EmptyPlan {
                product_key: schema.key.clone(),
            });
        }

        let delivery_type = if schema.has_printed_version {
            DeliveryType::Printed
        } else {
            DeliveryType::Electronic
        };

        Ok(Self {
            addon_catalog: catalog.addon_catalog(),
            price_tables: catalog.price_tables().clone(),
            steps,
            phase: WizardPhase::Idle,
            selection: SelectionState::new(delivery_type),
            errors: ErrorMap::new(),
            notice: None,
            account,
            previews: PreviewTable::new(),
            collaborators,
            telemetry: WizardTelemetry::default(),
            schema,
        })
    }

    /// Leaves `Idle` for the first step, seeding the identity from a pre-selected profile.
    pub fn begin(&mut self, preselected_profile: Option<&str>) -> Result<&StepDefinition, WizardError> {
        match self.phase {
            WizardPhase::Idle => {}
            WizardPhase::Step(_) => return Err(WizardError::AlreadyStarted),
            WizardPhase::Submitted => return Err(WizardError::AlreadySubmitted),
        }
        if let Some(profile_id) = preselected_profile {
            let identity = ChildIdentity::from_profile(self.find_profile(profile_id)?);
            self.selection.child_identity = identity;
        }

        self.phase = WizardPhase::Step(0);
        let step_key = self.steps[0].key.clone();
        info!(
            product = %self.schema.key,
            step = %step_key,
            steps = self.steps.len(),
            "Wizard started"
        );
        self.telemetry.record(WizardEvent::Started { step_key });
        Ok(&self.steps[0])
    }

    pub fn schema(&self) -> &ProductSchema {
        &self.schema
    }

    pub fn product_key(&self) -> &str {
        &self.schema.key
    }

    /// All planned steps, for progress rendering.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == WizardPhase::Submitted
    }

    pub fn current_step_index(&self) -> Option<usize> {
        match self.phase {
            WizardPhase::Step(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.current_step_index().map(|index| &self.steps[index])
    }

    pub fn current_step_key(&self) -> Option<&str> {
        self.current_step().map(|step| step.key.as_str())
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Errors for the active step from the last blocked transition, minus fields edited since.
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// The blocking advisory, if the last transition was blocked.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn telemetry(&self) -> &WizardTelemetry {
        &self.telemetry
    }

    pub fn preview_for(&self, slot_id: &str) -> Option<&PreviewHandle> {
        self.previews.get(slot_id)
    }

    /// Current price, recomputed from the selection on every call.
    pub fn price_breakdown(&self) -> PriceBreakdown {
        self.collaborators
            .calculator
            .compute(&self.schema, &self.addon_catalog, &self.price_tables, &self.selection)
    }

    pub fn available_delivery_types(&self) -> Vec<DeliveryType> {
        if self.schema.has_printed_version {
            vec![DeliveryType::Printed, DeliveryType::Electronic]
        } else {
            vec![DeliveryType::Electronic]
        }
    }

    pub fn available_addons(&self) -> Vec<&ProductSchema> {
        self.addon_catalog.offered_for(&self.schema)
    }

    /// Moves to the next step when the current one validates. On the last step this submits.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, WizardError> {
        let index = self.current_index()?;
        let errors = self.validate_step_at(index);
        if !errors.is_empty() {
            return Ok(self.block(index, errors));
        }
        if index + 1 == self.steps.len() {
            return self.submit();
        }

        let from = self.steps[index].key.clone();
        let to = self.steps[index + 1].key.clone();
        self.phase = WizardPhase::Step(index + 1);
        self.errors.clear();
        self.notice = None;
        debug!(product = %self.schema.key, from = %from, to = %to, "Wizard advanced");
        self.telemetry.record(WizardEvent::Advanced { from, to: to.clone() });
        Ok(AdvanceOutcome::Moved { step_key: to })
    }

    /// Moves back one step without validating.
    pub fn retreat(&mut self) -> Result<RetreatOutcome, WizardError> {
        let index = self.current_index()?;
        self.errors.clear();
        self.notice = None;
        if index == 0 {
            debug!(product = %self.schema.key, "Retreat from first step; exit requested");
            self.telemetry.record(WizardEvent::ExitRequested);
            return Ok(RetreatOutcome::Exit);
        }

        let from = self.steps[index].key.clone();
        let to = self.steps[index - 1].key.clone();
        self.phase = WizardPhase::Step(index - 1);
        debug!(product = %self.schema.key, from = %from, to = %to, "Wizard retreated");
        self.telemetry.record(WizardEvent::Retreated { from, to: to.clone() });
        Ok(RetreatOutcome::Moved { step_key: to })
    }

    /// Validates every step in order and produces the order payload.
    ///
    /// The first incomplete step becomes the current step and its errors are surfaced. A selected
    /// add-on that no longer resolves in the add-on catalog fails the submission outright.
    pub fn submit(&mut self) -> Result<AdvanceOutcome, WizardError> {
        let current = self.current_index()?;
        for index in 0..self.steps.len() {
            let errors = self.validate_step_at(index);
            if errors.is_empty() {
                continue;
            }
            if index != current {
                let from = self.steps[current].key.clone();
                let to = self.steps[index].key.clone();
                debug!(product = %self.schema.key, from = %from, to = %to, "Submission jumped to incomplete step");
                self.telemetry.record(WizardEvent::Jumped { from, to });
                self.phase = WizardPhase::Step(index);
            }
            return Ok(self.block(index, errors));
        }

        if let Some(addon_key) = self
            .selection
            .selected_addon_keys
            .iter()
            .find(|addon_key| self.addon_catalog.get(addon_key).is_none())
        {
            return Err(WizardError::UnresolvedAddon {
                addon_key: addon_key.clone(),
            });
        }

        let price_breakdown = self.price_breakdown();
        let total = price_breakdown.total;
        let payload = OrderPayload {
            product_key: self.schema.key.clone(),
            child_identity: self.selection.child_identity.clone(),
            free_text_values: self.selection.free_text_values.clone(),
            goal_selection: self.selection.goal_selection.clone(),
            image_files: self.selection.image_files.clone(),
            selected_addon_keys: self.selection.selected_addon_keys.clone(),
            delivery_type: self.selection.delivery_type,
            shipping_selection: self.selection.shipping_selection.clone(),
            price_breakdown,
        };

        self.phase = WizardPhase::Submitted;
        self.errors.clear();
        self.notice = None;
        info!(
            product = %self.schema.key,
            total = %total,
            addons = payload.selected_addon_keys.len(),
            delivery = ?payload.delivery_type,
            profile_backed = payload.child_identity.is_profile_backed(),
            "Wizard submitted"
        );
        self.telemetry.record(WizardEvent::Submitted { total });
        Ok(AdvanceOutcome::Submitted(Box::new(payload)))
    }

    /// Sets a free-text value: a schema text field, the child's name, the custom goal, or a gift
    /// recipient field. Clears that field's displayed error.
    pub fn set_field(&mut self, field_id: &str, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let value = value.into();
        match field_id {
            CHILD_NAME_FIELD => {
                let identity = &mut self.selection.child_identity;
                identity.profile_id = None;
                identity.name = value;
            }
            CUSTOM_GOAL_FIELD => self.selection.goal_selection.custom_text = value,
            RECIPIENT_NAME_FIELD => self.selection.shipping_selection.recipient_name = value,
            RECIPIENT_ADDRESS_FIELD => self.selection.shipping_selection.recipient_address = value,
            RECIPIENT_PHONE_FIELD => self.selection.shipping_selection.recipient_phone = value,
            _ if self.schema.text_field(field_id).is_some() => {
                self.selection.free_text_values.insert(field_id.to_string(), value);
            }
            _ => return Err(WizardError::unknown_field(field_id, &self.schema.key)),
        }
        self.errors.clear_field(field_id);
        Ok(())
    }

    pub fn set_child_birth_date(&mut self, birth_date: Option<NaiveDate>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let identity = &mut self.selection.child_identity;
        identity.profile_id = None;
        identity.birth_date = birth_date;
        self.errors.clear_field(CHILD_BIRTH_DATE_FIELD);
        Ok(())
    }

    pub fn set_child_gender(&mut self, gender: Option<Gender>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let identity = &mut self.selection.child_identity;
        identity.profile_id = None;
        identity.gender = gender;
        self.errors.clear_field(CHILD_GENDER_FIELD);
        Ok(())
    }

    /// Selects a saved profile (its identity replaces any inline entry) or, with `None`, the account
    /// holder as in [`select_myself`](Self::select_myself).
    pub fn select_child_profile(&mut self, profile_id: Option<&str>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let Some(profile_id) = profile_id else {
            return self.select_myself();
        };
        let identity = ChildIdentity::from_profile(self.find_profile(profile_id)?);
        self.selection.child_identity = identity;
        self.clear_errors(&IDENTITY_FIELDS);
        Ok(())
    }

    /// Personalizes for the account holder: drops the profile reference and seeds the name.
    pub fn select_myself(&mut self) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let identity = &mut self.selection.child_identity;
        identity.profile_id = None;
        identity.name = self.account.account_name.clone().unwrap_or_default();
        self.errors.clear_field(CHILD_NAME_FIELD);
        Ok(())
    }

    pub fn set_goal(&mut self, goal_key: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.selection.goal_selection.chosen_key = goal_key.trim().to_string();
        self.clear_errors(&[GOAL_FIELD, CUSTOM_GOAL_FIELD]);
        Ok(())
    }

    /// Assigns or clears the file for an image slot.
    ///
    /// Only the primary slot gets a preview. A new file supersedes the slot's previous preview;
    /// clearing the slot releases it. Preview failures are logged and the file is kept.
    pub fn set_image(&mut self, slot_id: &str, file: Option<FileHandle>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if self.schema.image_slot(slot_id).is_none() {
            return Err(WizardError::unknown_image_slot(slot_id, &self.schema.key));
        }
        let is_primary = self.schema.primary_image_slot().is_some_and(|slot| slot.id == slot_id);
        let generator = self.collaborators.previews.as_ref();

        match file {
            Some(file) => {
                if is_primary {
                    match generator.create_preview(&file) {
                        Ok(handle) => self.previews.replace(slot_id, handle, generator),
                        Err(error) => {
                            warn!(slot = %slot_id, file = %file.file_name, error = %error, "Preview generation failed; continuing without preview");
                            self.previews.release(slot_id, generator);
                        }
                    }
                }
                self.selection.image_files.insert(slot_id.to_string(), file);
            }
            None => {
                self.selection.image_files.shift_remove(slot_id);
                self.previews.release(slot_id, generator);
            }
        }
        self.errors.clear_field(slot_id);
        Ok(())
    }

    /// Adds or removes an add-on. Returns whether the add-on is selected afterwards.
    ///
    /// Removing is always allowed; adding requires the add-on to be offered with this product.
    pub fn toggle_addon(&mut self, addon_key: &str) -> Result<bool, WizardError> {
        self.ensure_editable()?;
        if self.selection.selected_addon_keys.shift_remove(addon_key) {
            debug!(product = %self.schema.key, addon = %addon_key, "Add-on removed");
            return Ok(false);
        }
        let offered = self
            .addon_catalog
            .offered_for(&self.schema)
            .iter()
            .any(|addon| addon.key == addon_key);
        if !offered {
            return Err(WizardError::addon_not_offered(addon_key, &self.schema.key));
        }
        self.selection.selected_addon_keys.insert(addon_key.to_string());
        debug!(product = %self.schema.key, addon = %addon_key, "Add-on selected");
        Ok(true)
    }

    pub fn set_delivery_type(&mut self, delivery_type: DeliveryType) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if delivery_type == DeliveryType::Printed && !self.schema.has_printed_version {
            return Err(WizardError::DeliveryUnavailable {
                product_key: self.schema.key.clone(),
            });
        }
        self.selection.delivery_type = delivery_type;
        if delivery_type == DeliveryType::Electronic {
            self.clear_errors(&RECIPIENT_FIELDS);
            self.errors.clear_field(GOVERNORATE_FIELD);
        }
        Ok(())
    }

    pub fn set_shipping_option(&mut self, option: ShippingOption) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.selection.shipping_selection.option = option;
        if option == ShippingOption::SelfDelivery {
            self.clear_errors(&RECIPIENT_FIELDS);
        }
        Ok(())
    }

    /// Chooses the shipping governorate; names must come from the fixed governorate list.
    pub fn set_governorate(&mut self, governorate: Option<&str>) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let governorate = governorate.map(str::trim).filter(|name| !name.is_empty());
        if let Some(name) = governorate
            && !is_known_governorate(name)
        {
            return Err(WizardError::UnknownGovernorate { name: name.to_string() });
        }
        self.selection.shipping_selection.governorate = governorate.map(str::to_string);
        self.errors.clear_field(GOVERNORATE_FIELD);
        Ok(())
    }

    /// Swaps in a refreshed add-on catalog. Selections are kept even if they no longer resolve;
    /// pricing skips them and submission rejects them.
    pub fn replace_addon_catalog(&mut self, addon_catalog: AddonCatalog) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        self.addon_catalog = addon_catalog;
        Ok(())
    }

    fn current_index(&self) -> Result<usize, WizardError> {
        match self.phase {
            WizardPhase::Idle => Err(WizardError::NotStarted),
            WizardPhase::Step(index) => Ok(index),
            WizardPhase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        self.current_index().map(|_| ())
    }

    fn find_profile(&self, profile_id: &str) -> Result<&ChildProfile, WizardError> {
        self.account
            .child_profiles
            .iter()
            .find(|profile| profile.id == profile_id)
            .ok_or_else(|| WizardError::UnknownProfile {
                profile_id: profile_id.to_string(),
            })
    }

    fn validate_step_at(&self, index: usize) -> ErrorMap {
        self.collaborators
            .validator
            .validate(&self.steps[index], &self.schema, &self.selection)
    }

    fn block(&mut self, index: usize, errors: ErrorMap) -> AdvanceOutcome {
        let step_key = self.steps[index].key.clone();
        debug!(
            product = %self.schema.key,
            step = %step_key,
            error_count = errors.len(),
            "Advance blocked by validation"
        );
        self.telemetry.record(WizardEvent::Blocked {
            step_key: step_key.clone(),
            error_count: errors.len(),
        });
        self.errors = errors.clone();
        self.notice = Some(REQUIRED_FIELDS_NOTICE.to_string());
        AdvanceOutcome::Blocked { step_key, errors }
    }

    fn clear_errors(&mut self, field_ids: &[&str]) {
        for field_id in field_ids {
            self.errors.clear_field(field_id);
        }
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        self.previews.release_all(self.collaborators.previews.as_ref());
    }
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("product_key", &self.schema.key)
            .field("phase", &self.phase)
            .field("current_step", &self.current_step_key())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

//! Session scripts: a JSON description of what a buyer entered, replayed against a wizard.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use qissa_engine::{AccountContext, WizardController, WizardError};
use qissa_types::{
    CHILD_NAME_FIELD, CUSTOM_GOAL_FIELD, ChildProfile, DeliveryType, FileHandle, Gender, RECIPIENT_ADDRESS_FIELD,
    RECIPIENT_NAME_FIELD, RECIPIENT_PHONE_FIELD, ShippingOption,
};
use qissa_util::WizardSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionScript {
    /// Overrides the account name from settings.
    pub account_name: Option<String>,
    /// Saved child profiles available to the session.
    pub profiles: Vec<ChildProfile>,
    /// Profile pre-selected when the wizard starts.
    pub profile: Option<String>,
    /// Personalize for the account holder instead of a child.
    pub myself: bool,
    pub child_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// Schema text field values keyed by field id.
    pub fields: IndexMap<String, String>,
    pub goal: Option<String>,
    pub custom_goal: Option<String>,
    pub images: IndexMap<String, FileHandle>,
    pub addons: IndexSet<String>,
    pub delivery: Option<DeliveryType>,
    pub shipping: Option<ShippingOption>,
    pub governorate: Option<String>,
    pub recipient: RecipientScript,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecipientScript {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl SessionScript {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("read session script {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parse session script {}", path.display()))
    }

    pub fn account_context(&self, settings: &WizardSettings) -> AccountContext {
        AccountContext {
            account_name: self.account_name.clone().or_else(|| settings.account_name.clone()),
            child_profiles: self.profiles.clone(),
        }
    }

    /// Starts the wizard and replays every scripted entry.
    pub fn start(&self, wizard: &mut WizardController) -> Result<(), WizardError> {
        wizard.begin(self.profile.as_deref())?;
        self.apply(wizard)
    }

    pub fn apply(&self, wizard: &mut WizardController) -> Result<(), WizardError> {
        if self.myself {
            wizard.select_myself()?;
        }
        if let Some(name) = &self.child_name {
            wizard.set_field(CHILD_NAME_FIELD, name.as_str())?;
        }
        if self.birth_date.is_some() {
            wizard.set_child_birth_date(self.birth_date)?;
        }
        if self.gender.is_some() {
            wizard.set_child_gender(self.gender)?;
        }
        for (field_id, value) in &self.fields {
            wizard.set_field(field_id, value.as_str())?;
        }
        if let Some(goal) = &self.goal {
            wizard.set_goal(goal)?;
        }
        if let Some(custom_goal) = &self.custom_goal {
            wizard.set_field(CUSTOM_GOAL_FIELD, custom_goal.as_str())?;
        }
        for (slot_id, file) in &self.images {
            wizard.set_image(slot_id, Some(file.clone()))?;
        }
        for addon_key in &self.addons {
            if !wizard.selection().selected_addon_keys.contains(addon_key) {
                wizard.toggle_addon(addon_key)?;
            }
        }
        if let Some(delivery) = self.delivery {
            wizard.set_delivery_type(delivery)?;
        }
        if let Some(shipping) = self.shipping {
            wizard.set_shipping_option(shipping)?;
        }
        if self.governorate.is_some() {
            wizard.set_governorate(self.governorate.as_deref())?;
        }

        let recipient = [
            (RECIPIENT_NAME_FIELD, &self.recipient.name),
            (RECIPIENT_ADDRESS_FIELD, &self.recipient.address),
            (RECIPIENT_PHONE_FIELD, &self.recipient.phone),
        ];
        for (field_id, value) in recipient {
            if let Some(value) = value {
                wizard.set_field(field_id, value.as_str())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qissa_engine::parse_catalog_str;

    const CATALOG: &str = r#"
products:
  - key: hero_story
    has_printed_version: true
    price_printed: 250
    text_fields:
      - {id: hero_name, label: اسم البطل, required: true}
  - key: coloring_book
    is_addon: true
    price_electronic: 20
shipping:
  القاهرة: 30
"#;

    const SCRIPT: &str = r#"{
        "profiles": [{"id": "kid-1", "name": "سارة", "birth_date": "2019-03-01", "gender": "female"}],
        "profile": "kid-1",
        "fields": {"hero_name": "سارة"},
        "addons": ["coloring_book"],
        "shipping": "gift",
        "governorate": "القاهرة",
        "recipient": {"name": "جدة سارة", "address": "المعادي", "phone": "0100"}
    }"#;

    #[test]
    fn script_replays_into_the_wizard() {
        let catalog = parse_catalog_str(CATALOG).expect("catalog");
        let script: SessionScript = serde_json::from_str(SCRIPT).expect("script");
        let mut wizard =
            WizardController::new("hero_story", &catalog, script.account_context(&WizardSettings::default())).expect("wizard");

        script.start(&mut wizard).expect("replay");

        let selection = wizard.selection();
        assert_eq!(selection.child_identity.profile_id.as_deref(), Some("kid-1"));
        assert_eq!(selection.text_value("hero_name"), "سارة");
        assert!(selection.selected_addon_keys.contains("coloring_book"));
        assert_eq!(selection.shipping_selection.option, ShippingOption::Gift);
        assert_eq!(selection.shipping_selection.recipient_phone, "0100");
        assert_eq!(wizard.price_breakdown().total.to_string(), "300");
    }

    #[test]
    fn account_name_falls_back_to_settings() {
        let settings = WizardSettings {
            account_name: Some("منى".into()),
            ..WizardSettings::default()
        };
        assert_eq!(
            SessionScript::default().account_context(&settings).account_name.as_deref(),
            Some("منى")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = serde_json::from_str::<SessionScript>(r#"{"colour": "blue"}"#).expect_err("unknown key");
        assert!(error.to_string().contains("colour"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, SCRIPT).expect("write script");

        let script = SessionScript::load(&path).expect("load");
        assert_eq!(script.profile.as_deref(), Some("kid-1"));
    }
}

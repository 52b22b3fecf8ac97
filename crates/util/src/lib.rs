pub mod settings;
pub mod text;

pub use settings::{CATALOG_PATH_ENV, SETTINGS_PATH_ENV, SettingsError, WizardSettings, expand_tilde};
pub use text::{is_blank, required_message, strip_required_marker};

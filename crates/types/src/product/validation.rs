//! Declarative constraints for free-text values.
//!
//! Required-ness is handled by the step validator; these rules only apply to values the buyer
//! has actually entered, so an empty optional field never trips a length or pattern check.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declarative validation settings attached to a text field.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct TextFieldValidation {
    /// Minimum length in characters.
    #[serde(default)]
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    #[serde(default)]
    pub max_length: Option<usize>,
    /// Regular expression the trimmed value must match.
    #[serde(default)]
    pub pattern: Option<String>,
}

static COMPILED_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Validate a non-empty text value against the declared constraints.
///
/// Lengths count characters of the trimmed value, not bytes, so Arabic text is measured the way
/// the buyer sees it. A pattern that fails to compile is reported as a constraint failure.
pub fn validate_text_value(text: &str, validation: &TextFieldValidation) -> Result<(), String> {
    let trimmed = text.trim();
    let length = trimmed.chars().count();

    if let Some(min_length) = validation.min_length
        && length < min_length
    {
        return Err(format!("يجب ألا يقل عن {} أحرف.", min_length));
    }

    if let Some(max_length) = validation.max_length
        && length > max_length
    {
        return Err(format!("يجب ألا يزيد عن {} حرفًا.", max_length));
    }

    if let Some(pattern) = &validation.pattern
        && !pattern_matches(pattern, trimmed)?
    {
        return Err("القيمة المدخلة غير صالحة.".to_string());
    }

    Ok(())
}

fn pattern_matches(pattern: &str, text: &str) -> Result<bool, String> {
    let mut compiled = COMPILED_PATTERNS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(regex) = compiled.get(pattern) {
        return Ok(regex.is_match(text));
    }
    let regex = Regex::new(pattern).map_err(|error| format!("invalid pattern '{}': {}", pattern, error))?;
    let matched = regex.is_match(text);
    compiled.insert(pattern.to_string(), regex);
    Ok(matched)
}

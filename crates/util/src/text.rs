//! Text helpers for labels and user-entered values.

/// Suffix appended to a field label to form its "required" message.
const REQUIRED_SUFFIX: &str = "مطلوب.";

/// True when the value is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Removes the trailing `*` markers authors use to flag required labels.
pub fn strip_required_marker(label: &str) -> &str {
    label.trim_end().trim_end_matches('*').trim_end()
}

/// Builds the inline message for a missing required field, e.g. `اسم البطل مطلوب.`.
pub fn required_message(label: &str) -> String {
    format!("{} {}", strip_required_marker(label), REQUIRED_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_include_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t"));
        assert!(!is_blank(" سارة "));
    }

    #[test]
    fn required_marker_is_stripped() {
        assert_eq!(strip_required_marker("اسم البطل *"), "اسم البطل");
        assert_eq!(strip_required_marker("اسم البطل**"), "اسم البطل");
        assert_eq!(strip_required_marker("اسم البطل"), "اسم البطل");
    }

    #[test]
    fn required_message_uses_clean_label() {
        assert_eq!(required_message("اسم الطفل *"), "اسم الطفل مطلوب.");
    }
}

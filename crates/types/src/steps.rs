//! Step definitions produced by the planner.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Half-open range of text-field positions. `end: None` runs to the last field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRange {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl FieldRange {
    pub const fn bounded(start: usize, end: usize) -> Self {
        Self { start, end: Some(end) }
    }

    pub const fn open(start: usize) -> Self {
        Self { start, end: None }
    }

    /// Concrete positions for a schema with `field_count` text fields.
    pub fn resolve(&self, field_count: usize) -> Range<usize> {
        let end = self.end.unwrap_or(field_count).min(field_count);
        self.start.min(end)..end
    }
}

/// One wizard screen and the schema content it covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDefinition {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub field_range: Option<FieldRange>,
    #[serde(default)]
    pub includes_images: bool,
    #[serde(default)]
    pub includes_addons: bool,
    #[serde(default)]
    pub includes_delivery: bool,
    #[serde(default)]
    pub includes_child_identity: bool,
    #[serde(default)]
    pub includes_goal: bool,
}

impl StepDefinition {
    /// A step with only a key and title; callers switch on the `includes_*` flags they need.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            field_range: None,
            includes_images: false,
            includes_addons: false,
            includes_delivery: false,
            includes_child_identity: false,
            includes_goal: false,
        }
    }

    pub fn with_fields(mut self, range: FieldRange) -> Self {
        self.field_range = Some(range);
        self
    }

    pub fn with_images(mut self) -> Self {
        self.includes_images = true;
        self
    }

    pub fn with_addons(mut self) -> Self {
        self.includes_addons = true;
        self
    }

    pub fn with_delivery(mut self) -> Self {
        self.includes_delivery = true;
        self
    }

    pub fn with_child_identity(mut self) -> Self {
        self.includes_child_identity = true;
        self
    }

    pub fn with_goal(mut self) -> Self {
        self.includes_goal = true;
        self
    }
}

//! Step planning.
//!
//! Two structurally different sequences exist. The emotion flow splits identity, goal, and the
//! text fields across three screens; every other product uses the default flow. Variant
//! selection is an exact match on the product key.

use qissa_types::{FieldRange, StepDefinition};

/// Product key that opts into the emotion flow.
pub const EMOTION_FLOW_PRODUCT_KEY: &str = "emotion_journey";

pub const STEP_CHILD: &str = "child";
pub const STEP_CUSTOMIZATION: &str = "customization";
pub const STEP_CHILD_CONTEXT: &str = "child_context";
pub const STEP_EMOTION_JOURNEY: &str = "emotion_journey";
pub const STEP_CREATIVE_TOUCHES: &str = "creative_touches";
pub const STEP_IMAGES: &str = "images";
pub const STEP_ADDONS: &str = "addons";
pub const STEP_DELIVERY: &str = "delivery";

/// Text-field partition of the emotion flow. The last range is open so that no field is lost.
const CHILD_CONTEXT_FIELDS: FieldRange = FieldRange::bounded(0, 4);
const EMOTION_JOURNEY_FIELDS: FieldRange = FieldRange::bounded(4, 8);
const CREATIVE_TOUCHES_FIELDS: FieldRange = FieldRange::open(8);

/// Maps a product key to its ordered steps.
pub trait StepPlanner {
    fn plan(&self, product_key: &str) -> Vec<StepDefinition>;
}

/// The recognized step-sequencing variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowVariant {
    Default,
    Emotion,
}

impl FlowVariant {
    pub fn for_product(product_key: &str) -> Self {
        if product_key == EMOTION_FLOW_PRODUCT_KEY {
            Self::Emotion
        } else {
            Self::Default
        }
    }

    pub fn steps(self) -> Vec<StepDefinition> {
        match self {
            Self::Default => vec![
                StepDefinition::new(STEP_CHILD, "بيانات الطفل").with_child_identity(),
                StepDefinition::new(STEP_CUSTOMIZATION, "تخصيص القصة")
                    .with_fields(FieldRange::open(0))
                    .with_goal(),
                images_step(),
                addons_step(),
                delivery_step(),
            ],
            Self::Emotion => vec![
                StepDefinition::new(STEP_CHILD_CONTEXT, "عن الطفل")
                    .with_child_identity()
                    .with_fields(CHILD_CONTEXT_FIELDS),
                StepDefinition::new(STEP_EMOTION_JOURNEY, "رحلة المشاعر")
                    .with_goal()
                    .with_fields(EMOTION_JOURNEY_FIELDS),
                StepDefinition::new(STEP_CREATIVE_TOUCHES, "لمسات إبداعية").with_fields(CREATIVE_TOUCHES_FIELDS),
                images_step(),
                addons_step(),
                delivery_step(),
            ],
        }
    }
}

fn images_step() -> StepDefinition {
    StepDefinition::new(STEP_IMAGES, "الصور").with_images()
}

fn addons_step() -> StepDefinition {
    StepDefinition::new(STEP_ADDONS, "الإضافات").with_addons()
}

fn delivery_step() -> StepDefinition {
    StepDefinition::new(STEP_DELIVERY, "التوصيل").with_delivery()
}

/// Default planner backed by [`FlowVariant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductStepPlanner;

impl StepPlanner for ProductStepPlanner {
    fn plan(&self, product_key: &str) -> Vec<StepDefinition> {
        plan(product_key)
    }
}

pub fn plan(product_key: &str) -> Vec<StepDefinition> {
    FlowVariant::for_product(product_key).steps()
}

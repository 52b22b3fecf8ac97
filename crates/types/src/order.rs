//! The finalized order payload handed to checkout.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::pricing::PriceBreakdown;
use crate::selection::{ChildIdentity, DeliveryType, FileHandle, GoalSelection, ShippingSelection};

/// Snapshot of a completed configuration. Emitted exactly once per wizard session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderPayload {
    pub product_key: String,
    pub child_identity: ChildIdentity,
    pub free_text_values: IndexMap<String, String>,
    pub goal_selection: GoalSelection,
    pub image_files: IndexMap<String, FileHandle>,
    pub selected_addon_keys: IndexSet<String>,
    pub delivery_type: DeliveryType,
    pub shipping_selection: ShippingSelection,
    pub price_breakdown: PriceBreakdown,
}

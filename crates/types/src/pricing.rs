//! Price tables and the derived price breakdown.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Governorates that printed orders can ship to. Shipping tables are keyed by these names.
pub const GOVERNORATES: [&str; 27] = [
    "القاهرة",
    "الجيزة",
    "الإسكندرية",
    "الدقهلية",
    "البحر الأحمر",
    "البحيرة",
    "الفيوم",
    "الغربية",
    "الإسماعيلية",
    "المنوفية",
    "المنيا",
    "القليوبية",
    "الوادي الجديد",
    "السويس",
    "أسوان",
    "أسيوط",
    "بني سويف",
    "بورسعيد",
    "دمياط",
    "الشرقية",
    "جنوب سيناء",
    "كفر الشيخ",
    "مطروح",
    "الأقصر",
    "قنا",
    "شمال سيناء",
    "سوهاج",
];

pub fn is_known_governorate(name: &str) -> bool {
    GOVERNORATES.contains(&name)
}

/// Externally supplied price tables. Base prices live on each product schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceTables {
    #[serde(default)]
    pub shipping_by_governorate: IndexMap<String, Decimal>,
}

impl PriceTables {
    pub fn new(shipping_by_governorate: IndexMap<String, Decimal>) -> Self {
        Self { shipping_by_governorate }
    }

    pub fn shipping_for(&self, governorate: &str) -> Option<Decimal> {
        self.shipping_by_governorate.get(governorate).copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddonPrice {
    pub key: String,
    pub price: Decimal,
}

/// Base, add-on, shipping, and total figures for the current selection. Always derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PriceBreakdown {
    pub base: Decimal,
    pub addons: Vec<AddonPrice>,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn addons_total(&self) -> Decimal {
        self.addons.iter().map(|addon| addon.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn governorate_list_is_unique() {
        let mut names: Vec<_> = GOVERNORATES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GOVERNORATES.len());
        assert!(is_known_governorate("القاهرة"));
        assert!(!is_known_governorate("Cairo"));
    }

    #[test]
    fn shipping_lookup_misses_return_none() {
        let tables = PriceTables::new(IndexMap::from([("القاهرة".to_string(), Decimal::from(30))]));

        assert_eq!(tables.shipping_for("القاهرة"), Some(Decimal::from(30)));
        assert_eq!(tables.shipping_for("أسوان"), None);
    }
}

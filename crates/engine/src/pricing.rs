//! Live price computation.
//!
//! The breakdown is recomputed from scratch every time it is read; nothing here caches or
//! patches a previous result.

use qissa_types::{AddonPrice, PriceBreakdown, PriceTables, ProductSchema, SelectionState};
use rust_decimal::Decimal;
use tracing::warn;

use crate::catalog::AddonCatalog;

/// Turns the current selection into a [`PriceBreakdown`].
pub trait PriceCalculator {
    fn compute(
        &self, schema: &ProductSchema, addons: &AddonCatalog, price_tables: &PriceTables, selection: &SelectionState,
    ) -> PriceBreakdown;
}

/// Default calculator implementing the catalog pricing rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TablePriceCalculator;

impl PriceCalculator for TablePriceCalculator {
    fn compute(
        &self, schema: &ProductSchema, addons: &AddonCatalog, price_tables: &PriceTables, selection: &SelectionState,
    ) -> PriceBreakdown {
        compute_breakdown(schema, addons, price_tables, selection)
    }
}

/// Computes base, add-on, and shipping figures.
///
/// - The base price follows the order's delivery type; a missing price counts as zero.
/// - Each add-on is priced by its own capability: printed rate when it has a printed edition,
///   electronic rate otherwise, regardless of how the parent order is delivered.
/// - Add-ons missing from `addons` contribute nothing and are left out of the list.
/// - Electronic orders never pay shipping; printed orders pay the governorate rate, or zero
///   when no governorate is chosen or the table has no entry for it.
pub fn compute_breakdown(
    schema: &ProductSchema, addons: &AddonCatalog, price_tables: &PriceTables, selection: &SelectionState,
) -> PriceBreakdown {
    let base_price = if selection.is_printed() {
        schema.price_printed
    } else {
        schema.price_electronic
    };
    let base = base_price.unwrap_or(Decimal::ZERO);

    let addon_prices: Vec<AddonPrice> = selection
        .selected_addon_keys
        .iter()
        .filter_map(|addon_key| match addons.get(addon_key) {
            Some(addon) => Some(AddonPrice {
                key: addon_key.clone(),
                price: addon_unit_price(addon),
            }),
            None => {
                warn!(addon = %addon_key, product = %schema.key, "Selected add-on not in catalog; priced at zero");
                None
            }
        })
        .collect();

    let shipping = if selection.is_printed() {
        selection
            .shipping_selection
            .governorate
            .as_deref()
            .and_then(|governorate| price_tables.shipping_for(governorate))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let addons_total: Decimal = addon_prices.iter().map(|addon| addon.price).sum();
    PriceBreakdown {
        base,
        addons: addon_prices,
        shipping,
        total: base + addons_total + shipping,
    }
}

/// Price of an add-on, decided by whether the add-on itself has a printed edition.
pub fn addon_unit_price(addon: &ProductSchema) -> Decimal {
    let price = if addon.has_printed_version {
        addon.price_printed
    } else {
        addon.price_electronic
    };
    price.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use indexmap::IndexMap;
    use qissa_types::{DeliveryType, GoalConfig};

    fn product(key: &str, printed: bool, price_printed: Option<i64>, price_electronic: Option<i64>) -> ProductSchema {
        ProductSchema {
            key: key.into(),
            title: None,
            has_printed_version: printed,
            text_fields: Vec::new(),
            image_slots: Vec::new(),
            goal_config: GoalConfig::None,
            goal_options: Vec::new(),
            is_addon: key != "story",
            compatible_addons: Vec::new(),
            price_electronic: price_electronic.map(Decimal::from),
            price_printed: price_printed.map(Decimal::from),
        }
    }

    fn cairo_tables() -> PriceTables {
        PriceTables::new(IndexMap::from([("القاهرة".to_string(), Decimal::from(30))]))
    }

    fn printed_to_cairo() -> SelectionState {
        let mut selection = SelectionState::new(DeliveryType::Printed);
        selection.shipping_selection.governorate = Some("القاهرة".into());
        selection
    }

    #[test]
    fn printed_order_pays_base_and_shipping() {
        let schema = product("story", true, Some(250), Some(150));

        let breakdown = compute_breakdown(&schema, &AddonCatalog::default(), &cairo_tables(), &printed_to_cairo());

        assert_eq!(
            breakdown,
            PriceBreakdown {
                base: Decimal::from(250),
                addons: Vec::new(),
                shipping: Decimal::from(30),
                total: Decimal::from(280),
            }
        );
    }

    #[test]
    fn electronic_order_skips_shipping() {
        let schema = product("story", true, Some(250), Some(150));
        let mut selection = printed_to_cairo();
        selection.delivery_type = DeliveryType::Electronic;

        let breakdown = compute_breakdown(&schema, &AddonCatalog::default(), &cairo_tables(), &selection);

        assert_eq!(breakdown.base, Decimal::from(150));
        assert_eq!(breakdown.shipping, Decimal::ZERO);
        assert_eq!(breakdown.total, Decimal::from(150));
    }

    #[test]
    fn missing_prices_and_unpriced_governorates_count_as_zero() {
        let schema = product("story", true, None, Some(150));
        let mut selection = printed_to_cairo();
        selection.shipping_selection.governorate = Some("أسوان".into());

        let breakdown = compute_breakdown(&schema, &AddonCatalog::default(), &cairo_tables(), &selection);

        assert_eq!(breakdown.total, Decimal::ZERO);

        selection.shipping_selection.governorate = None;
        assert_eq!(
            compute_breakdown(&schema, &AddonCatalog::default(), &cairo_tables(), &selection).shipping,
            Decimal::ZERO
        );
    }

    #[test]
    fn addon_tier_follows_addon_capability() {
        let schema = product("story", true, Some(250), Some(150));
        let addons = AddonCatalog::new([
            product("coloring_book", true, Some(60), Some(20)),
            product("audio_story", false, Some(999), Some(40)),
        ]);
        let mut selection = printed_to_cairo();
        selection.delivery_type = DeliveryType::Electronic;
        selection.selected_addon_keys.insert("coloring_book".into());
        selection.selected_addon_keys.insert("audio_story".into());

        let breakdown = compute_breakdown(&schema, &addons, &cairo_tables(), &selection);

        assert_eq!(
            breakdown.addons,
            vec![
                AddonPrice {
                    key: "coloring_book".into(),
                    price: Decimal::from(60),
                },
                AddonPrice {
                    key: "audio_story".into(),
                    price: Decimal::from(40),
                },
            ]
        );
        assert_eq!(breakdown.total, Decimal::from(250));
        assert_eq!(breakdown.total, breakdown.base + breakdown.addons_total() + breakdown.shipping);
    }

    #[test]
    fn unresolved_addons_are_dropped() {
        let schema = product("story", true, Some(250), Some(150));
        let mut selection = printed_to_cairo();
        selection.selected_addon_keys.insert("retired_addon".into());

        let breakdown = TablePriceCalculator.compute(&schema, &AddonCatalog::default(), &cairo_tables(), &selection);

        assert!(breakdown.addons.is_empty());
        assert_eq!(breakdown.total, Decimal::from(280));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unresolved_addons_are_logged_as_warnings() {
        let schema = product("story", true, Some(250), Some(150));
        let mut selection = printed_to_cairo();
        selection.selected_addon_keys.insert("retired_addon".into());
        let buffer = LogBuffer::default();
        let sink = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TablePriceCalculator.compute(&schema, &AddonCatalog::default(), &cairo_tables(), &selection);
        });

        let output = String::from_utf8(buffer.0.lock().expect("log buffer").clone()).expect("utf8 logs");
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("addon=retired_addon"), "{output}");
    }

    #[test]
    fn decimal_prices_do_not_drift() {
        let mut schema = product("story", false, None, None);
        schema.price_electronic = Some(Decimal::new(1999, 2));
        let addons = AddonCatalog::new([{
            let mut addon = product("sticker_pack", false, None, None);
            addon.price_electronic = Some(Decimal::new(101, 2));
            addon
        }]);
        let mut selection = SelectionState::new(DeliveryType::Electronic);
        selection.selected_addon_keys.insert("sticker_pack".into());

        let breakdown = compute_breakdown(&schema, &addons, &PriceTables::default(), &selection);

        assert_eq!(breakdown.total, Decimal::from(21));
    }
}

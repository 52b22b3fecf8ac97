//! Catalog documents: product schemas plus the shipping price table.
//!
//! Catalogs are authored as YAML or JSON (JSON is parsed through the YAML reader) and are
//! validated once at load time so that the wizard can rely on unique product keys, a shipping
//! table keyed by known governorates, and add-on references that point at add-on products.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use qissa_types::{
    CHILD_BIRTH_DATE_FIELD, CHILD_GENDER_FIELD, CHILD_NAME_FIELD, CUSTOM_GOAL_FIELD, GOAL_FIELD, GOVERNORATE_FIELD,
    PriceTables, ProductSchema, RECIPIENT_ADDRESS_FIELD, RECIPIENT_NAME_FIELD, RECIPIENT_PHONE_FIELD, is_known_governorate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog document is malformed: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("product key '{key}' is defined more than once")]
    DuplicateProduct { key: String },

    #[error("shipping table references unknown governorate '{name}'")]
    UnknownGovernorate { name: String },

    #[error("product '{product_key}' lists unknown add-on '{addon_key}'")]
    UnknownAddon { product_key: String, addon_key: String },

    #[error("product '{product_key}' lists '{addon_key}' as an add-on, but it is not flagged as one")]
    NotAnAddon { product_key: String, addon_key: String },

    #[error("product '{product_key}' declares text field '{field_id}', which is reserved for a built-in wizard field")]
    ReservedFieldId { product_key: String, field_id: String },
}

/// Field ids owned by the wizard's identity, goal and delivery controls.
const RESERVED_FIELD_IDS: [&str; 9] = [
    CHILD_NAME_FIELD,
    CHILD_BIRTH_DATE_FIELD,
    CHILD_GENDER_FIELD,
    GOAL_FIELD,
    CUSTOM_GOAL_FIELD,
    RECIPIENT_NAME_FIELD,
    RECIPIENT_ADDRESS_FIELD,
    RECIPIENT_PHONE_FIELD,
    GOVERNORATE_FIELD,
];

/// On-disk shape of a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<ProductSchema>,
    /// Shipping price per governorate for printed orders.
    #[serde(default)]
    pub shipping: IndexMap<String, Decimal>,
}

/// Validated product catalog and price tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: IndexMap<String, ProductSchema>,
    price_tables: PriceTables,
}

impl Catalog {
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        let mut products = IndexMap::with_capacity(document.products.len());
        for schema in document.products {
            if products.contains_key(&schema.key) {
                return Err(CatalogError::DuplicateProduct { key: schema.key });
            }
            products.insert(schema.key.clone(), schema);
        }

        if let Some(name) = document.shipping.keys().find(|name| !is_known_governorate(name)) {
            return Err(CatalogError::UnknownGovernorate { name: name.clone() });
        }

        for schema in products.values() {
            if let Some(field) = schema
                .text_fields
                .iter()
                .find(|field| RESERVED_FIELD_IDS.contains(&field.id.as_str()))
            {
                return Err(CatalogError::ReservedFieldId {
                    product_key: schema.key.clone(),
                    field_id: field.id.clone(),
                });
            }
            for addon_key in &schema.compatible_addons {
                match products.get(addon_key) {
                    None => {
                        return Err(CatalogError::UnknownAddon {
                            product_key: schema.key.clone(),
                            addon_key: addon_key.clone(),
                        });
                    }
                    Some(addon) if !addon.is_addon => {
                        return Err(CatalogError::NotAnAddon {
                            product_key: schema.key.clone(),
                            addon_key: addon_key.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        debug!(products = products.len(), governorates = document.shipping.len(), "Loaded catalog");
        Ok(Self {
            products,
            price_tables: PriceTables::new(document.shipping),
        })
    }

    pub fn schema(&self, product_key: &str) -> Option<&ProductSchema> {
        self.products.get(product_key)
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductSchema> {
        self.products.values()
    }

    pub fn price_tables(&self) -> &PriceTables {
        &self.price_tables
    }

    /// The subset of products flagged as add-ons.
    pub fn addon_catalog(&self) -> AddonCatalog {
        AddonCatalog::new(self.products.values().filter(|schema| schema.is_addon).cloned())
    }
}

/// Add-on products keyed by product key. Only products flagged `is_addon` are admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddonCatalog {
    addons: IndexMap<String, ProductSchema>,
}

impl AddonCatalog {
    pub fn new(schemas: impl IntoIterator<Item = ProductSchema>) -> Self {
        let addons = schemas
            .into_iter()
            .filter(|schema| schema.is_addon)
            .map(|schema| (schema.key.clone(), schema))
            .collect();
        Self { addons }
    }

    pub fn get(&self, addon_key: &str) -> Option<&ProductSchema> {
        self.addons.get(addon_key)
    }

    pub fn len(&self) -> usize {
        self.addons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addons.is_empty()
    }

    /// Add-ons offered with `product`: its compatible list when present, otherwise every add-on
    /// except the product itself.
    pub fn offered_for<'a>(&'a self, product: &'a ProductSchema) -> Vec<&'a ProductSchema> {
        if product.compatible_addons.is_empty() {
            return self.addons.values().filter(|addon| addon.key != product.key).collect();
        }
        product
            .compatible_addons
            .iter()
            .filter_map(|addon_key| self.addons.get(addon_key))
            .collect()
    }
}

/// Parses a catalog document from YAML or JSON text.
pub fn parse_catalog_str(content: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_yaml::from_str(content)?;
    Catalog::from_document(document)
}

/// Loads and validates a catalog file.
pub fn load_catalog_file(file_path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path).map_err(|source| CatalogError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    parse_catalog_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
products:
  - key: hero_story
    has_printed_version: true
    price_printed: 250
    price_electronic: 150
    compatible_addons: [coloring_book]
  - key: coloring_book
    is_addon: true
    has_printed_version: true
    price_printed: 60
  - key: audio_story
    is_addon: true
    price_electronic: 40
shipping:
  القاهرة: 30
  الجيزة: 35
"#;

    #[test]
    fn loads_products_and_shipping() {
        let catalog = parse_catalog_str(CATALOG).expect("parse catalog");

        assert_eq!(catalog.products().count(), 3);
        assert_eq!(catalog.price_tables().shipping_for("الجيزة"), Some(Decimal::from(35)));
        assert_eq!(catalog.addon_catalog().len(), 2);
    }

    #[test]
    fn offered_addons_follow_compatibility_list() {
        let catalog = parse_catalog_str(CATALOG).expect("parse catalog");
        let addons = catalog.addon_catalog();

        let hero = catalog.schema("hero_story").expect("hero story");
        let offered: Vec<_> = addons.offered_for(hero).iter().map(|addon| addon.key.as_str()).collect();
        assert_eq!(offered, vec!["coloring_book"]);

        let coloring = catalog.schema("coloring_book").expect("coloring book");
        let offered: Vec<_> = addons.offered_for(coloring).iter().map(|addon| addon.key.as_str()).collect();
        assert_eq!(offered, vec!["audio_story"]);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let error = parse_catalog_str("products:\n  - key: a\n  - key: a\n").expect_err("duplicate keys");
        assert!(matches!(error, CatalogError::DuplicateProduct { ref key } if key == "a"));
    }

    #[test]
    fn rejects_unknown_governorate() {
        let error = parse_catalog_str("shipping:\n  Cairo: 30\n").expect_err("unknown governorate");
        assert!(matches!(error, CatalogError::UnknownGovernorate { ref name } if name == "Cairo"));
    }

    #[test]
    fn rejects_compatible_addon_that_is_not_an_addon() {
        let content = r#"
products:
  - key: story
    compatible_addons: [box]
  - key: box
"#;
        let error = parse_catalog_str(content).expect_err("not an addon");
        assert!(matches!(error, CatalogError::NotAnAddon { .. }));

        let error = parse_catalog_str("products:\n  - key: story\n    compatible_addons: [ghost]\n").expect_err("unknown addon");
        assert!(matches!(error, CatalogError::UnknownAddon { ref addon_key, .. } if addon_key == "ghost"));
    }

    #[test]
    fn rejects_text_fields_shadowing_wizard_fields() {
        let content = r#"
products:
  - key: story
    text_fields:
      - {id: hero_name, label: اسم البطل}
      - {id: childName, label: اسم الطفل, required: true}
"#;
        let error = parse_catalog_str(content).expect_err("reserved field id");
        assert!(matches!(
            error,
            CatalogError::ReservedFieldId { ref product_key, ref field_id } if product_key == "story" && field_id == "childName"
        ));

        let error = parse_catalog_str("products:\n  - key: gift\n    text_fields:\n      - {id: recipientPhone, label: الهاتف}\n")
            .expect_err("reserved recipient field");
        assert!(matches!(error, CatalogError::ReservedFieldId { ref field_id, .. } if field_id == "recipientPhone"));
    }

    #[test]
    fn loads_json_documents_from_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"products": [{"key": "gift_box", "price_electronic": "99.5"}], "shipping": {"أسوان": 55}}"#,
        )
        .unwrap();

        let catalog = load_catalog_file(&path).expect("load json catalog");
        let schema = catalog.schema("gift_box").expect("gift box");
        assert_eq!(schema.price_electronic, Some(Decimal::new(995, 1)));

        let missing = load_catalog_file(temp_dir.path().join("missing.yaml")).expect_err("missing file");
        assert!(matches!(missing, CatalogError::Io { .. }));
    }
}

//! # Qissa Engine
//!
//! The Qissa Engine drives the multi-step configuration flow for personalized story products.
//! Given a product schema from the catalog, it plans the ordered steps, validates each step
//! against the buyer's selection, keeps a live price, and produces the final order payload.
//!
//! ## Usage
//!
//! ```rust
//! use qissa_engine::{parse_catalog_str, AccountContext, AdvanceOutcome, WizardController};
//!
//! let catalog = parse_catalog_str(r#"
//! products:
//!   - key: bedtime
//!     price_electronic: 120
//! "#)?;
//!
//! let mut wizard = WizardController::new("bedtime", &catalog, AccountContext::default())?;
//! wizard.begin(None)?;
//! assert!(matches!(wizard.advance()?, AdvanceOutcome::Blocked { .. }));
//! assert_eq!(wizard.price_breakdown().total.to_string(), "120");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`catalog`**: Catalog documents, product lookup, and the add-on catalog
//! - **`planner`**: Product key to ordered step definitions
//! - **`validator`**: Per-step validation into a field error map
//! - **`pricing`**: Base, add-on, and shipping price computation
//! - **`wizard`**: The stateful controller, preview resources, and transition telemetry
//! - **`checkout`**: Forwarding a submitted order to a backend

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod planner;
pub mod pricing;
pub mod validator;
pub mod wizard;

pub use catalog::{AddonCatalog, Catalog, CatalogDocument, CatalogError, load_catalog_file, parse_catalog_str};
pub use checkout::{CheckoutError, CheckoutOutcome, OrderReceipt, OrderSubmitter, checkout};
pub use error::WizardError;
pub use planner::{FlowVariant, ProductStepPlanner, StepPlanner, plan};
pub use pricing::{PriceCalculator, TablePriceCalculator, compute_breakdown};
pub use validator::{SchemaStepValidator, StepValidator, validate, validate_step};
pub use wizard::{
    AccountContext, AdvanceOutcome, NoopPreviewGenerator, PreviewGenerator, PreviewHandle, RetreatOutcome,
    WizardCollaborators, WizardController, WizardEvent, WizardPhase,
};

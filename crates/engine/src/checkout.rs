//! Hand-off from a completed wizard to an order backend.
//!
//! The wizard itself never talks to the network. [`checkout`] submits the wizard, tears it down
//! (releasing any preview resources) once a payload exists, and only then awaits the submitter.

use async_trait::async_trait;
use qissa_types::{ErrorMap, OrderPayload};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::WizardError;
use crate::wizard::{AdvanceOutcome, WizardController};

/// Acknowledgement returned by an order backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub reference: String,
}

/// Receives finished orders.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit_order(&self, payload: &OrderPayload) -> anyhow::Result<OrderReceipt>;
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error("order was rejected: {0}")]
    Rejected(#[source] anyhow::Error),
}

#[derive(Debug)]
pub enum CheckoutOutcome {
    Accepted {
        payload: Box<OrderPayload>,
        receipt: OrderReceipt,
    },
    /// Submission stopped on an incomplete step; the wizard is handed back positioned there.
    Incomplete {
        wizard: Box<WizardController>,
        step_key: String,
        errors: ErrorMap,
    },
}

/// Submits the wizard and forwards the payload.
pub async fn checkout(mut wizard: WizardController, submitter: &dyn OrderSubmitter) -> Result<CheckoutOutcome, CheckoutError> {
    let payload = match wizard.submit()? {
        AdvanceOutcome::Submitted(payload) => payload,
        AdvanceOutcome::Blocked { step_key, errors } => {
            return Ok(CheckoutOutcome::Incomplete {
                wizard: Box::new(wizard),
                step_key,
                errors,
            });
        }
        AdvanceOutcome::Moved { step_key } => {
            return Ok(CheckoutOutcome::Incomplete {
                wizard: Box::new(wizard),
                step_key,
                errors: ErrorMap::new(),
            });
        }
    };
    drop(wizard);

    match submitter.submit_order(&payload).await {
        Ok(receipt) => {
            info!(product = %payload.product_key, reference = %receipt.reference, "Order accepted");
            Ok(CheckoutOutcome::Accepted { payload, receipt })
        }
        Err(error) => {
            warn!(product = %payload.product_key, error = %error, "Order submission failed");
            Err(CheckoutError::Rejected(error))
        }
    }
}

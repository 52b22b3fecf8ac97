//! The wizard state machine and the resources it owns.

mod controller;
pub mod previews;
pub mod telemetry;

pub use controller::{
    AccountContext, AdvanceOutcome, REQUIRED_FIELDS_NOTICE, RetreatOutcome, WizardCollaborators, WizardController,
    WizardPhase,
};
pub use previews::{NoopPreviewGenerator, PreviewError, PreviewGenerator, PreviewHandle, PreviewTable};
pub use telemetry::{WizardEvent, WizardTelemetry};

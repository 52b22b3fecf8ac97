//! Transition telemetry recorded by the wizard controller.

use rust_decimal::Decimal;

/// One recorded wizard transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Left `Idle` for the first step.
    Started { step_key: String },
    /// Moved forward after the step validated.
    Advanced { from: String, to: String },
    /// `advance()` or `submit()` stopped on a step with errors.
    Blocked { step_key: String, error_count: usize },
    /// Moved back one step.
    Retreated { from: String, to: String },
    /// `retreat()` on the first step; the caller should close the wizard.
    ExitRequested,
    /// Submission found an earlier incomplete step and jumped to it.
    Jumped { from: String, to: String },
    /// The order payload was produced.
    Submitted { total: Decimal },
}

/// Ordered events collected during a session.
#[derive(Debug, Default, Clone)]
pub struct WizardTelemetry {
    events: Vec<WizardEvent>,
}

impl WizardTelemetry {
    pub(crate) fn record(&mut self, event: WizardEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[WizardEvent] {
        &self.events
    }

    /// Number of blocked advance/submit attempts.
    pub fn blocked_attempts(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, WizardEvent::Blocked { .. }))
            .count()
    }
}

//! Ration evaluation service

use crate::error::ApiError;
use ration_lab_shared::{DietEngine, EvaluateRationRequest, Evaluation};
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Ration evaluation service
pub struct RationService;

impl RationService {
    /// Validate a request, convert it to kilograms and evaluate it
    #[instrument(skip_all, fields(entries = request.ration.len()))]
    pub fn evaluate(
        engine: &DietEngine,
        request: &EvaluateRationRequest,
    ) -> Result<Evaluation, ApiError> {
        request.validate()?;

        match engine.evaluate_ration(&request.to_ration()) {
            Ok(evaluation) => {
                let outcome = &evaluation.outcome;
                metrics::counter!("ration_evaluations_total", "outcome" => "ok").increment(1);
                metrics::histogram!("ration_fiber_efficiency").record(outcome.fiber_efficiency);

                debug!(
                    dmi_kg = evaluation.profile.dmi_kg,
                    ph = evaluation.state.ph,
                    fiber_efficiency = outcome.fiber_efficiency,
                    wasted_energy = outcome.wasted_energy,
                    findings = outcome.findings.len(),
                    "Ration evaluated"
                );
                Ok(evaluation)
            }
            Err(err) => {
                metrics::counter!("ration_evaluations_total", "outcome" => "rejected")
                    .increment(1);
                warn!(code = err.code(), error = %err, "Ration rejected");
                Err(err.into())
            }
        }
    }
}

//! Sulfide detoxification and feedlot closeout calculators

use crate::error::ApiError;
use ration_lab_shared::{
    closeout, evaluate_sulfur, Closeout, CloseoutInput, SulfurInput, SulfurOutcome,
};
use tracing::{debug, instrument};
use validator::Validate;

pub struct CalculatorService;

impl CalculatorService {
    #[instrument(skip_all)]
    pub fn sulfur(input: &SulfurInput) -> Result<SulfurOutcome, ApiError> {
        input.validate()?;
        let outcome = evaluate_sulfur(input)?;
        metrics::counter!("sulfur_evaluations_total").increment(1);
        debug!(
            total_sulfur_percent_dmi = outcome.total_sulfur_percent_dmi,
            ne_cost_mcal = outcome.ne_cost_mcal,
            "Sulfur load evaluated"
        );
        Ok(outcome)
    }

    #[instrument(skip_all)]
    pub fn closeout(input: &CloseoutInput) -> Result<Closeout, ApiError> {
        input.validate()?;
        let result = closeout(input)?;
        metrics::counter!("feedlot_closeouts_total").increment(1);
        debug!(
            days_on_feed = result.days_on_feed,
            profit = result.profit,
            "Closeout projected"
        );
        Ok(result)
    }
}

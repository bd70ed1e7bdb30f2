//! Feedlot closeout
//!
//! Prices a four-component finishing ration and projects the economics of
//! one head from placement to sale. Weights are in pounds and cattle prices
//! in $/cwt, matching how feedlot closeouts are reported.

use crate::errors::EngineResult;
use crate::findings::{Finding, FindingCategory, Severity};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 56 lb bushels in a short ton
pub const CORN_BUSHELS_PER_TON: f64 = 35.71;
pub const LB_PER_TON: f64 = 2000.0;
pub const LB_PER_CWT: f64 = 100.0;
pub const DEFAULT_VET_COST: f64 = 25.0;

const INCLUSION_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Ration Cost
// ============================================================================

/// Component prices and inclusion rates (% of ration, as fed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_inclusions"))]
pub struct RationCostInput {
    /// $/bushel
    #[validate(range(min = 0.0))]
    pub corn_price_bu: f64,
    /// $/ton
    #[validate(range(min = 0.0))]
    pub ddgs_price_ton: f64,
    #[validate(range(min = 0.0))]
    pub silage_price_ton: f64,
    #[validate(range(min = 0.0))]
    pub supplement_price_ton: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub corn_percent: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub ddgs_percent: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub silage_percent: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub supplement_percent: f64,
}

impl RationCostInput {
    pub fn total_inclusion(&self) -> f64 {
        self.corn_percent + self.ddgs_percent + self.silage_percent + self.supplement_percent
    }
}

fn validate_inclusions(input: &RationCostInput) -> Result<(), ValidationError> {
    if (input.total_inclusion() - 100.0).abs() > INCLUSION_TOLERANCE {
        let mut error = ValidationError::new("inclusion_total");
        error.message = Some(
            format!(
                "Ingredient inclusions must sum to 100% (got {}%)",
                input.total_inclusion()
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}

impl Default for RationCostInput {
    fn default() -> Self {
        Self {
            corn_price_bu: 5.50,
            ddgs_price_ton: 220.0,
            silage_price_ton: 55.0,
            supplement_price_ton: 450.0,
            corn_percent: 60.0,
            ddgs_percent: 20.0,
            silage_percent: 15.0,
            supplement_percent: 5.0,
        }
    }
}

/// Ration cost, $/ton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationCost {
    pub corn_price_ton: f64,
    pub corn_cost: f64,
    pub ddgs_cost: f64,
    pub silage_cost: f64,
    pub supplement_cost: f64,
    pub cost_per_ton: f64,
}

pub fn ration_cost(input: &RationCostInput) -> EngineResult<RationCost> {
    input.validate()?;

    let corn_price_ton = input.corn_price_bu * CORN_BUSHELS_PER_TON;
    let corn_cost = corn_price_ton * input.corn_percent / 100.0;
    let ddgs_cost = input.ddgs_price_ton * input.ddgs_percent / 100.0;
    let silage_cost = input.silage_price_ton * input.silage_percent / 100.0;
    let supplement_cost = input.supplement_price_ton * input.supplement_percent / 100.0;

    Ok(RationCost {
        corn_price_ton,
        corn_cost,
        ddgs_cost,
        silage_cost,
        supplement_cost,
        cost_per_ton: corn_cost + ddgs_cost + silage_cost + supplement_cost,
    })
}

// ============================================================================
// Closeout
// ============================================================================

/// Cattle performance and market inputs for one head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_weights"))]
pub struct CloseoutInput {
    #[validate(nested)]
    pub ration: RationCostInput,
    /// Purchase price, $/cwt
    #[validate(range(min = 0.0))]
    pub cattle_price_cwt: f64,
    /// Sale price, $/cwt
    #[validate(range(min = 0.0))]
    pub sale_price_cwt: f64,
    /// Average daily gain, lb/day
    #[validate(range(exclusive_min = 0.0))]
    pub adg_lb: f64,
    /// lb feed per lb gain
    #[validate(range(exclusive_min = 0.0))]
    pub feed_conversion: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub in_weight_lb: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub out_weight_lb: f64,
    /// $/head/day
    #[validate(range(min = 0.0))]
    pub yardage_per_day: f64,
    /// Annual interest, %
    #[validate(range(min = 0.0, max = 100.0))]
    pub interest_rate_percent: f64,
    /// $/head
    #[serde(default = "default_vet_cost")]
    #[validate(range(min = 0.0))]
    pub vet_cost: f64,
}

fn default_vet_cost() -> f64 {
    DEFAULT_VET_COST
}

fn validate_weights(input: &CloseoutInput) -> Result<(), ValidationError> {
    if input.out_weight_lb <= input.in_weight_lb {
        let mut error = ValidationError::new("total_gain");
        error.message = Some("Out weight must exceed in weight".into());
        return Err(error);
    }
    Ok(())
}

impl Default for CloseoutInput {
    fn default() -> Self {
        Self {
            ration: RationCostInput::default(),
            cattle_price_cwt: 240.0,
            sale_price_cwt: 185.0,
            adg_lb: 3.8,
            feed_conversion: 6.5,
            in_weight_lb: 650.0,
            out_weight_lb: 1400.0,
            yardage_per_day: 0.40,
            interest_rate_percent: 8.0,
            vet_cost: DEFAULT_VET_COST,
        }
    }
}

/// Projected economics per head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closeout {
    pub ration: RationCost,
    pub total_gain_lb: f64,
    pub days_on_feed: f64,
    pub total_feed_lb: f64,
    pub feed_cost: f64,
    pub cattle_cost: f64,
    pub yardage_cost: f64,
    pub vet_cost: f64,
    pub interest_cost: f64,
    pub total_cost: f64,
    pub revenue: f64,
    pub profit: f64,
    pub roi_percent: f64,
    /// All non-purchase costs per lb gained
    pub cost_of_gain: f64,
    /// Feed cost per lb gained
    pub feed_cost_of_gain: f64,
    /// Sale price that covers total cost, $/cwt
    pub breakeven_sale_cwt: f64,
    /// Highest purchase price that still breaks even, $/cwt
    pub breakeven_purchase_cwt: f64,
    pub findings: Vec<Finding>,
}

/// Project a feedlot closeout
pub fn closeout(input: &CloseoutInput) -> EngineResult<Closeout> {
    input.validate()?;
    let ration = ration_cost(&input.ration)?;

    let total_gain_lb = input.out_weight_lb - input.in_weight_lb;
    let days_on_feed = total_gain_lb / input.adg_lb;

    let total_feed_lb = total_gain_lb * input.feed_conversion;
    let feed_cost = total_feed_lb * ration.cost_per_ton / LB_PER_TON;

    let cattle_cost = input.cattle_price_cwt / LB_PER_CWT * input.in_weight_lb;
    let yardage_cost = days_on_feed * input.yardage_per_day;
    // Feed is bought over the feeding period, so on average half is financed
    let interest_cost = (cattle_cost + feed_cost / 2.0)
        * (input.interest_rate_percent / 100.0)
        * (days_on_feed / 365.0);

    let total_cost = cattle_cost + feed_cost + yardage_cost + input.vet_cost + interest_cost;
    let revenue = input.sale_price_cwt / LB_PER_CWT * input.out_weight_lb;
    let profit = revenue - total_cost;
    let roi_percent = if total_cost > 0.0 {
        profit / total_cost * 100.0
    } else {
        0.0
    };

    let breakeven_sale_cwt = total_cost / input.out_weight_lb * LB_PER_CWT;
    let breakeven_purchase_cwt =
        (revenue - (total_cost - cattle_cost)) / input.in_weight_lb * LB_PER_CWT;

    let mut findings = Vec::new();
    if profit < 0.0 {
        findings.push(Finding::new(
            Severity::Warning,
            FindingCategory::Economics,
            "Projected loss",
            format!(
                "Closeout loses ${:.2}/head; sale price must reach ${:.2}/cwt to break even.",
                -profit, breakeven_sale_cwt
            ),
        ));
    }

    Ok(Closeout {
        ration,
        total_gain_lb,
        days_on_feed,
        total_feed_lb,
        feed_cost,
        cattle_cost,
        yardage_cost,
        vet_cost: input.vet_cost,
        interest_cost,
        total_cost,
        revenue,
        profit,
        roi_percent,
        cost_of_gain: (total_cost - cattle_cost) / total_gain_lb,
        feed_cost_of_gain: feed_cost / total_gain_lb,
        breakeven_sale_cwt,
        breakeven_purchase_cwt,
        findings,
    })
}

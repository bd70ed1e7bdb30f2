//! Sulfide detoxification energetics
//!
//! Follows dietary and water sulfur through rumen reduction to H₂S,
//! absorption and hepatic oxidation back to sulfate
//! (H₂S + 2 O₂ → SO₄²⁻), then prices the oxygen consumed as a net energy
//! cost against maintenance.
//!
//! References: Drewnoski & Hansen (2014), Gould et al. (1997),
//! Brouwer (1965) for the oxycaloric equivalent, NASEM (2016) for NEm.

use crate::errors::EngineResult;
use crate::findings::{sort_findings, Finding, FindingCategory, Severity};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Atomic mass of sulfur, g/mol
pub const MW_S: f64 = 32.065;
/// Molar mass of sulfate, g/mol
pub const MW_SO4: f64 = 96.066;
/// Molar volume of a gas at STP, L/mol
pub const MOLAR_VOLUME_L: f64 = 22.4;
pub const KCAL_PER_L_O2: f64 = 4.89;
/// NEm requirement, Mcal per kg BW^0.75
pub const NEM_COEFFICIENT: f64 = 0.077;
/// Efficiency converting heat to net energy
pub const HEAT_TO_NE: f64 = 0.70;

const TOTAL_S_WARNING_PERCENT: f64 = 0.40;
const TOTAL_S_CRITICAL_PERCENT: f64 = 0.50;
const WATER_SULFATE_WARNING: f64 = 2000.0;
const WATER_SULFATE_CRITICAL: f64 = 3000.0;
const ABSORBED_H2S_WARNING_G: f64 = 40.0;

/// Animal and exposure inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SulfurInput {
    #[validate(range(exclusive_min = 0.0, max = 2000.0))]
    pub body_weight_kg: f64,
    #[validate(range(exclusive_min = 0.0, max = 50.0))]
    pub dmi_kg: f64,
    /// Dietary sulfur, % DM
    #[validate(range(min = 0.0, max = 100.0))]
    pub feed_sulfur_percent: f64,
    /// Drinking water sulfate, mg/L
    #[validate(range(min = 0.0, max = 20000.0))]
    pub water_sulfate_mg_l: f64,
    #[validate(range(min = 0.0, max = 500.0))]
    pub water_intake_l: f64,
    /// Share of intake sulfur reduced to H₂S in the rumen
    #[validate(range(min = 0.0, max = 100.0))]
    pub reduction_percent: f64,
    /// Share of rumen H₂S absorbed across the epithelium
    #[validate(range(min = 0.0, max = 100.0))]
    pub absorption_percent: f64,
    /// Share of absorbed H₂S oxidized by the liver
    #[validate(range(min = 0.0, max = 100.0))]
    pub oxidation_percent: f64,
}

impl Default for SulfurInput {
    fn default() -> Self {
        Self {
            body_weight_kg: 400.0,
            dmi_kg: 10.0,
            feed_sulfur_percent: 0.5,
            water_sulfate_mg_l: 2000.0,
            water_intake_l: 50.0,
            reduction_percent: 70.0,
            absorption_percent: 60.0,
            oxidation_percent: 95.0,
        }
    }
}

/// Sulfur flow and its energetic cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SulfurOutcome {
    pub feed_sulfur_g: f64,
    pub water_sulfur_g: f64,
    pub total_sulfur_g: f64,
    /// Total sulfur intake as % of DMI
    pub total_sulfur_percent_dmi: f64,
    pub rumen_h2s_g: f64,
    pub absorbed_h2s_g: f64,
    pub oxidized_sulfur_g: f64,
    pub oxygen_l: f64,
    pub heat_mcal: f64,
    /// Net energy cost of detoxification, Mcal/day
    pub ne_cost_mcal: f64,
    pub maintenance_nem_mcal: f64,
    pub total_nem_mcal: f64,
    pub maintenance_increase_percent: f64,
    pub findings: Vec<Finding>,
}

/// Compute the sulfide detoxification energy budget
pub fn evaluate_sulfur(input: &SulfurInput) -> EngineResult<SulfurOutcome> {
    input.validate()?;

    let feed_sulfur_g = input.dmi_kg * (input.feed_sulfur_percent / 100.0) * 1000.0;
    let water_sulfate_g = input.water_intake_l * (input.water_sulfate_mg_l / 1000.0);
    let water_sulfur_g = water_sulfate_g * (MW_S / MW_SO4);
    let total_sulfur_g = feed_sulfur_g + water_sulfur_g;
    let total_sulfur_percent_dmi = total_sulfur_g / (input.dmi_kg * 1000.0) * 100.0;

    let rumen_h2s_g = total_sulfur_g * (input.reduction_percent / 100.0);
    let absorbed_h2s_g = rumen_h2s_g * (input.absorption_percent / 100.0);
    let oxidized_sulfur_g = absorbed_h2s_g * (input.oxidation_percent / 100.0);

    // 2 mol O₂ per mol S
    let oxygen_l = oxidized_sulfur_g / MW_S * 2.0 * MOLAR_VOLUME_L;
    let heat_mcal = oxygen_l * KCAL_PER_L_O2 / 1000.0;
    let ne_cost_mcal = heat_mcal / HEAT_TO_NE;

    let maintenance_nem_mcal = NEM_COEFFICIENT * input.body_weight_kg.powf(0.75);

    let mut findings = Vec::new();
    if total_sulfur_percent_dmi > TOTAL_S_CRITICAL_PERCENT {
        findings.push(Finding::new(
            Severity::Critical,
            FindingCategory::Sulfur,
            "Dietary sulfur toxicity",
            format!(
                "Total sulfur is {:.2}% of DMI (max {:.2}%); high risk of polioencephalomalacia.",
                total_sulfur_percent_dmi, TOTAL_S_WARNING_PERCENT
            ),
        ));
    } else if total_sulfur_percent_dmi > TOTAL_S_WARNING_PERCENT {
        findings.push(Finding::new(
            Severity::Warning,
            FindingCategory::Sulfur,
            "Elevated dietary sulfur",
            format!(
                "Total sulfur is {:.2}% of DMI, above the {:.2}% threshold.",
                total_sulfur_percent_dmi, TOTAL_S_WARNING_PERCENT
            ),
        ));
    }

    if input.water_sulfate_mg_l > WATER_SULFATE_CRITICAL {
        findings.push(Finding::new(
            Severity::Critical,
            FindingCategory::Sulfur,
            "Toxic water sulfate",
            format!(
                "Water sulfate is {:.0} mg/L; find an alternative water source.",
                input.water_sulfate_mg_l
            ),
        ));
    } else if input.water_sulfate_mg_l > WATER_SULFATE_WARNING {
        findings.push(Finding::new(
            Severity::Warning,
            FindingCategory::Sulfur,
            "High water sulfate",
            format!(
                "Water sulfate is {:.0} mg/L (recommended max 500 mg/L).",
                input.water_sulfate_mg_l
            ),
        ));
    }

    if absorbed_h2s_g > ABSORBED_H2S_WARNING_G {
        findings.push(Finding::new(
            Severity::Warning,
            FindingCategory::Sulfur,
            "Heavy sulfide burden",
            format!(
                "{:.1} g/day of absorbed H₂S places a very high load on hepatic detoxification.",
                absorbed_h2s_g
            ),
        ));
    }
    sort_findings(&mut findings);

    Ok(SulfurOutcome {
        feed_sulfur_g,
        water_sulfur_g,
        total_sulfur_g,
        total_sulfur_percent_dmi,
        rumen_h2s_g,
        absorbed_h2s_g,
        oxidized_sulfur_g,
        oxygen_l,
        heat_mcal,
        ne_cost_mcal,
        maintenance_nem_mcal,
        total_nem_mcal: maintenance_nem_mcal + ne_cost_mcal,
        maintenance_increase_percent: ne_cost_mcal / maintenance_nem_mcal * 100.0,
        findings,
    })
}

//! Physiological estimator
//!
//! Turns a [`DietProfile`] into rumen-health indices: pH, effective fiber
//! against its diet-type target, nitrogen supply and the methane
//! conversion factor (Ym).

use crate::feeds::Ingredient;
use crate::parameters::{MethaneModel, ModelParameters, NitrogenBasis, PhModel};
use crate::ration::DietProfile;
use serde::{Deserialize, Serialize};

/// Whether the diet is built around forage or concentrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    ForageBased,
    ConcentrateBased,
}

/// Ym and the adjustments that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethaneEstimate {
    /// Baseline selected by forage fraction and starch
    pub baseline: f64,
    /// Propionate shift from starch above threshold
    pub starch_factor: f64,
    /// Biohydrogenation from fat above threshold
    pub fat_factor: f64,
    /// Methanogen suppression at acidotic pH
    pub acidosis_factor: f64,
    /// Faster passage at high intake
    pub intake_factor: f64,
    /// Final Ym, fraction of gross energy
    pub ym: f64,
}

/// Rumen-health indices derived from a diet profile
///
/// `ph` is clamped to the configured physiological interval and every
/// `_percent` field to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalState {
    pub ph: f64,
    /// pH depression from fermentable starch
    pub acid_load: f64,
    /// pH support from peNDF and cation buffers
    pub buffer_capacity: f64,
    pub pe_ndf_percent: f64,
    pub pe_ndf_target: f64,
    pub ndf_percent: f64,
    pub cp_percent: f64,
    pub rdp_percent: f64,
    pub starch_percent: f64,
    pub fat_percent: f64,
    pub forage_percent: f64,
    pub diet_type: DietType,
    pub nitrogen_basis: NitrogenBasis,
    /// CP or RDP percent, whichever the nitrogen model is based on
    pub nitrogen_percent: f64,
    pub methane_yield_fraction: f64,
    pub methane: MethaneEstimate,
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// The pH a diet made only of `ingredient` would have, before clamping
///
/// Acid load and buffering are linear in DMI-weighted averages, so the
/// unclamped pH of a diet is the DMI-weighted mean of its ingredients'
/// contributions. Adding an ingredient therefore moves pH toward its own
/// contribution: it can only lower pH when its contribution is at or below
/// the diet's unclamped pH. A starch source whose contribution is at or
/// below `model.floor` never raises pH in any diet; one above the floor can
/// raise pH of a diet that is already more acidic than it.
pub fn ph_contribution(ingredient: &Ingredient, model: &PhModel) -> f64 {
    let cation = if ingredient.cation_buffer { 1.0 } else { 0.0 };
    model.base - model.acid_coefficient * ingredient.starch * ingredient.ferment_rate
        + model.pe_ndf_buffer_coefficient * ingredient.pe_ndf
        + model.cation_buffer_coefficient * cation
}

/// Estimate rumen pH from the acid load and buffering of a diet
///
/// Returns `(ph, acid_load, buffer_capacity)`. See [`ph_contribution`] for
/// how adding an ingredient shifts the result.
pub fn rumen_ph(profile: &DietProfile, model: &PhModel) -> (f64, f64, f64) {
    let acid_load = model.acid_coefficient * profile.fermentable_starch_index;
    let buffer_capacity = model.pe_ndf_buffer_coefficient * profile.pe_ndf
        + model.cation_buffer_coefficient * profile.cation_buffer_fraction;
    let ph = (model.base - acid_load + buffer_capacity).clamp(model.floor, model.ceiling);
    (ph, acid_load, buffer_capacity)
}

/// Estimate Ym (IPCC Tier 2 baseline with multiplicative adjustments)
pub fn methane_yield(
    forage_percent: f64,
    starch_percent: f64,
    fat_percent: f64,
    acidotic: bool,
    dmi_kg: f64,
    model: &MethaneModel,
) -> MethaneEstimate {
    let baseline = if forage_percent > model.high_forage_percent {
        model.high_forage_ym
    } else if forage_percent < model.low_forage_percent
        && starch_percent > model.feedlot_starch_percent
    {
        model.feedlot_ym
    } else {
        model.mixed_intercept - starch_percent / 100.0 * model.mixed_starch_slope
    };

    let starch_factor = if starch_percent > model.starch_threshold {
        (1.0 - (starch_percent - model.starch_threshold) * model.starch_reduction_per_point)
            .max(0.0)
    } else {
        1.0
    };

    let fat_factor = if fat_percent > model.fat_threshold {
        (1.0 - (fat_percent - model.fat_threshold) * model.fat_reduction_per_point).max(0.0)
    } else {
        1.0
    };

    let acidosis_factor = if acidotic { model.acidosis_factor } else { 1.0 };

    let intake_percent_bw = dmi_kg / model.reference_body_weight_kg * 100.0;
    let intake_factor = if intake_percent_bw > model.high_intake_percent_bw {
        model.high_intake_factor
    } else {
        1.0
    };

    let ym = (baseline * starch_factor * fat_factor * acidosis_factor * intake_factor)
        .max(model.floor);

    MethaneEstimate {
        baseline,
        starch_factor,
        fat_factor,
        acidosis_factor,
        intake_factor,
        ym,
    }
}

/// Derive the physiological state of a diet
pub fn estimate(profile: &DietProfile, params: &ModelParameters) -> PhysiologicalState {
    let (ph, acid_load, buffer_capacity) = rumen_ph(profile, &params.ph);

    let cp_percent = clamp_percent(profile.cp);
    let rdp_percent = clamp_percent(profile.cp * profile.rdp / 100.0);
    let nitrogen_percent = match params.nitrogen.basis {
        NitrogenBasis::CrudeProtein => cp_percent,
        NitrogenBasis::RumenDegradableProtein => rdp_percent,
    };

    let diet_type = if profile.forage_fraction < params.fiber.concentrate_forage_fraction {
        DietType::ConcentrateBased
    } else {
        DietType::ForageBased
    };
    let pe_ndf_target = match diet_type {
        DietType::ForageBased => params.fiber.forage_based_target,
        DietType::ConcentrateBased => params.fiber.concentrate_based_target,
    };

    let forage_percent = clamp_percent(profile.forage_fraction * 100.0);
    let starch_percent = clamp_percent(profile.starch);
    let fat_percent = clamp_percent(profile.fat);

    let methane = methane_yield(
        forage_percent,
        starch_percent,
        fat_percent,
        ph < params.acidity.sara_threshold,
        profile.dmi_kg,
        &params.methane,
    );

    PhysiologicalState {
        ph,
        acid_load,
        buffer_capacity,
        pe_ndf_percent: clamp_percent(profile.pe_ndf),
        pe_ndf_target,
        ndf_percent: clamp_percent(profile.ndf),
        cp_percent,
        rdp_percent,
        starch_percent,
        fat_percent,
        forage_percent,
        diet_type,
        nitrogen_basis: params.nitrogen.basis,
        nitrogen_percent,
        methane_yield_fraction: methane.ym,
        methane,
    }
}

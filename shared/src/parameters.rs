//! Model parameters
//!
//! Every threshold, coefficient and cap used by the engine is a named,
//! serde-deserializable value here. `Default` gives the canonical set; a
//! deployment can override any field through configuration.
//!
//! The physiological bounds in the default set are:
//!
//! - rumen pH clamped to [5.0, 7.1] (below 5.0 is lethal; 7.1 is the upper
//!   end reported for a fully forage-fed rumen)
//! - pH >= 6.2 optimal for cellulolytic bacteria (Russell & Wilson 1996)
//! - pH < 5.8 sub-acute ruminal acidosis (Ohio State criteria)
//! - pH < 5.5 acute acidosis with epithelial damage

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// All engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelParameters {
    pub ph: PhModel,
    pub nitrogen: NitrogenModel,
    pub acidity: AcidityModel,
    pub lipid: LipidModel,
    pub fiber: FiberModel,
    pub non_fiber: NonFiberModel,
    pub methane: MethaneModel,
    pub gross_energy: GrossEnergyModel,
    pub status: StatusBands,
}

// ============================================================================
// Physiological Estimator
// ============================================================================

/// Rumen pH model: `pH = base - acid_load + buffer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhModel {
    /// pH of a moderate forage diet before acid load and buffering
    pub base: f64,
    /// pH units per unit of fermentable-starch index (% starch x Kd)
    pub acid_coefficient: f64,
    /// pH units per % peNDF (rumination and saliva)
    pub pe_ndf_buffer_coefficient: f64,
    /// pH units per DMI fraction of high-cation feeds
    pub cation_buffer_coefficient: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for PhModel {
    fn default() -> Self {
        Self {
            base: 6.5,
            acid_coefficient: 0.12,
            pe_ndf_buffer_coefficient: 0.02,
            cation_buffer_coefficient: 0.25,
            floor: 5.0,
            ceiling: 7.1,
        }
    }
}

/// Which protein measure drives nitrogen adequacy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NitrogenBasis {
    /// Crude protein, % DM
    CrudeProtein,
    /// Rumen degradable protein, % DM (`cp x rdp / 100`)
    #[default]
    RumenDegradableProtein,
}

/// Nitrogen adequacy and its effect on fiber digestion
///
/// Thresholds are expressed in the unit of `basis` (% DM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NitrogenModel {
    pub basis: NitrogenBasis,
    /// At or below this level the nitrogen factor sits at `floor_factor`
    pub floor_at: f64,
    /// Below this level deficiency is critical
    pub critical_below: f64,
    /// At or above this level nitrogen is adequate
    pub adequate_at: f64,
    /// Fiber digestion retained under maximal nitrogen starvation
    pub floor_factor: f64,
    /// Bonus on fiber digestion when nitrogen is adequate
    pub synergy_bonus: f64,
}

impl NitrogenModel {
    /// Simple variant driven by crude protein
    pub fn crude_protein() -> Self {
        Self {
            basis: NitrogenBasis::CrudeProtein,
            floor_at: 6.0,
            critical_below: 8.0,
            adequate_at: 9.0,
            ..Self::default()
        }
    }
}

impl Default for NitrogenModel {
    fn default() -> Self {
        Self {
            basis: NitrogenBasis::RumenDegradableProtein,
            floor_at: 4.0,
            critical_below: 5.0,
            adequate_at: 6.5,
            floor_factor: 0.6,
            synergy_bonus: 0.05,
        }
    }
}

// ============================================================================
// Associative-Effect & Energy Partitioner
// ============================================================================

/// pH effect on cellulolytic bacteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcidityModel {
    /// Fiber digestion is unaffected at or above this pH
    pub optimal_threshold: f64,
    /// Sub-acute ruminal acidosis below this pH
    pub sara_threshold: f64,
    /// Acute acidosis below this pH
    pub acute_threshold: f64,
    /// Fractional penalty per pH unit below `optimal_threshold`
    pub penalty_slope: f64,
    pub max_penalty: f64,
}

impl Default for AcidityModel {
    fn default() -> Self {
        Self {
            optimal_threshold: 6.2,
            sara_threshold: 5.8,
            acute_threshold: 5.5,
            penalty_slope: 1.5,
            max_penalty: 0.85,
        }
    }
}

/// Lipid interference with fiber digestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipidModel {
    /// Dietary fat (% DM) tolerated without penalty
    pub safe_threshold: f64,
    /// Above this fat level the finding is critical
    pub critical_threshold: f64,
    /// Fractional penalty per % fat above `safe_threshold`
    pub penalty_slope: f64,
    pub max_penalty: f64,
}

impl Default for LipidModel {
    fn default() -> Self {
        Self {
            safe_threshold: 6.0,
            critical_threshold: 8.0,
            penalty_slope: 0.15,
            max_penalty: 0.6,
        }
    }
}

/// Effective fiber targets and passage-rate loss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberModel {
    /// peNDF target (% DM) for forage-based diets
    pub forage_based_target: f64,
    /// peNDF target (% DM) for concentrate-based diets
    pub concentrate_based_target: f64,
    /// Diets with a forage fraction below this are concentrate-based
    pub concentrate_forage_fraction: f64,
    /// Energy loss per % peNDF below target
    pub passage_loss_slope: f64,
    pub max_passage_loss: f64,
    /// Shortfall below target (% DM) beyond which the finding is critical
    pub critical_shortfall: f64,
    /// Upper bound of combined fiber efficiency
    pub max_efficiency: f64,
}

impl Default for FiberModel {
    fn default() -> Self {
        Self {
            forage_based_target: 19.0,
            concentrate_based_target: 12.0,
            concentrate_forage_fraction: 0.5,
            passage_loss_slope: 0.015,
            max_passage_loss: 0.20,
            critical_shortfall: 8.0,
            max_efficiency: 1.05,
        }
    }
}

/// Non-fiber energy losses under severe acidosis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonFiberModel {
    /// Efficiency when pH is below the SARA threshold
    pub sara_efficiency: f64,
    /// Efficiency when pH is below the acute threshold
    pub acute_efficiency: f64,
}

impl Default for NonFiberModel {
    fn default() -> Self {
        Self {
            sara_efficiency: 0.96,
            acute_efficiency: 0.90,
        }
    }
}

/// Methane conversion factor (Ym) model, IPCC Tier 2 with adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethaneModel {
    /// Forage % DM above which the high-forage baseline applies
    pub high_forage_percent: f64,
    pub high_forage_ym: f64,
    /// Forage % DM below which (with high starch) the feedlot baseline applies
    pub low_forage_percent: f64,
    pub feedlot_starch_percent: f64,
    pub feedlot_ym: f64,
    /// Mixed diets: `intercept - starch/100 x slope`
    pub mixed_intercept: f64,
    pub mixed_starch_slope: f64,
    /// Starch % DM above which the propionate shift lowers Ym
    pub starch_threshold: f64,
    /// Fractional Ym reduction per % starch above threshold
    pub starch_reduction_per_point: f64,
    /// Fat % DM above which biohydrogenation lowers Ym
    pub fat_threshold: f64,
    /// Fractional Ym reduction per % fat above threshold
    pub fat_reduction_per_point: f64,
    /// Fat % DM above which methanogen inhibition is reported
    pub fat_finding_threshold: f64,
    /// Ym multiplier when pH is in the acidosis range
    pub acidosis_factor: f64,
    pub reference_body_weight_kg: f64,
    /// DMI as % of body weight above which passage rate lowers Ym
    pub high_intake_percent_bw: f64,
    pub high_intake_factor: f64,
    pub floor: f64,
}

impl Default for MethaneModel {
    fn default() -> Self {
        Self {
            high_forage_percent: 80.0,
            high_forage_ym: 0.065,
            low_forage_percent: 20.0,
            feedlot_starch_percent: 60.0,
            feedlot_ym: 0.030,
            mixed_intercept: 0.065,
            mixed_starch_slope: 0.035,
            starch_threshold: 25.0,
            starch_reduction_per_point: 0.012,
            fat_threshold: 3.0,
            fat_reduction_per_point: 0.09,
            fat_finding_threshold: 4.5,
            acidosis_factor: 0.55,
            reference_body_weight_kg: 600.0,
            high_intake_percent_bw: 2.5,
            high_intake_factor: 0.92,
            floor: 0.015,
        }
    }
}

/// Gross energy partition into fecal, methane, urinary and metabolizable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrossEnergyModel {
    pub base_digestibility: f64,
    /// Digestibility gained per unit starch fraction
    pub starch_coefficient: f64,
    /// Digestibility lost per unit NDF fraction
    pub ndf_coefficient: f64,
    /// Urinary energy as a fraction of GE
    pub urinary_fraction: f64,
}

impl Default for GrossEnergyModel {
    fn default() -> Self {
        Self {
            base_digestibility: 0.65,
            starch_coefficient: 0.20,
            ndf_coefficient: 0.15,
            urinary_fraction: 0.04,
        }
    }
}

/// Status badge bands not already implied by the stressor models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusBands {
    pub cp_optimal: f64,
    pub cp_critical: f64,
    pub rdp_optimal: f64,
    pub rdp_critical: f64,
    pub efficiency_optimal: f64,
    pub efficiency_critical: f64,
    pub ym_low: f64,
    pub ym_elevated: f64,
    /// A stressor factor within this distance of neutral produces no finding
    pub finding_tolerance: f64,
}

impl Default for StatusBands {
    fn default() -> Self {
        Self {
            cp_optimal: 10.0,
            cp_critical: 8.0,
            rdp_optimal: 6.5,
            rdp_critical: 5.0,
            efficiency_optimal: 0.85,
            efficiency_critical: 0.60,
            ym_low: 0.035,
            ym_elevated: 0.050,
            finding_tolerance: 1e-3,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ModelParameters {
    /// Every numeric parameter as (dotted path, value)
    fn numeric_fields(&self) -> [(&'static str, f64); 59] {
        [
            ("ph.base", self.ph.base),
            ("ph.acid_coefficient", self.ph.acid_coefficient),
            ("ph.pe_ndf_buffer_coefficient", self.ph.pe_ndf_buffer_coefficient),
            ("ph.cation_buffer_coefficient", self.ph.cation_buffer_coefficient),
            ("ph.floor", self.ph.floor),
            ("ph.ceiling", self.ph.ceiling),
            ("nitrogen.floor_at", self.nitrogen.floor_at),
            ("nitrogen.critical_below", self.nitrogen.critical_below),
            ("nitrogen.adequate_at", self.nitrogen.adequate_at),
            ("nitrogen.floor_factor", self.nitrogen.floor_factor),
            ("nitrogen.synergy_bonus", self.nitrogen.synergy_bonus),
            ("acidity.optimal_threshold", self.acidity.optimal_threshold),
            ("acidity.sara_threshold", self.acidity.sara_threshold),
            ("acidity.acute_threshold", self.acidity.acute_threshold),
            ("acidity.penalty_slope", self.acidity.penalty_slope),
            ("acidity.max_penalty", self.acidity.max_penalty),
            ("lipid.safe_threshold", self.lipid.safe_threshold),
            ("lipid.critical_threshold", self.lipid.critical_threshold),
            ("lipid.penalty_slope", self.lipid.penalty_slope),
            ("lipid.max_penalty", self.lipid.max_penalty),
            ("fiber.forage_based_target", self.fiber.forage_based_target),
            ("fiber.concentrate_based_target", self.fiber.concentrate_based_target),
            ("fiber.concentrate_forage_fraction", self.fiber.concentrate_forage_fraction),
            ("fiber.passage_loss_slope", self.fiber.passage_loss_slope),
            ("fiber.max_passage_loss", self.fiber.max_passage_loss),
            ("fiber.critical_shortfall", self.fiber.critical_shortfall),
            ("fiber.max_efficiency", self.fiber.max_efficiency),
            ("non_fiber.sara_efficiency", self.non_fiber.sara_efficiency),
            ("non_fiber.acute_efficiency", self.non_fiber.acute_efficiency),
            ("methane.high_forage_percent", self.methane.high_forage_percent),
            ("methane.high_forage_ym", self.methane.high_forage_ym),
            ("methane.low_forage_percent", self.methane.low_forage_percent),
            ("methane.feedlot_starch_percent", self.methane.feedlot_starch_percent),
            ("methane.feedlot_ym", self.methane.feedlot_ym),
            ("methane.mixed_intercept", self.methane.mixed_intercept),
            ("methane.mixed_starch_slope", self.methane.mixed_starch_slope),
            ("methane.starch_threshold", self.methane.starch_threshold),
            ("methane.starch_reduction_per_point", self.methane.starch_reduction_per_point),
            ("methane.fat_threshold", self.methane.fat_threshold),
            ("methane.fat_reduction_per_point", self.methane.fat_reduction_per_point),
            ("methane.fat_finding_threshold", self.methane.fat_finding_threshold),
            ("methane.acidosis_factor", self.methane.acidosis_factor),
            ("methane.reference_body_weight_kg", self.methane.reference_body_weight_kg),
            ("methane.high_intake_percent_bw", self.methane.high_intake_percent_bw),
            ("methane.high_intake_factor", self.methane.high_intake_factor),
            ("methane.floor", self.methane.floor),
            ("gross_energy.base_digestibility", self.gross_energy.base_digestibility),
            ("gross_energy.starch_coefficient", self.gross_energy.starch_coefficient),
            ("gross_energy.ndf_coefficient", self.gross_energy.ndf_coefficient),
            ("gross_energy.urinary_fraction", self.gross_energy.urinary_fraction),
            ("status.cp_optimal", self.status.cp_optimal),
            ("status.cp_critical", self.status.cp_critical),
            ("status.rdp_optimal", self.status.rdp_optimal),
            ("status.rdp_critical", self.status.rdp_critical),
            ("status.efficiency_optimal", self.status.efficiency_optimal),
            ("status.efficiency_critical", self.status.efficiency_critical),
            ("status.ym_low", self.status.ym_low),
            ("status.ym_elevated", self.status.ym_elevated),
            ("status.finding_tolerance", self.status.finding_tolerance),
        ]
    }

    /// Reject parameter sets whose bands overlap or whose caps leave the
    /// engine's outputs unbounded
    pub fn validate(&self) -> EngineResult<()> {
        let non_finite: Vec<String> = self
            .numeric_fields()
            .into_iter()
            .filter(|(_, value)| !value.is_finite())
            .map(|(field, value)| format!("{} must be a finite number (got {})", field, value))
            .collect();
        if !non_finite.is_empty() {
            return Err(EngineError::InvalidInput(non_finite.join("; ")));
        }

        let mut problems = Vec::new();

        if !(self.ph.floor < self.ph.ceiling) {
            problems.push("ph.floor must be below ph.ceiling");
        }
        let acidity = &self.acidity;
        if !(acidity.acute_threshold <= acidity.sara_threshold
            && acidity.sara_threshold <= acidity.optimal_threshold)
        {
            problems.push("acidity thresholds must satisfy acute <= sara <= optimal");
        }
        if !(0.0..1.0).contains(&acidity.max_penalty) {
            problems.push("acidity.max_penalty must be in [0, 1)");
        }
        let nitrogen = &self.nitrogen;
        if !(nitrogen.floor_at < nitrogen.adequate_at
            && nitrogen.critical_below <= nitrogen.adequate_at)
        {
            problems.push("nitrogen thresholds must satisfy floor_at < adequate_at and critical_below <= adequate_at");
        }
        if !(nitrogen.floor_factor > 0.0 && nitrogen.floor_factor <= 1.0) {
            problems.push("nitrogen.floor_factor must be in (0, 1]");
        }
        if nitrogen.synergy_bonus < 0.0 {
            problems.push("nitrogen.synergy_bonus cannot be negative");
        }
        if !(0.0..1.0).contains(&self.lipid.max_penalty) {
            problems.push("lipid.max_penalty must be in [0, 1)");
        }
        if self.lipid.critical_threshold < self.lipid.safe_threshold {
            problems.push("lipid.critical_threshold must not be below lipid.safe_threshold");
        }
        if !(0.0..=1.0).contains(&self.fiber.max_passage_loss) {
            problems.push("fiber.max_passage_loss must be in [0, 1]");
        }
        if self.fiber.max_efficiency < 1.0 {
            problems.push("fiber.max_efficiency must be at least 1.0");
        }
        for efficiency in [self.non_fiber.sara_efficiency, self.non_fiber.acute_efficiency] {
            if !(0.0..=1.0).contains(&efficiency) {
                problems.push("non_fiber efficiencies must be in [0, 1]");
                break;
            }
        }
        if !(self.methane.floor > 0.0 && self.methane.floor <= self.methane.feedlot_ym) {
            problems.push("methane.floor must be positive and not above methane.feedlot_ym");
        }
        if self.methane.reference_body_weight_kg <= 0.0 {
            problems.push("methane.reference_body_weight_kg must be positive");
        }
        let status = &self.status;
        if status.cp_critical > status.cp_optimal
            || status.rdp_critical > status.rdp_optimal
            || status.efficiency_critical > status.efficiency_optimal
            || status.ym_low > status.ym_elevated
        {
            problems.push("status bands must have their critical edge below the optimal edge");
        }
        if !(0.0..1.0).contains(&self.gross_energy.urinary_fraction) {
            problems.push("gross_energy.urinary_fraction must be in [0, 1)");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidInput(problems.join("; ")))
        }
    }

    /// Largest possible ratio of realized to expected energy
    pub fn max_synergy_bonus(&self) -> f64 {
        (1.0 + self.nitrogen.synergy_bonus).min(self.fiber.max_efficiency) - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        assert!(ModelParameters::default().validate().is_ok());
    }

    #[test]
    fn test_crude_protein_variant_is_valid() {
        let params = ModelParameters {
            nitrogen: NitrogenModel::crude_protein(),
            ..ModelParameters::default()
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.nitrogen.basis, NitrogenBasis::CrudeProtein);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let params: ModelParameters = toml::from_str(
            r#"
            [acidity]
            penalty_slope = nan
            "#,
        )
        .unwrap();
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("acidity.penalty_slope"));

        let mut params = ModelParameters::default();
        params.methane.high_intake_factor = f64::INFINITY;
        params.gross_energy.ndf_coefficient = f64::NAN;
        let message = params.validate().unwrap_err().to_string();
        assert!(message.contains("methane.high_intake_factor"));
        assert!(message.contains("gross_energy.ndf_coefficient"));
    }

    #[test]
    fn test_rejects_inverted_ph_bounds() {
        let mut params = ModelParameters::default();
        params.ph.floor = 7.5;
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("ph.floor"));
    }

    #[test]
    fn test_rejects_overlapping_acidity_bands() {
        let mut params = ModelParameters::default();
        params.acidity.sara_threshold = 6.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_max_synergy_bonus() {
        let params = ModelParameters::default();
        assert!((params.max_synergy_bonus() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let params: ModelParameters = toml::from_str(
            r#"
            [ph]
            floor = 5.2

            [nitrogen]
            basis = "crude_protein"
            "#,
        )
        .unwrap();
        assert_eq!(params.ph.floor, 5.2);
        assert_eq!(params.ph.ceiling, 7.1);
        assert_eq!(params.nitrogen.basis, NitrogenBasis::CrudeProtein);
        assert_eq!(params.lipid, LipidModel::default());
    }
}

//! Associative effects and energy partitioning
//!
//! Each stressor is scored on its own. Nitrogen, pH and fat factors
//! compound multiplicatively on the fiber-digestible energy; insufficient
//! effective fiber is a separate subtractive passage loss. Non-fiber energy
//! only suffers under acidosis.

use crate::findings::{
    indicator_statuses, sort_findings, Finding, FindingCategory, IndicatorStatus, Severity,
};
use crate::parameters::{
    AcidityModel, FiberModel, GrossEnergyModel, LipidModel, ModelParameters, NitrogenBasis,
    NitrogenModel, NonFiberModel,
};
use crate::physiology::PhysiologicalState;
use crate::ration::DietProfile;
use serde::{Deserialize, Serialize};

// ============================================================================
// Outcome Types
// ============================================================================

/// Individual stress adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressFactors {
    /// Microbial nitrogen supply, `floor_factor..=1 + synergy_bonus`
    pub nitrogen: f64,
    /// Cellulolytic activity at the estimated pH
    pub ph: f64,
    /// Lipid coating and antimicrobial effect
    pub fat: f64,
    /// Fraction of fiber energy lost to early passage
    pub passage_loss: f64,
}

/// Gross energy intake split by fate, Mcal/day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossEnergyPartition {
    pub gross_energy: f64,
    /// Apparent digestibility after associative effects
    pub digestibility: f64,
    pub fecal_energy: f64,
    pub digestible_energy: f64,
    pub methane_energy: f64,
    pub urinary_energy: f64,
    pub metabolizable_energy: f64,
}

/// Realized vs. expected energy with the diagnostics behind it
///
/// Energy fields are kg TDN/day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyOutcome {
    pub expected_energy: f64,
    pub realized_energy: f64,
    pub wasted_energy: f64,
    pub factors: StressFactors,
    pub fiber_efficiency: f64,
    pub non_fiber_efficiency: f64,
    pub findings: Vec<Finding>,
    pub statuses: Vec<IndicatorStatus>,
    pub energy_partition: GrossEnergyPartition,
}

// ============================================================================
// Stress Factors
// ============================================================================

/// Fiber digestion retained at a given nitrogen supply
///
/// Linear between `floor_at` and `adequate_at`; adequate supply earns the
/// synergy bonus.
pub fn nitrogen_factor(level: f64, model: &NitrogenModel) -> f64 {
    if level >= model.adequate_at {
        1.0 + model.synergy_bonus
    } else if level <= model.floor_at {
        model.floor_factor
    } else {
        let fraction = (level - model.floor_at) / (model.adequate_at - model.floor_at);
        model.floor_factor + (1.0 - model.floor_factor) * fraction
    }
}

pub fn ph_factor(ph: f64, model: &AcidityModel) -> f64 {
    if ph >= model.optimal_threshold {
        1.0
    } else {
        1.0 - ((model.optimal_threshold - ph) * model.penalty_slope).min(model.max_penalty)
    }
}

pub fn fat_factor(fat_percent: f64, model: &LipidModel) -> f64 {
    if fat_percent <= model.safe_threshold {
        1.0
    } else {
        1.0 - ((fat_percent - model.safe_threshold) * model.penalty_slope).min(model.max_penalty)
    }
}

/// Fraction of fiber energy lost when peNDF falls short of its target
pub fn passage_loss(pe_ndf_percent: f64, target: f64, model: &FiberModel) -> f64 {
    let shortfall = (target - pe_ndf_percent).max(0.0);
    (shortfall * model.passage_loss_slope).min(model.max_passage_loss)
}

pub fn non_fiber_efficiency(ph: f64, acidity: &AcidityModel, model: &NonFiberModel) -> f64 {
    if ph < acidity.acute_threshold {
        model.acute_efficiency
    } else if ph < acidity.sara_threshold {
        model.sara_efficiency
    } else {
        1.0
    }
}

/// Split gross energy intake into fecal, methane, urinary and ME
pub fn gross_energy_partition(
    profile: &DietProfile,
    ym: f64,
    realized_ratio: f64,
    model: &GrossEnergyModel,
) -> GrossEnergyPartition {
    let base = model.base_digestibility + profile.starch / 100.0 * model.starch_coefficient
        - profile.ndf / 100.0 * model.ndf_coefficient;
    let digestibility = (base * realized_ratio).clamp(0.0, 1.0);

    let gross_energy = profile.total_gross_energy;
    let digestible_energy = gross_energy * digestibility;
    let methane_energy = gross_energy * ym;
    let urinary_energy = gross_energy * model.urinary_fraction;

    GrossEnergyPartition {
        gross_energy,
        digestibility,
        fecal_energy: gross_energy - digestible_energy,
        digestible_energy,
        methane_energy,
        urinary_energy,
        metabolizable_energy: (digestible_energy - methane_energy - urinary_energy).max(0.0),
    }
}

// ============================================================================
// Findings
// ============================================================================

fn nitrogen_unit(basis: NitrogenBasis) -> &'static str {
    match basis {
        NitrogenBasis::CrudeProtein => "CP",
        NitrogenBasis::RumenDegradableProtein => "RDP",
    }
}

fn stressor_findings(
    profile: &DietProfile,
    state: &PhysiologicalState,
    factors: &StressFactors,
    non_fiber: f64,
    params: &ModelParameters,
) -> Vec<Finding> {
    let tolerance = params.status.finding_tolerance;
    let mut findings = Vec::new();

    let unit = nitrogen_unit(state.nitrogen_basis);
    if factors.nitrogen > 1.0 + tolerance {
        let message = if profile.protein_supplement_fraction > 0.0
            && profile.forage_fraction >= params.fiber.concentrate_forage_fraction
        {
            format!(
                "Protein supplement lifts {} to {:.1}% and feeds cellulolytic microbes; forage fiber digestion exceeds its stand-alone value.",
                unit, state.nitrogen_percent
            )
        } else {
            format!(
                "{} at {:.1}% fully supports microbial growth; fiber digestion gains a synergy bonus.",
                unit, state.nitrogen_percent
            )
        };
        findings.push(Finding::new(
            Severity::Info,
            FindingCategory::Synergy,
            "Positive associative effect",
            message,
        ));
    } else if factors.nitrogen < 1.0 - tolerance {
        let severity = if state.nitrogen_percent < params.nitrogen.critical_below {
            Severity::Critical
        } else {
            Severity::Warning
        };
        findings.push(Finding::new(
            severity,
            FindingCategory::Nitrogen,
            "Nitrogen deficiency",
            format!(
                "{} at {:.1}% starves rumen microbes; fiber digestion runs at {:.0}% of potential.",
                unit,
                state.nitrogen_percent,
                factors.nitrogen * 100.0
            ),
        ));
    }

    if factors.ph < 1.0 - tolerance {
        let acidity = &params.acidity;
        let (severity, title) = if state.ph < acidity.acute_threshold {
            (Severity::Critical, "Acute ruminal acidosis")
        } else if state.ph < acidity.sara_threshold {
            (Severity::Critical, "Sub-acute ruminal acidosis")
        } else {
            (Severity::Warning, "Suboptimal rumen pH")
        };
        findings.push(Finding::new(
            severity,
            FindingCategory::Acidity,
            title,
            format!(
                "pH {:.2} is below {:.1}; cellulolytic bacteria lose {:.0}% of their activity.",
                state.ph,
                acidity.optimal_threshold,
                (1.0 - factors.ph) * 100.0
            ),
        ));
    }

    if factors.fat < 1.0 - tolerance {
        let severity = if state.fat_percent > params.lipid.critical_threshold {
            Severity::Critical
        } else {
            Severity::Warning
        };
        findings.push(Finding::new(
            severity,
            FindingCategory::Lipid,
            "Lipid interference",
            format!(
                "Dietary fat at {:.1}% exceeds {:.1}%; lipid coats fiber particles and inhibits microbes.",
                state.fat_percent, params.lipid.safe_threshold
            ),
        ));
    }

    if factors.passage_loss > tolerance {
        let shortfall = state.pe_ndf_target - state.pe_ndf_percent;
        let severity = if shortfall > params.fiber.critical_shortfall {
            Severity::Critical
        } else {
            Severity::Warning
        };
        findings.push(Finding::new(
            severity,
            FindingCategory::EffectiveFiber,
            "Insufficient effective fiber",
            format!(
                "peNDF {:.1}% is below the {:.0}% target; feed leaves the rumen early and {:.1}% of fiber energy is lost.",
                state.pe_ndf_percent,
                state.pe_ndf_target,
                factors.passage_loss * 100.0
            ),
        ));
    }

    if non_fiber < 1.0 - tolerance {
        let (severity, title) = if state.ph < params.acidity.acute_threshold {
            (Severity::Critical, "Epithelial damage")
        } else {
            (Severity::Warning, "Epithelial stress")
        };
        findings.push(Finding::new(
            severity,
            FindingCategory::Epithelium,
            title,
            format!(
                "Acid injury to the rumen wall cuts non-fiber energy absorption by {:.0}%.",
                (1.0 - non_fiber) * 100.0
            ),
        ));
    }

    if state.fat_percent > params.methane.fat_finding_threshold {
        findings.push(Finding::new(
            Severity::Info,
            FindingCategory::Methane,
            "Methanogen inhibition",
            format!(
                "Fat at {:.1}% suppresses methanogens through biohydrogenation; Ym falls to {:.1}%.",
                state.fat_percent,
                state.methane_yield_fraction * 100.0
            ),
        ));
    }

    if state.ph < params.acidity.sara_threshold {
        findings.push(Finding::new(
            Severity::Info,
            FindingCategory::Methane,
            "Acidosis methane paradox",
            "Methane output is low only because acid has killed the methanogens; this is not a sustainable mitigation.",
        ));
    }

    sort_findings(&mut findings);
    findings
}

// ============================================================================
// Partition
// ============================================================================

/// Translate physiological stress into realized energy
pub fn partition(
    profile: &DietProfile,
    state: &PhysiologicalState,
    params: &ModelParameters,
) -> EnergyOutcome {
    let factors = StressFactors {
        nitrogen: nitrogen_factor(state.nitrogen_percent, &params.nitrogen),
        ph: ph_factor(state.ph, &params.acidity),
        fat: fat_factor(state.fat_percent, &params.lipid),
        passage_loss: passage_loss(state.pe_ndf_percent, state.pe_ndf_target, &params.fiber),
    };

    let fiber_efficiency = (factors.nitrogen * factors.ph * factors.fat - factors.passage_loss)
        .clamp(0.0, params.fiber.max_efficiency);
    let non_fiber = non_fiber_efficiency(state.ph, &params.acidity, &params.non_fiber);

    let expected_energy = profile.expected_energy();
    let realized_energy = profile.fiber_energy_potential * fiber_efficiency
        + profile.non_fiber_energy_potential * non_fiber;
    let realized_ratio = if expected_energy > 0.0 {
        realized_energy / expected_energy
    } else {
        1.0
    };

    let findings = stressor_findings(profile, state, &factors, non_fiber, params);
    let statuses = indicator_statuses(state, fiber_efficiency, params);
    let energy_partition = gross_energy_partition(
        profile,
        state.methane_yield_fraction,
        realized_ratio,
        &params.gross_energy,
    );

    EnergyOutcome {
        expected_energy,
        realized_energy,
        wasted_energy: expected_energy - realized_energy,
        factors,
        fiber_efficiency,
        non_fiber_efficiency: non_fiber,
        findings,
        statuses,
        energy_partition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nitrogen_factor_curve() {
        let model = NitrogenModel::default();
        assert_eq!(nitrogen_factor(2.0, &model), 0.6);
        assert_eq!(nitrogen_factor(4.0, &model), 0.6);
        assert!((nitrogen_factor(4.2, &model) - 0.632).abs() < 1e-12);
        assert!((nitrogen_factor(5.25, &model) - 0.8).abs() < 1e-12);
        assert_eq!(nitrogen_factor(6.5, &model), 1.05);
        assert_eq!(nitrogen_factor(12.0, &model), 1.05);
    }

    #[test]
    fn test_ph_factor_cap() {
        let model = AcidityModel::default();
        assert_eq!(ph_factor(6.5, &model), 1.0);
        assert!((ph_factor(6.0, &model) - 0.7).abs() < 1e-12);
        assert!((ph_factor(5.0, &model) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_fat_factor_cap() {
        let model = LipidModel::default();
        assert_eq!(fat_factor(5.0, &model), 1.0);
        assert!((fat_factor(8.0, &model) - 0.7).abs() < 1e-12);
        assert!((fat_factor(20.0, &model) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_passage_loss_cap() {
        let model = FiberModel::default();
        assert_eq!(passage_loss(25.0, 19.0, &model), 0.0);
        assert!((passage_loss(9.0, 19.0, &model) - 0.15).abs() < 1e-12);
        assert_eq!(passage_loss(0.0, 19.0, &model), 0.20);
    }

    #[test]
    fn test_non_fiber_efficiency_bands() {
        let acidity = AcidityModel::default();
        let model = NonFiberModel::default();
        assert_eq!(non_fiber_efficiency(6.0, &acidity, &model), 1.0);
        assert_eq!(non_fiber_efficiency(5.7, &acidity, &model), 0.96);
        assert_eq!(non_fiber_efficiency(5.2, &acidity, &model), 0.90);
    }
}

//! Diagnostic findings and status badges

use crate::parameters::ModelParameters;
use crate::physiology::PhysiologicalState;
use serde::{Deserialize, Serialize};

// ============================================================================
// Severity Taxonomy
// ============================================================================

/// Fixed severity taxonomy, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Optimal,
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Optimal => "optimal",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Nitrogen,
    Acidity,
    Lipid,
    EffectiveFiber,
    Epithelium,
    Methane,
    Synergy,
    Sulfur,
    Economics,
}

/// One diagnostic classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: FindingCategory,
    pub title: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        severity: Severity,
        category: FindingCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Order findings worst first, then by category
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.category.cmp(&b.category))
    });
}

// ============================================================================
// Status Badges
// ============================================================================

/// Indicators that carry a status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Ph,
    CrudeProtein,
    RumenDegradableProtein,
    EffectiveFiber,
    Fat,
    FiberEfficiency,
    MethaneYield,
}

/// Classified value of one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStatus {
    pub indicator: Indicator,
    pub value: f64,
    pub severity: Severity,
    pub label: String,
}

impl IndicatorStatus {
    fn new(indicator: Indicator, value: f64, severity: Severity, label: &str) -> Self {
        Self {
            indicator,
            value,
            severity,
            label: label.to_string(),
        }
    }
}

/// Classify a value where higher is better
fn higher_is_better(value: f64, optimal: f64, critical: f64) -> Severity {
    if value >= optimal {
        Severity::Optimal
    } else if value >= critical {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Classify a value where lower is better
fn lower_is_better(value: f64, optimal: f64, critical: f64) -> Severity {
    if value <= optimal {
        Severity::Optimal
    } else if value <= critical {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

fn ph_status(ph: f64, params: &ModelParameters) -> IndicatorStatus {
    let acidity = &params.acidity;
    let (severity, label) = if ph >= acidity.optimal_threshold {
        (Severity::Optimal, "Optimal")
    } else if ph >= acidity.sara_threshold {
        (Severity::Warning, "Marginal")
    } else if ph >= acidity.acute_threshold {
        (Severity::Critical, "SARA")
    } else {
        (Severity::Critical, "Acute acidosis")
    };
    IndicatorStatus::new(Indicator::Ph, ph, severity, label)
}

fn supply_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Optimal | Severity::Info => "Adequate",
        Severity::Warning => "Low",
        Severity::Critical => "Deficient",
    }
}

/// Status badges for every indicator of an evaluated diet
pub fn indicator_statuses(
    state: &PhysiologicalState,
    fiber_efficiency: f64,
    params: &ModelParameters,
) -> Vec<IndicatorStatus> {
    let bands = &params.status;
    let mut statuses = vec![ph_status(state.ph, params)];

    let cp = higher_is_better(state.cp_percent, bands.cp_optimal, bands.cp_critical);
    statuses.push(IndicatorStatus::new(
        Indicator::CrudeProtein,
        state.cp_percent,
        cp,
        supply_label(cp),
    ));

    let rdp = higher_is_better(state.rdp_percent, bands.rdp_optimal, bands.rdp_critical);
    statuses.push(IndicatorStatus::new(
        Indicator::RumenDegradableProtein,
        state.rdp_percent,
        rdp,
        supply_label(rdp),
    ));

    let pe_ndf = higher_is_better(
        state.pe_ndf_percent,
        state.pe_ndf_target,
        state.pe_ndf_target - params.fiber.critical_shortfall,
    );
    let pe_ndf_label = match pe_ndf {
        Severity::Optimal | Severity::Info => "On target",
        Severity::Warning => "Below target",
        Severity::Critical => "Severely deficient",
    };
    statuses.push(IndicatorStatus::new(
        Indicator::EffectiveFiber,
        state.pe_ndf_percent,
        pe_ndf,
        pe_ndf_label,
    ));

    let fat = lower_is_better(
        state.fat_percent,
        params.lipid.safe_threshold,
        params.lipid.critical_threshold,
    );
    let fat_label = match fat {
        Severity::Optimal | Severity::Info => "Safe",
        Severity::Warning => "High",
        Severity::Critical => "Toxic",
    };
    statuses.push(IndicatorStatus::new(Indicator::Fat, state.fat_percent, fat, fat_label));

    let efficiency = if fiber_efficiency > bands.efficiency_optimal {
        (Severity::Optimal, "Efficient")
    } else if fiber_efficiency > bands.efficiency_critical {
        (Severity::Warning, "Impaired")
    } else {
        (Severity::Critical, "Collapsed")
    };
    statuses.push(IndicatorStatus::new(
        Indicator::FiberEfficiency,
        fiber_efficiency,
        efficiency.0,
        efficiency.1,
    ));

    let ym = state.methane_yield_fraction;
    let ym_label = if ym < bands.ym_low {
        "Low"
    } else if ym < bands.ym_elevated {
        "Moderate"
    } else {
        "Elevated"
    };
    statuses.push(IndicatorStatus::new(
        Indicator::MethaneYield,
        ym,
        Severity::Info,
        ym_label,
    ));

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Optimal);
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_sort_findings_worst_first() {
        let mut findings = vec![
            Finding::new(Severity::Info, FindingCategory::Methane, "a", ""),
            Finding::new(Severity::Critical, FindingCategory::Lipid, "b", ""),
            Finding::new(Severity::Critical, FindingCategory::Nitrogen, "c", ""),
            Finding::new(Severity::Warning, FindingCategory::Acidity, "d", ""),
        ];
        sort_findings(&mut findings);
        let titles: Vec<_> = findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(higher_is_better(10.0, 10.0, 8.0), Severity::Optimal);
        assert_eq!(higher_is_better(8.0, 10.0, 8.0), Severity::Warning);
        assert_eq!(higher_is_better(7.9, 10.0, 8.0), Severity::Critical);
        assert_eq!(lower_is_better(6.0, 6.0, 8.0), Severity::Optimal);
        assert_eq!(lower_is_better(8.0, 6.0, 8.0), Severity::Warning);
        assert_eq!(lower_is_better(8.1, 6.0, 8.0), Severity::Critical);
    }

    #[test]
    fn test_ph_status_labels() {
        let params = ModelParameters::default();
        assert_eq!(ph_status(6.5, &params).label, "Optimal");
        assert_eq!(ph_status(6.0, &params).severity, Severity::Warning);
        assert_eq!(ph_status(5.6, &params).label, "SARA");
        assert_eq!(ph_status(5.2, &params).label, "Acute acidosis");
    }
}

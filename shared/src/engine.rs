//! Diet evaluation engine
//!
//! Runs the four-stage pipeline (library lookup, aggregation, physiological
//! estimate, energy partition) behind a single `evaluate` call. The engine
//! holds only read-only configuration, so one instance can be shared
//! across threads.

use crate::errors::EngineResult;
use crate::feeds::FeedLibrary;
use crate::parameters::ModelParameters;
use crate::partition::{partition, EnergyOutcome};
use crate::physiology::{estimate, PhysiologicalState};
use crate::ration::{aggregate, DietProfile, Ration};
use serde::{Deserialize, Serialize};

/// Everything computed for one ration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub profile: DietProfile,
    pub state: PhysiologicalState,
    pub outcome: EnergyOutcome,
}

#[derive(Debug, Clone)]
pub struct DietEngine {
    library: FeedLibrary,
    params: ModelParameters,
}

impl DietEngine {
    /// Build an engine, rejecting inconsistent parameters
    pub fn new(library: FeedLibrary, params: ModelParameters) -> EngineResult<Self> {
        params.validate()?;
        Ok(Self { library, params })
    }

    /// Standard catalog with default parameters
    pub fn standard() -> Self {
        Self {
            library: FeedLibrary::standard(),
            params: ModelParameters::default(),
        }
    }

    pub fn library(&self) -> &FeedLibrary {
        &self.library
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Evaluate `(ingredient name, kg DM/day)` pairs
    pub fn evaluate<S: AsRef<str>>(&self, ration: &[(S, f64)]) -> EngineResult<Evaluation> {
        self.evaluate_ration(&Ration::from(ration))
    }

    pub fn evaluate_ration(&self, ration: &Ration) -> EngineResult<Evaluation> {
        let profile = aggregate(&self.library, ration)?;
        let state = estimate(&profile, &self.params);
        let outcome = partition(&profile, &state, &self.params);
        Ok(Evaluation {
            profile,
            state,
            outcome,
        })
    }
}

impl Default for DietEngine {
    fn default() -> Self {
        Self::standard()
    }
}

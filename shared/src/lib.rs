//! Ration Lab Shared Library
//!
//! The ruminant diet evaluation engine and its companion calculators,
//! shared by the HTTP backend and the WASM bindings. Pure computation, no
//! I/O.
//!
//! Pipeline: [`feeds`] → [`ration`] → [`physiology`] → [`partition`],
//! driven by [`engine::DietEngine`].

pub mod engine;
pub mod errors;
pub mod feedlot;
pub mod feeds;
pub mod findings;
pub mod parameters;
pub mod partition;
pub mod physiology;
pub mod ration;
pub mod sulfur;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use engine::{DietEngine, Evaluation};
pub use errors::*;
pub use feedlot::{closeout, ration_cost, Closeout, CloseoutInput, RationCost, RationCostInput};
pub use feeds::{FeedCatalogFile, FeedClass, FeedLibrary, Ingredient};
pub use findings::{Finding, FindingCategory, Indicator, IndicatorStatus, Severity};
pub use parameters::ModelParameters;
pub use partition::{EnergyOutcome, GrossEnergyPartition, StressFactors};
pub use physiology::{DietType, MethaneEstimate, PhysiologicalState};
pub use ration::{DietProfile, Ration, RationEntry};
pub use sulfur::{evaluate_sulfur, SulfurInput, SulfurOutcome};
pub use types::*;
pub use units::*;

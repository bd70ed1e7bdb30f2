//! Business logic services
//!
//! Services sit between the HTTP handlers and the shared engine: they
//! validate request DTOs, run the computation and record logs and metrics.

pub mod calculators;
pub mod ration;

pub use calculators::CalculatorService;
pub use ration::RationService;

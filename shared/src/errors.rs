//! Error types for the Ration Lab engine

use thiserror::Error;

/// Engine error types
///
/// Every variant is a validation failure surfaced synchronously at the
/// evaluation boundary. None of them is transient, so callers should not
/// retry the same input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Ration has no dry matter (total intake must be greater than 0 kg)")]
    EmptyRation,

    #[error("Invalid quantity for {ingredient}: {quantity} kg")]
    InvalidQuantity { ingredient: String, quantity: f64 },

    #[error("Invalid feed catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnknownIngredient(_) => "UNKNOWN_INGREDIENT",
            EngineError::EmptyRation => "EMPTY_RATION",
            EngineError::InvalidQuantity { .. } => "INVALID_QUANTITY",
            EngineError::InvalidCatalog(_) => "INVALID_CATALOG",
            EngineError::InvalidInput(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = crate::validation::field_errors(&errors)
            .iter()
            .map(|error| error.user_message())
            .collect();
        EngineError::InvalidInput(messages.join("; "))
    }
}

/// Result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EngineError::EmptyRation.code(), "EMPTY_RATION");
        assert_eq!(
            EngineError::UnknownIngredient("kelp".to_string()).code(),
            "UNKNOWN_INGREDIENT"
        );
        assert_eq!(
            EngineError::InvalidInput("dmi".to_string()).code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidQuantity {
            ingredient: "grass_hay".to_string(),
            quantity: -1.0,
        };
        assert_eq!(err.to_string(), "Invalid quantity for grass_hay: -1 kg");
        assert_eq!(
            EngineError::UnknownIngredient("kelp".to_string()).to_string(),
            "Unknown ingredient: kelp"
        );
    }
}

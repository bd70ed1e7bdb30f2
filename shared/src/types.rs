//! API request and response types

use crate::feeds::Ingredient;
use crate::ration::{Ration, RationEntry};
use crate::units::MassUnit;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Ration Evaluation
// ============================================================================

/// One ration line as entered by a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RationItemRequest {
    #[validate(length(min = 1, max = 64))]
    pub ingredient: String,
    /// Dry matter per day, in `unit`
    #[validate(range(min = 0.0, max = 200.0))]
    pub quantity: f64,
    /// Defaults to kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<MassUnit>,
}

impl RationItemRequest {
    pub fn quantity_kg(&self) -> f64 {
        self.unit.unwrap_or_default().to_kg(self.quantity)
    }
}

/// Evaluate ration request
///
/// An empty list is accepted here and rejected by the engine as an empty
/// ration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvaluateRationRequest {
    #[validate(length(max = 50), nested)]
    pub ration: Vec<RationItemRequest>,
}

impl EvaluateRationRequest {
    /// Convert to an engine ration in kilograms
    pub fn to_ration(&self) -> Ration {
        self.ration
            .iter()
            .map(|item| RationEntry {
                ingredient: item.ingredient.clone(),
                quantity_kg: item.quantity_kg(),
            })
            .collect()
    }
}

/// Feed catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedListResponse {
    pub count: usize,
    pub feeds: Vec<Ingredient>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_converts_pounds() {
        let request: EvaluateRationRequest = serde_json::from_str(
            r#"{"ration": [
                {"ingredient": "grass_hay", "quantity": 22.0462262, "unit": "lb"},
                {"ingredient": "soybean_meal", "quantity": 1.0}
            ]}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let ration = request.to_ration();
        assert!((ration.entries()[0].quantity_kg - 10.0).abs() < 1e-6);
        assert_eq!(ration.entries()[1].quantity_kg, 1.0);
    }

    #[test]
    fn test_request_validation() {
        let request = EvaluateRationRequest {
            ration: vec![RationItemRequest {
                ingredient: "grass_hay".to_string(),
                quantity: -2.0,
                unit: None,
            }],
        };
        let errors = request.validate().unwrap_err();
        let error = crate::validation::first_field_error(&errors).unwrap();
        assert_eq!(error.field, "ration[0].quantity");

        let empty = EvaluateRationRequest { ration: vec![] };
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: "EMPTY_RATION".to_string(),
                message: "Ration has no dry matter".to_string(),
                field: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"]["code"], "EMPTY_RATION");
        assert!(json["error"].get("field").is_none());
    }
}

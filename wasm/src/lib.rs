//! Ration Lab WASM Module
//!
//! WebAssembly bindings so the diet engine and the calculators can run in
//! the browser. Every binding takes and returns JSON text using the same
//! request and response shapes as the HTTP API; failures are thrown as the
//! JSON error body (`{"error": {"code", "message", "field"}}`).

use ration_lab_shared::{
    closeout, evaluate_sulfur, ration_cost, validation, CloseoutInput, DietEngine, EngineError,
    ErrorDetail, ErrorResponse, EvaluateRationRequest, FeedLibrary, FeedListResponse, Ingredient,
    ModelParameters, RationCostInput, SulfurInput,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;
use wasm_bindgen::prelude::*;

/// Evaluate a ration: `{"ration": [{"ingredient", "quantity", "unit"?}]}`
///
/// Optional `catalog` (a list of ingredients) and `model` (a parameter set,
/// missing sections take their defaults) replace the standard ones for this
/// call only.
#[wasm_bindgen(js_name = evaluateRation)]
pub fn evaluate_ration(request_json: &str) -> Result<String, JsValue> {
    evaluate_ration_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// The standard feed catalog
#[wasm_bindgen(js_name = feedCatalog)]
pub fn feed_catalog() -> Result<String, JsValue> {
    feed_catalog_json().map_err(|e| JsValue::from_str(&e))
}

/// Sulfide detoxification energetics
#[wasm_bindgen(js_name = evaluateSulfur)]
pub fn evaluate_sulfur_load(input_json: &str) -> Result<String, JsValue> {
    sulfur_json(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Feedlot ration cost per ton
#[wasm_bindgen(js_name = rationCost)]
pub fn ration_cost_per_ton(input_json: &str) -> Result<String, JsValue> {
    ration_cost_json(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Feedlot closeout projection
#[wasm_bindgen(js_name = feedlotCloseout)]
pub fn feedlot_closeout(input_json: &str) -> Result<String, JsValue> {
    closeout_json(input_json).map_err(|e| JsValue::from_str(&e))
}

// ============================================================================
// JSON helpers (target independent, so they can be tested natively)
// ============================================================================

/// Ration request plus the optional catalog and model overrides
#[derive(Debug, Deserialize)]
struct EvaluateRationOptions {
    #[serde(flatten)]
    request: EvaluateRationRequest,
    #[serde(default)]
    catalog: Option<Vec<Ingredient>>,
    #[serde(default)]
    model: Option<ModelParameters>,
}

fn evaluate_ration_json(request_json: &str) -> Result<String, String> {
    let options: EvaluateRationOptions = parse(request_json)?;
    validate(&options.request)?;
    let engine = engine_for(options.catalog, options.model).map_err(engine_error)?;
    let evaluation = engine
        .evaluate_ration(&options.request.to_ration())
        .map_err(engine_error)?;
    to_json(&evaluation)
}

fn engine_for(
    catalog: Option<Vec<Ingredient>>,
    model: Option<ModelParameters>,
) -> Result<DietEngine, EngineError> {
    if catalog.is_none() && model.is_none() {
        return Ok(DietEngine::standard());
    }
    let library = match catalog {
        Some(feeds) => FeedLibrary::new(feeds)?,
        None => FeedLibrary::standard(),
    };
    DietEngine::new(library, model.unwrap_or_default())
}

fn feed_catalog_json() -> Result<String, String> {
    let engine = DietEngine::standard();
    let feeds: Vec<_> = engine.library().iter().cloned().collect();
    to_json(&FeedListResponse {
        count: feeds.len(),
        feeds,
    })
}

fn sulfur_json(input_json: &str) -> Result<String, String> {
    let input: SulfurInput = parse(input_json)?;
    validate(&input)?;
    to_json(&evaluate_sulfur(&input).map_err(engine_error)?)
}

fn ration_cost_json(input_json: &str) -> Result<String, String> {
    let input: RationCostInput = parse(input_json)?;
    validate(&input)?;
    to_json(&ration_cost(&input).map_err(engine_error)?)
}

fn closeout_json(input_json: &str) -> Result<String, String> {
    let input: CloseoutInput = parse(input_json)?;
    validate(&input)?;
    to_json(&closeout(&input).map_err(engine_error)?)
}

fn parse<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| error_json("BAD_REQUEST", e.to_string(), None))
}

fn validate<T: Validate>(value: &T) -> Result<(), String> {
    value.validate().map_err(|errors| match validation::first_field_error(&errors) {
        Some(err) => error_json("VALIDATION_ERROR", err.user_message(), Some(err.field)),
        None => error_json("VALIDATION_ERROR", "Invalid request".to_string(), None),
    })
}

fn engine_error(err: EngineError) -> String {
    error_json(err.code(), err.to_string(), None)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| error_json("INTERNAL_ERROR", e.to_string(), None))
}

fn error_json(code: &str, message: String, field: Option<String>) -> String {
    let body = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message: message.clone(),
            field,
        },
    };
    serde_json::to_string(&body).unwrap_or(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ration_lab_shared::parameters::NitrogenModel;
    use serde_json::Value;

    fn json(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_evaluate_ration() {
        let out = evaluate_ration_json(
            r#"{"ration": [
                {"ingredient": "grass_hay", "quantity": 8.0},
                {"ingredient": "soybean_meal", "quantity": 1.0}
            ]}"#,
        )
        .unwrap();
        let value = json(&out);
        assert_eq!(value["profile"]["dmi_kg"], 9.0);
        assert!(value["outcome"]["realized_energy"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_evaluate_ration_errors_are_json() {
        let err = evaluate_ration_json(r#"{"ration": [{"ingredient": "kelp", "quantity": 1.0}]}"#)
            .unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "UNKNOWN_INGREDIENT");

        let err = evaluate_ration_json(r#"{"ration": []}"#).unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "EMPTY_RATION");

        let err = evaluate_ration_json("not json").unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "BAD_REQUEST");
    }

    #[test]
    fn test_validation_error_carries_field() {
        let err = evaluate_ration_json(
            r#"{"ration": [{"ingredient": "grass_hay", "quantity": -3.0}]}"#,
        )
        .unwrap_err();
        let value = json(&err);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(value["error"]["field"], "ration[0].quantity");
    }

    #[test]
    fn test_evaluate_ration_with_custom_catalog() {
        let out = evaluate_ration_json(
            r#"{
                "ration": [
                    {"ingredient": "meadow_hay", "quantity": 6.0},
                    {"ingredient": "barley", "quantity": 4.0}
                ],
                "catalog": [
                    {"name": "meadow_hay", "class": "forage", "cp": 10.0, "ndf": 60.0,
                     "starch": 0.0, "fat": 3.0, "tdn": 60.0, "ge": 4.5, "pe_ndf": 40.0,
                     "ferment_rate": 0.05, "rdp": 70.0},
                    {"name": "barley", "class": "concentrate", "cp": 10.0, "ndf": 20.0,
                     "starch": 50.0, "fat": 3.0, "tdn": 80.0, "ge": 4.5, "pe_ndf": 0.0,
                     "ferment_rate": 0.1, "rdp": 70.0}
                ]
            }"#,
        )
        .unwrap();
        let value = json(&out);
        assert_eq!(value["profile"]["dmi_kg"], 10.0);
        assert!((value["state"]["ph"].as_f64().unwrap() - 6.74).abs() < 1e-9);

        // The custom catalog replaces the standard one
        let err = evaluate_ration_json(
            r#"{
                "ration": [{"ingredient": "grass_hay", "quantity": 5.0}],
                "catalog": [
                    {"name": "meadow_hay", "class": "forage", "cp": 10.0, "ndf": 60.0,
                     "starch": 0.0, "fat": 3.0, "tdn": 60.0, "ge": 4.5, "pe_ndf": 40.0,
                     "ferment_rate": 0.05, "rdp": 70.0}
                ]
            }"#,
        )
        .unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "UNKNOWN_INGREDIENT");
    }

    #[test]
    fn test_evaluate_ration_with_model_override() {
        let ration = serde_json::json!([
            {"ingredient": "grass_hay", "quantity": 8.0},
            {"ingredient": "soybean_meal", "quantity": 1.0}
        ]);
        let model = ModelParameters {
            nitrogen: NitrogenModel::crude_protein(),
            ..ModelParameters::default()
        };
        let request = serde_json::json!({ "ration": ration, "model": model });
        let out = json(&evaluate_ration_json(&request.to_string()).unwrap());

        let expected = DietEngine::new(FeedLibrary::standard(), model)
            .unwrap()
            .evaluate(&[("grass_hay", 8.0), ("soybean_meal", 1.0)])
            .unwrap();
        assert_eq!(
            out["state"]["nitrogen_basis"],
            serde_json::to_value(expected.state.nitrogen_basis).unwrap()
        );
        let realized = out["outcome"]["realized_energy"].as_f64().unwrap();
        assert!((realized - expected.outcome.realized_energy).abs() < 1e-9);

        let standard = serde_json::json!({ "ration": ration }).to_string();
        let standard = json(&evaluate_ration_json(&standard).unwrap());
        assert_ne!(out["state"]["nitrogen_basis"], standard["state"]["nitrogen_basis"]);
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let mut model = ModelParameters::default();
        model.ph.floor = 7.5;
        let request = serde_json::json!({
            "ration": [{"ingredient": "grass_hay", "quantity": 5.0}],
            "model": model,
        });
        let err = evaluate_ration_json(&request.to_string()).unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "VALIDATION_ERROR");

        let err = evaluate_ration_json(
            r#"{"ration": [{"ingredient": "grass_hay", "quantity": 5.0}], "catalog": []}"#,
        )
        .unwrap_err();
        assert_eq!(json(&err)["error"]["code"], "INVALID_CATALOG");
    }

    #[test]
    fn test_feed_catalog() {
        let value = json(&feed_catalog_json().unwrap());
        assert_eq!(value["count"], 6);
    }

    #[test]
    fn test_sulfur() {
        let input = serde_json::to_string(&SulfurInput::default()).unwrap();
        let value = json(&sulfur_json(&input).unwrap());
        assert!(value["maintenance_increase_percent"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_ration_cost_and_closeout() {
        let input = serde_json::to_string(&RationCostInput::default()).unwrap();
        let cost = json(&ration_cost_json(&input).unwrap());
        assert!((cost["cost_per_ton"].as_f64().unwrap() - 192.593).abs() < 1e-3);

        let input = serde_json::to_string(&CloseoutInput::default()).unwrap();
        let result = json(&closeout_json(&input).unwrap());
        assert!(result["days_on_feed"].as_f64().unwrap() > 0.0);
    }
}

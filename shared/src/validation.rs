//! Input validation helpers
//!
//! Request types use the `validator` derive macros; this module turns the
//! resulting `ValidationErrors` into a single field-scoped error with a
//! readable label.

use validator::{ValidationErrors, ValidationErrorsKind};

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "request" => "Request",
        "ration" => "Ration",
        "ingredient" => "Ingredient",
        "quantity" => "Quantity",
        "body_weight_kg" => "Body Weight",
        "dmi_kg" => "Dry Matter Intake",
        "feed_sulfur_percent" => "Dietary Sulfur",
        "water_sulfate_mg_l" => "Water Sulfate",
        "water_intake_l" => "Water Intake",
        "reduction_percent" => "Rumen Reduction",
        "absorption_percent" => "H2S Absorption",
        "oxidation_percent" => "Hepatic Oxidation",
        "corn_price_bu" => "Corn Price",
        "ddgs_price_ton" => "DDGS Price",
        "silage_price_ton" => "Silage Price",
        "supplement_price_ton" => "Supplement Price",
        "corn_percent" => "Corn Inclusion",
        "ddgs_percent" => "DDGS Inclusion",
        "silage_percent" => "Silage Inclusion",
        "supplement_percent" => "Supplement Inclusion",
        "cattle_price_cwt" => "Purchase Price",
        "sale_price_cwt" => "Sale Price",
        "adg_lb" => "Average Daily Gain",
        "feed_conversion" => "Feed Conversion",
        "in_weight_lb" => "In Weight",
        "out_weight_lb" => "Out Weight",
        "yardage_per_day" => "Yardage",
        "interest_rate_percent" => "Interest Rate",
        "vet_cost" => "Vet Cost",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path to the field, e.g. `ration[1].quantity`
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        let leaf = field
            .rsplit('.')
            .next()
            .unwrap_or(field)
            .split('[')
            .next()
            .unwrap_or(field);
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(leaf).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

fn describe(error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "range" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            (Some(min), None) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            _ => match error.params.get("exclusive_min") {
                Some(min) => format!("must be greater than {}", min),
                None => "is out of range".to_string(),
            },
        },
        "length" => "has an invalid length".to_string(),
        code => code.to_string(),
    }
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationError>) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(field, _)| field.to_string());

    for (field, kind) in entries {
        let path = match (prefix.is_empty(), field.to_string().as_str()) {
            (true, "__all__") => "request".to_string(),
            (true, name) => name.to_string(),
            // Struct-level errors belong to the parent path
            (false, "__all__") => prefix.to_string(),
            (false, name) => format!("{}.{}", prefix, name),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    out.push(ValidationError::new(&path, &describe(error)));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

/// Flatten derive-macro errors into field-scoped errors, sorted by path
pub fn field_errors(errors: &ValidationErrors) -> Vec<ValidationError> {
    let mut out = Vec::new();
    collect("", errors, &mut out);
    out
}

/// The first field error, if any
pub fn first_field_error(errors: &ValidationErrors) -> Option<ValidationError> {
    field_errors(errors).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedlot::CloseoutInput;
    use crate::sulfur::SulfurInput;
    use validator::Validate;

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("dmi_kg"), "Dry Matter Intake");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    #[test]
    fn test_validation_error() {
        let error = ValidationError::new("ration[2].quantity", "must be at least 0");
        assert_eq!(error.display_label, "Quantity");
        assert_eq!(error.user_message(), "Quantity: must be at least 0");
    }

    #[test]
    fn test_range_error_is_described() {
        let input = SulfurInput {
            absorption_percent: 120.0,
            ..SulfurInput::default()
        };
        let errors = input.validate().unwrap_err();
        let error = first_field_error(&errors).unwrap();
        assert_eq!(error.field, "absorption_percent");
        assert_eq!(error.display_label, "H2S Absorption");
        assert!(error.message.starts_with("must be between"));
    }

    #[test]
    fn test_nested_schema_error_path() {
        let mut input = CloseoutInput::default();
        input.ration.corn_percent = 10.0;
        let errors = input.validate().unwrap_err();
        let error = first_field_error(&errors).unwrap();
        assert_eq!(error.field, "ration");
        assert!(error.message.contains("100%"));
    }
}

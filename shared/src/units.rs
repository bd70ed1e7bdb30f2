//! Unit conversion
//!
//! The engine works in kilograms of dry matter. Quantities entered in
//! pounds are converted at the API boundary, never inside the model.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const KG_PER_LB: f64 = 0.453_592_37;

// ============================================================================
// Mass Units
// ============================================================================

/// Unit of a ration quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    #[default]
    Kg,
    #[serde(alias = "lbs")]
    Lb,
}

impl MassUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            MassUnit::Kg => value,
            MassUnit::Lb => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            MassUnit::Kg => kg,
            MassUnit::Lb => kg / KG_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            MassUnit::Kg => "kg",
            MassUnit::Lb => "lb",
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for MassUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(MassUnit::Kg),
            "lb" | "lbs" | "pound" | "pounds" => Ok(MassUnit::Lb),
            _ => Err(format!("Unknown mass unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_lb_roundtrip(lb in 0.0f64..2000.0) {
            let kg = MassUnit::Lb.to_kg(lb);
            let back = MassUnit::Lb.from_kg(kg);
            prop_assert!((back - lb).abs() < 1e-9);
        }

        #[test]
        fn prop_kg_identity(kg in 0.0f64..100.0) {
            prop_assert_eq!(MassUnit::Kg.to_kg(kg), kg);
        }
    }

    #[test]
    fn test_known_conversions() {
        assert!((MassUnit::Lb.to_kg(22.0462) - 10.0).abs() < 1e-4);
        assert_eq!(MassUnit::Kg.abbreviation(), "kg");
    }

    #[test]
    fn test_parse() {
        assert_eq!("LBS".parse::<MassUnit>(), Ok(MassUnit::Lb));
        assert_eq!("kilograms".parse::<MassUnit>(), Ok(MassUnit::Kg));
        assert!("stone".parse::<MassUnit>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let unit: MassUnit = serde_json::from_str("\"lbs\"").unwrap();
        assert_eq!(unit, MassUnit::Lb);
        assert_eq!(serde_json::to_string(&MassUnit::Lb).unwrap(), "\"lb\"");
    }
}

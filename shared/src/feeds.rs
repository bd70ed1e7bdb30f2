//! Ingredient library
//!
//! A fixed catalog of feedstuffs with per-unit-dry-matter nutrient
//! coefficients. The catalog is configuration data: it is validated once
//! when the library is built and is read-only afterwards.
//!
//! Coefficient values in [`FeedLibrary::standard`] follow NRC (2001) Dairy,
//! the CNCPS feed library, NASEM (2016) and Owens et al. (1997) for grain
//! processing effects on starch Kd.

use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Ingredient
// ============================================================================

/// Broad feed class
///
/// Forage energy is treated as fiber-derived energy during partitioning;
/// every other class contributes non-fiber energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedClass {
    Forage,
    Concentrate,
    ProteinSupplement,
    FatSupplement,
}

impl FeedClass {
    /// Whether energy from this class is fiber-derived
    pub fn is_fiber_source(&self) -> bool {
        matches!(self, FeedClass::Forage)
    }
}

/// A named feedstuff with fixed coefficients (all on a dry matter basis)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub class: FeedClass,
    /// Crude protein, % DM
    pub cp: f64,
    /// Neutral detergent fiber, % DM
    pub ndf: f64,
    /// Starch, % DM
    pub starch: f64,
    /// Ether extract, % DM
    pub fat: f64,
    /// Total digestible nutrients, % DM
    pub tdn: f64,
    /// Gross energy, Mcal/kg DM
    pub ge: f64,
    /// Physically effective NDF, % DM
    pub pe_ndf: f64,
    /// Carbohydrate fermentation rate (Kd), fraction per hour
    pub ferment_rate: f64,
    /// Rumen degradable protein, % of CP
    pub rdp: f64,
    /// High cation-exchange capacity (K, Ca, Mg) that adds rumen buffering
    #[serde(default)]
    pub cation_buffer: bool,
}

impl Ingredient {
    /// Coefficients as (field name, value) pairs, used for validation
    fn coefficients(&self) -> [(&'static str, f64); 9] {
        [
            ("cp", self.cp),
            ("ndf", self.ndf),
            ("starch", self.starch),
            ("fat", self.fat),
            ("tdn", self.tdn),
            ("ge", self.ge),
            ("pe_ndf", self.pe_ndf),
            ("ferment_rate", self.ferment_rate),
            ("rdp", self.rdp),
        ]
    }

    /// Check the catalog invariants for a single ingredient
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::InvalidCatalog(
                "Ingredient name cannot be empty".to_string(),
            ));
        }
        for (field, value) in self.coefficients() {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidCatalog(format!(
                    "{}: {} must be a non-negative number (got {})",
                    self.name, field, value
                )));
            }
        }
        if self.rdp > 100.0 {
            return Err(EngineError::InvalidCatalog(format!(
                "{}: rdp is a percentage of CP and cannot exceed 100",
                self.name
            )));
        }
        // No fiber means no effective fiber
        if self.pe_ndf > self.ndf {
            return Err(EngineError::InvalidCatalog(format!(
                "{}: pe_ndf ({}) cannot exceed ndf ({})",
                self.name, self.pe_ndf, self.ndf
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Feed Library
// ============================================================================

/// Immutable, validated catalog of ingredients keyed by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedLibrary {
    feeds: BTreeMap<String, Ingredient>,
}

/// On-disk form of a catalog (`[[feeds]]` tables)
#[derive(Debug, Clone, Deserialize)]
pub struct FeedCatalogFile {
    pub feeds: Vec<Ingredient>,
}

impl FeedLibrary {
    /// Build a library from a list of ingredients
    ///
    /// Fails if the list is empty, if a name repeats, or if any
    /// ingredient breaks a coefficient invariant.
    pub fn new(ingredients: Vec<Ingredient>) -> EngineResult<Self> {
        if ingredients.is_empty() {
            return Err(EngineError::InvalidCatalog(
                "Feed catalog must contain at least one ingredient".to_string(),
            ));
        }

        let mut feeds = BTreeMap::new();
        for ingredient in ingredients {
            ingredient.validate()?;
            let name = ingredient.name.clone();
            if feeds.insert(name.clone(), ingredient).is_some() {
                return Err(EngineError::InvalidCatalog(format!(
                    "Duplicate ingredient: {}",
                    name
                )));
            }
        }

        Ok(Self { feeds })
    }

    /// Build a library from a parsed catalog file
    pub fn from_catalog(file: FeedCatalogFile) -> EngineResult<Self> {
        Self::new(file.feeds)
    }

    /// Look up an ingredient by name
    pub fn lookup(&self, name: &str) -> EngineResult<&Ingredient> {
        self.feeds
            .get(name)
            .ok_or_else(|| EngineError::UnknownIngredient(name.to_string()))
    }

    /// Whether the catalog contains an ingredient
    pub fn contains(&self, name: &str) -> bool {
        self.feeds.contains_key(name)
    }

    /// Ingredient names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.feeds.keys().map(String::as_str).collect()
    }

    /// Iterate over ingredients in name order
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.feeds.values()
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    /// The standard teaching catalog
    pub fn standard() -> Self {
        Self {
            feeds: standard_ingredients()
                .into_iter()
                .map(|ingredient| (ingredient.name.clone(), ingredient))
                .collect(),
        }
    }
}

impl Default for FeedLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

/// Names of the standard catalog entries
pub mod names {
    pub const GRASS_HAY: &str = "grass_hay";
    pub const ALFALFA_HAY: &str = "alfalfa_hay";
    pub const DRY_ROLLED_CORN: &str = "dry_rolled_corn";
    pub const STEAM_FLAKED_CORN: &str = "steam_flaked_corn";
    pub const SOYBEAN_MEAL: &str = "soybean_meal";
    pub const PROTECTED_FAT: &str = "protected_fat";
}

fn standard_ingredients() -> Vec<Ingredient> {
    vec![
        // Mature grass hay: low protein, long particle size
        Ingredient {
            name: names::GRASS_HAY.to_string(),
            class: FeedClass::Forage,
            cp: 6.0,
            ndf: 65.0,
            starch: 1.0,
            fat: 2.0,
            tdn: 52.0,
            ge: 4.4,
            pe_ndf: 55.0,
            ferment_rate: 0.02,
            rdp: 70.0,
            cation_buffer: false,
        },
        // Mid-bloom alfalfa
        Ingredient {
            name: names::ALFALFA_HAY.to_string(),
            class: FeedClass::Forage,
            cp: 17.0,
            ndf: 42.0,
            starch: 2.0,
            fat: 2.5,
            tdn: 58.0,
            ge: 4.5,
            pe_ndf: 35.0,
            ferment_rate: 0.04,
            rdp: 75.0,
            cation_buffer: true,
        },
        Ingredient {
            name: names::DRY_ROLLED_CORN.to_string(),
            class: FeedClass::Concentrate,
            cp: 9.0,
            ndf: 9.0,
            starch: 70.0,
            fat: 4.0,
            tdn: 88.0,
            ge: 4.5,
            pe_ndf: 5.0,
            ferment_rate: 0.15,
            rdp: 60.0,
            cation_buffer: false,
        },
        // Gelatinized starch ferments much faster than dry rolled
        Ingredient {
            name: names::STEAM_FLAKED_CORN.to_string(),
            class: FeedClass::Concentrate,
            cp: 9.0,
            ndf: 8.0,
            starch: 75.0,
            fat: 4.0,
            tdn: 92.0,
            ge: 4.6,
            pe_ndf: 2.0,
            ferment_rate: 0.40,
            rdp: 60.0,
            cation_buffer: false,
        },
        Ingredient {
            name: names::SOYBEAN_MEAL.to_string(),
            class: FeedClass::ProteinSupplement,
            cp: 48.0,
            ndf: 12.0,
            starch: 2.0,
            fat: 1.5,
            tdn: 84.0,
            ge: 4.7,
            pe_ndf: 0.0,
            ferment_rate: 0.10,
            rdp: 70.0,
            cation_buffer: false,
        },
        // TDN above 100 reflects the 2.25x energy of lipid
        Ingredient {
            name: names::PROTECTED_FAT.to_string(),
            class: FeedClass::FatSupplement,
            cp: 0.0,
            ndf: 0.0,
            starch: 0.0,
            fat: 100.0,
            tdn: 225.0,
            ge: 9.4,
            pe_ndf: 0.0,
            ferment_rate: 0.0,
            rdp: 0.0,
            cation_buffer: false,
        },
    ]
}

//! Diet aggregation
//!
//! Combines a ration (ingredient name to kg of dry matter per day) into a
//! DMI-weighted [`DietProfile`].

use crate::errors::{EngineError, EngineResult};
use crate::feeds::{FeedClass, FeedLibrary, Ingredient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Ration
// ============================================================================

/// One line of a ration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationEntry {
    pub ingredient: String,
    /// Dry matter fed, kg/day
    pub quantity_kg: f64,
}

/// Ingredient quantities fed per day, built fresh for each evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ration {
    entries: Vec<RationEntry>,
}

impl Ration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style)
    pub fn with(mut self, ingredient: impl Into<String>, quantity_kg: f64) -> Self {
        self.push(ingredient, quantity_kg);
        self
    }

    pub fn push(&mut self, ingredient: impl Into<String>, quantity_kg: f64) {
        self.entries.push(RationEntry {
            ingredient: ingredient.into(),
            quantity_kg,
        });
    }

    pub fn entries(&self) -> &[RationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> From<&[(S, f64)]> for Ration {
    fn from(pairs: &[(S, f64)]) -> Self {
        let mut ration = Ration::new();
        for (name, kg) in pairs {
            ration.push(name.as_ref(), *kg);
        }
        ration
    }
}

impl FromIterator<RationEntry> for Ration {
    fn from_iter<I: IntoIterator<Item = RationEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Diet Profile
// ============================================================================

/// Share of one ingredient in the merged ration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationComponent {
    pub ingredient: String,
    pub class: FeedClass,
    pub quantity_kg: f64,
    /// Fraction of total DMI
    pub share: f64,
}

/// DMI-weighted whole-diet chemistry
///
/// Coefficient fields carry the same units as [`Ingredient`]. No rounding or
/// clamping happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietProfile {
    /// Total dry matter intake, kg/day
    pub dmi_kg: f64,
    pub cp: f64,
    pub ndf: f64,
    pub starch: f64,
    pub fat: f64,
    pub tdn: f64,
    pub ge: f64,
    pub pe_ndf: f64,
    pub ferment_rate: f64,
    pub rdp: f64,
    /// Fraction of DMI from forages
    pub forage_fraction: f64,
    /// Fraction of DMI from protein supplements
    pub protein_supplement_fraction: f64,
    /// Fraction of DMI from high cation-exchange feeds
    pub cation_buffer_fraction: f64,
    /// `Σ(q × starch × Kd) / DMI`, % starch fermented per hour
    pub fermentable_starch_index: f64,
    /// TDN from forages, kg/day
    pub fiber_energy_potential: f64,
    /// TDN from everything else, kg/day
    pub non_fiber_energy_potential: f64,
    /// Gross energy intake, Mcal/day
    pub total_gross_energy: f64,
    /// Merged entries in name order, zero quantities dropped
    pub components: Vec<RationComponent>,
}

impl DietProfile {
    /// Additive energy assuming no associative effects, kg TDN/day
    pub fn expected_energy(&self) -> f64 {
        self.fiber_energy_potential + self.non_fiber_energy_potential
    }
}

/// Running `Σ q × coefficient` totals
#[derive(Debug, Default)]
struct WeightedSums {
    dmi: f64,
    cp: f64,
    ndf: f64,
    starch: f64,
    fat: f64,
    tdn: f64,
    ge: f64,
    pe_ndf: f64,
    ferment_rate: f64,
    rdp: f64,
    forage: f64,
    protein_supplement: f64,
    cation_buffer: f64,
    fermentable_starch: f64,
    fiber_energy: f64,
    non_fiber_energy: f64,
}

impl WeightedSums {
    fn add(&mut self, ingredient: &Ingredient, q: f64) {
        self.dmi += q;
        self.cp += q * ingredient.cp;
        self.ndf += q * ingredient.ndf;
        self.starch += q * ingredient.starch;
        self.fat += q * ingredient.fat;
        self.tdn += q * ingredient.tdn;
        self.ge += q * ingredient.ge;
        self.pe_ndf += q * ingredient.pe_ndf;
        self.ferment_rate += q * ingredient.ferment_rate;
        self.rdp += q * ingredient.rdp;
        self.fermentable_starch += q * ingredient.starch * ingredient.ferment_rate;

        match ingredient.class {
            FeedClass::Forage => self.forage += q,
            FeedClass::ProteinSupplement => self.protein_supplement += q,
            FeedClass::Concentrate | FeedClass::FatSupplement => {}
        }
        if ingredient.cation_buffer {
            self.cation_buffer += q;
        }

        let tdn_kg = q * ingredient.tdn / 100.0;
        if ingredient.class.is_fiber_source() {
            self.fiber_energy += tdn_kg;
        } else {
            self.non_fiber_energy += tdn_kg;
        }
    }
}

/// Aggregate a ration into its DMI-weighted profile
///
/// Every name is resolved before intake is checked, so an unknown
/// ingredient is reported even when its quantity is zero. Duplicate names
/// are merged and sums run in name order, which makes the result
/// bit-identical for any permutation of the entries.
pub fn aggregate(library: &FeedLibrary, ration: &Ration) -> EngineResult<DietProfile> {
    let mut merged: BTreeMap<&str, (&Ingredient, Vec<f64>)> = BTreeMap::new();

    for entry in ration.entries() {
        let ingredient = library.lookup(&entry.ingredient)?;
        if !entry.quantity_kg.is_finite() || entry.quantity_kg < 0.0 {
            return Err(EngineError::InvalidQuantity {
                ingredient: entry.ingredient.clone(),
                quantity: entry.quantity_kg,
            });
        }
        merged
            .entry(ingredient.name.as_str())
            .or_insert_with(|| (ingredient, Vec::new()))
            .1
            .push(entry.quantity_kg);
    }

    let mut sums = WeightedSums::default();
    let mut merged_quantities = Vec::with_capacity(merged.len());
    for (_, (ingredient, mut quantities)) in merged {
        quantities.sort_by(f64::total_cmp);
        let q: f64 = quantities.iter().sum();
        if q > 0.0 {
            sums.add(ingredient, q);
            merged_quantities.push((ingredient, q));
        }
    }

    if sums.dmi <= 0.0 {
        return Err(EngineError::EmptyRation);
    }

    let d = sums.dmi;
    let components = merged_quantities
        .into_iter()
        .map(|(ingredient, q)| RationComponent {
            ingredient: ingredient.name.clone(),
            class: ingredient.class,
            quantity_kg: q,
            share: q / d,
        })
        .collect();

    Ok(DietProfile {
        dmi_kg: d,
        cp: sums.cp / d,
        ndf: sums.ndf / d,
        starch: sums.starch / d,
        fat: sums.fat / d,
        tdn: sums.tdn / d,
        ge: sums.ge / d,
        pe_ndf: sums.pe_ndf / d,
        ferment_rate: sums.ferment_rate / d,
        rdp: sums.rdp / d,
        forage_fraction: sums.forage / d,
        protein_supplement_fraction: sums.protein_supplement / d,
        cation_buffer_fraction: sums.cation_buffer / d,
        fermentable_starch_index: sums.fermentable_starch / d,
        fiber_energy_potential: sums.fiber_energy,
        non_fiber_energy_potential: sums.non_fiber_energy,
        total_gross_energy: sums.ge,
        components,
    })
}

// ABOUTME: Calories-per-serving extraction from heterogeneous USDA food records
// ABOUTME: Ordered strategies over nutrients, label values, serving sizes, and portions
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Calorie Extraction
//!
//! Derives a best-effort calories-per-serving figure from one external food
//! record. Records differ wildly: energy may sit in the nutrient list, in a
//! branded label, or be implied by a serving size or portion weight, and the
//! raw figure may be per serving or per 100 g. The extractor runs an ordered
//! list of independent strategies, then normalizes the winning raw value onto
//! a single per-serving number.
//!
//! Pure and infallible over malformed input: a missing or odd field means
//! "strategy did not match," never a panic or an error.

use crate::external::usda_client::{FoodRecord, NumericCode};

/// Nutrient code for energy in kcal
const ENERGY_NUTRIENT_CODE: u32 = 208;

/// What one strategy found: a raw energy figure, or only a sizing hint that
/// still needs an energy value from the nutrient list
#[derive(Debug)]
enum RawEnergy {
    /// A raw energy value with a unit description
    Value { value: f64, unit_desc: String },
    /// The record sizes itself by an explicit serving
    ServingHint { unit_desc: String },
    /// The record sizes itself by a portion gram weight
    GramHint { unit_desc: String },
}

impl RawEnergy {
    fn unit_desc(&self) -> &str {
        match self {
            Self::Value { unit_desc, .. }
            | Self::ServingHint { unit_desc }
            | Self::GramHint { unit_desc } => unit_desc,
        }
    }
}

/// Strategies in resolution order; the first that matches wins
const STRATEGIES: [fn(&FoodRecord) -> Option<RawEnergy>; 4] = [
    energy_from_nutrients,
    energy_from_label,
    sizing_from_serving,
    sizing_from_portions,
];

/// Derive calories per serving from a food record, or `None` when no strategy
/// can produce an energy value
#[must_use]
pub fn extract(record: &FoodRecord) -> Option<f64> {
    let raw = STRATEGIES.iter().find_map(|strategy| strategy(record))?;
    tracing::trace!(unit = raw.unit_desc(), "energy extraction strategy matched");

    let value = match raw {
        RawEnergy::Value { value, .. } => value,
        // Sizing hint without an energy figure: re-scan the nutrient list
        // before applying the same scaling rule
        RawEnergy::ServingHint { .. } | RawEnergy::GramHint { .. } => {
            match energy_from_nutrients(record)? {
                RawEnergy::Value { value, .. } => value,
                _ => return None,
            }
        }
    };

    let per_serving = normalize(record, value);
    (per_serving.is_finite() && per_serving >= 0.0).then_some(per_serving)
}

/// Strategy 1: nutrient entries coded 208 or named "energy"
fn energy_from_nutrients(record: &FoodRecord) -> Option<RawEnergy> {
    record.food_nutrients.iter().find_map(|nutrient| {
        let code = nutrient
            .nutrient_number
            .as_ref()
            .and_then(NumericCode::as_u32)
            .or_else(|| nutrient.nutrient_id.and_then(|id| u32::try_from(id).ok()));
        let named_energy = nutrient
            .nutrient_name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains("energy"));

        if code == Some(ENERGY_NUTRIENT_CODE) || named_energy {
            let value = nutrient.value?;
            let unit = nutrient.unit_name.clone().unwrap_or_default();
            Some(RawEnergy::Value {
                value,
                unit_desc: format!("nutrient:{unit}"),
            })
        } else {
            None
        }
    })
}

/// Strategy 2: label-nutrient keys containing "energy" or "calor"
fn energy_from_label(record: &FoodRecord) -> Option<RawEnergy> {
    let label = record.label_nutrients.as_ref()?;
    label.iter().find_map(|(key, entry)| {
        let key_lower = key.to_lowercase();
        if key_lower.contains("energy") || key_lower.contains("calor") {
            entry.value().map(|value| RawEnergy::Value {
                value,
                unit_desc: "label".to_owned(),
            })
        } else {
            None
        }
    })
}

/// Strategy 3: an explicit serving size and unit, no energy value yet
fn sizing_from_serving(record: &FoodRecord) -> Option<RawEnergy> {
    let size = record.serving_size?;
    let unit = record.serving_size_unit.as_deref()?;
    Some(RawEnergy::ServingHint {
        unit_desc: format!("{size} {unit}"),
    })
}

/// Strategy 4: a portion entry carrying a gram weight
fn sizing_from_portions(record: &FoodRecord) -> Option<RawEnergy> {
    record.food_portions.iter().find_map(|portion| {
        let gram = portion.gram_weight?;
        let desc = portion
            .portion_description
            .clone()
            .or_else(|| portion.modifier.clone())
            .unwrap_or_default();
        Some(RawEnergy::GramHint {
            unit_desc: format!("{gram}g ({desc})"),
        })
    })
}

/// Map a raw energy figure onto one serving
///
/// Branded/survey/foundation records and records with an explicit serving
/// size already report per serving. Otherwise the value is assumed per 100 g
/// and scaled by the first portion gram weight; with no weight available the
/// value is used as-is.
fn normalize(record: &FoodRecord, raw_value: f64) -> f64 {
    let data_type = record
        .data_type
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    if data_type.contains("branded")
        || data_type.contains("survey")
        || data_type.contains("foundation")
    {
        return raw_value;
    }

    if record.serving_size.is_some() {
        return raw_value;
    }

    if let Some(gram) = first_gram_weight(record) {
        return raw_value * (gram / 100.0);
    }

    raw_value
}

fn first_gram_weight(record: &FoodRecord) -> Option<f64> {
    record.food_portions.iter().find_map(|p| p.gram_weight)
}

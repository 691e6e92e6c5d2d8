//! Heuristic price adjustment
//!
//! Rescales a base model prediction with hand-authored multipliers that
//! approximate how used-bike marketplaces price listings: number of previous
//! owners, seller type, distance driven and brand keyword in the model name.
//!
//! Adjustments are opt-in per request. When disabled the base prediction is
//! returned untouched and the breakdown only carries `base`.

use crate::models::AdjustmentBreakdown;

/// Owner count multipliers, matched case-insensitively on the whole string
pub const OWNER_FACTORS: &[(&str, f64)] = &[
    ("1st owner", 1.05),
    ("2nd owner", 0.98),
    ("3rd owner", 0.94),
    ("4th owner", 0.90),
];

/// Seller type multipliers, matched case-insensitively on the whole string
pub const SELLER_FACTORS: &[(&str, f64)] = &[
    ("individual", 1.00),
    ("dealer", 1.03),
    ("trustmark dealer", 1.05),
];

/// Brand keyword multipliers; the first keyword contained in the lower-cased
/// model name wins, so order matters
pub const MODEL_KEYWORD_FACTORS: &[(&str, f64)] = &[
    ("royal", 1.15),
    ("honda", 1.06),
    ("yamaha", 1.05),
    ("bajaj", 1.00),
    ("hero", 1.00),
    ("suzuki", 1.04),
];

/// Multiplier used for unrecognized categories
pub const NEUTRAL_FACTOR: f64 = 1.0;

/// Optional listing attributes that drive the heuristics
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingAttributes<'a> {
    pub owner: Option<&'a str>,
    pub seller_type: Option<&'a str>,
    pub model_name: Option<&'a str>,
    pub km_driven: Option<f64>,
}

/// Outcome of [`adjust`]
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub adjusted_prediction: f64,
    pub breakdown: AdjustmentBreakdown,
    /// Brand keyword that set the model multiplier, if any matched
    pub matched_keyword: Option<&'static str>,
}

/// Apply the marketplace heuristics to `base_prediction`
///
/// Factors are applied in a fixed order (owner, seller, distance, model
/// keyword) and each one is recorded in the breakdown only when its input
/// was provided.
pub fn adjust(
    base_prediction: f64,
    attributes: &ListingAttributes<'_>,
    apply_adjustments: bool,
) -> Adjustment {
    let mut breakdown = AdjustmentBreakdown::new(base_prediction);

    if !apply_adjustments {
        return Adjustment {
            adjusted_prediction: base_prediction,
            breakdown,
            matched_keyword: None,
        };
    }

    let mut multiplier = 1.0;

    if let Some(owner) = present(attributes.owner) {
        let factor = lookup_exact(OWNER_FACTORS, owner);
        multiplier *= factor;
        breakdown.owner_multiplier = Some(factor);
    }

    if let Some(seller_type) = present(attributes.seller_type) {
        let factor = lookup_exact(SELLER_FACTORS, seller_type);
        multiplier *= factor;
        breakdown.seller_multiplier = Some(factor);
    }

    if let Some(km_driven) = attributes.km_driven {
        let factor = km_factor(km_driven);
        multiplier *= factor;
        breakdown.km_multiplier = Some(factor);
    }

    let mut matched_keyword = None;
    if let Some(model_name) = present(attributes.model_name) {
        let (factor, keyword) = match model_keyword(model_name) {
            Some((keyword, factor)) => (factor, Some(keyword)),
            None => (NEUTRAL_FACTOR, None),
        };
        multiplier *= factor;
        breakdown.model_multiplier = Some(factor);
        matched_keyword = keyword;
    }

    let adjusted_prediction = base_prediction * multiplier;
    breakdown.adjusted = Some(adjusted_prediction);
    breakdown.total_multiplier = Some(multiplier);

    Adjustment {
        adjusted_prediction,
        breakdown,
        matched_keyword,
    }
}

/// Distance band multiplier
///
/// The bands are checked top-down with strict comparisons, so 50000 lands in
/// the 0.95 band and both 15000 and 30000 land in the neutral band.
pub fn km_factor(km_driven: f64) -> f64 {
    if km_driven > 50000.0 {
        0.88
    } else if km_driven > 30000.0 {
        0.95
    } else if km_driven < 15000.0 {
        1.03
    } else {
        NEUTRAL_FACTOR
    }
}

/// First brand keyword (in table order) contained in `model_name`
pub fn model_keyword(model_name: &str) -> Option<(&'static str, f64)> {
    let lowered = model_name.to_lowercase();
    MODEL_KEYWORD_FACTORS
        .iter()
        .copied()
        .find(|(keyword, _)| lowered.contains(keyword))
}

fn lookup_exact(table: &[(&str, f64)], value: &str) -> f64 {
    let lowered = value.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == lowered)
        .map(|(_, factor)| *factor)
        .unwrap_or(NEUTRAL_FACTOR)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

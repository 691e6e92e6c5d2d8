//! Core data models for the price predictor

use serde::{Deserialize, Serialize};

/// Feature names in the exact order the regressor was trained with
pub const FEATURE_NAMES: [&str; 4] = ["year", "km_driven", "ex_showroom_price", "age"];

/// Validated prediction request, built per request and never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub year: i32,
    pub km_driven: f64,
    pub ex_showroom_price: f64,
    pub owner: Option<String>,
    pub seller_type: Option<String>,
    pub model_name: Option<String>,
    pub apply_adjustments: bool,
}

/// Feature vector for model inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: f64,
    pub km_driven: f64,
    pub ex_showroom_price: f64,
    pub age: f64,
}

impl FeatureVector {
    /// Derive features from a validated request; `age = current_year - year`
    pub fn from_request(request: &PredictionRequest, current_year: i32) -> Self {
        Self {
            year: f64::from(request.year),
            km_driven: request.km_driven,
            ex_showroom_price: request.ex_showroom_price,
            age: f64::from(current_year - request.year),
        }
    }

    /// Values in training order, see [`FEATURE_NAMES`]
    pub fn as_array(&self) -> [f64; 4] {
        [self.year, self.km_driven, self.ex_showroom_price, self.age]
    }
}

/// Itemized multipliers applied to a base prediction
///
/// Fields serialize in insertion order; multipliers that were not applied
/// are left out of the JSON object entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentBreakdown {
    pub base: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_multiplier: Option<f64>,
}

impl AdjustmentBreakdown {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    /// Named entries that are present, in display order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = vec![("base", self.base)];
        let optional = [
            ("owner_multiplier", self.owner_multiplier),
            ("seller_multiplier", self.seller_multiplier),
            ("km_multiplier", self.km_multiplier),
            ("model_multiplier", self.model_multiplier),
            ("adjusted", self.adjusted),
            ("total_multiplier", self.total_multiplier),
        ];
        entries.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );
        entries
    }
}

/// Result of a full validate -> predict -> adjust run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub base_prediction: f64,
    pub adjusted_prediction: f64,
    pub breakdown: AdjustmentBreakdown,
}

/// Success body of the JSON prediction endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_selling_price: f64,
    pub adjusted_prediction: f64,
    pub breakdown: AdjustmentBreakdown,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            predicted_selling_price: result.base_prediction,
            adjusted_prediction: result.adjusted_prediction,
            breakdown: result.breakdown,
        }
    }
}

/// Error body returned by the JSON endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

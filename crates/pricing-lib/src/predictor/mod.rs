//! Model provider: the regression model behind the base prediction

mod inference;
mod provider;

pub use inference::{compute_checksum, OnnxPriceModel, NUM_FEATURES};
pub use provider::{missing_model_message, ModelProvider};

use crate::models::{FeatureVector, FEATURE_NAMES};
use anyhow::Result;

/// A trained regressor that maps the ordered feature vector to a price
pub trait PriceModel: Send + Sync {
    /// Predict the resale price for a single feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Feature names the model was trained with, in input order
    fn feature_names(&self) -> Option<Vec<String>> {
        Some(FEATURE_NAMES.iter().map(|name| name.to_string()).collect())
    }
}

//! Load-once wrapper around the price model
//!
//! The provider is built during startup and never mutated afterwards. If the
//! artifact is missing or fails to load, the provider stays degraded for the
//! rest of the process lifetime and every prediction fails fast.

use super::{OnnxPriceModel, PriceModel};
use crate::error::{PricingError, PricingResult};
use crate::models::FeatureVector;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Read-only handle to the loaded model plus its load status
#[derive(Clone)]
pub struct ModelProvider {
    model: Option<Arc<dyn PriceModel>>,
    model_path: String,
    load_error: Option<String>,
}

impl std::fmt::Debug for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelProvider")
            .field("model_loaded", &self.is_loaded())
            .field("model_path", &self.model_path)
            .field("load_error", &self.load_error)
            .finish()
    }
}

/// Load error reported when the artifact does not exist
pub fn missing_model_message(path: &Path) -> String {
    format!(
        "Model file not found at {}. Export the trained regressor to ONNX and place it there.",
        path.display()
    )
}

impl ModelProvider {
    /// Load the ONNX model at `path`; failures leave the provider degraded
    pub fn load(path: impl AsRef<Path>, expected_sha256: Option<&str>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            return Self::unavailable(path.display().to_string(), missing_model_message(path));
        }

        match OnnxPriceModel::from_file(path, expected_sha256) {
            Ok(model) => {
                debug!(path = %path.display(), checksum = %model.checksum(), "Model loaded");
                Self::with_model(path.display().to_string(), Arc::new(model))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Model failed to load");
                Self::unavailable(path.display().to_string(), format!("{:#}", e))
            }
        }
    }

    /// Provider backed by an already constructed model
    pub fn with_model(model_path: impl Into<String>, model: Arc<dyn PriceModel>) -> Self {
        Self {
            model: Some(model),
            model_path: model_path.into(),
            load_error: None,
        }
    }

    /// Provider in the permanent degraded state
    pub fn unavailable(model_path: impl Into<String>, load_error: impl Into<String>) -> Self {
        Self {
            model: None,
            model_path: model_path.into(),
            load_error: Some(load_error.into()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn feature_names(&self) -> Option<Vec<String>> {
        self.model.as_ref().and_then(|m| m.feature_names())
    }

    /// Fail with `ModelUnavailable` unless a model is loaded
    pub fn ensure_loaded(&self) -> PricingResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(self.unavailable_error())
        }
    }

    /// Base prediction for one feature vector
    pub fn predict(&self, features: &FeatureVector) -> PricingResult<f64> {
        let model = self.model.as_ref().ok_or_else(|| self.unavailable_error())?;
        let prediction = model.predict(features)?;

        if !prediction.is_finite() {
            return Err(PricingError::UnexpectedFailure(format!(
                "model returned a non-finite prediction ({})",
                prediction
            )));
        }
        Ok(prediction)
    }

    fn unavailable_error(&self) -> PricingError {
        PricingError::ModelUnavailable(
            self.load_error
                .clone()
                .unwrap_or_else(|| "unknown load error".to_string()),
        )
    }
}

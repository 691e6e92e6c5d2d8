//! Health and readiness reporting
//!
//! The health report is a diagnostic snapshot of the model provider. It is
//! always served with 200; readiness is what flips to "not ready" when the
//! model failed to load.

use crate::predictor::ModelProvider;
use serde::{Deserialize, Serialize};

/// Body of the `/health` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub model_loaded: bool,
    pub model_path: String,
    pub load_error: Option<String>,
    pub feature_names: Option<Vec<String>>,
    pub cors_available: bool,
}

impl HealthReport {
    pub fn from_provider(provider: &ModelProvider, cors_available: bool) -> Self {
        let model_loaded = provider.is_loaded();
        Self {
            model_loaded,
            model_path: provider.model_path().to_string(),
            load_error: if model_loaded {
                None
            } else {
                provider.load_error().map(str::to_string)
            },
            feature_names: provider.feature_names(),
            cors_available,
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    pub fn from_provider(provider: &ModelProvider) -> Self {
        if provider.is_loaded() {
            Self {
                ready: true,
                reason: None,
            }
        } else {
            Self {
                ready: false,
                reason: Some(format!(
                    "Model not loaded: {}",
                    provider.load_error().unwrap_or("unknown load error")
                )),
            }
        }
    }
}

//! Prediction pipeline shared by the form page and the JSON API
//!
//! validate -> build features -> model predict -> heuristic adjust

use crate::adjuster::{adjust, ListingAttributes};
use crate::error::{PricingError, PricingResult};
use crate::models::{FeatureVector, PredictionRequest, PredictionResult};
use crate::observability::{PricingMetrics, StructuredLogger};
use crate::predictor::ModelProvider;
use crate::validator::InputValidator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Runs requests through validation, the model and the adjuster
#[derive(Clone)]
pub struct PricingService {
    validator: InputValidator,
    provider: Arc<ModelProvider>,
    metrics: PricingMetrics,
    logger: StructuredLogger,
}

impl PricingService {
    pub fn new(
        validator: InputValidator,
        provider: Arc<ModelProvider>,
        metrics: PricingMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            validator,
            provider,
            metrics,
            logger,
        }
    }

    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    /// Form submissions check the model first, so a degraded service reports
    /// "model not loaded" before looking at the fields
    pub fn predict_form(&self, fields: &HashMap<String, String>) -> PricingResult<PredictionResult> {
        self.observe(|| {
            self.provider.ensure_loaded()?;
            let request = self.validator.from_form(fields)?;
            self.run(&request)
        })
    }

    pub fn predict_json(&self, payload: &Value) -> PricingResult<PredictionResult> {
        self.observe(|| {
            let request = self.validator.from_json(payload)?;
            self.run(&request)
        })
    }

    fn run(&self, request: &PredictionRequest) -> PricingResult<PredictionResult> {
        let features = FeatureVector::from_request(request, self.validator.current_year());
        let base_prediction = self.provider.predict(&features)?;

        let attributes = ListingAttributes {
            owner: request.owner.as_deref(),
            seller_type: request.seller_type.as_deref(),
            model_name: request.model_name.as_deref(),
            km_driven: Some(request.km_driven),
        };
        let adjustment = adjust(base_prediction, &attributes, request.apply_adjustments);

        self.logger.log_prediction(
            request.year,
            request.km_driven,
            base_prediction,
            adjustment.adjusted_prediction,
            adjustment.breakdown.total_multiplier,
        );

        Ok(PredictionResult {
            base_prediction,
            adjusted_prediction: adjustment.adjusted_prediction,
            breakdown: adjustment.breakdown,
        })
    }

    fn observe<F>(&self, f: F) -> PricingResult<PredictionResult>
    where
        F: FnOnce() -> PricingResult<PredictionResult>,
    {
        let start = Instant::now();
        let outcome = f();
        self.metrics
            .observe_prediction_latency(start.elapsed().as_secs_f64());

        match &outcome {
            Ok(result) => self
                .metrics
                .inc_predictions(result.breakdown.total_multiplier.is_some()),
            Err(PricingError::InvalidInput(reason)) => {
                self.metrics.inc_validation_rejections();
                self.logger.log_rejection(reason);
            }
            Err(err) => {
                self.metrics.inc_prediction_failures(err.kind());
                self.logger.log_failure(err.kind(), &err.to_string());
            }
        }
        outcome
    }
}

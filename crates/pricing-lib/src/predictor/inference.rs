//! ONNX inference using tract
//!
//! The regressor is trained offline and exported to ONNX with a single
//! `f32[1, 4]` input. tract loads and optimizes it once at startup; the
//! resulting plan is immutable and shared across request handlers.

use super::PriceModel;
use crate::models::FeatureVector;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 4;

/// Inference latency above which a warning is logged
const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Regressor loaded from an ONNX artifact
pub struct OnnxPriceModel {
    model: TractModel,
    checksum: String,
}

impl OnnxPriceModel {
    /// Read and load a model file, optionally verifying its SHA-256 checksum
    pub fn from_file(path: &Path, expected_sha256: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        Self::from_bytes(&bytes, expected_sha256)
    }

    /// Load a model from raw ONNX bytes
    pub fn from_bytes(model_bytes: &[u8], expected_sha256: Option<&str>) -> Result<Self> {
        let checksum = compute_checksum(model_bytes);
        if let Some(expected) = expected_sha256 {
            if !checksum.eq_ignore_ascii_case(expected.trim()) {
                anyhow::bail!("Checksum mismatch: expected {}, got {}", expected.trim(), checksum);
            }
            debug!(checksum = %checksum, "Model checksum validated");
        }

        let model = Self::load_model(model_bytes)?;
        Ok(Self { model, checksum })
    }

    /// Parse and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8]) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    fn features_to_tensor(features: &FeatureVector) -> Result<Tensor> {
        let data: Vec<f32> = features.as_array().iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), data)
            .context("Failed to build input tensor")?;
        Ok(array.into())
    }

    /// Hex SHA-256 of the loaded artifact
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

impl PriceModel for OnnxPriceModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let start = Instant::now();
        let input = Self::features_to_tensor(features)?;

        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;
        let prediction = output
            .to_array_view::<f32>()
            .context("Model output is not f32")?
            .iter()
            .next()
            .copied()
            .context("Model output is empty")?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Ok(f64::from(prediction))
    }
}

/// Hex-encoded SHA-256 digest
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

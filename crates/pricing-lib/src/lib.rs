//! Pricing library for the used-bike price predictor
//!
//! This crate provides the core functionality for:
//! - Request validation (form fields and JSON payloads)
//! - Base price prediction through an ONNX regression model
//! - Marketplace heuristic adjustments on top of the base prediction
//! - Health reporting and observability

pub mod adjuster;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod service;
pub mod validator;

pub use adjuster::{adjust, Adjustment, ListingAttributes};
pub use error::{PricingError, PricingResult};
pub use health::{HealthReport, ReadinessResponse};
pub use models::*;
pub use observability::{PricingMetrics, StructuredLogger};
pub use predictor::{ModelProvider, OnnxPriceModel, PriceModel};
pub use service::PricingService;
pub use validator::InputValidator;

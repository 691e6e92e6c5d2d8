//! HTTP front end for the used-bike price predictor
//!
//! Serves the HTML form page, the JSON prediction API and the
//! health/readiness/metrics endpoints.

pub mod api;
pub mod config;
pub mod page;

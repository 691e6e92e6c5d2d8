//! CLI command implementations

pub mod adjust;
pub mod health;
pub mod predict;

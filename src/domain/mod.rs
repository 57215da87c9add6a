//! Core domain types and logic.
//!
//! Leaf-to-root: bars and features, indicators and sessions, scoring,
//! decision fusion, then the backtest and its report.

pub mod analysis;
pub mod backtest;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod features;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod scoring;
pub mod session;
pub mod strategy;

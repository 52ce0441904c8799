//! South African Personal Income Tax Engine
//!
//! This crate estimates an individual's income tax position from IRP5
//! employment-certificate figures and flags data-quality and audit-risk
//! concerns before filing.

#![warn(missing_docs)]

pub mod assessment;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;

//! fmtel Server Library
//!
//! Exposes server components for integration testing.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod pipeline;
pub mod state;

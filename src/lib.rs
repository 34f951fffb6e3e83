//! Mediatab - structured media metadata from MediaInfo reports
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod probe;

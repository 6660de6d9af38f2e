//! Transparency module for Sentivision.
//!
//! This module tracks what the recorder captures and keeps, so users can
//! audit the emotion feature at any time.

pub mod log;

pub use log::{CollectionEvent, TransparencyLog, TransparencyStats};

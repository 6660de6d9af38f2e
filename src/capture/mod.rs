//! Emotion capture for the Sentivision recorder.
//!
//! This module provides the sample types, the capture source abstraction and
//! the periodic sampler that turns detector output into samples.

pub mod sampler;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use sampler::{EmotionSampler, SamplerHandle, DEFAULT_SAMPLE_INTERVAL};
pub use source::{
    open_capture_source, CaptureError, CaptureSource, SimulatedCamera, UnavailableCamera,
};
pub use types::{EmotionChannel, EmotionSample, EmotionVector, UnknownChannel};

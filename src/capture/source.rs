//! Capture sources feeding the emotion sampler.
//!
//! The recorder only needs start, stop and an "is active" signal from the
//! device. No frames cross this boundary.

use crate::config::CaptureDevice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while acquiring a capture source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("capture source is already active")]
    AlreadyActive,
    #[error("capture source unavailable: {0}")]
    Unavailable(String),
}

/// A device that must be active for sampling to run.
pub trait CaptureSource: Send {
    /// Acquire the device.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Release the device. Safe to call when not active.
    fn stop(&mut self);

    fn is_active(&self) -> bool;

    /// Human-readable device name for status output.
    fn name(&self) -> &str;
}

/// A stand-in camera that can always be acquired.
#[derive(Debug, Default)]
pub struct SimulatedCamera {
    active: Arc<AtomicBool>,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureSource for SimulatedCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyActive);
        }
        tracing::debug!("simulated camera acquired");
        Ok(())
    }

    fn stop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            tracing::debug!("simulated camera released");
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "simulated camera"
    }
}

/// A source that never starts, used when no device is configured.
#[derive(Debug, Default)]
pub struct UnavailableCamera;

impl CaptureSource for UnavailableCamera {
    fn start(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable(
            "no capture device configured".to_string(),
        ))
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Pick the capture source for the configured device.
pub fn open_capture_source(device: CaptureDevice) -> Box<dyn CaptureSource> {
    match device {
        CaptureDevice::Simulated => Box::new(SimulatedCamera::new()),
        CaptureDevice::None => Box::new(UnavailableCamera),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_camera_lifecycle() {
        let mut camera = SimulatedCamera::new();
        assert!(!camera.is_active());

        camera.start().unwrap();
        assert!(camera.is_active());
        assert_eq!(camera.start(), Err(CaptureError::AlreadyActive));

        camera.stop();
        assert!(!camera.is_active());
        camera.stop();
    }

    #[test]
    fn test_unavailable_camera_never_starts() {
        let mut source = open_capture_source(CaptureDevice::None);
        assert!(matches!(source.start(), Err(CaptureError::Unavailable(_))));
        assert!(!source.is_active());
    }
}

//! Periodic emotion sampling while a capture source is active.

use crate::analysis::EmotionDetector;
use crate::capture::source::{CaptureError, CaptureSource};
use crate::capture::types::EmotionSample;
use chrono::Utc;
use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default tick interval between samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Capacity of the sample channel between the ticker and the recorder.
const CHANNEL_CAPACITY: usize = 10_000;

/// Produces one [`EmotionSample`] per tick from an [`EmotionDetector`].
pub struct EmotionSampler<D> {
    detector: D,
    interval: Duration,
}

impl<D: EmotionDetector> EmotionSampler<D> {
    pub fn new(detector: D, interval: Duration) -> Self {
        Self { detector, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single tick at the given timestamp.
    pub fn sample_at(&mut self, timestamp: i64) -> EmotionSample {
        let (emotions, confidence) = self.detector.detect_emotion();
        EmotionSample::new(timestamp, emotions, confidence)
    }
}

impl<D: EmotionDetector + Send + 'static> EmotionSampler<D> {
    /// Acquire the capture source and start ticking on a background thread.
    ///
    /// If the source cannot be started no thread is spawned and no samples
    /// are produced.
    pub fn spawn(
        self,
        mut source: Box<dyn CaptureSource>,
    ) -> Result<SamplerHandle, CaptureError> {
        source.start()?;

        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        let interval = self.interval;
        let mut sampler = self;

        let thread = thread::spawn(move || {
            run_ticker(&mut sampler, sender, stop_rx, interval);
            r.store(false, Ordering::SeqCst);
        });

        tracing::info!(
            source = source.name(),
            interval_ms = interval.as_millis() as u64,
            "sampler started"
        );

        Ok(SamplerHandle {
            receiver,
            running,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
            source: Some(source),
        })
    }
}

fn run_ticker<D: EmotionDetector>(
    sampler: &mut EmotionSampler<D>,
    sender: Sender<EmotionSample>,
    stop_rx: Receiver<()>,
    interval: Duration,
) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                let sample = sampler.sample_at(Utc::now().timestamp_millis());
                tracing::trace!(timestamp = sample.timestamp, "sample produced");
                match sender.try_send(sample) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!("sample channel full, dropping sample");
                    }
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            // Fires when the handle drops its stop sender.
            recv(stop_rx) -> _ => break,
        }
    }
}

/// A running sampler. Stopping or dropping it ends the ticker and releases
/// the capture source.
pub struct SamplerHandle {
    receiver: Receiver<EmotionSample>,
    running: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    source: Option<Box<dyn CaptureSource>>,
}

impl SamplerHandle {
    /// Get the receiver for produced samples.
    pub fn receiver(&self) -> &Receiver<EmotionSample> {
        &self.receiver
    }

    /// Try to receive a sample without blocking.
    pub fn try_recv(&self) -> Option<EmotionSample> {
        self.receiver.try_recv().ok()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Whether the capture source is still held.
    pub fn is_capture_active(&self) -> bool {
        self.source.as_ref().map(|s| s.is_active()).unwrap_or(false)
    }

    /// Stop the ticker and release the capture source.
    ///
    /// Samples already queued remain readable from the receiver.
    pub fn stop(&mut self) {
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("sampler thread panicked");
            }
        }
        self.running.store(false, Ordering::SeqCst);
        if let Some(mut source) = self.source.take() {
            source.stop();
            tracing::info!(source = source.name(), "capture source released");
        }
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

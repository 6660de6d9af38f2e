//! Sentivision - local emotion-session recorder for trading insight dashboards.
//!
//! This library samples facial-emotion intensities while a capture source is
//! active, aggregates each recording into a session with insights, persists the
//! sessions locally and turns them into CSV exports and chart timelines.
//!
//! # Privacy Guarantees
//!
//! - **No frames**: Video frames never leave the detector, only emotion scores
//! - **Local only**: Sessions are stored in a JSON file on this device
//! - **Bounded capture**: Samples are buffered only while a recording is active
//! - **Transparency**: All collection is logged and auditable
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Sentivision                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │   Sampler   │──▶│  Recorder   │──▶│  Aggregate  │       │
//! │  │ (500ms tick)│   │  (buffer)   │   │ (insights)  │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! │         │                                    │              │
//! │         ▼                                    ▼              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │Transparency │   │  Timeline   │◀──│   Session   │──▶ CSV│
//! │  │    Log      │   │  (series)   │   │    Store    │       │
//! │  └─────────────┘   └─────────────┘   └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sentivision::{
//!     open_capture_source, CaptureDevice, EmotionSampler, SessionRecorder, SessionStore,
//!     SyntheticEmotionDetector, DEFAULT_SAMPLE_INTERVAL,
//! };
//!
//! let sampler = EmotionSampler::new(SyntheticEmotionDetector::new(), DEFAULT_SAMPLE_INTERVAL);
//! let mut handle = sampler
//!     .spawn(open_capture_source(CaptureDevice::Simulated))
//!     .expect("camera unavailable");
//!
//! let mut recorder = SessionRecorder::new();
//! recorder
//!     .start(chrono::Utc::now().timestamp_millis(), handle.is_capture_active())
//!     .expect("recording already active");
//!
//! // Samples arrive on handle.receiver(); push them into the recorder.
//! while let Some(sample) = handle.try_recv() {
//!     recorder.push(sample);
//! }
//!
//! handle.stop();
//! if let Some(session) = recorder.stop(chrono::Utc::now().timestamp_millis()) {
//!     let mut store = SessionStore::open("emotion-sessions.json").expect("store");
//!     store.save(session).expect("save");
//! }
//! ```

pub mod analysis;
pub mod capture;
pub mod config;
pub mod core;
pub mod store;
pub mod tier;
pub mod transparency;

// Re-export key types at crate root for convenience
pub use analysis::{
    EmotionDetector, PatternDetector, SentimentScorer, SyntheticEmotionDetector,
    SyntheticPatternDetector, SyntheticSentimentScorer,
};
pub use capture::{
    open_capture_source, CaptureError, CaptureSource, EmotionChannel, EmotionSample,
    EmotionSampler, EmotionVector, SamplerHandle, DEFAULT_SAMPLE_INTERVAL,
};
pub use config::{CaptureDevice, Config, ConfigError};
pub use crate::core::{
    aggregate, build_timeline, EmotionSession, NewSession, SessionRecorder, SessionSummary,
    Timeline,
};
pub use store::{samples_to_csv, ExportError, SessionStore, StoreError};
pub use tier::{Capability, GatingPolicy, SubscriptionTier, TierContext, TierError};
pub use transparency::{CollectionEvent, TransparencyLog, TransparencyStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Privacy declaration that can be displayed to users.
pub const PRIVACY_DECLARATION: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║               SENTIVISION EMOTION AI - PRIVACY NOTICE            ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  Emotion AI scores your facial expressions while you record.     ║
║                                                                  ║
║  ✓ WHAT WE KEEP:                                                 ║
║    • Seven emotion intensities per sample (0-100%)               ║
║    • Detector confidence per sample                              ║
║    • When each sample was taken                                  ║
║                                                                  ║
║  ✗ WHAT WE NEVER KEEP:                                           ║
║    • Video frames or still images                                ║
║    • Facial landmarks or identity                                ║
║    • Anything captured while no recording is active              ║
║                                                                  ║
║  Sessions stay in a local file on this device. Delete any        ║
║  session with:                                                   ║
║    sentivision delete <id>                                       ║
║                                                                  ║
║  You can view collection statistics anytime with:                ║
║    sentivision status                                            ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;

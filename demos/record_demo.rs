//! Demonstration of a Sentivision emotion recording.
//!
//! This example shows how to:
//! 1. Acquire a capture source and start the sampler
//! 2. Feed samples into a session recorder
//! 3. Stop and aggregate the recording
//! 4. Build a timeline and a CSV export from the session
//!
//! Run with: cargo run --example record_demo

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use sentivision::{
    capture::{open_capture_source, EmotionSampler},
    config::CaptureDevice,
    core::{build_timeline, format_clock, SessionRecorder},
    store::samples_to_csv,
    transparency::{CollectionEvent, TransparencyLog},
    SyntheticEmotionDetector, PRIVACY_DECLARATION,
};

fn main() {
    println!("Sentivision - Record Demo");
    println!("=========================");
    println!();

    // Display privacy declaration
    println!("{PRIVACY_DECLARATION}");
    println!();

    let sampler = EmotionSampler::new(
        SyntheticEmotionDetector::new(),
        Duration::from_millis(250),
    );
    let mut handle = match sampler.spawn(open_capture_source(CaptureDevice::Simulated)) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error starting camera: {e}");
            return;
        }
    };

    let transparency_log = TransparencyLog::new();
    let mut recorder = SessionRecorder::new();
    if let Err(e) = recorder.start(Utc::now().timestamp_millis(), handle.is_capture_active()) {
        eprintln!("Error starting recording: {e}");
        return;
    }

    println!("Recording for 5 seconds...");
    println!();

    // Set up stop flag
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let start = Instant::now();
    let receiver = handle.receiver().clone();

    while running.load(Ordering::SeqCst) && start.elapsed() < Duration::from_secs(5) {
        if let Ok(sample) = receiver.recv_timeout(Duration::from_millis(100)) {
            let dominant = sample.emotions.dominant();
            println!(
                "  {:<9} {:>5.1}%",
                dominant.title(),
                sample.emotions.get(dominant) * 100.0
            );
            if recorder.push(sample) {
                transparency_log.record(CollectionEvent::SampleCaptured);
            }
        }
    }

    handle.stop();

    let Some(session) = recorder.stop(Utc::now().timestamp_millis()) else {
        println!("No samples captured.");
        return;
    };

    println!();
    println!("Dominant emotion: {}", session.dominant_emotion.title());
    println!(
        "Average confidence: {:.1}%",
        session.average_confidence * 100.0
    );
    for peak in &session.insights.peaks {
        println!("Peak {}: {:.1}%", peak.emotion, peak.value * 100.0);
    }

    let timeline = build_timeline(&session.emotion_data, Some(session.timestamp));
    println!("Timeline span: {}", format_clock(timeline.span_secs()));

    match samples_to_csv(&session.emotion_data) {
        Ok(csv) => println!("CSV export: {} lines", csv.lines().count()),
        Err(e) => eprintln!("Error exporting: {e}"),
    }

    println!();
    println!("{}", transparency_log.summary());
}

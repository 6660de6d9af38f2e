//! Integration tests for the record -> aggregate -> store -> export pipeline

use chrono::{TimeZone, Utc};
use sentivision::capture::{open_capture_source, CaptureError, EmotionChannel};
use sentivision::config::CaptureDevice;
use sentivision::core::{build_timeline, NewSession, SessionRecorder};
use sentivision::store::{
    export_live_buffer, parse_csv, samples_to_csv, write_export, ExportError, SessionStore,
};
use sentivision::{EmotionSample, EmotionSampler, EmotionVector, SyntheticEmotionDetector};
use std::time::Duration;

const T0: i64 = 1_700_000_000_000;

fn sample(offset_ms: i64, happy: f64, neutral: f64) -> EmotionSample {
    EmotionSample::new(
        T0 + offset_ms,
        EmotionVector::from_values([happy, 0.0, 0.0, 0.0, neutral, 0.0, 0.0]),
        0.9,
    )
}

fn record(samples: Vec<EmotionSample>, stop_offset_ms: i64) -> Option<NewSession> {
    let mut recorder = SessionRecorder::new();
    recorder.start(T0, true).unwrap();
    for s in samples {
        assert!(recorder.push(s));
    }
    recorder.stop(T0 + stop_offset_ms)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_four_sample_recording_insights() {
    let samples = vec![
        sample(0, 0.1, 0.5),
        sample(500, 0.9, 0.1),
        sample(1000, 0.2, 0.6),
        sample(1500, 0.3, 0.4),
    ];
    let session = record(samples, 2000).expect("session");

    let avg = &session.insights.avg_emotions;
    assert!(approx(avg.get(EmotionChannel::Happy), 0.375));
    assert!(approx(avg.get(EmotionChannel::Neutral), 0.4));
    assert_eq!(session.dominant_emotion, EmotionChannel::Neutral);
    assert!(approx(session.average_confidence, 0.9));
    assert!(approx(session.duration, 2.0));

    let peaks = &session.insights.peaks;
    assert_eq!(peaks.len(), 2);
    assert_eq!(peaks[0].emotion, EmotionChannel::Happy);
    assert!(approx(peaks[0].value, 0.9));
    assert_eq!(peaks[0].timestamp, T0 + 500);
    assert_eq!(peaks[1].emotion, EmotionChannel::Neutral);
    assert!(approx(peaks[1].value, 0.6));
    assert_eq!(peaks[1].timestamp, T0 + 1000);
}

#[test]
fn test_empty_recording_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotion-sessions.json");
    let mut store = SessionStore::open(&path).unwrap();

    assert!(record(Vec::new(), 5000).is_none());
    assert!(store.is_empty());
    assert!(!path.exists());

    store.reload().unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_save_then_delete_restores_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotion-sessions.json");
    let mut store = SessionStore::open(&path).unwrap();

    let first = store
        .save(record(vec![sample(0, 0.7, 0.1)], 500).unwrap())
        .unwrap();
    let before: Vec<String> = store.list().iter().map(|s| s.id.clone()).collect();

    let second = store
        .save(record(vec![sample(0, 0.1, 0.7)], 500).unwrap())
        .unwrap();
    assert_eq!(store.list()[0].id, second.id);
    assert_eq!(store.list()[1].id, first.id);

    assert!(store.delete(&second.id).unwrap());
    let after: Vec<String> = store.list().iter().map(|s| s.id.clone()).collect();
    assert_eq!(before, after);

    // A fresh handle sees the same collection.
    let reopened = SessionStore::open(&path).unwrap();
    assert_eq!(reopened.len(), 1);
    let stored = reopened.get(&first.id).expect("first session persisted");
    assert_eq!(stored.sample_count(), first.sample_count());
    assert_eq!(stored.dominant_emotion, first.dominant_emotion);
}

#[test]
fn test_csv_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let samples = vec![
        sample(0, 0.123, 0.5),
        sample(500, 0.9, 0.1),
        sample(1000, 0.2, 0.66),
    ];
    let session = record(samples.clone(), 1500).unwrap();

    let csv = samples_to_csv(&session.emotion_data).unwrap();
    let path = write_export(dir.path(), "export.csv", &csv).unwrap();
    let rows = parse_csv(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(rows.len(), samples.len());
    for (row, original) in rows.iter().zip(&samples) {
        assert_eq!(Some(row.timestamp), original.datetime());
        for channel in EmotionChannel::ALL {
            let expected = original.emotions.get(channel) * 100.0;
            assert!((row.emotion_pct(channel) - expected).abs() <= 0.01);
        }
        assert!((row.confidence_pct - original.confidence * 100.0).abs() <= 0.01);
    }
}

#[test]
fn test_live_buffer_export_before_stop() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc.timestamp_millis_opt(T0).unwrap();

    let mut recorder = SessionRecorder::new();
    recorder.start(T0, true).unwrap();
    assert!(recorder.push(sample(0, 0.4, 0.2)));
    assert!(recorder.push(sample(500, 0.6, 0.1)));

    let path = export_live_buffer(recorder.buffer(), dir.path(), now).unwrap();
    assert_eq!(path.file_name().unwrap(), "emotion-analysis-2023-11-14.csv");
    let rows = parse_csv(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);

    // Exporting leaves the recording intact.
    let session = recorder.stop(T0 + 1000).unwrap();
    assert_eq!(session.emotion_data.len(), 2);
}

#[test]
fn test_live_buffer_export_of_empty_recording() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc.timestamp_millis_opt(T0).unwrap();

    let mut recorder = SessionRecorder::new();
    recorder.start(T0, true).unwrap();

    let err = export_live_buffer(recorder.buffer(), dir.path(), now).unwrap_err();
    assert!(matches!(err, ExportError::NoData));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(recorder.stop(T0 + 1000).is_none());
}

#[test]
fn test_timeline_of_stored_session() {
    let session = record(vec![sample(0, 0.2, 0.1), sample(1500, 0.4, 0.3)], 2000).unwrap();
    let timeline = build_timeline(&session.emotion_data, Some(session.timestamp));

    assert_eq!(timeline.points.len(), 2);
    assert!(approx(timeline.span_secs(), 1.5));
    let happy = timeline.series(EmotionChannel::Happy);
    assert!(approx(happy[1].1, 0.4));
    assert_eq!(
        timeline.summary.map(|s| s.dominant_emotion),
        Some(session.dominant_emotion)
    );
}

#[test]
fn test_sampler_feeds_recorder() {
    let sampler = EmotionSampler::new(
        SyntheticEmotionDetector::seeded(7),
        Duration::from_millis(10),
    );
    let mut handle = sampler
        .spawn(open_capture_source(CaptureDevice::Simulated))
        .unwrap();
    assert!(handle.is_capture_active());

    let mut recorder = SessionRecorder::new();
    recorder
        .start(Utc::now().timestamp_millis(), handle.is_capture_active())
        .unwrap();

    let receiver = handle.receiver().clone();
    for _ in 0..3 {
        let s = receiver.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(recorder.push(s));
    }

    handle.stop();
    assert!(!handle.is_capture_active());
    assert!(!handle.is_running());

    let session = recorder
        .stop(Utc::now().timestamp_millis())
        .unwrap();
    assert!(session.emotion_data.len() >= 3);
    assert!(session
        .emotion_data
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn test_disabled_camera_produces_no_samples() {
    let sampler = EmotionSampler::new(
        SyntheticEmotionDetector::seeded(1),
        Duration::from_millis(10),
    );
    let result = sampler.spawn(open_capture_source(CaptureDevice::None));
    assert!(matches!(result, Err(CaptureError::Unavailable(_))));
}

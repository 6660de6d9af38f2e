//! CSV export of recorded samples.

use crate::capture::types::{EmotionChannel, EmotionSample};
use crate::core::session::EmotionSession;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header row of every export.
pub const CSV_HEADER: &str = "Timestamp,Happy,Sad,Angry,Surprised,Neutral,Fear,Disgust,Confidence";

/// MIME type of exported files.
pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no data to export")]
    NoData,
    #[error("sample timestamp {timestamp} is out of range")]
    InvalidTimestamp { timestamp: i64 },
    #[error("no session with id {0}")]
    UnknownSession(String),
    #[error("malformed CSV at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("failed to write export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render samples as CSV. Emotion and confidence values are percentages
/// with two decimals; timestamps are ISO-8601 UTC with milliseconds.
pub fn samples_to_csv(samples: &[EmotionSample]) -> Result<String, ExportError> {
    if samples.is_empty() {
        return Err(ExportError::NoData);
    }

    let mut lines = Vec::with_capacity(samples.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for sample in samples {
        let datetime = sample.datetime().ok_or(ExportError::InvalidTimestamp {
            timestamp: sample.timestamp,
        })?;
        let mut fields = Vec::with_capacity(9);
        fields.push(datetime.to_rfc3339_opts(SecondsFormat::Millis, true));
        fields.extend(sample.emotions.iter().map(|(_, v)| format!("{:.2}", v * 100.0)));
        fields.push(format!("{:.2}", sample.confidence * 100.0));
        lines.push(fields.join(","));
    }
    Ok(lines.join("\n"))
}

/// One parsed row of an exported table, values still in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub timestamp: DateTime<Utc>,
    /// Percent values in channel order
    pub emotions_pct: [f64; 7],
    pub confidence_pct: f64,
}

impl CsvRow {
    pub fn emotion_pct(&self, channel: EmotionChannel) -> f64 {
        let index = EmotionChannel::ALL
            .iter()
            .position(|c| *c == channel)
            .unwrap_or(0);
        self.emotions_pct[index]
    }
}

/// Parse a table produced by [`samples_to_csv`].
pub fn parse_csv(text: &str) -> Result<Vec<CsvRow>, ExportError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(header) if header.trim() == CSV_HEADER => {}
        _ => {
            return Err(ExportError::Malformed {
                line: 1,
                reason: "missing or unexpected header".to_string(),
            })
        }
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line_no = index + 2;
        if line.trim().is_empty() {
            continue;
        }
        let malformed = |reason: String| ExportError::Malformed {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 9 {
            return Err(malformed(format!("expected 9 fields, found {}", fields.len())));
        }

        let timestamp = DateTime::parse_from_rfc3339(fields[0])
            .map_err(|e| malformed(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);

        let mut values = [0.0; 8];
        for (slot, field) in values.iter_mut().zip(&fields[1..]) {
            *slot = field
                .trim()
                .parse()
                .map_err(|e| malformed(format!("bad number {field:?}: {e}")))?;
        }

        let mut emotions_pct = [0.0; 7];
        emotions_pct.copy_from_slice(&values[..7]);
        rows.push(CsvRow {
            timestamp,
            emotions_pct,
            confidence_pct: values[7],
        });
    }
    Ok(rows)
}

/// `emotion-session-<Mon-DD-HH-MM-AM>.csv`, rendered in `tz`.
pub fn session_export_filename(session: &EmotionSession, tz: Tz) -> String {
    let local = session.started_at().with_timezone(&tz);
    format!("emotion-session-{}.csv", local.format("%b-%d-%I-%M-%p"))
}

/// `emotion-analysis-<YYYY-MM-DD>.csv` for exports of the live buffer.
pub fn live_export_filename(now: DateTime<Utc>) -> String {
    format!("emotion-analysis-{}.csv", now.format("%Y-%m-%d"))
}

/// Write an export into `dir`, creating it if needed.
pub fn write_export(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(filename);
    let io_err = |source| ExportError::Io {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    std::fs::write(&path, content).map_err(io_err)?;
    tracing::info!(path = %path.display(), mime = CSV_MIME, "export written");
    Ok(path)
}

/// Export the samples of a recording still in progress into `dir`, named
/// after the day of `now`.
pub fn export_live_buffer(
    samples: &[EmotionSample],
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let csv = samples_to_csv(samples)?;
    write_export(dir, &live_export_filename(now), &csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::EmotionVector;
    use crate::core::session::NewSession;
    use chrono::TimeZone;

    fn samples() -> Vec<EmotionSample> {
        vec![
            EmotionSample::new(
                1_700_000_000_123,
                EmotionVector::from_values([0.1234, 0.0, 0.5, 0.0, 0.25, 0.0, 1.0]),
                0.876543,
            ),
            EmotionSample::new(
                1_700_000_000_623,
                EmotionVector::from_values([0.9, 0.1, 0.0, 0.3, 0.0, 0.05, 0.0]),
                0.95,
            ),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let csv = samples_to_csv(&samples()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "2023-11-14T22:13:20.123Z,12.34,0.00,50.00,0.00,25.00,0.00,100.00,87.65"
        );
    }

    #[test]
    fn test_export_with_no_data_is_rejected() {
        assert!(matches!(samples_to_csv(&[]), Err(ExportError::NoData)));
    }

    #[test]
    fn test_parse_recovers_values_within_rounding() {
        let original = samples();
        let rows = parse_csv(&samples_to_csv(&original).unwrap()).unwrap();

        assert_eq!(rows.len(), original.len());
        for (row, sample) in rows.iter().zip(&original) {
            assert_eq!(row.timestamp.timestamp_millis(), sample.timestamp);
            for (channel, value) in sample.emotions.iter() {
                assert!((row.emotion_pct(channel) - value * 100.0).abs() <= 0.01);
            }
            assert!((row.confidence_pct - sample.confidence * 100.0).abs() <= 0.01);
        }
    }

    #[test]
    fn test_out_of_range_timestamp_is_rejected() {
        let mut rows = samples();
        rows[1].timestamp = i64::MAX;

        let err = samples_to_csv(&rows).unwrap_err();
        assert!(matches!(
            err,
            ExportError::InvalidTimestamp { timestamp } if timestamp == i64::MAX
        ));
    }

    #[test]
    fn test_live_buffer_export_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();

        let path = export_live_buffer(&samples(), dir.path(), now).unwrap();
        assert_eq!(path, dir.path().join("emotion-analysis-2026-10-14.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_csv(&content).unwrap().len(), 2);
    }

    #[test]
    fn test_live_buffer_export_with_no_samples_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();

        let err = export_live_buffer(&[], &out, now).unwrap_err();
        assert!(matches!(err, ExportError::NoData));
        assert!(!out.exists());
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let err = parse_csv("time,happy\n").unwrap_err();
        assert!(matches!(err, ExportError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_filenames() {
        let session = NewSession::from_recording(1_700_000_000_000, 1_700_000_001_000, samples())
            .unwrap()
            .with_id("session-x".to_string());

        assert_eq!(
            session_export_filename(&session, chrono_tz::UTC),
            "emotion-session-Nov-14-10-13-PM.csv"
        );
        assert_eq!(
            session_export_filename(&session, chrono_tz::America::New_York),
            "emotion-session-Nov-14-05-13-PM.csv"
        );

        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap();
        assert_eq!(live_export_filename(now), "emotion-analysis-2026-10-14.csv");
    }
}

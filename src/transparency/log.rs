//! Collection audit log.
//!
//! Counts what the recorder captured, kept and removed so users can audit the
//! emotion feature without opening the session files. Counts accumulate across
//! runs in `transparency.json` next to the session collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Something the user may want accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    SampleCaptured,
    SessionSaved,
    /// A recording stopped with no samples
    SessionDiscarded,
    SessionDeleted,
    CsvExported,
}

impl CollectionEvent {
    const COUNT: usize = 5;

    fn slot(self) -> usize {
        self as usize
    }
}

/// Cumulative counts, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyStats {
    pub samples_captured: u64,
    pub sessions_saved: u64,
    pub sessions_discarded: u64,
    pub sessions_deleted: u64,
    pub csv_exports: u64,
}

impl TransparencyStats {
    fn from_slots(slots: [u64; CollectionEvent::COUNT]) -> Self {
        let [samples_captured, sessions_saved, sessions_discarded, sessions_deleted, csv_exports] =
            slots;
        Self {
            samples_captured,
            sessions_saved,
            sessions_discarded,
            sessions_deleted,
            csv_exports,
        }
    }

    fn into_slots(self) -> [u64; CollectionEvent::COUNT] {
        [
            self.samples_captured,
            self.sessions_saved,
            self.sessions_discarded,
            self.sessions_deleted,
            self.csv_exports,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StatsFile {
    stats: TransparencyStats,
    last_updated: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TransparencyLog {
    counters: [AtomicU64; CollectionEvent::COUNT],
    /// Tags this process's log lines and summary
    instance_id: Uuid,
    started_at: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl TransparencyLog {
    /// In-memory log starting from zero.
    pub fn new() -> Self {
        Self::from_stats(TransparencyStats::default(), None)
    }

    /// Log seeded from `path`. A missing file starts from zero; an unreadable
    /// or corrupt one is logged and also starts from zero.
    pub fn with_persistence(path: PathBuf) -> Self {
        let stats = read_stats(&path);
        let log = Self::from_stats(stats, Some(path));
        tracing::info!(
            instance = %log.instance_id,
            samples = log.count(CollectionEvent::SampleCaptured),
            sessions = log.count(CollectionEvent::SessionSaved),
            "transparency log opened"
        );
        log
    }

    fn from_stats(stats: TransparencyStats, persist_path: Option<PathBuf>) -> Self {
        Self {
            counters: stats.into_slots().map(AtomicU64::new),
            instance_id: Uuid::new_v4(),
            started_at: Utc::now(),
            persist_path,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn record(&self, event: CollectionEvent) {
        self.counters[event.slot()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, event: CollectionEvent) -> u64 {
        self.counters[event.slot()].load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> TransparencyStats {
        TransparencyStats::from_slots(std::array::from_fn(|slot| {
            self.counters[slot].load(Ordering::Relaxed)
        }))
    }

    /// Human-readable audit for `status` and the end of a recording.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Collection Statistics (log {}, since {}):\n\
             - Emotion samples captured: {}\n\
             - Sessions saved: {}\n\
             - Empty recordings discarded: {}\n\
             - Sessions deleted: {}\n\
             - CSV exports written: {}\n\
             \n\
             Privacy Guarantee:\n\
             - No video frames stored\n\
             - No facial images or landmarks retained\n\
             - Only per-emotion scores kept, on this device",
            self.instance_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            stats.samples_captured,
            stats.sessions_saved,
            stats.sessions_discarded,
            stats.sessions_deleted,
            stats.csv_exports,
        )
    }

    /// Write the counts through a temp file. No-op for an in-memory log.
    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.persist_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = StatsFile {
            stats: self.stats(),
            last_updated: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!(
            instance = %self.instance_id,
            path = %path.display(),
            "transparency stats saved"
        );
        Ok(())
    }
}

impl Default for TransparencyLog {
    fn default() -> Self {
        Self::new()
    }
}

fn read_stats(path: &Path) -> TransparencyStats {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return TransparencyStats::default(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "could not read transparency stats, starting from zero: {e}"
            );
            return TransparencyStats::default();
        }
    };

    match serde_json::from_str::<StatsFile>(&content) {
        Ok(file) => file.stats,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "transparency stats corrupt, starting from zero: {e}"
            );
            TransparencyStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_count_independently() {
        let log = TransparencyLog::new();

        log.record(CollectionEvent::SampleCaptured);
        log.record(CollectionEvent::SampleCaptured);
        log.record(CollectionEvent::SessionSaved);
        log.record(CollectionEvent::SessionDiscarded);

        let stats = log.stats();
        assert_eq!(stats.samples_captured, 2);
        assert_eq!(stats.sessions_saved, 1);
        assert_eq!(stats.sessions_discarded, 1);
        assert_eq!(stats.sessions_deleted, 0);
        assert_eq!(log.count(CollectionEvent::CsvExported), 0);
    }

    #[test]
    fn test_persistence_accumulates_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transparency.json");

        let log = TransparencyLog::with_persistence(path.clone());
        log.record(CollectionEvent::SampleCaptured);
        log.record(CollectionEvent::CsvExported);
        log.save().unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = TransparencyLog::with_persistence(path);
        reloaded.record(CollectionEvent::SampleCaptured);
        assert_eq!(reloaded.stats().samples_captured, 2);
        assert_eq!(reloaded.stats().csv_exports, 1);
        assert_ne!(reloaded.instance_id(), log.instance_id());
    }

    #[test]
    fn test_corrupt_stats_file_starts_from_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transparency.json");
        std::fs::write(&path, "{\"stats\": {\"samples_captured\": ").unwrap();

        let log = TransparencyLog::with_persistence(path.clone());
        assert_eq!(log.stats(), TransparencyStats::default());

        log.record(CollectionEvent::SessionDeleted);
        log.save().unwrap();
        let reloaded = TransparencyLog::with_persistence(path);
        assert_eq!(reloaded.stats().sessions_deleted, 1);
    }

    #[test]
    fn test_in_memory_save_writes_nothing() {
        let log = TransparencyLog::new();
        log.record(CollectionEvent::SessionSaved);
        assert!(log.save().is_ok());
    }

    #[test]
    fn test_summary_names_instance_and_guarantee() {
        let log = TransparencyLog::new();
        let summary = log.summary();

        assert!(summary.contains(&log.instance_id().to_string()));
        assert!(summary.contains("Emotion samples captured"));
        assert!(summary.contains("No video frames stored"));
    }
}

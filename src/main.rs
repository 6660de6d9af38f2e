//! Sentivision CLI
//!
//! Record emotion sessions and inspect them locally.

use anyhow::{bail, ensure, Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use sentivision::{
    analysis::{
        recommend, truth_report, AssetSymbol, ChartPattern, PatternDetector, SentimentScorer,
        SyntheticEmotionDetector, SyntheticPatternDetector, SyntheticSentimentScorer,
    },
    capture::{open_capture_source, EmotionChannel, EmotionSampler},
    config::Config,
    core::{build_timeline, format_clock, EmotionSession, SessionRecorder},
    store::{export_live_buffer, session_export_filename, write_export, ExportError, SessionStore},
    tier::Capability,
    transparency::{CollectionEvent, TransparencyLog},
    PRIVACY_DECLARATION, VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sentivision")]
#[command(version = VERSION)]
#[command(about = "Local emotion-session recorder for trading insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an emotion session
    Record {
        /// Stop after this many seconds (default: until Ctrl+C)
        #[arg(long)]
        duration: Option<u64>,

        /// Override the sample interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Also write the captured samples as CSV on stop, into DIR or the
        /// configured export path
        #[arg(long, value_name = "DIR")]
        export: Option<Option<PathBuf>>,
    },

    /// List saved sessions, most recent first
    Sessions,

    /// Show a session's insights
    Show {
        /// Session id
        id: String,
    },

    /// Delete a saved session
    Delete {
        /// Session id
        id: String,
    },

    /// Export a session as CSV
    Export {
        /// Session id
        id: String,

        /// Output directory (defaults to the configured export path)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print a session's chart series
    Timeline {
        /// Session id
        id: String,

        /// Only print one emotion channel
        #[arg(long)]
        channel: Option<EmotionChannel>,
    },

    /// Compare headline sentiment with facial sentiment
    Truth {
        /// Headline sentiment in [-1, 1]
        #[arg(long, allow_hyphen_values = true)]
        headline: f64,

        /// Facial sentiment in [-1, 1]
        #[arg(long, allow_hyphen_values = true)]
        facial: f64,
    },

    /// Score the sentiment of news headlines
    Sentiment {
        /// Headlines to score
        #[arg(required = true)]
        headlines: Vec<String>,
    },

    /// Detect a chart pattern for an asset
    Pattern {
        /// Asset symbol (AAPL, TSLA, NVDA, MSFT, BTC, ETH)
        symbol: AssetSymbol,
    },

    /// Recommend an action for a pattern and sentiment
    Recommend {
        /// Chart pattern name, e.g. "Bull Flag"
        #[arg(long)]
        pattern: ChartPattern,

        /// Pattern confidence in percent
        #[arg(long)]
        confidence: f64,

        /// Sentiment in [-1, 1]
        #[arg(long, allow_hyphen_values = true)]
        sentiment: f64,
    },

    /// Show configuration and collection statistics
    Status,

    /// Display privacy declaration
    Privacy,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Set one value and save the config file
    Set {
        /// sample_interval_ms, capture.device, data_path, export_path,
        /// display_timezone, tier or tier_gating
        key: String,

        value: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentivision=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    if let Commands::Privacy = command {
        cmd_privacy();
        return Ok(());
    }

    let config = Config::load().context("could not load configuration")?;

    match command {
        Commands::Record {
            duration,
            interval_ms,
            export,
        } => {
            let export_dir = export.map(|dir| dir.unwrap_or_else(|| config.export_path.clone()));
            cmd_record(&config, duration, interval_ms, export_dir)
        }
        Commands::Sessions => cmd_sessions(&config),
        Commands::Show { id } => cmd_show(&config, &id),
        Commands::Delete { id } => cmd_delete(&config, &id),
        Commands::Export { id, output } => cmd_export(&config, &id, output),
        Commands::Timeline { id, channel } => cmd_timeline(&config, &id, channel),
        Commands::Truth { headline, facial } => cmd_truth(&config, headline, facial),
        Commands::Sentiment { headlines } => cmd_sentiment(&config, &headlines),
        Commands::Pattern { symbol } => cmd_pattern(&config, symbol),
        Commands::Recommend {
            pattern,
            confidence,
            sentiment,
        } => cmd_recommend(&config, pattern, confidence, sentiment),
        Commands::Status => cmd_status(&config),
        Commands::Privacy => Ok(()),
        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => cmd_config(&config),
            ConfigAction::Set { key, value } => cmd_config_set(config, &key, &value),
        },
    }
}

fn cmd_record(
    config: &Config,
    duration: Option<u64>,
    interval_ms: Option<u64>,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let ctx = config.tier_context();
    ctx.require(Capability::RecordSession)?;
    if export_dir.is_some() {
        ctx.require(Capability::CsvExport)?;
    }
    config
        .ensure_directories()
        .context("could not create data directories")?;

    let interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or(config.sample_interval);
    ensure!(!interval.is_zero(), "sample interval must be positive");

    let tz = config.timezone()?;
    let transparency_log = TransparencyLog::with_persistence(config.transparency_path());
    let mut store = SessionStore::open(config.sessions_path())
        .context("could not open the session store")?;

    println!("Sentivision v{VERSION}");
    println!();
    println!("Starting emotion capture...");
    println!("  Device: {:?}", config.capture.device);
    println!("  Sample interval: {}ms", interval.as_millis());
    match duration {
        Some(secs) => println!("  Duration: {secs}s"),
        None => println!("  Duration: until stopped"),
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let sampler = EmotionSampler::new(SyntheticEmotionDetector::new(), interval);
    let mut handle = sampler
        .spawn(open_capture_source(config.capture.device))
        .context("could not start the camera")?;

    let mut recorder = SessionRecorder::new();
    let started_at = Utc::now().timestamp_millis();
    recorder.start(started_at, handle.is_capture_active())?;

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let deadline = duration.map(|secs| Instant::now() + Duration::from_secs(secs));
    let receiver = handle.receiver().clone();

    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(sample) => {
                let elapsed = (sample.timestamp - started_at) as f64 / 1000.0;
                let dominant = sample.emotions.dominant();
                let line = format!(
                    "[{}] {:<9} {:>5.1}%  confidence {:>5.1}%",
                    format_clock(elapsed),
                    dominant.title(),
                    sample.emotions.get(dominant) * 100.0,
                    sample.confidence * 100.0
                );
                if recorder.push(sample) {
                    transparency_log.record(CollectionEvent::SampleCaptured);
                    println!("{line}");
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!("sampler disconnected unexpectedly");
                break;
            }
        }
    }

    println!();
    println!("Stopping capture...");
    handle.stop();

    // Samples queued before the ticker stopped still belong to this recording.
    while let Ok(sample) = receiver.try_recv() {
        if recorder.push(sample) {
            transparency_log.record(CollectionEvent::SampleCaptured);
        }
    }

    if let Some(dir) = &export_dir {
        match export_live_buffer(recorder.buffer(), dir, Utc::now()) {
            Ok(path) => {
                transparency_log.record(CollectionEvent::CsvExported);
                println!("Exported {} samples to {}", recorder.buffer().len(), path.display());
            }
            Err(e @ ExportError::NoData) => println!("Export skipped: {e}"),
            Err(e) => tracing::error!("could not export recording: {e}"),
        }
    }

    match recorder.stop(Utc::now().timestamp_millis()) {
        Some(new_session) => {
            let session = store.save(new_session).context("could not save session")?;
            transparency_log.record(CollectionEvent::SessionSaved);
            println!("Saved session {}", session.id);
            println!();
            print_session(&session, tz);
        }
        None => {
            transparency_log.record(CollectionEvent::SessionDiscarded);
            println!("No emotion data captured, nothing saved.");
        }
    }

    if let Err(e) = transparency_log.save() {
        tracing::warn!("could not save transparency log: {e}");
    }

    println!();
    println!("{}", transparency_log.summary());
    Ok(())
}

fn cmd_sessions(config: &Config) -> Result<()> {
    config.tier_context().require(Capability::SessionHistory)?;
    let tz = config.timezone()?;
    let store = open_store(config)?;

    if store.is_empty() {
        println!("No sessions recorded yet.");
        println!("Run 'sentivision record' to capture one.");
        return Ok(());
    }

    println!("{} session(s)", store.len());
    println!();
    for session in store.list() {
        println!(
            "{}  {}  {:>6.1}s  {:<9}  {:>4} samples  {:>5.1}% confidence",
            session.id,
            session
                .started_at()
                .with_timezone(&tz)
                .format("%b %d %Y %I:%M %p"),
            session.duration,
            session.dominant_emotion.title(),
            session.sample_count(),
            session.average_confidence * 100.0
        );
    }
    Ok(())
}

fn cmd_show(config: &Config, id: &str) -> Result<()> {
    let ctx = config.tier_context();
    ctx.require(Capability::SessionHistory)?;
    let tz = config.timezone()?;
    let store = open_store(config)?;
    let session = find_session(&store, id)?;

    print_session(session, tz);

    if ctx.allows(Capability::TimelineInsights) {
        let timeline = build_timeline(&session.emotion_data, Some(session.timestamp));
        println!();
        println!("Timeline:");
        println!("  Points: {}", timeline.points.len());
        println!("  Span: {}", format_clock(timeline.span_secs()));
        if let Some((time, pct)) = timeline
            .confidence_series()
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
        {
            println!("  Lowest confidence: {pct:.1}% at {}", format_clock(time));
        }
    }
    Ok(())
}

fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    config.tier_context().require(Capability::SessionHistory)?;
    let mut store = open_store(config)?;

    if store.delete(id).context("could not delete session")? {
        let transparency_log = TransparencyLog::with_persistence(config.transparency_path());
        transparency_log.record(CollectionEvent::SessionDeleted);
        if let Err(e) = transparency_log.save() {
            tracing::warn!("could not save transparency log: {e}");
        }
        println!("Deleted session {id}");
    } else {
        println!("No session with id {id}");
    }
    Ok(())
}

fn cmd_export(config: &Config, id: &str, output: Option<PathBuf>) -> Result<()> {
    config.tier_context().require(Capability::CsvExport)?;
    let tz = config.timezone()?;
    let store = open_store(config)?;
    let csv = store.export_csv(id)?;
    let session = find_session(&store, id)?;
    let dir = output.unwrap_or_else(|| config.export_path.clone());
    let path = write_export(&dir, &session_export_filename(session, tz), &csv)?;

    let transparency_log = TransparencyLog::with_persistence(config.transparency_path());
    transparency_log.record(CollectionEvent::CsvExported);
    if let Err(e) = transparency_log.save() {
        tracing::warn!("could not save transparency log: {e}");
    }

    println!(
        "Exported {} samples to {}",
        session.sample_count(),
        path.display()
    );
    Ok(())
}

fn cmd_timeline(config: &Config, id: &str, channel: Option<EmotionChannel>) -> Result<()> {
    config.tier_context().require(Capability::TimelineInsights)?;
    let store = open_store(config)?;
    let session = find_session(&store, id)?;
    let timeline = build_timeline(&session.emotion_data, Some(session.timestamp));

    match channel {
        Some(channel) => {
            println!("{:>6}  {}", "Time", channel.title());
            for (time, value) in timeline.series(channel) {
                println!("{:>6}  {:>6.1}%", format_clock(time), value * 100.0);
            }
        }
        None => {
            let header: Vec<String> = EmotionChannel::ALL
                .iter()
                .map(|c| format!("{:>9}", c.title()))
                .collect();
            println!("{:>6}{}  {:>10}", "Time", header.join(""), "Confidence");
            for point in &timeline.points {
                let values: Vec<String> = point
                    .emotions
                    .iter()
                    .map(|(_, v)| format!("{:>8.1}%", v * 100.0))
                    .collect();
                println!(
                    "{:>6}{}  {:>9.1}%",
                    format_clock(point.time_secs),
                    values.join(""),
                    point.confidence_pct
                );
            }
        }
    }
    Ok(())
}

fn cmd_truth(config: &Config, headline: f64, facial: f64) -> Result<()> {
    config.tier_context().require(Capability::TruthMeter)?;
    ensure!(
        (-1.0..=1.0).contains(&headline) && (-1.0..=1.0).contains(&facial),
        "sentiments must be within [-1, 1]"
    );

    let report = truth_report(headline, facial);
    println!("Truth Meter");
    println!("===========");
    println!();
    println!("  Headline sentiment: {:.3}", report.headline_sentiment);
    println!("  Facial sentiment:   {:.3}", report.facial_sentiment);
    println!("  Consistency: {:.1}%", report.consistency_score * 100.0);
    println!("  Rating: {}", report.truth_rating);
    println!();
    println!("{}", report.discrepancy_notes);
    println!("{}", report.truth_rating.advice());
    Ok(())
}

fn cmd_sentiment(config: &Config, headlines: &[String]) -> Result<()> {
    config.tier_context().require(Capability::SentimentScoring)?;

    let reading = SyntheticSentimentScorer::new().score_sentiment(headlines);
    for headline in &reading.headlines {
        println!(
            "{:>+7.3}  {:<8}  {}",
            headline.sentiment,
            format!("{:?}", headline.label).to_lowercase(),
            headline.text
        );
    }
    println!();
    println!("Overall sentiment: {:+.3}", reading.overall);
    Ok(())
}

fn cmd_pattern(config: &Config, symbol: AssetSymbol) -> Result<()> {
    config.tier_context().require(Capability::PatternDetection)?;

    let detection = SyntheticPatternDetector::new().detect_pattern(symbol);
    println!("{}: {}", detection.asset, detection.insight());
    println!("  Sentiment: {:+.3}", detection.sentiment);
    Ok(())
}

fn cmd_recommend(
    config: &Config,
    pattern: ChartPattern,
    confidence: f64,
    sentiment: f64,
) -> Result<()> {
    config.tier_context().require(Capability::Recommendations)?;
    if !(0.0..=100.0).contains(&confidence) {
        bail!("confidence must be a percentage in [0, 100]");
    }
    ensure!(
        (-1.0..=1.0).contains(&sentiment),
        "sentiment must be within [-1, 1]"
    );

    let rec = recommend(pattern, confidence, sentiment);
    println!("{} ({}% confidence, {:?} risk)", rec.action, rec.confidence, rec.risk);
    println!("  Timeframe: {}", rec.timeframe);
    println!("  {}", rec.reasoning);
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("Sentivision Status");
    println!("==================");
    println!();

    println!("Configuration:");
    println!("  Capture device: {:?}", config.capture.device);
    println!("  Sample interval: {}ms", config.sample_interval.as_millis());
    println!("  Display timezone: {}", config.display_timezone);
    println!(
        "  Tier: {} (gating {:?})",
        config.tier, config.tier_gating
    );
    println!();

    match SessionStore::open(config.sessions_path()) {
        Ok(store) => println!("Saved sessions: {}", store.len()),
        Err(e) => println!("Saved sessions: unavailable ({e})"),
    }
    println!();

    if config.transparency_path().exists() {
        let transparency_log = TransparencyLog::with_persistence(config.transparency_path());
        println!("{}", transparency_log.summary());
    } else {
        println!("No previous session data found.");
    }
    Ok(())
}

fn cmd_privacy() {
    println!("{PRIVACY_DECLARATION}");
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn cmd_config_set(mut config: Config, key: &str, value: &str) -> Result<()> {
    config
        .set_value(key, value)
        .with_context(|| format!("could not set {key}"))?;
    config.save().context("could not save configuration")?;
    println!("Set {key} = {value}");
    println!("Saved to {:?}", Config::config_path());
    Ok(())
}

fn open_store(config: &Config) -> Result<SessionStore> {
    SessionStore::open(config.sessions_path()).context("could not open the session store")
}

fn find_session<'a>(store: &'a SessionStore, id: &str) -> Result<&'a EmotionSession> {
    store
        .get(id)
        .with_context(|| format!("no session with id {id}"))
}

fn print_session(session: &EmotionSession, tz: Tz) {
    println!("Session {}", session.id);
    println!(
        "  Recorded: {}",
        session
            .started_at()
            .with_timezone(&tz)
            .format("%Y-%m-%d %H:%M:%S %Z")
    );
    println!("  Duration: {}", format_clock(session.duration));
    println!("  Samples: {}", session.sample_count());
    println!("  Dominant emotion: {}", session.dominant_emotion.title());
    println!(
        "  Average confidence: {:.1}%",
        session.average_confidence * 100.0
    );
    println!();
    println!("Average emotions:");
    for (channel, value) in session.insights.avg_emotions.iter() {
        println!("  {:<9} {:>5.1}%", channel.title(), value * 100.0);
    }

    if session.insights.peaks.is_empty() {
        println!();
        println!("No emotion peaks above 30%.");
    } else {
        println!();
        println!("Peaks:");
        for peak in &session.insights.peaks {
            let at = (peak.timestamp - session.timestamp) as f64 / 1000.0;
            println!(
                "  {:<9} {:>5.1}% at {}",
                peak.emotion.title(),
                peak.value * 100.0,
                format_clock(at)
            );
        }
    }
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}

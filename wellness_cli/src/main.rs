use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wellness_core::report::{exercise_report, sleep_report, symptom_report};
use wellness_core::*;

#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Wellness tracking analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v for progress, -vv for metric detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a log entry
    Log {
        #[command(subcommand)]
        entry: LogCommand,
    },

    /// Print a subject's report as JSON
    Report {
        #[arg(long)]
        subject: String,

        #[command(flatten)]
        window: WindowArgs,

        /// Which part of the report to print
        #[arg(long, value_enum, default_value_t = ReportKind::All)]
        kind: ReportKind,

        /// Target wake time (HH:MM) for a bedtime recommendation
        #[arg(long, value_parser = parse_clock)]
        wake: Option<ClockTime>,
    },

    /// Report on every subject in the store, one JSON line each
    Sweep {
        /// Number of worker threads
        #[arg(long, default_value_t = 4)]
        workers: usize,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    /// Record a night of sleep
    Sleep {
        #[arg(long)]
        subject: String,

        /// Time the subject went to bed (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        bedtime: DateTime<Utc>,

        /// Time the subject woke up (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        wake: DateTime<Utc>,

        /// Hours slept; derived from bedtime and wake time when omitted
        #[arg(long)]
        hours: Option<f64>,

        /// Sleep quality, 1-5
        #[arg(long)]
        quality: u8,

        /// Disturbance (repeatable)
        #[arg(long = "disturbance")]
        disturbances: Vec<String>,

        /// When the log applies to (RFC 3339); defaults to the wake time
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },

    /// Record an exercise session
    Exercise {
        #[arg(long)]
        subject: String,

        /// Activity type (e.g. running, "martial arts")
        #[arg(long)]
        activity: String,

        /// Duration in minutes
        #[arg(long)]
        minutes: u32,

        /// Intensity (low, moderate, high)
        #[arg(long, default_value = "moderate")]
        intensity: String,

        /// Mood after exercising, 1-5
        #[arg(long)]
        mood: Option<u8>,

        /// When the session happened (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },

    /// Record symptoms
    Symptom {
        #[arg(long)]
        subject: String,

        /// Symptom (repeatable, at least one)
        #[arg(long = "symptom", required = true)]
        symptoms: Vec<String>,

        /// Severity, 1-10
        #[arg(long)]
        severity: u8,

        /// Trigger (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,

        /// Mood, 1-5
        #[arg(long)]
        mood: Option<u8>,

        /// When the symptoms occurred (RFC 3339); defaults to now
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Window length in days; defaults to the configured length
    #[arg(long)]
    days: Option<i64>,

    /// IANA timezone; defaults to the configured timezone
    #[arg(long)]
    tz: Option<String>,

    /// Report as of this instant (RFC 3339); defaults to now
    #[arg(long, value_parser = parse_instant)]
    as_of: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportKind {
    All,
    Sleep,
    Exercise,
    Symptom,
}

fn parse_instant(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn parse_clock(s: &str) -> std::result::Result<ClockTime, String> {
    ClockTime::parse(s).ok_or_else(|| format!("expected HH:MM, got {}", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    wellness_core::logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let store_path = config.data.log_path();
    tracing::debug!("Using log store at {:?}", store_path);

    match cli.command {
        Commands::Log { entry } => cmd_log(store_path, entry),
        Commands::Report {
            subject,
            window,
            kind,
            wake,
        } => {
            let mut request = build_request(&window, &config)?;
            request.target_wake = wake;
            cmd_report(store_path, &subject, &request, kind, &config)
        }
        Commands::Sweep { workers, window } => {
            let request = build_request(&window, &config)?;
            cmd_sweep(store_path, &request, workers, &config)
        }
    }
}

fn build_request(args: &WindowArgs, config: &Config) -> Result<ReportRequest> {
    let mut request = ReportRequest::new(args.as_of.unwrap_or_else(Utc::now), &config.engine)?;
    if let Some(days) = args.days {
        request.window_days = days;
    }
    if let Some(tz) = &args.tz {
        request.timezone = parse_timezone(Some(tz))?;
    }
    Ok(request)
}

fn cmd_log(store_path: PathBuf, command: LogCommand) -> Result<()> {
    let now = Utc::now();

    let entry = match command {
        LogCommand::Sleep {
            subject,
            bedtime,
            wake,
            hours,
            quality,
            disturbances,
            at,
        } => NewSleepLog {
            subject_id: subject,
            logged_at: at,
            bedtime,
            wake_time: wake,
            hours_slept: hours,
            quality,
            disturbances,
        }
        .validate(now)?,
        LogCommand::Exercise {
            subject,
            activity,
            minutes,
            intensity,
            mood,
            at,
        } => NewExerciseLog {
            subject_id: subject,
            logged_at: at.unwrap_or(now),
            activity_type: activity,
            duration_minutes: minutes,
            intensity,
            mood_after: mood,
        }
        .validate(now)?,
        LogCommand::Symptom {
            subject,
            symptoms,
            severity,
            triggers,
            mood,
            at,
        } => NewSymptomLog {
            subject_id: subject,
            logged_at: at.unwrap_or(now),
            symptoms,
            severity,
            triggers,
            mood,
        }
        .validate(now)?,
    };

    let mut store = JsonlLogStore::new(&store_path);
    store.append(&entry)?;

    println!("✓ {:?} log recorded for {}", entry.category(), entry.subject_id);
    println!("  id: {}", entry.id);
    Ok(())
}

fn cmd_report(
    store_path: PathBuf,
    subject: &str,
    request: &ReportRequest,
    kind: ReportKind,
    config: &Config,
) -> Result<()> {
    let store = JsonlLogStore::new(store_path);
    let (_, to) = request.window()?.fetch_bounds();
    let entries = store.fetch(subject, DateTime::<Utc>::MIN_UTC, to)?;

    let json = match kind {
        ReportKind::All => {
            serde_json::to_string_pretty(&wellness_report(subject, &entries, request, config)?)?
        }
        ReportKind::Sleep => serde_json::to_string_pretty(&sleep_report(&entries, request, config)?)?,
        ReportKind::Exercise => {
            serde_json::to_string_pretty(&exercise_report(&entries, request, config)?)?
        }
        ReportKind::Symptom => {
            serde_json::to_string_pretty(&symptom_report(&entries, request, config)?)?
        }
    };

    println!("{}", json);
    Ok(())
}

fn cmd_sweep(
    store_path: PathBuf,
    request: &ReportRequest,
    workers: usize,
    config: &Config,
) -> Result<()> {
    let store = JsonlLogStore::new(store_path);
    let subjects = store.subjects()?;

    if subjects.is_empty() {
        eprintln!("No subjects found - nothing to sweep.");
        return Ok(());
    }

    for result in sweep(&store, &subjects, request, config, workers) {
        let line = match &result.report {
            Ok(report) => serde_json::to_string(report)?,
            Err(e) => serde_json::json!({
                "subject_id": result.subject_id,
                "error": e.to_string(),
            })
            .to_string(),
        };
        println!("{}", line);
    }

    Ok(())
}

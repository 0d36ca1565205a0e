//! Batch recomputation across subjects.
//!
//! The store is read once and partitioned by subject. Each subject's report
//! is independent, so subjects are split across a bounded set of scoped
//! worker threads with no coordination between them.

use crate::config::Config;
use crate::report::{wellness_report, ReportRequest, WellnessReport};
use crate::store::LogStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Outcome of one subject's report in a sweep
#[derive(Debug)]
pub struct SweepResult {
    pub subject_id: String,
    pub report: Result<WellnessReport>,
}

/// Build a report for every subject in `subjects`
///
/// At most `workers` threads run at once (at least one). Results are
/// sorted by subject id with exactly one per distinct subject, and one
/// subject failing leaves the rest intact.
pub fn sweep<S>(
    store: &S,
    subjects: &[String],
    request: &ReportRequest,
    config: &Config,
    workers: usize,
) -> Vec<SweepResult>
where
    S: LogStore + ?Sized,
{
    let mut ordered: Vec<&str> = subjects.iter().map(String::as_str).collect();
    ordered.sort_unstable();
    ordered.dedup();

    if ordered.is_empty() {
        return Vec::new();
    }

    let history = request.window().and_then(|window| {
        let (_, to) = window.fetch_bounds();
        store.fetch_many(&ordered, DateTime::<Utc>::MIN_UTC, to)
    });
    let history = match history {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "sweep could not load history");
            return ordered
                .iter()
                .map(|subject| SweepResult {
                    subject_id: subject.to_string(),
                    report: Err(replicate(&e)),
                })
                .collect();
        }
    };

    tracing::info!(subjects = ordered.len(), workers, "starting sweep");
    let results: Vec<SweepResult> = fan_out(&ordered, workers, |subject| {
        let entries = history.get(subject).map(Vec::as_slice).unwrap_or_default();
        wellness_report(subject, entries, request, config)
    })
    .into_iter()
    .map(|(subject_id, report)| SweepResult { subject_id, report })
    .collect();

    let failed = results.iter().filter(|r| r.report.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, "sweep finished with failures");
    }
    results
}

/// Run `job` for each of the sorted `subjects` on up to `workers` threads
///
/// Output keeps the input order. A worker that panics fails every subject
/// in its chunk with `Error::Other` instead of dropping them.
fn fan_out<T, F>(subjects: &[&str], workers: usize, job: F) -> Vec<(String, Result<T>)>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    if subjects.is_empty() {
        return Vec::new();
    }

    let workers = workers.clamp(1, subjects.len());
    let chunk_size = subjects.len().div_ceil(workers);
    let job = &job;

    std::thread::scope(|scope| {
        let handles: Vec<_> = subjects
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|&subject| (subject.to_string(), job(subject)))
                        .collect::<Vec<_>>()
                });
                (chunk, handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(chunk, handle)| match handle.join() {
                Ok(results) => results,
                Err(_) => {
                    tracing::error!(subjects = chunk.len(), "sweep worker panicked");
                    chunk
                        .iter()
                        .map(|&subject| {
                            let message = format!("worker panicked while reporting on {}", subject);
                            (subject.to_string(), Err(Error::Other(message)))
                        })
                        .collect()
                }
            })
            .collect()
    })
}

/// Copy of a shared failure for each subject it affects
fn replicate(error: &Error) -> Error {
    match error {
        Error::InvalidArgument(msg) => Error::InvalidArgument(msg.clone()),
        Error::InvalidTimezone(msg) => Error::InvalidTimezone(msg.clone()),
        Error::Config(msg) => Error::Config(msg.clone()),
        other => Error::Other(other.to_string()),
    }
}

//! Cumulative sleep debt.

use crate::consistency::nightly_sleep;
use crate::{Error, LogEntry, Result, TimeWindow};
use serde::Serialize;

/// Default nightly sleep target in hours
pub const DEFAULT_TARGET_HOURS: f64 = 8.0;

/// Accumulated shortfall against a nightly target
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SleepDebt {
    pub debt_hours: f64,
    pub nights_logged: u32,
}

/// Sum of nightly deficits `max(0, target - hours_slept)` over `window`
///
/// Nights without a log contribute nothing: a missing log is unknown, not
/// a night without sleep. Surplus nights never pay debt back.
pub fn sleep_debt(entries: &[LogEntry], window: &TimeWindow, target_hours: f64) -> Result<SleepDebt> {
    if !target_hours.is_finite() || target_hours <= 0.0 {
        return Err(Error::invalid(format!(
            "sleep target must be positive, got {} hours",
            target_hours
        )));
    }

    let nights = nightly_sleep(entries, window);
    let debt_hours: f64 = nights
        .iter()
        .map(|(_, s)| (target_hours - s.hours_slept).max(0.0))
        .sum();

    tracing::debug!(debt_hours, nights = nights.len(), target_hours, "sleep debt");

    Ok(SleepDebt {
        debt_hours,
        nights_logged: nights.len() as u32,
    })
}

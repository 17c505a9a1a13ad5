//! Cycle-phase inference over the period-start history. Everything here is a
//! pure function of (today, history); no phase state is ever stored, so a
//! reread can never disagree with the log.

use chrono::NaiveDate;

use crate::models::{CyclePhase, CycleState, PeriodStart};

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const MIN_CYCLE_LENGTH: u32 = 20;
pub const MAX_CYCLE_LENGTH: u32 = 40;

/// Mean gap between consecutive period starts, rounded to whole days.
/// Falls back to the 28-day default until there are two dates to diff.
/// Input order does not matter; the history is sorted first.
pub fn estimate_cycle_length(history: &[PeriodStart]) -> u32 {
    let mut dates: Vec<NaiveDate> = history.iter().map(|p| p.date).collect();
    dates.sort_unstable();
    dates.dedup();
    if dates.len() < 2 {
        return DEFAULT_CYCLE_LENGTH;
    }
    let total: i64 = dates.windows(2).map(|w| (w[1] - w[0]).num_days()).sum();
    let mean = total as f64 / (dates.len() - 1) as f64;
    mean.round() as u32
}

/// Cycle length to classify against: a valid override on the most recent
/// record wins, otherwise the computed estimate. Out-of-range overrides
/// (hand-edited files) are ignored with a warning.
pub fn effective_cycle_length(history: &[PeriodStart]) -> u32 {
    let latest = history.iter().max_by_key(|p| p.date);
    if let Some(len) = latest.and_then(|p| p.avg_cycle_length) {
        if (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&len) {
            return len;
        }
        tracing::warn!("⚠️ ignoring out-of-range cycle length override of {len} days");
    }
    estimate_cycle_length(history)
}

/// Days since the most recent logged start on or before `today`; manual
/// backdates can put starts in the future, and those say nothing about the
/// current cycle yet. An empty history counts as day zero of an unknown
/// cycle rather than an undefined state.
pub fn days_since_last_period(today: NaiveDate, history: &[PeriodStart]) -> i64 {
    last_period_on_or_before(today, history).map_or(0, |last| (today - last).num_days())
}

fn last_period_on_or_before(today: NaiveDate, history: &[PeriodStart]) -> Option<NaiveDate> {
    history
        .iter()
        .map(|p| p.date)
        .filter(|d| *d <= today)
        .max()
}

/// Total classification of a day offset against the cycle length. For cycle
/// lengths under 17 the Luteal band is empty; anything past the cycle length
/// lands in PmsOrIrregular.
pub fn classify_phase(days_since: i64, cycle_length: u32) -> CyclePhase {
    if days_since <= 4 {
        CyclePhase::Menstruation
    } else if days_since <= 12 {
        CyclePhase::Follicular
    } else if days_since <= 16 {
        CyclePhase::Ovulation
    } else if days_since <= i64::from(cycle_length) {
        CyclePhase::Luteal
    } else {
        CyclePhase::PmsOrIrregular
    }
}

pub fn suggest_activity(phase: CyclePhase) -> &'static str {
    match phase {
        CyclePhase::Menstruation => "Restorative yoga, light stretching, or rest.",
        CyclePhase::Follicular => "Cardio, strength training - good time for intense movement.",
        CyclePhase::Ovulation => "High-intensity workouts, group training.",
        CyclePhase::Luteal => "Moderate movement like walking, yoga, swimming.",
        CyclePhase::PmsOrIrregular => "Gentle yoga, breathing exercises, journaling.",
    }
}

pub fn current_state(today: NaiveDate, history: &[PeriodStart]) -> CycleState {
    let last_period = last_period_on_or_before(today, history);
    let days_since = last_period.map_or(0, |last| (today - last).num_days());
    let cycle_length = effective_cycle_length(history);
    CycleState {
        last_period,
        days_since,
        cycle_length,
        phase: classify_phase(days_since, cycle_length),
    }
}

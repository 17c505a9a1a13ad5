//! Builds one immutable [`DailyEntry`] from raw field values plus the
//! current cycle phase. Pure construction: validation and stamping only,
//! the caller hands the result to the store.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{CyclePhase, DailyEntry, EntrySlot};

/// Raw field values as supplied by the driving client, before the phase
/// stamp. Sliders and checkboxes in the original UI clamp these ranges, but
/// the client can be swapped out, so bounds are re-checked here.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDraft {
    pub date: NaiveDate,
    #[serde(default)]
    pub entry_slot: Option<EntrySlot>,
    pub sleep: u8,
    pub tiredness: u8,
    pub mood: u8,
    pub self_worth: u8,
    pub energy: u8,
    pub stress: u8,
    pub anxiety: u8,
    #[serde(default)]
    pub medication: bool,
    #[serde(default)]
    pub swollen: bool,
    pub pain: u8,
    #[serde(default)]
    pub headache: bool,
    #[serde(default)]
    pub stomach_pain: bool,
    #[serde(default)]
    pub joint_pain: bool,
    #[serde(default)]
    pub gluten: bool,
    #[serde(default)]
    pub sugar: bool,
    #[serde(default)]
    pub dairy: bool,
    #[serde(default)]
    pub processed: bool,
    pub water: u8,
    pub coffee: u8,
    #[serde(default)]
    pub last_coffee: String,
    #[serde(default)]
    pub exercised: bool,
    #[serde(default)]
    pub exercise_type: String,
    #[serde(default)]
    pub exercise_duration: u16,
    #[serde(default)]
    pub exercise_intensity: u8,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub temp_feel: String,
    #[serde(default)]
    pub sleep_env: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be between 0 and {max}, got {value}")]
pub struct FieldError {
    pub field: &'static str,
    pub max: u16,
    pub value: u16,
}

fn bounded(field: &'static str, value: u16, max: u16) -> Result<(), FieldError> {
    if value > max {
        Err(FieldError { field, max, value })
    } else {
        Ok(())
    }
}

/// Validates every numeric field against its declared range and stamps the
/// phase the cycle was in when the entry was saved. The stamp is an audit
/// value and is never re-derived later.
pub fn assemble(draft: EntryDraft, phase: CyclePhase) -> Result<DailyEntry, FieldError> {
    bounded("Sleep", draft.sleep.into(), 12)?;
    bounded("Tiredness", draft.tiredness.into(), 10)?;
    bounded("Mood", draft.mood.into(), 10)?;
    bounded("SelfWorth", draft.self_worth.into(), 10)?;
    bounded("Energy", draft.energy.into(), 10)?;
    bounded("Stress", draft.stress.into(), 10)?;
    bounded("Anxiety", draft.anxiety.into(), 10)?;
    bounded("Pain", draft.pain.into(), 10)?;
    bounded("Water", draft.water.into(), 50)?;
    bounded("Coffee", draft.coffee.into(), 6)?;
    bounded("ExerciseDuration", draft.exercise_duration, 300)?;
    bounded("ExerciseIntensity", draft.exercise_intensity.into(), 5)?;

    Ok(DailyEntry {
        date: draft.date,
        entry_slot: draft.entry_slot,
        sleep: draft.sleep,
        tiredness: draft.tiredness,
        mood: draft.mood,
        self_worth: draft.self_worth,
        energy: draft.energy,
        stress: draft.stress,
        anxiety: draft.anxiety,
        medication: draft.medication,
        swollen: draft.swollen,
        pain: draft.pain,
        headache: draft.headache,
        stomach_pain: draft.stomach_pain,
        joint_pain: draft.joint_pain,
        gluten: draft.gluten,
        sugar: draft.sugar,
        dairy: draft.dairy,
        processed: draft.processed,
        water: draft.water,
        coffee: draft.coffee,
        last_coffee: draft.last_coffee,
        exercised: draft.exercised,
        exercise_type: draft.exercise_type,
        exercise_duration: draft.exercise_duration,
        exercise_intensity: draft.exercise_intensity,
        weather: draft.weather,
        temp_feel: draft.temp_feel,
        sleep_env: draft.sleep_env,
        notes: draft.notes,
        cycle_phase: phase,
    })
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-day slot for a daily entry. An absent slot means the entry covers the
/// whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntrySlot {
    Morning,
    Evening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    Menstruation,
    Follicular,
    Ovulation,
    Luteal,
    #[serde(rename = "PMS or Irregular")]
    PmsOrIrregular,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CyclePhase::Menstruation => "Menstruation",
            CyclePhase::Follicular => "Follicular",
            CyclePhase::Ovulation => "Ovulation",
            CyclePhase::Luteal => "Luteal",
            CyclePhase::PmsOrIrregular => "PMS or Irregular",
        };
        f.write_str(label)
    }
}

/// Column order of `daily_log.csv`. This is the on-disk schema contract:
/// changes must be additive so older exports stay readable.
pub const DAILY_HEADERS: [&str; 31] = [
    "Date",
    "EntrySlot",
    "Sleep",
    "Tiredness",
    "Mood",
    "SelfWorth",
    "Energy",
    "Stress",
    "Anxiety",
    "Medication",
    "Swollen",
    "Pain",
    "Headache",
    "StomachPain",
    "JointPain",
    "Gluten",
    "Sugar",
    "Dairy",
    "Processed",
    "Water",
    "Coffee",
    "LastCoffee",
    "Exercised",
    "ExerciseType",
    "ExerciseDuration",
    "ExerciseIntensity",
    "Weather",
    "TempFeel",
    "SleepEnv",
    "Notes",
    "CyclePhase",
];

pub const PERIOD_HEADERS: [&str; 2] = ["Date", "AvgCycleLength"];

/// One journal entry per (date, slot). Field order matches `DAILY_HEADERS`;
/// the backing file carries PascalCase column names while the JSON API keeps
/// snake_case keys, hence the split `rename_all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub entry_slot: Option<EntrySlot>,
    pub sleep: u8,
    pub tiredness: u8,
    pub mood: u8,
    pub self_worth: u8,
    pub energy: u8,
    pub stress: u8,
    pub anxiety: u8,
    pub medication: bool,
    pub swollen: bool,
    pub pain: u8,
    pub headache: bool,
    pub stomach_pain: bool,
    pub joint_pain: bool,
    pub gluten: bool,
    pub sugar: bool,
    pub dairy: bool,
    pub processed: bool,
    pub water: u8,
    pub coffee: u8,
    pub last_coffee: String,
    pub exercised: bool,
    pub exercise_type: String,
    pub exercise_duration: u16,
    pub exercise_intensity: u8,
    pub weather: String,
    pub temp_feel: String,
    pub sleep_env: String,
    pub notes: String,
    pub cycle_phase: CyclePhase,
}

impl DailyEntry {
    pub fn identity(&self) -> (NaiveDate, Option<EntrySlot>) {
        (self.date, self.entry_slot)
    }
}

/// One logged period start. `avg_cycle_length` is an optional per-entry
/// override of the computed estimate, bounded to [20, 40] days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct PeriodStart {
    pub date: NaiveDate,
    pub avg_cycle_length: Option<u32>,
}

/// Derived view over the period history. Never persisted, so it cannot drift
/// from its source records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleState {
    pub last_period: Option<NaiveDate>,
    pub days_since: i64,
    pub cycle_length: u32,
    pub phase: CyclePhase,
}

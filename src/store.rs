//! CSV-backed record store: one table per record kind under the data
//! directory, full load-modify-write on every mutation. O(n) per write is
//! fine at journal scale (a few thousand rows after years of logging).

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{DailyEntry, EntrySlot, PeriodStart, DAILY_HEADERS, PERIOD_HEADERS};

pub const DAILY_FILE: &str = "daily_log.csv";
pub const PERIOD_FILE: &str = "period_log.csv";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} is already logged")]
    AlreadyLogged(NaiveDate),

    #[error("{file} columns do not match the current schema; refusing to overwrite")]
    SchemaDrift { file: String },

    #[error("failed to encode rows: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Encode(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Replaced,
}

pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(RecordStore { dir })
    }

    pub fn daily_path(&self) -> PathBuf {
        self.dir.join(DAILY_FILE)
    }

    pub fn period_path(&self) -> PathBuf {
        self.dir.join(PERIOD_FILE)
    }

    /// Daily entries in file order. A missing file is an empty history; an
    /// unreadable one degrades to empty with a warning, never an error.
    pub fn load_entries(&self) -> Vec<DailyEntry> {
        self.load_table(DAILY_FILE)
    }

    /// Period starts, oldest first. Same degradation rules as
    /// [`load_entries`](Self::load_entries).
    pub fn load_periods(&self) -> Vec<PeriodStart> {
        self.load_table(PERIOD_FILE)
    }

    /// Insert-or-replace by (date, slot). Replacing an existing entry is the
    /// intended way to correct a day's log.
    pub fn upsert_entry(&self, entry: DailyEntry) -> Result<UpsertOutcome, StoreError> {
        let mut rows = self.load_entries();
        let before = rows.len();
        rows.retain(|r| r.identity() != entry.identity());
        let replaced = rows.len() < before;
        rows.push(entry);
        self.persist_table(DAILY_FILE, &DAILY_HEADERS, &rows)?;
        Ok(if replaced {
            UpsertOutcome::Replaced
        } else {
            UpsertOutcome::Created
        })
    }

    /// Dedup-on-insert: a date can only be logged once. The table stays
    /// sorted by date so gap estimation reads naturally from the file.
    pub fn insert_period(&self, period: PeriodStart) -> Result<(), StoreError> {
        let mut rows = self.load_periods();
        if rows.iter().any(|r| r.date == period.date) {
            return Err(StoreError::AlreadyLogged(period.date));
        }
        rows.push(period);
        rows.sort_by_key(|r| r.date);
        self.persist_table(PERIOD_FILE, &PERIOD_HEADERS, &rows)
    }

    /// Removes the entry with the given identity. Returns false (and skips
    /// the write) when nothing matched.
    pub fn delete_entry(
        &self,
        date: NaiveDate,
        slot: Option<EntrySlot>,
    ) -> Result<bool, StoreError> {
        let mut rows = self.load_entries();
        let before = rows.len();
        rows.retain(|r| r.identity() != (date, slot));
        if rows.len() == before {
            return Ok(false);
        }
        self.persist_table(DAILY_FILE, &DAILY_HEADERS, &rows)?;
        Ok(true)
    }

    pub fn delete_period(&self, date: NaiveDate) -> Result<bool, StoreError> {
        let mut rows = self.load_periods();
        let before = rows.len();
        rows.retain(|r| r.date != date);
        if rows.len() == before {
            return Ok(false);
        }
        self.persist_table(PERIOD_FILE, &PERIOD_HEADERS, &rows)?;
        Ok(true)
    }

    fn load_table<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Vec::new();
        }
        let mut reader = match csv::Reader::from_path(&path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("⚠️ could not open {file}: {e}; treating history as empty");
                return Vec::new();
            }
        };
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!("⚠️ could not read {file}: {e}; treating history as empty");
                    return Vec::new();
                }
            }
        }
        rows
    }

    /// Writes the full table: schema check, best-effort backup, then an
    /// atomic temp-write-and-rename so a crash mid-write never leaves a
    /// half-written file where a valid one used to be.
    fn persist_table<T: Serialize>(
        &self,
        file: &str,
        headers: &[&str],
        rows: &[T],
    ) -> Result<(), StoreError> {
        let path = self.dir.join(file);
        self.check_schema(&path, headers)?;

        // Encode in memory first; an encoding failure must not touch the file.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(headers)?;
        for row in rows {
            writer.serialize(row)?;
        }
        let buf = writer
            .into_inner()
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        self.backup(&path, file);

        let tmp = path.with_extension(format!("csv.tmp.{}", process::id()));
        fs::write(&tmp, &buf)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Refuses to overwrite a file whose header row differs from the current
    /// schema. Silently dropping columns would be worse than a failed save.
    fn check_schema(&self, path: &Path, headers: &[&str]) -> Result<(), StoreError> {
        let Ok(file) = File::open(path) else {
            return Ok(());
        };
        let mut first = String::new();
        if BufReader::new(file).read_line(&mut first).is_err() {
            return Ok(());
        }
        let existing = first.trim_end();
        if existing.is_empty() || existing == headers.join(",") {
            Ok(())
        } else {
            Err(StoreError::SchemaDrift {
                file: path.display().to_string(),
            })
        }
    }

    /// Best-effort copy of the current file so a bad write stays manually
    /// recoverable. Failure only warns.
    fn backup(&self, path: &Path, file: &str) {
        if !path.exists() {
            return;
        }
        let backup = path.with_extension("backup.csv");
        if let Err(e) = fs::copy(path, &backup) {
            tracing::warn!("⚠️ could not back up {file}: {e}");
        }
    }
}

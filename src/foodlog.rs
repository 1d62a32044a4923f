use crate::error::FoodLogError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: uuid::Uuid,
    pub name: String,
    pub calories: u32,
    pub logged_at: DateTime<Utc>,
}

impl FoodEntry {
    pub fn new(name: impl Into<String>, calories: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            calories,
            logged_at: Utc::now(),
        }
    }
}

/// Day-keyed food diary persisted as pretty JSON. Opening a path that does
/// not exist yet yields an empty log.
#[derive(Debug)]
pub struct FoodLog {
    path: PathBuf,
    days: BTreeMap<NaiveDate, Vec<FoodEntry>>,
}

impl FoodLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FoodLogError> {
        let path = path.into();
        let days = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), days = days.len(), "food log opened");
        Ok(Self { path, days })
    }

    pub fn save(&self) -> Result<(), FoodLogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.days)?)?;
        Ok(())
    }

    pub fn add(&mut self, day: NaiveDate, entry: FoodEntry) {
        self.days.entry(day).or_default().push(entry);
    }

    pub fn entries_on(&self, day: NaiveDate) -> &[FoodEntry] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    /// Removes the entry with the given id; drops the day once it is empty.
    pub fn remove(&mut self, day: NaiveDate, id: uuid::Uuid) -> bool {
        let Some(entries) = self.days.get_mut(&day) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.days.remove(&day);
        }
        removed
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn calories_on(&self, day: NaiveDate) -> u32 {
        self.entries_on(day).iter().map(|entry| entry.calories).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn missing_file_opens_as_an_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = FoodLog::open(dir.path().join("log.json")).unwrap();
        assert_eq!(log.days().count(), 0);
    }

    #[test]
    fn entries_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");

        let mut log = FoodLog::open(&path).unwrap();
        log.add(day("2026-08-06"), FoodEntry::new("oatmeal", 320));
        log.add(day("2026-08-06"), FoodEntry::new("banana", 90));
        log.add(day("2026-08-07"), FoodEntry::new("salad", 250));
        log.save().unwrap();

        let reopened = FoodLog::open(&path).unwrap();
        assert_eq!(reopened.entries_on(day("2026-08-06")).len(), 2);
        assert_eq!(reopened.calories_on(day("2026-08-06")), 410);
        assert_eq!(reopened.days().count(), 2);
    }

    #[test]
    fn removing_the_last_entry_drops_the_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = FoodLog::open(dir.path().join("log.json")).unwrap();
        let entry = FoodEntry::new("toast", 150);
        let id = entry.id;
        log.add(day("2026-08-06"), entry);

        assert!(log.remove(day("2026-08-06"), id));
        assert_eq!(log.days().count(), 0);
        assert!(!log.remove(day("2026-08-06"), id));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FoodLog::open(&path),
            Err(FoodLogError::Corrupt(_))
        ));
    }
}

//! Habit record model.
//!
//! A [`Habit`] is created from a validated [`HabitDraft`] and afterwards only
//! changes through its progress ledger (see [`crate::ledger`]). Schedule
//! fields (`frequency`, `weekdays`, `custom_dates`) are fixed at creation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Identifier of a habit (UUID v4 string).
pub type HabitId = String;

/// Scheduling rule of a habit.
///
/// Serialized as a lowercase tag. Tags this version does not know are kept
/// verbatim in [`Frequency::Other`] so they survive a load/save cycle; such
/// habits are never due.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    /// Due every day.
    #[default]
    Daily,
    /// Due on the selected weekdays.
    Weekly,
    /// Due on an explicit list of dates.
    Custom,
    /// Due every day; carries a reminder time.
    Timed,
    /// Due every day; carries a target count.
    Goal,
    /// Unrecognized tag read from storage.
    Other(String),
}

impl Frequency {
    /// The five frequencies a habit can be created with.
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Custom,
        Frequency::Timed,
        Frequency::Goal,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
            Frequency::Timed => "timed",
            Frequency::Goal => "goal",
            Frequency::Other(tag) => tag.as_str(),
        }
    }

    /// Whether this is one of the known frequencies.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Other(_))
    }
}

impl From<String> for Frequency {
    fn from(tag: String) -> Self {
        tag.parse().unwrap_or(Frequency::Other(tag))
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            "timed" => Ok(Frequency::Timed),
            "goal" => Ok(Frequency::Goal),
            _ => Err(ValidationError::UnknownFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User input for a new habit, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    #[serde(default, alias = "description")]
    pub motivation: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, alias = "days")]
    pub weekdays: BTreeSet<u8>,
    #[serde(default, deserialize_with = "deserialize_day_set")]
    pub custom_dates: BTreeSet<NaiveDate>,
    #[serde(default, with = "hhmm")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default, alias = "goalStreak")]
    pub goal_target: Option<u32>,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            ..Self::default()
        }
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = u8>) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_custom_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.custom_dates = dates.into_iter().collect();
        self
    }

    pub fn with_motivation(mut self, motivation: impl Into<String>) -> Self {
        self.motivation = Some(motivation.into());
        self
    }

    pub fn with_scheduled_time(mut self, time: NaiveTime) -> Self {
        self.scheduled_time = Some(time);
        self
    }

    pub fn with_goal_target(mut self, target: u32) -> Self {
        self.goal_target = Some(target);
        self
    }

    /// Check the draft against the creation rules.
    ///
    /// # Errors
    /// Returns the first rule the draft violates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(&bad) = self.weekdays.iter().find(|&&d| d > 6) {
            return Err(ValidationError::WeekdayOutOfRange(bad));
        }
        match &self.frequency {
            Frequency::Weekly if self.weekdays.is_empty() => {
                return Err(ValidationError::NoWeekdays);
            }
            Frequency::Custom if self.custom_dates.is_empty() => {
                return Err(ValidationError::NoCustomDates);
            }
            Frequency::Other(tag) => {
                return Err(ValidationError::UnknownFrequency(tag.clone()));
            }
            _ => {}
        }
        if self.goal_target == Some(0) {
            return Err(ValidationError::ZeroGoalTarget);
        }
        Ok(())
    }
}

/// A tracked habit and its completion ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default, alias = "description", skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    pub frequency: Frequency,
    /// Weekday indices, 0=Sunday .. 6=Saturday.
    #[serde(default, alias = "days")]
    pub weekdays: BTreeSet<u8>,
    #[serde(default, deserialize_with = "deserialize_day_set")]
    pub custom_dates: BTreeSet<NaiveDate>,
    #[serde(default, with = "hhmm", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(default, alias = "goalStreak", skip_serializing_if = "Option::is_none")]
    pub goal_target: Option<u32>,
    #[serde(deserialize_with = "deserialize_day")]
    pub created_at: NaiveDate,
    /// Completion per date. A missing key and `false` both mean "not completed".
    #[serde(default)]
    pub progress: BTreeMap<NaiveDate, bool>,
}

impl Habit {
    /// Build a habit from a draft with a fresh id.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the draft breaks a creation rule.
    pub fn new(draft: HabitDraft, created_at: NaiveDate) -> Result<Self, ValidationError> {
        Self::create(draft, Uuid::new_v4().to_string(), created_at)
    }

    /// Build a habit from a draft with a caller-chosen id.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the draft breaks a creation rule.
    pub fn create(
        draft: HabitDraft,
        id: impl Into<HabitId>,
        created_at: NaiveDate,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;

        let motivation = draft
            .motivation
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(Self {
            id: id.into(),
            name: draft.name.trim().to_string(),
            motivation,
            frequency: draft.frequency,
            weekdays: draft.weekdays,
            custom_dates: draft.custom_dates,
            scheduled_time: draft.scheduled_time.map(truncate_to_minute),
            goal_target: draft.goal_target,
            created_at,
            progress: BTreeMap::new(),
        })
    }
}

/// Parse a calendar day from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse a time of day from `HH:MM` (seconds are accepted and dropped).
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
        .map(truncate_to_minute)
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

fn deserialize_day<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

fn deserialize_day_set<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeSet<NaiveDate>, D::Error> {
    Vec::<String>::deserialize(deserializer)?
        .iter()
        .map(|raw| parse_day(raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))))
        .collect()
}

/// `Option<NaiveTime>` as `"HH:MM"`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_some(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {s}"))),
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on task text, matching the input field of the web client.
pub const MAX_TASK_LEN: usize = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Complete,
    Giveup,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryItem {
    /// Epoch millis of session start; doubles as the unique record id.
    pub id: i64,
    pub task: String,
    pub status: SessionStatus,
    pub duration_ms: i64,
    pub ended_at: DateTime<Utc>,
    /// Local calendar day the session finished on. Stored once at record
    /// time; streak and limit logic compare against this, never recompute.
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyLimit {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    #[serde(rename = "uno-3")]
    Uno3,
    #[serde(rename = "uno-7")]
    Uno7,
    #[serde(rename = "uno-30")]
    Uno30,
    #[serde(rename = "uno-365")]
    Uno365,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Badge::Uno3 => "uno-3",
            Badge::Uno7 => "uno-7",
            Badge::Uno30 => "uno-30",
            Badge::Uno365 => "uno-365",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Achievement {
    pub badge: Badge,
    pub unlocked_at: NaiveDate,
    /// Streak value at the moment the badge was unlocked.
    pub streak: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Distraction {
    pub id: i64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Complete).unwrap(),
            "\"complete\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Giveup).unwrap(),
            "\"giveup\""
        );
    }

    #[test]
    fn test_badge_wire_names() {
        assert_eq!(serde_json::to_string(&Badge::Uno3).unwrap(), "\"uno-3\"");
        assert_eq!(
            serde_json::to_string(&Badge::Uno365).unwrap(),
            "\"uno-365\""
        );
        let badge: Badge = serde_json::from_str("\"uno-30\"").unwrap();
        assert_eq!(badge, Badge::Uno30);
        assert_eq!(badge.to_string(), "uno-30");
    }
}

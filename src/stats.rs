use crate::models::{HistoryItem, SessionStatus};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct DayStats {
    pub completed: u32,
    pub given_up: u32,
    pub total_focus: Duration,
}

impl Default for DayStats {
    fn default() -> Self {
        Self {
            completed: 0,
            given_up: 0,
            total_focus: Duration::zero(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SummaryStats {
    pub total_focus: Duration,
    pub completed: u32,
    pub given_up: u32,
    pub max_focus: Option<Duration>,
    pub min_focus: Option<Duration>,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            total_focus: Duration::zero(),
            completed: 0,
            given_up: 0,
            max_focus: None,
            min_focus: None,
        }
    }
}

pub struct Stats {
    pub daily_stats: BTreeMap<NaiveDate, DayStats>,
    pub today_summary: SummaryStats,
    pub week_summary: SummaryStats,
    pub today: NaiveDate,
    pub week_start: NaiveDate,
}

/// Focus time counts completed sessions; abandoned ones only bump their
/// counter.
pub fn calculate_summary(items: &[HistoryItem]) -> SummaryStats {
    let mut summary = SummaryStats::default();

    for item in items {
        let duration = Duration::milliseconds(item.duration_ms);
        if duration < Duration::zero() {
            continue;
        }

        match item.status {
            SessionStatus::Complete => {
                summary.total_focus += duration;
                summary.completed += 1;
                summary.max_focus = Some(summary.max_focus.map_or(duration, |m| m.max(duration)));
                summary.min_focus = Some(summary.min_focus.map_or(duration, |m| m.min(duration)));
            }
            SessionStatus::Giveup => {
                summary.given_up += 1;
            }
        }
    }

    summary
}

/// Buckets history by each item's stored `date` so stats agree with the
/// streak and limit logic on day boundaries.
pub fn calculate_stats(history: &[HistoryItem], today: NaiveDate) -> Stats {
    // Start of the current week (Monday).
    let days_from_monday = today.weekday().num_days_from_monday();
    let week_start = today - Duration::days(days_from_monday as i64);
    let week_end = week_start + Duration::days(6);

    let mut daily_stats: BTreeMap<NaiveDate, DayStats> = BTreeMap::new();
    let mut today_items = Vec::new();
    let mut week_items = Vec::new();

    for item in history {
        let duration = Duration::milliseconds(item.duration_ms);

        let stats = daily_stats.entry(item.date).or_default();
        match item.status {
            SessionStatus::Complete => {
                stats.completed += 1;
                if duration > Duration::zero() {
                    stats.total_focus += duration;
                }
            }
            SessionStatus::Giveup => {
                stats.given_up += 1;
            }
        }

        if item.date == today {
            today_items.push(item.clone());
        }

        if item.date >= week_start && item.date <= week_end {
            week_items.push(item.clone());
        }
    }

    Stats {
        daily_stats,
        today_summary: calculate_summary(&today_items),
        week_summary: calculate_summary(&week_items),
        today,
        week_start,
    }
}

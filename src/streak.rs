use crate::models::{HistoryItem, SessionStatus};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Count of consecutive calendar days with at least one completed session,
/// walking backward from `today`.
///
/// An unfinished `today` is skipped rather than breaking the run: the streak
/// should not read as broken before the user has had a chance to act. Any
/// other absent day stops the walk.
pub fn calculate_streak(history: &[HistoryItem], today: NaiveDate) -> u32 {
    if history.is_empty() {
        return 0;
    }

    // Several completions on the same day collapse into one membership.
    let completed: HashSet<NaiveDate> = history
        .iter()
        .filter(|h| h.status == SessionStatus::Complete)
        .map(|h| h.date)
        .collect();

    if completed.is_empty() {
        return 0;
    }

    let mut day = today;
    if !completed.contains(&day) {
        match day.pred_opt() {
            Some(d) => day = d,
            None => return 0,
        }
    }

    let mut streak = 0;
    while completed.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(d) => day = d,
            None => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
    }

    fn item_on(date: NaiveDate, status: SessionStatus) -> HistoryItem {
        let ended_at = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        HistoryItem {
            id: ended_at.timestamp_millis(),
            task: "write".to_string(),
            status,
            duration_ms: 1_500_000,
            ended_at,
            date,
        }
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(calculate_streak(&[], day(10)), 0);
    }

    #[test]
    fn test_no_completed_entries_is_zero() {
        let history = vec![
            item_on(day(9), SessionStatus::Giveup),
            item_on(day(10), SessionStatus::Giveup),
        ];
        assert_eq!(calculate_streak(&history, day(10)), 0);
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        let history = vec![
            item_on(day(8), SessionStatus::Complete),
            item_on(day(9), SessionStatus::Complete),
            item_on(day(10), SessionStatus::Complete),
        ];
        assert_eq!(calculate_streak(&history, day(10)), 3);
    }

    #[test]
    fn test_incomplete_today_is_tolerated() {
        // Mon and Tue complete, asked on Wed: streak holds at 2.
        let history = vec![
            item_on(day(5), SessionStatus::Complete),
            item_on(day(6), SessionStatus::Complete),
        ];
        assert_eq!(calculate_streak(&history, day(7)), 2);
    }

    #[test]
    fn test_gap_before_today_breaks_streak() {
        // Completed two days ago and earlier, but missed yesterday.
        let history = vec![
            item_on(day(7), SessionStatus::Complete),
            item_on(day(8), SessionStatus::Complete),
            item_on(day(10), SessionStatus::Complete),
        ];
        assert_eq!(calculate_streak(&history, day(10)), 1);
    }

    #[test]
    fn test_gap_breaks_even_with_earlier_run() {
        let history = vec![
            item_on(day(4), SessionStatus::Complete),
            item_on(day(5), SessionStatus::Complete),
            item_on(day(6), SessionStatus::Complete),
        ];
        // Missed day 7 through 9; nothing today either.
        assert_eq!(calculate_streak(&history, day(10)), 0);
    }

    #[test]
    fn test_multiple_completions_same_day_count_once() {
        let history = vec![
            item_on(day(10), SessionStatus::Complete),
            item_on(day(10), SessionStatus::Complete),
            item_on(day(10), SessionStatus::Giveup),
        ];
        assert_eq!(calculate_streak(&history, day(10)), 1);
    }

    #[test]
    fn test_giveup_day_does_not_extend_streak() {
        let history = vec![
            item_on(day(9), SessionStatus::Giveup),
            item_on(day(10), SessionStatus::Complete),
        ];
        assert_eq!(calculate_streak(&history, day(10)), 1);
    }
}

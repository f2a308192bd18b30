use crate::models::{Achievement, Badge};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Streak thresholds in ascending day order.
pub const MILESTONES: [(u32, Badge); 4] = [
    (3, Badge::Uno3),
    (7, Badge::Uno7),
    (30, Badge::Uno30),
    (365, Badge::Uno365),
];

/// Badges reached by `streak` that are not in `existing` yet. A badge is
/// granted at most once; a long streak can unlock several in one call.
pub fn newly_unlocked(existing: &[Achievement], streak: u32, today: NaiveDate) -> Vec<Achievement> {
    let unlocked: HashSet<Badge> = existing.iter().map(|a| a.badge).collect();

    let mut new = Vec::new();
    for (days, badge) in MILESTONES {
        if streak >= days && !unlocked.contains(&badge) {
            new.push(Achievement {
                badge,
                unlocked_at: today,
                streak,
            });
        }
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 10).unwrap()
    }

    #[test]
    fn test_below_first_milestone_grants_nothing() {
        assert!(newly_unlocked(&[], 2, today()).is_empty());
    }

    #[test]
    fn test_first_milestone_grants_once() {
        let first = newly_unlocked(&[], 3, today());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].badge, Badge::Uno3);
        assert_eq!(first[0].streak, 3);
        assert_eq!(first[0].unlocked_at, today());

        // Same streak again: already unlocked, nothing new.
        let second = newly_unlocked(&first, 3, today());
        assert!(second.is_empty());
    }

    #[test]
    fn test_streak_ten_unlocks_two_badges_in_one_call() {
        let new = newly_unlocked(&[], 10, today());
        let badges: Vec<Badge> = new.iter().map(|a| a.badge).collect();
        assert_eq!(badges, vec![Badge::Uno3, Badge::Uno7]);
    }

    #[test]
    fn test_existing_badges_are_never_regranted() {
        let existing = vec![Achievement {
            badge: Badge::Uno3,
            unlocked_at: NaiveDate::from_ymd_opt(2023, 6, 3).unwrap(),
            streak: 3,
        }];
        let new = newly_unlocked(&existing, 8, today());
        let badges: Vec<Badge> = new.iter().map(|a| a.badge).collect();
        assert_eq!(badges, vec![Badge::Uno7]);
    }

    #[test]
    fn test_all_milestones_at_a_year() {
        let new = newly_unlocked(&[], 365, today());
        assert_eq!(new.len(), 4);
        assert_eq!(new[3].badge, Badge::Uno365);
    }
}

use crate::models::DailyLimit;
use chrono::NaiveDate;

/// A record carrying a different date is stale and counts as zero. It is
/// reset logically here and physically on the next `bump`.
pub fn effective_count(record: Option<&DailyLimit>, today: NaiveDate) -> u32 {
    match record {
        Some(r) if r.date == today => r.count,
        _ => 0,
    }
}

pub fn bump(record: Option<&DailyLimit>, today: NaiveDate) -> DailyLimit {
    DailyLimit {
        date: today,
        count: effective_count(record, today) + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, d).unwrap()
    }

    #[test]
    fn test_no_record_counts_zero() {
        assert_eq!(effective_count(None, day(10)), 0);
    }

    #[test]
    fn test_same_day_record_counts() {
        let record = DailyLimit {
            date: day(10),
            count: 2,
        };
        assert_eq!(effective_count(Some(&record), day(10)), 2);
    }

    #[test]
    fn test_stale_record_counts_zero() {
        let record = DailyLimit {
            date: day(9),
            count: 5,
        };
        assert_eq!(effective_count(Some(&record), day(10)), 0);
    }

    #[test]
    fn test_bump_resets_stale_record_to_one() {
        let record = DailyLimit {
            date: day(9),
            count: 5,
        };
        let bumped = bump(Some(&record), day(10));
        assert_eq!(bumped.date, day(10));
        assert_eq!(bumped.count, 1);
    }

    #[test]
    fn test_bump_increments_same_day() {
        let record = DailyLimit {
            date: day(10),
            count: 1,
        };
        let bumped = bump(Some(&record), day(10));
        assert_eq!(bumped.count, 2);
    }
}

use crate::clock::Clock;
use crate::stats::calculate_stats;
use crate::store::KvStore;
use crate::tracker::Tracker;
use crate::utils::format_duration;
use anyhow::Result;

pub struct Reporter<S: KvStore, C: Clock> {
    tracker: Tracker<S, C>,
}

impl<S: KvStore, C: Clock> Reporter<S, C> {
    pub fn new(tracker: Tracker<S, C>) -> Self {
        Self { tracker }
    }

    pub fn report(&self) -> Result<()> {
        let history = self.tracker.history()?;
        if history.is_empty() {
            println!("No sessions recorded yet.");
            return Ok(());
        }

        let streak = self.tracker.current_streak()?;
        let badges = self.tracker.achievements()?;
        let stats_data = calculate_stats(&history, self.tracker.today());

        println!("Uno Report");
        println!("==========");

        let mut week_completed = 0;
        let mut week_given_up = 0;

        for (date, stats) in &stats_data.daily_stats {
            if *date < stats_data.week_start {
                continue;
            }

            let is_today = *date == stats_data.today;
            let date_str = if is_today {
                format!("{} (Today)", date)
            } else {
                date.to_string()
            };

            println!("\nDate: {}", date_str);
            println!("  Completed:  {}", stats.completed);
            println!("  Given up:   {}", stats.given_up);
            println!(
                "  Focus Time: {}",
                format_duration(stats.total_focus.num_seconds())
            );

            week_completed += stats.completed;
            week_given_up += stats.given_up;
        }

        println!(
            "\nWeekly Summary (Starting Monday {})",
            stats_data.week_start
        );
        println!("-------------------------------------------");
        println!("Completed Sessions: {}", week_completed);
        println!("Given up Sessions:  {}", week_given_up);
        println!(
            "Total Focus Time:   {}",
            format_duration(stats_data.week_summary.total_focus.num_seconds())
        );
        if stats_data.week_summary.completed > 0 {
            let avg = stats_data.week_summary.total_focus
                / (stats_data.week_summary.completed as i32);
            println!("Avg Focus Session:  {}", format_duration(avg.num_seconds()));
        }

        let day_word = if streak == 1 { "day" } else { "days" };
        println!("\nCurrent Streak: {} {}", streak, day_word);

        if badges.is_empty() {
            println!("Badges: none yet");
        } else {
            println!("Badges:");
            for earned in &badges {
                println!(
                    "  {:8} unlocked {} (streak {})",
                    earned.badge.to_string(),
                    earned.unlocked_at,
                    earned.streak
                );
            }
        }

        Ok(())
    }
}

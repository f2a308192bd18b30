use crate::achievements;
use crate::clock::{Clock, SystemClock};
use crate::limit;
use crate::models::{Achievement, DailyLimit, Distraction, HistoryItem, SessionStatus};
use crate::store::{self, FileStore, KvStore};
use crate::streak::calculate_streak;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

pub const HISTORY_KEY: &str = "history";
pub const DAILY_LIMIT_KEY: &str = "daily_limit";
pub const ACHIEVEMENTS_KEY: &str = "achievements";
pub const DISTRACTIONS_KEY: &str = "distractions";

pub struct SessionOutcome {
    pub item: HistoryItem,
    pub today_count: u32,
    pub streak: u32,
    pub new_badges: Vec<Achievement>,
}

pub struct Tracker<S: KvStore, C: Clock> {
    pub store: S,
    clock: C,
}

impl Tracker<FileStore, SystemClock> {
    pub fn open() -> Result<Self> {
        Ok(Self::with_parts(FileStore::open_default()?, SystemClock))
    }
}

impl<S: KvStore, C: Clock> Tracker<S, C> {
    pub fn with_parts(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn history(&self) -> Result<Vec<HistoryItem>> {
        store::get_vec(&self.store, HISTORY_KEY)
    }

    /// Append a finished session to the history. Whole-collection
    /// read-modify-write; records are never edited or removed afterwards.
    pub fn record_session(
        &mut self,
        task: &str,
        status: SessionStatus,
        started_at: DateTime<Utc>,
    ) -> Result<HistoryItem> {
        let ended_at = self.clock.now();
        let item = HistoryItem {
            id: started_at.timestamp_millis(),
            task: task.to_string(),
            status,
            duration_ms: (ended_at - started_at).num_milliseconds(),
            ended_at,
            date: self.clock.today(),
        };

        let mut history = self.history()?;
        history.push(item.clone());
        store::set_json(&mut self.store, HISTORY_KEY, &history)?;

        Ok(item)
    }

    pub fn today_count(&self) -> Result<u32> {
        let record: Option<DailyLimit> = store::get_json(&self.store, DAILY_LIMIT_KEY)?;
        Ok(limit::effective_count(record.as_ref(), self.clock.today()))
    }

    pub fn increment_today_count(&mut self) -> Result<u32> {
        let record: Option<DailyLimit> = store::get_json(&self.store, DAILY_LIMIT_KEY)?;
        let bumped = limit::bump(record.as_ref(), self.clock.today());
        store::set_json(&mut self.store, DAILY_LIMIT_KEY, &bumped)?;
        Ok(bumped.count)
    }

    pub fn current_streak(&self) -> Result<u32> {
        Ok(calculate_streak(&self.history()?, self.clock.today()))
    }

    pub fn achievements(&self) -> Result<Vec<Achievement>> {
        store::get_vec(&self.store, ACHIEVEMENTS_KEY)
    }

    /// Persist and return the badges newly reached by `streak`. Writes only
    /// when something was actually unlocked.
    pub fn grant_achievements(&mut self, streak: u32) -> Result<Vec<Achievement>> {
        let mut existing = self.achievements()?;
        let new = achievements::newly_unlocked(&existing, streak, self.clock.today());
        if !new.is_empty() {
            existing.extend(new.iter().cloned());
            store::set_json(&mut self.store, ACHIEVEMENTS_KEY, &existing)?;
        }
        Ok(new)
    }

    pub fn distractions(&self) -> Result<Vec<Distraction>> {
        store::get_vec(&self.store, DISTRACTIONS_KEY)
    }

    pub fn add_distraction(&mut self, text: &str) -> Result<Distraction> {
        let distraction = Distraction {
            id: self.clock.now().timestamp_millis(),
            text: text.to_string(),
        };
        let mut distractions = self.distractions()?;
        distractions.push(distraction.clone());
        store::set_json(&mut self.store, DISTRACTIONS_KEY, &distractions)?;
        Ok(distraction)
    }

    pub fn remove_distraction(&mut self, id: i64) -> Result<bool> {
        let mut distractions = self.distractions()?;
        let before = distractions.len();
        distractions.retain(|d| d.id != id);
        let removed = distractions.len() != before;
        if removed {
            store::set_json(&mut self.store, DISTRACTIONS_KEY, &distractions)?;
        }
        Ok(removed)
    }

    fn drop_distraction_matching(&mut self, task: &str) -> Result<()> {
        let mut distractions = self.distractions()?;
        let before = distractions.len();
        distractions.retain(|d| d.text != task);
        if distractions.len() != before {
            store::set_json(&mut self.store, DISTRACTIONS_KEY, &distractions)?;
        }
        Ok(())
    }

    /// Everything that happens when a session ends: record it, consume a
    /// daily slot, drop a matching deferred task, and on completion refresh
    /// the streak and grant any badges it has reached.
    pub fn finish_session(
        &mut self,
        task: &str,
        status: SessionStatus,
        started_at: DateTime<Utc>,
    ) -> Result<SessionOutcome> {
        let item = self.record_session(task, status, started_at)?;
        let today_count = self.increment_today_count()?;
        self.drop_distraction_matching(task)?;

        let streak = self.current_streak()?;
        let new_badges = if status == SessionStatus::Complete {
            self.grant_achievements(streak)?
        } else {
            Vec::new()
        };

        Ok(SessionOutcome {
            item,
            today_count,
            streak,
            new_badges,
        })
    }
}

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Time source for everything that needs "now" or "today".
///
/// `today` is the local calendar day. History, the daily limit and the
/// streak walk all go through the same implementation, so they can never
/// disagree on where a day boundary falls.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Frozen clock for tests.
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

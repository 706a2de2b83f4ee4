use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::domain::YearMonth;

/// Clock abstracts access to the current timestamp so reports stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Month the reports are anchored to; lookback windows end here.
    fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.today())
    }
}

/// Real-time clock backed by the system UTC time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Pins the clock to the last day of `month`, falling back to its first day.
    pub fn at_month_end(month: YearMonth) -> Option<Self> {
        month.last_day().or_else(|| month.first_day()).map(Self::on)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(NaiveTime::MIN))
    }

    fn today(&self) -> NaiveDate {
        self.date
    }
}

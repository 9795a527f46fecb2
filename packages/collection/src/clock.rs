//! Time sources for parsers that default date fields.

use std::fmt::Debug;

use chrono::{DateTime, Local};

use fsstore_core::{Fields, Result, Value};

/// Supplies the current local time.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system's wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stopped at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

const DATE_FIELDS: [(&str, &str); 3] = [("year", "%Y"), ("month", "%m"), ("day", "%d")];

/// Wraps `inner` so that `year`, `month` and `day` default to the clock's
/// current date (zero-padded strings) when absent or null.
pub fn date_defaults<C, F>(clock: C, inner: F) -> impl Fn(Fields) -> Result<Fields> + Send + Sync
where
    C: Clock + 'static,
    F: Fn(Fields) -> Result<Fields> + Send + Sync + 'static,
{
    move |mut fields: Fields| {
        let now = clock.now();
        for (field, format) in DATE_FIELDS {
            if fields.get(field).is_none_or(Value::is_null) {
                fields.insert(field.to_string(), Value::String(now.format(format).to_string()));
            }
        }
        inner(fields)
    }
}

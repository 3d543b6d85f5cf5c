use chrono::{DateTime, Utc};

use crate::domain::ports::Clock;

/// Wall clock of the server process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

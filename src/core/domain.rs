use std::sync::RwLock;
use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Configuration abstracts config options for the circulation core
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub loan_days: i64,
    pub max_page_size: usize,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            loan_days: 30,
            max_page_size: 500,
        }
    }
}

// Clock abstracts the current time so that loan windows and hold ordering
// are deterministic under test. Every lifecycle operation reads its "now"
// through this capability.
pub trait Clock: Sync + Send {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

// FixedClock only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: RwLock::new(now) }
    }

    pub fn advance(&self, duration: Duration) {
        if let Ok(mut now) = self.now.write() {
            *now = *now + duration;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.read() {
            Ok(now) => { *now }
            Err(poisoned) => { *poisoned.into_inner() }
        }
    }
}

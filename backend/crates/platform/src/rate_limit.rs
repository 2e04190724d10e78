//! Failed-Login Windowing
//!
//! Storage-agnostic arithmetic behind account lockout. Stores persist an
//! [`AttemptRecord`] per key and call into it; the rules live here once.

use chrono::{DateTime, Duration, Utc};

/// Lockout policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Failures within `window` that trigger a lockout
    pub max_failures: u32,
    /// Counting window, measured from the first failure
    pub window: Duration,
    /// How long a lockout lasts
    pub lockout: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: Duration::minutes(15),
            lockout: Duration::minutes(15),
        }
    }
}

impl LockoutPolicy {
    pub fn new(max_failures: u32, window: Duration, lockout: Duration) -> Self {
        Self {
            max_failures,
            window,
            lockout,
        }
    }

    /// Lockout duration rounded up to whole minutes, for user-facing text
    pub fn lockout_minutes(&self) -> i64 {
        let secs = self.lockout.num_seconds().max(0);
        (secs + 59) / 60
    }
}

/// Failure bookkeeping for one key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub failed_count: u32,
    pub window_started_at: DateTime<Utc>,
    pub locked_until: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Record for a first failure at `now`
    pub fn first_failure(policy: &LockoutPolicy, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            failed_count: 0,
            window_started_at: now,
            locked_until: None,
        };
        record.register_failure(policy, now);
        record
    }

    /// Whether the key is locked at `now`
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Count one more failure
    ///
    /// A failure after the window has elapsed restarts the count at 1.
    /// Reaching `max_failures` locks the key until `now + lockout`.
    pub fn register_failure(&mut self, policy: &LockoutPolicy, now: DateTime<Utc>) {
        if now - self.window_started_at >= policy.window {
            self.failed_count = 0;
            self.window_started_at = now;
            self.locked_until = None;
        }

        self.failed_count = self.failed_count.saturating_add(1);

        if self.failed_count >= policy.max_failures {
            self.locked_until = Some(now + policy.lockout);
        }
    }

    /// Whether the record carries no information at `now` and can be dropped
    pub fn is_stale(&self, policy: &LockoutPolicy, now: DateTime<Utc>) -> bool {
        !self.is_locked(now) && now - self.window_started_at >= policy.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LockoutPolicy {
        LockoutPolicy::default()
    }

    #[test]
    fn test_default_policy() {
        let policy = policy();
        assert_eq!(policy.max_failures, 5);
        assert_eq!(policy.window, Duration::minutes(15));
        assert_eq!(policy.lockout_minutes(), 15);
    }

    #[test]
    fn test_lockout_minutes_rounds_up() {
        let policy = LockoutPolicy::new(3, Duration::minutes(1), Duration::seconds(61));
        assert_eq!(policy.lockout_minutes(), 2);
    }

    #[test]
    fn test_locks_at_threshold() {
        let policy = policy();
        let now = Utc::now();
        let mut record = AttemptRecord::first_failure(&policy, now);

        for _ in 1..policy.max_failures - 1 {
            record.register_failure(&policy, now);
        }
        assert_eq!(record.failed_count, 4);
        assert!(!record.is_locked(now));

        record.register_failure(&policy, now);
        assert!(record.is_locked(now));
        assert!(record.is_locked(now + Duration::minutes(14)));
        assert!(!record.is_locked(now + Duration::minutes(15)));
    }

    #[test]
    fn test_window_elapsed_restarts_count() {
        let policy = policy();
        let start = Utc::now();
        let mut record = AttemptRecord::first_failure(&policy, start);
        record.register_failure(&policy, start);
        assert_eq!(record.failed_count, 2);

        let later = start + Duration::minutes(16);
        record.register_failure(&policy, later);
        assert_eq!(record.failed_count, 1);
        assert_eq!(record.window_started_at, later);
    }

    #[test]
    fn test_single_failure_policy_locks_immediately() {
        let policy = LockoutPolicy::new(1, Duration::minutes(5), Duration::minutes(5));
        let now = Utc::now();
        let record = AttemptRecord::first_failure(&policy, now);
        assert!(record.is_locked(now));
    }

    #[test]
    fn test_is_stale() {
        let policy = policy();
        let now = Utc::now();
        let record = AttemptRecord::first_failure(&policy, now);

        assert!(!record.is_stale(&policy, now));
        assert!(record.is_stale(&policy, now + Duration::minutes(15)));
    }
}

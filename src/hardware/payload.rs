//! Payload compartment lock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayloadStatus {
    pub locked: bool,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Default for PayloadStatus {
    fn default() -> Self {
        Self {
            locked: true,
            opened_at: None,
            closed_at: None,
        }
    }
}

/// Two-state lock. Locking keeps `opened_at` so the last open stays auditable.
#[derive(Clone, Debug, Default)]
pub struct PayloadLock {
    status: PayloadStatus,
}

impl PayloadLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock(&mut self) -> PayloadStatus {
        self.status.locked = false;
        self.status.opened_at = Some(Utc::now());
        self.status.closed_at = None;
        self.status()
    }

    pub fn lock(&mut self) -> PayloadStatus {
        self.status.locked = true;
        self.status.closed_at = Some(Utc::now());
        self.status()
    }

    pub fn reset(&mut self) {
        self.status = PayloadStatus::default();
    }

    pub fn is_locked(&self) -> bool {
        self.status.locked
    }

    pub fn status(&self) -> PayloadStatus {
        self.status.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_locked_without_timestamps() {
        let lock = PayloadLock::new();
        assert_eq!(lock.status(), PayloadStatus::default());
        assert!(lock.is_locked());
    }

    #[test]
    fn unlock_clears_closed_at() {
        let mut lock = PayloadLock::new();
        lock.unlock();
        lock.lock();
        let status = lock.unlock();

        assert!(!status.locked);
        assert!(status.opened_at.is_some());
        assert!(status.closed_at.is_none());
    }

    #[test]
    fn lock_preserves_opened_at() {
        let mut lock = PayloadLock::new();
        let opened = lock.unlock().opened_at;
        let status = lock.lock();

        assert!(status.locked);
        assert_eq!(status.opened_at, opened);
        assert!(status.closed_at.is_some());
    }

    #[test]
    fn reset_restores_default() {
        let mut lock = PayloadLock::new();
        lock.unlock();
        lock.reset();
        assert_eq!(lock.status(), PayloadStatus::default());
    }
}

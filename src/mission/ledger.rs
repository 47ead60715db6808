//! Mission records: the active slot and the bounded archive.

use crate::error::InvariantViolation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use uuid::Uuid;

/// Default number of archived missions kept.
pub const MISSION_HISTORY_CAPACITY: usize = 50;

/// Seconds the rover waits at the door before heading home.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionStatus {
    Navigating,
    Arrived,
    Waiting,
    Delivered,
    Returned,
    Completed,
    Cancelled,
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Navigating => "NAVIGATING",
            Self::Arrived => "ARRIVED",
            Self::Waiting => "WAITING",
            Self::Delivered => "DELIVERED",
            Self::Returned => "RETURNED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// One delivery attempt, from dispatch to archival.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    pub room: String,
    pub status: MissionStatus,
    /// Percent of the outbound trip covered, `0..=100`.
    pub progress: u8,
    pub start_time: DateTime<Utc>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub wait_start_time: Option<DateTime<Utc>>,
    pub opened_time: Option<DateTime<Utc>>,
    pub return_time: Option<DateTime<Utc>>,
    pub completed_time: Option<DateTime<Utc>>,
    pub timeout_seconds: u64,
}

impl Mission {
    pub fn new(room: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            room: room.into(),
            status: MissionStatus::Navigating,
            progress: 0,
            start_time: Utc::now(),
            arrival_time: None,
            wait_start_time: None,
            opened_time: None,
            return_time: None,
            completed_time: None,
            timeout_seconds,
        }
    }

    /// Set the status and stamp the timestamp that goes with it.
    fn mark(&mut self, status: MissionStatus) {
        let now = Utc::now();
        self.status = status;
        match status {
            MissionStatus::Navigating => {}
            MissionStatus::Arrived => {
                self.arrival_time = Some(now);
                self.progress = 100;
            }
            MissionStatus::Waiting => self.wait_start_time = Some(now),
            MissionStatus::Delivered => self.opened_time = Some(now),
            MissionStatus::Returned => self.return_time = Some(now),
            MissionStatus::Completed | MissionStatus::Cancelled => {
                self.completed_time = Some(now)
            }
        }
    }
}

/// Owns at most one active mission and archives finished ones newest-first.
#[derive(Clone, Debug)]
pub struct MissionLedger {
    active: Option<Mission>,
    history: VecDeque<Mission>,
    capacity: usize,
}

impl Default for MissionLedger {
    fn default() -> Self {
        Self::new(MISSION_HISTORY_CAPACITY)
    }
}

impl MissionLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            active: None,
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Open a new mission in the active slot.
    ///
    /// Callers are expected to have checked the slot already; an occupied
    /// slot here is an internal invariant breach, not a user error.
    pub fn create_mission(
        &mut self,
        room: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<&Mission, InvariantViolation> {
        if let Some(existing) = &self.active {
            return Err(InvariantViolation::MissionAlreadyActive {
                mission_id: existing.id,
            });
        }
        Ok(self.active.insert(Mission::new(room, timeout_seconds)))
    }

    /// Update the active mission's status. No-op when the slot is empty.
    pub fn update_status(&mut self, status: MissionStatus) -> Option<&Mission> {
        let mission = self.active.as_mut()?;
        mission.mark(status);
        Some(mission)
    }

    /// Add `step` percent to the active mission, saturating at 100.
    pub fn advance_progress(&mut self, step: u8) -> Option<u8> {
        let mission = self.active.as_mut()?;
        mission.progress = mission.progress.saturating_add(step).min(100);
        Some(mission.progress)
    }

    /// Archive the active mission with whatever status it already carries.
    pub fn complete_mission(&mut self) -> Option<Mission> {
        let mut mission = self.active.take()?;
        mission.completed_time = Some(Utc::now());
        self.archive(mission.clone());
        Some(mission)
    }

    /// Archive the active mission as `CANCELLED`.
    pub fn cancel_mission(&mut self) -> Option<Mission> {
        let mut mission = self.active.take()?;
        mission.mark(MissionStatus::Cancelled);
        self.archive(mission.clone());
        Some(mission)
    }

    /// Drop the active mission without archiving it.
    pub fn discard_active(&mut self) -> Option<Mission> {
        self.active.take()
    }

    fn archive(&mut self, mission: Mission) {
        self.history.push_front(mission);
        self.history.truncate(self.capacity);
    }

    pub fn active(&self) -> Option<&Mission> {
        self.active.as_ref()
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Most recently archived mission.
    pub fn last_archived(&self) -> Option<&Mission> {
        self.history.front()
    }

    /// Up to `limit` archived missions, newest first.
    pub fn history(&self, limit: usize) -> Vec<Mission> {
        self.history.iter().take(limit).cloned().collect()
    }

    pub fn archived_count(&self) -> usize {
        self.history.len()
    }
}

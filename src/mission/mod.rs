//! Delivery missions and the ledger that enforces one-at-a-time.

mod ledger;

pub use ledger::{
    Mission, MissionLedger, MissionStatus, DEFAULT_TIMEOUT_SECONDS, MISSION_HISTORY_CAPACITY,
};

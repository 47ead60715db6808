//! Simulated rover subsystems: the drive train and the payload lock.
//!
//! Neither touches real hardware; both are plain in-memory models owned and
//! mutated by the orchestrator.

mod motor;
mod payload;

pub use motor::{Bank, Drive, Motor, MotorBank, MotorDirection, MotorHealth, MAX_SPEED, MOTOR_COUNT};
pub use payload::{PayloadLock, PayloadStatus};

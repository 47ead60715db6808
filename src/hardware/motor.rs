//! Simulated eight-motor drive train.
//!
//! Four motors per bank. Turning uses a differential-drive approximation:
//! the bank on the inside of the turn reverses at reduced speed while the
//! outer bank drives forward at the requested speed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of motors on the rover.
pub const MOTOR_COUNT: usize = 8;

/// Highest accepted speed value.
pub const MAX_SPEED: u8 = 255;

/// Fraction of the requested speed the inner bank runs at during a turn.
const TURN_INNER_RATIO: f64 = 0.3;

const MOTOR_LAYOUT: [(&str, Bank); MOTOR_COUNT] = [
    ("L-Front-Upper", Bank::Left),
    ("L-Front-Lower", Bank::Left),
    ("L-Rear-Upper", Bank::Left),
    ("L-Rear-Lower", Bank::Left),
    ("R-Front-Upper", Bank::Right),
    ("R-Front-Lower", Bank::Right),
    ("R-Rear-Upper", Bank::Right),
    ("R-Rear-Lower", Bank::Right),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bank {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotorDirection {
    Forward,
    Backward,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MotorHealth {
    Ok,
    Warning,
    Fault,
}

/// High-level movement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Drive {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl Drive {
    /// Parse a direction name. Anything unrecognised means stop.
    ///
    /// ```rust
    /// use courier::hardware::Drive;
    ///
    /// assert_eq!(Drive::from_name("LEFT"), Drive::Left);
    /// assert_eq!(Drive::from_name("forward"), Drive::Forward);
    /// assert_eq!(Drive::from_name("sideways"), Drive::Stop);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "FORWARD" => Self::Forward,
            "BACKWARD" => Self::Backward,
            "LEFT" => Self::Left,
            "RIGHT" => Self::Right,
            _ => Self::Stop,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Forward => "FORWARD",
            Self::Backward => "BACKWARD",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Stop => "STOP",
        }
    }
}

impl fmt::Display for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Motor {
    pub id: u8,
    pub label: String,
    pub bank: Bank,
    pub speed: u8,
    pub direction: MotorDirection,
    pub health: MotorHealth,
}

impl Motor {
    fn new(id: u8, label: &str, bank: Bank) -> Self {
        Self {
            id,
            label: label.to_string(),
            bank,
            speed: 0,
            direction: MotorDirection::Stopped,
            health: MotorHealth::Ok,
        }
    }

    fn drive(&mut self, direction: MotorDirection, speed: u8) {
        // A faulted motor stays down until the bank is reset.
        if self.health == MotorHealth::Fault {
            self.halt();
            return;
        }
        self.speed = speed;
        self.direction = direction;
    }

    fn halt(&mut self) {
        self.speed = 0;
        self.direction = MotorDirection::Stopped;
    }

    pub fn is_stopped(&self) -> bool {
        self.speed == 0 && self.direction == MotorDirection::Stopped
    }
}

/// The rover's fixed set of motors, mutated in place.
#[derive(Clone, Debug)]
pub struct MotorBank {
    motors: Vec<Motor>,
}

impl Default for MotorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorBank {
    pub fn new() -> Self {
        let motors = MOTOR_LAYOUT
            .iter()
            .enumerate()
            .map(|(id, (label, bank))| Motor::new(id as u8, label, *bank))
            .collect();
        Self { motors }
    }

    /// Apply a movement request. `speed` is clamped to `0..=255`.
    pub fn set_motors(&mut self, drive: Drive, speed: i32) {
        let speed = speed.clamp(0, i32::from(MAX_SPEED)) as u8;
        let inner = (f64::from(speed) * TURN_INNER_RATIO).round() as u8;

        for motor in &mut self.motors {
            match (drive, motor.bank) {
                (Drive::Forward, _) => motor.drive(MotorDirection::Forward, speed),
                (Drive::Backward, _) => motor.drive(MotorDirection::Backward, speed),
                (Drive::Left, Bank::Left) | (Drive::Right, Bank::Right) => {
                    motor.drive(MotorDirection::Backward, inner)
                }
                (Drive::Left, Bank::Right) | (Drive::Right, Bank::Left) => {
                    motor.drive(MotorDirection::Forward, speed)
                }
                (Drive::Stop, _) => motor.halt(),
            }
        }
    }

    /// Zero every motor. Health is left alone.
    pub fn stop_all(&mut self) {
        self.motors.iter_mut().for_each(Motor::halt);
    }

    /// Force a motor into `FAULT`. Returns `false` for an unknown id.
    pub fn set_fault(&mut self, motor_id: u8) -> bool {
        match self.motors.get_mut(usize::from(motor_id)) {
            Some(motor) => {
                motor.health = MotorHealth::Fault;
                motor.halt();
                true
            }
            None => false,
        }
    }

    /// Fresh motors: stopped, health `OK`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn motors(&self) -> &[Motor] {
        &self.motors
    }

    pub fn snapshot(&self) -> Vec<Motor> {
        self.motors.clone()
    }

    pub fn all_stopped(&self) -> bool {
        self.motors.iter().all(Motor::is_stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_of(bank: &MotorBank, side: Bank) -> Vec<&Motor> {
        bank.motors().iter().filter(|m| m.bank == side).collect()
    }

    #[test]
    fn new_bank_has_eight_stopped_motors() {
        let bank = MotorBank::new();
        assert_eq!(bank.motors().len(), MOTOR_COUNT);
        assert!(bank.all_stopped());
        assert_eq!(bank_of(&bank, Bank::Left).len(), 4);
        assert_eq!(bank.motors()[4].label, "R-Front-Upper");
    }

    #[test]
    fn forward_drives_all_motors_uniformly() {
        let mut bank = MotorBank::new();
        bank.set_motors(Drive::Forward, 150);

        for motor in bank.motors() {
            assert_eq!(motor.speed, 150);
            assert_eq!(motor.direction, MotorDirection::Forward);
        }
    }

    #[test]
    fn speed_is_clamped() {
        let mut bank = MotorBank::new();
        bank.set_motors(Drive::Backward, 999);
        assert!(bank.motors().iter().all(|m| m.speed == MAX_SPEED));

        bank.set_motors(Drive::Forward, -20);
        assert!(bank.motors().iter().all(|m| m.speed == 0));
    }

    #[test]
    fn left_turn_reverses_left_bank_at_reduced_speed() {
        let mut bank = MotorBank::new();
        bank.set_motors(Drive::Left, 100);

        for motor in bank_of(&bank, Bank::Left) {
            assert_eq!(motor.speed, 30);
            assert_eq!(motor.direction, MotorDirection::Backward);
        }
        for motor in bank_of(&bank, Bank::Right) {
            assert_eq!(motor.speed, 100);
            assert_eq!(motor.direction, MotorDirection::Forward);
        }
    }

    #[test]
    fn right_turn_mirrors_left_turn() {
        let mut bank = MotorBank::new();
        bank.set_motors(Drive::Right, 200);

        for motor in bank_of(&bank, Bank::Right) {
            assert_eq!(motor.speed, 60);
            assert_eq!(motor.direction, MotorDirection::Backward);
        }
        for motor in bank_of(&bank, Bank::Left) {
            assert_eq!(motor.direction, MotorDirection::Forward);
        }
    }

    #[test]
    fn stop_drive_halts_everything() {
        let mut bank = MotorBank::new();
        bank.set_motors(Drive::Forward, 100);
        bank.set_motors(Drive::from_name("UP"), 100);
        assert!(bank.all_stopped());
    }

    #[test]
    fn fault_is_sticky_until_reset() {
        let mut bank = MotorBank::new();
        assert!(bank.set_fault(2));
        bank.set_motors(Drive::Forward, 200);

        let faulted = &bank.motors()[2];
        assert_eq!(faulted.health, MotorHealth::Fault);
        assert!(faulted.is_stopped());
        assert_eq!(bank.motors()[3].speed, 200);

        bank.stop_all();
        assert_eq!(bank.motors()[2].health, MotorHealth::Fault);

        bank.reset();
        assert_eq!(bank.motors()[2].health, MotorHealth::Ok);
    }

    #[test]
    fn unknown_motor_fault_is_refused() {
        let mut bank = MotorBank::new();
        assert!(!bank.set_fault(8));
    }
}

//! Property-based tests for the transition table, the history ring and the
//! orchestrator's refusal semantics.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use courier::core::{
    transition, valid_commands, Command, Guard, RoverState, State, StateHistory, StateTransition,
    TransitionResult,
};
use courier::hardware::Drive;
use courier::{MissionOrchestrator, OrchestratorError};
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_state()(index in 0..RoverState::ALL.len()) -> RoverState {
        RoverState::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_command()(index in 0..Command::ALL.len()) -> Command {
        Command::ALL[index]
    }
}

#[derive(Clone, Debug)]
enum Op {
    Start(String),
    Open,
    Close,
    Redeliver,
    Manual(Drive, i32),
    StopManual,
    ReturnToBase,
    Fault,
    MotorFault(u8),
    Reset,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[0-9]{3}".prop_map(Op::Start),
        Just(Op::Open),
        Just(Op::Close),
        Just(Op::Redeliver),
        (0..5usize, -50..400i32).prop_map(|(d, speed)| {
            let drive = [Drive::Forward, Drive::Backward, Drive::Left, Drive::Right, Drive::Stop][d];
            Op::Manual(drive, speed)
        }),
        Just(Op::StopManual),
        Just(Op::ReturnToBase),
        Just(Op::Fault),
        (0..12u8).prop_map(Op::MotorFault),
        Just(Op::Reset),
    ]
}

fn apply(rover: &MissionOrchestrator, op: &Op) -> Result<(), OrchestratorError> {
    match op {
        Op::Start(room) => rover.start_mission(room.as_str()).map(|_| ()),
        Op::Open => rover.open_compartment().map(|_| ()),
        Op::Close => rover.close_compartment().map(|_| ()),
        Op::Redeliver => rover.request_redelivery().map(|_| ()),
        Op::Manual(drive, speed) => rover.manual_override(*drive, *speed).map(|_| ()),
        Op::StopManual => rover.stop_manual().map(|_| ()),
        Op::ReturnToBase => rover.return_to_base().map(|_| ()),
        Op::Fault => rover.inject_fault("injected").map(|_| ()),
        Op::MotorFault(id) => rover.set_motor_fault(*id).map(|_| ()),
        Op::Reset => {
            rover.reset_rover();
            Ok(())
        }
    }
}

proptest! {
    #[test]
    fn error_is_always_accepted(state in arbitrary_state()) {
        prop_assert_eq!(
            transition(state, Command::Error),
            TransitionResult::Accepted(RoverState::Error)
        );
    }

    #[test]
    fn rejection_keeps_the_state(state in arbitrary_state(), command in arbitrary_command()) {
        let result = transition(state, command);
        if !result.is_accepted() {
            prop_assert_eq!(result.resulting_state(), state);
            let reason = result.reason().unwrap();
            prop_assert!(reason.contains(state.name()));
            prop_assert!(reason.contains(command.name()));
        }
    }

    #[test]
    fn valid_commands_agree_with_transition(state in arbitrary_state(), command in arbitrary_command()) {
        let listed = valid_commands(state).contains(&command);
        prop_assert_eq!(listed, transition(state, command).is_accepted());
    }

    #[test]
    fn manual_override_only_from_interruptible_states(state in arbitrary_state()) {
        let result = transition(state, Command::ManualOverride);
        if state.is_interruptible() {
            prop_assert_eq!(result, TransitionResult::Accepted(RoverState::ManualControl));
        } else {
            prop_assert!(!result.is_accepted());
        }
    }

    #[test]
    fn transition_is_deterministic(state in arbitrary_state(), command in arbitrary_command()) {
        prop_assert_eq!(transition(state, command), transition(state, command));
    }

    #[test]
    fn guard_is_deterministic(state in arbitrary_state(), expected in arbitrary_state()) {
        let guard = Guard::in_state(expected);
        prop_assert_eq!(guard.check(&state), guard.check(&state));
        prop_assert_eq!(guard.check(&state), state == expected);
    }

    #[test]
    fn history_never_exceeds_capacity(
        capacity in 1..20usize,
        steps in prop::collection::vec((arbitrary_state(), arbitrary_command()), 0..60)
    ) {
        let mut history = StateHistory::with_capacity(capacity);
        history.reseed();

        let mut from = RoverState::Idle;
        for (to, command) in &steps {
            history.record(StateTransition::new(from, *to, *command));
            from = *to;
        }

        prop_assert_eq!(history.len(), (steps.len() + 1).min(capacity));
        prop_assert_eq!(history.latest().map(|t| t.to), Some(from));
    }

    #[test]
    fn history_path_ends_at_latest(
        states in prop::collection::vec(arbitrary_state(), 1..10)
    ) {
        let mut history = StateHistory::new();
        history.reseed();

        let mut from = RoverState::Idle;
        for to in &states {
            history.record(StateTransition::new(from, *to, Command::ManualMove));
            from = *to;
        }

        let path = history.get_path();
        prop_assert_eq!(path.len(), states.len() + 1);
        prop_assert_eq!(path[0], RoverState::Idle);
        prop_assert_eq!(&path[1..], states.as_slice());
    }

    #[test]
    fn refused_operations_change_nothing(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let rover = MissionOrchestrator::builder()
            .runtime(runtime.handle().clone())
            .seed(11)
            .build()
            .unwrap();

        for op in &ops {
            let before = rover.status();
            let history_before = rover.state_history(usize::MAX);
            let archived_before = rover.mission_history(usize::MAX).len();

            if apply(&rover, op).is_err() {
                let after = rover.status();
                prop_assert_eq!(after.state, before.state);
                prop_assert_eq!(after.active_mission, before.active_mission);
                prop_assert_eq!(after.motors, before.motors);
                prop_assert_eq!(after.payload, before.payload);
                prop_assert_eq!(rover.state_history(usize::MAX), history_before);
                prop_assert_eq!(rover.mission_history(usize::MAX).len(), archived_before);
            }

            let state = rover.state();
            let active = rover.active_mission().is_some();
            match state {
                RoverState::Idle | RoverState::Completed => prop_assert!(!active),
                RoverState::Navigating
                | RoverState::Arrived
                | RoverState::WaitingForUser
                | RoverState::DeliveryWindow
                | RoverState::ReturningHome => prop_assert!(active),
                RoverState::ManualControl | RoverState::Error => {}
            }
        }
    }

    #[test]
    fn reset_always_lands_in_a_clean_idle(ops in prop::collection::vec(arbitrary_op(), 0..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let rover = MissionOrchestrator::builder()
            .runtime(runtime.handle().clone())
            .build()
            .unwrap();

        for op in &ops {
            let _ = apply(&rover, op);
        }
        let status = rover.reset_rover();

        prop_assert_eq!(status.state, RoverState::Idle);
        prop_assert!(status.active_mission.is_none());
        prop_assert!(status.payload.locked);
        prop_assert!(status.motors.iter().all(|m| m.speed == 0));
        prop_assert!(status.motors.iter().all(|m| m.is_stopped()));
    }
}

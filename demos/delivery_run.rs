//! Delivery Run
//!
//! Drives one rover through a completed delivery, a delivery nobody answers,
//! and a redelivery, on a sped-up clock.
//!
//! Key concepts:
//! - Building an orchestrator with a custom configuration
//! - Letting timers move the mission along between user actions
//! - Rendering results as tagged JSON
//!
//! Run with: cargo run --example delivery_run [config.json]
//! Set RUST_LOG=courier=debug to see timer diagnostics.

use courier::{MissionOrchestrator, Response, RoverConfig, RoverState};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn demo_config() -> RoverConfig {
    RoverConfig {
        navigation_tick_ms: 100,
        progress_step_min: 15,
        progress_step_max: 30,
        wait_timeout_secs: 2,
        return_trip_ms: 800,
        auto_reset_ms: 300,
        ..RoverConfig::default()
    }
}

async fn wait_for(rover: &MissionOrchestrator, target: RoverState) {
    while rover.state() != target {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn print_response(label: &str, response: Response) {
    println!("{label}: {}", response.to_json());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RoverConfig::from_path(path)?,
        None => demo_config(),
    };
    let rover = MissionOrchestrator::builder().config(config).build()?;

    println!("=== Delivery to room 305 ===");
    print_response("start", rover.start_mission("305").into());
    wait_for(&rover, RoverState::WaitingForUser).await;
    print_response("open", rover.open_compartment().into());
    print_response("close", rover.close_compartment().into());
    wait_for(&rover, RoverState::Idle).await;

    println!("\n=== Delivery to room 101, nobody home ===");
    print_response("start", rover.start_mission("101").into());
    wait_for(&rover, RoverState::ReturningHome).await;
    println!("timed out, heading home");
    wait_for(&rover, RoverState::Idle).await;

    println!("\n=== Redelivery ===");
    print_response("redeliver", rover.request_redelivery().into());
    print_response("open too early", rover.open_compartment().into());
    wait_for(&rover, RoverState::WaitingForUser).await;
    print_response("return to base", rover.return_to_base().into());
    wait_for(&rover, RoverState::Idle).await;

    println!("\n=== Mission history ===");
    for mission in rover.mission_history(courier::orchestrator::DEFAULT_MISSION_HISTORY_LIMIT) {
        println!("room {:>4}  {}", mission.room, mission.status);
    }

    println!("\n=== Final status ===");
    println!("{}", serde_json::to_string_pretty(&rover.status())?);

    Ok(())
}

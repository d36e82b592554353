//! Traffic Light
//!
//! This example demonstrates a cyclic machine with a guarded transition.
//!
//! Key concepts:
//! - Cyclic state transitions
//! - Guards receive the current value and the event name
//! - A denied guard leaves the snapshot untouched
//!
//! Run with: cargo run --example traffic_light

use statekit::{Configuration, Machine, StateDefinition, Transition};

fn main() {
    println!("=== Traffic Light Example ===\n");

    let config = Configuration::<()>::builder()
        .initial("red")
        .state(
            "red",
            StateDefinition::builder()
                .on("TIMER", "green")
                // Pedestrians may only cross while the light is red.
                .on("WALK", Transition::to("red").when(|value, _| value == "red")),
        )
        .state(
            "green",
            StateDefinition::builder()
                .on("TIMER", "yellow")
                .on("EMERGENCY", Transition::to("red").when(|_, event| event == "EMERGENCY")),
        )
        .state(
            "yellow",
            StateDefinition::builder()
                .on("TIMER", "red")
                .on("EMERGENCY", Transition::to("red").when(|_, _| false)),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, ()).unwrap();
    println!("Initial state: {}\n", machine.snapshot().value);

    for event in ["TIMER", "TIMER", "EMERGENCY", "TIMER", "TIMER", "EMERGENCY"] {
        let before = machine.snapshot();
        machine.dispatch(event).unwrap();
        let after = machine.snapshot();
        let note = if before.value == after.value {
            " (unchanged)"
        } else {
            ""
        };
        println!("{event:>9}: {} -> {}{note}", before.value, after.value);
    }

    println!("\nCycle: {}", machine.history().get_path().join(" -> "));

    println!("\n=== Example Complete ===");
}

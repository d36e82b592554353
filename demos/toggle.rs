//! Toggle Machine
//!
//! This example demonstrates the smallest useful machine: two states that
//! flip on a single event.
//!
//! Key concepts:
//! - Shorthand transitions (`on("TOGGLE", "active")`)
//! - Snapshots and `next_events`
//! - Unknown events are silent no-ops
//!
//! Run with: cargo run --example toggle

use statekit::{Configuration, Machine, StateDefinition};

fn main() {
    println!("=== Toggle Machine Example ===\n");

    let config = Configuration::<()>::builder()
        .initial("inactive")
        .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
        .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
        .build()
        .unwrap();

    let machine = Machine::new(config, ()).unwrap();
    let snapshot = machine.snapshot();
    println!("Initial state: {}", snapshot.value);
    println!("Accepts: {:?}\n", snapshot.next_events);

    for event in ["TOGGLE", "TOGGLE", "UNKNOWN", "TOGGLE"] {
        machine.dispatch(event).unwrap();
        println!("{event:>8} -> {}", machine.snapshot().value);
    }

    println!("\nVisited: {:?}", machine.history().get_path());

    println!("\n=== Example Complete ===");
}

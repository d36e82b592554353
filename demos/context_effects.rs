//! Context and Effects
//!
//! This example demonstrates entry effects, cleanups, and context updates.
//!
//! Key concepts:
//! - Entry effects run only when the state value changes
//! - Cleanups run before the next state's entry effect
//! - Context changes go through the `ContextUpdater`
//! - Effects can dispatch follow-up events through a `Dispatcher`
//!
//! Run with: cargo run --example context_effects

use statekit::{Cleanup, Configuration, Dispatcher, Machine, StateDefinition};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
struct Session {
    connects: u32,
    closed: u32,
}

fn main() {
    println!("=== Context and Effects Example ===\n");

    let dispatcher: Rc<RefCell<Option<Dispatcher<Session>>>> = Rc::default();
    let handshake = Rc::clone(&dispatcher);

    let config = Configuration::<Session>::builder()
        .initial("disconnected")
        .state(
            "disconnected",
            StateDefinition::builder().on("CONNECT", "connecting"),
        )
        .state(
            "connecting",
            StateDefinition::builder()
                .on("ESTABLISHED", "connected")
                .entry(move |_| {
                    println!("  [connecting] handshake done, queueing ESTABLISHED");
                    if let Some(dispatcher) = handshake.borrow().as_ref() {
                        dispatcher.dispatch("ESTABLISHED").unwrap();
                    }
                }),
        )
        .state(
            "connected",
            StateDefinition::builder()
                .on("DISCONNECT", "disconnected")
                .effect(|ctx| {
                    println!("  [connected] entry: counting connection");
                    ctx.update(|s: &Session| Session {
                        connects: s.connects + 1,
                        ..s.clone()
                    });
                    Some(Cleanup::new(|ctx| {
                        println!("  [connected] cleanup: closing session");
                        ctx.update(|s: &Session| Session {
                            closed: s.closed + 1,
                            ..s.clone()
                        });
                    }))
                }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Session::default()).unwrap();
    *dispatcher.borrow_mut() = Some(machine.dispatcher());

    println!("CONNECT");
    machine.dispatch("CONNECT").unwrap();
    println!("  -> {:?}\n", machine.snapshot());

    println!("DISCONNECT");
    machine.dispatch("DISCONNECT").unwrap();
    println!("  -> {:?}\n", machine.snapshot());

    println!("CONNECT again");
    machine.dispatch("CONNECT").unwrap();
    println!("  -> {:?}\n", machine.snapshot());

    println!("Stopping releases the active cleanup:");
    machine.stop();

    println!("\n=== Example Complete ===");
}

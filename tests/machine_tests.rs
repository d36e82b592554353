//! End-to-end behavior of the machine runtime.

use statekit::{
    Cleanup, ConfigIssue, Configuration, Dispatcher, Machine, MachineError, StateDefinition,
    Transition, DEFAULT_HISTORY_LIMIT,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct Counter {
    count: u32,
}

type Log = Rc<RefCell<Vec<String>>>;

fn toggle() -> Configuration<Counter> {
    Configuration::builder()
        .initial("inactive")
        .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
        .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
        .build()
        .unwrap()
}

fn events(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn toggle_scenario() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();

    let initial = machine.snapshot();
    assert_eq!(initial.value, "inactive");
    assert_eq!(initial.next_events, events(&["TOGGLE"]));

    machine.dispatch("TOGGLE").unwrap();
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.value, "active");
    assert_eq!(snapshot.next_events, events(&["TOGGLE"]));

    machine.dispatch("TOGGLE").unwrap();
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.value, "inactive");
    assert_eq!(snapshot.next_events, events(&["TOGGLE"]));
}

#[test]
fn entry_effect_updates_context() {
    let config = Configuration::<Counter>::builder()
        .initial("inactive")
        .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
        .state(
            "active",
            StateDefinition::builder()
                .on("TOGGLE", "inactive")
                .entry(|ctx| ctx.update(|c: &Counter| Counter { count: c.count + 1 })),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    machine.dispatch("TOGGLE").unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.context, Counter { count: 1 });
    assert_eq!(snapshot.value, "active");
    assert_eq!(snapshot.next_events, events(&["TOGGLE"]));

    machine.dispatch("TOGGLE").unwrap();
    machine.dispatch("TOGGLE").unwrap();
    assert_eq!(machine.snapshot().context, Counter { count: 2 });
}

#[test]
fn guard_false_keeps_state() {
    let config = Configuration::<Counter>::builder()
        .initial("inactive")
        .state(
            "inactive",
            StateDefinition::builder().on("TOGGLE", Transition::to("active").when(|_, _| false)),
        )
        .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    let before = machine.snapshot();
    machine.dispatch("TOGGLE").unwrap();

    assert_eq!(*machine.snapshot(), *before);
    assert!(machine.history().is_empty());
}

#[test]
fn guard_sees_value_and_event_not_context() {
    let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
    let record = Rc::clone(&seen);
    let config = Configuration::<Counter>::builder()
        .initial("inactive")
        .state(
            "inactive",
            StateDefinition::builder().on(
                "TOGGLE",
                Transition::to("active").when(move |value, event| {
                    record
                        .borrow_mut()
                        .push((value.to_string(), event.to_string()));
                    true
                }),
            ),
        )
        .state("active", StateDefinition::builder())
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 9 }).unwrap();
    machine.dispatch("TOGGLE").unwrap();

    assert_eq!(machine.snapshot().value, "active");
    assert_eq!(
        *seen.borrow(),
        vec![("inactive".to_string(), "TOGGLE".to_string())]
    );
}

#[test]
fn unknown_event_is_a_silent_noop() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();
    let before = machine.snapshot();

    for _ in 0..5 {
        machine.dispatch("NOT_AN_EVENT").unwrap();
    }

    assert_eq!(*machine.snapshot(), *before);
    assert!(Rc::ptr_eq(&machine.snapshot(), &before));
}

#[test]
fn effects_run_exit_before_entry() {
    let log: Log = Rc::default();
    let enter_a = Rc::clone(&log);
    let enter_b = Rc::clone(&log);

    let config = Configuration::<Counter>::builder()
        .initial("a")
        .state(
            "a",
            StateDefinition::builder().on("NEXT", "b").effect(move |_| {
                enter_a.borrow_mut().push("enter a".to_string());
                let exit = Rc::clone(&enter_a);
                Some(Cleanup::new(move |_| exit.borrow_mut().push("exit a".to_string())))
            }),
        )
        .state(
            "b",
            StateDefinition::builder().on("NEXT", "a").effect(move |_| {
                enter_b.borrow_mut().push("enter b".to_string());
                let exit = Rc::clone(&enter_b);
                Some(Cleanup::new(move |_| exit.borrow_mut().push("exit b".to_string())))
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    assert_eq!(*log.borrow(), vec!["enter a"]);

    machine.dispatch("NEXT").unwrap();
    machine.dispatch("NEXT").unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["enter a", "exit a", "enter b", "exit b", "enter a"]
    );
}

#[test]
fn context_update_does_not_rerun_effects() {
    let entries = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&entries);
    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state(
            "idle",
            StateDefinition::builder().on("POKE", "idle").entry(move |ctx| {
                *counter.borrow_mut() += 1;
                ctx.update(|c: &Counter| Counter { count: c.count + 10 });
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    assert_eq!(*entries.borrow(), 1);
    assert_eq!(machine.snapshot().context, Counter { count: 10 });

    // Self-transition keeps the value, so no effect runs.
    machine.dispatch("POKE").unwrap();
    assert_eq!(*entries.borrow(), 1);
    assert_eq!(machine.snapshot().context, Counter { count: 10 });
    assert!(machine.history().is_empty());
}

#[test]
fn cleanup_can_update_context() {
    let config = Configuration::<Counter>::builder()
        .initial("busy")
        .state(
            "busy",
            StateDefinition::builder().on("DONE", "idle").effect(|_| {
                Some(Cleanup::new(|ctx| {
                    ctx.update(|c: &Counter| Counter { count: c.count + 100 })
                }))
            }),
        )
        .state("idle", StateDefinition::builder())
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 1 }).unwrap();
    machine.dispatch("DONE").unwrap();

    let snapshot = machine.snapshot();
    assert_eq!(snapshot.value, "idle");
    assert_eq!(snapshot.context, Counter { count: 101 });
    assert!(snapshot.next_events.is_empty());
}

#[test]
fn updates_apply_in_order() {
    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state("idle", StateDefinition::builder().on("GO", "running"))
        .state(
            "running",
            StateDefinition::builder().entry(|ctx| {
                ctx.update(|c: &Counter| Counter { count: c.count + 1 });
                ctx.update(|c: &Counter| Counter { count: c.count * 10 });
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 1 }).unwrap();
    machine.dispatch("GO").unwrap();

    assert_eq!(machine.snapshot().context, Counter { count: 20 });
}

#[test]
fn dispatch_from_effect_is_queued() {
    let log: Log = Rc::default();
    let slot: Rc<RefCell<Option<Dispatcher<Counter>>>> = Rc::default();

    let loading_log = Rc::clone(&log);
    let loading_slot = Rc::clone(&slot);
    let ready_log = Rc::clone(&log);

    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state("idle", StateDefinition::builder().on("LOAD", "loading"))
        .state(
            "loading",
            StateDefinition::builder().on("LOADED", "ready").effect(move |_| {
                if let Some(dispatcher) = loading_slot.borrow().as_ref() {
                    dispatcher.dispatch("LOADED").unwrap();
                }
                loading_log.borrow_mut().push("enter loading".to_string());
                let exit = Rc::clone(&loading_log);
                Some(Cleanup::new(move |_| {
                    exit.borrow_mut().push("exit loading".to_string())
                }))
            }),
        )
        .state(
            "ready",
            StateDefinition::builder().entry(move |_| {
                ready_log.borrow_mut().push("enter ready".to_string());
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    *slot.borrow_mut() = Some(machine.dispatcher());

    machine.dispatch("LOAD").unwrap();

    assert_eq!(machine.snapshot().value, "ready");
    assert_eq!(
        *log.borrow(),
        vec!["enter loading", "exit loading", "enter ready"]
    );
    assert_eq!(machine.history().get_path(), vec!["idle", "loading", "ready"]);
}

#[test]
fn history_records_value_changes() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();

    machine.dispatch("TOGGLE").unwrap();
    machine.dispatch("IGNORED").unwrap();
    machine.dispatch("TOGGLE").unwrap();

    let history = machine.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history.get_path(), vec!["inactive", "active", "inactive"]);
    assert!(history.transitions().all(|t| t.event == "TOGGLE"));
}

#[test]
fn history_stays_within_limit() {
    let config = Configuration::<Counter>::builder()
        .initial("inactive")
        .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
        .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
        .history_limit(16)
        .build()
        .unwrap();
    let machine = Machine::new(config, Counter { count: 0 }).unwrap();

    for _ in 0..20_000 {
        machine.dispatch("TOGGLE").unwrap();
    }

    let history = machine.history();
    assert_eq!(history.len(), 16);
    assert_eq!(history.limit(), Some(16));
    assert_eq!(history.last().map(|t| t.to.as_str()), Some("inactive"));
    assert_eq!(machine.snapshot().value, "inactive");
}

#[test]
fn default_history_is_bounded() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();

    for _ in 0..DEFAULT_HISTORY_LIMIT + 10 {
        machine.dispatch("TOGGLE").unwrap();
    }

    assert_eq!(machine.history().len(), DEFAULT_HISTORY_LIMIT);
}

#[test]
fn zero_history_limit_records_nothing() {
    let config = Configuration::<Counter>::builder()
        .initial("inactive")
        .state("inactive", StateDefinition::builder().on("TOGGLE", "active"))
        .state("active", StateDefinition::builder().on("TOGGLE", "inactive"))
        .history_limit(0)
        .build()
        .unwrap();
    let machine = Machine::new(config, Counter { count: 0 }).unwrap();

    machine.dispatch("TOGGLE").unwrap();

    assert!(machine.history().is_empty());
    assert_eq!(machine.snapshot().value, "active");
}

#[test]
fn held_history_is_not_affected_by_later_changes() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();
    machine.dispatch("TOGGLE").unwrap();

    let held = machine.history();
    machine.dispatch("TOGGLE").unwrap();

    assert_eq!(held.len(), 1);
    assert_eq!(machine.history().len(), 2);
}

/// `relay` enters `forwarding`, whose entry effect issues a context update
/// and a `NEXT` event in the given order. Every applied update and every
/// entry is logged together with the context value it produced or saw.
fn relay(update_first: bool) -> (Machine<Counter>, Log) {
    let log: Log = Rc::default();
    let slot: Rc<RefCell<Option<Dispatcher<Counter>>>> = Rc::default();

    let forward_log = Rc::clone(&log);
    let forward_slot = Rc::clone(&slot);
    let done_log = Rc::clone(&log);

    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state("idle", StateDefinition::builder().on("GO", "forwarding"))
        .state(
            "forwarding",
            StateDefinition::builder()
                .on("NEXT", "done")
                .entry(move |ctx| {
                    forward_log.borrow_mut().push("enter forwarding".to_string());
                    let bump = {
                        let log = Rc::clone(&forward_log);
                        move |c: &Counter| {
                            log.borrow_mut().push(format!("update {}", c.count + 1));
                            Counter { count: c.count + 1 }
                        }
                    };
                    let next = || {
                        if let Some(dispatcher) = forward_slot.borrow().as_ref() {
                            dispatcher.dispatch("NEXT").unwrap();
                        }
                    };
                    if update_first {
                        ctx.update(bump);
                        next();
                    } else {
                        next();
                        ctx.update(bump);
                    }
                }),
        )
        .state(
            "done",
            StateDefinition::builder().entry(move |ctx| {
                done_log.borrow_mut().push("enter done".to_string());
                let log = Rc::clone(&done_log);
                ctx.update(move |c: &Counter| {
                    log.borrow_mut().push(format!("done sees {}", c.count));
                    c.clone()
                });
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    *slot.borrow_mut() = Some(machine.dispatcher());
    (machine, log)
}

#[test]
fn update_then_dispatch_from_effect_keeps_fifo_order() {
    let (machine, log) = relay(true);

    machine.dispatch("GO").unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["enter forwarding", "update 1", "enter done", "done sees 1"]
    );
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.value, "done");
    assert_eq!(snapshot.context, Counter { count: 1 });
    assert_eq!(machine.history().get_path(), vec!["idle", "forwarding", "done"]);
}

#[test]
fn dispatch_then_update_from_effect_keeps_fifo_order() {
    let (machine, log) = relay(false);

    machine.dispatch("GO").unwrap();

    // NEXT is resolved first, so `done` is entered before the update lands
    // and its own update is queued behind it.
    assert_eq!(
        *log.borrow(),
        vec!["enter forwarding", "enter done", "update 1", "done sees 1"]
    );
    let snapshot = machine.snapshot();
    assert_eq!(snapshot.value, "done");
    assert_eq!(snapshot.context, Counter { count: 1 });
    assert_eq!(machine.history().get_path(), vec!["idle", "forwarding", "done"]);
}

#[test]
fn can_reports_listed_events() {
    let machine = Machine::new(toggle(), Counter { count: 0 }).unwrap();

    assert!(machine.can("TOGGLE"));
    assert!(!machine.can("RESET"));
}

#[test]
fn unknown_initial_fails_at_construction() {
    let config = Configuration::<Counter>::builder()
        .initial("missing")
        .state("idle", StateDefinition::builder())
        .build()
        .unwrap();

    let err = Machine::new(config, Counter { count: 0 }).unwrap_err();

    assert_eq!(
        err,
        MachineError::InvalidConfig(vec![ConfigIssue::UnknownInitial("missing".to_string())])
    );
}

#[test]
fn dangling_target_fails_at_construction() {
    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state("idle", StateDefinition::builder().on("GO", "gone"))
        .build()
        .unwrap();

    let err = Machine::new(config, Counter { count: 0 }).unwrap_err();

    assert!(matches!(
        err,
        MachineError::InvalidConfig(ref issues)
            if issues.len() == 1
                && matches!(&issues[0], ConfigIssue::UnknownTarget { target, .. } if target == "gone")
    ));
}

#[test]
fn invalid_config_runs_no_effects() {
    let entered = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&entered);
    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state(
            "idle",
            StateDefinition::builder()
                .on("GO", "gone")
                .entry(move |_| *flag.borrow_mut() = true),
        )
        .build()
        .unwrap();

    assert!(Machine::new(config, Counter { count: 0 }).is_err());
    assert!(!*entered.borrow());
}

#[test]
fn stop_releases_active_cleanup_once() {
    let log: Log = Rc::default();
    let enter = Rc::clone(&log);
    let config = Configuration::<Counter>::builder()
        .initial("open")
        .state(
            "open",
            StateDefinition::builder().effect(move |_| {
                let exit = Rc::clone(&enter);
                Some(Cleanup::new(move |ctx| {
                    // Ignored: the machine is already stopping.
                    ctx.update(|c: &Counter| Counter { count: c.count + 1 });
                    exit.borrow_mut().push("closed".to_string());
                }))
            }),
        )
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    let dispatcher = machine.dispatcher();
    machine.stop();

    assert_eq!(*log.borrow(), vec!["closed"]);
    assert_eq!(dispatcher.dispatch("ANY"), Err(MachineError::Stopped));
}

#[test]
fn panicking_effect_propagates_and_machine_recovers() {
    let config = Configuration::<Counter>::builder()
        .initial("idle")
        .state(
            "idle",
            StateDefinition::builder()
                .on("BOOM", "broken")
                .on("GO", "running"),
        )
        .state(
            "broken",
            StateDefinition::builder()
                .on("RESET", "idle")
                .entry(|_| panic!("effect failed")),
        )
        .state("running", StateDefinition::builder())
        .build()
        .unwrap();

    let machine = Machine::new(config, Counter { count: 0 }).unwrap();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        machine.dispatch("BOOM")
    }));
    assert!(result.is_err());

    // The snapshot was committed before the effect ran.
    assert_eq!(machine.snapshot().value, "broken");

    machine.dispatch("RESET").unwrap();
    machine.dispatch("GO").unwrap();
    assert_eq!(machine.snapshot().value, "running");
}

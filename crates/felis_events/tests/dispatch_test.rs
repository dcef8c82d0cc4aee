//! Integration tests for dispatch through a registry.
//!
//! Covers ordering, isolation of failing subscribers, cancellation and
//! concurrent use of one event from several threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use felis_events::{Cancellation, EventContext, EventError, EventRegistry};
use parking_lot::Mutex;

struct BreakContext {
    pos: [i32; 3],
    cancellation: Cancellation,
}

impl BreakContext {
    fn at(pos: [i32; 3]) -> Self {
        Self {
            pos,
            cancellation: Cancellation::new(),
        }
    }
}

impl EventContext for BreakContext {
    fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}

fn registry() -> EventRegistry {
    let mut builder = EventRegistry::builder();
    builder.register::<BreakContext>("Block.broken").unwrap();
    builder.build()
}

#[test]
fn test_second_subscriber_sees_cancellation() {
    let registry = registry();
    let ran = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::new(Mutex::new(None));

    {
        let ran = Arc::clone(&ran);
        registry
            .subscribe("Block.broken", move |ctx: &BreakContext| {
                ran.lock().push("first");
                ctx.cancel();
            })
            .unwrap();
    }
    {
        let ran = Arc::clone(&ran);
        let seen = Arc::clone(&seen);
        registry
            .subscribe("Block.broken", move |ctx: &BreakContext| {
                ran.lock().push("second");
                *seen.lock() = Some(ctx.is_cancelled());
            })
            .unwrap();
    }

    let ctx = BreakContext::at([4, 64, -2]);
    let report = registry.fire("Block.broken", &ctx).unwrap();

    assert_eq!(*ran.lock(), vec!["first", "second"]);
    assert_eq!(*seen.lock(), Some(true));
    assert!(ctx.is_cancelled());
    assert!(report.is_clean());
}

#[test]
fn test_middle_failure_does_not_stop_chain() {
    let registry = registry();
    let markers = Arc::new(Mutex::new(Vec::new()));

    {
        let markers = Arc::clone(&markers);
        registry
            .subscribe("Block.broken", move |_: &BreakContext| markers.lock().push(1))
            .unwrap();
    }
    {
        let markers = Arc::clone(&markers);
        registry
            .subscribe_named("Block.broken", "faulty_mod", move |ctx: &BreakContext| {
                markers.lock().push(2);
                if ctx.pos[1] < 0 {
                    return Err(format!("below the world at {:?}", ctx.pos));
                }
                Ok(())
            })
            .unwrap();
    }
    {
        let markers = Arc::clone(&markers);
        registry
            .subscribe("Block.broken", move |_: &BreakContext| markers.lock().push(3))
            .unwrap();
    }

    let report = registry
        .fire("Block.broken", &BreakContext::at([0, -5, 0]))
        .unwrap();

    assert_eq!(*markers.lock(), vec![1, 2, 3]);
    assert_eq!(report.invoked, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].handler, "faulty_mod");
    assert!(report.failures[0].to_string().contains("below the world"));
}

#[test]
fn test_unknown_identifier_invokes_nothing() {
    let registry = registry();
    let count = Arc::new(AtomicUsize::new(0));
    {
        let count = Arc::clone(&count);
        registry
            .subscribe("Block.broken", move |_: &BreakContext| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();
    }

    let err = registry
        .fire("Block.borken", &BreakContext::at([0, 0, 0]))
        .unwrap_err();

    assert_eq!(err, EventError::UnknownEvent("Block.borken".to_string()));
    assert_eq!(count.load(Ordering::Relaxed), 0);
}

#[test]
fn test_empty_event_fires_cleanly() {
    let registry = registry();
    let ctx = BreakContext::at([1, 2, 3]);
    let report = registry.fire("Block.broken", &ctx).unwrap();

    assert_eq!(report.invoked, 0);
    assert!(!ctx.is_cancelled());
}

#[test]
fn test_concurrent_subscribe_and_fire() {
    const THREADS: usize = 4;
    const ROUNDS: usize = 200;

    let registry = Arc::new(registry());
    let fired = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(THREADS * 2));

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let registry = Arc::clone(&registry);
        let fired = Arc::clone(&fired);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                let fired = Arc::clone(&fired);
                let token = registry
                    .subscribe("Block.broken", move |_: &BreakContext| {
                        fired.fetch_add(1, Ordering::Relaxed);
                    })
                    .unwrap();
                assert!(registry.unsubscribe(&token));
            }
        }));
    }
    for _ in 0..THREADS {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for round in 0..ROUNDS {
                let ctx = BreakContext::at([round as i32, 0, 0]);
                let report = registry.fire("Block.broken", &ctx).unwrap();
                assert!(report.is_clean());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.subscriber_count("Block.broken").unwrap(), 0);
}

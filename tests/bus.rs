//! Integration tests for bus dispatch, backpressure, and shutdown draining.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use topicbus::{Bus, BusConfig, HandlerError, HandlerFn, HandlerRef, Payload};

/// Handler that bumps a counter per invocation.
fn counting(counter: Arc<AtomicUsize>) -> HandlerRef {
    HandlerFn::arc("counter", move |_ctx: CancellationToken, _payload: Payload| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, HandlerError>(())
        }
    })
}

/// Polls until `counter` reaches `expected` or ~500ms elapse.
async fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
    for _ in 0..100 {
        if counter.load(Ordering::SeqCst) == expected {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn emit_without_subscribers_is_noop() {
    let bus = Bus::new(BusConfig::default());
    bus.emit("nobody.listens", 1u32);
    sleep(Duration::from_millis(20)).await;
    bus.stop().await;
}

#[tokio::test]
async fn delivers_payload_to_handler() {
    struct UserCreated {
        id: u64,
    }

    let bus = Bus::new(BusConfig::default());
    let seen = Arc::new(AtomicU64::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let seen_h = Arc::clone(&seen);
    let calls_h = Arc::clone(&calls);
    let handler: HandlerRef = HandlerFn::arc("h1", move |_ctx: CancellationToken, payload: Payload| {
        let seen = Arc::clone(&seen_h);
        let calls = Arc::clone(&calls_h);
        async move {
            let user = payload
                .downcast::<UserCreated>()
                .map_err(|_| HandlerError::Fail {
                    error: "unexpected payload type".into(),
                })?;
            seen.store(user.id, Ordering::SeqCst);
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });

    bus.subscribe("user.created", handler);
    bus.emit("user.created", UserCreated { id: 42 });

    assert!(wait_for(&calls, 1).await, "handler not invoked within window");
    assert_eq!(seen.load(Ordering::SeqCst), 42);

    // Exactly once: no stray extra invocation shows up later.
    sleep(Duration::from_millis(20)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    bus.stop().await;
}

#[tokio::test]
async fn fans_out_to_every_handler_on_topic() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        bus.subscribe("order.placed", counting(Arc::clone(&counter)));
    }
    bus.emit("order.placed", ());

    assert!(wait_for(&counter, 5).await, "expected 5 invocations");
    bus.stop().await;
}

#[tokio::test]
async fn two_handlers_each_invoked_once() {
    let bus = Bus::new(BusConfig::default());
    let c1 = Arc::new(AtomicUsize::new(0));
    let c2 = Arc::new(AtomicUsize::new(0));

    bus.subscribe("t", counting(Arc::clone(&c1)));
    bus.subscribe("t", counting(Arc::clone(&c2)));
    bus.emit("t", ());

    // No ordering assumption between the two handlers.
    assert!(wait_for(&c1, 1).await);
    assert!(wait_for(&c2, 1).await);
    bus.stop().await;
}

#[tokio::test]
async fn each_emit_dispatches_once() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));
    bus.subscribe("tick", counting(Arc::clone(&counter)));

    for _ in 0..3 {
        bus.emit("tick", ());
    }

    assert!(wait_for(&counter, 3).await);
    bus.stop().await;
}

#[tokio::test]
async fn unsubscribe_removes_only_that_handler() {
    let bus = Bus::new(BusConfig::default());
    let c1 = Arc::new(AtomicUsize::new(0));
    let c2 = Arc::new(AtomicUsize::new(0));

    let sub1 = bus.subscribe("t", counting(Arc::clone(&c1)));
    bus.subscribe("t", counting(Arc::clone(&c2)));

    bus.unsubscribe(&sub1);
    bus.emit("t", ());

    assert!(wait_for(&c2, 1).await, "remaining handler must still fire");
    sleep(Duration::from_millis(20)).await;
    assert_eq!(c1.load(Ordering::SeqCst), 0, "removed handler must not fire");
    bus.stop().await;
}

// current_thread flavor: the dispatch loop cannot run between the emits
// below (no await points), so the queue genuinely fills up.
#[tokio::test(flavor = "current_thread")]
async fn emit_drops_instead_of_blocking_when_queue_is_full() {
    let bus = Bus::new(BusConfig { capacity: 4 });
    let counter = Arc::new(AtomicUsize::new(0));
    bus.subscribe("burst", counting(Arc::clone(&counter)));

    for i in 0..8u32 {
        bus.emit("burst", i); // returns immediately even when full
    }

    assert!(wait_for(&counter, 4).await, "queued events must be delivered");
    sleep(Duration::from_millis(20)).await;
    assert_eq!(
        counter.load(Ordering::SeqCst),
        4,
        "events past capacity must be dropped, not delivered late"
    );
    bus.stop().await;
}

#[tokio::test]
async fn stop_waits_for_inflight_handlers() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));

    let counter_h = Arc::clone(&counter);
    let slow: HandlerRef = HandlerFn::arc("slow", move |_ctx: CancellationToken, _payload: Payload| {
        let counter = Arc::clone(&counter_h);
        async move {
            sleep(Duration::from_millis(100)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, HandlerError>(())
        }
    });

    bus.subscribe("t", slow);
    bus.emit("t", ());

    // Let the dispatch loop start the handler before stopping.
    sleep(Duration::from_millis(20)).await;
    bus.stop().await;

    assert_eq!(
        counter.load(Ordering::SeqCst),
        1,
        "stop() must not return while a handler is still running"
    );
}

#[tokio::test]
async fn emit_after_stop_is_silent_noop() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));
    bus.subscribe("t", counting(Arc::clone(&counter)));

    bus.stop().await;
    assert!(bus.is_stopped());

    bus.emit("t", ());
    sleep(Duration::from_millis(50)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_stop_calls_both_return() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));

    let counter_h = Arc::clone(&counter);
    let slow: HandlerRef = HandlerFn::arc("slow", move |_ctx: CancellationToken, _payload: Payload| {
        let counter = Arc::clone(&counter_h);
        async move {
            sleep(Duration::from_millis(50)).await;
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, HandlerError>(())
        }
    });
    bus.subscribe("t", slow);
    bus.emit("t", ());
    sleep(Duration::from_millis(10)).await;

    let b1 = bus.clone();
    let b2 = bus.clone();
    let both = async { tokio::join!(b1.stop(), b2.stop()) };
    timeout(Duration::from_secs(2), both)
        .await
        .expect("both stop() calls must return");

    // The drain ran once: the single in-flight handler completed once.
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // A third, sequential stop is a no-op.
    timeout(Duration::from_secs(1), bus.stop())
        .await
        .expect("repeated stop() must return immediately");
}

#[tokio::test]
async fn panicking_handler_does_not_poison_dispatch() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));

    let bomb: HandlerRef = HandlerFn::arc("bomb", |_ctx: CancellationToken, _payload: Payload| async move {
        if true {
            panic!("boom");
        }
        Ok::<_, HandlerError>(())
    });

    bus.subscribe("t", bomb);
    bus.subscribe("t", counting(Arc::clone(&counter)));

    bus.emit("t", ());
    bus.emit("t", ());

    assert!(
        wait_for(&counter, 2).await,
        "healthy handler must keep receiving after a sibling panics"
    );
    timeout(Duration::from_secs(1), bus.stop())
        .await
        .expect("stop() must drain despite panicked invocations");
}

#[tokio::test]
async fn failing_handler_is_isolated() {
    let bus = Bus::new(BusConfig::default());
    let counter = Arc::new(AtomicUsize::new(0));

    let failing: HandlerRef = HandlerFn::arc("failing", |_ctx: CancellationToken, _payload: Payload| async move {
        Err::<(), _>(HandlerError::Fail {
            error: "write refused".into(),
        })
    });

    bus.subscribe("t", failing);
    bus.subscribe("t", counting(Arc::clone(&counter)));
    bus.emit("t", ());

    assert!(wait_for(&counter, 1).await);
    bus.stop().await;
}

#[tokio::test]
async fn cancellation_is_visible_to_inflight_handlers() {
    let bus = Bus::new(BusConfig::default());
    let observed = Arc::new(AtomicBool::new(false));

    let observed_h = Arc::clone(&observed);
    let waiter: HandlerRef = HandlerFn::arc("waiter", move |ctx: CancellationToken, _payload: Payload| {
        let observed = Arc::clone(&observed_h);
        async move {
            ctx.cancelled().await;
            observed.store(true, Ordering::SeqCst);
            Err(HandlerError::Canceled)
        }
    });

    bus.subscribe("t", waiter);
    bus.emit("t", ());

    // Handler is now parked on the token; stop() must release it and still drain.
    sleep(Duration::from_millis(20)).await;
    timeout(Duration::from_secs(2), bus.stop())
        .await
        .expect("stop() must complete once handlers observe cancellation");
    assert!(observed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn subscription_ids_are_unique() {
    let bus = Bus::new(BusConfig::default());
    let a = bus.subscribe("t", counting(Arc::new(AtomicUsize::new(0))));
    let b = bus.subscribe("t", counting(Arc::new(AtomicUsize::new(0))));
    assert_ne!(a.id, b.id);
    assert!(a.id < b.id, "ids increase monotonically");
    assert_eq!(a.topic.as_ref(), "t");
    bus.stop().await;
}

//! Minimal walkthrough: subscribe two handlers, emit a few events, stop.
//!
//! Run with:
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use topicbus::{Bus, BusConfig, HandlerError, HandlerFn, HandlerRef, Payload};

#[derive(Debug)]
struct OrderPlaced {
    id: u64,
    total_cents: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bus = Bus::new(BusConfig::default());

    let billing: HandlerRef = HandlerFn::arc("billing", |_ctx: CancellationToken, payload: Payload| async move {
        if let Ok(order) = payload.downcast::<OrderPlaced>() {
            println!("[billing] charging {} cents for order {}", order.total_cents, order.id);
        }
        Ok::<_, HandlerError>(())
    });

    let mailer: HandlerRef = HandlerFn::arc("mailer", |_ctx: CancellationToken, payload: Payload| async move {
        if let Ok(order) = payload.downcast::<OrderPlaced>() {
            println!("[mailer] confirmation mail for order {}", order.id);
        }
        Ok::<_, HandlerError>(())
    });

    bus.subscribe("order.placed", billing);
    let mail_sub = bus.subscribe("order.placed", mailer);

    bus.emit("order.placed", OrderPlaced { id: 1, total_cents: 1299 });
    bus.emit("order.placed", OrderPlaced { id: 2, total_cents: 450 });

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Only billing sees the third order.
    bus.unsubscribe(&mail_sub);
    bus.emit("order.placed", OrderPlaced { id: 3, total_cents: 9900 });

    tokio::time::sleep(Duration::from_millis(100)).await;
    bus.stop().await;
    println!("bus drained, bye");
}

//! Wires the bus into process termination: a ticker emits events until
//! Ctrl-C, then `stop()` drains in-flight handlers before exit.
//!
//! Run with:
//! ```bash
//! cargo run --example graceful_shutdown
//! # then press Ctrl-C
//! ```

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use topicbus::{Bus, BusConfig, HandlerError, HandlerFn, HandlerRef, Payload};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let bus = Bus::new(BusConfig::default());

    // A deliberately slow handler: shows that stop() waits for it.
    let slow: HandlerRef = HandlerFn::arc("slow-consumer", |ctx: CancellationToken, payload: Payload| async move {
        let Ok(n) = payload.downcast::<u64>() else {
            return Err(HandlerError::Fail { error: "expected u64 tick".into() });
        };
        tokio::select! {
            _ = ctx.cancelled() => {
                println!("[slow-consumer] cancelled mid-tick {n}, cleaning up");
                Err(HandlerError::Canceled)
            }
            _ = tokio::time::sleep(Duration::from_millis(300)) => {
                println!("[slow-consumer] processed tick {n}");
                Ok(())
            }
        }
    });
    bus.subscribe("clock.tick", slow);

    // Producer task: emits a tick twice a second until the bus stops.
    let producer = {
        let bus = bus.clone();
        tokio::spawn(async move {
            let mut n: u64 = 0;
            while !bus.is_stopped() {
                bus.emit("clock.tick", n);
                n += 1;
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        })
    };

    println!("emitting on 'clock.tick'; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    println!("signal received, draining bus...");
    bus.stop().await;
    let _ = producer.await;
    println!("all handlers finished, exiting");
    Ok(())
}

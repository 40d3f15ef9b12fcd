//! # Example: ticker
//!
//! A periodic stream bound to a host, with the built-in [`LogWriter`] printing
//! every lifecycle event.
//!
//! Demonstrates how to:
//! - Attach event subscribers with [`BridgeBuilder::with_subscribers`].
//! - Start, stop and restart a [`LiveOutcome`] and watch the bridge
//!   resubscribe its producer.
//!
//! ## Flow
//! ```text
//! start() ─► Activated ─► Subscribed ─► HandleAttached ─► Published × n
//! stop()  ─► Deactivated ─► Cancelled
//! start() ─► Activated ─► Subscribed ─► ... (fresh stream, counting from 0)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example ticker --features logging
//! ```
//!
//! [`BridgeBuilder::with_subscribers`]: livebridge::BridgeBuilder::with_subscribers

use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use livebridge::{
    Bridge, Context, Handlers, LiveOutcome, LogWriter, ProducerError, StreamFn, Subscribe,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let ticks = StreamFn::from_stream(|| {
        stream::unfold(0_u64, |n| async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if n == 8 {
                return Some((Err(ProducerError::fail("ticker overheated")), n));
            }
            Some((Ok(n), n + 1))
        })
    });

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let bridge = Bridge::builder(ticks)
        .name("ticker")
        .producer_context(Context::try_current()?)
        .delivery_context(Context::try_current()?)
        .with_subscribers(subs)
        .build();

    let host = LiveOutcome::new(bridge);
    host.observe(
        Handlers::stream(|n: &u64| println!("tick {n}"))
            .on_error(|e| println!("ticker stopped: {e}")),
    );

    host.start();
    tokio::time::sleep(Duration::from_millis(700)).await;

    host.stop();
    tokio::time::sleep(Duration::from_millis(300)).await;

    host.start();
    tokio::time::sleep(Duration::from_secs(2)).await;

    drop(host);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}

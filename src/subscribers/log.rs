//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [activated] bridge="user-by-id"
//! [subscribed] bridge="user-by-id" token=1
//! [published] bridge="user-by-id" token=1 outcome=value version=1
//! [released] bridge="user-by-id" token=1
//! [deactivated] bridge="user-by-id"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let bridge = e.bridge.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::Activated => println!("[activated] bridge={bridge:?}"),
            EventKind::Deactivated => println!("[deactivated] bridge={bridge:?}"),
            EventKind::Suppressed => println!("[suppressed] bridge={bridge:?} already fired"),
            EventKind::Subscribed => {
                println!("[subscribed] bridge={bridge:?} token={:?}", e.token);
            }
            EventKind::HandleAttached => {
                println!(
                    "[handle-attached] bridge={bridge:?} token={:?} note={:?}",
                    e.token, e.reason
                );
            }
            EventKind::Cancelled => {
                println!("[cancelled] bridge={bridge:?} token={:?}", e.token);
            }
            EventKind::Released => {
                println!("[released] bridge={bridge:?} token={:?}", e.token);
            }
            EventKind::Published => {
                println!(
                    "[published] bridge={bridge:?} token={:?} outcome={} version={:?}",
                    e.token,
                    e.outcome.unwrap_or("unknown"),
                    e.version
                );
            }
            EventKind::SignalDropped => {
                println!(
                    "[signal-dropped] bridge={bridge:?} token={:?} reason={:?}",
                    e.token, e.reason
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={} reason={:?}",
                    e.subscriber.unwrap_or("unknown"),
                    e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.subscriber.unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

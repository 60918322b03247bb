//! Event feed
//!
//! Reads armband events from a line stream on a dedicated thread and queues them for the
//! orchestrator. The thread only parses and enqueues; all controller state stays with the
//! orchestrator task.
//!
//! Malformed lines are logged and skipped. When the stream ends the feed is closed so the
//! orchestrator can drain what is left and stop.

use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};
use myo_rover::system::event;
use myo_rover::TimedEvent;

/// Pause before retrying when the event channel is full
const RETRY_DELAY: Duration = Duration::from_millis(1);

/// Counters for one pass over the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Events queued
    pub delivered: usize,
    /// Lines that failed to parse
    pub rejected: usize,
}

/// Spawns the reader thread feeding [`event::EVENT_CHANNEL`]
pub fn start(reader: Box<dyn BufRead + Send>, realtime: bool) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("event-feed".into())
        .spawn(move || {
            let stats = feed(reader, realtime, event::try_send);
            info!(
                "Event feed finished: {} events, {} rejected lines",
                stats.delivered, stats.rejected
            );
            event::close();
        })
        .context("starting event feed thread")
}

/// Parses every line of `reader` and hands the events to `deliver`
///
/// `deliver` gives the event back when it cannot take it yet; the feed then waits briefly
/// and retries, so no event is lost. With `realtime` set, events are released no earlier
/// than their timestamps relative to the first event.
pub fn feed<R, F>(reader: R, realtime: bool, mut deliver: F) -> FeedStats
where
    R: BufRead,
    F: FnMut(TimedEvent) -> Result<(), TimedEvent>,
{
    let mut stats = FeedStats::default();
    let mut pace = realtime.then(Pacer::default);

    for (index, line) in reader.split(b'\n').enumerate() {
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Event feed read failed after {} lines: {}", index, e);
                break;
            }
        };
        // Invalid UTF-8 fails to parse below and is skipped like any other bad line
        let line = String::from_utf8_lossy(&bytes);

        let mut pending = match TimedEvent::parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {} ({:?})", index + 1, e, line);
                stats.rejected += 1;
                continue;
            }
        };

        if let Some(pacer) = pace.as_mut() {
            pacer.wait_for(pending.timestamp_us);
        }

        while let Err(event) = deliver(pending) {
            pending = event;
            thread::sleep(RETRY_DELAY);
        }
        stats.delivered += 1;
    }

    stats
}

/// Longest pause honoured between two consecutive events
const MAX_PACE_GAP: Duration = Duration::from_secs(10);

/// Releases events at the pace of their timestamps
#[derive(Debug, Default)]
struct Pacer {
    origin: Option<(Instant, u64)>,
    latest_us: u64,
}

impl Pacer {
    /// Sleeps until `timestamp_us` is due; timestamps going backwards are due at once
    ///
    /// A timestamp more than [`MAX_PACE_GAP`] past the latest one seen restarts the pacing
    /// from that event instead of stalling the feed.
    fn wait_for(&mut self, timestamp_us: u64) {
        let gap = Duration::from_micros(timestamp_us.saturating_sub(self.latest_us));
        if self.origin.is_some() && gap > MAX_PACE_GAP {
            warn!(
                "Timestamp {} jumps {} s ahead, not waiting for it",
                timestamp_us,
                gap.as_secs()
            );
            self.origin = None;
        }
        self.latest_us = match self.origin {
            Some(_) => self.latest_us.max(timestamp_us),
            None => timestamp_us,
        };

        let (start, first_us) = *self.origin.get_or_insert((Instant::now(), timestamp_us));
        let due = start + Duration::from_micros(timestamp_us.saturating_sub(first_us));
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
    }
}

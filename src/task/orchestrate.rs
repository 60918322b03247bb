//! Orchestrator Module
//!
//! This module contains the task that drives the gesture controller. Once per tick it
//! drains the pending armband events, lets the controller turn them into commands and
//! hands those to the sink before polling again. When the event feed closes, whatever is
//! still queued is processed and the process exits.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Ticker};
use log::{debug, info};
use myo_rover::system::event::{self, ChannelSource};
use myo_rover::{CommandSink, Controller, EventSource, Status};

use crate::task::trace::TraceLog;

/// Main orchestrator task
///
/// Owns the controller, the sink and the traces for the lifetime of the process, so all
/// controller state changes happen here and in order.
#[embassy_executor::task]
pub async fn orchestrate(
    mut controller: Controller,
    mut sink: Box<dyn CommandSink>,
    mut trace: TraceLog,
    poll_interval: Duration,
) {
    info!(
        "Orchestrator started, polling every {} ms",
        poll_interval.as_millis()
    );
    let mut ticker = Ticker::every(poll_interval);
    let mut source = ChannelSource;
    let mut status = controller.status();

    loop {
        match select(ticker.next(), event::closed()).await {
            Either::First(()) => {
                process_tick(
                    &mut controller,
                    &mut source,
                    sink.as_mut(),
                    &mut trace,
                    &mut status,
                );
            }
            Either::Second(()) => {
                process_tick(
                    &mut controller,
                    &mut source,
                    sink.as_mut(),
                    &mut trace,
                    &mut status,
                );
                info!("Event feed closed, stopping");
                std::process::exit(0);
            }
        }
    }
}

/// Runs one controller tick and reports status changes
///
/// # Returns
///
/// * Number of events consumed
fn process_tick(
    controller: &mut Controller,
    source: &mut dyn EventSource,
    sink: &mut dyn CommandSink,
    trace: &mut TraceLog,
    status: &mut Status,
) -> usize {
    let consumed = controller.tick(source, sink, |action| trace.record(action));

    let current = controller.status();
    if current != *status {
        debug!("{} pitch band {}", current, current.pitch_band);
        *status = current;
    }
    consumed
}

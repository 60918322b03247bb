//! Session traces
//!
//! Optional CSV files the controller appends to while running:
//! - Gesture trace: `timestamp_us,previous_pose,current_pose` per debounced transition
//! - Command trace: `timestamp_us,token` per command sent
//!
//! Traces are side channels. A failed write is logged and the trace carries on.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use myo_rover::Action;

/// Append-only trace writers
pub struct TraceLog {
    gestures: Option<Box<dyn Write>>,
    commands: Option<Box<dyn Write>>,
}

impl TraceLog {
    /// No traces at all
    pub fn disabled() -> Self {
        Self {
            gestures: None,
            commands: None,
        }
    }

    /// Opens the configured trace files for appending, creating them if needed
    pub fn open(gestures: Option<&Path>, commands: Option<&Path>) -> Result<Self> {
        let mut trace = Self::disabled();
        trace.gestures = gestures.map(append).transpose()?;
        trace.commands = commands.map(append).transpose()?;
        Ok(trace)
    }

    /// Records one controller action
    pub fn record(&mut self, action: &Action) {
        if let Some(out) = self.gestures.as_mut() {
            let transition = action.transition;
            if let Err(e) = writeln!(
                out,
                "{},{},{}",
                action.timestamp_us, transition.previous, transition.current
            ) {
                warn!("Gesture trace write failed: {}", e);
            }
        }

        if let (Some(out), Some(command)) = (self.commands.as_mut(), action.command) {
            if let Err(e) = writeln!(out, "{},{}", action.timestamp_us, command.token()) {
                warn!("Command trace write failed: {}", e);
            }
        }
    }
}

fn append(path: &Path) -> Result<Box<dyn Write>> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening trace file {}", path.display()))?;
    Ok(Box::new(file))
}

//! Controller Module
//!
//! Ties the pipeline together. The controller owns the orientation estimator, the
//! controller state and what is known about the armband, and turns each incoming event
//! into at most one drive command:
//!
//! ```text
//! event ─┬─ orientation ──> OrientationEstimator ──> pitch band ──┐
//!        ├─ pose ─────────> PoseDebouncer ──> actionable pose ────┴─> planner ──> sink
//!        └─ arm / lock ───> device state (gates the planner)
//! ```
//!
//! Pose events are only debounced and planned while the armband is synced on an arm.

use core::fmt;

use log::{debug, info};

use crate::system::command_planner::ControllerConfig;
use crate::system::drive_command::{Command, CommandSink};
use crate::system::event::{Arm, EventSource, Events, TimedEvent};
use crate::system::orientation::{OrientationEstimator, PitchBand};
use crate::system::pose::Pose;
use crate::system::state::{ControllerState, DeviceState, Direction};

/// A debounced pose change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoseTransition {
    /// Pose acted on before this one
    pub previous: Pose,
    /// Pose being acted on now
    pub current: Pose,
}

/// Outcome of an actionable pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Action {
    /// Receive time of the pose event
    pub timestamp_us: u64,
    pub transition: PoseTransition,
    /// Command handed to the sink, if the pose maps to one
    pub command: Option<Command>,
    /// Direction after this action
    pub direction: Direction,
}

/// Snapshot of the armband as shown on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub on_arm: bool,
    pub arm: Arm,
    pub unlocked: bool,
    pub pose: Pose,
    pub pitch_band: PitchBand,
}

impl fmt::Display for Status {
    /// `[unlocked][L][fist          ]` while worn, blanks otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.on_arm {
            write!(
                f,
                "[{:<8}][{}][{:<14}]",
                if self.unlocked { "unlocked" } else { "locked" },
                self.arm.letter(),
                self.pose
            )
        } else {
            write!(f, "[{:8}][?][{:14}]", "", "")
        }
    }
}

/// Gesture controller
#[derive(Debug, Clone, Default)]
pub struct Controller {
    config: ControllerConfig,
    state: ControllerState,
    orientation: OrientationEstimator,
    device: DeviceState,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Applies one event
    ///
    /// Returns the resulting action when the event is a pose transition on a worn
    /// armband. Every other event only updates state.
    pub fn handle(&mut self, event: &TimedEvent) -> Option<Action> {
        match event.event {
            Events::Orientation(quat) => {
                self.orientation.update(&quat);
                None
            }
            Events::Pose(pose) => {
                self.device.current_pose = pose;
                if !self.device.on_arm {
                    return None;
                }
                self.act(event.timestamp_us, pose)
            }
            Events::ArmSynced(arm) => {
                info!("Armband synced on {} arm", arm.name());
                self.device.on_arm = true;
                self.device.arm = arm;
                None
            }
            Events::ArmUnsynced => {
                info!("Armband left the arm");
                self.device.on_arm = false;
                None
            }
            Events::Locked => {
                debug!("Armband locked");
                self.device.unlocked = false;
                None
            }
            Events::Unlocked => {
                debug!("Armband unlocked");
                self.device.unlocked = true;
                None
            }
            Events::Unpaired => {
                info!("Armband unpaired");
                self.device.reset();
                self.orientation.reset();
                None
            }
        }
    }

    /// Debounces and plans a pose from a worn armband
    fn act(&mut self, timestamp_us: u64, pose: Pose) -> Option<Action> {
        let previous = self.state.debouncer.last_acted();
        let current = self.state.debouncer.on_pose_event(pose)?;
        info!("Pose {} (previous {})", current, previous);

        let band = self.orientation.pitch_band();
        let (command, direction) = self.config.plan(current, band, self.state.direction);
        if direction != self.state.direction {
            info!("Direction now {:?}", direction);
        }
        self.state.direction = direction;

        Some(Action {
            timestamp_us,
            transition: PoseTransition { previous, current },
            command,
            direction,
        })
    }

    /// Drains the source and forwards resulting commands to the sink
    ///
    /// `observe` sees every action, whether or not it produced a command. Returns the
    /// number of events consumed.
    pub fn tick<E, S, F>(&mut self, source: &mut E, sink: &mut S, mut observe: F) -> usize
    where
        E: EventSource + ?Sized,
        S: CommandSink + ?Sized,
        F: FnMut(&Action),
    {
        let mut consumed = 0;
        while let Some(event) = source.poll() {
            consumed += 1;
            if let Some(action) = self.handle(&event) {
                if let Some(command) = action.command {
                    debug!("Sending {} ({:?})", command, command);
                    sink.send(command);
                }
                observe(&action);
            }
        }
        consumed
    }

    pub fn status(&self) -> Status {
        Status {
            on_arm: self.device.on_arm,
            arm: self.device.arm,
            unlocked: self.device.unlocked,
            pose: self.device.current_pose,
            pitch_band: self.orientation.pitch_band(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn pitch_band(&self) -> PitchBand {
        self.orientation.pitch_band()
    }

    pub fn orientation(&self) -> &OrientationEstimator {
        &self.orientation
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

//! Gesture armband to vehicle command pipeline
//!
//! Turns orientation and pose events from a gesture armband into the fixed set of
//! drive commands understood by the vehicle:
//! - Orientation samples are reduced to a pitch band that selects the speed
//! - Pose events are debounced so a held pose acts only once
//! - A small planner maps the debounced pose, pitch band and direction to a command
//!
//! The crate builds without `std` so the pipeline can run inside firmware; the host
//! runner in `main.rs` feeds it from a text stream.

#![cfg_attr(not(test), no_std)]

/// Error types
pub mod error;
/// Pipeline components and their shared types
pub mod system;

pub use error::{ParseCommandError, ParseEventError};
pub use system::command_planner::{plan, ControllerConfig, DoubleTapMode};
pub use system::controller::{Action, Controller, PoseTransition, Status};
pub use system::drive_command::{Command, CommandSink, SpeedLevel};
pub use system::event::{Arm, EventSource, Events, TimedEvent};
pub use system::orientation::{EulerAngles, OrientationEstimator, PitchBand, Quaternion};
pub use system::pose::Pose;
pub use system::pose_debounce::PoseDebouncer;
pub use system::state::{ControllerState, Direction};

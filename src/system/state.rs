//! Controller State
//!
//! Holds the two pieces of state that outlive a single event:
//! - Controller state: the last acted pose and the drive direction, owned by the
//!   planning step
//! - Device state: whether the armband is worn, on which arm, and whether it is unlocked
//!
//! Both are plain values owned by whoever drives the pipeline. Nothing here is global,
//! so a controller can be built and exercised without a live armband.

use crate::system::event::Arm;
use crate::system::pose::Pose;
use crate::system::pose_debounce::PoseDebouncer;

/// Logical drive direction
///
/// Movement and turn commands come in a forward and a backward flavour. The direction
/// is flipped only by a double tap and carried through every other command unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub const fn toggled(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    pub const fn is_forward(self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// State carried between planning steps
///
/// Initialized to:
/// - `unknown` as last acted pose
/// - Forward direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// Suppresses repeats of the last acted pose
    pub debouncer: PoseDebouncer,
    /// Direction applied to move and turn commands
    pub direction: Direction,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// What the armband last told us about itself
///
/// Initialized to:
/// - Not worn, arm unknown
/// - Locked
/// - `unknown` pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    /// Sync gesture recognized and the armband is on an arm
    /// - true: pose events are acted on
    /// - false: pose events are recorded but ignored
    pub on_arm: bool,
    /// Arm the armband was synced on
    pub arm: Arm,
    /// Lock status
    /// - true: the armband delivers pose events
    /// - false: the armband is locked
    pub unlocked: bool,
    /// Most recent pose reported, acted on or not
    pub current_pose: Pose,
}

impl DeviceState {
    /// Forgets everything learned since pairing
    pub fn reset(&mut self) {
        self.on_arm = false;
        self.arm = Arm::Unknown;
        self.unlocked = false;
    }
}

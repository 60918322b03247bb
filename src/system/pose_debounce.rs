//! Pose debouncing
//!
//! The armband repeats the current pose on every poll while it is held. Only a change
//! to a different pose is actionable; repeats and `rest` are dropped.

use crate::system::pose::Pose;

/// Remembers the last pose that was acted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseDebouncer {
    last_acted: Pose,
}

impl Default for PoseDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseDebouncer {
    /// Starts with `unknown` as the last acted pose, so an initial `unknown` never fires
    pub const fn new() -> Self {
        Self {
            last_acted: Pose::Unknown,
        }
    }

    /// Filters one pose notification
    ///
    /// Returns the pose when it is a genuine transition. `rest` is never returned and
    /// leaves the remembered pose untouched, so resting briefly between two holds of the
    /// same pose does not repeat its action.
    pub fn on_pose_event(&mut self, pose: Pose) -> Option<Pose> {
        if pose == Pose::Rest || pose == self.last_acted {
            return None;
        }
        self.last_acted = pose;
        Some(pose)
    }

    pub fn last_acted(&self) -> Pose {
        self.last_acted
    }
}

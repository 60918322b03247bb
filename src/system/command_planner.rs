//! Command Planner Module
//!
//! Maps an actionable pose to a drive command. The mapping is a fixed table evaluated
//! in this order:
//!
//! | Pose            | Command                                  | Direction |
//! |-----------------|------------------------------------------|-----------|
//! | `doubleTap`     | none                                     | flipped   |
//! | `fist`          | `Stop`                                   | kept      |
//! | `waveOut`       | turn left, forward or backward           | kept      |
//! | `waveIn`        | turn right, forward or backward          | kept      |
//! | `fingersSpread` | move at the speed selected by wrist tilt | kept      |
//! | anything else   | `Stop`                                   | kept      |
//!
//! Only poses that passed the debouncer reach the planner, so `rest` never does.

use crate::system::drive_command::{Command, SpeedLevel};
use crate::system::orientation::PitchBand;
use crate::system::pose::Pose;
use crate::system::state::Direction;

/// Highest pitch band that still commands zero speed
const DEAD_ZONE_MAX: u8 = 10;

/// Full PWM duty in tenths
const FULL_DUTY_TENTHS: u16 = 2550;

/// Width of one speed level in tenths of PWM duty (20% of full duty)
const SPEED_STEP_TENTHS: u16 = FULL_DUTY_TENTHS / 5;

/// How a double tap changes the drive direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoubleTapMode {
    /// Each double tap flips between forward and backward
    #[default]
    Toggle,
    /// Every double tap selects backward, the way the first gesture controller behaved
    /// (its direction check assigned instead of comparing)
    Legacy,
}

/// Planner settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    pub double_tap: DoubleTapMode,
}

impl ControllerConfig {
    /// Decides the command for an actionable pose
    ///
    /// # Arguments
    ///
    /// * `pose` - Debounced pose, never `rest`
    /// * `band` - Current wrist tilt
    /// * `direction` - Current drive direction
    ///
    /// # Returns
    ///
    /// * The command to send, if any, and the direction to carry forward
    pub fn plan(
        &self,
        pose: Pose,
        band: PitchBand,
        direction: Direction,
    ) -> (Option<Command>, Direction) {
        let forward = direction.is_forward();
        let command = match pose {
            Pose::DoubleTap => {
                let next = match self.double_tap {
                    DoubleTapMode::Toggle => direction.toggled(),
                    DoubleTapMode::Legacy => Direction::Backward,
                };
                return (None, next);
            }
            Pose::Fist => Some(Command::Stop),
            Pose::WaveOut if forward => Some(Command::TurnLeftForward),
            Pose::WaveOut => Some(Command::TurnLeftBackward),
            Pose::WaveIn if forward => Some(Command::TurnRightForward),
            Pose::WaveIn => Some(Command::TurnRightBackward),
            Pose::FingersSpread => speed_for(band).map(|speed| {
                if forward {
                    Command::MoveForward(speed)
                } else {
                    Command::MoveBackward(speed)
                }
            }),
            Pose::Rest | Pose::Unknown => Some(Command::Stop),
        };
        (command, direction)
    }
}

/// Decides the command for an actionable pose with the default settings
pub fn plan(pose: Pose, band: PitchBand, direction: Direction) -> (Option<Command>, Direction) {
    ControllerConfig::default().plan(pose, band, direction)
}

/// PWM duty in tenths commanded by a wrist tilt
///
/// Zero inside the dead zone, then `255 * (0.2 + (band - 10) / 10)`. Working in tenths
/// keeps the bucket edges exact.
fn duty_tenths(band: PitchBand) -> u16 {
    let band = u16::from(band.value());
    if band <= u16::from(DEAD_ZONE_MAX) {
        0
    } else {
        // 255 * (0.2 + (band - 10) / 10) * 10 == 255 * (band - 8)
        255 * (band - 8)
    }
}

/// Speed level for a wrist tilt
///
/// Levels are buckets of 20% duty starting at 20%: `[20%, 40%)` is level 1 up to
/// `[80%, 100%)` for level 4. Duty below the first bucket or at full duty selects none.
pub fn speed_for(band: PitchBand) -> Option<SpeedLevel> {
    let duty = duty_tenths(band);
    if !(SPEED_STEP_TENTHS..FULL_DUTY_TENTHS).contains(&duty) {
        return None;
    }
    SpeedLevel::from_level((duty / SPEED_STEP_TENTHS) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [Direction; 2] = [Direction::Forward, Direction::Backward];

    fn bands() -> impl Iterator<Item = PitchBand> {
        (0..PitchBand::COUNT).map(PitchBand::new)
    }

    #[test]
    fn test_fist_always_stops() {
        for band in bands() {
            for direction in DIRECTIONS {
                assert_eq!(
                    plan(Pose::Fist, band, direction),
                    (Some(Command::Stop), direction)
                );
            }
        }
    }

    #[test]
    fn test_wave_out_turns_left() {
        for band in bands() {
            assert_eq!(
                plan(Pose::WaveOut, band, Direction::Forward),
                (Some(Command::TurnLeftForward), Direction::Forward)
            );
            assert_eq!(
                plan(Pose::WaveOut, band, Direction::Backward),
                (Some(Command::TurnLeftBackward), Direction::Backward)
            );
        }
    }

    #[test]
    fn test_wave_in_turns_right() {
        assert_eq!(
            plan(Pose::WaveIn, PitchBand::LEVEL, Direction::Forward),
            (Some(Command::TurnRightForward), Direction::Forward)
        );
        assert_eq!(
            plan(Pose::WaveIn, PitchBand::LEVEL, Direction::Backward),
            (Some(Command::TurnRightBackward), Direction::Backward)
        );
    }

    #[test]
    fn test_fingers_spread_dead_zone() {
        for band in 0..=DEAD_ZONE_MAX {
            for direction in DIRECTIONS {
                assert_eq!(
                    plan(Pose::FingersSpread, PitchBand::new(band), direction),
                    (None, direction)
                );
            }
        }
    }

    #[test]
    fn test_fingers_spread_band_15_is_level_3() {
        // 255 * (0.2 + 0.5) = 178.5, inside [153, 204)
        assert_eq!(
            plan(Pose::FingersSpread, PitchBand::new(15), Direction::Forward),
            (Some(Command::MoveForward(SpeedLevel::Three)), Direction::Forward)
        );
        assert_eq!(
            plan(Pose::FingersSpread, PitchBand::new(15), Direction::Backward),
            (Some(Command::MoveBackward(SpeedLevel::Three)), Direction::Backward)
        );
    }

    #[test]
    fn test_speed_buckets() {
        let expected = [
            (11, Some(SpeedLevel::One)),   // 76.5
            (12, Some(SpeedLevel::Two)),   // 102.0, lower edge
            (13, Some(SpeedLevel::Two)),   // 127.5
            (14, Some(SpeedLevel::Three)), // 153.0, lower edge
            (15, Some(SpeedLevel::Three)), // 178.5
            (16, Some(SpeedLevel::Four)),  // 204.0, lower edge
            (17, Some(SpeedLevel::Four)),  // 229.5
        ];
        for (band, speed) in expected {
            assert_eq!(speed_for(PitchBand::new(band)), speed, "band {}", band);
        }
    }

    #[test]
    fn test_double_tap_toggles() {
        assert_eq!(
            plan(Pose::DoubleTap, PitchBand::LEVEL, Direction::Forward),
            (None, Direction::Backward)
        );
        assert_eq!(
            plan(Pose::DoubleTap, PitchBand::LEVEL, Direction::Backward),
            (None, Direction::Forward)
        );
    }

    #[test]
    fn test_double_tap_legacy_always_backward() {
        // The legacy mode never returns to forward
        let legacy = ControllerConfig {
            double_tap: DoubleTapMode::Legacy,
        };
        for direction in DIRECTIONS {
            assert_eq!(
                legacy.plan(Pose::DoubleTap, PitchBand::LEVEL, direction),
                (None, Direction::Backward)
            );
        }
    }

    #[test]
    fn test_other_poses_stop() {
        for direction in DIRECTIONS {
            assert_eq!(
                plan(Pose::Unknown, PitchBand::MAX, direction),
                (Some(Command::Stop), direction)
            );
        }
    }
}

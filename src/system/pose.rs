//! Armband poses
//!
//! The armband classifies muscle activity itself and reports one symbolic pose at a time.

use core::fmt;
use core::str::FromStr;

use crate::error::ParseEventError;

/// Pose reported by the armband
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pose {
    /// Hand relaxed
    Rest,
    /// Hand clenched
    Fist,
    /// Wrist flexed towards the body
    WaveIn,
    /// Wrist extended away from the body
    WaveOut,
    /// Fingers spread wide
    FingersSpread,
    /// Two quick taps of thumb and middle finger
    DoubleTap,
    /// No pose recognized
    #[default]
    Unknown,
}

impl Pose {
    /// All poses, in the order the armband enumerates them
    pub const ALL: [Pose; 7] = [
        Pose::Rest,
        Pose::Fist,
        Pose::WaveIn,
        Pose::WaveOut,
        Pose::FingersSpread,
        Pose::DoubleTap,
        Pose::Unknown,
    ];

    /// Name used by the armband SDK and the event feed
    pub const fn name(self) -> &'static str {
        match self {
            Pose::Rest => "rest",
            Pose::Fist => "fist",
            Pose::WaveIn => "waveIn",
            Pose::WaveOut => "waveOut",
            Pose::FingersSpread => "fingersSpread",
            Pose::DoubleTap => "doubleTap",
            Pose::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Pose {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pose::ALL
            .into_iter()
            .find(|pose| pose.name() == s)
            .ok_or(ParseEventError::UnknownPose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for pose in Pose::ALL {
            assert_eq!(pose.name().parse::<Pose>(), Ok(pose));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert_eq!("wave_in".parse::<Pose>(), Err(ParseEventError::UnknownPose));
        assert_eq!("Fist".parse::<Pose>(), Err(ParseEventError::UnknownPose));
    }

    #[test]
    fn test_display_pads_to_width() {
        assert_eq!(format!("[{:<14}]", Pose::Fist), "[fist          ]");
    }
}

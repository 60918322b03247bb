//! Armband orientation
//!
//! The armband reports its orientation as a unit quaternion. Only the pitch is used
//! downstream: it is reduced to one of [`PitchBand::COUNT`] bands that stand in for how far
//! the wrist is tilted, which in turn selects the commanded speed.
//!
//! # Reference Frame
//!
//! Angles follow the aerospace sequence (ZYX):
//! - Roll (X-axis): forearm rotation, range -π to +π
//! - Pitch (Y-axis): wrist tilted up/down, range -π/2 to +π/2
//! - Yaw (Z-axis): heading, range -π to +π
//!
//! Roll and yaw are kept for display only.

use core::f32::consts::PI;
use core::fmt;

use libm::{asinf, atan2f, floorf};

/// Orientation sample as delivered by the armband
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// Rotation that leaves every axis in place
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Converts to Euler angles in radians
    ///
    /// The inverse sine argument is clamped to [-1, 1] so samples that drift slightly off
    /// the unit sphere still give a valid pitch. A NaN argument is read as a level wrist.
    pub fn to_euler(&self) -> EulerAngles {
        let Quaternion { w, x, y, z } = *self;

        let roll = atan2f(2.0 * (w * x + y * z), 1.0 - 2.0 * (x * x + y * y));

        let sin_pitch = 2.0 * (w * y - z * x);
        let sin_pitch = if sin_pitch.is_nan() {
            0.0
        } else {
            sin_pitch.clamp(-1.0, 1.0)
        };
        let pitch = asinf(sin_pitch);

        let yaw = atan2f(2.0 * (w * z + x * y), 1.0 - 2.0 * (y * y + z * z));

        EulerAngles { roll, pitch, yaw }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Orientation as Euler angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EulerAngles {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Wrist tilt quantized into one of 18 bands
///
/// Band 0 is the wrist pointing straight down, band 17 straight up. A level wrist sits
/// at band 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PitchBand(u8);

impl PitchBand {
    /// Number of bands
    pub const COUNT: u8 = 18;
    /// Highest band
    pub const MAX: PitchBand = PitchBand(Self::COUNT - 1);
    /// Band of a level wrist
    pub const LEVEL: PitchBand = PitchBand(Self::COUNT / 2);

    /// Creates a band, saturating at [`PitchBand::MAX`]
    pub const fn new(band: u8) -> Self {
        if band > Self::MAX.0 {
            Self::MAX
        } else {
            Self(band)
        }
    }

    /// Quantizes a pitch angle in radians
    pub fn from_pitch(pitch: f32) -> Self {
        Self(quantize(pitch + PI / 2.0, PI))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for PitchBand {
    fn default() -> Self {
        Self::LEVEL
    }
}

impl fmt::Display for PitchBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps `offset` in `[0, span]` onto one of the 18 bands, clamping anything outside
fn quantize(offset: f32, span: f32) -> u8 {
    let scaled = floorf(offset / span * PitchBand::COUNT as f32);
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else if scaled >= PitchBand::MAX.0 as f32 {
        PitchBand::MAX.0
    } else {
        scaled as u8
    }
}

/// Tracks the most recent armband orientation
#[derive(Debug, Clone, Default)]
pub struct OrientationEstimator {
    angles: EulerAngles,
    pitch_band: PitchBand,
}

impl OrientationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a new orientation sample and returns the resulting pitch band
    pub fn update(&mut self, quat: &Quaternion) -> PitchBand {
        self.angles = quat.to_euler();
        self.pitch_band = PitchBand::from_pitch(self.angles.pitch);
        self.pitch_band
    }

    /// Forgets the last sample, as if the wrist were level
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pitch_band(&self) -> PitchBand {
        self.pitch_band
    }

    pub fn angles(&self) -> EulerAngles {
        self.angles
    }

    /// Roll banded over [-π, π], for display
    pub fn roll_band(&self) -> u8 {
        quantize(self.angles.roll + PI, 2.0 * PI)
    }

    /// Yaw banded over [-π, π], for display
    pub fn yaw_band(&self) -> u8 {
        quantize(self.angles.yaw + PI, 2.0 * PI)
    }
}

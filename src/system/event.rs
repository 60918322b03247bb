//! Armband Events
//!
//! Defines the events the armband layer delivers, their text form on the event feed,
//! and the channel that carries them to the controller.
//!
//! # Feed Format
//!
//! One event per line, timestamp in microseconds first:
//!
//! ```text
//! 1000 orientation 1.0 0.0 0.0 0.0
//! 1050 pose fist
//! 1100 arm_sync left
//! 1150 arm_unsync
//! 1200 lock
//! 1250 unlock
//! 1300 unpair
//! ```

use core::fmt;
use core::str::{FromStr, SplitWhitespace};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;

use crate::error::ParseEventError;
use crate::system::orientation::Quaternion;
use crate::system::pose::Pose;

/// Capacity of the event channel
pub const EVENT_CHANNEL_SIZE: usize = 64;

/// Multi-producer, single-consumer event channel
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, TimedEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Raised once the producer has delivered its last event
static STREAM_CLOSED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Queues an event without waiting, handing it back when the channel is full
pub fn try_send(event: TimedEvent) -> Result<(), TimedEvent> {
    EVENT_CHANNEL
        .try_send(event)
        .map_err(|TrySendError::Full(event)| event)
}

/// Marks the event stream as finished
pub fn close() {
    STREAM_CLOSED.signal(());
}

/// Waits until the event stream is finished
pub async fn closed() {
    STREAM_CLOSED.wait().await
}

/// Which arm the armband was synced on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Arm {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Arm {
    pub const fn name(self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Right => "right",
            Arm::Unknown => "unknown",
        }
    }

    /// Single letter shown in the status line; anything but left shows as right
    pub const fn letter(self) -> char {
        match self {
            Arm::Left => 'L',
            Arm::Right => 'R',
            Arm::Unknown => 'R',
        }
    }
}

impl FromStr for Arm {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Arm::Left),
            "right" => Ok(Arm::Right),
            "unknown" => Ok(Arm::Unknown),
            _ => Err(ParseEventError::UnknownArm),
        }
    }
}

/// Armband events
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Events {
    /// New orientation sample
    Orientation(Quaternion),
    /// Pose reported, possibly the same as before
    Pose(Pose),
    /// Sync gesture recognized on the given arm
    ArmSynced(Arm),
    /// Armband moved off the arm
    ArmUnsynced,
    /// Armband stopped delivering poses
    Locked,
    /// Armband resumed delivering poses
    Unlocked,
    /// Armband disconnected
    Unpaired,
}

/// An event together with the time it was received
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedEvent {
    /// Monotonic receive time in microseconds
    pub timestamp_us: u64,
    pub event: Events,
}

impl TimedEvent {
    pub const fn new(timestamp_us: u64, event: Events) -> Self {
        Self {
            timestamp_us,
            event,
        }
    }

    /// Parses one feed line
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ParseEventError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for TimedEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let timestamp_us = fields
            .next()
            .ok_or(ParseEventError::MissingTimestamp)?
            .parse::<u64>()
            .map_err(|_| ParseEventError::InvalidTimestamp)?;

        let event = match fields.next().ok_or(ParseEventError::MissingKind)? {
            "orientation" => Events::Orientation(Quaternion::new(
                number(&mut fields, "w")?,
                number(&mut fields, "x")?,
                number(&mut fields, "y")?,
                number(&mut fields, "z")?,
            )),
            "pose" => Events::Pose(field(&mut fields, "pose")?.parse()?),
            "arm_sync" => Events::ArmSynced(field(&mut fields, "arm")?.parse()?),
            "arm_unsync" => Events::ArmUnsynced,
            "lock" => Events::Locked,
            "unlock" => Events::Unlocked,
            "unpair" => Events::Unpaired,
            _ => return Err(ParseEventError::UnknownKind),
        };

        if fields.next().is_some() {
            return Err(ParseEventError::TrailingFields);
        }

        Ok(TimedEvent::new(timestamp_us, event))
    }
}

fn field<'a>(
    fields: &mut SplitWhitespace<'a>,
    name: &'static str,
) -> Result<&'a str, ParseEventError> {
    fields.next().ok_or(ParseEventError::MissingField(name))
}

fn number(fields: &mut SplitWhitespace<'_>, name: &'static str) -> Result<f32, ParseEventError> {
    field(fields, name)?
        .parse()
        .map_err(|_| ParseEventError::InvalidNumber(name))
}

impl fmt::Display for TimedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.timestamp_us)?;
        match self.event {
            Events::Orientation(Quaternion { w, x, y, z }) => {
                write!(f, "orientation {} {} {} {}", w, x, y, z)
            }
            Events::Pose(pose) => write!(f, "pose {}", pose),
            Events::ArmSynced(arm) => write!(f, "arm_sync {}", arm.name()),
            Events::ArmUnsynced => f.write_str("arm_unsync"),
            Events::Locked => f.write_str("lock"),
            Events::Unlocked => f.write_str("unlock"),
            Events::Unpaired => f.write_str("unpair"),
        }
    }
}

/// Supplier of armband events
///
/// Polled once per controller tick. `poll` never waits: it hands out what has arrived
/// and returns `None` once nothing is pending.
pub trait EventSource {
    fn poll(&mut self) -> Option<TimedEvent>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn poll(&mut self) -> Option<TimedEvent> {
        (**self).poll()
    }
}

/// Reads pending events from [`EVENT_CHANNEL`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelSource;

impl EventSource for ChannelSource {
    fn poll(&mut self) -> Option<TimedEvent> {
        EVENT_CHANNEL.try_receive().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_kind() {
        let cases = [
            (
                "10 orientation 1 0 0.5 -0.25",
                Events::Orientation(Quaternion::new(1.0, 0.0, 0.5, -0.25)),
            ),
            ("11 pose fingersSpread", Events::Pose(Pose::FingersSpread)),
            ("12 arm_sync right", Events::ArmSynced(Arm::Right)),
            ("13 arm_unsync", Events::ArmUnsynced),
            ("14 lock", Events::Locked),
            ("15 unlock", Events::Unlocked),
            ("16 unpair", Events::Unpaired),
        ];
        for (line, event) in cases {
            let parsed: TimedEvent = line.parse().unwrap();
            assert_eq!(parsed.event, event, "{}", line);
        }
    }

    #[test]
    fn test_parse_keeps_timestamp() {
        let parsed: TimedEvent = "  123456   pose   fist ".parse().unwrap();
        assert_eq!(parsed, TimedEvent::new(123_456, Events::Pose(Pose::Fist)));
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        assert_eq!(TimedEvent::parse_line(""), Ok(None));
        assert_eq!(TimedEvent::parse_line("   \t"), Ok(None));
        assert_eq!(TimedEvent::parse_line("# recorded session"), Ok(None));
        assert!(matches!(TimedEvent::parse_line("5 lock"), Ok(Some(_))));
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            ("pose fist", ParseEventError::InvalidTimestamp),
            ("-5 pose fist", ParseEventError::InvalidTimestamp),
            ("5", ParseEventError::MissingKind),
            ("5 wiggle", ParseEventError::UnknownKind),
            ("5 pose", ParseEventError::MissingField("pose")),
            ("5 pose clap", ParseEventError::UnknownPose),
            ("5 arm_sync middle", ParseEventError::UnknownArm),
            ("5 orientation 1 0 0", ParseEventError::MissingField("z")),
            ("5 orientation 1 zero 0 0", ParseEventError::InvalidNumber("x")),
            ("5 lock now", ParseEventError::TrailingFields),
        ];
        for (line, error) in cases {
            assert_eq!(line.parse::<TimedEvent>(), Err(error), "{}", line);
        }
        assert_eq!("".parse::<TimedEvent>(), Err(ParseEventError::MissingTimestamp));
    }

    #[test]
    fn test_display_parses_back() {
        let events = [
            TimedEvent::new(1, Events::Orientation(Quaternion::new(0.5, -0.5, 0.5, 0.5))),
            TimedEvent::new(2, Events::Pose(Pose::DoubleTap)),
            TimedEvent::new(3, Events::ArmSynced(Arm::Left)),
            TimedEvent::new(4, Events::Unpaired),
        ];
        for event in events {
            assert_eq!(event.to_string().parse::<TimedEvent>(), Ok(event));
        }
    }

    #[test]
    fn test_nan_component_parses() {
        let parsed: TimedEvent = "7 orientation NaN 0 0 0".parse().unwrap();
        match parsed.event {
            Events::Orientation(quat) => assert!(quat.w.is_nan()),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_arm_letters() {
        assert_eq!(Arm::Left.letter(), 'L');
        assert_eq!(Arm::Right.letter(), 'R');
        assert_eq!(Arm::Unknown.letter(), 'R');
        assert_eq!("unknown".parse::<Arm>(), Ok(Arm::Unknown));
    }
}

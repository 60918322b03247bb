//! Drive Command Module
//!
//! The vehicle understands a closed vocabulary of nine-character text tokens. This module
//! defines that vocabulary as [`Command`], renders commands to tokens and parses tokens
//! back, and declares the [`CommandSink`] seam through which commands leave the pipeline.

use core::fmt;
use core::str::FromStr;

use crate::error::ParseCommandError;

/// Speed step of a move command, 1 (slowest) to 4 (fastest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedLevel {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl SpeedLevel {
    pub const ALL: [SpeedLevel; 4] = [
        SpeedLevel::One,
        SpeedLevel::Two,
        SpeedLevel::Three,
        SpeedLevel::Four,
    ];

    /// Level from its number, `None` outside 1..=4
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SpeedLevel::One),
            2 => Some(SpeedLevel::Two),
            3 => Some(SpeedLevel::Three),
            4 => Some(SpeedLevel::Four),
            _ => None,
        }
    }

    pub const fn level(self) -> u8 {
        self as u8
    }

    /// PWM duty (0-255) the vehicle applies for this level
    pub const fn duty(self) -> u8 {
        match self {
            SpeedLevel::One => 51,
            SpeedLevel::Two => 119,
            SpeedLevel::Three => 187,
            SpeedLevel::Four => 255,
        }
    }
}

/// Enum representing drive commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Stop both tracks
    Stop,
    /// Drive forward at the given speed
    MoveForward(SpeedLevel),
    /// Drive backward at the given speed
    MoveBackward(SpeedLevel),
    /// Turn left while moving forward
    TurnLeftForward,
    /// Turn left while moving backward
    TurnLeftBackward,
    /// Turn right while moving forward
    TurnRightForward,
    /// Turn right while moving backward
    TurnRightBackward,
}

/// Every token is this many ASCII characters
pub const TOKEN_LEN: usize = 9;

const FORWARD_TOKENS: [&str; 4] = ["fwdspd051", "fwdspd119", "fwdspd187", "fwdspd255"];
const BACKWARD_TOKENS: [&str; 4] = ["bwdspd051", "bwdspd119", "bwdspd187", "bwdspd255"];

impl Command {
    /// All thirteen commands of the vocabulary
    pub const ALL: [Command; 13] = [
        Command::Stop,
        Command::MoveForward(SpeedLevel::One),
        Command::MoveForward(SpeedLevel::Two),
        Command::MoveForward(SpeedLevel::Three),
        Command::MoveForward(SpeedLevel::Four),
        Command::MoveBackward(SpeedLevel::One),
        Command::MoveBackward(SpeedLevel::Two),
        Command::MoveBackward(SpeedLevel::Three),
        Command::MoveBackward(SpeedLevel::Four),
        Command::TurnLeftForward,
        Command::TurnLeftBackward,
        Command::TurnRightForward,
        Command::TurnRightBackward,
    ];

    /// Wire token understood by the vehicle
    pub const fn token(self) -> &'static str {
        match self {
            Command::Stop => "stp000000",
            Command::MoveForward(speed) => FORWARD_TOKENS[speed as usize - 1],
            Command::MoveBackward(speed) => BACKWARD_TOKENS[speed as usize - 1],
            Command::TurnLeftForward => "fwdlft000",
            Command::TurnLeftBackward => "bwdlft000",
            Command::TurnRightForward => "fwdrht000",
            Command::TurnRightBackward => "bwdrht000",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Command::ALL
            .into_iter()
            .find(|command| command.token() == token)
            .ok_or(ParseCommandError)
    }
}

/// Destination for drive commands
///
/// Sends are one-way: the sink accepts the command and the pipeline moves on. A sink
/// that cannot deliver handles or reports that on its own.
pub trait CommandSink {
    fn send(&mut self, command: Command);
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn send(&mut self, command: Command) {
        (**self).send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_fixed_width() {
        for command in Command::ALL {
            assert_eq!(command.token().len(), TOKEN_LEN, "{:?}", command);
            assert!(command.token().is_ascii());
        }
    }

    #[test]
    fn test_tokens_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.token(), b.token());
            }
        }
    }

    #[test]
    fn test_speed_tokens_carry_duty() {
        for speed in SpeedLevel::ALL {
            let duty = format!("{:03}", speed.duty());
            assert!(Command::MoveForward(speed).token().ends_with(&duty));
            assert!(Command::MoveBackward(speed).token().ends_with(&duty));
        }
        assert_eq!(Command::MoveForward(SpeedLevel::Three).token(), "fwdspd187");
        assert_eq!(Command::MoveBackward(SpeedLevel::One).token(), "bwdspd051");
    }

    #[test]
    fn test_parse_token() {
        assert_eq!("stp000000".parse::<Command>(), Ok(Command::Stop));
        assert_eq!("bwdrht000\n".parse::<Command>(), Ok(Command::TurnRightBackward));
        assert_eq!(
            "fwdspd255".parse::<Command>(),
            Ok(Command::MoveForward(SpeedLevel::Four))
        );
        assert_eq!("fwdspd100".parse::<Command>(), Err(ParseCommandError));
        assert_eq!("".parse::<Command>(), Err(ParseCommandError));
    }

    #[test]
    fn test_speed_level_numbers() {
        assert_eq!(SpeedLevel::from_level(0), None);
        assert_eq!(SpeedLevel::from_level(3), Some(SpeedLevel::Three));
        assert_eq!(SpeedLevel::from_level(5), None);
        assert_eq!(SpeedLevel::Four.level(), 4);
    }

    #[test]
    fn test_sink_through_reference() {
        struct Recorder(Vec<Command>);
        impl CommandSink for Recorder {
            fn send(&mut self, command: Command) {
                self.0.push(command);
            }
        }

        fn stop(mut sink: impl CommandSink) {
            sink.send(Command::Stop);
        }

        let mut recorder = Recorder(Vec::new());
        stop(&mut recorder);
        stop(&mut recorder);
        assert_eq!(recorder.0, [Command::Stop, Command::Stop]);
    }
}

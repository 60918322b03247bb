//! Command line configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use embassy_time::Duration;
use log::LevelFilter;
use myo_rover::{ControllerConfig, DoubleTapMode};

/// Default controller tick (20 Hz)
const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Drive a remote-controlled vehicle from gesture armband events
#[derive(Debug, Parser)]
#[command(name = "myo-rover", version, about)]
pub struct Cli {
    /// Event feed to read, one event per line (stdin when omitted)
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Replay the feed at the pace of its timestamps
    #[arg(long)]
    pub realtime: bool,

    /// Controller tick in milliseconds
    #[arg(
        long,
        value_name = "MS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_ms: u64,

    /// What a double tap does to the drive direction
    #[arg(long, value_enum, default_value_t = DoubleTap::Toggle)]
    pub double_tap: DoubleTap,

    /// Where commands are sent
    #[arg(long, value_enum, default_value_t = SinkKind::Stdout)]
    pub sink: SinkKind,

    /// Program run once per command, with the token appended as last argument
    #[arg(long, value_name = "PROGRAM", required_if_eq("sink", "exec"))]
    pub exec: Option<String>,

    /// Argument passed to the exec program before the token (repeatable)
    #[arg(long = "exec-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub exec_args: Vec<String>,

    /// Vehicle address for the tcp sink
    #[arg(long, value_name = "HOST:PORT", required_if_eq("sink", "tcp"))]
    pub tcp: Option<String>,

    /// Append debounced pose transitions to this CSV file
    #[arg(long, value_name = "PATH")]
    pub gesture_trace: Option<PathBuf>,

    /// Append sent commands to this CSV file
    #[arg(long, value_name = "PATH")]
    pub command_trace: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,
}

/// Double tap behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DoubleTap {
    /// Flip between forward and backward
    Toggle,
    /// Always switch to backward
    Legacy,
}

/// Command sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// Print one token per line
    Stdout,
    /// Run a program per command
    Exec,
    /// Write one token per line to a TCP connection
    Tcp,
}

impl Cli {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            double_tap: match self.double_tap {
                DoubleTap::Toggle => DoubleTapMode::Toggle,
                DoubleTap::Legacy => DoubleTapMode::Legacy,
            },
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

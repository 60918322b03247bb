//! Vehicle command sinks
//!
//! The vehicle link is one-way: every command is handed over as its nine-character token
//! and never acknowledged. A sink that fails to deliver logs a warning and drops the
//! command; the controller never waits on the vehicle.
//!
//! Available sinks:
//! - [`LineSink`]: one token per line on any writer (stdout)
//! - [`ExecSink`]: runs a helper program per command with the token as last argument
//! - [`TcpSink`]: one token per line over TCP, reconnecting after a failure

use std::io::{self, Write};
use std::net::TcpStream;
use std::process;

use log::{debug, warn};
use myo_rover::{Command, CommandSink};

/// Writes one token per line
pub struct LineSink<W: Write> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CommandSink for LineSink<W> {
    fn send(&mut self, command: Command) {
        if let Err(e) = write_token(&mut self.out, command) {
            warn!("Dropping {}: {}", command, e);
        }
    }
}

fn write_token(out: &mut impl Write, command: Command) -> io::Result<()> {
    writeln!(out, "{}", command.token())?;
    out.flush()
}

/// Runs a program once per command
///
/// The program is started with the configured arguments followed by the token and
/// waited for, so commands reach the vehicle in order.
pub struct ExecSink {
    program: String,
    args: Vec<String>,
}

impl ExecSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl CommandSink for ExecSink {
    fn send(&mut self, command: Command) {
        let status = process::Command::new(&self.program)
            .args(&self.args)
            .arg(command.token())
            .status();
        match status {
            Ok(status) if status.success() => debug!("{} delivered {}", self.program, command),
            Ok(status) => warn!("{} exited with {} for {}", self.program, status, command),
            Err(e) => warn!("Could not run {} for {}: {}", self.program, command, e),
        }
    }
}

/// Streams tokens to the vehicle over TCP
///
/// The connection is opened on the first command. After a write error it is dropped
/// and the next command tries a fresh connection.
pub struct TcpSink {
    addr: String,
    stream: Option<TcpStream>,
}

impl TcpSink {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            stream: None,
        }
    }

    /// Opens the connection right away
    pub fn connect(addr: impl Into<String>) -> io::Result<Self> {
        let mut sink = Self::new(addr);
        sink.stream = Some(sink.open()?);
        Ok(sink)
    }

    fn open(&self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(self.addr.as_str())?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Writes one token, keeping the connection only if the write succeeded
    fn deliver(&mut self, command: Command) -> io::Result<()> {
        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.open()?,
        };
        write_token(&mut stream, command)?;
        self.stream = Some(stream);
        Ok(())
    }
}

impl CommandSink for TcpSink {
    fn send(&mut self, command: Command) {
        if let Err(e) = self.deliver(command) {
            warn!("Dropping {} for {}: {}", command, self.addr, e);
        }
    }
}

//! Gesture controller entry point
//!
//! Opens the event feed and the vehicle link, then spawns the orchestrator task.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use embassy_executor::Spawner;
use log::{error, info};
use myo_rover::{CommandSink, Controller};

use crate::config::{Cli, SinkKind};
use crate::task::{
    drive::{ExecSink, LineSink, TcpSink},
    event_feed,
    orchestrate::orchestrate,
    trace::TraceLog,
};

/// Command line configuration
mod config;
/// Task implementations
mod task;

/// Entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    let (sink, trace) = match open_outputs(&cli) {
        Ok(outputs) => outputs,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    // Start reading only once the outputs are in place
    if let Err(e) = start_feed(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    let controller = Controller::new(cli.controller_config());
    info!("Double tap mode: {:?}", controller.config().double_tap);

    spawner
        .spawn(orchestrate(controller, sink, trace, cli.poll_interval()))
        .unwrap();
}

/// Opens the event feed named on the command line, or stdin
fn open_input(cli: &Cli) -> Result<Box<dyn BufRead + Send>> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening event feed {}", path.display()))?;
            info!("Reading events from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("Reading events from stdin");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

/// Starts the reader thread on the configured input
fn start_feed(cli: &Cli) -> Result<()> {
    let reader = open_input(cli)?;
    event_feed::start(reader, cli.realtime)?;
    Ok(())
}

/// Builds the command sink and the traces
fn open_outputs(cli: &Cli) -> Result<(Box<dyn CommandSink>, TraceLog)> {
    let sink: Box<dyn CommandSink> = match cli.sink {
        SinkKind::Stdout => Box::new(LineSink::new(io::stdout())),
        SinkKind::Exec => {
            let program = cli
                .exec
                .clone()
                .context("--exec is required for the exec sink")?;
            info!("Sending commands through {}", program);
            Box::new(ExecSink::new(program, cli.exec_args.clone()))
        }
        SinkKind::Tcp => {
            let addr = cli
                .tcp
                .clone()
                .context("--tcp is required for the tcp sink")?;
            let sink = TcpSink::connect(addr.as_str())
                .with_context(|| format!("connecting to vehicle at {}", addr))?;
            info!("Sending commands to {}", addr);
            Box::new(sink)
        }
    };

    let trace = TraceLog::open(cli.gesture_trace.as_deref(), cli.command_trace.as_deref())?;
    Ok((sink, trace))
}

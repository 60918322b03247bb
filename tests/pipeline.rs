//! End-to-end runs of the gesture pipeline, driven by feed text the way the host runner
//! delivers it.

use std::collections::VecDeque;

use myo_rover::{
    Command, CommandSink, Controller, ControllerConfig, Direction, DoubleTapMode, EventSource,
    Pose, SpeedLevel, TimedEvent,
};

/// Events parsed from a feed script, handed out one tick at a time
struct Feed {
    ticks: VecDeque<VecDeque<TimedEvent>>,
}

impl Feed {
    /// Each `---` line starts a new tick
    fn parse(script: &str) -> Self {
        let mut ticks = VecDeque::from([VecDeque::new()]);
        for line in script.lines() {
            if line.trim() == "---" {
                ticks.push_back(VecDeque::new());
                continue;
            }
            if let Some(event) = TimedEvent::parse_line(line).unwrap() {
                ticks.back_mut().unwrap().push_back(event);
            }
        }
        Self { ticks }
    }

    fn run(mut self, controller: &mut Controller) -> Vec<Command> {
        let mut sink = Recorder::default();
        while let Some(events) = self.ticks.pop_front() {
            let mut tick = Tick(events);
            controller.tick(&mut tick, &mut sink, |_| {});
        }
        sink.0
    }
}

struct Tick(VecDeque<TimedEvent>);

impl EventSource for Tick {
    fn poll(&mut self) -> Option<TimedEvent> {
        self.0.pop_front()
    }
}

#[derive(Default)]
struct Recorder(Vec<Command>);

impl CommandSink for Recorder {
    fn send(&mut self, command: Command) {
        self.0.push(command);
    }
}

#[test]
fn test_held_poses_send_once() {
    let mut controller = Controller::default();
    let commands = Feed::parse(
        "
        0 arm_sync right
        50000 pose fist
        ---
        100000 pose fist
        ---
        150000 pose waveIn
        ---
        200000 pose rest
        ---
        250000 pose waveIn
        ",
    )
    .run(&mut controller);

    assert_eq!(commands, [Command::Stop, Command::TurnRightForward]);
    assert_eq!(controller.direction(), Direction::Forward);
}

#[test]
fn test_reverse_and_speed_session() {
    let mut controller = Controller::default();
    let commands = Feed::parse(
        "
        # wrist tilted up by 65 degrees: band 15
        0 arm_sync left
        10 unlock
        20 orientation 0.843391 0 0.537300 0
        ---
        30 pose fingersSpread
        40 pose fingersSpread
        ---
        50 pose doubleTap
        60 pose fingersSpread
        ---
        70 pose rest
        80 pose fingersSpread
        90 pose waveOut
        ",
    )
    .run(&mut controller);

    assert_eq!(
        commands,
        [
            Command::MoveForward(SpeedLevel::Three),
            Command::MoveBackward(SpeedLevel::Three),
            Command::TurnLeftBackward,
        ]
    );
    assert_eq!(controller.pitch_band().value(), 15);
    assert_eq!(controller.status().to_string(), "[unlocked][L][waveOut       ]");
}

#[test]
fn test_arm_gating() {
    let mut controller = Controller::default();
    let commands = Feed::parse(
        "
        0 pose waveOut
        ---
        10 arm_sync left
        20 pose waveIn
        ---
        30 arm_unsync
        40 pose fist
        ---
        50 arm_sync left
        60 pose fist
        ",
    )
    .run(&mut controller);

    assert_eq!(commands, [Command::TurnRightForward, Command::Stop]);
}

#[test]
fn test_unpair_levels_wrist() {
    let mut controller = Controller::default();
    let commands = Feed::parse(
        "
        0 arm_sync left
        10 orientation 0.843391 0 0.537300 0
        20 unpair
        ---
        30 arm_sync right
        40 pose fingersSpread
        ",
    )
    .run(&mut controller);

    // Back at the level band the move falls in the dead zone
    assert!(commands.is_empty());
    assert_eq!(controller.state().debouncer.last_acted(), Pose::FingersSpread);
}

#[test]
fn test_legacy_double_tap_never_returns_forward() {
    let mut controller = Controller::new(ControllerConfig {
        double_tap: DoubleTapMode::Legacy,
    });
    let commands = Feed::parse(
        "
        0 arm_sync right
        10 pose doubleTap
        20 pose waveIn
        30 pose doubleTap
        40 pose waveIn
        ",
    )
    .run(&mut controller);

    assert_eq!(
        commands,
        [Command::TurnRightBackward, Command::TurnRightBackward]
    );
}

#[test]
fn test_command_tokens_on_the_wire() {
    let mut controller = Controller::default();
    let tokens: Vec<&str> = Feed::parse(
        "
        0 arm_sync right
        10 pose fist
        20 pose waveOut
        30 pose doubleTap
        40 pose waveIn
        50 pose unknown
        ",
    )
    .run(&mut controller)
    .into_iter()
    .map(Command::token)
    .collect();

    assert_eq!(tokens, ["stp000000", "fwdlft000", "bwdrht000", "stp000000"]);
}

use std::time::Duration;

use crate::config::ServoConfig;
use crate::hal::gate::GateState;
use crate::hal::servo::Servo;
use crate::svc::clock::{Clock, Instant};

/// Open-loop driver for one gate.
///
/// Commands are fire-and-forget: nothing is read back from the servo and a
/// failed write leaves the software state as if the gate had moved.
pub struct Actuator<'a> {
    name: &'static str,
    servo: Box<dyn Servo + 'a>,
    clock: &'a dyn Clock,
    open_angle: u8,
    closed_angle: u8,
    settle: Duration,
    state: GateState,
    last_command: Option<Instant>,
}

impl<'a> Actuator<'a> {
    pub fn new(
        name: &'static str,
        servo: Box<dyn Servo + 'a>,
        clock: &'a dyn Clock,
        config: &ServoConfig,
        settle: Duration,
    ) -> Self {
        Self {
            name,
            servo,
            clock,
            open_angle: config.open_angle,
            closed_angle: config.closed_angle,
            settle,
            state: GateState::Closed,
            last_command: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn open(&mut self) {
        self.command(GateState::Open);
    }

    pub fn close(&mut self) {
        self.command(GateState::Closed);
    }

    fn command(&mut self, target: GateState) {
        let now = self.clock.now();

        if let Some(last) = self.last_command {
            let elapsed = now.duration_since(last);
            if elapsed < self.settle {
                log::warn!(
                    "{} commanded {}ms after previous move, settle is {}ms",
                    self.name,
                    elapsed.as_millis(),
                    self.settle.as_millis()
                );
            }
        }

        let angle = match target {
            GateState::Open => self.open_angle,
            GateState::Closed => self.closed_angle,
        };

        log::debug!("{} -> {:?} ({angle} deg)", self.name, target);

        if let Err(e) = self.servo.write_angle(angle) {
            log::warn!("{}: {e:#}", self.name);
        }

        self.state = target;
        self.last_command = Some(now);
    }
}

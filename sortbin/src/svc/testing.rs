use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::anyhow;

use crate::app::gates::GatePositions;
use crate::config::ServoConfig;
use crate::hal::camera::{Camera, FrameBuffer};
use crate::hal::gate::GateState;
use crate::hal::servo::Servo;
use crate::hal::transport::Transport;
use crate::hal::GateServos;
use crate::svc::clock::{Clock, Instant};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Write { servo: &'static str, angle: u8 },
    Sleep(Duration),
}

/// Servo writes and clock sleeps, in the order they happened.
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Gate positions in effect during each sleep.
    pub fn positions_at_sleeps(&self, servo: &ServoConfig) -> Vec<(Duration, GatePositions)> {
        let mut positions = GatePositions::default();
        let mut result = Vec::new();

        for event in self.events() {
            match event {
                Event::Write { servo: name, angle } => {
                    let state = if angle == servo.open_angle {
                        GateState::Open
                    } else {
                        GateState::Closed
                    };
                    *gate_mut(&mut positions, name) = state;
                }
                Event::Sleep(duration) => result.push((duration, positions)),
            }
        }

        result
    }

    pub fn writes_to(&self, name: &str) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write { servo, angle } if servo == name => Some(angle),
                _ => None,
            })
            .collect()
    }
}

fn gate_mut<'p>(positions: &'p mut GatePositions, name: &str) -> &'p mut GateState {
    match name {
        "entrance" => &mut positions.entrance,
        "plastic" => &mut positions.plastic,
        "paper" => &mut positions.paper,
        "aluminium" => &mut positions.aluminium,
        _ => panic!("unknown servo {name}"),
    }
}

pub struct FakeServo {
    name: &'static str,
    log: EventLog,
}

impl FakeServo {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
        }
    }
}

impl Servo for FakeServo {
    fn write_angle(&mut self, angle: u8) -> anyhow::Result<()> {
        self.log.push(Event::Write {
            servo: self.name,
            angle,
        });
        Ok(())
    }
}

pub struct BrokenServo;

impl Servo for BrokenServo {
    fn write_angle(&mut self, _angle: u8) -> anyhow::Result<()> {
        Err(anyhow!("ledc channel not configured"))
    }
}

pub fn fake_servos(log: &EventLog) -> GateServos<'static> {
    let servo = |name: &'static str| -> Box<dyn Servo> { Box::new(FakeServo::new(name, log)) };

    GateServos {
        entrance: servo("entrance"),
        plastic: servo("plastic"),
        paper: servo("paper"),
        aluminium: servo("aluminium"),
    }
}

/// Virtual time, advanced only by `sleep`.
#[derive(Default)]
pub struct FakeClock {
    now: Cell<u32>,
    log: EventLog,
}

impl FakeClock {
    pub fn new(log: &EventLog) -> Self {
        Self {
            now: Cell::new(0),
            log: log.clone(),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration.as_millis() as u32);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now.get())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        self.log.push(Event::Sleep(duration));
    }
}

/// Serves queued frames and counts buffers given back.
#[derive(Default)]
pub struct FakeCamera {
    frames: VecDeque<Vec<u8>>,
    returned: Rc<Cell<usize>>,
}

impl FakeCamera {
    pub fn with_frames(frames: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            returned: Rc::default(),
        }
    }

    pub fn returned(&self) -> Rc<Cell<usize>> {
        self.returned.clone()
    }
}

struct FakeFrame {
    data: Vec<u8>,
    returned: Rc<Cell<usize>>,
}

impl FrameBuffer for FakeFrame {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for FakeFrame {
    fn drop(&mut self) {
        self.returned.set(self.returned.get() + 1);
    }
}

impl Camera for FakeCamera {
    fn get_frame(&mut self) -> Option<Box<dyn FrameBuffer + '_>> {
        let data = self.frames.pop_front()?;
        Some(Box::new(FakeFrame {
            data,
            returned: self.returned.clone(),
        }))
    }
}

pub fn jpeg_like_frame(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Accepts reads but fails every write.
pub struct BrokenTransport {
    pub lines: VecDeque<String>,
}

impl Transport for BrokenTransport {
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn write_all(&mut self, _data: &[u8]) -> anyhow::Result<()> {
        Err(anyhow!("uart tx timeout"))
    }
}

use crate::hal::camera::Camera;
use crate::hal::servo::Servo;
use crate::hal::transport::Transport;

pub mod camera;
pub mod gate;
pub mod servo;
pub mod transport;

pub struct GateServos<'a> {
    pub entrance: Box<dyn Servo + 'a>,
    pub plastic: Box<dyn Servo + 'a>,
    pub paper: Box<dyn Servo + 'a>,
    pub aluminium: Box<dyn Servo + 'a>,
}

/// Peripherals handed over to the application at startup.
pub struct Platform<'a> {
    pub servos: GateServos<'a>,
    /// `None` if the camera failed to initialize.
    pub camera: Option<Box<dyn Camera + 'a>>,
    pub transport: Box<dyn Transport + 'a>,
}

pub mod camera;
pub mod servo;
pub mod uart;

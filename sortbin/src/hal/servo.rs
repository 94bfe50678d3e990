/// One PWM actuator channel.
pub trait Servo {
    fn write_angle(&mut self, angle: u8) -> anyhow::Result<()>;
}

/// Stands in for a servo that could not be attached.
pub struct DetachedServo;

impl Servo for DetachedServo {
    fn write_angle(&mut self, _angle: u8) -> anyhow::Result<()> {
        Ok(())
    }
}

use std::sync::Arc;

use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcChannel, LedcDriver, LedcTimer, LedcTimerDriver, Resolution};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use sortbin::config::ServoConfig;
use sortbin::hal::servo::Servo;

/// LEDC timer shared by all servo channels, so they update at the same rate.
pub fn servo_timer(
    timer: impl Peripheral<P = impl LedcTimer> + 'static,
    config: &ServoConfig,
) -> anyhow::Result<Arc<LedcTimerDriver<'static>>> {
    let timer_config = TimerConfig::new()
        .frequency(config.frequency_hz.Hz().into())
        .resolution(Resolution::Bits14);

    Ok(Arc::new(LedcTimerDriver::new(timer, &timer_config)?))
}

pub struct EspServo {
    driver: LedcDriver<'static>,
    config: ServoConfig,
}

impl EspServo {
    pub fn new<C: LedcChannel>(
        channel: impl Peripheral<P = C> + 'static,
        timer: Arc<LedcTimerDriver<'static>>,
        pin: impl Peripheral<P = impl OutputPin> + 'static,
        config: &ServoConfig,
    ) -> anyhow::Result<Self> {
        let driver = LedcDriver::new(channel, timer, pin)?;
        Ok(Self {
            driver,
            config: config.clone(),
        })
    }
}

impl Servo for EspServo {
    fn write_angle(&mut self, angle: u8) -> anyhow::Result<()> {
        let duty = self.config.duty(angle, self.driver.get_max_duty());
        self.driver.set_duty(duty)?;
        Ok(())
    }
}

use std::sync::Arc;

use anyhow::anyhow;
use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::ledc::{LedcChannel, LedcTimerDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::peripherals::Peripherals;
use sortbin::config::{ServoConfig, SorterConfig};
use sortbin::hal::camera::Camera;
use sortbin::hal::servo::{DetachedServo, Servo};
use sortbin::hal::{GateServos, Platform};
use sortbin::Error;

use crate::drivers::camera::{CameraPins, EspCamera};
use crate::drivers::servo::{servo_timer, EspServo};
use crate::drivers::uart::UartTransport;

/// AI-Thinker ESP32-CAM sensor wiring.
pub const AI_THINKER_CAMERA_PINS: CameraPins = CameraPins {
    pwdn: 32,
    reset: -1,
    xclk: 0,
    sda: 26,
    scl: 27,
    d: [5, 18, 19, 21, 36, 39, 34, 35],
    vsync: 25,
    href: 23,
    pclk: 22,
};

/// Brings up every peripheral. Only a missing UART is fatal, the camera and
/// servos degrade so the host still gets its replies.
pub fn create(config: &SorterConfig) -> anyhow::Result<Platform<'static>> {
    let peripherals = Peripherals::take().ok_or_else(|| anyhow!("peripherals already taken"))?;

    let camera = match EspCamera::new(&AI_THINKER_CAMERA_PINS, &config.camera) {
        Ok(camera) => Some(Box::new(camera) as Box<dyn Camera>),
        Err(e) => {
            log::error!("{}", Error::peripheral_init("camera", e));
            None
        }
    };

    let pins = peripherals.pins;
    let ledc = peripherals.ledc;

    // The camera owns LEDC timer 0 / channel 0.
    let timer = servo_timer(ledc.timer1, &config.servo)
        .map_err(|e| log::error!("{}", Error::peripheral_init("servo timer", e)))
        .ok();

    let servos = GateServos {
        entrance: attach("entrance", ledc.channel1, &timer, pins.gpio15, &config.servo),
        plastic: attach("plastic", ledc.channel2, &timer, pins.gpio13, &config.servo),
        // Strapping pin, must not be held high at boot.
        paper: attach("paper", ledc.channel3, &timer, pins.gpio12, &config.servo),
        aluminium: attach("aluminium", ledc.channel4, &timer, pins.gpio14, &config.servo),
    };

    let transport = UartTransport::new(
        peripherals.uart0,
        pins.gpio1,
        pins.gpio3,
        config.transport.baud_rate,
    )
    .map_err(|e| Error::peripheral_init("uart", e))?;

    Ok(Platform {
        servos,
        camera,
        transport: Box::new(transport),
    })
}

fn attach<C: LedcChannel>(
    name: &'static str,
    channel: impl Peripheral<P = C> + 'static,
    timer: &Option<Arc<LedcTimerDriver<'static>>>,
    pin: impl Peripheral<P = impl OutputPin> + 'static,
    config: &ServoConfig,
) -> Box<dyn Servo> {
    let Some(timer) = timer else {
        log::warn!("{name} servo detached, no timer");
        return Box::new(DetachedServo);
    };

    match EspServo::new(channel, timer.clone(), pin, config) {
        Ok(servo) => Box::new(servo),
        Err(e) => {
            log::error!("{}", Error::peripheral_init(name, e));
            Box::new(DetachedServo)
        }
    }
}

use std::time::Duration;

#[derive(Debug, Default, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    pub timing: GateTiming,
    pub servo: ServoConfig,
    pub camera: CameraConfig,
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GateTiming {
    /// Time a gate needs to complete a movement.
    pub settle_ms: u32,
    /// Time entrance and category gates are held open while routing.
    pub dwell_ms: u32,
}

impl GateTiming {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms as u64)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms as u64)
    }
}

impl Default for GateTiming {
    fn default() -> Self {
        Self {
            settle_ms: 500,
            dwell_ms: 3000,
        }
    }
}

pub const MAX_ANGLE: u8 = 180;

/// Calibration shared by the four gate servos (SG90).
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    pub open_angle: u8,
    pub closed_angle: u8,
    pub min_pulse_us: u32,
    pub max_pulse_us: u32,
    pub frequency_hz: u32,
}

impl ServoConfig {
    /// Pulse width for `angle`, linear over `[0, MAX_ANGLE]`. Larger angles are clamped.
    pub fn pulse_width_us(&self, angle: u8) -> u32 {
        let angle = angle.min(MAX_ANGLE) as u64;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u64;
        let offset = span * angle / MAX_ANGLE as u64;
        self.min_pulse_us.saturating_add(offset as u32)
    }

    /// Duty cycle for `angle` on a PWM channel whose full period is `max_duty`.
    /// Pulses longer than the period saturate at `max_duty`.
    pub fn duty(&self, angle: u8, max_duty: u32) -> u32 {
        let pulse = self.pulse_width_us(angle) as u128;
        let duty = pulse * max_duty as u128 * self.frequency_hz as u128 / 1_000_000;
        duty.min(max_duty as u128) as u32
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            open_angle: 90,
            closed_angle: 0,
            min_pulse_us: 500,
            max_pulse_us: 2400,
            frequency_hz: 50,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub enum FrameSize {
    Qvga,
    #[default]
    Vga,
    Svga,
    Xga,
    Uxga,
}

impl FrameSize {
    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            FrameSize::Qvga => (320, 240),
            FrameSize::Vga => (640, 480),
            FrameSize::Svga => (800, 600),
            FrameSize::Xga => (1024, 768),
            FrameSize::Uxga => (1600, 1200),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub xclk_freq_hz: u32,
    pub frame_size: FrameSize,
    /// 0-63, lower is better quality.
    pub jpeg_quality: u8,
    pub fb_count: u8,
    pub brightness: i8,
    pub contrast: i8,
    pub saturation: i8,
    pub white_balance: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            xclk_freq_hz: 20_000_000,
            frame_size: FrameSize::Vga,
            jpeg_quality: 12,
            fb_count: 2,
            brightness: 1,
            contrast: 1,
            saturation: 1,
            white_balance: true,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub baud_rate: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

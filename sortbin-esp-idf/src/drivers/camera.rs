use std::marker::PhantomData;
use std::ptr::NonNull;

use anyhow::{anyhow, bail};
use esp_idf_sys::camera;
use esp_idf_sys::esp;
use sortbin::config::{CameraConfig, FrameSize};
use sortbin::hal::camera::{Camera, FrameBuffer};

/// Sensor wiring. `-1` means not connected.
pub struct CameraPins {
    pub pwdn: i32,
    pub reset: i32,
    pub xclk: i32,
    pub sda: i32,
    pub scl: i32,
    pub d: [i32; 8],
    pub vsync: i32,
    pub href: i32,
    pub pclk: i32,
}

pub struct EspCamera {
    _private: (),
}

impl EspCamera {
    /// The driver claims LEDC timer 0 and channel 0 for XCLK.
    pub fn new(pins: &CameraPins, config: &CameraConfig) -> anyhow::Result<Self> {
        let camera_config = camera::camera_config_t {
            pin_pwdn: pins.pwdn,
            pin_reset: pins.reset,
            pin_xclk: pins.xclk,
            __bindgen_anon_1: camera::camera_config_t__bindgen_ty_1 {
                pin_sccb_sda: pins.sda,
            },
            __bindgen_anon_2: camera::camera_config_t__bindgen_ty_2 {
                pin_sccb_scl: pins.scl,
            },
            pin_d0: pins.d[0],
            pin_d1: pins.d[1],
            pin_d2: pins.d[2],
            pin_d3: pins.d[3],
            pin_d4: pins.d[4],
            pin_d5: pins.d[5],
            pin_d6: pins.d[6],
            pin_d7: pins.d[7],
            pin_vsync: pins.vsync,
            pin_href: pins.href,
            pin_pclk: pins.pclk,
            xclk_freq_hz: config.xclk_freq_hz as _,
            ledc_timer: camera::ledc_timer_t_LEDC_TIMER_0,
            ledc_channel: camera::ledc_channel_t_LEDC_CHANNEL_0,
            pixel_format: camera::pixformat_t_PIXFORMAT_JPEG,
            frame_size: to_esp_frame_size(config.frame_size),
            jpeg_quality: config.jpeg_quality as _,
            fb_count: config.fb_count as _,
            fb_location: camera::camera_fb_location_t_CAMERA_FB_IN_PSRAM,
            grab_mode: camera::camera_grab_mode_t_CAMERA_GRAB_LATEST,
            ..Default::default()
        };

        esp!(unsafe { camera::esp_camera_init(&camera_config) })
            .map_err(|e| anyhow!("esp_camera_init: {e}"))?;

        let camera = EspCamera { _private: () };
        camera.tune(config)?;

        log::info!(
            "Camera ready, {:?} {:?} quality {}",
            config.frame_size,
            config.frame_size.dimensions(),
            config.jpeg_quality
        );

        Ok(camera)
    }

    fn tune(&self, config: &CameraConfig) -> anyhow::Result<()> {
        unsafe {
            let sensor = camera::esp_camera_sensor_get();
            if sensor.is_null() {
                bail!("no sensor detected");
            }

            if let Some(set_brightness) = (*sensor).set_brightness {
                set_brightness(sensor, config.brightness as _);
            }
            if let Some(set_contrast) = (*sensor).set_contrast {
                set_contrast(sensor, config.contrast as _);
            }
            if let Some(set_saturation) = (*sensor).set_saturation {
                set_saturation(sensor, config.saturation as _);
            }
            if let Some(set_whitebal) = (*sensor).set_whitebal {
                set_whitebal(sensor, config.white_balance as _);
            }
        }

        Ok(())
    }
}

impl Drop for EspCamera {
    fn drop(&mut self) {
        unsafe {
            camera::esp_camera_deinit();
        }
    }
}

impl Camera for EspCamera {
    fn get_frame(&mut self) -> Option<Box<dyn FrameBuffer + '_>> {
        let fb = NonNull::new(unsafe { camera::esp_camera_fb_get() })?;
        Some(Box::new(EspFrame {
            fb,
            _camera: PhantomData,
        }))
    }
}

/// Driver-owned frame buffer, handed back on drop.
struct EspFrame<'c> {
    fb: NonNull<camera::camera_fb_t>,
    _camera: PhantomData<&'c mut EspCamera>,
}

impl FrameBuffer for EspFrame<'_> {
    fn data(&self) -> &[u8] {
        unsafe {
            let fb = self.fb.as_ref();
            std::slice::from_raw_parts(fb.buf, fb.len as usize)
        }
    }
}

impl Drop for EspFrame<'_> {
    fn drop(&mut self) {
        unsafe { camera::esp_camera_fb_return(self.fb.as_ptr()) }
    }
}

fn to_esp_frame_size(size: FrameSize) -> camera::framesize_t {
    match size {
        FrameSize::Qvga => camera::framesize_t_FRAMESIZE_QVGA,
        FrameSize::Vga => camera::framesize_t_FRAMESIZE_VGA,
        FrameSize::Svga => camera::framesize_t_FRAMESIZE_SVGA,
        FrameSize::Xga => camera::framesize_t_FRAMESIZE_XGA,
        FrameSize::Uxga => camera::framesize_t_FRAMESIZE_UXGA,
    }
}

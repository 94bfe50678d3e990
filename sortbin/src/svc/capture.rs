use crate::error::{Error, Result};
use crate::hal::camera::{Camera, FrameBuffer};

/// One encoded still image, on loan from the camera driver.
///
/// The buffer goes back to the driver pool when the frame is dropped, so it
/// is returned on every path out of the caller.
pub struct Frame<'c> {
    buffer: Box<dyn FrameBuffer + 'c>,
}

impl Frame<'_> {
    pub fn data(&self) -> &[u8] {
        self.buffer.data()
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}

pub struct CaptureService<'a> {
    camera: Option<Box<dyn Camera + 'a>>,
}

impl<'a> CaptureService<'a> {
    pub fn new(camera: Option<Box<dyn Camera + 'a>>) -> Self {
        if camera.is_none() {
            log::warn!("No camera, every capture will fail");
        }
        Self { camera }
    }

    pub fn capture_frame(&mut self) -> Result<Frame<'_>> {
        let camera = self.camera.as_mut().ok_or(Error::CaptureFailed)?;
        let buffer = camera.get_frame().ok_or(Error::CaptureFailed)?;

        log::debug!("Captured {} bytes", buffer.data().len());

        Ok(Frame { buffer })
    }
}

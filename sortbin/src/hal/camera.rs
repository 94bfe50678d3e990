/// A filled buffer borrowed from the camera driver pool.
///
/// Implementations give the buffer back to the driver when dropped.
pub trait FrameBuffer {
    fn data(&self) -> &[u8];
}

pub trait Camera {
    /// `None` when the driver could not produce a frame.
    fn get_frame(&mut self) -> Option<Box<dyn FrameBuffer + '_>>;
}

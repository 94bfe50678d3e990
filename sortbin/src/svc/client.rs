use std::io::{BufRead, Write};

use crate::app::gates::Category;
use crate::svc::protocol::{
    CAPTURE_FAILED_LINE, CAPTURE_TOKEN, DATA_PREFIX, GATE_ACK_PREFIX, READY_LINE, SIZE_PREFIX,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Camera capture failed")]
    CaptureFailed,

    #[error("Unexpected response {0:?}")]
    UnexpectedResponse(String),

    #[error("Connection closed")]
    Closed,

    #[error("Classification failed: {0:#}")]
    Classification(anyhow::Error),
}

/// Confidence the host needs before it moves any gate.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Labels a JPEG frame with a category and a confidence in `[0, 1]`.
pub trait Classifier {
    fn classify(&mut self, jpeg: &[u8]) -> anyhow::Result<(Category, f32)>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOutcome {
    /// The device had no frame to give.
    NoFrame,
    /// Confident enough, the item was routed.
    Routed { category: Category, confidence: f32 },
    /// At or below the threshold, gates left alone.
    Skipped { category: Category, confidence: f32 },
}

/// Host side of the protocol, used by the classifier to drive the bin.
///
/// The device UART also carries the boot ROM and startup log output, so lines
/// that are not protocol messages are skipped while waiting for a reply.
pub struct SorterClient<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> SorterClient<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    pub fn wait_ready(&mut self) -> Result<(), ClientError> {
        self.next_line_where(|line| line == READY_LINE)?;
        Ok(())
    }

    /// Requests one JPEG frame.
    pub fn capture(&mut self) -> Result<Vec<u8>, ClientError> {
        self.send(CAPTURE_TOKEN)?;

        let line = self
            .next_line_where(|line| line == CAPTURE_FAILED_LINE || line.starts_with(SIZE_PREFIX))?;

        if line == CAPTURE_FAILED_LINE {
            return Err(ClientError::CaptureFailed);
        }

        let len: usize = line[SIZE_PREFIX.len()..]
            .parse()
            .map_err(|_| ClientError::UnexpectedResponse(line.clone()))?;

        let mut prefix = [0u8; DATA_PREFIX.len()];
        self.reader.read_exact(&mut prefix)?;
        if prefix != DATA_PREFIX.as_bytes() {
            return Err(ClientError::UnexpectedResponse(
                String::from_utf8_lossy(&prefix).into_owned(),
            ));
        }

        let mut data = vec![0u8; len];
        self.reader.read_exact(&mut data)?;

        let mut terminator = [0u8; 1];
        self.reader.read_exact(&mut terminator)?;
        if terminator != *b"\n" {
            return Err(ClientError::UnexpectedResponse(format!(
                "{:?} after frame data",
                terminator[0] as char
            )));
        }

        Ok(data)
    }

    /// Sends `category` and waits until the device has finished routing it.
    pub fn route(&mut self, category: Category) -> Result<(), ClientError> {
        self.send(category.token())?;

        let line = self.next_line_where(|line| line.starts_with(GATE_ACK_PREFIX))?;
        let expected = format!("{GATE_ACK_PREFIX}{}", category.token());

        if line != expected {
            return Err(ClientError::UnexpectedResponse(line));
        }

        Ok(())
    }

    /// One round of the sorting loop: capture, classify, route if `confidence > threshold`.
    pub fn sort_once(
        &mut self,
        classifier: &mut dyn Classifier,
        threshold: f32,
    ) -> Result<SortOutcome, ClientError> {
        let frame = match self.capture() {
            Ok(frame) => frame,
            Err(ClientError::CaptureFailed) => return Ok(SortOutcome::NoFrame),
            Err(e) => return Err(e),
        };

        let (category, confidence) = classifier
            .classify(&frame)
            .map_err(ClientError::Classification)?;

        if confidence <= threshold {
            log::debug!("{category} at {confidence:.2}, not routing");
            return Ok(SortOutcome::Skipped {
                category,
                confidence,
            });
        }

        log::info!("{category} at {confidence:.2}");
        self.route(category)?;

        Ok(SortOutcome::Routed {
            category,
            confidence,
        })
    }

    fn send(&mut self, token: &str) -> Result<(), ClientError> {
        self.writer.write_all(token.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn next_line_where<F>(&mut self, accept: F) -> Result<String, ClientError>
    where
        F: Fn(&str) -> bool,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                return Err(ClientError::Closed);
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);

            if accept(line) {
                return Ok(line.to_owned());
            }

            log::trace!("skipping {line:?}");
        }
    }
}

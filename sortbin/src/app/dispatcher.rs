use crate::app::gates::GateController;
use crate::error::{Error, Result};
use crate::hal::transport::Transport;
use crate::svc::capture::CaptureService;
use crate::svc::protocol::{Command, Response};

/// Reads commands from the transport and runs them one at a time.
///
/// A command is fully executed, including every gate delay, before the
/// next line is read.
pub struct Dispatcher<'a> {
    transport: Box<dyn Transport + 'a>,
    gates: GateController<'a>,
    capture: CaptureService<'a>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        transport: Box<dyn Transport + 'a>,
        gates: GateController<'a>,
        capture: CaptureService<'a>,
    ) -> Self {
        Self {
            transport,
            gates,
            capture,
        }
    }

    pub fn gates(&self) -> &GateController<'a> {
        &self.gates
    }

    /// Handles at most one line. Returns the command that was executed, if any.
    pub fn step(&mut self) -> Result<Option<Command>> {
        let line = self.transport.read_line().map_err(Error::transport)?;

        let Some(command) = line.as_deref().and_then(Command::parse) else {
            return Ok(None);
        };

        self.dispatch(&command)?;

        Ok(Some(command))
    }

    pub fn dispatch(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Capture => self.capture_and_send(),
            Command::Route(category) => {
                self.gates.route(*category);
                self.send(Response::GateAck(*category))
            }
            Command::Unrecognized(text) => {
                log::warn!("{}", Error::UnrecognizedCommand(text.clone()));
                Ok(())
            }
        }
    }

    pub fn send(&mut self, response: Response) -> Result<()> {
        response
            .write_to(self.transport.as_mut())
            .map_err(Error::transport)
    }

    fn capture_and_send(&mut self) -> Result<()> {
        let transport = self.transport.as_mut();

        match self.capture.capture_frame() {
            Ok(frame) => {
                Response::FrameHeader(frame.len())
                    .write_to(&mut *transport)
                    .map_err(Error::transport)?;
                Response::FrameData(frame.data())
                    .write_to(&mut *transport)
                    .map_err(Error::transport)?;

                log::debug!("Sent frame of {} bytes", frame.len());
                Ok(())
            }
            Err(e) => {
                log::error!("{e}");
                Response::CaptureFailed
                    .write_to(transport)
                    .map_err(Error::transport)
            }
        }
    }
}

//! Line protocol spoken with the classifier host.
//!
//! Inbound, one command per line: `capture`, `plastic`, `paper`, `can`.
//! Outbound:
//!
//! ```text
//! System ready!                      once, after startup
//! SIZE:<n>\nDATA:<n raw bytes>\n     reply to capture
//! Camera capture failed              reply to capture, no frame
//! Gate:<token>                       reply to a category, after routing
//! ```

use crate::app::gates::Category;
use crate::hal::transport::Transport;

pub const CAPTURE_TOKEN: &str = "capture";
pub const READY_LINE: &str = "System ready!";
pub const CAPTURE_FAILED_LINE: &str = "Camera capture failed";
pub const SIZE_PREFIX: &str = "SIZE:";
pub const DATA_PREFIX: &str = "DATA:";
pub const GATE_ACK_PREFIX: &str = "Gate:";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Capture,
    Route(Category),
    Unrecognized(String),
}

impl Command {
    /// Classifies one line. Blank lines carry no command.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();

        if line.is_empty() {
            return None;
        }

        let command = if line == CAPTURE_TOKEN {
            Command::Capture
        } else if let Some(category) = Category::from_token(line) {
            Command::Route(category)
        } else {
            Command::Unrecognized(line.to_owned())
        };

        Some(command)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Response<'d> {
    Ready,
    FrameHeader(usize),
    FrameData(&'d [u8]),
    CaptureFailed,
    /// Echoes the token the host sent, not the category name.
    GateAck(Category),
}

impl Response<'_> {
    pub fn write_to(&self, transport: &mut dyn Transport) -> anyhow::Result<()> {
        match *self {
            Response::Ready => transport.write_all(format!("{READY_LINE}\n").as_bytes())?,
            Response::FrameHeader(len) => {
                transport.write_all(format!("{SIZE_PREFIX}{len}\n").as_bytes())?
            }
            Response::FrameData(data) => {
                transport.write_all(DATA_PREFIX.as_bytes())?;
                transport.write_all(data)?;
                transport.write_all(b"\n")?;
            }
            Response::CaptureFailed => {
                transport.write_all(format!("{CAPTURE_FAILED_LINE}\n").as_bytes())?
            }
            Response::GateAck(category) => transport
                .write_all(format!("{GATE_ACK_PREFIX}{}\n", category.token()).as_bytes())?,
        }

        transport.flush()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Camera capture failed")]
    CaptureFailed,

    #[error("{peripheral} init failed: {reason}")]
    PeripheralInitFailed {
        peripheral: &'static str,
        reason: String,
    },

    #[error("Unrecognized command {0:?}")]
    UnrecognizedCommand(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    pub fn peripheral_init(peripheral: &'static str, err: anyhow::Error) -> Self {
        Error::PeripheralInitFailed {
            peripheral,
            reason: format!("{err:#}"),
        }
    }

    pub(crate) fn transport(err: anyhow::Error) -> Self {
        Error::Transport(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

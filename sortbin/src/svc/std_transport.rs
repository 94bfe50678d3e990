use std::io::{BufRead, Write};

use crate::hal::transport::Transport;

/// Transport over any std reader/writer pair (stdio, a serial device file, buffers).
pub struct StdTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StdTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Transport for StdTransport<R, W> {
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();

        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);

        Ok(Some(line))
    }

    fn write_all(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

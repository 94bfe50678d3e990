/// Longest command accepted from the wire. Longer lines are dropped whole.
pub const MAX_LINE_LEN: usize = 64;

/// Assembles newline-terminated lines from a byte-at-a-time source (UART).
#[derive(Default, Debug)]
pub struct LineBuffer {
    buf: Vec<u8>,
    overflowed: bool,
}

impl LineBuffer {
    /// Feeds one byte. Returns the line, without `\n`, when `byte` completes it.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        if byte == b'\n' {
            let line = std::mem::take(&mut self.buf);

            if std::mem::take(&mut self.overflowed) {
                log::warn!("Discarding line longer than {MAX_LINE_LEN} bytes");
                return None;
            }

            return Some(String::from_utf8_lossy(&line).into_owned());
        }

        if self.overflowed {
            return None;
        }

        if self.buf.len() >= MAX_LINE_LEN {
            self.buf.clear();
            self.overflowed = true;
            return None;
        }

        self.buf.push(byte);
        None
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && !self.overflowed
    }
}

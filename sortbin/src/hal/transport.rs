/// Byte stream to the commanding host.
pub trait Transport {
    /// Next complete line, without its terminator. `None` when no full line is available.
    fn read_line(&mut self) -> anyhow::Result<Option<String>>;

    fn write_all(&mut self, data: &[u8]) -> anyhow::Result<()>;

    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

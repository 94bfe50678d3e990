use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::uart::{config::Config, Uart, UartDriver};
use sortbin::hal::transport::Transport;
use sortbin::svc::line_buffer::LineBuffer;

pub struct UartTransport {
    uart: UartDriver<'static>,
    lines: LineBuffer,
}

impl UartTransport {
    pub fn new(
        uart: impl Peripheral<P = impl Uart> + 'static,
        tx: impl Peripheral<P = impl OutputPin> + 'static,
        rx: impl Peripheral<P = impl InputPin> + 'static,
        baud_rate: u32,
    ) -> anyhow::Result<Self> {
        let config = Config::new().baudrate(Hertz(baud_rate));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;

        Ok(Self {
            uart,
            lines: LineBuffer::default(),
        })
    }
}

impl Transport for UartTransport {
    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut byte = [0u8; 1];

        // Only drain up to the end of the first line, the rest stays in the driver buffer.
        while self.uart.read(&mut byte, NON_BLOCK)? == 1 {
            if let Some(line) = self.lines.push(byte[0]) {
                return Ok(Some(line));
            }
        }

        Ok(None)
    }

    fn write_all(&mut self, mut data: &[u8]) -> anyhow::Result<()> {
        while !data.is_empty() {
            let written = self.uart.write(data)?;
            data = &data[written..];
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.uart.wait_tx_done(BLOCK)?;
        Ok(())
    }
}

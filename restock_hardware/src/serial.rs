use std::io::Read;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, trace, warn};

use crate::error::{HwError, Result};
use crate::util::{LineFramer, read_framed_line};

/// Line-oriented reader over a serial port (USB CDC on the scale's microcontroller).
pub struct SerialLineSource {
    port: Box<dyn SerialPort>,
    framer: LineFramer,
}

impl SerialLineSource {
    /// Open the port, or `None` when no device answers at `path`.
    pub fn try_open(path: &str, baud: u32, timeout: Duration) -> Option<Self> {
        match serialport::new(path, baud).timeout(timeout).open() {
            Ok(port) => {
                debug!(path, baud, "serial port opened");
                Some(Self {
                    port,
                    framer: LineFramer::mid_stream(),
                })
            }
            Err(e) => {
                warn!(path, baud, error = %e, "failed to open serial port; running without sensor");
                None
            }
        }
    }

    pub fn read_line_with_timeout(&mut self, timeout: Duration) -> Result<String> {
        let port = &mut self.port;
        let line = read_framed_line(&mut self.framer, timeout, |buf, remaining| {
            port.set_timeout(remaining)?;
            port.read(buf)
        })?;
        trace!(%line, "serial line");
        Ok(line)
    }

    pub fn discard_input(&mut self) -> Result<()> {
        let queued = self
            .port
            .bytes_to_read()
            .map_err(|e| HwError::Serial(e.to_string()))?;
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| HwError::Serial(e.to_string()))?;
        self.framer.clear(queued > 0);
        Ok(())
    }
}

impl restock_traits::LineSource for SerialLineSource {
    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<String, restock_traits::BoxError> {
        Ok(self.read_line_with_timeout(timeout)?)
    }

    fn flush_input(&mut self) -> std::result::Result<(), restock_traits::BoxError> {
        Ok(self.discard_input()?)
    }
}

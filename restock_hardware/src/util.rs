use std::io;
use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Turn one raw line from the sensor into text: decode UTF-8 and strip the
/// terminator plus surrounding whitespace (firmware sends `"85.30\r\n"`).
pub fn decode_line(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw).map_err(|_| HwError::Encoding)?;
    Ok(text.trim().to_string())
}

/// Split an accumulated byte buffer at the first `\n`, returning the line
/// (without the newline) and leaving the remainder in `buf`.
pub fn take_line(buf: &mut Vec<u8>) -> Option<Vec<u8>> {
    let pos = buf.iter().position(|&b| b == b'\n')?;
    let mut line: Vec<u8> = buf.drain(..=pos).collect();
    line.pop();
    Some(line)
}

/// What [`LineFramer::next_frame`] found in the buffered bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line, without the newline.
    Line(Vec<u8>),
    /// The remainder of a line cut by the last clear was thrown away.
    DroppedTail,
}

/// Accumulates raw serial bytes and hands out whole lines.
///
/// After [`clear`](Self::clear) drops bytes in the middle of a line, the next
/// newline ends a fragment (`5.30` out of `85.30`), so that line is skipped once.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
    resync: bool,
}

impl LineFramer {
    /// A framer attached to a stream of unknown position.
    pub fn mid_stream() -> Self {
        Self {
            pending: Vec::with_capacity(64),
            resync: true,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Forget buffered bytes. `port_had_bytes` says whether the device side
    /// discarded unread input too.
    ///
    /// With nothing buffered anywhere the last byte seen was a newline, so the
    /// stream sits on a line boundary and no skip is needed.
    pub fn clear(&mut self, port_had_bytes: bool) {
        self.resync = port_had_bytes || !self.pending.is_empty();
        self.pending.clear();
    }

    pub fn next_frame(&mut self) -> Option<Frame> {
        let line = take_line(&mut self.pending)?;
        if std::mem::take(&mut self.resync) {
            return Some(Frame::DroppedTail);
        }
        Some(Frame::Line(line))
    }
}

/// Pull bytes with `read(buf, remaining)` until `framer` yields a whole line.
///
/// `read` must return `ErrorKind::TimedOut` once `remaining` passes without data.
/// Dropping a post-flush fragment restarts the deadline, so a slow sender
/// still gets a full `timeout` for the line that follows it.
pub fn read_framed_line<R>(
    framer: &mut LineFramer,
    timeout: Duration,
    mut read: R,
) -> Result<String>
where
    R: FnMut(&mut [u8], Duration) -> io::Result<usize>,
{
    let mut deadline = Instant::now() + timeout;
    let mut chunk = [0u8; 64];
    loop {
        match framer.next_frame() {
            Some(Frame::Line(raw)) => return decode_line(&raw),
            Some(Frame::DroppedTail) => {
                tracing::trace!("dropped partial line after flush");
                deadline = Instant::now() + timeout;
                continue;
            }
            None => {}
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(HwError::Timeout);
        }
        match read(&mut chunk, remaining) {
            Ok(0) => return Err(HwError::Disconnected),
            Ok(n) => framer.push(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => return Err(HwError::Timeout),
            Err(e) => return Err(HwError::Io(e)),
        }
    }
}

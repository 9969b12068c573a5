use std::io::{self, Write};

use crate::engine::pool::Reusable;

/// Coalesces small writes into fewer writes on the wrapped writer.
///
/// A single `write` either lands entirely in the buffer or is forwarded as
/// is; it is never split. The wrapped writer sees at most two calls per
/// `write`: one to drain the buffer and one for oversized input.
#[derive(Debug)]
pub struct OutputBuffer<W> {
    writer: Option<W>,
    buf: Vec<u8>,
    capacity: usize,
}

impl<W> Default for OutputBuffer<W> {
    fn default() -> Self {
        Self {
            writer: None,
            buf: Vec::new(),
            capacity: 0,
        }
    }
}

impl<W: Write> OutputBuffer<W> {
    pub fn new(writer: W, capacity: usize) -> Self {
        let mut bw = Self::default();
        bw.init(writer, capacity);
        bw
    }

    /// Attaches `writer` and empties the buffer, growing storage to `capacity` if needed.
    pub fn init(&mut self, writer: W, capacity: usize) {
        self.buf.clear();
        self.buf.reserve(capacity);
        self.capacity = capacity;
        self.writer = Some(writer);
    }

    #[cfg(test)]
    pub(crate) fn buffered(&self) -> &[u8] {
        &self.buf
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> Option<&W> {
        self.writer.as_ref()
    }

    /// Detaches the wrapped writer. Buffered bytes are not flushed.
    pub fn take_writer(&mut self) -> Option<W> {
        self.writer.take()
    }

    /// Flushes buffered bytes, discarding any error. For cleanup paths.
    pub fn flush_ignore_errors(&mut self) {
        let _ = self.flush_buf();
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = match self.writer.as_mut() {
            Some(writer) => writer.write_all(&self.buf),
            None => Err(detached()),
        };
        self.buf.clear();
        result
    }
}

impl<W: Write> Write for OutputBuffer<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.buf.len() + data.len() <= self.capacity {
            self.buf.extend_from_slice(data);
            return Ok(data.len());
        }

        self.flush_buf()?;

        if data.len() <= self.capacity {
            self.buf.extend_from_slice(data);
        } else {
            self.writer
                .as_mut()
                .ok_or_else(detached)?
                .write_all(data)?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_buf()?;
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl<W> Reusable for OutputBuffer<W> {
    fn reset(&mut self) {
        self.writer = None;
        self.buf.clear();
        self.capacity = 0;
    }
}

fn detached() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "output buffer has no writer")
}

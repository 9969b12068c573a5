use std::io::Write;
use std::mem;

use parking_lot::Mutex;
use tracing::debug;

use super::line_limit::limit_lines;
use super::sorter::ResultSorter;
use crate::engine::pool::Reusable;
use crate::engine::row::write_json_rows;

/// Lifecycle of a [`SortWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Chunks are accumulated; nothing has been written yet.
    Buffering,
    /// The sort buffer overflowed; chunks go straight to the writer.
    Streaming,
    /// A write failed or the row limit was hit. Terminal.
    Failed,
}

/// Emits query output sorted by `_time` when the whole result fits in
/// `max_buffer_bytes`, and as limited unsorted stream otherwise.
///
/// Producers call [`SortWriter::try_write`] concurrently with chunks of
/// complete JSON lines. While the accumulated size stays below
/// `max_buffer_bytes` the chunks are only buffered and
/// [`SortWriter::final_flush`] later writes them sorted. The first chunk that
/// would reach the threshold switches the writer to streaming for good: the
/// buffer and every following chunk are written as they arrive, cut to
/// `max_lines` records in total.
///
/// One lock guards all state and is held across the underlying write, so a
/// slow consumer blocks all producers.
#[derive(Debug)]
pub struct SortWriter<W> {
    inner: Mutex<SortWriterInner<W>>,
}

#[derive(Debug)]
struct SortWriterInner<W> {
    writer: Option<W>,
    state: WriterState,
    buf: Vec<u8>,
    max_buffer_bytes: usize,
    max_lines: usize,
    lines_written: usize,
    sorter: ResultSorter,
}

impl<W> Default for SortWriter<W> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(SortWriterInner {
                writer: None,
                state: WriterState::Buffering,
                buf: Vec::new(),
                max_buffer_bytes: 0,
                max_lines: 0,
                lines_written: 0,
                sorter: ResultSorter::default(),
            }),
        }
    }
}

impl<W: Write> SortWriter<W> {
    pub fn new(writer: W, max_buffer_bytes: usize, max_lines: usize) -> Self {
        let mut sw = Self::default();
        sw.init(writer, max_buffer_bytes, max_lines);
        sw
    }

    /// Prepares the writer for a new query. `max_lines == 0` disables the row limit.
    pub fn init(&mut self, writer: W, max_buffer_bytes: usize, max_lines: usize) {
        let inner = self.inner.get_mut();
        inner.reset();
        inner.writer = Some(writer);
        inner.max_buffer_bytes = max_buffer_bytes;
        inner.max_lines = max_lines;
    }

    /// Accepts a chunk of complete, newline-terminated rows.
    ///
    /// Returns `false` once the writer has failed or the row limit has been
    /// reached; the caller must stop producing and cancel the query.
    pub fn try_write(&self, chunk: &[u8]) -> bool {
        self.inner.lock().try_write(chunk)
    }

    /// Writes the buffered rows sorted by `_time` if the writer never left
    /// the buffering state. Must be called exactly once, after all producers
    /// stopped.
    pub fn final_flush(&self) {
        self.inner.lock().final_flush();
    }

    pub fn state(&self) -> WriterState {
        self.inner.lock().state
    }

    /// Rows counted against `max_lines` so far. Always zero without a limit.
    pub fn lines_written(&self) -> usize {
        self.inner.lock().lines_written
    }

    /// Detaches the wrapped writer so the caller can flush and recycle it.
    pub fn take_writer(&mut self) -> Option<W> {
        self.inner.get_mut().writer.take()
    }
}

impl<W: Write> SortWriterInner<W> {
    fn try_write(&mut self, chunk: &[u8]) -> bool {
        match self.state {
            WriterState::Failed => false,
            WriterState::Streaming => self.write_limited(chunk),
            WriterState::Buffering => {
                if self.buf.len() + chunk.len() < self.max_buffer_bytes {
                    self.buf.extend_from_slice(chunk);
                    return true;
                }

                debug!(
                    target: "log_select::query::output",
                    buffered_bytes = self.buf.len(),
                    max_buffer_bytes = self.max_buffer_bytes,
                    "Sort buffer full, switching to unsorted streaming"
                );
                self.state = WriterState::Streaming;

                let buffered = mem::take(&mut self.buf);
                let flushed = self.write_limited(&buffered);
                self.buf = buffered;
                self.buf.clear();

                flushed && self.write_limited(chunk)
            }
        }
    }

    fn write_limited(&mut self, mut data: &[u8]) -> bool {
        if self.max_lines > 0 {
            if self.lines_written >= self.max_lines {
                debug!(
                    target: "log_select::query::output",
                    max_lines = self.max_lines,
                    "Row limit reached, stopping query output"
                );
                self.state = WriterState::Failed;
                return false;
            }
            let (limited, lines) = limit_lines(data, self.max_lines - self.lines_written);
            self.lines_written += lines;
            data = limited;
        }

        if data.is_empty() {
            return true;
        }

        let result = match self.writer.as_mut() {
            Some(writer) => writer.write_all(data),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "sort writer has no output",
            )),
        };
        if let Err(err) = result {
            debug!(
                target: "log_select::query::output",
                error = %err,
                "Cannot write query output, dropping the rest of the response"
            );
            self.state = WriterState::Failed;
            return false;
        }
        true
    }

    fn final_flush(&mut self) {
        if self.state != WriterState::Buffering {
            return;
        }

        self.sorter.parse(&self.buf);
        self.sorter.sort();
        self.buf.clear();

        let mut rows = self.sorter.rows();
        if self.max_lines > 0 && rows.len() > self.max_lines {
            rows = &rows[..self.max_lines];
        }

        if let Some(writer) = self.writer.as_mut() {
            if let Err(err) = write_json_rows(writer, rows) {
                debug!(
                    target: "log_select::query::output",
                    error = %err,
                    "Cannot write sorted query output"
                );
                self.state = WriterState::Failed;
            }
        }
        self.sorter.reset();
    }
}

impl<W> SortWriterInner<W> {
    fn reset(&mut self) {
        self.writer = None;
        self.state = WriterState::Buffering;
        self.buf.clear();
        self.max_buffer_bytes = 0;
        self.max_lines = 0;
        self.lines_written = 0;
        self.sorter.reset();
    }
}

impl<W> Reusable for SortWriter<W> {
    fn reset(&mut self) {
        self.inner.get_mut().reset();
    }
}

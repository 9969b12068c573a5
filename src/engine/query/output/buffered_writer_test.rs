use std::io::{self, Write};

use crate::engine::pool::Reusable;
use crate::engine::query::output::OutputBuffer;

/// Records every write call it receives.
#[derive(Debug, Default)]
struct RecordingWriter {
    calls: Vec<Vec<u8>>,
    fail: bool,
}

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
        }
        self.calls.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn small_writes_are_coalesced() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 16);
    bw.write_all(b"abc").unwrap();
    bw.write_all(b"def").unwrap();
    assert!(bw.get_ref().unwrap().calls.is_empty());
    assert_eq!(bw.buffered(), b"abcdef");

    bw.flush().unwrap();
    assert_eq!(bw.get_ref().unwrap().calls, vec![b"abcdef".to_vec()]);
    assert!(bw.buffered().is_empty());
}

#[test]
fn overflow_flushes_then_buffers() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 8);
    bw.write_all(b"12345").unwrap();
    bw.write_all(b"6789").unwrap();

    assert_eq!(bw.get_ref().unwrap().calls, vec![b"12345".to_vec()]);
    assert_eq!(bw.buffered(), b"6789");
}

#[test]
fn oversized_write_bypasses_buffer() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 4);
    bw.write_all(b"ab").unwrap();
    bw.write_all(b"0123456789").unwrap();

    assert_eq!(
        bw.get_ref().unwrap().calls,
        vec![b"ab".to_vec(), b"0123456789".to_vec()]
    );
    assert!(bw.buffered().is_empty());
}

#[test]
fn exact_fit_stays_buffered() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 4);
    bw.write_all(b"ab").unwrap();
    bw.write_all(b"cd").unwrap();
    assert!(bw.get_ref().unwrap().calls.is_empty());
    assert_eq!(bw.buffered(), b"abcd");
}

#[test]
fn flush_error_is_propagated_by_write() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 4);
    bw.write_all(b"abc").unwrap();
    bw.take_writer();
    bw.init(
        RecordingWriter {
            calls: Vec::new(),
            fail: true,
        },
        4,
    );
    bw.write_all(b"xyz").unwrap();

    let err = bw.write(b"too long").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn flush_ignore_errors_swallows_failures() {
    let mut bw = OutputBuffer::new(
        RecordingWriter {
            calls: Vec::new(),
            fail: true,
        },
        8,
    );
    bw.write_all(b"data").unwrap();
    bw.flush_ignore_errors();
    assert!(bw.buffered().is_empty());
}

#[test]
fn init_discards_previous_state_and_reset_detaches_writer() {
    let mut bw = OutputBuffer::new(RecordingWriter::default(), 8);
    bw.write_all(b"stale").unwrap();

    bw.init(RecordingWriter::default(), 32);
    assert!(bw.buffered().is_empty());
    bw.write_all(b"fresh").unwrap();
    assert_eq!(bw.buffered(), b"fresh");

    bw.reset();
    assert!(bw.get_ref().is_none());
    assert!(bw.buffered().is_empty());
}

pub mod buffered_writer;
pub mod line_limit;
pub mod sort_writer;
pub mod sorter;
pub mod streamer;

pub use buffered_writer::OutputBuffer;
pub use line_limit::limit_lines;
pub use sort_writer::{SortWriter, WriterState};
pub use sorter::ResultSorter;
pub use streamer::{OutputSettings, ResultStreamer};

#[cfg(test)]
mod buffered_writer_test;
#[cfg(test)]
mod sorter_test;

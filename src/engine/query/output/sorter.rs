use std::mem;

use tracing::error;

use crate::engine::pool::Reusable;
use crate::engine::row::JsonParser;
use crate::engine::types::{Row, TIME_FIELD, field_value};

/// Parses buffered JSON lines back into rows and orders them by `_time`.
///
/// `rows[i]` and `times[i]` always describe the same record.
#[derive(Debug, Default)]
pub struct ResultSorter {
    parser: JsonParser,
    rows: Vec<Row>,
    times: Vec<String>,
    order: Vec<usize>,
    sorted_rows: Vec<Row>,
    sorted_times: Vec<String>,
}

impl ResultSorter {
    /// Appends every non-empty line of `data` as a row.
    ///
    /// # Panics
    ///
    /// `data` must only contain lines produced by the row serializer. A line
    /// that does not parse as a JSON object is a bug and aborts the query.
    pub fn parse(&mut self, data: &[u8]) {
        for line in data.split(|&b| b == b'\n') {
            if line.is_empty() {
                continue;
            }
            let fields = match self.parser.parse_log_message(line) {
                Ok(fields) => fields,
                Err(err) => {
                    error!(
                        target: "log_select::query::output",
                        line = %String::from_utf8_lossy(line),
                        "buffered query output is not valid JSON"
                    );
                    panic!("BUG: unexpected error when parsing buffered rows: {err}");
                }
            };
            let time = field_value(fields, TIME_FIELD).unwrap_or_default().to_string();
            self.rows.push(fields.to_vec());
            self.times.push(time);
        }
    }

    /// Stable ascending sort by `_time`, compared bytewise. Rows without `_time`
    /// sort first.
    pub fn sort(&mut self) {
        self.order.clear();
        self.order.extend(0..self.rows.len());
        let times = &self.times;
        self.order.sort_by(|&i, &j| times[i].cmp(&times[j]));

        self.sorted_rows.clear();
        self.sorted_times.clear();
        for &idx in &self.order {
            self.sorted_rows.push(mem::take(&mut self.rows[idx]));
            self.sorted_times.push(mem::take(&mut self.times[idx]));
        }
        mem::swap(&mut self.rows, &mut self.sorted_rows);
        mem::swap(&mut self.times, &mut self.sorted_times);
        self.sorted_rows.clear();
        self.sorted_times.clear();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[cfg(test)]
    pub(crate) fn times(&self) -> &[String] {
        &self.times
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Reusable for ResultSorter {
    fn reset(&mut self) {
        self.parser.reset();
        self.rows.clear();
        self.times.clear();
        self.order.clear();
        self.sorted_rows.clear();
        self.sorted_times.clear();
    }
}

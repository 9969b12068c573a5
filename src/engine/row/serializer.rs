use std::io::{self, Write};

use crate::engine::types::{DataBlock, Field, Row};

/// Appends `fields` to `dst` as a single JSON object, preserving field order.
pub fn marshal_fields_to_json(dst: &mut Vec<u8>, fields: &[Field]) {
    marshal_pairs_to_json(
        dst,
        fields
            .iter()
            .map(|field| (field.name.as_str(), field.value.as_str())),
    );
}

/// Appends row `row_idx` of `block` to `dst` as a JSON line. Empty values are omitted.
pub fn write_json_row(dst: &mut Vec<u8>, block: &DataBlock, row_idx: usize) {
    marshal_pairs_to_json(dst, block.row_fields(row_idx));
    dst.push(b'\n');
}

/// Serializes `rows` into `w`, one JSON object per line.
pub fn write_json_rows<W: Write + ?Sized>(w: &mut W, rows: &[Row]) -> io::Result<()> {
    let mut line = Vec::with_capacity(256);
    for row in rows {
        line.clear();
        marshal_fields_to_json(&mut line, row);
        line.push(b'\n');
        w.write_all(&line)?;
    }
    Ok(())
}

fn marshal_pairs_to_json<'a>(dst: &mut Vec<u8>, pairs: impl Iterator<Item = (&'a str, &'a str)>) {
    dst.push(b'{');
    for (idx, (name, value)) in pairs.enumerate() {
        if idx > 0 {
            dst.push(b',');
        }
        append_json_string(dst, name);
        dst.push(b':');
        append_json_string(dst, value);
    }
    dst.push(b'}');
}

fn append_json_string(dst: &mut Vec<u8>, s: &str) {
    // Writing into a Vec<u8> never fails.
    let _ = serde_json::to_writer(&mut *dst, s);
}

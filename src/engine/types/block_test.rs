use crate::engine::types::{DataBlock, Field};

#[test]
fn from_rows_pads_missing_fields() {
    let rows = vec![
        vec![Field::new("_time", "t1"), Field::new("_msg", "first")],
        vec![Field::new("_time", "t2"), Field::new("level", "warn")],
    ];

    let block = DataBlock::from_rows(&rows);

    assert_eq!(block.rows_count(), 2);
    assert_eq!(block.columns.len(), 3);
    for column in &block.columns {
        assert_eq!(column.values.len(), 2, "column {} misaligned", column.name);
    }

    let second: Vec<(&str, &str)> = block.row_fields(1).collect();
    assert_eq!(second, vec![("_time", "t2"), ("level", "warn")]);
}

#[test]
fn from_rows_keeps_first_duplicate_field() {
    let rows = vec![vec![Field::new("a", "1"), Field::new("a", "2")]];

    let block = DataBlock::from_rows(&rows);

    assert_eq!(block.rows_count(), 1);
    assert_eq!(block.row_fields(0).collect::<Vec<_>>(), vec![("a", "1")]);
}

#[test]
fn empty_block_has_no_rows() {
    let block = DataBlock::default();
    assert_eq!(block.rows_count(), 0);
    assert_eq!(block.row_fields(0).count(), 0);
}

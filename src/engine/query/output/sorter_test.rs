use crate::engine::pool::Reusable;
use crate::engine::query::output::ResultSorter;
use crate::engine::types::Field;

#[test]
fn parses_rows_and_times_in_parallel() {
    let mut sorter = ResultSorter::default();
    sorter.parse(b"{\"_time\":\"def\",\"_msg\":\"xxx\"}\n\n{\"_msg\":\"no time\"}\n");

    assert_eq!(sorter.len(), 2);
    assert_eq!(sorter.times(), &["def".to_string(), String::new()]);
    assert_eq!(
        sorter.rows()[0],
        vec![Field::new("_time", "def"), Field::new("_msg", "xxx")]
    );
}

#[test]
fn sorts_by_time_bytewise() {
    let mut sorter = ResultSorter::default();
    sorter.parse(
        b"{\"_time\":\"9\",\"n\":\"a\"}\n{\"_time\":\"10\",\"n\":\"b\"}\n{\"_time\":\"1\",\"n\":\"c\"}\n",
    );
    sorter.sort();

    assert_eq!(sorter.times(), &["1", "10", "9"]);
    let names: Vec<&str> = sorter.rows().iter().map(|row| row[1].value.as_str()).collect();
    assert_eq!(names, vec!["c", "b", "a"]);
}

#[test]
fn ties_keep_buffered_order_and_missing_time_sorts_first() {
    let mut sorter = ResultSorter::default();
    sorter.parse(
        b"{\"_time\":\"b\",\"n\":\"1\"}\n{\"n\":\"2\"}\n{\"_time\":\"b\",\"n\":\"3\"}\n{\"_time\":\"a\",\"n\":\"4\"}\n",
    );
    sorter.sort();

    let order: Vec<&str> = sorter
        .rows()
        .iter()
        .map(|row| row.last().map(|f| f.value.as_str()).unwrap_or_default())
        .collect();
    assert_eq!(order, vec!["2", "4", "1", "3"]);
}

#[test]
fn parse_appends_across_calls_until_reset() {
    let mut sorter = ResultSorter::default();
    sorter.parse(b"{\"_time\":\"2\"}\n");
    sorter.parse(b"{\"_time\":\"1\"}\n");
    assert_eq!(sorter.len(), 2);

    sorter.reset();
    assert!(sorter.is_empty());
    assert!(sorter.times().is_empty());
}

#[test]
#[should_panic(expected = "BUG")]
fn malformed_buffered_data_is_fatal() {
    let mut sorter = ResultSorter::default();
    sorter.parse(b"{\"_time\":\"1\"}\nnot json\n");
}

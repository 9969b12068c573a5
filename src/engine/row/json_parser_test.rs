use crate::engine::errors::JsonParseError;
use crate::engine::pool::Reusable;
use crate::engine::row::JsonParser;
use crate::engine::types::Field;

#[test]
fn keeps_source_field_order() {
    let mut parser = JsonParser::new();
    let fields = parser
        .parse_log_message(br#"{"_time":"def","_msg":"xxx","a":"b"}"#)
        .expect("valid json");
    assert_eq!(
        fields,
        &[
            Field::new("_time", "def"),
            Field::new("_msg", "xxx"),
            Field::new("a", "b"),
        ]
    );
}

#[test]
fn flattens_nested_objects_and_stringifies_scalars() {
    let mut parser = JsonParser::new();
    let fields = parser
        .parse_log_message(
            br#"{"req":{"method":"GET","meta":{"status":200,"ok":true}},"tags":["a",1],"gone":null,"ratio":0.5}"#,
        )
        .expect("valid json");
    assert_eq!(
        fields,
        &[
            Field::new("req.method", "GET"),
            Field::new("req.meta.status", "200"),
            Field::new("req.meta.ok", "true"),
            Field::new("tags", r#"["a",1]"#),
            Field::new("ratio", "0.5"),
        ]
    );
}

#[test]
fn empty_object_has_no_fields() {
    let mut parser = JsonParser::new();
    assert!(parser.parse_log_message(b"{}").expect("valid").is_empty());
}

#[test]
fn rejects_non_objects() {
    let mut parser = JsonParser::new();
    match parser.parse_log_message(b"[1,2]") {
        Err(JsonParseError::NotAnObject(kind)) => assert_eq!(kind, "array"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        parser.parse_log_message(b"{\"a\":"),
        Err(JsonParseError::Syntax(_))
    ));
}

#[test]
fn reuse_clears_previous_fields() {
    let mut parser = JsonParser::new();
    parser.parse_log_message(br#"{"a":"1","b":"2"}"#).expect("valid");
    let fields = parser.parse_log_message(br#"{"c":"3"}"#).expect("valid");
    assert_eq!(fields, &[Field::new("c", "3")]);

    parser.reset();
    assert!(parser.fields().is_empty());
}

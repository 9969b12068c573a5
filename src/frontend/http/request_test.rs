use hyper::HeaderMap;
use hyper::header::HeaderValue;

use crate::engine::errors::QueryError;
use crate::engine::types::TenantId;
use crate::frontend::http::request::{QueryRequest, tenant_from_headers};

#[test]
fn parses_query_and_limit() {
    let request = QueryRequest::parse(br#"{"query":"error","limit":5}"#).expect("valid");
    assert_eq!(request.query, "error");
    assert_eq!(request.max_lines(), 5);
}

#[test]
fn missing_or_non_positive_limit_is_unlimited() {
    for body in [
        &br#"{"query":"*"}"#[..],
        &br#"{"query":"*","limit":0}"#[..],
        &br#"{"query":"*","limit":-3}"#[..],
        &br#"{"query":"*","limit":null}"#[..],
    ] {
        let request = QueryRequest::parse(body).expect("valid");
        assert_eq!(request.max_lines(), 0, "body {}", String::from_utf8_lossy(body));
    }
}

#[test]
fn rejects_blank_query_and_bad_json() {
    assert!(matches!(
        QueryRequest::parse(br#"{"query":"  "}"#),
        Err(QueryError::InvalidRequest(_))
    ));
    assert!(matches!(
        QueryRequest::parse(br#"{"limit":1}"#),
        Err(QueryError::InvalidRequest(_))
    ));
    assert!(matches!(
        QueryRequest::parse(b"not json"),
        Err(QueryError::InvalidRequest(_))
    ));
}

#[test]
fn tenant_headers_are_case_insensitive() {
    let mut headers = HeaderMap::new();
    headers.insert("accountid", HeaderValue::from_static("5"));
    headers.insert("PROJECTID", HeaderValue::from_static("6"));
    assert_eq!(tenant_from_headers(&headers).expect("tenant"), TenantId::new(5, 6));
}

#[test]
fn tenant_defaults_without_headers() {
    assert_eq!(
        tenant_from_headers(&HeaderMap::new()).expect("tenant"),
        TenantId::default()
    );
}

#[test]
fn invalid_tenant_header_is_rejected() {
    let mut headers = HeaderMap::new();
    headers.insert("ProjectID", HeaderValue::from_static("-1"));
    let err = tenant_from_headers(&headers).unwrap_err();
    assert!(err.to_string().contains("ProjectID"));
}

#[test]
fn parses_url_and_form_arguments() {
    let request = QueryRequest::from_args("query=error+disk&limit=5", b"").expect("valid");
    assert_eq!(request.query, "error disk");
    assert_eq!(request.max_lines(), 5);

    let request = QueryRequest::from_args("query=url&limit=9", b"query=form").expect("valid");
    assert_eq!(request.query, "form");
    assert_eq!(request.max_lines(), 9);

    let request = QueryRequest::from_args("query=*&limit=", b"").expect("valid");
    assert_eq!(request.max_lines(), 0);
}

#[test]
fn rejects_bad_url_arguments() {
    assert!(matches!(
        QueryRequest::from_args("limit=1", b""),
        Err(QueryError::InvalidRequest(_))
    ));
    assert!(matches!(
        QueryRequest::from_args("query=*&limit=ten", b""),
        Err(QueryError::InvalidRequest(_))
    ));
}

use hyper::HeaderMap;
use serde::Deserialize;

use crate::engine::errors::{QueryError, TenantError};
use crate::engine::types::TenantId;

pub const ACCOUNT_ID_HEADER: &str = "AccountID";
pub const PROJECT_ID_HEADER: &str = "ProjectID";

/// Arguments of a query request, taken from URL/form arguments or a JSON body.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Maximum number of rows to return; absent or non-positive means unlimited.
    #[serde(default)]
    pub limit: Option<i64>,
}

/// `query` and `limit` as they appear in a URL query string or a
/// form-encoded body.
#[derive(Debug, Default, Deserialize)]
struct QueryArgs {
    query: Option<String>,
    limit: Option<String>,
}

impl QueryArgs {
    fn decode(raw: &[u8], source: &str) -> Result<Self, QueryError> {
        serde_urlencoded::from_bytes(raw)
            .map_err(|e| QueryError::InvalidRequest(format!("invalid {source} arguments: {e}")))
    }
}

impl QueryRequest {
    /// Parses a JSON body `{"query": ..., "limit": ...}`.
    pub fn parse(body: &[u8]) -> Result<Self, QueryError> {
        let request: QueryRequest = serde_json::from_slice(body)
            .map_err(|e| QueryError::InvalidRequest(format!("invalid JSON body: {e}")))?;
        request.validated()
    }

    /// Parses `query` and `limit` from the URL query string and an
    /// `application/x-www-form-urlencoded` body. Form values win over URL ones.
    pub fn from_args(url_query: &str, form_body: &[u8]) -> Result<Self, QueryError> {
        let url = QueryArgs::decode(url_query.as_bytes(), "URL")?;
        let form = QueryArgs::decode(form_body, "form")?;

        let limit = match form.limit.or(url.limit) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|e| {
                QueryError::InvalidRequest(format!("cannot parse `limit` value {raw:?}: {e}"))
            })?),
        };

        QueryRequest {
            query: form.query.or(url.query).unwrap_or_default(),
            limit,
        }
        .validated()
    }

    fn validated(self) -> Result<Self, QueryError> {
        if self.query.trim().is_empty() {
            return Err(QueryError::InvalidRequest(
                "missing `query` value".to_string(),
            ));
        }
        Ok(self)
    }

    /// Row cap for the sort writer; `0` disables it.
    pub fn max_lines(&self) -> usize {
        match self.limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(usize::MAX),
            _ => 0,
        }
    }
}

pub fn tenant_from_headers(headers: &HeaderMap) -> Result<TenantId, TenantError> {
    TenantId::from_header_values(
        header_str(headers, ACCOUNT_ID_HEADER)?,
        header_str(headers, PROJECT_ID_HEADER)?,
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<Option<&'a str>, TenantError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|_| TenantError::InvalidId {
            name,
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        }),
    }
}

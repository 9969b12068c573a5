use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode, header};
use tracing::{info, warn};

use super::body::{self, ResponseBody};
use super::request::{QueryRequest, tenant_from_headers};
use crate::engine::errors::QueryError;
use crate::engine::types::TenantId;
use crate::frontend::context::FrontendContext;

pub const QUERY_PATH: &str = "/select/logsql/query";
pub const CONTENT_TYPE_STREAM_JSON: &str = "application/stream+json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Handles `GET` and `POST /select/logsql/query`.
///
/// `query` and `limit` come from URL arguments, a form-encoded body or a
/// JSON body.
///
/// Headers are sent as soon as the request is validated; rows follow as the
/// executor produces them. Errors after that point can only truncate the body.
pub async fn process_query_request<B>(
    req: Request<B>,
    ctx: Arc<FrontendContext>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    if req.method() != Method::GET && req.method() != Method::POST {
        return Ok(error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        ));
    }

    let tenant = match tenant_from_headers(req.headers()) {
        Ok(tenant) => tenant,
        Err(e) => return Ok(error_response(StatusCode::BAD_REQUEST, e.to_string())),
    };

    let url_query = req.uri().query().unwrap_or_default().to_string();
    let is_form = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(CONTENT_TYPE_FORM));

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(target: "log_select::http", "Cannot read query request body: {}", e);
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                format!("cannot read request body: {e}"),
            ));
        }
    };

    let parsed = if is_form {
        QueryRequest::from_args(&url_query, &body)
    } else if body.is_empty() {
        QueryRequest::from_args(&url_query, &[])
    } else {
        QueryRequest::parse(&body)
    };
    let request = match parsed {
        Ok(request) => request,
        Err(e) => return Ok(error_response(StatusCode::BAD_REQUEST, e.to_string())),
    };

    Ok(start_query_stream(ctx, tenant, request))
}

fn start_query_stream(
    ctx: Arc<FrontendContext>,
    tenant: TenantId,
    request: QueryRequest,
) -> Response<ResponseBody> {
    let (writer, response_body) = body::channel(ctx.response_channel_capacity);
    let active = ctx.server_state.begin_query();

    info!(
        target: "log_select::http",
        tenant = %tenant,
        query = %request.query,
        limit = request.max_lines(),
        "Running query"
    );

    let task = tokio::task::spawn_blocking(move || {
        let _active = active;
        ctx.streamer.stream(
            ctx.executor.as_ref(),
            tenant,
            &request.query,
            request.max_lines(),
            writer,
        )
    });
    tokio::spawn(async move {
        match task.await {
            // Dropping the writer ends the response body.
            Ok(Ok(_writer)) => {}
            Ok(Err(e)) => e.log_error(),
            Err(e) => QueryError::Join(e.to_string()).log_error(),
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_STREAM_JSON)
        .body(response_body.boxed())
        .unwrap()
}

pub fn error_response(status: StatusCode, message: String) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(body::full(message))
        .unwrap()
}

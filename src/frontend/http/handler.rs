use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use hyper::body::Body;
use hyper::{Request, Response, StatusCode};

use super::body::ResponseBody;
use super::query::{QUERY_PATH, error_response, process_query_request};
use crate::frontend::context::FrontendContext;

struct HttpHandler {
    ctx: Arc<FrontendContext>,
}

impl HttpHandler {
    fn new(ctx: Arc<FrontendContext>) -> Self {
        Self { ctx }
    }

    fn not_found() -> Response<ResponseBody> {
        error_response(StatusCode::NOT_FOUND, "Not Found".to_string())
    }

    async fn handle<B>(&self, req: Request<B>) -> Result<Response<ResponseBody>, Infallible>
    where
        B: Body,
        B::Error: Display,
    {
        let server_state = &self.ctx.server_state;
        if server_state.is_shutting_down() {
            return Ok(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Server is shutting down".to_string(),
            ));
        }

        if server_state.is_under_pressure() {
            return Ok(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Server is under pressure, please retry later".to_string(),
            ));
        }

        let path = req.uri().path().to_string();
        match path.as_str() {
            QUERY_PATH => process_query_request(req, Arc::clone(&self.ctx)).await,
            _ => Ok(Self::not_found()),
        }
    }
}

pub async fn handle_request<B>(
    req: Request<B>,
    ctx: Arc<FrontendContext>,
) -> Result<Response<ResponseBody>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let handler = HttpHandler::new(ctx);
    handler.handle(req).await
}

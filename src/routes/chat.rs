//! Chat endpoint
//!
//! POST /api/chat takes a message plus optional structured payload and
//! returns a canned or matcher-driven reply. Stateless: nothing about the
//! conversation is stored between requests.

use hyper::{Request, StatusCode};
use std::sync::Arc;
use tracing::debug;

use crate::chat::{dispatch, parse_message, ChatRequest};
use crate::routes::{error_response, json_response, parse_json_body, BoxBody, ErrorResponse};
use crate::server::AppState;

/// POST /api/chat
pub async fn handle_chat(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> hyper::Response<BoxBody> {
    let body: ChatRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    debug!("Chat message from {}: {:?}", body.sender, body.message);

    let kind = parse_message(&body);
    let reply = dispatch(kind, &state.catalog);

    json_response(StatusCode::OK, &reply)
}

//! Scheme catalog endpoints
//!
//! - GET /api/schemes          - list schemes, optionally filtered by type
//! - GET /api/schemes/{name}   - fetch one scheme by name

use hyper::{Request, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{SchemeCategory, SchemeRecord};
use crate::routes::{error_response, json_response, BoxBody, ErrorResponse};
use crate::server::AppState;
use crate::types::GatewayError;

#[derive(Serialize)]
struct SchemeListResponse<'a> {
    schemes: Vec<&'a SchemeRecord>,
}

/// GET /api/schemes?type={central|tn}
///
/// Without a type parameter the full catalog is returned in listing order.
/// An unrecognized type is a 400, not an empty list.
pub fn handle_list_schemes(
    req: &Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> hyper::Response<BoxBody> {
    let category = match query_param(req.uri().query(), "type") {
        None => None,
        Some(raw) => match SchemeCategory::parse(&raw) {
            Some(c) => Some(c),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorResponse::new(format!(
                        "Unknown scheme type '{}', expected 'central' or 'tn'",
                        raw
                    )),
                );
            }
        },
    };

    let schemes = match category {
        Some(category) => state.catalog.list(category),
        None => state.catalog.all().iter().collect(),
    };

    json_response(StatusCode::OK, &SchemeListResponse { schemes })
}

/// GET /api/schemes/{name}
pub fn handle_get_scheme(name: &str, state: Arc<AppState>) -> hyper::Response<BoxBody> {
    let name = urlencoding::decode(name)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| name.to_string());

    match state.catalog.get(&name) {
        Ok(scheme) => json_response(StatusCode::OK, scheme),
        Err(GatewayError::SchemeNotFound(name)) => error_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse::with_code(format!("Scheme '{}' not found", name), "SCHEME_NOT_FOUND"),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &ErrorResponse::new(e.to_string()),
        ),
    }
}

/// Pull one parameter out of a query string, percent-decoded
fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    for pair in query?.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                return Some(
                    urlencoding::decode(value)
                        .map(|s| s.into_owned())
                        .unwrap_or_else(|_| value.to_string()),
                );
            }
        }
    }
    None
}

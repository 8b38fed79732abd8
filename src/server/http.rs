//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling. One task per
//! connection; all handlers share the immutable AppState.

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::JwtValidator;
use crate::catalog::SchemeCatalog;
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes::{self, cors_preflight, json_response, BoxBody};
use crate::types::Result;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// None in dev mode when MongoDB is unreachable
    pub mongo: Option<MongoClient>,
    /// Immutable catalog loaded at startup
    pub catalog: Arc<SchemeCatalog>,
    pub jwt: JwtValidator,
}

impl AppState {
    pub fn new(
        args: Args,
        mongo: Option<MongoClient>,
        catalog: Arc<SchemeCatalog>,
        jwt: JwtValidator,
    ) -> Self {
        Self {
            args,
            mongo,
            catalog,
            jwt,
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Scheme gateway listening on {}", state.args.listen);

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // Auth routes consume the request
    if path.starts_with("/api/auth") {
        if let Some(response) = routes::handle_auth_request(req, Arc::clone(&state)).await {
            return Ok(response);
        }
        return Ok(not_found(&path));
    }

    // Application routes consume the request too
    if path.starts_with("/api/applications") {
        if let Some(response) = routes::handle_applications_request(req, Arc::clone(&state)).await
        {
            return Ok(response);
        }
        return Ok(not_found(&path));
    }

    let response = match (method, path.as_str()) {
        (Method::GET, "/") => welcome(),

        (Method::GET, "/api/health") | (Method::GET, "/health") | (Method::GET, "/healthz") => {
            routes::health_check(Arc::clone(&state))
        }

        (Method::OPTIONS, _) => cors_preflight(),

        (Method::GET, "/api/schemes") => routes::handle_list_schemes(&req, Arc::clone(&state)),

        (Method::GET, p) if p.starts_with("/api/schemes/") => {
            let name = &p["/api/schemes/".len()..];
            if name.is_empty() || name.contains('/') {
                not_found(p)
            } else {
                routes::handle_get_scheme(name, Arc::clone(&state))
            }
        }

        (Method::POST, "/api/chat") => routes::handle_chat(req, Arc::clone(&state)).await,

        (_, p) => not_found(p),
    };

    Ok(response)
}

fn welcome() -> Response<BoxBody> {
    let body = serde_json::json!({
        "service": "scheme-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /api/health",
            "GET /api/schemes?type={central|tn}",
            "GET /api/schemes/{name}",
            "POST /api/chat",
            "POST /api/auth/register",
            "POST /api/auth/login",
            "GET /api/auth/me",
            "POST /api/applications",
        ],
    });

    json_response(StatusCode::OK, &body)
}

fn not_found(path: &str) -> Response<BoxBody> {
    let body = serde_json::json!({ "error": format!("Not found: {}", path) });
    json_response(StatusCode::NOT_FOUND, &body)
}

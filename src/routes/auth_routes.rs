//! Authentication endpoints
//!
//! - POST /api/auth/register - create an account and get a JWT
//! - POST /api/auth/login    - authenticate and get a JWT
//! - GET  /api/auth/me       - current user info from token
//!
//! All three require MongoDB; without it they return 503 so a dev-mode
//! instance still serves the catalog and chat endpoints.

use bson::{doc, oid::ObjectId};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{extract_token_from_header, hash_password, verify_password, Claims, UserRole};
use crate::db::schemas::{UserDoc, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::routes::{
    cors_preflight, error_response, get_auth_header, json_response, parse_json_body, BoxBody,
    ErrorResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub aadhar: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: String,
}

impl UserResponse {
    fn from_doc(user: &UserDoc) -> Self {
        Self {
            id: user
                ._id
                .map(|id| id.to_hex())
                .unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone: user.phone.clone(),
        }
    }
}

/// Route /api/auth/* requests. Returns None for paths outside the prefix.
pub async fn handle_auth_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/api/auth") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = path.split('?').next().unwrap_or(path);

    let response = match (method, path) {
        (&Method::POST, "/api/auth/register") => handle_register(req, state).await,
        (&Method::POST, "/api/auth/login") => handle_login(req, state).await,
        (&Method::GET, "/api/auth/me") => handle_me(req, state).await,

        (_, "/api/auth/register") | (_, "/api/auth/login") | (_, "/api/auth/me") => {
            error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                &ErrorResponse::new("Method not allowed"),
            )
        }

        _ => error_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse::new(format!("Not found: {}", path)),
        ),
    };

    Some(response)
}

fn db_unavailable() -> Response<BoxBody> {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        &ErrorResponse::with_code("Database unavailable", "DB_UNAVAILABLE"),
    )
}

async fn users_collection(mongo: &MongoClient) -> Result<MongoCollection<UserDoc>, Response<BoxBody>> {
    mongo.collection::<UserDoc>(USER_COLLECTION).await.map_err(|e| {
        warn!("Failed to open user collection: {}", e);
        db_unavailable()
    })
}

/// POST /api/auth/register
///
/// Flow:
/// 1. Validate required fields and password length
/// 2. Reject duplicate email with 409
/// 3. Hash password with argon2
/// 4. Store the user and return a JWT
async fn handle_register(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let Some(mongo) = state.mongo.as_ref() else {
        return db_unavailable();
    };

    let body: RegisterRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    if body.name.trim().is_empty()
        || body.email.trim().is_empty()
        || body.password.is_empty()
        || body.aadhar.trim().is_empty()
        || body.phone.trim().is_empty()
    {
        return error_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse::new("Missing required fields: name, email, password, aadhar, phone"),
        );
    }

    if body.password.len() < 8 {
        return error_response(
            StatusCode::BAD_REQUEST,
            &ErrorResponse::new("Password must be at least 8 characters"),
        );
    }

    let users = match users_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let email = body.email.trim().to_lowercase();

    match users.find_one(doc! { "email": &email }).await {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::CONFLICT,
                &ErrorResponse::with_code("Email already registered", "EMAIL_EXISTS"),
            );
        }
        Ok(None) => {}
        Err(e) => {
            warn!("User lookup failed: {}", e);
            return db_unavailable();
        }
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            warn!("Password hashing failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new("Registration failed"),
            );
        }
    };

    let mut user = UserDoc::new(
        body.name.trim().to_string(),
        email,
        password_hash,
        body.aadhar.trim().to_string(),
        body.phone.trim().to_string(),
    );

    let user_id = match users.insert_one(user.clone()).await {
        Ok(id) => id,
        Err(e) => {
            // Unique index on email catches a concurrent duplicate registration
            let msg = e.to_string();
            if msg.contains("E11000") || msg.contains("duplicate key") {
                return error_response(
                    StatusCode::CONFLICT,
                    &ErrorResponse::with_code("Email already registered", "EMAIL_EXISTS"),
                );
            }
            warn!("User insert failed: {}", e);
            return db_unavailable();
        }
    };
    user._id = Some(user_id);

    let (token, expires_at) =
        match state
            .jwt
            .issue(&user_id.to_hex(), &user.email, &user.name, user.role)
        {
            Ok(t) => t,
            Err(e) => {
                warn!("Token issue failed: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorResponse::new("Registration failed"),
                );
            }
        };

    info!("Registered user {}", user.email);

    json_response(
        StatusCode::CREATED,
        &AuthResponse {
            token,
            expires_at,
            user: UserResponse::from_doc(&user),
        },
    )
}

/// POST /api/auth/login
///
/// Invalid email and invalid password both return the same generic 401.
async fn handle_login(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let Some(mongo) = state.mongo.as_ref() else {
        return db_unavailable();
    };

    let body: LoginRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    let users = match users_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let email = body.email.trim().to_lowercase();
    let invalid_credentials = || {
        error_response(
            StatusCode::UNAUTHORIZED,
            &ErrorResponse::new("Invalid email or password"),
        )
    };

    let user = match users
        .find_one(doc! { "email": &email, "is_active": true })
        .await
    {
        Ok(Some(u)) => u,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            warn!("User lookup failed: {}", e);
            return db_unavailable();
        }
    };

    match verify_password(&body.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            warn!("Password verification failed for {}: {}", email, e);
            return invalid_credentials();
        }
    }

    let user_id = match user._id {
        Some(id) => id,
        None => {
            warn!("User document for {} has no _id", email);
            return invalid_credentials();
        }
    };

    let (token, expires_at) =
        match state
            .jwt
            .issue(&user_id.to_hex(), &user.email, &user.name, user.role)
        {
            Ok(t) => t,
            Err(e) => {
                warn!("Token issue failed: {}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorResponse::new("Login failed"),
                );
            }
        };

    info!("User {} logged in", user.email);

    json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            expires_at,
            user: UserResponse::from_doc(&user),
        },
    )
}

/// GET /api/auth/me
async fn handle_me(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Response<BoxBody> {
    let Some(mongo) = state.mongo.as_ref() else {
        return db_unavailable();
    };

    let claims = match authenticate(&req, &state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let users = match users_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let user_id = match ObjectId::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                &ErrorResponse::new("Invalid token subject"),
            );
        }
    };

    match users.find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => json_response(StatusCode::OK, &UserResponse::from_doc(&user)),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse::new("User no longer exists"),
        ),
        Err(e) => {
            warn!("User lookup failed: {}", e);
            db_unavailable()
        }
    }
}

/// Verify the bearer token on a request, returning claims or an error response
pub(crate) fn authenticate(
    req: &Request<hyper::body::Incoming>,
    state: &AppState,
) -> Result<Claims, Response<BoxBody>> {
    let token = extract_token_from_header(get_auth_header(req)).ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            &ErrorResponse::new("Missing Authorization header"),
        )
    })?;

    state.jwt.verify(token).map_err(|e| {
        error_response(StatusCode::UNAUTHORIZED, &ErrorResponse::new(e.to_string()))
    })
}

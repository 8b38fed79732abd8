//! Scheme application endpoints
//!
//! - POST /api/applications              - submit an application (authenticated)
//! - GET  /api/applications/user         - list the caller's applications
//! - GET  /api/applications/admin        - list all applications (admin)
//! - PUT  /api/applications/{id}/status  - approve or reject (admin)

use bson::{doc, oid::ObjectId, DateTime};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{Claims, UserRole};
use crate::db::schemas::{ApplicationDoc, ApplicationStatus, APPLICATION_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::routes::auth_routes::authenticate;
use crate::routes::{
    cors_preflight, error_response, json_response, parse_json_body, BoxBody, ErrorResponse,
};
use crate::server::AppState;
use crate::types::GatewayError;

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub scheme: String,
    /// Free-form answers keyed by question id
    #[serde(default)]
    pub answers: serde_json::Map<String, serde_json::Value>,
    /// Names of uploaded supporting documents
    #[serde(default)]
    pub documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub reference: String,
    pub scheme: String,
    pub status: ApplicationStatus,
    pub documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl ApplicationResponse {
    fn from_doc(doc: &ApplicationDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            reference: doc.reference.clone(),
            scheme: doc.scheme.clone(),
            status: doc.status,
            documents: doc.documents.clone(),
            submitted_at: doc
                .metadata
                .created_at
                .map(|t| t.try_to_rfc3339_string().unwrap_or_default()),
            reviewed_at: doc
                .reviewed_at
                .map(|t| t.try_to_rfc3339_string().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ApplicationListResponse {
    applications: Vec<ApplicationResponse>,
}

/// Route /api/applications* requests. Returns None for paths outside the prefix.
pub async fn handle_applications_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Option<Response<BoxBody>> {
    let path = req.uri().path();
    let method = req.method();

    if !path.starts_with("/api/applications") {
        return None;
    }

    if method == Method::OPTIONS {
        return Some(cors_preflight());
    }

    let path = path.split('?').next().unwrap_or(path).to_string();

    let response = match (method, path.as_str()) {
        (&Method::POST, "/api/applications") => handle_create(req, state).await,
        (&Method::GET, "/api/applications/user") => handle_list_own(req, state).await,
        (&Method::GET, "/api/applications/admin") => handle_list_all(req, state).await,
        (&Method::PUT, p) => {
            match p
                .strip_prefix("/api/applications/")
                .and_then(|rest| rest.strip_suffix("/status"))
            {
                Some(id) => handle_update_status(req, state, id).await,
                None => error_response(
                    StatusCode::NOT_FOUND,
                    &ErrorResponse::new(format!("Not found: {}", p)),
                ),
            }
        }
        (_, p) => error_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse::new(format!("Not found: {}", p)),
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

async fn applications_collection(
    mongo: &MongoClient,
) -> Result<MongoCollection<ApplicationDoc>, Response<BoxBody>> {
    mongo
        .collection::<ApplicationDoc>(APPLICATION_COLLECTION)
        .await
        .map_err(|e| {
            warn!("Failed to open application collection: {}", e);
            db_unavailable()
        })
}

fn require_admin(claims: &Claims) -> Result<(), Response<BoxBody>> {
    if claims.role >= UserRole::Admin {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::FORBIDDEN,
            &ErrorResponse::new("Admin access required"),
        ))
    }
}

/// POST /api/applications
async fn handle_create(
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

    let body: CreateApplicationRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    // Applications are only accepted for schemes in the catalog
    let scheme = match state.catalog.get(&body.scheme) {
        Ok(s) => s,
        Err(GatewayError::SchemeNotFound(name)) => {
            return error_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse::with_code(
                    format!("Scheme '{}' not found", name),
                    "SCHEME_NOT_FOUND",
                ),
            );
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            );
        }
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

    let answers = match bson::to_document(&body.answers) {
        Ok(d) => d,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!("Invalid answers payload: {}", e)),
            );
        }
    };

    let applications = match applications_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let mut application =
        ApplicationDoc::new(user_id, scheme.name.clone(), answers, body.documents);

    let id = match applications.insert_one(application.clone()).await {
        Ok(id) => id,
        Err(e) => {
            warn!("Application insert failed: {}", e);
            return db_unavailable();
        }
    };
    application._id = Some(id);

    info!(
        "Application {} submitted by {} for scheme {}",
        application.reference, claims.email, application.scheme
    );

    json_response(
        StatusCode::CREATED,
        &ApplicationResponse::from_doc(&application),
    )
}

/// GET /api/applications/user
async fn handle_list_own(
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

    let user_id = match ObjectId::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                &ErrorResponse::new("Invalid token subject"),
            );
        }
    };

    let applications = match applications_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match applications
        .find_sorted(doc! { "user_id": user_id }, doc! { "metadata.created_at": -1 })
        .await
    {
        Ok(docs) => json_response(
            StatusCode::OK,
            &ApplicationListResponse {
                applications: docs.iter().map(ApplicationResponse::from_doc).collect(),
            },
        ),
        Err(e) => {
            warn!("Application listing failed: {}", e);
            db_unavailable()
        }
    }
}

/// GET /api/applications/admin
async fn handle_list_all(
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
    if let Err(resp) = require_admin(&claims) {
        return resp;
    }

    let applications = match applications_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    match applications
        .find_sorted(doc! {}, doc! { "metadata.created_at": -1 })
        .await
    {
        Ok(docs) => json_response(
            StatusCode::OK,
            &ApplicationListResponse {
                applications: docs.iter().map(ApplicationResponse::from_doc).collect(),
            },
        ),
        Err(e) => {
            warn!("Application listing failed: {}", e);
            db_unavailable()
        }
    }
}

/// PUT /api/applications/{id}/status
async fn handle_update_status(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    id: &str,
) -> Response<BoxBody> {
    let Some(mongo) = state.mongo.as_ref() else {
        return db_unavailable();
    };

    let claims = match authenticate(&req, &state) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(resp) = require_admin(&claims) {
        return resp;
    }

    let application_id = match ObjectId::parse_str(id) {
        Ok(oid) => oid,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!("Invalid application id '{}'", id)),
            );
        }
    };

    let body: UpdateStatusRequest = match parse_json_body(req).await {
        Ok(b) => b,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, &ErrorResponse::new(e.to_string()));
        }
    };

    let status = match ApplicationStatus::parse(&body.status) {
        Some(s) => s,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!(
                    "Unknown status '{}', expected pending, approved or rejected",
                    body.status
                )),
            );
        }
    };

    let applications = match applications_collection(mongo).await {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let update = doc! {
        "$set": {
            "status": status.to_string(),
            "reviewed_at": DateTime::now(),
            "metadata.updated_at": DateTime::now(),
        }
    };

    match applications
        .update_one(doc! { "_id": application_id }, update)
        .await
    {
        Ok(result) if result.matched_count == 0 => {
            return error_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse::new(format!("Application '{}' not found", id)),
            );
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Application update failed: {}", e);
            return db_unavailable();
        }
    }

    info!("Application {} marked {} by {}", id, status, claims.email);

    // Return the reviewed application in full, not just the new status
    match applications.find_one(doc! { "_id": application_id }).await {
        Ok(Some(application)) => {
            json_response(StatusCode::OK, &ApplicationResponse::from_doc(&application))
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            &ErrorResponse::new(format!("Application '{}' not found", id)),
        ),
        Err(e) => {
            warn!("Application fetch after update failed: {}", e);
            db_unavailable()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reviewed_application_response_carries_full_document() {
        let mut application = ApplicationDoc::new(
            ObjectId::new(),
            "PM-KISAN".into(),
            doc! { "land_holding": "1.5 acres" },
            vec!["aadhar.pdf".into()],
        );
        application._id = Some(ObjectId::new());
        application.status = ApplicationStatus::Approved;
        application.reviewed_at = Some(DateTime::now());

        let response = ApplicationResponse::from_doc(&application);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "approved");
        assert_eq!(value["scheme"], "PM-KISAN");
        assert_eq!(value["reference"], application.reference);
        assert_eq!(value["documents"][0], "aadhar.pdf");
        assert!(value["submittedAt"].is_string());
        assert!(value["reviewedAt"].is_string());
        assert!(!value["id"].as_str().unwrap().is_empty());
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{FromRequest, Multipart, Path, Request, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{error, info};
use velo_benefit_api::{
    AdvanceBenefitRequest, AdvanceBenefitResponse, ApiError, BearerClaims, BenefitStatusResponse,
    BenefitSummaryResponse, BulkInvitePipeline, IngestReport, advance_benefit, benefit_status,
    benefit_status_summary, decode_bearer_claims,
};
use velo_benefit_domain::{Company, EmailAddress, EmployeeProfile, ProfileStatus};
use velo_benefit_store::{
    BenefitStore, InviteStore, MemoryStore, ProfileStore, RestStore, RoleStore, StoreConfig,
};

/// Upper bound on an uploaded CSV body.
const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Velo Benefit Server - HTTP server for the Velo Benefit system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the external store service. If not provided, an
    /// in-memory store with demo data is used.
    #[arg(long, env = "VELO_STORE_URL")]
    store_url: Option<String>,

    /// Service credential for the external store.
    #[arg(long, env = "VELO_SERVICE_KEY")]
    service_key: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
///
/// Each field is one external collaborator behind its trait; in
/// production all four point at the same REST store.
#[derive(Clone)]
struct AppState {
    /// The invite store.
    invites: Arc<dyn InviteStore>,
    /// The authoritative role store.
    roles: Arc<dyn RoleStore>,
    /// The tenant/profile store.
    profiles: Arc<dyn ProfileStore>,
    /// The benefit record store.
    benefits: Arc<dyn BenefitStore>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// The machine-readable error code.
    error: String,
    /// The machine-readable reason code, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The machine-readable error code.
    error: String,
    /// The machine-readable reason code, when one applies.
    reason: Option<String>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.error,
            reason: self.reason,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidCredential { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. }
            | ApiError::ProfileNotFound
            | ApiError::NoCompanyAssigned => StatusCode::FORBIDDEN,
            ApiError::NoFile
            | ApiError::EmptyCsv
            | ApiError::NoRows
            | ApiError::MissingHeader { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::DomainRuleViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::RoleLookupFailed { .. }
            | ApiError::ProfileLookupFailed { .. }
            | ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %err, "Upstream dependency failure");
        }

        Self {
            status,
            error: String::from(err.error_code()),
            reason: err.reason_code().map(ToString::to_string),
        }
    }
}

/// Reads the `Authorization` header value, if present.
fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

/// Decodes the caller's claims from the request headers.
fn claims_from_headers(headers: &HeaderMap) -> Result<BearerClaims, HttpError> {
    let authorization: Option<String> = authorization_header(headers);
    decode_bearer_claims(authorization.as_deref())
        .map_err(|e| HttpError::from(ApiError::from(e)))
}

/// Extracts the CSV text from the first file part of a multipart body.
async fn csv_from_multipart(mut multipart: Multipart) -> Result<String, HttpError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(HttpError::from(ApiError::NoFile)),
            Err(e) => {
                return Err(HttpError::from(ApiError::InvalidInput {
                    field: String::from("body"),
                    message: format!("Malformed multipart body: {e}"),
                }));
            }
        };

        if field.file_name().is_none() {
            continue;
        }

        return field.text().await.map_err(|e| {
            HttpError::from(ApiError::InvalidInput {
                field: String::from("file"),
                message: format!("Failed to read file part: {e}"),
            })
        });
    }
}

/// Handler for POST `/bulk-create`.
///
/// Accepts the CSV as raw body text or as a file field within a
/// multipart body, and runs the guarded bulk-ingestion pipeline.
async fn handle_bulk_create(
    AxumState(state): AxumState<AppState>,
    request: Request,
) -> Result<Json<IngestReport>, HttpError> {
    let authorization: Option<String> = authorization_header(request.headers());
    let content_type: String = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let csv_content: String = if content_type.starts_with("multipart/form-data") {
        let multipart: Multipart = Multipart::from_request(request, &()).await.map_err(|e| {
            HttpError::from(ApiError::InvalidInput {
                field: String::from("body"),
                message: format!("Malformed multipart body: {e}"),
            })
        })?;
        csv_from_multipart(multipart).await?
    } else {
        let bytes = to_bytes(request.into_body(), MAX_UPLOAD_BYTES)
            .await
            .map_err(|e| {
                HttpError::from(ApiError::InvalidInput {
                    field: String::from("body"),
                    message: format!("Failed to read request body: {e}"),
                })
            })?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    info!(bytes = csv_content.len(), "Handling bulk-create request");

    let pipeline: BulkInvitePipeline<'_> = BulkInvitePipeline::new(
        state.invites.as_ref(),
        state.roles.as_ref(),
        state.profiles.as_ref(),
    );
    let report: IngestReport = pipeline.run(authorization.as_deref(), &csv_content).await?;

    Ok(Json(report))
}

/// Handler for GET `/benefits/{user_id}`.
async fn handle_benefit_status(
    AxumState(state): AxumState<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BenefitStatusResponse>, HttpError> {
    let claims: BearerClaims = claims_from_headers(&headers)?;

    let response: BenefitStatusResponse =
        benefit_status(state.benefits.as_ref(), &claims, &user_id).await?;

    Ok(Json(response))
}

/// Handler for POST `/benefits/{user_id}/advance`.
async fn handle_advance_benefit(
    AxumState(state): AxumState<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<AdvanceBenefitRequest>,
) -> Result<Json<AdvanceBenefitResponse>, HttpError> {
    let claims: BearerClaims = claims_from_headers(&headers)?;

    info!(
        user_id = %user_id,
        subject = %claims.subject,
        command = request.command.name(),
        "Handling advance request"
    );

    let response: AdvanceBenefitResponse = advance_benefit(
        state.benefits.as_ref(),
        &claims,
        &user_id,
        request,
        OffsetDateTime::now_utc(),
    )
    .await?;

    Ok(Json(response))
}

/// Handler for GET `/benefits/summary`.
async fn handle_benefit_summary(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<BenefitSummaryResponse>, HttpError> {
    let claims: BearerClaims = claims_from_headers(&headers)?;

    let response: BenefitSummaryResponse =
        benefit_status_summary(state.benefits.as_ref(), state.profiles.as_ref(), &claims).await?;

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/bulk-create", post(handle_bulk_create))
        .route("/benefits/summary", get(handle_benefit_summary))
        .route("/benefits/{user_id}", get(handle_benefit_status))
        .route("/benefits/{user_id}/advance", post(handle_advance_benefit))
        .with_state(app_state)
}

/// Seeds the in-memory store with a demo tenant so local runs can
/// exercise the pipeline without an external store.
async fn seed_demo_tenant(store: &MemoryStore) {
    store
        .seed_company(Company {
            id: String::from("demo-company"),
            name: String::from("Demo Company"),
            monthly_subsidy: 50,
            contract_months: 36,
        })
        .await;
    if let Ok(email) = EmailAddress::new("hr@demo.local") {
        store
            .seed_profile(EmployeeProfile {
                user_id: String::from("demo-hr"),
                email,
                company_id: Some(String::from("demo-company")),
                status: ProfileStatus::Active,
            })
            .await;
    }
    store.seed_role("demo-hr", "hr").await;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Velo Benefit Server");

    // Initialize the store boundary (REST or in-memory based on CLI
    // arguments).
    let app_state: AppState = match (args.store_url, args.service_key) {
        (Some(base_url), Some(service_key)) => {
            info!("Using REST store at: {}", base_url);
            let rest: Arc<RestStore> = Arc::new(RestStore::new(StoreConfig {
                base_url,
                service_key,
            }));
            AppState {
                invites: rest.clone(),
                roles: rest.clone(),
                profiles: rest.clone(),
                benefits: rest,
            }
        }
        _ => {
            info!("Using in-memory store with demo tenant 'demo-company'");
            let memory: Arc<MemoryStore> = Arc::new(MemoryStore::new());
            seed_demo_tenant(&memory).await;
            AppState {
                invites: memory.clone(),
                roles: memory.clone(),
                profiles: memory.clone(),
                benefits: memory,
            }
        }
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

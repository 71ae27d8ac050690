use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationId, ResidentId, ResidentSubmission, SchemeId, SchemeSubmission};
use super::identity::{Caller, IdentityError, TokenVerifier};
use super::lifecycle::{can_review, LifecycleError};
use super::repository::{StoreError, WelfareStore};
use super::service::{ApplicationRequest, ReviewRequest, ServiceError, WelfareService};

/// Shared handler state: the service facade plus the token verifier.
pub struct WelfareState<S> {
    pub service: Arc<WelfareService<S>>,
    pub identity: Arc<TokenVerifier>,
}

impl<S> Clone for WelfareState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            identity: Arc::clone(&self.identity),
        }
    }
}

/// Router builder exposing the eligibility, application and registry endpoints.
pub fn welfare_router<S>(service: Arc<WelfareService<S>>, identity: Arc<TokenVerifier>) -> Router
where
    S: WelfareStore + 'static,
{
    Router::new()
        .route("/api/eligibility", post(eligibility_handler::<S>))
        .route(
            "/api/applications",
            get(list_applications_handler::<S>).post(submit_handler::<S>),
        )
        .route(
            "/api/applications/:application_id",
            get(application_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/review",
            patch(review_handler::<S>),
        )
        .route(
            "/api/residents",
            get(list_residents_handler::<S>).post(register_resident_handler::<S>),
        )
        .route(
            "/api/residents/:resident_id",
            get(resident_handler::<S>)
                .put(update_resident_handler::<S>)
                .delete(delete_resident_handler::<S>),
        )
        .route(
            "/api/schemes",
            get(list_schemes_handler::<S>).post(create_scheme_handler::<S>),
        )
        .route(
            "/api/schemes/:scheme_id",
            get(scheme_handler::<S>)
                .put(update_scheme_handler::<S>)
                .delete(delete_scheme_handler::<S>),
        )
        .with_state(WelfareState { service, identity })
}

#[async_trait]
impl<S> FromRequestParts<WelfareState<S>> for Caller
where
    S: WelfareStore + 'static,
{
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WelfareState<S>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        state.identity.authenticate(authorization)
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } | ServiceError::Store(StoreError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Conflict(_)
            | ServiceError::InvalidArgument(_)
            | ServiceError::Store(StoreError::Conflict)
            | ServiceError::Store(StoreError::InUse) => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotEligible(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "welfare request failed");
        }
        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::InvalidArgument(rejection.body_text()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EligibilityRequest {
    #[serde(default)]
    pub(crate) resident_id: String,
    #[serde(default)]
    pub(crate) scheme_id: String,
}

pub(crate) async fn eligibility_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    payload: Result<Json<EligibilityRequest>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let request = json_body(payload)?;
    for (field, value) in [
        ("residentId", &request.resident_id),
        ("schemeId", &request.scheme_id),
    ] {
        if value.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(format!("{field} is required")));
        }
    }

    let report = state.service.check_eligibility(
        &ResidentId(request.resident_id.trim().to_string()),
        &SchemeId(request.scheme_id.trim().to_string()),
    )?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

pub(crate) async fn submit_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    payload: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let record = state.service.apply(json_body(payload)?)?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

pub(crate) async fn list_applications_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let records = state.service.applications()?;
    Ok(Json(records).into_response())
}

pub(crate) async fn application_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(application_id): Path<String>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let record = state.service.application(&ApplicationId(application_id))?;
    Ok(Json(record).into_response())
}

pub(crate) async fn review_handler<S>(
    State(state): State<WelfareState<S>>,
    caller: Caller,
    Path(application_id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    if !can_review(caller.role) {
        return Err(LifecycleError::Forbidden(caller.role).into());
    }
    let request = json_body(payload)?;
    let record = state
        .service
        .review(&caller, &ApplicationId(application_id), request)?;
    Ok(Json(record).into_response())
}

pub(crate) async fn list_residents_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    Ok(Json(state.service.residents()?).into_response())
}

pub(crate) async fn register_resident_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    payload: Result<Json<ResidentSubmission>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let resident = state.service.register_resident(json_body(payload)?)?;
    Ok((StatusCode::CREATED, Json(resident)).into_response())
}

pub(crate) async fn resident_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(resident_id): Path<String>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    Ok(Json(state.service.resident(&ResidentId(resident_id))?).into_response())
}

pub(crate) async fn update_resident_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(resident_id): Path<String>,
    payload: Result<Json<ResidentSubmission>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let resident = state
        .service
        .update_resident(&ResidentId(resident_id), json_body(payload)?)?;
    Ok(Json(resident).into_response())
}

pub(crate) async fn delete_resident_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(resident_id): Path<String>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    state.service.remove_resident(&ResidentId(resident_id))?;
    Ok(Json(json!({ "message": "Resident deleted successfully" })).into_response())
}

pub(crate) async fn list_schemes_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    Ok(Json(state.service.schemes()?).into_response())
}

pub(crate) async fn create_scheme_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    payload: Result<Json<SchemeSubmission>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let scheme = state.service.create_scheme(json_body(payload)?)?;
    Ok((StatusCode::CREATED, Json(scheme)).into_response())
}

pub(crate) async fn scheme_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(scheme_id): Path<String>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    Ok(Json(state.service.scheme(&SchemeId(scheme_id))?).into_response())
}

pub(crate) async fn update_scheme_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(scheme_id): Path<String>,
    payload: Result<Json<SchemeSubmission>, JsonRejection>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    let scheme = state
        .service
        .update_scheme(&SchemeId(scheme_id), json_body(payload)?)?;
    Ok(Json(scheme).into_response())
}

pub(crate) async fn delete_scheme_handler<S>(
    State(state): State<WelfareState<S>>,
    _caller: Caller,
    Path(scheme_id): Path<String>,
) -> Result<Response, ServiceError>
where
    S: WelfareStore + 'static,
{
    state.service.remove_scheme(&SchemeId(scheme_id))?;
    Ok(Json(json!({ "message": "Scheme deleted successfully" })).into_response())
}

use super::error::{Result, WebError};
use super::state::AppState;
use crate::core::Record;
use crate::office;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify))
        .route("/auth/logout", post(logout))
        .route("/api/dashboard", get(dashboard))
        .route("/api/classes", get(list_classes).post(create_class))
        .route(
            "/api/classes/:id",
            axum::routing::patch(update_class).delete(delete_class),
        )
        .route("/api/classes/:id/enroll", post(enroll_class))
        .route("/api/coaches", get(list_coaches).post(create_coach))
        .route(
            "/api/coaches/:id",
            axum::routing::patch(update_coach).delete(delete_coach),
        )
        .route("/api/programs", get(list_programs).post(create_program))
        .route(
            "/api/programs/:id",
            axum::routing::patch(update_program).delete(delete_program),
        )
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            axum::routing::patch(update_event).delete(delete_event),
        )
        .route("/api/packages", get(list_packages).post(create_package))
        .route(
            "/api/packages/:id",
            axum::routing::patch(update_package).delete(delete_package),
        )
        .route("/api/templates", get(list_templates).post(save_template))
        .route(
            "/api/templates/:id",
            get(get_template).delete(delete_template),
        )
        // The UI is served from another origin during development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Admin writes ride on a bearer session token from /auth/login.
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    if state.auth().verify(token).await {
        Ok(())
    } else {
        Err(WebError::Unauthorized)
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    session_token: String,
    expires_at: DateTime<Utc>,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let session = state.auth().login(&req.password).await?;
    Ok(Json(LoginResponse {
        success: true,
        session_token: session.session_token,
        expires_at: session.expires_at,
    }))
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    #[serde(default)]
    session_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    valid: bool,
}

/// Always 200; the body carries the verdict.
async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Json<VerifyResponse> {
    let valid = match req.session_token {
        Some(token) => state.auth().verify(&token).await,
        None => false,
    };
    Json(VerifyResponse { valid })
}

async fn logout(State(state): State<AppState>, Json(req): Json<VerifyRequest>) -> StatusCode {
    if let Some(token) = req.session_token {
        state.auth().logout(&token).await;
    }
    StatusCode::NO_CONTENT
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

async fn dashboard(State(state): State<AppState>) -> Json<office::DashboardStats> {
    let store = state.store().read().await;
    Json(office::dashboard_stats(&store))
}

// ---------------------------------------------------------------------------
// Classes
// ---------------------------------------------------------------------------

async fn list_classes(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_classes(&mut store))
}

async fn create_class(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<office::NewClass>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let record = office::create_class(&mut store, new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Record>,
) -> Result<Json<Record>> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    Ok(Json(office::update_class(&mut store, &id, patch)?))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_class(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct EnrollRequest {
    user_id: String,
}

async fn enroll_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let enrollment = office::enroll(&mut store, &id, &req.user_id)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

// ---------------------------------------------------------------------------
// Coaches
// ---------------------------------------------------------------------------

async fn list_coaches(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_coaches(&mut store))
}

async fn create_coach(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<office::NewCoach>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let record = office::create_coach(&mut store, new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_coach(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Record>,
) -> Result<Json<Record>> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    Ok(Json(office::update_coach(&mut store, &id, patch)?))
}

async fn delete_coach(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_coach(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

async fn list_programs(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_programs(&mut store))
}

async fn create_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<office::NewProgram>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let record = office::create_program(&mut store, new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Record>,
) -> Result<Json<Record>> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    Ok(Json(office::update_program(&mut store, &id, patch)?))
}

async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_program(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

async fn list_events(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_events(&mut store))
}

async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<office::NewEvent>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let record = office::create_event(&mut store, new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Record>,
) -> Result<Json<Record>> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    Ok(Json(office::update_event(&mut store, &id, patch)?))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_event(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Packages
// ---------------------------------------------------------------------------

async fn list_packages(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_packages(&mut store))
}

async fn create_package(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<office::NewPackage>,
) -> Result<(StatusCode, Json<Record>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let record = office::create_package(&mut store, new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Record>,
) -> Result<Json<Record>> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    Ok(Json(office::update_package(&mut store, &id, patch)?))
}

async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_package(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

async fn list_templates(State(state): State<AppState>) -> Json<Vec<Record>> {
    let mut store = state.store().write().await;
    Json(office::list_templates(&mut store))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<office::TemplateDetail>> {
    let mut store = state.store().write().await;
    Ok(Json(office::load_template(&mut store, &id)?))
}

#[derive(Debug, Deserialize)]
struct SaveTemplateRequest {
    #[serde(flatten)]
    draft: office::TemplateDraft,
    /// Present when replacing an existing template's body.
    #[serde(default)]
    editing_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveTemplateResponse {
    id: String,
}

async fn save_template(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<(StatusCode, Json<SaveTemplateResponse>)> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    let id = office::save_template(&mut store, req.draft, req.editing_id.as_deref())?;
    Ok((StatusCode::CREATED, Json(SaveTemplateResponse { id })))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    require_admin(&state, &headers).await?;
    let mut store = state.store().write().await;
    office::delete_template(&mut store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

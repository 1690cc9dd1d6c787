use crate::models::PublicUser;
use crate::services::auth_service::{
    self, AuthResponse, Claims, CreateAccountRequest, LoginRequest,
};
use crate::state::AppState;
use crate::utils::{AppError, ErrorResponse};
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CurrentUserResponse {
    pub error: bool,
    pub user: PublicUser,
}

#[utoipa::path(
    post,
    path = "/create-account",
    tag = "Auth",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields or user already exists", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
pub async fn create_account(
    state: web::Data<AppState>,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /create-account - email: {}", email);

    match auth_service::create_account(state.users.as_ref(), &state.tokens, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", email);
            Ok(HttpResponse::Created().json(response))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Email and password are required", body = ErrorResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /login - email: {}", email);

    match auth_service::login(state.users.as_ref(), &state.tokens, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/get-user",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    state: web::Data<AppState>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /get-user - user: {}", claims.user_id);

    let user = auth_service::get_current_user(state.users.as_ref(), &claims).await?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse { error: false, user }))
}

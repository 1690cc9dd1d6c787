use crate::database::UserStore;
use crate::models::{PublicUser, User};
use crate::utils::AppError;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const BCRYPT_COST: u32 = 10;

/// Lifetime of the token handed out right after registration.
pub fn registration_token_ttl() -> Duration {
    Duration::hours(48)
}

/// Lifetime of the token handed out on login.
pub fn login_token_ttl() -> Duration {
    Duration::days(7)
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateAccountRequest {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub error: bool,
    pub message: String,
    pub user: PublicUser,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// HS256 signing material derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

/// Treats absent and empty strings alike, as the public API always has.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || verify(password, &hashed))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
        .map_err(AppError::from)
}

pub async fn create_account(
    store: &dyn UserStore,
    keys: &TokenKeys,
    request: &CreateAccountRequest,
) -> Result<AuthResponse, AppError> {
    let (full_name, email, password) = match (
        present(&request.full_name),
        present(&request.email),
        present(&request.password),
    ) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        _ => return Err(AppError::Validation("All fields are required".to_string())),
    };

    if store.find_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("User Already exists".to_string()));
    }

    let user = User {
        id: Some(ObjectId::new()),
        full_name: full_name.to_string(),
        email: email.to_string(),
        password: hash_password(password).await?,
    };

    store.insert(&user).await?;

    let user_id = user
        .id_hex()
        .ok_or_else(|| AppError::Internal("User saved without id".to_string()))?;
    let access_token = keys.issue(&user_id, registration_token_ttl())?;

    log::info!("✅ Account created: {} ({})", user.email, user_id);

    Ok(AuthResponse {
        error: false,
        message: "Registration Successful".to_string(),
        user: user.public(),
        access_token,
    })
}

pub async fn login(
    store: &dyn UserStore,
    keys: &TokenKeys,
    request: &LoginRequest,
) -> Result<AuthResponse, AppError> {
    let (email, password) = match (present(&request.email), present(&request.password)) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ))
        }
    };

    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(password, &user.password).await? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let user_id = user
        .id_hex()
        .ok_or_else(|| AppError::Internal("Stored user has no id".to_string()))?;
    let access_token = keys.issue(&user_id, login_token_ttl())?;

    Ok(AuthResponse {
        error: false,
        message: "Login Successful".to_string(),
        user: user.public(),
        access_token,
    })
}

/// Resolves the account a verified token belongs to.
pub async fn get_current_user(
    store: &dyn UserStore,
    claims: &Claims,
) -> Result<PublicUser, AppError> {
    store
        .find_by_id(&claims.user_id)
        .await?
        .map(|user| user.public())
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

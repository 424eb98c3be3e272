//! Credential lifecycle: anonymous → issued → active → renewed/revoked/expired.

use actix_web::{web, HttpRequest, HttpResponse};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use api_core::{health_response, AppError, Result};
use auth_core::{bearer_token, TokenKeys};

use crate::db::{self, PublicUser};
use crate::session::SessionStore;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: String,
    user: PublicUser,
    token: String,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Internal(format!("password hashing failed: {err}")))
}

/// Constant-time comparison against the stored salted hash.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// POST /register
pub async fn register(
    pool: web::Data<sqlx::PgPool>,
    sessions: web::Data<SessionStore>,
    keys: web::Data<TokenKeys>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    if db::find_by_email(&pool, &body.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&body.password)?;
    let user = db::create_user(
        &pool,
        &body.email,
        &password_hash,
        body.first_name.as_deref(),
        body.last_name.as_deref(),
    )
    .await?;

    let token = keys
        .mint(user.id)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    sessions.put(user.id, &token).await?;

    tracing::info!(user_id = %user.id, "new user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        user: PublicUser::from(&user),
        token,
    }))
}

/// POST /login
///
/// Unknown account and wrong password produce the same generic failure.
pub async fn login(
    pool: web::Data<sqlx::PgPool>,
    sessions: web::Data<SessionStore>,
    keys: web::Data<TokenKeys>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    let user = db::find_by_email(&pool, &body.email)
        .await?
        .ok_or(AppError::Authentication)?;

    if !user.is_active {
        return Err(AppError::Authorization("Account is deactivated".to_string()));
    }

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::Authentication);
    }

    let token = keys
        .mint(user.id)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    sessions.put(user.id, &token).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        user: PublicUser::from(&user),
        token,
    }))
}

/// POST /logout
///
/// Deletes the session record unconditionally. The presented token stays
/// stateless-valid elsewhere until its embedded expiry; only
/// revocation-sensitive operations notice immediately.
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    keys: web::Data<TokenKeys>,
) -> Result<HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Authorization("Missing bearer token".to_string()))?;

    let claims = keys
        .verify(token)
        .map_err(|err| AppError::Authorization(err.to_string()))?;
    let subject = claims
        .subject_id()
        .map_err(|err| AppError::Authorization(err.to_string()))?;

    sessions.revoke(subject).await?;

    tracing::info!(user_id = %subject, "user logged out");

    Ok(HttpResponse::Ok().json(json!({ "message": "Logout successful" })))
}

/// POST /refresh
///
/// Renewal is revocation-sensitive: the presented token must be unexpired
/// and must still match the session record. No new token is minted otherwise.
pub async fn refresh(
    sessions: web::Data<SessionStore>,
    keys: web::Data<TokenKeys>,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    let claims = keys
        .verify(&body.token)
        .map_err(|err| AppError::Authorization(err.to_string()))?;
    let subject = claims
        .subject_id()
        .map_err(|err| AppError::Authorization(err.to_string()))?;

    if !sessions.is_current(subject, &body.token).await? {
        return Err(AppError::Authorization("Invalid token".to_string()));
    }

    let token = keys
        .mint(subject)
        .map_err(|err| AppError::Internal(err.to_string()))?;
    sessions.put(subject, &token).await?;

    tracing::debug!(user_id = %subject, "token refreshed");

    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}

/// GET /health
pub async fn health() -> HttpResponse {
    health_response("identity-service")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .route("/refresh", web::post().to(refresh));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trips() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn register_request_validation() {
        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "long-enough-pw".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "short".to_string(),
            first_name: None,
            last_name: None,
        };
        assert!(short_password.validate().is_err());

        let ok = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "long-enough-pw".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        };
        assert!(ok.validate().is_ok());
    }
}

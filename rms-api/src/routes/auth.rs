//! Registration, login, verification and password-reset flows. These are
//! user-facing endpoints and carry no station API key; login issues the
//! bearer token consumed by the profile routes.
//!
//! Verification and reset codes are generated and persisted here; delivery
//! (email) is an external concern.

use actix_web::web::{self, Data, Json};
use actix_web::{post, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use rms_common::auth::create_token;
use rms_common::random_code;
use rms_db::connection::PgPool;
use rms_db::models::user::{NewUser, User};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::routes::profile::UserView;

/// One generic message for every credential failure, so responses never
/// reveal whether the email or the password was wrong.
const BAD_CREDENTIALS: &str = "invalid email or password";

const RESET_CODE_TTL_MINS: i64 = 60;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl RegisterInput {
    fn validate(&self) -> Result<(), ApiError> {
        if !self.email.contains('@') || self.email.trim().is_empty() {
            return Err(ApiError::Validation("a valid email is required".to_string()));
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[post("/register")]
pub async fn register(
    pool: Data<PgPool>,
    input: Json<RegisterInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    input.validate()?;

    // bcrypt runs on the blocking pool, alongside the insert.
    let created = web::block(move || -> Result<User, ApiError> {
        let row = NewUser {
            email: input.email,
            hash_pwd: hash(&input.password, DEFAULT_COST)?,
            full_name: input.full_name,
            verify_code: Some(random_code()),
            user_role: "User".to_string(),
        };
        let mut conn = crate::conn(&pool)?;
        Ok(row.create(&mut conn)?)
    })
    .await??;

    // Delivery of the code is handled by the mailer; never echo it back.
    tracing::debug!(user = %created.email, "verification code issued");
    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        UserView::from(created),
        "account created, verification code issued",
    )))
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    pub token: String,
    pub user: UserView,
}

/// The one place credentials are checked. `None` (unknown email) and a hash
/// mismatch produce the same error.
pub fn check_credentials(user: Option<User>, password: &str) -> Result<User, ApiError> {
    let user = user.ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;
    if verify(password, &user.hash_pwd)? {
        Ok(user)
    } else {
        Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))
    }
}

#[post("/login")]
pub async fn login(pool: Data<PgPool>, input: Json<LoginInput>) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let user = web::block(move || -> Result<User, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let user = User::find_by_email(&input.email, &mut conn)?;
        check_credentials(user, &input.password)
    })
    .await??;

    let token = create_token(user.id, &user.email, &user.user_role)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(LoginView {
        token,
        user: UserView::from(user),
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyInput {
    pub email: String,
    pub code: String,
}

#[post("/verify")]
pub async fn verify_account(
    pool: Data<PgPool>,
    input: Json<VerifyInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    web::block(move || -> Result<(), ApiError> {
        let mut conn = crate::conn(&pool)?;
        let user = User::find_by_email(&input.email, &mut conn)?
            .ok_or_else(|| ApiError::NotFound("no account for this email".to_string()))?;
        if user.is_verified {
            return Ok(());
        }
        match &user.verify_code {
            Some(code) if *code == input.code => {
                user.mark_verified(&mut conn)?;
                Ok(())
            }
            _ => Err(ApiError::Validation(
                "invalid verification code".to_string(),
            )),
        }
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::message("account verified")))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordInput {
    pub email: String,
}

#[post("/forgot-password")]
pub async fn forgot_password(
    pool: Data<PgPool>,
    input: Json<ForgotPasswordInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    web::block(move || -> Result<(), ApiError> {
        let mut conn = crate::conn(&pool)?;
        let user = User::find_by_email(&input.email, &mut conn)?
            .ok_or_else(|| ApiError::NotFound("no account for this email".to_string()))?;
        let expires = (Utc::now() + Duration::minutes(RESET_CODE_TTL_MINS)).naive_utc();
        user.set_reset_code(&random_code(), expires, &mut conn)?;
        tracing::debug!(user = %user.email, "password reset code issued");
        Ok(())
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::message("password reset code issued")))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[post("/reset-password")]
pub async fn reset_password(
    pool: Data<PgPool>,
    input: Json<ResetPasswordInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    if input.new_password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }

    web::block(move || -> Result<(), ApiError> {
        let mut conn = crate::conn(&pool)?;
        let user = User::find_by_email(&input.email, &mut conn)?
            .ok_or_else(|| ApiError::NotFound("no account for this email".to_string()))?;
        let valid = match (&user.reset_code, user.reset_expires) {
            (Some(code), Some(expires)) => {
                *code == input.code && Utc::now().naive_utc() < expires
            }
            _ => false,
        };
        if !valid {
            return Err(ApiError::Validation(
                "invalid or expired reset code".to_string(),
            ));
        }
        user.update_password_hash(&hash(&input.new_password, DEFAULT_COST)?, &mut conn)?;
        Ok(())
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::message("password updated")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn user_with_password(password: &str) -> User {
        let joined = NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        User {
            id: 1,
            email: "op@station.example".to_string(),
            // Low cost keeps the test fast; the handler uses DEFAULT_COST.
            hash_pwd: hash(password, 4).unwrap(),
            full_name: None,
            phone: None,
            profile_image: None,
            verify_code: None,
            is_verified: true,
            reset_code: None,
            reset_expires: None,
            user_role: "User".to_string(),
            created_at: joined,
        }
    }

    #[test]
    fn correct_password_logs_in() {
        let user = user_with_password("correct horse");
        assert!(check_credentials(Some(user), "correct horse").is_ok());
    }

    #[test]
    fn wrong_password_and_unknown_email_are_indistinguishable() {
        let user = user_with_password("correct horse");
        let wrong_password = check_credentials(Some(user), "battery staple").unwrap_err();
        let unknown_email = check_credentials(None, "battery staple").unwrap_err();
        match (&wrong_password, &unknown_email) {
            (ApiError::Unauthorized(a), ApiError::Unauthorized(b)) => assert_eq!(a, b),
            other => panic!("expected two unauthorized errors, got {:?}", other),
        }
    }

    #[test]
    fn short_password_is_rejected_at_registration() {
        let input = RegisterInput {
            email: "op@station.example".to_string(),
            password: "abc".to_string(),
            full_name: None,
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn bad_email_is_rejected_at_registration() {
        let input = RegisterInput {
            email: "not-an-email".to_string(),
            password: "long enough".to_string(),
            full_name: None,
        };
        assert!(matches!(input.validate(), Err(ApiError::Validation(_))));
    }
}

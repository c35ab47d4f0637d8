use actix_web::web::{self, Data, Json};
use actix_web::{get, put, HttpResponse};
use chrono::NaiveDateTime;
use rms_db::connection::PgPool;
use rms_db::models::user::{ProfileChanges, User};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::response::ApiResponse;

/// What a user sees of themselves. Hash and one-time codes stay server-side.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub is_verified: bool,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            phone: user.phone,
            profile_image: user.profile_image,
            is_verified: user.is_verified,
            role: user.user_role,
            created_at: user.created_at,
        }
    }
}

#[get("")]
pub async fn get_profile(auth: AuthUser, pool: Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let uid = auth.0.sub;
    let user = web::block(move || -> Result<User, ApiError> {
        let mut conn = crate::conn(&pool)?;
        Ok(User::get(uid, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserView::from(user))))
}

#[derive(Debug, Deserialize)]
pub struct ProfileInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

#[put("")]
pub async fn update_profile(
    auth: AuthUser,
    pool: Data<PgPool>,
    input: Json<ProfileInput>,
) -> Result<HttpResponse, ApiError> {
    let uid = auth.0.sub;
    let input = input.into_inner();
    if input.full_name.is_none() && input.phone.is_none() && input.profile_image.is_none() {
        return Err(ApiError::Validation("nothing to update".to_string()));
    }

    let user = web::block(move || -> Result<User, ApiError> {
        let mut conn = crate::conn(&pool)?;
        let user = User::get(uid, &mut conn)?;
        let changes = ProfileChanges {
            full_name: input.full_name,
            phone: input.phone,
            profile_image: input.profile_image,
        };
        Ok(user.update_profile(&changes, &mut conn)?)
    })
    .await??;

    Ok(HttpResponse::Ok().json(ApiResponse::success(UserView::from(user))))
}

use crate::schema::users;
use crate::schema::users::dsl::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub hash_pwd: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub verify_code: Option<String>,
    pub is_verified: bool,
    pub reset_code: Option<String>,
    pub reset_expires: Option<NaiveDateTime>,
    pub user_role: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn get(uid: i32, conn: &mut PgConnection) -> QueryResult<Self> {
        users.find(uid).first(conn)
    }

    pub fn find_by_email(mail: &str, conn: &mut PgConnection) -> QueryResult<Option<Self>> {
        users.filter(email.eq(mail)).first(conn).optional()
    }

    pub fn mark_verified(&self, conn: &mut PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set((is_verified.eq(true), verify_code.eq(None::<String>)))
            .execute(conn)?;
        Ok(())
    }

    pub fn set_reset_code(
        &self,
        code: &str,
        expires_at: NaiveDateTime,
        conn: &mut PgConnection,
    ) -> QueryResult<()> {
        diesel::update(self)
            .set((reset_code.eq(code), reset_expires.eq(expires_at)))
            .execute(conn)?;
        Ok(())
    }

    /// Used both by password reset (clears the one-time code) and by the
    /// signed-in change-password flow.
    pub fn update_password_hash(&self, new_hash: &str, conn: &mut PgConnection) -> QueryResult<()> {
        diesel::update(self)
            .set((
                hash_pwd.eq(new_hash),
                reset_code.eq(None::<String>),
                reset_expires.eq(None::<NaiveDateTime>),
            ))
            .execute(conn)?;
        Ok(())
    }

    pub fn update_profile(
        &self,
        changes: &ProfileChanges,
        conn: &mut PgConnection,
    ) -> QueryResult<Self> {
        diesel::update(self).set(changes).get_result(conn)
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub hash_pwd: String,
    pub full_name: Option<String>,
    pub verify_code: Option<String>,
    pub user_role: String,
}

impl NewUser {
    pub fn create(&self, conn: &mut PgConnection) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)
    }
}

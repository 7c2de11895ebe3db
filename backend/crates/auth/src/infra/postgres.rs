//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    name,
    email,
    user_name,
    password_hash,
    dob,
    phone,
    address,
    city,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                name,
                email,
                user_name,
                password_hash,
                dob,
                phone,
                address,
                city,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.user_name.as_ref().map(|n| n.as_str()))
        .bind(user.password.as_str())
        .bind(user.profile.dob.as_deref())
        .bind(user.profile.phone.as_deref())
        .bind(user.profile.address.as_deref())
        .bind(user.profile.city.as_deref())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_user()
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email_or_user_name(&self, identifier: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1 OR user_name = $2
            ORDER BY id
            LIMIT 1
            "#
        ))
        .bind(Email::normalize_lookup(identifier))
        .bind(identifier.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email_or_user_name(
        &self,
        email: Option<&str>,
        user_name: Option<&str>,
        except: Option<UserId>,
    ) -> AuthResult<bool> {
        if email.is_none() && user_name.is_none() {
            return Ok(false);
        }

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE (email = $1 OR user_name = $2)
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(email.map(Email::normalize_lookup))
        .bind(user_name)
        .bind(except.map(|id| id.value()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                user_name = $4,
                password_hash = $5,
                dob = $6,
                phone = $7,
                address = $8,
                city = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(user.id.value())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.user_name.as_ref().map(|n| n.as_str()))
        .bind(user.password.as_str())
        .bind(user.profile.dob.as_deref())
        .bind(user.profile.phone.as_deref())
        .bind(user.profile.address.as_deref())
        .bind(user.profile.city.as_deref())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    user_name: Option<String>,
    password_hash: String,
    dob: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password = UserPassword::from_db(self.password_hash).map_err(|e| {
            AuthError::Internal(format!("Unusable password hash for user {}: {}", self.id, e))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            name: PersonName::from_db(self.name),
            email: Email::from_db(self.email),
            user_name: self.user_name.map(UserName::from_db),
            password,
            profile: UserProfile {
                dob: self.dob,
                phone: self.phone,
                address: self.address,
                city: self.city,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

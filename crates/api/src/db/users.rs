//! User repository: the credential store.
//!
//! Lookups return the safe [`User`] projection; secret material (password
//! hash, refresh-token reference) is only handed out through the dedicated
//! methods that need it. The password hash is written exactly twice: at
//! creation and through [`UserRepository::update_password_hash`] — profile
//! updates cannot touch it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use juniper_core::{Address, Email, Role, UserId};

use super::RepositoryError;
use crate::models::user::{NewUserRecord, ProfileChanges, ProfilePic, User};

const USER_COLUMNS: &str = "id, email, name, password_hash, addresses, \
     city, country, phone, profile_pic, role, created_at, updated_at";

/// Raw `users` row; converted into the safe projection before leaving this
/// module.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    password_hash: String,
    addresses: Json<Vec<Address>>,
    city: String,
    country: String,
    phone: String,
    profile_pic: Option<Json<ProfilePic>>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = self.role.parse::<Role>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email,
            city: self.city,
            country: self.country,
            phone: self.phone,
            profile_pic: self.profile_pic.map(|Json(pic)| pic),
            addresses: self.addresses.0,
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user together with their password hash, for credential checks at
    /// login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_auth_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let hash = row.password_hash.clone();
                Ok(Some((row.into_user()?, hash)))
            }
            None => Ok(None),
        }
    }

    /// Get only the password hash for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, id: UserId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(hash)
    }

    /// Get the currently stored refresh-token reference, if any.
    ///
    /// Returns `None` both when the user has no live reference and when the
    /// user does not exist; callers that need to tell those apart load the
    /// user first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_refresh_token(&self, id: UserId) -> Result<Option<String>, RepositoryError> {
        let token = sqlx::query_scalar::<_, Option<String>>(
            "SELECT refresh_token FROM users WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(token.flatten())
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, record: &NewUserRecord) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users \
                 (email, name, password_hash, addresses, city, country, phone, profile_pic, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(record.email.as_str())
        .bind(&record.name)
        .bind(&record.password_hash)
        .bind(Json(&record.addresses))
        .bind(&record.city)
        .bind(&record.country)
        .bind(&record.phone)
        .bind(record.profile_pic.as_ref().map(Json))
        .bind(record.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique_violation)?;

        row.into_user()
    }

    /// Apply a partial profile update. Secret fields are not reachable from
    /// here.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a changed email is already
    /// taken, `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 phone = COALESCE($4, phone), \
                 profile_pic = COALESCE($5, profile_pic), \
                 city = COALESCE($6, city), \
                 country = COALESCE($7, country), \
                 addresses = COALESCE($8, addresses), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(changes.name.as_ref())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.phone.as_ref())
        .bind(changes.profile_pic.as_ref().map(Json))
        .bind(changes.city.as_ref())
        .bind(changes.country.as_ref())
        .bind(changes.addresses.as_ref().map(Json))
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique_violation)?;

        row.map(UserRow::into_user).transpose()
    }

    /// Replace the stored password hash. This is the only write path that
    /// touches the secret.
    ///
    /// Returns `false` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
                .bind(id.as_i32())
                .bind(password_hash)
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the single refresh-token reference for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_refresh_token(
        &self,
        id: UserId,
        refresh_token: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
            .bind(id.as_i32())
            .bind(refresh_token)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Clear the refresh-token reference (logout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_refresh_token(&self, id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = now() WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

/// Map a unique-constraint violation to `Conflict`, pass everything else
/// through.
fn conflict_on_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

//! PostgreSQL-backed `ProfileRepository` over the `users` table.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;

use crate::domain::ports::{ProfileRepository, ProfileRepositoryError};
use crate::domain::{Email, FullName, UserId, UserProfile, UserType, parse_avatar_url};

use super::diesel_error_mapping;
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselProfileRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselProfileRepository {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> ProfileRepositoryError {
    diesel_error_mapping::map_pool_error(error, ProfileRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ProfileRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        ProfileRepositoryError::query,
        ProfileRepositoryError::connection,
    )
}

/// Rebuild a validated profile from its row.
pub(crate) fn row_to_profile(row: UserRow) -> Result<UserProfile, ProfileRepositoryError> {
    let invalid = |err: crate::domain::UserValidationError| {
        ProfileRepositoryError::query(format!("stored profile {} is invalid: {err}", row.id))
    };
    Ok(UserProfile {
        id: UserId::from_uuid(row.id),
        email: Email::new(&row.email).map_err(invalid)?,
        full_name: FullName::new(&row.full_name).map_err(invalid)?,
        avatar_url: row
            .avatar_url
            .as_deref()
            .map(parse_avatar_url)
            .transpose()
            .map_err(invalid)?,
        user_type: row.user_type.parse::<UserType>().map_err(invalid)?,
    })
}

#[async_trait]
impl ProfileRepository for DieselProfileRepository {
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_profile).transpose()
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), ProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let avatar_url = profile.avatar_url.as_ref().map(url::Url::as_str);
        let new_row = NewUserRow {
            id: *profile.id.as_uuid(),
            email: profile.email.as_ref(),
            full_name: profile.full_name.as_ref(),
            avatar_url,
            user_type: profile.user_type.as_str(),
        };
        let update = UserUpdate {
            email: profile.email.as_ref(),
            full_name: profile.full_name.as_ref(),
            avatar_url,
            user_type: profile.user_type.as_str(),
            updated_at: self.clock.utc(),
        };
        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

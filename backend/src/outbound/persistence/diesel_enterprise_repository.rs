//! PostgreSQL-backed `EnterpriseRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use url::Url;

use crate::domain::ports::{EnterpriseRepository, EnterpriseRepositoryError};
use crate::domain::{
    BudgetRange, Enterprise, EnterpriseId, EnterpriseProfile, FundingStage, UserId,
};

use super::diesel_error_mapping::{self, is_unique_violation};
use super::models::{EnterpriseProfileColumns, EnterpriseRow, NewEnterpriseRow};
use super::pool::{DbPool, PoolError};
use super::schema::enterprises;

#[derive(Clone)]
pub struct DieselEnterpriseRepository {
    pool: DbPool,
}

impl DieselEnterpriseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EnterpriseRepositoryError {
    diesel_error_mapping::map_pool_error(error, EnterpriseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EnterpriseRepositoryError {
    diesel_error_mapping::map_diesel_error(
        error,
        EnterpriseRepositoryError::query,
        EnterpriseRepositoryError::connection,
    )
}

fn profile_columns(profile: &EnterpriseProfile) -> EnterpriseProfileColumns<'_> {
    EnterpriseProfileColumns {
        company_name: &profile.company_name,
        industry: &profile.industry,
        company_size: profile.company_size.as_deref(),
        headquarters: profile.headquarters.as_deref(),
        website: profile.website.as_ref().map(Url::as_str),
        description: profile.description.as_deref(),
        preferred_stages: profile
            .preferred_stages
            .iter()
            .map(|stage| stage.as_str().to_owned())
            .collect(),
        preferred_industries: &profile.preferred_industries,
        budget_range: profile.budget_range.map(BudgetRange::as_str),
    }
}

fn row_to_enterprise(row: EnterpriseRow) -> Result<Enterprise, EnterpriseRepositoryError> {
    let stored = |what: &str, value: String| {
        EnterpriseRepositoryError::query(format!("invalid stored {what}: {value}"))
    };
    let preferred_stages = row
        .preferred_stages
        .iter()
        .map(|stage| stage.parse::<FundingStage>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|value| stored("stage", value))?;
    let budget_range = row
        .budget_range
        .map(|value| value.parse::<BudgetRange>())
        .transpose()
        .map_err(|value| stored("budget range", value))?;
    let website = row
        .website
        .map(|value| Url::parse(&value).map_err(|_| stored("website", value)))
        .transpose()?;
    Ok(Enterprise {
        id: EnterpriseId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        profile: EnterpriseProfile {
            company_name: row.company_name,
            industry: row.industry,
            company_size: row.company_size,
            headquarters: row.headquarters,
            website,
            description: row.description,
            preferred_stages,
            preferred_industries: row.preferred_industries,
            budget_range,
        },
        created_at: row.created_at,
    })
}

#[async_trait]
impl EnterpriseRepository for DieselEnterpriseRepository {
    async fn find_by_id(&self, id: &EnterpriseId) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = enterprises::table
            .filter(enterprises::id.eq(id.as_uuid()))
            .select(EnterpriseRow::as_select())
            .first::<EnterpriseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_enterprise).transpose()
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = enterprises::table
            .filter(enterprises::owner_id.eq(owner.as_uuid()))
            .select(EnterpriseRow::as_select())
            .first::<EnterpriseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_enterprise).transpose()
    }

    async fn insert(&self, enterprise: &Enterprise) -> Result<(), EnterpriseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewEnterpriseRow {
            id: *enterprise.id.as_uuid(),
            owner_id: *enterprise.owner_id.as_uuid(),
            profile: profile_columns(&enterprise.profile),
            created_at: enterprise.created_at,
        };
        diesel::insert_into(enterprises::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    EnterpriseRepositoryError::conflict(enterprise.owner_id.to_string())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn update_profile(
        &self,
        id: &EnterpriseId,
        profile: &EnterpriseProfile,
    ) -> Result<Option<Enterprise>, EnterpriseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(enterprises::table.filter(enterprises::id.eq(id.as_uuid())))
            .set(&profile_columns(profile))
            .returning(EnterpriseRow::as_returning())
            .get_result::<EnterpriseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_enterprise).transpose()
    }

    async fn delete(&self, id: &EnterpriseId) -> Result<bool, EnterpriseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(enterprises::table.filter(enterprises::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
